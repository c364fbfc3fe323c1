//! Per-kind slot bindings.
//!
//! A [`MemorySlotBinding`] claims a contiguous run of equally sized slots
//! inside a [`MemoryBlock`](crate::block::MemoryBlock) for one structure
//! kind. It tracks free slots on a stack, bumps a per-slot generation on
//! every release, and links to the next binding in its kind's chain.

use tessera_collections::GrowableArray;
use tessera_core::{BindingId, StructureKind};

/// Which block a binding's slots live in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockRef {
    /// The pool's shared base block.
    Base,
    /// The n-th overflow block of the binding's kind.
    Overflow(usize),
}

#[derive(Clone, Copy, Debug, Default)]
struct SlotState {
    generation: u32,
    occupied: bool,
}

/// Slot bookkeeping for one kind over one block range.
#[derive(Debug)]
pub struct MemorySlotBinding {
    kind: StructureKind,
    block: BlockRef,
    /// Byte offset of slot 0 within the block.
    base_offset: usize,
    /// Distance in bytes between consecutive slots.
    stride: usize,
    slots: GrowableArray<SlotState>,
    /// Free slot indices; the lowest index is on top.
    free: GrowableArray<u32>,
    next: Option<BindingId>,
}

impl MemorySlotBinding {
    /// A binding of `slot_count` free slots starting at `base_offset`.
    pub(crate) fn new(
        kind: StructureKind,
        block: BlockRef,
        base_offset: usize,
        stride: usize,
        slot_count: u32,
    ) -> Self {
        let mut free = GrowableArray::with_capacity(slot_count as usize);
        for slot in (0..slot_count).rev() {
            free.push_back(slot);
        }
        let mut slots = GrowableArray::new();
        slots.resize(slot_count as usize, SlotState::default());
        Self {
            kind,
            block,
            base_offset,
            stride,
            slots,
            free,
            next: None,
        }
    }

    /// The kind this binding stores.
    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    /// The block the slots live in.
    pub fn block(&self) -> BlockRef {
        self.block
    }

    /// Total slots.
    pub fn slot_count(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Slots available for [`take_next`](Self::take_next).
    pub fn free_count(&self) -> u32 {
        self.free.len() as u32
    }

    /// Slots holding a live object.
    pub fn live_count(&self) -> u32 {
        self.slot_count() - self.free_count()
    }

    /// Whether a slot is available.
    pub fn has_free(&self) -> bool {
        !self.free.is_empty()
    }

    /// Next binding in the kind's chain.
    pub fn next(&self) -> Option<BindingId> {
        self.next
    }

    pub(crate) fn set_next(&mut self, next: BindingId) {
        self.next = Some(next);
    }

    /// Claim the lowest free slot.
    pub(crate) fn take_next(&mut self) -> Option<u32> {
        let slot = self.free.pop_back()?;
        self.slots[slot as usize].occupied = true;
        Some(slot)
    }

    /// Return an occupied slot to the free stack and retire its generation.
    pub(crate) fn release(&mut self, slot: u32) {
        let state = &mut self.slots[slot as usize];
        debug_assert!(state.occupied, "released slot {slot} is free");
        state.occupied = false;
        state.generation = state.generation.wrapping_add(1);
        self.free.push_back(slot);
    }

    /// Whether `slot` exists and holds a live object.
    pub fn is_occupied(&self, slot: u32) -> bool {
        self.slots
            .get(slot as usize)
            .is_some_and(|state| state.occupied)
    }

    /// Current generation of `slot`.
    pub fn generation(&self, slot: u32) -> Option<u32> {
        self.slots.get(slot as usize).map(|state| state.generation)
    }

    /// Byte offset of `slot` within the block.
    pub(crate) fn offset_of(&self, slot: u32) -> usize {
        self.base_offset + slot as usize * self.stride
    }

    /// Occupied slot indices, ascending.
    pub(crate) fn occupied_slots(&self) -> impl Iterator<Item = u32> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, state)| state.occupied)
            .map(|(slot, _)| slot as u32)
    }
}
