//! The memory pool.
//!
//! ```text
//! MemoryPool
//! ├── base MemoryBlock        one binding per registered kind, packed
//! ├── bindings[]              every binding, addressed by BindingId
//! └── chains{kind}            head → … → tail over bindings[]
//!     └── overflow blocks     one MemoryBlock per binding after the head
//! ```
//!
//! Creating an object searches the kind's chain from its head for a
//! binding with a free slot. Only when the whole chain is full does the
//! pool allocate one overflow block, sized to the kind's overflow
//! reservation, and append its binding as the new tail. Blocks are never
//! freed or compacted while the pool lives.

use std::ptr::NonNull;

use tracing::{debug, info};

use tessera_collections::{GrowableArray, IntKeyHashMap};
use tessera_core::{BindingId, PoolObject, StructureKind};

use crate::binding::{BlockRef, MemorySlotBinding};
use crate::block::MemoryBlock;
use crate::config::LifecycleConfig;
use crate::error::PoolError;
use crate::handle::SlotHandle;
use crate::raw::{self, BLOCK_ALIGN};
use crate::registry::{StructureTypeInfo, StructureTypeRegistry};

/// Largest block the pool will request, leaving room for alignment
/// padding under the allocator's `isize::MAX` limit.
const MAX_BLOCK_BYTES: usize = isize::MAX as usize - BLOCK_ALIGN;

#[derive(Debug)]
struct KindChain {
    head: BindingId,
    tail: BindingId,
    stride: usize,
    overflow_slots: u32,
    overflow_bytes: usize,
    overflow_blocks: GrowableArray<MemoryBlock>,
}

/// Occupancy of one kind's binding chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindStats {
    /// The kind.
    pub kind: StructureKind,
    /// Bindings in the chain, including the base binding.
    pub chain_len: usize,
    /// Overflow blocks allocated for the kind.
    pub overflow_blocks: usize,
    /// Slots across the whole chain.
    pub slot_capacity: u64,
    /// Free slots across the whole chain.
    pub free_slots: u64,
    /// Live objects across the whole chain.
    pub live: u64,
}

/// Typed slot storage for every registered structure kind.
pub struct MemoryPool {
    registry: StructureTypeRegistry,
    base: MemoryBlock,
    bindings: GrowableArray<MemorySlotBinding>,
    chains: IntKeyHashMap<u16, KindChain>,
}

fn too_large(kind: StructureKind, count: u64) -> PoolError {
    PoolError::CapacityOverflow { kind, count }
}

fn slot_count(kind: StructureKind, count: u64) -> Result<u32, PoolError> {
    u32::try_from(count).map_err(|_| too_large(kind, count))
}

fn block_bytes(info: &StructureTypeInfo, slots: u32) -> Result<usize, PoolError> {
    info.stride()
        .checked_mul(slots as usize)
        .filter(|&bytes| bytes <= MAX_BLOCK_BYTES)
        .ok_or_else(|| too_large(info.kind(), u64::from(slots)))
}

impl MemoryPool {
    /// Lay out the base block and one binding per registered kind.
    ///
    /// Each kind's share starts at the running offset rounded up to the
    /// kind's alignment and holds its effective base count of slots.
    /// Kinds in the config that are not registered are ignored.
    pub fn new(
        registry: StructureTypeRegistry,
        config: &LifecycleConfig,
    ) -> Result<Self, PoolError> {
        config.validate()?;

        let mut plan = GrowableArray::with_capacity(registry.len());
        let mut offset = 0usize;
        for kind in registry.kinds() {
            let info = *registry.get(kind).expect("kinds() yields registered kinds");
            let base_slots = slot_count(kind, config.base_count(kind))?;
            let overflow_slots = slot_count(kind, config.overflow_count(kind))?;
            let overflow_bytes = block_bytes(&info, overflow_slots)?;

            let align = info.align();
            let start = (offset + align - 1) & !(align - 1);
            offset = start
                .checked_add(block_bytes(&info, base_slots)?)
                .filter(|&end| end <= MAX_BLOCK_BYTES)
                .ok_or_else(|| too_large(kind, u64::from(base_slots)))?;
            plan.push_back((info, start, base_slots, overflow_slots, overflow_bytes));
        }

        let base = MemoryBlock::new(offset).expect("base size checked against the layout limit");
        let mut bindings = GrowableArray::with_capacity(plan.len());
        let mut chains = IntKeyHashMap::new();
        chains.reserve(plan.len());
        for (index, (info, start, base_slots, overflow_slots, overflow_bytes)) in
            plan.into_iter().enumerate()
        {
            let id = BindingId(index as u32);
            bindings.push_back(MemorySlotBinding::new(
                info.kind(),
                BlockRef::Base,
                start,
                info.stride(),
                base_slots,
            ));
            chains.insert(
                info.kind().code(),
                KindChain {
                    head: id,
                    tail: id,
                    stride: info.stride(),
                    overflow_slots,
                    overflow_bytes,
                    overflow_blocks: GrowableArray::new(),
                },
            );
        }

        info!(
            kinds = registry.len(),
            base_bytes = offset,
            "memory pool initialised"
        );
        Ok(Self {
            registry,
            base,
            bindings,
            chains,
        })
    }

    /// The registry the pool was built from.
    pub fn registry(&self) -> &StructureTypeRegistry {
        &self.registry
    }

    /// Size of the shared base block in bytes.
    pub fn base_size(&self) -> usize {
        self.base.size()
    }

    /// A binding by id.
    pub fn binding(&self, id: BindingId) -> Option<&MemorySlotBinding> {
        self.bindings.get(id.index())
    }

    /// Bindings of `kind`'s chain, head first.
    pub fn chain(&self, kind: StructureKind) -> impl Iterator<Item = BindingId> + '_ {
        let head = self.chains.get(kind.code()).map(|chain| chain.head);
        std::iter::successors(head, move |id| self.bindings[id.index()].next())
    }

    /// First binding in `kind`'s chain with a free slot.
    pub fn find_empty_binding(&self, kind: StructureKind) -> Option<BindingId> {
        self.chain(kind)
            .find(|id| self.bindings[id.index()].has_free())
    }

    /// Allocate one overflow block for `kind` and append its binding.
    fn grow_chain(&mut self, kind: StructureKind) -> Result<BindingId, PoolError> {
        let id = u32::try_from(self.bindings.len())
            .map(BindingId)
            .map_err(|_| too_large(kind, u64::from(u32::MAX)))?;
        let chain = self
            .chains
            .get_mut(kind.code())
            .ok_or(PoolError::UnregisteredKind { kind })?;

        let block = MemoryBlock::new(chain.overflow_bytes)
            .expect("overflow size checked against the layout limit");
        let block_index = chain.overflow_blocks.len();
        chain.overflow_blocks.push_back(block);
        let prev = chain.tail;
        chain.tail = id;

        self.bindings.push_back(MemorySlotBinding::new(
            kind,
            BlockRef::Overflow(block_index),
            0,
            chain.stride,
            chain.overflow_slots,
        ));
        self.bindings[prev.index()].set_next(id);

        debug!(
            %kind,
            slots = chain.overflow_slots,
            bytes = chain.overflow_bytes,
            chain_len = block_index + 2,
            "overflow block allocated"
        );
        Ok(id)
    }

    fn slot_ptr(&self, id: BindingId, slot: u32) -> NonNull<u8> {
        let binding = &self.bindings[id.index()];
        let offset = binding.offset_of(slot);
        match binding.block() {
            BlockRef::Base => self.base.address(offset),
            BlockRef::Overflow(index) => self
                .chains
                .get(binding.kind().code())
                .expect("bound kinds have a chain")
                .overflow_blocks[index]
                .address(offset),
        }
    }

    /// Verify `handle` addresses a live `T` and return its address.
    fn locate<T: PoolObject>(&self, handle: &SlotHandle) -> Result<NonNull<u8>, PoolError> {
        self.registry.check::<T>()?;
        let invalid = PoolError::InvalidHandle { kind: handle.kind };
        if handle.kind != T::KIND {
            return Err(invalid);
        }
        let binding = self
            .bindings
            .get(handle.binding.index())
            .filter(|b| b.kind() == handle.kind)
            .ok_or(invalid.clone())?;
        let current = binding.generation(handle.slot).ok_or(invalid)?;
        if current != handle.generation || !binding.is_occupied(handle.slot) {
            return Err(PoolError::StaleHandle {
                kind: handle.kind,
                binding: handle.binding,
                slot: handle.slot,
                handle: handle.generation,
                current,
            });
        }
        Ok(self.slot_ptr(handle.binding, handle.slot))
    }

    fn checked<T: PoolObject>(&self, handle: &SlotHandle) -> Result<NonNull<u8>, PoolError> {
        self.locate::<T>(handle).inspect_err(|error| {
            debug!(%handle, %error, "handle rejected");
        })
    }

    /// Move `value` into a free slot of its kind.
    ///
    /// Grows the kind's chain by one overflow block if every binding is
    /// full.
    #[allow(unsafe_code)]
    pub fn create<T: PoolObject>(&mut self, value: T) -> Result<SlotHandle, PoolError> {
        self.registry.check::<T>()?;
        let id = match self.find_empty_binding(T::KIND) {
            Some(id) => id,
            None => self.grow_chain(T::KIND)?,
        };
        let binding = &mut self.bindings[id.index()];
        let slot = binding.take_next().expect("chosen binding has a free slot");
        let generation = binding.generation(slot).expect("claimed slot exists");
        let ptr = self.slot_ptr(id, slot);
        // SAFETY: the slot was just taken from its binding's free stack, so
        // it holds no value. Its offset is the kind's aligned base offset
        // plus a multiple of the stride inside a block aligned to
        // BLOCK_ALIGN, which is at least the alignment of `T`.
        unsafe { raw::write(ptr, value) };
        Ok(SlotHandle::new(T::KIND, id, slot, generation))
    }

    /// Move the object out of its slot and free the slot.
    #[allow(unsafe_code)]
    pub fn take<T: PoolObject>(&mut self, handle: SlotHandle) -> Result<T, PoolError> {
        let ptr = self.checked::<T>(&handle)?;
        // SAFETY: `checked` confirmed the slot is occupied by a `T` at the
        // handle's generation. The slot is released right after the read.
        let value = unsafe { raw::read::<T>(ptr) };
        self.bindings[handle.binding.index()].release(handle.slot);
        Ok(value)
    }

    /// Drop the object and return its slot to the binding that supplied it.
    pub fn destroy<T: PoolObject>(&mut self, handle: SlotHandle) -> Result<(), PoolError> {
        self.take::<T>(handle).map(drop)
    }

    /// Borrow a live object.
    #[allow(unsafe_code)]
    pub fn get<T: PoolObject>(&self, handle: &SlotHandle) -> Result<&T, PoolError> {
        let ptr = self.checked::<T>(handle)?;
        // SAFETY: the slot holds a live `T`, and the shared borrow of the
        // pool rules out a concurrent `&mut` to it.
        Ok(unsafe { raw::get::<T>(ptr) })
    }

    /// Mutably borrow a live object.
    #[allow(unsafe_code)]
    pub fn get_mut<T: PoolObject>(&mut self, handle: &SlotHandle) -> Result<&mut T, PoolError> {
        let ptr = self.checked::<T>(handle)?;
        // SAFETY: the slot holds a live `T`, and the exclusive borrow of
        // the pool rules out any other reference to it.
        Ok(unsafe { raw::get_mut::<T>(ptr) })
    }

    /// Occupancy of `kind`'s chain, if the kind is registered.
    pub fn stats(&self, kind: StructureKind) -> Option<KindStats> {
        let chain = self.chains.get(kind.code())?;
        let mut stats = KindStats {
            kind,
            chain_len: 0,
            overflow_blocks: chain.overflow_blocks.len(),
            slot_capacity: 0,
            free_slots: 0,
            live: 0,
        };
        for id in self.chain(kind) {
            let binding = &self.bindings[id.index()];
            stats.chain_len += 1;
            stats.slot_capacity += u64::from(binding.slot_count());
            stats.free_slots += u64::from(binding.free_count());
            stats.live += u64::from(binding.live_count());
        }
        Some(stats)
    }

    /// Free slots across `kind`'s chain. Zero for unregistered kinds.
    pub fn free_slots(&self, kind: StructureKind) -> u64 {
        self.stats(kind).map_or(0, |s| s.free_slots)
    }

    /// Sizes in bytes of `kind`'s overflow blocks, oldest first.
    pub fn overflow_block_sizes(&self, kind: StructureKind) -> Vec<usize> {
        self.chains
            .get(kind.code())
            .map(|chain| chain.overflow_blocks.iter().map(MemoryBlock::size).collect())
            .unwrap_or_default()
    }
}

impl Drop for MemoryPool {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        for (index, binding) in self.bindings.iter().enumerate() {
            let Some(info) = self.registry.get(binding.kind()) else {
                continue;
            };
            let drop_fn = info.drop_fn();
            for slot in binding.occupied_slots() {
                let ptr = self.slot_ptr(BindingId(index as u32), slot);
                // SAFETY: occupied slots hold a live value of the kind's
                // registered type, which `drop_fn` was instantiated for.
                // The pool is being dropped, so the slot is never read again.
                unsafe { drop_fn(ptr) };
            }
        }
    }
}

impl std::fmt::Debug for MemoryPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryPool")
            .field("kinds", &self.registry.len())
            .field("base_size", &self.base.size())
            .field("bindings", &self.bindings.len())
            .finish()
    }
}
