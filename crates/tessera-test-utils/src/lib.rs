//! Test fixtures and object types for Tessera development.
//!
//! Provides [`PoolObject`] implementations standing in for real engine
//! objects, plus [`DropCounter`] for checking that every stored value is
//! dropped exactly once.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tessera_core::{PoolObject, StructureKind};

/// Stand-in for a native window wrapper.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestWindow {
    pub id: u32,
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl TestWindow {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            title: format!("window {id}"),
            width: 800,
            height: 600,
        }
    }
}

impl PoolObject for TestWindow {
    const KIND: StructureKind = StructureKind::Window;
}

/// Stand-in for a logger with its pattern table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestLogger {
    pub name: String,
    pub patterns: Vec<String>,
}

impl PoolObject for TestLogger {
    const KIND: StructureKind = StructureKind::Logger;
}

/// Stand-in for a GPU buffer description. Over-aligned on purpose so
/// base-block layout padding gets exercised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(align(32))]
pub struct TestBuffer {
    pub size: u64,
    pub usage: u32,
}

impl PoolObject for TestBuffer {
    const KIND: StructureKind = StructureKind::Buffer;
}

/// Stand-in for a network socket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TestSocket {
    pub port: u16,
}

impl PoolObject for TestSocket {
    const KIND: StructureKind = StructureKind::Socket;
}

/// Increments a shared counter when dropped. Stored as a sound object.
#[derive(Debug)]
pub struct DropCounter {
    drops: Arc<AtomicUsize>,
}

impl DropCounter {
    /// A counter and the shared tally it reports to.
    pub fn new(drops: &Arc<AtomicUsize>) -> Self {
        Self {
            drops: Arc::clone(drops),
        }
    }

    /// A fresh tally starting at zero.
    pub fn tally() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    /// Drops recorded by `tally`.
    pub fn count(tally: &Arc<AtomicUsize>) -> usize {
        tally.load(Ordering::SeqCst)
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl PoolObject for DropCounter {
    const KIND: StructureKind = StructureKind::Sound;
}
