//! Benchmark profiles and utilities for the Tessera object storage layer.
//!
//! Provides pre-built [`LifecycleConfig`] profiles and deterministic
//! workloads for benchmarks and examples:
//!
//! - [`reference_config`]: pool mode with the built-in reservations
//! - [`tight_config`]: pool mode with single-slot blocks, so every create
//!   past the first walks or grows a chain
//! - [`key_sequence`]: seeded, well-spread integer keys
//! - [`churn_schedule`]: seeded create/destroy interleaving

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use tessera_collections::{KeyHash, SplitMix64};
use tessera_core::StructureKind;
use tessera_pool::LifecycleConfig;

/// Pool mode with every kind at its built-in reservation counts.
pub fn reference_config() -> LifecycleConfig {
    LifecycleConfig::pool()
}

/// Pool mode where each listed kind gets one base slot and one slot per
/// overflow block.
pub fn tight_config(kinds: &[StructureKind]) -> LifecycleConfig {
    kinds.iter().fold(LifecycleConfig::pool(), |config, &kind| {
        config.with_base(kind, 1).with_overflow(kind, 1)
    })
}

/// `n` pseudo-random keys derived from `seed`.
///
/// Same seed, same keys. Values are the splitmix64 stream, so they are
/// distinct in practice and spread across the full `u64` range.
pub fn key_sequence(seed: u64, n: usize) -> Vec<u64> {
    (0..n as u64)
        .map(|i| SplitMix64::hash(seed.wrapping_add(i.wrapping_mul(0x9E37_79B9_7F4A_7C15))))
        .collect()
}

/// One step of a churn workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChurnOp {
    /// Create one object.
    Create,
    /// Destroy the live object at this position (modulo the live count).
    Destroy(usize),
}

/// A create/destroy interleaving of `steps` operations.
///
/// Never destroys when nothing is live, and creates roughly twice as
/// often as it destroys, so the live set grows over the run.
pub fn churn_schedule(seed: u64, steps: usize) -> Vec<ChurnOp> {
    let mut live = 0usize;
    key_sequence(seed, steps)
        .into_iter()
        .map(|r| {
            if live == 0 || r % 3 != 0 {
                live += 1;
                ChurnOp::Create
            } else {
                live -= 1;
                ChurnOp::Destroy((r >> 8) as usize % (live + 1))
            }
        })
        .collect()
}
