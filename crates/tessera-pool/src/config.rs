//! Lifecycle configuration, validation, and error types.
//!
//! [`LifecycleConfig`] is read once when a context is created. It picks the
//! allocation mode and, for pool mode, overrides the built-in per-kind slot
//! counts for the shared base block and for overflow blocks.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tessera_core::StructureKind;

// ── AllocMode ──────────────────────────────────────────────────────

/// How objects are allocated for the lifetime of a context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocMode {
    /// Every object is boxed individually on the general heap.
    #[default]
    Individual,
    /// Objects are carved from per-kind slots in a memory pool.
    Pool,
}

// ── Reservation ────────────────────────────────────────────────────

/// A slot count override for one structure kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Kind the count applies to.
    pub kind: StructureKind,
    /// Number of slots to reserve. Must be non-zero.
    pub count: u64,
}

impl Reservation {
    /// Reserve `count` slots for `kind`.
    pub const fn new(kind: StructureKind, count: u64) -> Self {
        Self { kind, count }
    }
}

/// Which reservation list an entry came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReservationList {
    /// `base_reservations`: the kind's share of the shared base block.
    Base,
    /// `overflow_reservations`: the size of each overflow block.
    Overflow,
}

impl std::fmt::Display for ReservationList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Base => f.write_str("base"),
            Self::Overflow => f.write_str("overflow"),
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while loading or validating a [`LifecycleConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A reservation asked for zero slots.
    #[error("{list} reservation #{position} for {kind} has a count of 0")]
    ZeroReservation {
        /// The offending kind.
        kind: StructureKind,
        /// The list the entry appears in.
        list: ReservationList,
        /// Position of the entry within its list.
        position: usize,
    },
    /// The TOML source could not be parsed.
    #[error("invalid lifecycle config: {reason}")]
    Parse {
        /// Parser diagnostic.
        reason: String,
    },
}

// ── LifecycleConfig ────────────────────────────────────────────────

/// Allocation settings consumed when a context is created.
///
/// ```
/// use tessera_core::StructureKind;
/// use tessera_pool::config::{AllocMode, LifecycleConfig};
///
/// let config = LifecycleConfig::from_toml_str(
///     r#"
///     mode = "pool"
///
///     [[base_reservations]]
///     kind = "window"
///     count = 2
///
///     [[overflow_reservations]]
///     kind = "window"
///     count = 4
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.mode, AllocMode::Pool);
/// assert_eq!(config.base_count(StructureKind::Window), 2);
/// assert_eq!(config.overflow_count(StructureKind::Window), 4);
/// assert_eq!(config.base_count(StructureKind::Shader), 32);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Allocation mode. Default: [`AllocMode::Individual`].
    pub mode: AllocMode,
    /// Overrides for each kind's share of the shared base block.
    pub base_reservations: Vec<Reservation>,
    /// Overrides for the slot count of each overflow block.
    pub overflow_reservations: Vec<Reservation>,
}

impl LifecycleConfig {
    /// Individual mode. Reservations are ignored.
    pub fn individual() -> Self {
        Self::default()
    }

    /// Pool mode with the built-in counts for every kind.
    pub fn pool() -> Self {
        Self {
            mode: AllocMode::Pool,
            ..Self::default()
        }
    }

    /// Add a base reservation override.
    pub fn with_base(mut self, kind: StructureKind, count: u64) -> Self {
        self.base_reservations.push(Reservation::new(kind, count));
        self
    }

    /// Add an overflow reservation override.
    pub fn with_overflow(mut self, kind: StructureKind, count: u64) -> Self {
        self.overflow_reservations.push(Reservation::new(kind, count));
        self
    }

    /// Parse a config from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Check structural invariants.
    ///
    /// Only pool mode reads the reservation lists, so individual mode
    /// always validates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode == AllocMode::Individual {
            return Ok(());
        }
        let lists = [
            (ReservationList::Base, &self.base_reservations),
            (ReservationList::Overflow, &self.overflow_reservations),
        ];
        for (list, reservations) in lists {
            for (position, r) in reservations.iter().enumerate() {
                if r.count == 0 {
                    return Err(ConfigError::ZeroReservation {
                        kind: r.kind,
                        list,
                        position,
                    });
                }
            }
        }
        Ok(())
    }

    /// Base overrides by kind, in first-appearance order. A later entry
    /// for the same kind replaces an earlier one.
    pub fn base_overrides(&self) -> IndexMap<StructureKind, u64> {
        normalise(&self.base_reservations)
    }

    /// Overflow overrides by kind, normalised like
    /// [`base_overrides`](Self::base_overrides).
    pub fn overflow_overrides(&self) -> IndexMap<StructureKind, u64> {
        normalise(&self.overflow_reservations)
    }

    /// Effective slot count of `kind`'s share of the base block.
    pub fn base_count(&self, kind: StructureKind) -> u64 {
        self.base_overrides()
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_reserved_count())
    }

    /// Effective slot count of each overflow block for `kind`.
    ///
    /// Falls back to the built-in count, not to the base override.
    pub fn overflow_count(&self, kind: StructureKind) -> u64 {
        self.overflow_overrides()
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_reserved_count())
    }
}

fn normalise(reservations: &[Reservation]) -> IndexMap<StructureKind, u64> {
    let mut map = IndexMap::with_capacity(reservations.len());
    for r in reservations {
        map.insert(r.kind, r.count);
    }
    map
}
