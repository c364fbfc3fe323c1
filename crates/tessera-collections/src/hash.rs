//! Integer keys and the hash functions applied to them.

use std::fmt::Debug;
use std::hash::Hash;

/// An integral key accepted by [`IntKeyHashMap`](crate::IntKeyHashMap).
///
/// Keys are widened to `u64` before hashing. Signed keys are
/// sign-extended, so `-1i32` and `-1i64` hash identically.
pub trait IntKey: Copy + Eq + Hash + Debug + Default {
    /// The key widened to 64 bits.
    fn to_u64(self) -> u64;
}

macro_rules! impl_int_key {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntKey for $t {
                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_int_key!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// A hash function over widened integer keys.
pub trait KeyHash {
    /// Hash a widened key.
    fn hash(key: u64) -> u64;
}

/// The splitmix64 finalizer.
///
/// Sequential keys land in well-spread home slots, which keeps the
/// in-array chains short.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitMix64;

impl KeyHash for SplitMix64 {
    #[inline]
    fn hash(key: u64) -> u64 {
        let mut z = key.wrapping_add(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}
