//! Wrappers over the x86-64 instructions used by the word primitives. Each wrapper enables its
//! instruction at function scope, so the crate builds without any global target-feature flags
//! and the feature check stays with the caller.

/// Counts the set bits in `word` with the dedicated population count instruction.
///
/// # Safety
/// The executing CPU must support the `popcnt` instruction. Callers establish this through the
/// standard library's cached feature check (see
/// [`HostFeatures::detect`][crate::caps::HostFeatures::detect]); executing the wrapper without
/// it raises an illegal instruction fault.
#[target_feature(enable = "popcnt")]
#[allow(clippy::cast_possible_truncation)] // the count of a 64-bit word is at most 64
#[allow(clippy::cast_sign_loss)]
#[inline]
pub unsafe fn popcnt_u64(word: u64) -> u32 {
    std::arch::x86_64::_popcnt64(word as i64) as u32
}
