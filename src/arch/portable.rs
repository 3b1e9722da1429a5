//! Portable implementations of the word primitives, available on every target. These define
//! the reference behavior; accelerated wrappers must agree with them bit for bit.

/// Counts the set bits in `word` using the standard library's bit arithmetic. On builds that
/// already assume a population count instruction this compiles to that instruction anyway; the
/// function exists so callers have a name for the path that is safe everywhere.
#[inline(always)]
#[must_use]
pub const fn popcount_u64(word: u64) -> u32 {
    word.count_ones()
}
