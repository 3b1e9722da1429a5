//! Word-level primitives for bitmap kernels: population count behind a once-selected
//! implementation tag, and the bit scans select queries are built from.

use crate::arch::portable;
use crate::caps::capabilities;

/// The population count implementation selected for a capability record. The variant is chosen
/// once, during [capability resolution][crate::caps::CpuCaps::resolve], and call sites dispatch
/// on the tag instead of re-probing the CPU.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PopcountImpl {
    /// the dedicated hardware instruction
    Hardware,
    /// portable bit arithmetic, correct on every target
    #[default]
    Generic,
}

impl PopcountImpl {
    /// Counts the set bits of `word` with the selected implementation.
    ///
    /// Both variants are safe to call with any value on any host. The `Hardware` variant
    /// consults the standard library's cached feature check before touching the instruction,
    /// so a record built by hand on a host without the instruction degrades to the portable
    /// path instead of faulting.
    ///
    /// # Example
    /// ```rust
    /// use bitcaps::PopcountImpl;
    ///
    /// // the variants agree on every input
    /// assert_eq!(PopcountImpl::Hardware.count(0xFF00), PopcountImpl::Generic.count(0xFF00));
    /// assert_eq!(PopcountImpl::Generic.count(u64::MAX), 64);
    /// ```
    #[inline]
    #[must_use]
    pub fn count(self, word: u64) -> u32 {
        match self {
            PopcountImpl::Hardware => hardware_count(word),
            PopcountImpl::Generic => portable::popcount_u64(word),
        }
    }

    /// Counts the set bits across all of `words`. This is the bulk form bitmap rank kernels
    /// call on container limbs; the implementation tag is consulted once for the whole slice.
    #[must_use]
    pub fn count_slice(self, words: &[u64]) -> u64 {
        match self {
            PopcountImpl::Hardware => words.iter().map(|&w| u64::from(hardware_count(w))).sum(),
            PopcountImpl::Generic => words
                .iter()
                .map(|&w| u64::from(portable::popcount_u64(w)))
                .sum(),
        }
    }
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn hardware_count(word: u64) -> u32 {
    // the standard library caches the feature check, so this is a load and a branch
    if std::arch::is_x86_feature_detected!("popcnt") {
        unsafe { crate::arch::x86_64::popcnt_u64(word) }
    } else {
        portable::popcount_u64(word)
    }
}

#[cfg(not(target_arch = "x86_64"))]
#[inline(always)]
fn hardware_count(word: u64) -> u32 {
    portable::popcount_u64(word)
}

/// Counts the set bits in `word` with the implementation selected in the process-wide
/// [capability record][crate::caps::capabilities].
///
/// # Example
/// ```rust
/// use bitcaps::popcount;
///
/// assert_eq!(popcount(0), 0);
/// assert_eq!(popcount(0b1011), 3);
/// assert_eq!(popcount(u64::MAX), 64);
/// ```
#[inline]
#[must_use]
pub fn popcount(word: u64) -> u32 {
    capabilities().popcount.count(word)
}

/// Counts the set bits across all of `words` with the implementation selected in the
/// process-wide [capability record][crate::caps::capabilities]. Rank queries over container
/// limbs reduce to this.
///
/// # Example
/// ```rust
/// use bitcaps::popcount_slice;
///
/// assert_eq!(popcount_slice(&[]), 0);
/// assert_eq!(popcount_slice(&[u64::MAX, 0, 0b111]), 67);
/// ```
#[must_use]
pub fn popcount_slice(words: &[u64]) -> u64 {
    capabilities().popcount.count_slice(words)
}

/// Returns the index of the least significant set bit of `word`, or `None` if there is none.
/// Select kernels use this to locate the next one in a limb.
///
/// # Example
/// ```rust
/// use bitcaps::bit_scan_forward;
///
/// assert_eq!(bit_scan_forward(0), None);
/// assert_eq!(bit_scan_forward(0b1000), Some(3));
/// assert_eq!(bit_scan_forward(u64::MAX), Some(0));
/// ```
#[inline]
#[must_use]
pub const fn bit_scan_forward(word: u64) -> Option<u32> {
    if word == 0 {
        None
    } else {
        Some(word.trailing_zeros())
    }
}

/// Returns the index of the most significant set bit of `word`, or `None` if there is none.
///
/// # Example
/// ```rust
/// use bitcaps::bit_scan_reverse;
///
/// assert_eq!(bit_scan_reverse(0), None);
/// assert_eq!(bit_scan_reverse(0b1000), Some(3));
/// assert_eq!(bit_scan_reverse(u64::MAX), Some(63));
/// ```
#[inline]
#[must_use]
pub const fn bit_scan_reverse(word: u64) -> Option<u32> {
    if word == 0 {
        None
    } else {
        Some(63 - word.leading_zeros())
    }
}
