//! Byte-order probe. Serialized bitmap containers are written little-endian, so big-endian
//! hosts take byte-swapping paths when reading and writing container words; this module gives
//! them a compile-time constant to branch on.

/// True if the target stores the most significant byte of a word first.
///
/// The probe inspects the native layout of a two-byte integer and is evaluated at compile
/// time, so the constant folds away and dependent branches disappear from the generated code.
///
/// # Example
/// ```rust
/// use bitcaps::IS_BIG_ENDIAN;
///
/// let first_byte = 0x0102_0304_u32.to_ne_bytes()[0];
/// assert_eq!(first_byte == 0x01, IS_BIG_ENDIAN);
/// ```
pub const IS_BIG_ENDIAN: bool = u16::from_ne_bytes([0, 0xff]) < 0x100;

/// Returns [`IS_BIG_ENDIAN`], for call sites that want the probe as a function.
#[inline(always)]
#[must_use]
pub const fn is_big_endian() -> bool {
    IS_BIG_ENDIAN
}
