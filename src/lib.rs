#![warn(missing_docs)]

//! This crate provides the hardware capability layer for compressed bitmap engines. Bitmap
//! kernels (rank, select, union, intersection, decode) are typically written twice, once
//! portably and once against optional CPU extensions, and choosing the wrong variant is either
//! an illegal-instruction fault or silent garbage. This crate resolves what the current build
//! and host actually support into explicit, immutable data, and supplies the few word-level
//! primitives every bitmap engine needs regardless of CPU.
//!
//! # Components
//!  - [Capability record][caps::CpuCaps]: the vector, bit-manipulation, and population-count
//!    capabilities of the current build and host, resolved once by a pure function and exposed
//!    as plain data for kernels to branch on.
//!  - [Population count][bits::popcount] over 64-bit words, dispatched through a
//!    [selected implementation][bits::PopcountImpl] instead of being re-probed at every call.
//!  - [Aligned allocation][aligned::aligned_alloc] for cache-line and vector-lane aligned
//!    bitmap storage, with a [per-platform backend][aligned::AllocBackend] and a null
//!    sentinel on failure.
//!  - [Byte-order probe][endian::IS_BIG_ENDIAN], evaluated at compile time.
//!
//! # Capability resolution
//! The vectorized paths require both the wide vector extension and the bit-manipulation
//! extension. [`CpuCaps::resolve`][caps::CpuCaps::resolve] grants them together or not at all,
//! and a [`VectorPolicy`][caps::VectorPolicy] lets the embedding engine opt out of (or insist
//! on) vectorization. Insisting never overrides reality: if the prerequisites are absent, the
//! capability stays off. The resolved record for the running process is available through
//! [`capabilities`][caps::capabilities] and can be configured once, before first use, with
//! [`init_with_policy`][caps::init_with_policy].
//!
//! # Intrinsics
//! The only instruction this crate executes directly is `popcnt` (supported since SSE4.2 resp.
//! SSE4a on AMD, 2007-2008). It is not forcibly enabled: the wrapper is compiled behind a
//! runtime check of the CPU's feature report, so the crate builds and runs on any x86_64
//! machine and on non-x86_64 architectures, falling back to portable bit arithmetic where the
//! instruction is unavailable.
//!
//! # Safety
//! This crate uses unsafe code in two places: the `popcnt` intrinsic wrapper, which is only
//! reached after the standard library's cached feature detection confirms the instruction, and
//! the allocation primitives, which hand out and release raw pointers under a contract stated
//! on each function. Everything else is safe code.

// Limbs, rank blocks, and the allocation size math all assume 64-bit words.
#[cfg(not(target_pointer_width = "64"))]
compile_error!("bitcaps requires a target with 64-bit pointers");

pub use aligned::{aligned_alloc, aligned_free, AllocBackend};
pub use bits::{bit_scan_forward, bit_scan_reverse, popcount, popcount_slice, PopcountImpl};
pub use caps::{capabilities, init_with_policy, Arch, CpuCaps, HostFeatures, VectorPolicy};
pub use endian::{is_big_endian, IS_BIG_ENDIAN};

pub mod aligned;
pub mod arch;
pub mod bits;
pub mod caps;
pub mod endian;
