//! Resolution of the optional CPU capabilities a bitmap engine may exploit. The resolver turns
//! the compile-time target configuration, the host's feature report, and one caller policy into
//! an immutable [`CpuCaps`] record. Kernels branch on the record instead of probing the CPU at
//! every call site, so the whole engine agrees on a single answer for the lifetime of the
//! process.
//!
//! [`CpuCaps::resolve`] is a pure function and can be called with arbitrary inputs, which is
//! how the tests exercise configurations the build machine does not have. The record for the
//! running process comes from [`capabilities`], which resolves once on first use and caches the
//! result. A non-default [`VectorPolicy`] can be installed with [`init_with_policy`] before the
//! first use; afterwards the record never changes.

use crate::bits::PopcountImpl;
use std::sync::OnceLock;

/// The processor family a build targets. Only the x86-64 family currently carries optional
/// capabilities; the variant set covers the families bitmap engines are commonly deployed on so
/// that serialized capability records name their origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Arch {
    /// 64-bit x86, the only family with vectorized bitmap kernels
    X86_64,
    /// 32-bit x86
    X86,
    /// 64-bit ARM
    Aarch64,
    /// 32-bit ARM
    Arm,
    /// 64-bit RISC-V
    Riscv64,
    /// any other target
    Other,
}

impl Arch {
    /// Returns the processor family this crate was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            Arch::X86_64
        }
        #[cfg(target_arch = "x86")]
        {
            Arch::X86
        }
        #[cfg(target_arch = "aarch64")]
        {
            Arch::Aarch64
        }
        #[cfg(target_arch = "arm")]
        {
            Arch::Arm
        }
        #[cfg(target_arch = "riscv64")]
        {
            Arch::Riscv64
        }
        #[cfg(not(any(
            target_arch = "x86_64",
            target_arch = "x86",
            target_arch = "aarch64",
            target_arch = "arm",
            target_arch = "riscv64"
        )))]
        {
            Arch::Other
        }
    }

    /// Returns the family name as used in target triples.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::X86 => "x86",
            Arch::Aarch64 => "aarch64",
            Arch::Arm => "arm",
            Arch::Riscv64 => "riscv64",
            Arch::Other => "other",
        }
    }

    /// Returns true if this is the x86-64 family.
    #[must_use]
    pub const fn is_x64_family(self) -> bool {
        matches!(self, Arch::X86_64)
    }
}

/// The optional x86-64 instruction set extensions relevant to bitmap kernels, as reported by
/// the build configuration and the running CPU. A field is true if the extension is usable:
/// either the compiler was instructed to assume it, or the host reports it at runtime.
///
/// On architectures other than x86-64 all fields are false; the vectorized and
/// hardware-popcount paths simply do not exist there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HostFeatures {
    /// the 256-bit wide vector extension (AVX2)
    pub avx2: bool,
    /// the second bit manipulation extension (BMI2), providing parallel bit deposit/extract
    pub bmi2: bool,
    /// the dedicated population count instruction
    pub popcnt: bool,
}

impl HostFeatures {
    /// Probes the build configuration and the running CPU for the relevant extensions.
    /// The runtime probe is the standard library's cached feature detection, so repeated
    /// calls do not re-query the CPU.
    #[must_use]
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            Self {
                avx2: cfg!(target_feature = "avx2")
                    || std::arch::is_x86_feature_detected!("avx2"),
                bmi2: cfg!(target_feature = "bmi2")
                    || std::arch::is_x86_feature_detected!("bmi2"),
                popcnt: cfg!(target_feature = "popcnt")
                    || std::arch::is_x86_feature_detected!("popcnt"),
            }
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            Self::none()
        }
    }

    /// Returns a report with every extension absent. This is what non-x86-64 targets detect,
    /// and what tests use to resolve portable capability records.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            avx2: false,
            bmi2: false,
            popcnt: false,
        }
    }
}

/// Caller intent towards the vectorized bitmap kernels. The policy is one value, so opting out
/// and forcing on cannot be requested at the same time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VectorPolicy {
    /// Use the vectorized kernels whenever the build and host provide their prerequisites.
    #[default]
    Auto,
    /// Never use the vectorized kernels, regardless of what the build and host provide.
    /// This is the reproducibility and debugging knob.
    Disabled,
    /// Insist on the vectorized kernels. Prerequisite absence still wins: on a build or host
    /// without the required extensions this resolves exactly like [`VectorPolicy::Auto`],
    /// with every vector capability off.
    Forced,
}

/// The resolved capability record. Every field is plain data: resolution happens once, and
/// kernels dispatch by reading fields rather than re-probing the CPU.
///
/// Records are usually obtained from [`capabilities`] (the process-wide record) or
/// [`CpuCaps::resolve`] (pure resolution from explicit inputs). Constructing a record by hand
/// is possible and cannot cause unsoundness, but a hand-built record defeats the point of
/// resolution: downstream kernels trust these fields when choosing instruction paths.
///
/// # Example
/// ```rust
/// use bitcaps::{Arch, CpuCaps, HostFeatures, VectorPolicy};
///
/// let host = HostFeatures { avx2: true, bmi2: true, popcnt: true };
/// let caps = CpuCaps::resolve(Arch::X86_64, host, VectorPolicy::Auto);
///
/// assert!(caps.wide_vector);
/// // the dependent capabilities are granted together with the vector capability
/// assert!(caps.bit_manip && caps.decode_vector && caps.vector_union);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CpuCaps {
    /// the processor family the record was resolved for
    pub arch: Arch,
    /// wide-vector kernels may be used
    pub wide_vector: bool,
    /// bit-manipulation-instruction kernels may be used; never granted without [`Self::wide_vector`]
    pub bit_manip: bool,
    /// vectorized container-decode paths are opted in
    pub decode_vector: bool,
    /// vectorized set-union paths are opted in
    pub vector_union: bool,
    /// the target is an x86-64-class processor
    pub x64: bool,
    /// the population count implementation selected for this record
    pub popcount: PopcountImpl,
}

impl CpuCaps {
    /// Resolves a capability record from explicit inputs. This is a pure function: no I/O, no
    /// global state, and no failure path, since the absence of a capability is a valid outcome
    /// rather than an error.
    ///
    /// The vectorized kernels use the wide vector extension and the bit manipulation extension
    /// together, so the two are granted as a unit: `wide_vector` is on only when `features`
    /// reports both, and `bit_manip`, `decode_vector` and `vector_union` follow it. The policy
    /// can keep the vector capabilities off, but it cannot turn them on without the
    /// prerequisites (see [`VectorPolicy::Forced`]).
    ///
    /// The hardware population count is selected independently of the vector policy: disabling
    /// vectorization does not force bitmap rank queries onto the slow path.
    ///
    /// # Example
    /// ```rust
    /// use bitcaps::{Arch, CpuCaps, HostFeatures, PopcountImpl, VectorPolicy};
    ///
    /// // forcing vectorization on a host without the prerequisites yields nothing
    /// let host = HostFeatures { avx2: true, bmi2: false, popcnt: true };
    /// let caps = CpuCaps::resolve(Arch::X86_64, host, VectorPolicy::Forced);
    /// assert!(!caps.wide_vector);
    ///
    /// // the popcount selection is unaffected by the missing vector extension
    /// assert_eq!(caps.popcount, PopcountImpl::Hardware);
    /// ```
    #[must_use]
    pub fn resolve(arch: Arch, features: HostFeatures, policy: VectorPolicy) -> Self {
        let prerequisites = features.avx2 && features.bmi2;
        let wide_vector = match policy {
            VectorPolicy::Disabled => false,
            // force requests are still bounded by what the build and host provide
            VectorPolicy::Auto | VectorPolicy::Forced => prerequisites,
        };

        // the wide vector extension exists only on the x86-64 family, so an active vector
        // capability classifies the target as x64 even when the arch input claims otherwise
        let x64 = arch.is_x64_family() || wide_vector;

        Self {
            arch,
            wide_vector,
            bit_manip: wide_vector,
            decode_vector: wide_vector,
            vector_union: wide_vector,
            x64,
            popcount: if x64 && features.popcnt {
                PopcountImpl::Hardware
            } else {
                PopcountImpl::Generic
            },
        }
    }

    /// Resolves the record for the current build and host with the default policy.
    /// Unlike [`capabilities`] this performs a fresh resolution on every call, which is only
    /// useful when the cached record must be bypassed.
    #[must_use]
    pub fn detect() -> Self {
        Self::resolve(Arch::current(), HostFeatures::detect(), VectorPolicy::default())
    }
}

static CAPABILITIES: OnceLock<CpuCaps> = OnceLock::new();

/// Returns the capability record of the running process. The first call resolves it with
/// [`VectorPolicy::Auto`] (unless [`init_with_policy`] installed a record earlier) and caches
/// it; subsequent calls return the cached record. Thread-safe: concurrent first calls resolve
/// the same inputs and agree on the result.
///
/// # Example
/// ```rust
/// use bitcaps::capabilities;
///
/// let caps = capabilities();
/// // the record is stable for the lifetime of the process
/// assert_eq!(caps, capabilities());
/// ```
#[inline]
#[must_use]
pub fn capabilities() -> CpuCaps {
    *CAPABILITIES.get_or_init(CpuCaps::detect)
}

/// Resolves the process-wide capability record with the given policy, if no record has been
/// installed yet, and returns the record that is in effect afterwards.
///
/// This is the one configuration knob of the crate. Call it once, early, before anything
/// queries [`capabilities`]; a call that loses the race (or arrives after the record is
/// already cached) leaves the installed record untouched and returns it, so the result always
/// reflects what the process is actually using. There is no way to re-resolve afterwards,
/// which is what lets kernels read the record without synchronization concerns.
///
/// # Example
/// ```rust
/// use bitcaps::{init_with_policy, VectorPolicy};
///
/// let caps = init_with_policy(VectorPolicy::Disabled);
/// // whatever record is in effect, the entailment structure holds
/// assert_eq!(caps.bit_manip, caps.wide_vector);
/// ```
pub fn init_with_policy(policy: VectorPolicy) -> CpuCaps {
    *CAPABILITIES
        .get_or_init(|| CpuCaps::resolve(Arch::current(), HostFeatures::detect(), policy))
}

#[cfg(test)]
mod tests;
