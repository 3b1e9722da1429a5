//! Selection of the intrinsic access paths for the compilation target. Per-target submodules
//! are compiled only for their target, so a reference to a wrapper the target does not have is
//! a build error instead of a runtime fault. The portable module is always present and defines
//! the reference behavior the accelerated wrappers must agree with.

#[cfg(target_arch = "x86_64")]
pub mod x86_64;

pub mod portable;
