//! Aligned heap allocation for bitmap storage. Vectorized kernels load whole lanes and rank
//! directories sit on cache line boundaries, so container memory is requested with explicit
//! alignment. The backing strategy is fixed per build configuration; call sites only see the
//! allocate/release contract.
//!
//! Failure is reported through the null sentinel rather than a panic, because allocation sits
//! on the container growth path and the embedding engine decides how to surface exhaustion.

use std::alloc::Layout;
use std::ptr;

/// The allocation strategy backing [`aligned_alloc`]. The build selects one variant through
/// [`AllocBackend::current`]; the variants differ only in which platform primitive they call,
/// the contract is the same.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AllocBackend {
    /// the POSIX aligned allocation primitive, `posix_memalign` paired with `free`
    #[cfg(unix)]
    Posix,
    /// the Rust global allocator with an explicit layout
    Global,
}

impl AllocBackend {
    /// Returns the backend selected for this build: [`AllocBackend::Posix`] on unix platforms
    /// and [`AllocBackend::Global`] everywhere else. On Windows the global allocator already
    /// routes aligned layouts to the platform's native aligned allocation.
    #[must_use]
    pub const fn current() -> Self {
        #[cfg(unix)]
        {
            AllocBackend::Posix
        }
        #[cfg(not(unix))]
        {
            AllocBackend::Global
        }
    }

    /// Allocates `size` bytes at a multiple of `alignment` with this backend. The contract is
    /// that of [`aligned_alloc`]: null on any failure, never a panic.
    #[must_use]
    pub fn alloc(self, alignment: usize, size: usize) -> *mut u8 {
        // no backend can represent a zero-byte allocation
        if size == 0 {
            return ptr::null_mut();
        }
        match self {
            #[cfg(unix)]
            AllocBackend::Posix => posix_alloc(alignment, size),
            AllocBackend::Global => global_alloc(alignment, size),
        }
    }

    /// Releases memory obtained from [`AllocBackend::alloc`] on this same backend. Null is
    /// accepted and ignored.
    ///
    /// # Safety
    /// `ptr` must be null, or a pointer obtained from [`AllocBackend::alloc`] on this backend
    /// with the same `alignment` and `size` that has not been released yet.
    pub unsafe fn free(self, ptr: *mut u8, alignment: usize, size: usize) {
        if ptr.is_null() {
            return;
        }
        match self {
            #[cfg(unix)]
            AllocBackend::Posix => libc::free(ptr.cast::<libc::c_void>()),
            AllocBackend::Global => {
                // the layout was accepted when the allocation succeeded
                let layout = Layout::from_size_align_unchecked(size, alignment);
                std::alloc::dealloc(ptr, layout);
            }
        }
    }
}

#[cfg(unix)]
fn posix_alloc(alignment: usize, size: usize) -> *mut u8 {
    let mut raw = ptr::null_mut::<libc::c_void>();
    // a nonzero return means no allocation took place and the out pointer is untouched
    let rc = unsafe { libc::posix_memalign(&mut raw, alignment, size) };
    if rc != 0 {
        return ptr::null_mut();
    }
    raw.cast::<u8>()
}

fn global_alloc(alignment: usize, size: usize) -> *mut u8 {
    let Ok(layout) = Layout::from_size_align(size, alignment) else {
        return ptr::null_mut();
    };
    // size is nonzero here, and a null return is the failure report we pass through
    unsafe { std::alloc::alloc(layout) }
}

/// Allocates `size` bytes of heap memory whose address is a multiple of `alignment`, using the
/// backend this build selected (see [`AllocBackend::current`]).
///
/// Returns the null pointer on any failure: memory exhaustion, a layout the backend rejects,
/// or a zero-byte request. This function never panics.
///
/// `alignment` must be a power of two, and the POSIX backend additionally requires a multiple
/// of the pointer size; this is the caller's responsibility. Bitmap engines align container
/// storage to vector lanes or cache lines (16 to 64 bytes), which satisfies every backend.
///
/// Memory obtained here must be released with [`aligned_free`] under the same alignment and
/// size, never handed to the global allocator directly.
///
/// # Example
/// ```rust
/// use bitcaps::{aligned_alloc, aligned_free};
///
/// let ptr = aligned_alloc(64, 1 << 13);
/// assert!(!ptr.is_null());
/// assert_eq!(ptr as usize % 64, 0);
///
/// // a container would keep its limbs here
/// unsafe { aligned_free(ptr, 64, 1 << 13) };
/// ```
#[must_use]
pub fn aligned_alloc(alignment: usize, size: usize) -> *mut u8 {
    AllocBackend::current().alloc(alignment, size)
}

/// Releases memory obtained from [`aligned_alloc`]. Null is accepted and ignored.
///
/// # Safety
/// `ptr` must be null, or a pointer returned by [`aligned_alloc`] with the same `alignment`
/// and `size` that has not been released yet.
pub unsafe fn aligned_free(ptr: *mut u8, alignment: usize, size: usize) {
    AllocBackend::current().free(ptr, alignment, size);
}
