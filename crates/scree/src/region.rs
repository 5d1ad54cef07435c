//! Fixed-capacity region storage with bump allocation and LIFO reclaim.
//!
//! [`Region`] owns an aligned byte buffer of fixed size and serves
//! sub-allocations from a monotonically advancing cursor. Freeing reclaims
//! space only when the freed block is literally the top of the stack;
//! everything else becomes dead space until the region is dropped. This is
//! the only module that manipulates raw buffer memory.

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::cell::Cell;
use std::fmt;
use std::ptr::NonNull;

use crate::config::RegionConfig;
use crate::error::RegionError;

/// A fixed-capacity memory region served by a bump cursor.
///
/// The region is the sole owner of its buffer. Views
/// ([`TypedAlloc`](crate::TypedAlloc)) borrow it, so the borrow checker
/// guarantees the region outlives every container drawing from it, and the
/// region cannot be moved while any view exists. There is no `Clone`:
/// duplicating a region that views alias would silently invalidate the
/// aliasing.
///
/// All allocation state lives in a `Cell`, which (together with the raw
/// buffer pointer) makes `Region` neither `Send` nor `Sync`; concurrent
/// use does not compile.
pub struct Region {
    /// Start of the owned buffer. Aligned to `config.alignment`.
    buf: NonNull<u8>,
    /// Capacity and alignment, fixed at construction.
    config: RegionConfig,
    /// Offset of the next free byte. Always a multiple of the alignment
    /// and never greater than the capacity.
    cursor: Cell<usize>,
}

impl Region {
    /// Create a region from a validated configuration.
    ///
    /// The buffer is allocated once, at the configured alignment, and is
    /// uninitialized: callers construct values into the storage they are
    /// handed. Aborts via [`handle_alloc_error`] only if the host allocator
    /// cannot provide the backing buffer.
    pub fn new(config: RegionConfig) -> Result<Self, RegionError> {
        config.validate()?;
        let layout = Layout::from_size_align(config.capacity, config.alignment).map_err(|_| {
            RegionError::CapacityTooLarge {
                capacity: config.capacity,
            }
        })?;
        // SAFETY: `validate` rejects zero capacity, so `layout` has
        // non-zero size as `alloc` requires.
        let raw = unsafe { alloc(layout) };
        let buf = NonNull::new(raw).unwrap_or_else(|| handle_alloc_error(layout));
        Ok(Self {
            buf,
            config,
            cursor: Cell::new(0),
        })
    }

    /// Create a region with the given capacity and the default alignment.
    pub fn with_capacity(capacity: usize) -> Result<Self, RegionError> {
        Self::new(RegionConfig::new(capacity))
    }

    /// Allocate `size` bytes at the given alignment.
    ///
    /// The size is rounded up to the next multiple of the region's
    /// alignment, so the cursor (and every returned pointer) stays aligned
    /// without per-request adjustment. Returns uninitialized storage.
    ///
    /// A zero-byte request succeeds without advancing the cursor.
    ///
    /// # Errors
    ///
    /// [`RegionError::CapacityExceeded`] if the unused tail of the buffer
    /// cannot hold the rounded size. The region is left unchanged; there is
    /// no fallback to the general heap.
    ///
    /// # Panics
    ///
    /// Panics if `align` exceeds the region's configured alignment.
    /// Requesting a stricter alignment than the region guarantees is a
    /// programmer error, not a runtime condition.
    pub fn allocate(&self, size: usize, align: usize) -> Result<NonNull<u8>, RegionError> {
        assert!(
            align <= self.config.alignment,
            "requested alignment {align} exceeds region alignment {}",
            self.config.alignment
        );
        let aligned = self.align_up(size)?;
        let cursor = self.cursor.get();
        let remaining = self.config.capacity - cursor;
        if aligned > remaining {
            return Err(RegionError::CapacityExceeded {
                requested: aligned,
                remaining,
            });
        }
        self.cursor.set(cursor + aligned);
        // SAFETY: `cursor + aligned <= capacity`, so the offset stays
        // within (or one past the end of) the buffer allocation, and
        // `capacity <= isize::MAX` by construction.
        Ok(unsafe { NonNull::new_unchecked(self.buf.as_ptr().add(cursor)) })
    }

    /// Return `size` bytes at `ptr` to the region.
    ///
    /// If `ptr + rounded size` is exactly the cursor (the block is the
    /// most recent live allocation), the cursor retracts and the space is
    /// reused by future allocations. Otherwise the call is a no-op and the
    /// block stays dead for the region's lifetime. Pointers outside the
    /// buffer are ignored; only the containment bound is checked.
    ///
    /// # Safety
    ///
    /// `ptr` must be a pointer previously returned by [`Region::allocate`]
    /// on this region with the same `size` (foreign pointers are tolerated
    /// as a no-op, but that cannot be distinguished from a stale in-buffer
    /// pointer), and the block must not be read or written after this call.
    pub unsafe fn deallocate(&self, ptr: NonNull<u8>, size: usize) {
        if !self.contains(ptr) {
            return;
        }
        let Ok(aligned) = self.align_up(size) else {
            return;
        };
        let offset = ptr.as_ptr() as usize - self.buf.as_ptr() as usize;
        if offset.checked_add(aligned) == Some(self.cursor.get()) {
            self.cursor.set(offset);
        }
    }

    /// Discard every allocation and return the cursor to the start.
    ///
    /// Requires exclusive access, so no view (and therefore no container)
    /// can still reference the region. The buffer is not zeroed.
    pub fn reset(&mut self) {
        self.cursor.set(0);
    }

    /// Whether `ptr` lies within the region's buffer.
    ///
    /// The one-past-the-end address is included: it is a pointer the
    /// region legitimately hands out for a zero-byte request at full
    /// capacity.
    pub fn contains(&self, ptr: NonNull<u8>) -> bool {
        let start = self.buf.as_ptr() as usize;
        let addr = ptr.as_ptr() as usize;
        addr >= start && addr <= start + self.config.capacity
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Alignment guaranteed to every allocation, in bytes.
    pub fn alignment(&self) -> usize {
        self.config.alignment
    }

    /// Bytes currently allocated, including dead space from non-LIFO frees.
    pub fn used(&self) -> usize {
        self.cursor.get()
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.config.capacity - self.cursor.get()
    }

    /// Round `size` up to the next multiple of the region's alignment.
    fn align_up(&self, size: usize) -> Result<usize, RegionError> {
        let mask = self.config.alignment - 1;
        size.checked_add(mask)
            .map(|n| n & !mask)
            .ok_or(RegionError::CapacityExceeded {
                requested: size,
                remaining: self.remaining(),
            })
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("capacity", &self.config.capacity)
            .field("alignment", &self.config.alignment)
            .field("used", &self.used())
            .finish()
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        // SAFETY: `buf` was allocated in `Region::new` with exactly this
        // size and alignment, which `validate` accepted at construction.
        unsafe {
            dealloc(
                self.buf.as_ptr(),
                Layout::from_size_align_unchecked(self.config.capacity, self.config.alignment),
            );
        }
    }
}
