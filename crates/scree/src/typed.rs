//! Typed views over a shared [`Region`].
//!
//! [`TypedAlloc`] translates element-count requests into byte/alignment
//! requests on a borrowed region, so a family of views over different
//! element types (a container's value type, its internal node type) can
//! draw from one region. The view is a stateless pass-through: it owns
//! nothing, copies freely, and carries no state that must be released.
//!
//! The [`Allocator`] implementation is the container-facing capability:
//! any allocator-aware container (`allocator_api2::vec::Vec`,
//! `allocator_api2::boxed::Box`, …) can consume a view directly.

use std::alloc::Layout;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use allocator_api2::alloc::{AllocError, Allocator};

use crate::error::RegionError;
use crate::region::Region;

/// A per-element-type view over a shared [`Region`].
///
/// Views are cheap value types: copying one duplicates the region
/// reference, never the buffer. Two views are equal (interchangeable for
/// container bookkeeping) iff they reference the same region instance,
/// regardless of their element types; the region carries the capacity and
/// alignment, so region identity fixes both.
pub struct TypedAlloc<'r, T> {
    region: &'r Region,
    _marker: PhantomData<fn() -> T>,
}

impl<'r, T> TypedAlloc<'r, T> {
    /// Create a view over `region` for element type `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` requires stricter alignment than the region
    /// guarantees. Binding such a type is a programmer error caught at
    /// view construction, before any allocation can go wrong.
    pub fn new(region: &'r Region) -> Self {
        assert!(
            mem::align_of::<T>() <= region.alignment(),
            "element alignment {} exceeds region alignment {}",
            mem::align_of::<T>(),
            region.alignment()
        );
        Self {
            region,
            _marker: PhantomData,
        }
    }

    /// Allocate storage for `count` elements of `T`.
    ///
    /// The storage is uninitialized; the caller constructs elements into
    /// it. A zero-count (or zero-sized-`T`) request succeeds without
    /// consuming space.
    ///
    /// # Errors
    ///
    /// [`RegionError::SizeOverflow`] if `count * size_of::<T>()`
    /// overflows, [`RegionError::CapacityExceeded`] if the region cannot
    /// hold the request.
    pub fn allocate(&self, count: usize) -> Result<NonNull<T>, RegionError> {
        let bytes =
            mem::size_of::<T>()
                .checked_mul(count)
                .ok_or(RegionError::SizeOverflow {
                    count,
                    element_size: mem::size_of::<T>(),
                })?;
        let ptr = self.region.allocate(bytes, mem::align_of::<T>())?;
        Ok(ptr.cast())
    }

    /// Return storage for `count` elements of `T` to the region.
    ///
    /// Reclaims the space only if the block is the region's most recent
    /// allocation; otherwise a no-op.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`TypedAlloc::allocate`] on a view of the same
    /// region with the same `count`, and the elements must already be
    /// dropped (the view never runs destructors).
    pub unsafe fn deallocate(&self, ptr: NonNull<T>, count: usize) {
        let Some(bytes) = mem::size_of::<T>().checked_mul(count) else {
            // An allocation this large can never have succeeded.
            return;
        };
        // SAFETY: contract forwarded to the caller.
        unsafe { self.region.deallocate(ptr.cast(), bytes) };
    }

    /// Produce a view over the same region for a different element type.
    ///
    /// Containers allocate internal bookkeeping nodes of a different type
    /// than the user-visible element; rebinding lets both draw from the
    /// identical region.
    ///
    /// # Panics
    ///
    /// Panics if `U` requires stricter alignment than the region
    /// guarantees, exactly as [`TypedAlloc::new`] does.
    pub fn rebind<U>(&self) -> TypedAlloc<'r, U> {
        TypedAlloc::new(self.region)
    }

    /// The region this view draws from.
    pub fn region(&self) -> &'r Region {
        self.region
    }
}

impl<T> Clone for TypedAlloc<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedAlloc<'_, T> {}

impl<T> fmt::Debug for TypedAlloc<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedAlloc")
            .field("element_size", &mem::size_of::<T>())
            .field("region", self.region)
            .finish()
    }
}

impl<T, U> PartialEq<TypedAlloc<'_, U>> for TypedAlloc<'_, T> {
    fn eq(&self, other: &TypedAlloc<'_, U>) -> bool {
        std::ptr::eq(self.region, other.region)
    }
}

impl<T> Eq for TypedAlloc<'_, T> {}

// SAFETY: blocks returned by `allocate` stay at their address within the
// region's buffer until deallocated or the region is dropped, and the
// borrow in the view keeps the region alive for the view's lifetime.
// Copies of a view target the same region, so a block may be freed
// through any of them.
unsafe impl<T> Allocator for TypedAlloc<'_, T> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        // The region cannot honour stricter alignment than it was built
        // with; the trait reports that as `AllocError`.
        if layout.align() > self.region.alignment() {
            return Err(AllocError);
        }
        let ptr = self
            .region
            .allocate(layout.size(), layout.align())
            .map_err(|_| AllocError)?;
        Ok(NonNull::slice_from_raw_parts(ptr, layout.size()))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: the caller guarantees `ptr` denotes a block from this
        // allocator with this layout, no longer in use.
        unsafe { self.region.deallocate(ptr, layout.size()) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegionConfig;

    use allocator_api2::boxed::Box as RegionBox;
    use allocator_api2::vec::Vec as RegionVec;

    fn region(capacity: usize, alignment: usize) -> Region {
        Region::new(RegionConfig::with_alignment(capacity, alignment)).unwrap()
    }

    #[test]
    fn counts_convert_to_aligned_bytes() {
        let r = region(256, 8);
        let elems = TypedAlloc::<u32>::new(&r);
        elems.allocate(3).unwrap();
        // 12 bytes rounded up to the region's 8-byte granularity.
        assert_eq!(r.used(), 16);
    }

    #[test]
    fn rebound_views_share_one_region() {
        let r = region(256, 8);
        let wide = TypedAlloc::<u64>::new(&r);
        let narrow = wide.rebind::<u32>();

        let a = wide.allocate(3).unwrap();
        assert_eq!(r.used(), 24);
        let b = narrow.allocate(2).unwrap();
        assert_eq!(r.used(), 32);

        // One cursor: the second block starts where the first ended.
        assert_eq!(a.as_ptr() as usize + 24, b.as_ptr() as usize);
    }

    #[test]
    fn views_over_same_region_compare_equal() {
        let r = region(64, 8);
        let a = TypedAlloc::<u64>::new(&r);
        let b = TypedAlloc::<u32>::new(&r);
        assert!(a == b);
        assert!(a == a.rebind::<[u8; 3]>());
    }

    #[test]
    fn equality_is_region_identity_not_parameters() {
        let r1 = region(64, 8);
        let r2 = region(64, 8);
        let a = TypedAlloc::<u64>::new(&r1);
        let b = TypedAlloc::<u64>::new(&r2);
        assert!(a != b);
    }

    #[test]
    fn lifo_roundtrip_through_view() {
        let r = region(64, 8);
        let elems = TypedAlloc::<u64>::new(&r);
        let p = elems.allocate(4).unwrap();
        assert_eq!(r.used(), 32);
        unsafe { elems.deallocate(p, 4) };
        assert_eq!(r.used(), 0);
    }

    #[test]
    fn zero_sized_elements_consume_nothing() {
        let r = region(64, 8);
        let units = TypedAlloc::<()>::new(&r);
        units.allocate(10).unwrap();
        assert_eq!(r.used(), 0);
    }

    #[test]
    fn element_count_overflow_is_reported() {
        let r = region(64, 8);
        let elems = TypedAlloc::<u64>::new(&r);
        let err = elems.allocate(usize::MAX / 4).unwrap_err();
        assert!(matches!(err, RegionError::SizeOverflow { .. }));
        assert_eq!(r.used(), 0);
    }

    #[test]
    #[should_panic(expected = "exceeds region alignment")]
    fn overaligned_element_type_panics() {
        #[repr(align(32))]
        #[allow(dead_code)]
        struct Overaligned([u8; 32]);

        let r = region(64, 8);
        let _ = TypedAlloc::<Overaligned>::new(&r);
    }

    #[test]
    fn container_vec_draws_from_region() {
        let r = region(4096, 16);
        let elems = TypedAlloc::<u32>::new(&r);

        let mut v = RegionVec::with_capacity_in(8, elems);
        for i in 0..8u32 {
            v.push(i);
        }
        assert_eq!(v.iter().sum::<u32>(), 28);
        assert_eq!(r.used(), 32);

        // The backing store is the top block, so dropping the container
        // returns the region to empty.
        drop(v);
        assert_eq!(r.used(), 0);
    }

    #[test]
    fn container_box_roundtrips() {
        let r = region(64, 16);
        let elems = TypedAlloc::<u64>::new(&r);
        let one = RegionBox::new_in(1u64, elems);
        let two = RegionBox::new_in(2u64, elems);
        assert_eq!(r.used(), 32);
        assert_eq!(*one + *two, 3);
        drop(two);
        drop(one);
        assert_eq!(r.used(), 0);
    }

    #[test]
    fn allocator_rejects_stricter_layout_alignment() {
        let r = region(64, 8);
        let elems = TypedAlloc::<u8>::new(&r);
        let layout = Layout::from_size_align(8, 16).unwrap();
        assert!(Allocator::allocate(&elems, layout).is_err());
        assert_eq!(r.used(), 0);
    }

    #[test]
    fn exhausted_region_reports_alloc_error() {
        let r = region(64, 8);
        let elems = TypedAlloc::<u8>::new(&r);
        let layout = Layout::from_size_align(64, 1).unwrap();
        assert!(Allocator::allocate(&elems, layout).is_ok());
        assert!(Allocator::allocate(&elems, layout).is_err());
        assert_eq!(r.used(), 64);
    }
}
