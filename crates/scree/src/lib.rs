//! Fixed-capacity region allocation for container workloads.
//!
//! Provides [`Region`], a fixed-size aligned byte buffer served by a bump
//! cursor with opportunistic LIFO reclamation, and [`TypedAlloc`], the thin
//! per-element-type view that lets unrelated container instantiations draw
//! from one shared region without per-element heap traffic.
//!
//! # Architecture
//!
//! ```text
//! Region (owns the buffer; sole authority on bounds and alignment)
//! ├── aligned byte buffer (capacity fixed at construction)
//! ├── cursor (advances on allocate; retracts only for the top block)
//! └── TypedAlloc<T> × N (borrowing typed views over one Region)
//!     └── allocator-api2 bridge (Vec, Box, … draw through a view)
//! ```
//!
//! A caller constructs one [`Region`] with a [`RegionConfig`], builds one or
//! more [`TypedAlloc`] views bound to it (rebinding to internal node types
//! where a container needs them), and hands a view to an allocator-aware
//! container. Every request the container makes flows through the view to
//! the region as a byte/alignment-normalised allocation.
//!
//! Deallocation reclaims space only when the freed block is the most recent
//! allocation; anything else is dead space until the region is dropped.
//! There is no growth and no fallback to the general heap: when the region
//! is exhausted, allocation reports [`RegionError::CapacityExceeded`] and
//! the region is left unchanged.
//!
//! # Quick start
//!
//! ```rust
//! use allocator_api2::vec::Vec;
//! use scree::{Region, RegionConfig, TypedAlloc};
//!
//! // One region, sized and aligned up front.
//! let region = Region::new(RegionConfig::with_alignment(4096, 16)).unwrap();
//!
//! // A typed view per element type; both draw from the same cursor.
//! let elems = TypedAlloc::<u32>::new(&region);
//! let spans = elems.rebind::<[u64; 2]>();
//! assert!(elems == spans);
//!
//! let mut values = Vec::with_capacity_in(64, elems);
//! for i in 0..64u32 {
//!     values.push(i);
//! }
//! assert_eq!(region.used(), 64 * 4);
//!
//! // The reserved store is the top block, so dropping the container
//! // hands the space back.
//! drop(values);
//! assert_eq!(region.used(), 0);
//! ```
//!
//! # Threading
//!
//! A region is single-threaded by construction: the cursor uses `Cell` and
//! the buffer is held as a raw pointer, so `Region` is neither `Send` nor
//! `Sync` and concurrent use does not compile.
//!
//! # Safety
//!
//! This crate contains `unsafe` code, confined to the raw buffer management
//! in [`region`] and the `Allocator` bridge in [`typed`]. Every `unsafe`
//! block carries a `SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod error;
pub mod region;
pub mod typed;

// Public re-exports for the primary API surface.
pub use config::RegionConfig;
pub use error::RegionError;
pub use region::Region;
pub use typed::TypedAlloc;
