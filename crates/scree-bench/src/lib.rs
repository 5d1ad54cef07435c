//! Benchmark profiles for the scree region allocator.
//!
//! Provides pre-built region configurations shared by the criterion
//! benches, so every benchmark measures against the same capacity and
//! alignment.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use scree::{Region, RegionConfig};

/// Capacity of the reference profile region: 1 MiB.
pub const REFERENCE_CAPACITY: usize = 1024 * 1024;

/// Alignment of the reference profile region.
pub const REFERENCE_ALIGNMENT: usize = 16;

/// Build the reference benchmark region: 1 MiB at 16-byte alignment.
pub fn reference_region() -> Region {
    Region::new(RegionConfig::with_alignment(
        REFERENCE_CAPACITY,
        REFERENCE_ALIGNMENT,
    ))
    .expect("reference profile config is valid")
}
