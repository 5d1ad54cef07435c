//! Region-specific error types.

use std::error::Error;
use std::fmt;

/// Errors from region construction and allocation.
///
/// Exhaustion is recoverable by design: the region reports it and stays
/// unchanged rather than aborting or silently falling back to the general
/// heap. The configuration variants are construction-time failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionError {
    /// The region lacks sufficient contiguous remaining capacity.
    CapacityExceeded {
        /// Number of bytes requested, after alignment rounding.
        requested: usize,
        /// Bytes left between the cursor and the end of the buffer.
        remaining: usize,
    },
    /// An element-count request overflowed when converted to bytes.
    SizeOverflow {
        /// Number of elements requested.
        count: usize,
        /// Size of one element in bytes.
        element_size: usize,
    },
    /// The configured alignment is not a power of two.
    AlignmentNotPowerOfTwo {
        /// The rejected alignment value.
        alignment: usize,
    },
    /// The configured capacity is not a multiple of the alignment.
    CapacityNotAligned {
        /// The rejected capacity value.
        capacity: usize,
        /// The configured alignment.
        alignment: usize,
    },
    /// The configured capacity is zero.
    ZeroCapacity,
    /// The configured capacity exceeds the maximum size a single
    /// allocation may have on this platform.
    CapacityTooLarge {
        /// The rejected capacity value.
        capacity: usize,
    },
}

impl fmt::Display for RegionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                remaining,
            } => {
                write!(
                    f,
                    "region capacity exceeded: requested {requested} bytes, {remaining} bytes remaining"
                )
            }
            Self::SizeOverflow {
                count,
                element_size,
            } => {
                write!(
                    f,
                    "allocation size overflow: {count} elements of {element_size} bytes"
                )
            }
            Self::AlignmentNotPowerOfTwo { alignment } => {
                write!(f, "alignment {alignment} is not a power of two")
            }
            Self::CapacityNotAligned {
                capacity,
                alignment,
            } => {
                write!(
                    f,
                    "capacity {capacity} is not a multiple of alignment {alignment}"
                )
            }
            Self::ZeroCapacity => write!(f, "region capacity must be non-zero"),
            Self::CapacityTooLarge { capacity } => {
                write!(f, "capacity {capacity} exceeds the maximum allocation size")
            }
        }
    }
}

impl Error for RegionError {}
