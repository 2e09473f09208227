use thiserror::Error;

/// Errors reported by fallible table operations.
///
/// A lookup or removal that finds nothing is not an error; those report
/// `Ok(None)` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Keys must contain at least one byte.
    #[error("key span is empty")]
    EmptyKey,
    /// A span or table was configured with an element stride of zero.
    #[error("element stride must be non-zero")]
    ZeroStride,
    /// The span length is not a whole number of elements.
    #[error("span of {size} bytes is not a multiple of its stride {stride}")]
    MisalignedSpan {
        /// Length of the span in bytes.
        size: usize,
        /// Element stride the span was built with.
        stride: usize,
    },
    /// The span's stride does not match the stride the table was built for.
    #[error("span stride {actual} does not match table stride {expected}")]
    StrideMismatch {
        /// Stride configured on the table.
        expected: usize,
        /// Stride carried by the span.
        actual: usize,
    },
    /// The backing store could not acquire memory for the requested slots.
    #[error("failed to allocate a backing store of {slots} slots")]
    Alloc {
        /// Number of slots that were requested.
        slots: usize,
    },
    /// The requested capacity does not fit in `usize`.
    #[error("capacity computation overflowed")]
    CapacityOverflow,
    /// Probing visited every slot without finding the key or an empty slot.
    ///
    /// The load factor limit makes this unreachable; seeing it means a table
    /// invariant was broken.
    #[error("probe wrapped around all {capacity} slots")]
    TableFull {
        /// Capacity of the table that was probed.
        capacity: usize,
    },
}

impl Error {
    /// Returns `true` for errors that indicate a broken table invariant
    /// rather than bad input or memory exhaustion.
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::TableFull { .. })
    }

    /// Returns `true` if the error came from failing to grow the table.
    pub fn is_alloc(&self) -> bool {
        matches!(self, Error::Alloc { .. } | Error::CapacityOverflow)
    }
}
