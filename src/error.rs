//! Error types shared by both table engines

use std::collections::TryReserveError;

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, TableError>;

/// Coarse classification of a [`TableError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A construction parameter was rejected
    InvalidArgument,
    /// The backing store could not be allocated
    OutOfMemory,
}

/// Failures reported by table construction and by resizing operations.
///
/// Lookups never fail: a missing key is `None`, not an error.
#[derive(Error, Debug)]
pub enum TableError {
    /// Capacity must be at least one slot
    #[error("capacity must be positive, got {0}")]
    InvalidCapacity(usize),

    /// Load factor must lie in `(0, 1]`
    #[error("load factor must be in (0, 1], got {0}")]
    InvalidLoadFactor(f64),

    /// Doubling the capacity would overflow `usize`
    #[error("cannot grow table beyond {capacity} slots")]
    CapacityOverflow {
        /// Capacity at the moment growth was requested
        capacity: usize,
    },

    /// The allocator refused to reserve the backing store
    #[error("failed to allocate a backing store of {capacity} slots")]
    OutOfMemory {
        /// Number of slots requested
        capacity: usize,
        /// Allocation failure reported by the standard library
        #[source]
        source: TryReserveError,
    },
}

impl TableError {
    /// Returns the coarse kind of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCapacity(_) | Self::InvalidLoadFactor(_) => ErrorKind::InvalidArgument,
            Self::CapacityOverflow { .. } | Self::OutOfMemory { .. } => ErrorKind::OutOfMemory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(TableError::InvalidCapacity(0).kind(), ErrorKind::InvalidArgument);
        assert_eq!(TableError::InvalidLoadFactor(1.5).kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            TableError::CapacityOverflow { capacity: usize::MAX }.kind(),
            ErrorKind::OutOfMemory
        );
    }

    #[test]
    fn test_out_of_memory_carries_source() {
        let mut probe: Vec<u64> = Vec::new();
        let Err(source) = probe.try_reserve_exact(usize::MAX) else {
            return;
        };
        let error = TableError::OutOfMemory { capacity: usize::MAX, source };

        assert_eq!(error.kind(), ErrorKind::OutOfMemory);
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_string().contains("failed to allocate"));
    }

    #[test]
    fn test_messages() {
        assert_eq!(TableError::InvalidCapacity(0).to_string(), "capacity must be positive, got 0");
        assert_eq!(
            TableError::InvalidLoadFactor(0.0).to_string(),
            "load factor must be in (0, 1], got 0"
        );
    }
}
