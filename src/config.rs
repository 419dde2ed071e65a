//! Construction parameters for the table engines

use crate::error::{Result, TableError};

/// Number of slots a table starts with when no capacity is given
pub const DEFAULT_CAPACITY: usize = 8;

/// Fraction of occupied slots that triggers growth when no load factor is given
pub const DEFAULT_LOAD_FACTOR: f64 = 0.5;

/// Initial capacity and target load factor of a table.
///
/// A table grows to twice its capacity once `len >= load_factor * capacity` and shrinks to
/// half once a removal leaves `len < load_factor * capacity / 4`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableConfig {
    /// Initial number of slots
    pub capacity: usize,
    /// Target ratio of live entries to slots, in `(0, 1]`
    pub load_factor: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { capacity: DEFAULT_CAPACITY, load_factor: DEFAULT_LOAD_FACTOR }
    }
}

impl TableConfig {
    /// Creates a configuration from both parameters, unvalidated
    #[must_use]
    pub fn new(capacity: usize, load_factor: f64) -> Self {
        Self { capacity, load_factor }
    }

    /// Replaces the initial capacity
    #[must_use]
    pub fn with_capacity(self, capacity: usize) -> Self {
        Self { capacity, ..self }
    }

    /// Replaces the load factor
    #[must_use]
    pub fn with_load_factor(self, load_factor: f64) -> Self {
        Self { load_factor, ..self }
    }

    /// Checks both parameters. Out-of-range values are rejected, never clamped.
    ///
    /// # Errors
    ///
    /// [`TableError::InvalidCapacity`] for a zero capacity and
    /// [`TableError::InvalidLoadFactor`] for a load factor outside `(0, 1]` (including NaN).
    pub fn validate(self) -> Result<Self> {
        if self.capacity == 0 {
            return Err(TableError::InvalidCapacity(self.capacity));
        }
        if !(self.load_factor > 0.0 && self.load_factor <= 1.0) {
            return Err(TableError::InvalidLoadFactor(self.load_factor));
        }
        Ok(self)
    }
}
