//! # Probing Tables
//!
//! Two open-addressing hash tables behind one small map contract.
//!
//! - `LinearProbedTable`: classic linear probing; removal leaves a tombstone
//! - `RobinHoodTable`: Robin Hood hashing; entries track their displacement from home,
//!   lookups stop early, and removal shifts the rest of the run back instead of leaving a
//!   tombstone
//!
//! Both grow to twice their capacity once `len >= load_factor * capacity` and shrink to
//! half once a removal leaves `len < load_factor * capacity / 4`. Every resize rebuilds the
//! table by reinserting the live entries.
//!
//! Each table also implements [`ProbeCounting`], a lookup that reports how many slots it
//! visited, for comparing probe-chain lengths across load factors.
//!
//! ## Basic Usage
//!
//! ```rust
//! use probing_tables::{Map, RobinHoodTable};
//!
//! # fn main() -> Result<(), probing_tables::TableError> {
//! let mut map = RobinHoodTable::new();
//!
//! // Insert values
//! map.put("apple".to_string(), 1)?;
//! map.put("banana".to_string(), 2)?;
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Update values
//! assert_eq!(map.put("apple".to_string(), 10)?, Some(1));
//! assert_eq!(map.get("apple"), Some(&10));
//!
//! // Remove values
//! assert_eq!(map.remove("apple"), Some(10));
//! assert_eq!(map.get("apple"), None);
//! # Ok(())
//! # }
//! ```
//!
//! ## Counting Probes
//!
//! ```rust
//! use probing_tables::{LinearProbedTable, Map, ProbeCounting, TableConfig};
//!
//! # fn main() -> Result<(), probing_tables::TableError> {
//! let mut map = LinearProbedTable::with_config(TableConfig::new(1024, 0.9))?;
//! for key in 0..900_u32 {
//!     map.put(key, ())?;
//! }
//!
//! let (value, probes) = map.probed_get(&17_u32);
//! assert_eq!(value, Some(&()));
//! assert!(probes >= 1);
//! # Ok(())
//! # }
//! ```

/// Construction parameters and their defaults
mod config;
/// Error types for construction and resizing
mod error;
/// Linear probing with tombstone deletion
mod linear_probed;
/// The map contract and the probe-counting extension
mod map;
/// Robin Hood hashing with backward-shift deletion
mod robin_hood;
/// Hashing, allocation and resize-policy helpers
mod utils;

pub use config::{DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, TableConfig};
pub use error::{ErrorKind, Result, TableError};
pub use linear_probed::LinearProbedTable;
pub use map::{Map, ProbeCounting, TableStats};
pub use robin_hood::RobinHoodTable;
