//! The map contract both table engines implement

use std::{borrow::Borrow, fmt, hash::Hash};

use crate::error::Result;

/// A scaled-down map interface: the fundamental key/value operations only.
///
/// `put` returns a `Result` because a full table must grow before it can store a new entry,
/// and growing allocates a new backing store. A missing key is always reported as `None`.
pub trait Map<K, V>
where
    K: Hash + Eq,
{
    /// Inserts `value` under `key`, returning the previous value if the key was present
    ///
    /// A new key that takes the table past its load factor triggers growth. If that growth
    /// fails the entry stays stored at the current capacity and the failure is logged.
    ///
    /// # Errors
    ///
    /// Fails only when a full table must grow before the entry can be stored and the new
    /// backing store cannot be allocated. The table is unchanged in that case.
    fn put(&mut self, key: K, value: V) -> Result<Option<V>>;

    /// Removes `key`, returning its value if it was present.
    ///
    /// A removal that takes the table below its shrink threshold triggers a rebuild at half
    /// the capacity. If that rebuild cannot allocate, the table keeps its capacity and the
    /// failure is logged; the removed value is returned either way.
    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Looks up the value stored under `key`
    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Returns true if `key` is present
    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Removes every entry and returns the table to the default capacity of 8 slots.
    ///
    /// The configured load factor is kept.
    fn clear(&mut self);

    /// Number of live entries
    fn len(&self) -> usize;

    /// Returns true if the map holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots in the backing store
    fn capacity(&self) -> usize;

    /// Snapshot of the table's size and capacity
    fn stats(&self) -> TableStats {
        TableStats { len: self.len(), capacity: self.capacity() }
    }
}

/// Lookup that also reports how many slots were visited.
///
/// The count includes the terminating visit: the matching slot, the empty slot that ended
/// the search, or the slot that proved the key absent.
pub trait ProbeCounting<K, V> {
    /// Looks up `key`, returning its value and the number of slots visited
    fn probed_get<Q>(&self, key: &Q) -> (Option<&V>, usize)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;
}

/// Size and capacity of a table at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    /// Live entries
    pub len: usize,
    /// Slots in the backing store
    pub capacity: usize,
}

impl TableStats {
    /// Fraction of slots holding a live entry.
    ///
    /// This is the current fill, not the configured growth threshold.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn fill_ratio(&self) -> f64 {
        if self.capacity == 0 { 0.0 } else { self.len as f64 / self.capacity as f64 }
    }
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Size: {}, Capacity: {}", self.len, self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{LinearProbedTable, RobinHoodTable};

    /// Exercises the whole contract through the trait only
    fn check_contract<M: Map<String, i32>>(mut map: M) -> Result<()> {
        assert!(map.is_empty());
        assert_eq!(map.put("key1".to_string(), 1)?, None);
        assert_eq!(map.put("key2".to_string(), 2)?, None);
        assert_eq!(map.put("key3".to_string(), 3)?, None);
        assert_eq!(map.len(), 3);

        assert_eq!(map.get("key1"), Some(&1));
        assert_eq!(map.get("key4"), None);
        assert!(map.contains_key("key2"));
        assert!(!map.contains_key("key4"));

        assert_eq!(map.put("key1".to_string(), 10)?, Some(1));
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("key1"), Some(&10));

        assert_eq!(map.remove("key2"), Some(2));
        assert_eq!(map.remove("key2"), None);
        assert_eq!(map.remove("missing"), None);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("key2"), None);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.get("key1"), None);
        assert_eq!(map.put("key1".to_string(), 5)?, None);
        assert_eq!(map.get("key1"), Some(&5));
        Ok(())
    }

    /// Bulk workload compared against std's map
    fn check_bulk<M: Map<u32, u32>>(mut map: M) -> Result<()> {
        let mut model = HashMap::new();
        for i in 0..2000_u32 {
            let key = i.wrapping_mul(2_654_435_761) % 3000;
            assert_eq!(map.put(key, i)?, model.insert(key, i));
        }
        for i in (0..3000_u32).step_by(3) {
            assert_eq!(map.remove(&i), model.remove(&i));
        }
        assert_eq!(map.len(), model.len());
        for i in 0..3000_u32 {
            assert_eq!(map.get(&i), model.get(&i));
        }
        Ok(())
    }

    #[test]
    fn test_linear_contract() -> Result<()> {
        check_contract(LinearProbedTable::new())?;
        check_bulk(LinearProbedTable::new())
    }

    #[test]
    fn test_robin_hood_contract() -> Result<()> {
        check_contract(RobinHoodTable::new())?;
        check_bulk(RobinHoodTable::new())
    }

    #[test]
    fn test_stats() {
        let stats = TableStats { len: 3, capacity: 8 };
        assert!((stats.fill_ratio() - 0.375).abs() < f64::EPSILON);
        assert_eq!(stats.to_string(), "Size: 3, Capacity: 8");
        assert!(TableStats { len: 0, capacity: 0 }.fill_ratio().abs() < f64::EPSILON);
    }
}
