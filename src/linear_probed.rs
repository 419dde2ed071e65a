use std::{borrow::Borrow, hash::Hash, iter, mem};

use tracing::{debug, error, trace};

use crate::{
    config::{DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, TableConfig},
    error::Result,
    map::{Map, ProbeCounting},
    utils::{
        after_resize, allocate_slots, grown_capacity, hash_code, home_index, next_index,
        should_grow, should_shrink, shrunk_capacity,
    },
};

/// One cell of the backing store
#[derive(Debug, Clone)]
pub(crate) enum Slot<K, V> {
    /// Never held an entry since the last rebuild; ends every probe sequence
    Empty,
    /// Held an entry that was removed; probes continue past it
    Tombstone,
    /// Holds a live entry
    Occupied {
        /// The search key
        key: K,
        /// The payload
        value: V,
    },
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Self::Empty
    }
}

/// An open-addressing hash table using linear probing and tombstone deletion.
///
/// A removed entry leaves a tombstone so that later entries in the same probe run stay
/// reachable. Inserts reuse the first tombstone they pass; all remaining tombstones are
/// dropped the next time the table is rebuilt by a resize.
#[derive(Debug, Clone)]
pub struct LinearProbedTable<K, V> {
    /// The backing store
    slots: Vec<Slot<K, V>>,
    /// Number of occupied slots
    size: usize,
    /// Ratio of live entries to slots that triggers growth
    load_factor: f64,
}

impl<K, V> Default for LinearProbedTable<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, V)> for LinearProbedTable<K, V>
where
    K: Hash + Eq,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            if let Err(err) = self.put(k, v) {
                error!(%err, "extend stopped: linear-probed table could not resize");
                return;
            }
        }
    }
}

impl<K, V> LinearProbedTable<K, V>
where
    K: Hash + Eq,
{
    /// Creates a table with capacity 8 and load factor 0.5
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: iter::repeat_with(Slot::default).take(DEFAULT_CAPACITY).collect(),
            size: 0,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }

    /// Creates a table with the given capacity and the default load factor
    ///
    /// # Errors
    ///
    /// Rejects a zero capacity; fails if the slots cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_config(TableConfig::default().with_capacity(capacity))
    }

    /// Creates a table with the default capacity and the given load factor
    ///
    /// # Errors
    ///
    /// Rejects a load factor outside `(0, 1]`.
    pub fn with_load_factor(load_factor: f64) -> Result<Self> {
        Self::with_config(TableConfig::default().with_load_factor(load_factor))
    }

    /// Creates a table from a full configuration
    ///
    /// # Errors
    ///
    /// Rejects invalid parameters; fails if the slots cannot be allocated.
    pub fn with_config(config: TableConfig) -> Result<Self> {
        let config = config.validate()?;
        Ok(Self {
            slots: allocate_slots(config.capacity)?,
            size: 0,
            load_factor: config.load_factor,
        })
    }

    /// The load factor this table was configured with
    #[must_use]
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Home slot of a key at the current capacity
    fn home<Q: ?Sized + Hash>(&self, key: &Q) -> usize {
        home_index(hash_code(key), self.slots.len())
    }

    /// Walks the probe sequence for `key`, skipping tombstones.
    ///
    /// Returns the index of the matching slot, if any, and the number of slots visited.
    fn find<Q>(&self, key: &Q) -> (Option<usize>, usize)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let capacity = self.slots.len();
        let mut index = self.home(key);
        let mut probes: usize = 0;

        for _ in 0..capacity {
            probes = probes.saturating_add(1);
            match self.slots.get(index) {
                None | Some(Slot::Empty) => return (None, probes),
                Some(Slot::Occupied { key: stored, .. }) if stored.borrow() == key => {
                    return (Some(index), probes);
                }
                Some(Slot::Tombstone | Slot::Occupied { .. }) => {}
            }
            index = next_index(index, capacity);
        }

        (None, probes)
    }

    /// Inserts or updates without checking the growth threshold.
    ///
    /// Returns the previous value on update. Rebuilds reuse this path.
    fn place(&mut self, key: K, value: V) -> Result<Option<V>> {
        let capacity = self.slots.len();
        let mut index = self.home(&key);
        let mut reuse = None;
        let mut empty = None;

        for _ in 0..capacity {
            match self.slots.get_mut(index) {
                None => break,
                Some(Slot::Empty) => {
                    empty = Some(index);
                    break;
                }
                Some(Slot::Tombstone) => {
                    // a duplicate may still sit further along the run
                    if reuse.is_none() {
                        reuse = Some(index);
                    }
                }
                Some(Slot::Occupied { key: stored, value: current }) if *stored == key => {
                    return Ok(Some(mem::replace(current, value)));
                }
                Some(Slot::Occupied { .. }) => {}
            }
            index = next_index(index, capacity);
        }

        let target = reuse.or(empty).and_then(|position| self.slots.get_mut(position));
        if let Some(slot) = target {
            *slot = Slot::Occupied { key, value };
            self.size = self.size.saturating_add(1);
            return Ok(None);
        }

        // every slot is occupied: make room and retry
        self.resize(grown_capacity(capacity)?)?;
        self.place(key, value)
    }

    /// Rebuilds the table at `new_capacity`, reinserting live entries in array order
    fn resize(&mut self, new_capacity: usize) -> Result<()> {
        let old_capacity = self.slots.len();
        let old_slots = mem::replace(&mut self.slots, allocate_slots(new_capacity)?);
        let live = self.size;
        self.size = 0;

        let mut tombstones: usize = 0;
        for slot in old_slots {
            match slot {
                Slot::Occupied { key, value } => {
                    self.place(key, value)?;
                }
                Slot::Tombstone => tombstones = tombstones.saturating_add(1),
                Slot::Empty => {}
            }
        }

        debug!(
            from = old_capacity,
            to = new_capacity,
            live,
            tombstones,
            "rebuilt linear-probed table"
        );
        Ok(())
    }
}

impl<K, V> Map<K, V> for LinearProbedTable<K, V>
where
    K: Hash + Eq,
{
    fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        let previous = self.place(key, value)?;
        if previous.is_some() || !should_grow(self.size, self.slots.len(), self.load_factor) {
            return Ok(previous);
        }
        let resized = grown_capacity(self.slots.len()).and_then(|capacity| self.resize(capacity));
        Ok(after_resize(previous, resized, "linear-probed"))
    }

    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (Some(index), _) = self.find(key) else {
            return None;
        };
        let Some(slot) = self.slots.get_mut(index) else {
            return None;
        };
        let Slot::Occupied { value, .. } = mem::replace(slot, Slot::Tombstone) else {
            return None;
        };
        self.size = self.size.saturating_sub(1);

        if !should_shrink(self.size, self.slots.len(), self.load_factor) {
            return Some(value);
        }
        let resized = self.resize(shrunk_capacity(self.slots.len()));
        after_resize(Some(value), resized, "linear-probed")
    }

    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.probed_get(key).0
    }

    fn clear(&mut self) {
        trace!(capacity = self.slots.len(), live = self.size, "clearing linear-probed table");
        self.slots = iter::repeat_with(Slot::default).take(DEFAULT_CAPACITY).collect();
        self.size = 0;
    }

    fn len(&self) -> usize {
        self.size
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<K, V> ProbeCounting<K, V> for LinearProbedTable<K, V>
where
    K: Hash + Eq,
{
    fn probed_get<Q>(&self, key: &Q) -> (Option<&V>, usize)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (index, probes) = self.find(key);
        let value = index.and_then(|i| match self.slots.get(i) {
            Some(Slot::Occupied { value, .. }) => Some(value),
            _ => None,
        });
        (value, probes)
    }
}
