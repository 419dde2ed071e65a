use std::{borrow::Borrow, cmp::Ordering, hash::Hash, iter, mem};

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

/// A live entry together with its distance from home
#[derive(Debug, Clone)]
pub(crate) struct Entry<K, V> {
    /// The search key
    pub(crate) key: K,
    /// The payload
    pub(crate) value: V,
    /// How many slots past its home slot this entry sits
    pub(crate) displacement: usize,
}

/// An open-addressing hash table using Robin Hood hashing.
///
/// Every entry records its displacement from its home slot. On insertion, an entry that has
/// travelled further takes the slot from one that has travelled less, which keeps each
/// probe run ordered by displacement. Lookups use that ordering to stop as soon as they
/// have travelled further than the resident entry. Removal pulls the rest of the run back
/// one slot (backward-shift deletion), so the table never needs tombstones.
#[derive(Debug, Clone)]
pub struct RobinHoodTable<K, V> {
    /// The backing store; `None` is an empty slot
    slots: Vec<Option<Entry<K, V>>>,
    /// Number of occupied slots
    size: usize,
    /// Ratio of live entries to slots that triggers growth
    load_factor: f64,
}

impl<K, V> Default for RobinHoodTable<K, V>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Extend<(K, V)> for RobinHoodTable<K, V>
where
    K: Hash + Eq,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            if let Err(err) = self.put(k, v) {
                error!(%err, "extend stopped: robin hood table could not resize");
                return;
            }
        }
    }
}

impl<K, V> RobinHoodTable<K, V>
where
    K: Hash + Eq,
{
    /// Creates a table with capacity 8 and load factor 0.5
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: iter::repeat_with(|| None).take(DEFAULT_CAPACITY).collect(),
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

    /// Displacement of the entry stored at `index`, or `None` for an empty slot
    #[must_use]
    pub fn displacement_at(&self, index: usize) -> Option<usize> {
        self.slots.get(index).and_then(Option::as_ref).map(|entry| entry.displacement)
    }

    /// Longest distance any entry currently sits from its home slot
    #[must_use]
    pub fn max_displacement(&self) -> usize {
        self.slots.iter().flatten().map(|entry| entry.displacement).max().unwrap_or(0)
    }

    /// Home slot of a key at the current capacity
    fn home<Q: ?Sized + Hash>(&self, key: &Q) -> usize {
        home_index(hash_code(key), self.slots.len())
    }

    /// Displacement-bounded search for `key`.
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

        for travelled in 0..capacity {
            probes = probes.saturating_add(1);
            let Some(Some(entry)) = self.slots.get(index) else {
                return (None, probes);
            };
            match entry.displacement.cmp(&travelled) {
                // the key would have displaced this entry on insertion
                Ordering::Less => return (None, probes),
                Ordering::Equal if entry.key.borrow() == key => return (Some(index), probes),
                Ordering::Equal | Ordering::Greater => {}
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
        // a full table can only take a new key by evicting one, so grow before any swap
        if self.size >= capacity && self.find(&key).0.is_none() {
            self.resize(grown_capacity(capacity)?)?;
            return self.place(key, value);
        }

        let mut index = self.home(&key);
        let mut candidate = Entry { key, value, displacement: 0 };

        for _ in 0..capacity {
            let Some(slot) = self.slots.get_mut(index) else { break };
            match slot {
                None => {
                    *slot = Some(candidate);
                    self.size = self.size.saturating_add(1);
                    return Ok(None);
                }
                Some(resident) => match candidate.displacement.cmp(&resident.displacement) {
                    // the richer resident gives up its slot and carries on probing
                    Ordering::Greater => mem::swap(resident, &mut candidate),
                    Ordering::Equal if resident.key == candidate.key => {
                        return Ok(Some(mem::replace(&mut resident.value, candidate.value)));
                    }
                    Ordering::Equal | Ordering::Less => {}
                },
            }

            candidate.displacement = candidate.displacement.saturating_add(1);
            index = next_index(index, capacity);
        }

        // unreachable while an empty slot exists; place whoever is still travelling
        self.resize(grown_capacity(capacity)?)?;
        self.place(candidate.key, candidate.value)
    }

    /// Pulls the run following `hole` back by one slot until an empty slot or an entry
    /// already at home is reached
    fn backward_shift(&mut self, mut hole: usize) {
        let capacity = self.slots.len();

        for _ in 1..capacity {
            let next = next_index(hole, capacity);
            let movable = matches!(
                self.slots.get(next),
                Some(Some(entry)) if entry.displacement != 0
            );
            if !movable {
                return;
            }

            self.slots.swap(hole, next);
            if let Some(Some(entry)) = self.slots.get_mut(hole) {
                entry.displacement = entry.displacement.saturating_sub(1);
            }
            hole = next;
        }
    }

    /// Rebuilds the table at `new_capacity`, reinserting live entries in array order
    fn resize(&mut self, new_capacity: usize) -> Result<()> {
        let old_capacity = self.slots.len();
        let old_slots = mem::replace(&mut self.slots, allocate_slots(new_capacity)?);
        let live = self.size;
        self.size = 0;

        for entry in old_slots.into_iter().flatten() {
            self.place(entry.key, entry.value)?;
        }

        debug!(
            from = old_capacity,
            to = new_capacity,
            live,
            max_displacement = self.max_displacement(),
            "rebuilt robin hood table"
        );
        Ok(())
    }
}

impl<K, V> Map<K, V> for RobinHoodTable<K, V>
where
    K: Hash + Eq,
{
    fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        let previous = self.place(key, value)?;
        if previous.is_some() || !should_grow(self.size, self.slots.len(), self.load_factor) {
            return Ok(previous);
        }
        let resized = grown_capacity(self.slots.len()).and_then(|capacity| self.resize(capacity));
        Ok(after_resize(previous, resized, "robin hood"))
    }

    fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (Some(index), _) = self.find(key) else {
            return None;
        };
        let Some(entry) = self.slots.get_mut(index).and_then(Option::take) else {
            return None;
        };
        self.size = self.size.saturating_sub(1);
        self.backward_shift(index);

        if !should_shrink(self.size, self.slots.len(), self.load_factor) {
            return Some(entry.value);
        }
        let resized = self.resize(shrunk_capacity(self.slots.len()));
        after_resize(Some(entry.value), resized, "robin hood")
    }

    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.probed_get(key).0
    }

    fn clear(&mut self) {
        trace!(capacity = self.slots.len(), live = self.size, "clearing robin hood table");
        self.slots = iter::repeat_with(|| None).take(DEFAULT_CAPACITY).collect();
        self.size = 0;
    }

    fn len(&self) -> usize {
        self.size
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<K, V> ProbeCounting<K, V> for RobinHoodTable<K, V>
where
    K: Hash + Eq,
{
    fn probed_get<Q>(&self, key: &Q) -> (Option<&V>, usize)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (index, probes) = self.find(key);
        let value = index
            .and_then(|i| self.slots.get(i))
            .and_then(Option::as_ref)
            .map(|entry| &entry.value);
        (value, probes)
    }
}
