//! Hashing, allocation and resize-policy helpers shared by both tables

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use tracing::warn;

use crate::error::{Result, TableError};

/// Computes the integer hash code of a key.
///
/// `DefaultHasher::new()` is unkeyed, so the same key hashes identically across tables and
/// runs.
pub(crate) fn hash_code<Q: ?Sized + Hash>(key: &Q) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Reduces a hash code to a slot index in `0..capacity`.
///
/// The reduction is done on the unsigned code, so no input maps outside the table.
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
pub(crate) fn home_index(hash: u64, capacity: usize) -> usize {
    debug_assert_ne!(capacity, 0);
    // usize fits in u64 on every supported target, and the remainder is below `capacity`
    (hash % capacity as u64) as usize
}

/// Next slot along a probe sequence, wrapping at the end of the table
pub(crate) fn next_index(index: usize, capacity: usize) -> usize {
    let next = index.saturating_add(1);
    if next >= capacity { 0 } else { next }
}

/// Distance travelled from `home` to `index` along the probe sequence
#[cfg(test)]
pub(crate) fn probe_distance(home: usize, index: usize, capacity: usize) -> usize {
    if index >= home {
        index.saturating_sub(home)
    } else {
        capacity.saturating_sub(home).saturating_add(index)
    }
}

/// Allocates a backing store of `capacity` default (empty) slots.
///
/// # Errors
///
/// [`TableError::OutOfMemory`] when the allocator cannot reserve the slots.
pub(crate) fn allocate_slots<T: Default>(capacity: usize) -> Result<Vec<T>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|source| TableError::OutOfMemory { capacity, source })?;
    slots.resize_with(capacity, T::default);
    Ok(slots)
}

/// True once `len` has reached the growth threshold
#[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
pub(crate) fn should_grow(len: usize, capacity: usize, load_factor: f64) -> bool {
    len as f64 >= load_factor * capacity as f64
}

/// True once a removal has left `len` below a quarter of the growth threshold
#[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
pub(crate) fn should_shrink(len: usize, capacity: usize, load_factor: f64) -> bool {
    capacity > 1 && (len as f64) < load_factor * capacity as f64 / 4.0
}

/// Capacity after growth
pub(crate) fn grown_capacity(capacity: usize) -> Result<usize> {
    capacity.checked_mul(2).ok_or(TableError::CapacityOverflow { capacity })
}

/// Capacity after shrinking, never below one slot
pub(crate) fn shrunk_capacity(capacity: usize) -> usize {
    (capacity / 2).max(1)
}

/// Settles an update whose follow-up resize may have failed.
///
/// The update has already taken effect and the failed rebuild left the old backing store in
/// place, so the caller still gets `outcome`; the failure is only logged.
pub(crate) fn after_resize<T>(outcome: T, resized: Result<()>, table: &'static str) -> T {
    if let Err(err) = resized {
        warn!(%err, table, "resize failed, keeping the current capacity");
    }
    outcome
}
