use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tracing::trace;

struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
    invalidated: bool,
}

/// In-memory query cache keyed by request parameters.
///
/// Entries are never evicted by age; a stale entry is still served by [`QueryCache::get`]
/// so callers can show old data while refetching.
pub struct QueryCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    stale_after: Duration,
}

impl<K: Eq + Hash, V> QueryCache<K, V> {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stale_after,
        }
    }

    /// Cached value regardless of staleness
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key).map(|entry| &mut entry.value)
    }

    /// Cached value only if it's still fresh at `now`
    pub fn get_fresh(&self, key: &K, now: Instant) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| !Self::entry_stale(entry, self.stale_after, now))
            .map(|entry| &entry.value)
    }

    /// Missing entries count as stale
    pub fn is_stale(&self, key: &K, now: Instant) -> bool {
        self.entries
            .get(key)
            .map_or(true, |entry| Self::entry_stale(entry, self.stale_after, now))
    }

    pub fn insert(&mut self, key: K, value: V, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: now,
                invalidated: false,
            },
        );
    }

    /// Mark an entry stale without dropping its value. Returns false when the key is absent.
    pub fn invalidate(&mut self, key: &K) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.invalidated = true;
                true
            }
            None => false,
        }
    }

    pub fn invalidate_where<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&K) -> bool,
    {
        let mut count = 0;
        for (key, entry) in self.entries.iter_mut() {
            if predicate(key) {
                entry.invalidated = true;
                count += 1;
            }
        }
        trace!("Invalidated {} cache entries", count);
        count
    }

    fn entry_stale(entry: &CacheEntry<V>, stale_after: Duration, now: Instant) -> bool {
        entry.invalidated || now.saturating_duration_since(entry.fetched_at) >= stale_after
    }
}
