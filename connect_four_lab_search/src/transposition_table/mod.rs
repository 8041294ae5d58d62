use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Fraction of `max_entries` kept after an eviction pass, in tenths.
const EVICTION_TARGET_TENTHS: usize = 7;

/// Entries that can be ranked for eviction. Lower priorities are evicted first.
pub trait Priority {
    fn priority(&self) -> u8;
}

/// A hash table designed for transposition tables.
/// Features:
///  - Allocate memory based on specified number of megabytes
///  - Evict lowest-priority entries first once full, down to 70% occupancy
///  - Replace-if based on a function
pub struct CacheTable<K: Eq + Hash + Copy, V: Priority> {
    megabytes: usize,
    max_entries: usize,
    map: FxHashMap<K, V>,
}

impl<K: Eq + Hash + Copy, V: Priority> std::fmt::Debug for CacheTable<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheTable")
            .field("megabytes", &self.megabytes)
            .field("max_entries", &self.max_entries)
            .field("len", &self.map.len())
            .field("occupancy", &self.occupancy())
            .finish()
    }
}

impl<K: Eq + Hash + Copy, V: Priority> CacheTable<K, V> {
    pub fn new(megabytes: usize) -> Self {
        let bytes = megabytes * 1024 * 1024;
        let bytes_per_entry = std::mem::size_of::<K>() + std::mem::size_of::<V>();
        Self::with_max_entries(megabytes, bytes / bytes_per_entry.max(1))
    }

    pub(crate) fn with_max_entries(megabytes: usize, max_entries: usize) -> Self {
        Self {
            megabytes,
            max_entries,
            map: Default::default(),
        }
    }

    pub fn megabytes(&self) -> usize {
        self.megabytes
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn occupancy(&self) -> f64 {
        if self.max_entries == 0 {
            return 0.0;
        }
        (self.map.len() as f64) / (self.max_entries as f64)
    }

    pub fn clear(&mut self) {
        self.map.clear()
    }

    #[inline]
    pub fn get(&self, k: &K) -> Option<&V> {
        self.map.get(k)
    }

    /// Drops entries with the lowest priority, one level at a time, until the table is at
    /// most 70% full.
    fn evict(&mut self) {
        let target = EVICTION_TARGET_TENTHS * self.max_entries / 10;
        let mut d = 1u8;
        while self.map.len() > target {
            self.map.retain(|_, e| e.priority() >= d);
            if d == u8::MAX {
                self.map.clear();
                break;
            }
            d += 1;
        }
    }

    pub fn set(&mut self, k: &K, v: V) {
        if self.max_entries == 0 {
            return;
        }
        if !self.map.contains_key(k) && self.map.len() >= self.max_entries {
            self.evict();
        }
        self.map.insert(*k, v);
    }

    /// Inserts when absent, otherwise replaces the stored value only if `should_replace` holds.
    pub fn replace_if<F: Fn(&V) -> bool>(&mut self, k: &K, v: V, should_replace: F) -> bool {
        if self.max_entries == 0 {
            return false;
        }
        let Some(v0) = self.map.get_mut(k) else {
            // Case 1: already empty
            self.set(k, v);
            return true;
        };

        if !should_replace(v0) {
            // Case 2: should not replace
            return false;
        }

        // Case 3: should replace
        *v0 = v;
        true
    }
}
