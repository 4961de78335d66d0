//! A bounded least-recently-used cache.
//!
//! Every cache in the crate (parse results, holiday rule results, compiled
//! matchers, business-day lookups) is an `LruCache` with a fixed capacity,
//! so no cache can grow without bound.

use core::hash::Hash;

use rustc_hash::FxHashMap;

use crate::{error::KairosError, KairosResult};

const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    // `None` only while the slot sits on the free list.
    value: Option<V>,
    prev: usize,
    next: usize,
}

/// A fixed-capacity map with least-recently-used eviction.
///
/// `get` refreshes recency and is O(1) amortized; a `put` at capacity
/// evicts the least-recently-used entry. Presence and value are never
/// conflated: `get` returns `Option<&V>`, so any value — including one
/// that is itself an `Option` — can be cached without ambiguity.
#[derive(Debug)]
pub struct LruCache<K, V> {
    map: FxHashMap<K, usize>,
    entries: Vec<Entry<K, V>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// Creates a cache with the given capacity.
    ///
    /// A zero capacity is rejected with `InvalidConfiguration`.
    pub fn try_new(capacity: usize) -> KairosResult<Self> {
        if capacity == 0 {
            return Err(
                KairosError::configuration().with_message("cache capacity must be positive.")
            );
        }
        Ok(Self {
            map: FxHashMap::default(),
            entries: Vec::with_capacity(capacity.min(64)),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            capacity,
        })
    }

    /// Returns the configured capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of live entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Looks up a key, refreshing its recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let index = *self.map.get(key)?;
        self.detach(index);
        self.push_front(index);
        self.entries[index].value.as_ref()
    }

    /// Looks up a key mutably, refreshing its recency on a hit.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = *self.map.get(key)?;
        self.detach(index);
        self.push_front(index);
        self.entries[index].value.as_mut()
    }

    /// Looks up a key without refreshing recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.map
            .get(key)
            .and_then(|&index| self.entries[index].value.as_ref())
    }

    /// Inserts a value, returning the replaced value when the key was
    /// already present. At capacity the least-recently-used entry is
    /// evicted first.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&index) = self.map.get(&key) {
            let old = self.entries[index].value.replace(value);
            self.detach(index);
            self.push_front(index);
            return old;
        }
        if self.map.len() == self.capacity {
            self.evict_lru();
        }
        let entry = Entry {
            key: key.clone(),
            value: Some(value),
            prev: NIL,
            next: NIL,
        };
        let index = match self.free.pop() {
            Some(slot) => {
                self.entries[slot] = entry;
                slot
            }
            None => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };
        self.map.insert(key, index);
        self.push_front(index);
        None
    }

    /// Removes a key, returning its value when present.
    pub fn delete(&mut self, key: &K) -> Option<V> {
        let index = self.map.remove(key)?;
        self.detach(index);
        self.free.push(index);
        self.entries[index].value.take()
    }

    /// Drops every entry, keeping the capacity.
    pub fn clear(&mut self) {
        self.map.clear();
        self.entries.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
    }

    fn evict_lru(&mut self) {
        let tail = self.tail;
        if tail == NIL {
            return;
        }
        self.detach(tail);
        self.map.remove(&self.entries[tail].key);
        self.entries[tail].value = None;
        self.free.push(tail);
    }

    fn detach(&mut self, index: usize) {
        let (prev, next) = {
            let entry = &self.entries[index];
            (entry.prev, entry.next)
        };
        if prev != NIL {
            self.entries[prev].next = next;
        } else if self.head == index {
            self.head = next;
        }
        if next != NIL {
            self.entries[next].prev = prev;
        } else if self.tail == index {
            self.tail = prev;
        }
        self.entries[index].prev = NIL;
        self.entries[index].next = NIL;
    }

    fn push_front(&mut self, index: usize) {
        self.entries[index].prev = NIL;
        self.entries[index].next = self.head;
        if self.head != NIL {
            self.entries[self.head].prev = index;
        }
        self.head = index;
        if self.tail == NIL {
            self.tail = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LruCache;

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(LruCache::<u32, u32>::try_new(0).is_err());
    }

    #[test]
    fn eviction_follows_recency() {
        let mut cache = LruCache::try_new(2).unwrap();
        cache.put("a", 1);
        cache.put("b", 2);
        // Touch "a" so "b" becomes least recently used.
        assert_eq!(cache.get(&"a"), Some(&1));
        cache.put("c", 3);
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"c"), Some(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn put_replaces_and_returns_old_value() {
        let mut cache = LruCache::try_new(2).unwrap();
        assert_eq!(cache.put("a", 1), None);
        assert_eq!(cache.put("a", 2), Some(1));
        assert_eq!(cache.get(&"a"), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn delete_and_clear() {
        let mut cache = LruCache::try_new(3).unwrap();
        cache.put(1, "one");
        cache.put(2, "two");
        assert_eq!(cache.delete(&1), Some("one"));
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.len(), 1);
        // The freed slot is reused.
        cache.put(3, "three");
        cache.put(4, "four");
        assert_eq!(cache.len(), 3);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 3);
    }

    #[test]
    fn values_with_option_payloads_are_unambiguous() {
        let mut cache: LruCache<&str, Option<i64>> = LruCache::try_new(2).unwrap();
        cache.put("none", None);
        assert_eq!(cache.get(&"none"), Some(&None));
        assert_eq!(cache.get(&"absent"), None);
    }

    #[test]
    fn single_entry_cache_churn() {
        let mut cache = LruCache::try_new(1).unwrap();
        for i in 0..100 {
            cache.put(i, i * 2);
            assert_eq!(cache.get(&i), Some(&(i * 2)));
            assert_eq!(cache.len(), 1);
        }
        assert_eq!(cache.get(&98), None);
    }
}
