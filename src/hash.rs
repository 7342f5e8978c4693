//! Separate-chaining hash index.
//!
//! Each bucket holds a singly linked chain of entries. New keys are appended
//! at the chain tail; when `len / capacity` rises above the load factor the
//! bucket array doubles and every entry is moved into the new array.
//!
//! ```rust
//! use ordhash_rs::HashIndex;
//!
//! let mut index: HashIndex<String, u32> = HashIndex::new();
//! index.put("dune".to_string(), 1965);
//! index.put("emma".to_string(), 1815);
//!
//! assert_eq!(index.get("dune"), Some(&1965));
//! assert_eq!(index.remove("emma"), Some(1815));
//! assert!(!index.contains_key("emma"));
//! ```

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use crate::config::{HashIndexConfig, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
use crate::error::Result;
use crate::key::{bucket_index, IndexKey};

struct Entry<K, V> {
    key: K,
    value: V,
    next: Option<Box<Entry<K, V>>>,
}

struct Chain<K, V> {
    head: Option<Box<Entry<K, V>>>,
}

impl<K, V> Chain<K, V> {
    const fn new() -> Self {
        Self { head: None }
    }

    fn push_back(&mut self, entry: Box<Entry<K, V>>) {
        let mut cursor = &mut self.head;
        while let Some(node) = cursor {
            cursor = &mut node.next;
        }
        *cursor = Some(entry);
    }

    fn pop_front(&mut self) -> Option<Box<Entry<K, V>>> {
        let mut entry = self.head.take()?;
        self.head = entry.next.take();
        Some(entry)
    }

    fn find<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut cursor = self.head.as_deref();
        while let Some(entry) = cursor {
            if key_matches(&entry.key, key) {
                return Some(entry);
            }
            cursor = entry.next.as_deref();
        }
        None
    }

    fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut cursor = self.head.as_deref_mut();
        while let Some(entry) = cursor {
            if key_matches(&entry.key, key) {
                return Some(entry);
            }
            cursor = entry.next.as_deref_mut();
        }
        None
    }

    /// Unlink the entry for `key`, keeping the rest of the chain in order.
    fn remove<Q>(&mut self, key: &Q) -> Option<Box<Entry<K, V>>>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        let mut cursor = &mut self.head;
        while cursor
            .as_ref()
            .is_some_and(|entry| !key_matches(&entry.key, key))
        {
            cursor = &mut cursor.as_mut()?.next;
        }
        let mut entry = cursor.take()?;
        *cursor = entry.next.take();
        Some(entry)
    }
}

impl<K: Clone, V: Clone> Clone for Chain<K, V> {
    // Copies front to back through a tail cursor; a derived clone would
    // recurse once per entry.
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        let mut tail = &mut copy.head;
        let mut cursor = self.head.as_deref();
        while let Some(entry) = cursor {
            let node = tail.insert(Box::new(Entry {
                key: entry.key.clone(),
                value: entry.value.clone(),
                next: None,
            }));
            tail = &mut node.next;
            cursor = entry.next.as_deref();
        }
        copy
    }
}

impl<K, V> Drop for Chain<K, V> {
    // Unlink iteratively so long chains don't recurse through `Box` drops.
    fn drop(&mut self) {
        while self.pop_front().is_some() {}
    }
}

#[inline]
fn key_matches<K, Q>(stored: &K, key: &Q) -> bool
where
    K: Borrow<Q>,
    Q: Eq + ?Sized,
{
    <K as Borrow<Q>>::borrow(stored) == key
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Chain<K, V>> {
    (0..capacity).map(|_| Chain::new()).collect()
}

/// Associative index with separate chaining and automatic doubling.
///
/// Keys hash through [`IndexKey`]. Lookups accept any borrowed form of the
/// key whose hash code agrees with the owned form, e.g. `&str` for `String`
/// keys.
#[derive(Clone)]
pub struct HashIndex<K, V> {
    buckets: Vec<Chain<K, V>>,
    len: usize,
    load_factor: f64,
}

impl<K: IndexKey, V> Default for HashIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: IndexKey, V> HashIndex<K, V> {
    /// Empty index with [`DEFAULT_CAPACITY`] buckets and the
    /// [`DEFAULT_LOAD_FACTOR`] threshold.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Empty index with `capacity` buckets. A capacity of 0 is raised to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: empty_buckets(capacity.max(1)),
            len: 0,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }

    /// Empty index built from a validated configuration.
    pub fn with_config(config: &HashIndexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            buckets: empty_buckets(config.initial_capacity),
            len: 0,
            load_factor: config.load_factor,
        })
    }

    /// Number of stored entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` when no entries are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current number of buckets.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Current `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    /// Threshold above which the bucket array doubles.
    pub fn max_load_factor(&self) -> f64 {
        self.load_factor
    }

    #[inline]
    fn bucket_of<Q: IndexKey + ?Sized>(&self, key: &Q) -> usize {
        bucket_index(key.hash_code(), self.buckets.len())
    }

    /// Insert `value` under `key`, or overwrite the value already stored
    /// there.
    ///
    /// Returns the previous value on overwrite. Only a new key can trigger a
    /// resize, which completes before this call returns.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let idx = self.bucket_of(&key);
        if let Some(entry) = self.buckets[idx].find_mut(&key) {
            return Some(std::mem::replace(&mut entry.value, value));
        }

        self.buckets[idx].push_back(Box::new(Entry {
            key,
            value,
            next: None,
        }));
        self.len += 1;

        if self.load_factor() > self.load_factor {
            self.resize(self.buckets.len() * 2);
            debug_assert!(self.load_factor() <= self.load_factor);
        }
        None
    }

    /// Move every entry into a fresh array of `new_capacity` buckets,
    /// preserving chain order.
    fn resize(&mut self, new_capacity: usize) {
        let old_capacity = self.buckets.len();
        let old = std::mem::replace(&mut self.buckets, empty_buckets(new_capacity));
        for mut chain in old {
            while let Some(entry) = chain.pop_front() {
                let idx = bucket_index(entry.key.hash_code(), new_capacity);
                self.buckets[idx].push_back(entry);
            }
        }
        tracing::debug!(
            old_capacity,
            new_capacity,
            entries = self.len,
            "hash index resized"
        );
    }

    /// Value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        self.buckets[self.bucket_of(key)]
            .find(key)
            .map(|entry| &entry.value)
    }

    /// Mutable access to the value stored under `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        let idx = self.bucket_of(key);
        self.buckets[idx]
            .find_mut(key)
            .map(|entry| &mut entry.value)
    }

    /// Whether `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        self.buckets[self.bucket_of(key)].find(key).is_some()
    }

    /// Unlink the entry for `key` and return its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        let idx = self.bucket_of(key);
        let entry = self.buckets[idx].remove(key)?;
        self.len -= 1;
        Some(entry.value)
    }

    /// Replace the value of an existing key. Absent keys are left absent and
    /// `value` is dropped.
    ///
    /// Returns the previous value if the key was present.
    pub fn update<Q>(&mut self, key: &Q, value: V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: IndexKey + ?Sized,
    {
        self.get_mut(key)
            .map(|slot| std::mem::replace(slot, value))
    }

    /// `put` every pair in order. Returns how many keys were new.
    pub fn bulk_load<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut inserted = 0;
        for (key, value) in pairs {
            inserted += usize::from(self.put(key, value).is_none());
        }
        inserted
    }

    /// Drop every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        let capacity = self.buckets.len();
        self.buckets = empty_buckets(capacity);
        self.len = 0;
    }
}

impl<K, V> HashIndex<K, V> {
    /// Entries in bucket order, chain order within a bucket.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            entry: None,
            remaining: self.len,
        }
    }

    /// Snapshot of every value.
    pub fn values(&self) -> Vec<&V> {
        self.iter().map(|(_, v)| v).collect()
    }

    /// Snapshot of every key.
    pub fn key_set(&self) -> HashSet<&K>
    where
        K: Hash + Eq,
    {
        self.iter().map(|(k, _)| k).collect()
    }
}

/// Iterator over a [`HashIndex`]'s entries.
pub struct Iter<'a, K, V> {
    buckets: std::slice::Iter<'a, Chain<K, V>>,
    entry: Option<&'a Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.entry {
                self.entry = entry.next.as_deref();
                self.remaining -= 1;
                return Some((&entry.key, &entry.value));
            }
            self.entry = self.buckets.next()?.head.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a HashIndex<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: IndexKey, V> Extend<(K, V)> for HashIndex<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K: IndexKey, V> FromIterator<(K, V)> for HashIndex<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashIndex<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
impl<K: IndexKey, V> HashIndex<K, V> {
    /// Check bucket placement, key uniqueness, the cached length and the
    /// load factor bound.
    pub(crate) fn validate(&self) {
        let capacity = self.buckets.len();
        let mut count = 0;
        for (idx, chain) in self.buckets.iter().enumerate() {
            let mut cursor = chain.head.as_deref();
            while let Some(entry) = cursor {
                assert_eq!(
                    bucket_index(entry.key.hash_code(), capacity),
                    idx,
                    "entry stored in the wrong bucket"
                );
                let mut rest = entry.next.as_deref();
                while let Some(other) = rest {
                    assert!(other.key != entry.key, "duplicate key in chain");
                    rest = other.next.as_deref();
                }
                count += 1;
                cursor = entry.next.as_deref();
            }
        }
        assert_eq!(count, self.len, "cached len must match reachable entries");
        assert!(
            self.load_factor() <= self.load_factor,
            "load factor {} above threshold {}",
            self.load_factor(),
            self.load_factor
        );
    }

    fn chain_len(&self, idx: usize) -> usize {
        let mut n = 0;
        let mut cursor = self.buckets[idx].head.as_deref();
        while let Some(entry) = cursor {
            n += 1;
            cursor = entry.next.as_deref();
        }
        n
    }
}
