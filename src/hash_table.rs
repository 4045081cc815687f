//! HashTable: separate chaining over ascending-hash chains.
//!
//! Entries live in a `SlotMap`; each bucket holds the key of its first
//! entry and entries link forward by key. Within a chain, entries are kept
//! in non-decreasing order of their stored hash, which bounds every scan
//! and fixes where a new entry is spliced in.

use crate::config::{next_bucket_count, TableConfig};
use crate::elem::{elem_hash, Elem};
use crate::error::TableError;
use crate::linked_list::{EqFn, LinkedList};
use core::fmt;
use log::{debug, warn};
use slotmap::{DefaultKey, SlotMap};
use std::rc::Rc;

/// Hash capability supplied at construction. Only strictly positive
/// results are accepted as keys.
pub type HashFn<K> = Rc<dyn Fn(&K) -> i64>;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: i64,
    next: Option<DefaultKey>,
}

/// Where a key sits, or would sit, in its chain. `prev == None` means the
/// bucket head.
enum Probe {
    Found {
        prev: Option<DefaultKey>,
        at: DefaultKey,
    },
    Vacant {
        prev: Option<DefaultKey>,
        next: Option<DefaultKey>,
    },
}

pub struct HashTable<K, V> {
    buckets: Vec<Option<DefaultKey>>,
    entries: SlotMap<DefaultKey, Entry<K, V>>, // one slot per real entry
    key_eq: EqFn<K>,
    value_eq: EqFn<V>,
    hash: HashFn<K>,
    load_factor: f64,
    exhausted: bool, // set once growth has run out of primes
}

impl<K, V> HashTable<K, V> {
    /// Table with 17 buckets and a load factor of 14.0.
    pub fn new<KE, VE, H>(key_eq: KE, value_eq: VE, hash: H) -> Self
    where
        KE: Fn(&K, &K) -> bool + 'static,
        VE: Fn(&V, &V) -> bool + 'static,
        H: Fn(&K) -> i64 + 'static,
    {
        Self::build(
            TableConfig::default(),
            Rc::new(key_eq),
            Rc::new(value_eq),
            Rc::new(hash),
        )
    }

    pub fn with_config<KE, VE, H>(
        config: TableConfig,
        key_eq: KE,
        value_eq: VE,
        hash: H,
    ) -> Result<Self, TableError>
    where
        KE: Fn(&K, &K) -> bool + 'static,
        VE: Fn(&V, &V) -> bool + 'static,
        H: Fn(&K) -> i64 + 'static,
    {
        config.validate()?;
        Ok(Self::build(
            config,
            Rc::new(key_eq),
            Rc::new(value_eq),
            Rc::new(hash),
        ))
    }

    fn build(
        config: TableConfig,
        key_eq: EqFn<K>,
        value_eq: EqFn<V>,
        hash: HashFn<K>,
    ) -> Self {
        Self {
            buckets: vec![None; config.initial_buckets],
            entries: SlotMap::with_key(),
            key_eq,
            value_eq,
            hash,
            load_factor: config.load_factor,
            exhausted: false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn no_buckets(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    fn checked_hash(&self, key: &K) -> Result<i64, TableError> {
        let hash = (self.hash)(key);
        if hash <= 0 {
            return Err(TableError::InvalidKey(hash));
        }
        Ok(hash)
    }

    fn bucket_of(&self, hash: i64) -> usize {
        debug_assert!(hash > 0);
        (hash as u64 % self.buckets.len() as u64) as usize
    }

    fn probe(&self, bucket: usize, hash: i64, key: &K) -> Probe {
        let mut prev = None;
        let mut cur = self.buckets[bucket];
        while let Some(k) = cur {
            let e = &self.entries[k];
            if e.hash >= hash {
                break;
            }
            prev = cur;
            cur = e.next;
        }

        // Distinct keys may share a hash: check the whole equal-hash run.
        let (splice_prev, splice_next) = (prev, cur);
        while let Some(k) = cur {
            let e = &self.entries[k];
            if e.hash != hash {
                break;
            }
            if (self.key_eq)(&e.key, key) {
                return Probe::Found { prev, at: k };
            }
            prev = cur;
            cur = e.next;
        }
        Probe::Vacant {
            prev: splice_prev,
            next: splice_next,
        }
    }

    fn set_next(&mut self, bucket: usize, prev: Option<DefaultKey>, next: Option<DefaultKey>) {
        match prev {
            Some(p) => self.entries[p].next = next,
            None => self.buckets[bucket] = next,
        }
    }

    /// Whether inserting one more entry would push the load past the threshold.
    fn needs_growth(&self) -> bool {
        (self.len() + 1) as f64 / self.buckets.len() as f64 > self.load_factor
    }

    /// Rebuild every chain into the next bucket count of the prime sequence.
    fn grow(&mut self) -> Result<(), TableError> {
        let current = self.buckets.len();
        let Some(target) = next_bucket_count(current) else {
            if self.exhausted {
                debug!("hash table still full at {} buckets", current);
            } else {
                warn!(
                    "hash table cannot grow past {} buckets ({} entries)",
                    current,
                    self.len()
                );
                self.exhausted = true;
            }
            return Err(TableError::CapacityExhausted { buckets: current });
        };
        debug!(
            "growing hash table from {} to {} buckets ({} entries)",
            current,
            target,
            self.len()
        );

        let order = self.chain_order();
        self.buckets.clear();
        self.buckets.resize(target, None);
        for k in order {
            let hash = self.entries[k].hash;
            let bucket = self.bucket_of(hash);
            let mut prev = None;
            let mut cur = self.buckets[bucket];
            while let Some(c) = cur {
                let e = &self.entries[c];
                if e.hash > hash {
                    break;
                }
                prev = cur;
                cur = e.next;
            }
            self.entries[k].next = cur;
            self.set_next(bucket, prev, Some(k));
        }
        Ok(())
    }

    /// Entry keys in bucket order, each chain head to tail.
    fn chain_order(&self) -> Vec<DefaultKey> {
        let mut order = Vec::with_capacity(self.len());
        for &head in &self.buckets {
            let mut cur = head;
            while let Some(k) = cur {
                order.push(k);
                cur = self.entries[k].next;
            }
        }
        order
    }

    /// Insert or update. Returns the previous value when `key` was present.
    ///
    /// Only a new key can trigger growth, which happens before it is linked
    /// in. Once the bucket sequence is used up the table keeps its size:
    /// updates still succeed, but a new key fails with `CapacityExhausted`.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        let hash = self.checked_hash(&key)?;
        let mut bucket = self.bucket_of(hash);
        let mut probe = self.probe(bucket, hash, &key);
        if matches!(probe, Probe::Vacant { .. }) && self.needs_growth() {
            self.grow()?;
            bucket = self.bucket_of(hash);
            probe = self.probe(bucket, hash, &key);
        }

        match probe {
            Probe::Found { at, .. } => Ok(Some(core::mem::replace(
                &mut self.entries[at].value,
                value,
            ))),
            Probe::Vacant { prev, next } => {
                let k = self.entries.insert(Entry {
                    key,
                    value,
                    hash,
                    next,
                });
                self.set_next(bucket, prev, Some(k));
                Ok(None)
            }
        }
    }

    pub fn lookup(&self, key: &K) -> Result<Option<&V>, TableError> {
        let hash = self.checked_hash(key)?;
        match self.probe(self.bucket_of(hash), hash, key) {
            Probe::Found { at, .. } => Ok(Some(&self.entries[at].value)),
            Probe::Vacant { .. } => Ok(None),
        }
    }

    pub fn lookup_mut(&mut self, key: &K) -> Result<Option<&mut V>, TableError> {
        let hash = self.checked_hash(key)?;
        match self.probe(self.bucket_of(hash), hash, key) {
            Probe::Found { at, .. } => Ok(self.entries.get_mut(at).map(|e| &mut e.value)),
            Probe::Vacant { .. } => Ok(None),
        }
    }

    /// Unlink `key` and hand back both the stored key and value.
    pub fn remove_with_key(&mut self, key: &K) -> Result<Option<(K, V)>, TableError> {
        let hash = self.checked_hash(key)?;
        let bucket = self.bucket_of(hash);
        let Probe::Found { prev, at } = self.probe(bucket, hash, key) else {
            return Ok(None);
        };
        let Some(entry) = self.entries.remove(at) else {
            return Ok(None);
        };
        self.set_next(bucket, prev, entry.next);
        Ok(Some((entry.key, entry.value)))
    }

    pub fn remove(&mut self, key: &K) -> Result<Option<V>, TableError> {
        Ok(self.remove_with_key(key)?.map(|(_, v)| v))
    }

    /// Drop every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.buckets.iter_mut().for_each(|b| *b = None);
    }

    pub fn has_key(&self, key: &K) -> bool {
        matches!(self.lookup(key), Ok(Some(_)))
    }

    pub fn has_value(&self, value: &V) -> bool {
        self.iter().any(|(_, v)| (self.value_eq)(v, value))
    }

    pub fn all<P>(&self, mut pred: P) -> bool
    where
        P: FnMut(&K, &V) -> bool,
    {
        self.iter().all(|(k, v)| pred(k, v))
    }

    pub fn any<P>(&self, mut pred: P) -> bool
    where
        P: FnMut(&K, &V) -> bool,
    {
        self.iter().any(|(k, v)| pred(k, v))
    }

    /// Run `f` on every entry in iteration order; values may be changed in place.
    pub fn apply_to_all<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V),
    {
        for b in 0..self.buckets.len() {
            let mut cur = self.buckets[b];
            while let Some(k) = cur {
                let e = &mut self.entries[k];
                f(&e.key, &mut e.value);
                cur = e.next;
            }
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            table: self,
            bucket: 0,
            next: None,
            remaining: self.len(),
        }
    }
}

impl<K: Clone, V> HashTable<K, V> {
    /// Snapshot of all keys. `keys()[i]` pairs with `values()[i]`.
    pub fn keys(&self) -> LinkedList<K> {
        let mut list = LinkedList::with_eq(self.key_eq.clone());
        list.extend(self.iter().map(|(k, _)| k.clone()));
        list
    }
}

impl<K, V: Clone> HashTable<K, V> {
    /// Snapshot of all values, in the same order as `keys()`.
    pub fn values(&self) -> LinkedList<V> {
        let mut list = LinkedList::with_eq(self.value_eq.clone());
        list.extend(self.iter().map(|(_, v)| v.clone()));
        list
    }
}

impl<K, V> HashTable<K, V>
where
    K: PartialEq + 'static,
    V: PartialEq + 'static,
{
    /// Table comparing keys and values with `PartialEq`.
    pub fn with_hash<H>(hash: H) -> Self
    where
        H: Fn(&K) -> i64 + 'static,
    {
        Self::new(|a: &K, b: &K| a == b, |a: &V, b: &V| a == b, hash)
    }
}

impl HashTable<Elem, Elem> {
    /// Table over `Elem` keys and values using `elem_hash`.
    pub fn for_elems() -> Self {
        Self::with_hash(elem_hash)
    }
}

/// Iterator over entries in bucket order, each chain in ascending-hash order.
pub struct Iter<'a, K, V> {
    table: &'a HashTable<K, V>,
    bucket: usize,
    next: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let table = self.table;
        loop {
            if let Some(k) = self.next {
                let e = &table.entries[k];
                self.next = e.next;
                self.remaining = self.remaining.saturating_sub(1);
                return Some((&e.key, &e.value));
            }
            if self.bucket >= table.buckets.len() {
                return None;
            }
            self.next = table.buckets[self.bucket];
            self.bucket += 1;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> IntoIterator for &'a HashTable<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for HashTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
