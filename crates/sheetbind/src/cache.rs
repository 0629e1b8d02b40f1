//! Per-type binding caches.
//!
//! Entries are keyed by the address of a type's `Arc<RecordType>` and hold
//! only a `Weak` to it, so caching a binding never keeps its type alive. Once
//! the last strong reference to a type is dropped its entry is stale: lookups
//! ignore it and the next insert (or an explicit [`WeakCache::purge`]) removes
//! it. A `Weak` keeps the allocation reserved, so a stale entry's address is
//! never handed to a new type while the entry exists.

use crate::record::RecordType;
use crate::resolver::{IndexBinding, TitleBinding};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;
use std::sync::{Arc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Keep one binding per live type.
    #[default]
    Weak,
    /// Recompute on every resolution.
    Disabled,
}

struct CacheEntry<V> {
    key: Weak<RecordType>,
    value: Arc<V>,
}

impl<V> CacheEntry<V> {
    fn new(record: &Arc<RecordType>, value: Arc<V>) -> Self {
        Self {
            key: Arc::downgrade(record),
            value,
        }
    }

    fn is_live(&self) -> bool {
        self.key.strong_count() > 0
    }

    fn is_live_for(&self, record: &Arc<RecordType>) -> bool {
        self.is_live() && std::ptr::eq(self.key.as_ptr(), Arc::as_ptr(record))
    }
}

fn key_of(record: &Arc<RecordType>) -> usize {
    Arc::as_ptr(record) as usize
}

/// Concurrent map from a live record type to a computed value.
pub struct WeakCache<V> {
    entries: DashMap<usize, CacheEntry<V>, BuildHasherDefault<FxHasher>>,
}

impl<V> Default for WeakCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> WeakCache<V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(BuildHasherDefault::default()),
        }
    }

    pub fn get(&self, record: &Arc<RecordType>) -> Option<Arc<V>> {
        let entry = self.entries.get(&key_of(record))?;
        entry.is_live_for(record).then(|| Arc::clone(&entry.value))
    }

    /// Store `value` for `record` and return the cached value.
    ///
    /// If another caller stored a value for the same live type first, that
    /// value is kept and returned instead.
    pub fn insert(&self, record: &Arc<RecordType>, value: Arc<V>) -> Arc<V> {
        self.purge();
        match self.entries.entry(key_of(record)) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_live_for(record) {
                    return Arc::clone(&occupied.get().value);
                }
                occupied.insert(CacheEntry::new(record, Arc::clone(&value)));
                value
            }
            Entry::Vacant(vacant) => {
                vacant.insert(CacheEntry::new(record, Arc::clone(&value)));
                value
            }
        }
    }

    /// Drop the entry for `record`. Returns whether one existed.
    pub fn invalidate(&self, record: &Arc<RecordType>) -> bool {
        self.entries.remove(&key_of(record)).is_some()
    }

    /// Remove entries whose type has been dropped. Returns how many were removed.
    pub fn purge(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live());
        let removed = before.saturating_sub(self.entries.len());
        #[cfg(feature = "tracing")]
        if removed > 0 {
            tracing::debug!(removed, "purged stale binding cache entries");
        }
        removed
    }

    /// Number of entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

/// The index and title caches of one resolver. They are filled independently.
#[derive(Default)]
pub struct MetadataCache {
    index: WeakCache<IndexBinding>,
    titles: WeakCache<TitleBinding>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> &WeakCache<IndexBinding> {
        &self.index
    }

    pub fn titles(&self) -> &WeakCache<TitleBinding> {
        &self.titles
    }

    /// Retire both bindings of `record`.
    pub fn invalidate(&self, record: &Arc<RecordType>) {
        self.index.invalidate(record);
        self.titles.invalidate(record);
    }

    pub fn purge(&self) -> usize {
        self.index.purge() + self.titles.purge()
    }

    pub fn clear(&self) {
        self.index.clear();
        self.titles.clear();
    }
}
