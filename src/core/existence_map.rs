use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;
use crate::errors::collection_error::CollectionError;

/// Outcome of [`ExistenceMap::insert_or_replace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertSignal {
    Inserted,
    Replaced,
}

/// Outcome of [`ExistenceMap::erase`]. Erasing an absent key is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseSignal {
    Erased,
    NotErased,
}

/// Key-value store where presence is tracked by the key itself, never by the
/// value being non-default.
#[derive(Debug, Clone)]
pub struct ExistenceMap<K, V> {
    entries: HashMap<K, V, RandomState>,
}

impl<K: Eq + Hash, V> ExistenceMap<K, V> {
    pub fn new() -> Self {
        Self { entries: HashMap::default() }
    }

    pub fn insert_or_replace(&mut self, key: K, value: V) -> InsertSignal {
        match self.entries.insert(key, value) {
            Some(_) => InsertSignal::Replaced,
            None => InsertSignal::Inserted,
        }
    }

    pub fn get(&self, key: &K) -> Result<&V, CollectionError> {
        self.entries.get(key).ok_or(CollectionError::KeyNotFound)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn erase(&mut self, key: &K) -> EraseSignal {
        match self.entries.remove(key) {
            Some(_) => EraseSignal::Erased,
            None => EraseSignal::NotErased,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K: Eq + Hash, V> Default for ExistenceMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
