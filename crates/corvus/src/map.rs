//! An insertion-ordered map that remembers where each entry was defined,
//! so re-inserting a key produces a proper "already defined" diagnostic
//! instead of silently overwriting.

use std::hash::Hash;

use indexmap::{Equivalent, IndexMap};

use crate::nom_tools::SourceLocation;

pub trait ValueTrait {
    fn location(&self) -> SourceLocation;
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    location: SourceLocation,
}

/// `IndexMap` wrapper with a `validate_insert` that rejects duplicate keys
/// and reports both the new and the original definition site.
#[derive(Debug, Clone)]
pub struct OrderedMap<K: Hash + Eq, V: ValueTrait> {
    map: IndexMap<K, Entry<V>>,
}

impl<K: Hash + Eq, V: ValueTrait> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Returned when `validate_insert` finds the key already present.
pub struct DuplicateKey {
    pub new_location: SourceLocation,
    pub existing_location: SourceLocation,
}

impl<K: Hash + Eq, V: ValueTrait> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self { map: IndexMap::new() }
    }

    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let location = value.location();
        self.map.insert(key, Entry { value, location }).map(|entry| entry.value)
    }

    pub fn validate_insert(&mut self, key: K, value: V) -> Result<(), DuplicateKey> {
        let location = value.location();
        match self.map.insert(key, Entry { value, location }) {
            Some(old) => Err(DuplicateKey {
                new_location: location,
                existing_location: old.location,
            }),
            None => Ok(()),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.map.get(key).map(|entry| &entry.value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.map.get_mut(key).map(|entry| &mut entry.value)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.map.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.map.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.map.values().map(|entry| &entry.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.map.iter().map(|(k, entry)| (k, &entry.value))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
