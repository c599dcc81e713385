//! Plain In-Memory Store
//!
//! A `RwLock<HashMap>` with no expiry and no background task. Useful where
//! entries should live until explicitly deleted, or as a baseline next to
//! [`ExpiringStore`](crate::storage::ExpiringStore).

use crate::storage::KeyValueStore;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};

/// A thread-safe map without TTL support.
#[derive(Debug)]
pub struct InMemoryStore<K = String, V = String> {
    data: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for InMemoryStore<K, V> {
    fn default() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> InMemoryStore<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> KeyValueStore<K, V> for InMemoryStore<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn set(&self, key: K, value: V) {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }

    fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
