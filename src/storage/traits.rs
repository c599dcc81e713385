//! The basic key-value contract shared by every store in this crate.

use std::borrow::Borrow;
use std::hash::Hash;

/// Set/get/delete over a shared, thread-safe map.
///
/// All methods take `&self`: implementations carry their own locking,
/// so a store can sit behind an `Arc` and be used from many threads.
/// Lookups accept any borrowed form of the key, so a `String`-keyed store
/// can be queried with a `&str`.
pub trait KeyValueStore<K, V> {
    /// Inserts or overwrites `key` with no expiry.
    fn set(&self, key: K, value: V);

    /// Returns the live value for `key`, if any.
    fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Removes `key`. Removing an absent key is a no-op.
    fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;
}
