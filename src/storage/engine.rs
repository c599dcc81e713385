//! Thread-Safe Expiring Store
//!
//! This module implements the core of ttlkv: a concurrent map in which each
//! entry may carry a deadline after which it is treated as absent.
//!
//! ## Design Decisions
//!
//! 1. **Single Lock**: One `RwLock` guards the whole map, so every mutation and
//!    every sweep pass is totally ordered against the others.
//! 2. **Combined Record**: Value and deadline live together in one [`Entry`].
//!    Overwriting a key replaces both at once; a plain `set` cannot leave an
//!    old deadline behind.
//! 3. **Lazy Expiry**: Readers compare the deadline to the clock on every
//!    access and report expired entries as missing.
//! 4. **Active Expiry**: [`cleanup_expired`](ExpiringStore::cleanup_expired)
//!    physically removes expired entries; the background
//!    [`ExpirySweeper`](crate::storage::ExpirySweeper) calls it periodically.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                ExpiringStore                 │
//! │   ┌──────────────────────────────────────┐   │
//! │   │ RwLock<HashMap<K, Entry<V>>>         │   │
//! │   │   key ─> { value, expires_at }       │   │
//! │   └──────────────────────────────────────┘   │
//! │     read: get, contains_key, ttl, len        │
//! │     write: set, set_with_ttl, delete,        │
//! │            expire, persist, sweep pass       │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Physical removal may lag behind logical expiry by up to one sweep
//! interval. Logical expiry never lags: a read at or after the deadline
//! always misses.

use crate::storage::{KeyValueStore, StoreError};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

/// Longest TTL the store will honour (~100 years).
///
/// Larger TTLs are clamped to this value so the deadline arithmetic can
/// never overflow `Instant`.
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Computes the deadline for `ttl` starting at `now`, clamped to [`MAX_TTL`].
///
/// Returns `None` (never expires) in the unlikely case the platform clock
/// cannot represent even the clamped deadline.
fn deadline(now: Instant, ttl: Duration) -> Option<Instant> {
    now.checked_add(ttl.min(MAX_TTL))
}

/// A stored value with an optional deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<V> {
    /// The actual value stored
    pub value: V,
    /// When this entry expires (None = never expires)
    pub expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    /// Creates a new entry without expiry.
    pub fn new(value: V) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Creates a new entry that expires `ttl` after `now`.
    ///
    /// TTLs above [`MAX_TTL`] are clamped.
    pub fn with_ttl(value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: deadline(now, ttl),
        }
    }

    /// Checks whether this entry is expired as of `now`.
    ///
    /// An entry is expired from its deadline onward, inclusive.
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }

    /// Checks whether this entry has expired.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Returns the time left before expiry, or None if the entry never expires.
    pub fn remaining_ttl(&self, now: Instant) -> Option<Duration> {
        self.expires_at
            .map(|exp| exp.saturating_duration_since(now))
    }
}

/// A concurrency-safe key-value store with optional per-key TTL.
///
/// Wrap it in an `Arc` to share it between threads and with the
/// background sweeper. All operations take `&self`.
///
/// # Example
///
/// ```
/// use ttlkv::storage::ExpiringStore;
/// use std::time::Duration;
///
/// let store: ExpiringStore = ExpiringStore::new();
///
/// store.set("name".to_string(), "ttlkv".to_string());
/// assert_eq!(store.get("name"), Some("ttlkv".to_string()));
///
/// store
///     .set_with_ttl("session".to_string(), "abc123".to_string(), Duration::from_secs(60))
///     .unwrap();
/// assert!(store.contains_key("session"));
///
/// // Zero TTLs are refused rather than stored already expired
/// assert!(store
///     .set_with_ttl("bad".to_string(), "x".to_string(), Duration::ZERO)
///     .is_err());
/// ```
pub struct ExpiringStore<K = String, V = String> {
    data: RwLock<HashMap<K, Entry<V>>>,

    /// Statistics: total get operations
    get_count: AtomicU64,

    /// Statistics: gets that found a live value
    hit_count: AtomicU64,

    /// Statistics: total set operations (with or without TTL)
    set_count: AtomicU64,

    /// Statistics: total delete operations
    del_count: AtomicU64,

    /// Statistics: number of expired entries removed by sweeps
    expired_count: AtomicU64,
}

impl<K, V> std::fmt::Debug for ExpiringStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys = self.read().len();
        f.debug_struct("ExpiringStore")
            .field("keys", &keys)
            .field("get_count", &self.get_count.load(Ordering::Relaxed))
            .field("set_count", &self.set_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl<K, V> Default for ExpiringStore<K, V> {
    fn default() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            get_count: AtomicU64::new(0),
            hit_count: AtomicU64::new(0),
            set_count: AtomicU64::new(0),
            del_count: AtomicU64::new(0),
            expired_count: AtomicU64::new(0),
        }
    }
}

impl<K, V> ExpiringStore<K, V> {
    // Every critical section leaves the map consistent, so a poisoned
    // lock still guards valid data.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<K, Entry<V>>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, Entry<V>>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> ExpiringStore<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Creates an empty store.
    ///
    /// No sweeper is attached; expired entries are hidden from readers but
    /// only reclaimed by [`cleanup_expired`](Self::cleanup_expired). Use
    /// [`ExpiringStore::start`] to get a store with a running sweeper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a key-value pair without expiry.
    ///
    /// Any deadline previously attached to the key is dropped along with the
    /// old value.
    ///
    /// # Returns
    ///
    /// Returns `true` if a new key was created, `false` if a live key was updated.
    pub fn set(&self, key: K, value: V) -> bool {
        self.set_count.fetch_add(1, Ordering::Relaxed);
        self.insert(key, Entry::new(value), Instant::now())
    }

    /// Sets a key-value pair that expires after `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidTtl`] for a zero `ttl`; the store is left
    /// untouched. A `ttl` above [`MAX_TTL`] is accepted and clamped.
    ///
    /// # Returns
    ///
    /// Returns `true` if a new key was created, `false` if a live key was updated.
    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration) -> Result<bool, StoreError> {
        if ttl.is_zero() {
            return Err(StoreError::InvalidTtl(ttl));
        }

        self.set_count.fetch_add(1, Ordering::Relaxed);
        let now = Instant::now();
        Ok(self.insert(key, Entry::with_ttl(value, ttl, now), now))
    }

    fn insert(&self, key: K, entry: Entry<V>, now: Instant) -> bool {
        let mut data = self.write();
        match data.insert(key, entry) {
            Some(old) => old.is_expired_at(now),
            None => true,
        }
    }

    /// Gets the value for a key.
    ///
    /// Returns `None` if the key was never set, was deleted, or has reached
    /// its deadline. Only the read lock is taken; an expired entry stays in
    /// the map until the next sweep.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_count.fetch_add(1, Ordering::Relaxed);

        let now = Instant::now();
        let data = self.read();
        let value = data
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.value.clone());

        if value.is_some() {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
        }
        value
    }

    /// Gets the full live entry for a key, including its deadline.
    pub fn get_entry<Q>(&self, key: &Q) -> Option<Entry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        self.read()
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .cloned()
    }

    /// Checks if a key exists (and is not expired).
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        self.read()
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Deletes a key and its deadline.
    ///
    /// Deleting an absent key is a no-op.
    ///
    /// # Returns
    ///
    /// Returns `true` if a live key was removed.
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.del_count.fetch_add(1, Ordering::Relaxed);

        let now = Instant::now();
        self.write()
            .remove(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Gets the remaining TTL for a key.
    ///
    /// # Returns
    ///
    /// - `None` if the key doesn't exist or has expired
    /// - `Some(None)` if the key exists but has no expiry
    /// - `Some(Some(remaining))` if the key exists and has an expiry
    pub fn ttl<Q>(&self, key: &Q) -> Option<Option<Duration>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        self.read()
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.remaining_ttl(now))
    }

    /// Sets or replaces the expiry on a live key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidTtl`] for a zero `ttl`. A `ttl` above
    /// [`MAX_TTL`] is accepted and clamped.
    ///
    /// # Returns
    ///
    /// Returns `true` if the expiry was set, `false` if the key doesn't exist.
    pub fn expire<Q>(&self, key: &Q, ttl: Duration) -> Result<bool, StoreError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if ttl.is_zero() {
            return Err(StoreError::InvalidTtl(ttl));
        }

        let now = Instant::now();
        let mut data = self.write();
        match data.get_mut(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                entry.expires_at = deadline(now, ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Removes the expiry from a key (makes it persistent).
    ///
    /// # Returns
    ///
    /// Returns `true` if the expiry was removed, `false` if the key doesn't exist
    /// or didn't have an expiry.
    pub fn persist<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = Instant::now();
        let mut data = self.write();
        match data.get_mut(key) {
            Some(entry) if !entry.is_expired_at(now) => entry.expires_at.take().is_some(),
            _ => false,
        }
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Returns the number of physically stored entries.
    ///
    /// Expired entries that have not been swept yet are included.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns store statistics.
    pub fn stats(&self) -> StorageStats {
        let get_ops = self.get_count.load(Ordering::Relaxed);
        let hits = self.hit_count.load(Ordering::Relaxed);
        StorageStats {
            keys: self.len(),
            get_ops,
            hits,
            misses: get_ops.saturating_sub(hits),
            set_ops: self.set_count.load(Ordering::Relaxed),
            del_ops: self.del_count.load(Ordering::Relaxed),
            expired: self.expired_count.load(Ordering::Relaxed),
        }
    }

    /// Removes every expired entry.
    ///
    /// This is one pass of the background expiry sweeper. It holds the write
    /// lock for the whole scan.
    ///
    /// # Returns
    ///
    /// Returns the number of entries that were removed.
    pub fn cleanup_expired(&self) -> u64 {
        let now = Instant::now();
        let mut data = self.write();
        let before = data.len();

        data.retain(|_, entry| !entry.is_expired_at(now));

        let cleaned = (before - data.len()) as u64;
        drop(data);

        if cleaned > 0 {
            self.expired_count.fetch_add(cleaned, Ordering::Relaxed);
        }
        cleaned
    }
}

impl<K, V> KeyValueStore<K, V> for ExpiringStore<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn set(&self, key: K, value: V) {
        ExpiringStore::set(self, key, value);
    }

    fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        ExpiringStore::get(self, key)
    }

    fn delete<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        ExpiringStore::delete(self, key);
    }
}

/// Store statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of entries physically stored (including unswept expired ones)
    pub keys: usize,
    /// Total get operations
    pub get_ops: u64,
    /// Gets that returned a value
    pub hits: u64,
    /// Gets that found nothing live
    pub misses: u64,
    /// Total set operations
    pub set_ops: u64,
    /// Total delete operations
    pub del_ops: u64,
    /// Total expired entries removed by sweeps
    pub expired: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn s(text: &str) -> String {
        text.to_string()
    }

    #[test]
    fn test_get_nonexistent() {
        let store: ExpiringStore = ExpiringStore::new();
        assert_eq!(store.get("nonexistent"), None);
        assert!(!store.contains_key("nonexistent"));
    }

    #[test]
    fn test_set_and_get() {
        let store: ExpiringStore = ExpiringStore::new();

        assert!(store.set(s("key"), s("value")));
        assert_eq!(store.get("key"), Some(s("value")));

        // Overwrite reports an update, not a new key
        assert!(!store.set(s("key"), s("other")));
        assert_eq!(store.get("key"), Some(s("other")));
    }

    #[test]
    fn test_set_has_no_implicit_expiry() {
        let store: ExpiringStore = ExpiringStore::new();

        store.set(s("key"), s("value"));
        thread::sleep(Duration::from_millis(50));

        assert_eq!(store.get("key"), Some(s("value")));
        assert_eq!(store.ttl("key"), Some(None));
    }

    #[test]
    fn test_delete() {
        let store: ExpiringStore = ExpiringStore::new();

        store.set(s("key"), s("value"));
        assert!(store.delete("key"));
        assert_eq!(store.get("key"), None);

        // Already deleted
        assert!(!store.delete("key"));
        assert!(!store.delete("never-set"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_expiry() {
        let store: ExpiringStore = ExpiringStore::new();

        store
            .set_with_ttl(s("key"), s("value"), Duration::from_millis(50))
            .unwrap();

        // Key should exist immediately
        assert_eq!(store.get("key"), Some(s("value")));

        // Wait for expiry
        thread::sleep(Duration::from_millis(100));

        // Logically gone, physically still there until a sweep
        assert_eq!(store.get("key"), None);
        assert!(!store.contains_key("key"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let store: ExpiringStore = ExpiringStore::new();

        let result = store.set_with_ttl(s("key"), s("value"), Duration::ZERO);
        assert_eq!(result, Err(StoreError::InvalidTtl(Duration::ZERO)));
        assert!(store.is_empty());

        // A rejected TTL leaves an existing entry alone
        store.set(s("key"), s("value"));
        assert!(store.set_with_ttl(s("key"), s("new"), Duration::ZERO).is_err());
        assert_eq!(store.get("key"), Some(s("value")));
    }

    #[test]
    fn test_huge_ttl_is_clamped() {
        let store: ExpiringStore = ExpiringStore::new();

        assert_eq!(
            store.set_with_ttl(s("key"), s("value"), Duration::MAX),
            Ok(true)
        );
        assert_eq!(store.get("key"), Some(s("value")));
        let remaining = store.ttl("key").flatten().unwrap();
        assert!(remaining <= MAX_TTL && remaining > MAX_TTL - Duration::from_secs(60));

        store.set(s("other"), s("value"));
        assert_eq!(store.expire("other", Duration::from_secs(u64::MAX)), Ok(true));
        assert!(store.ttl("other").flatten().unwrap() <= MAX_TTL);

        // The lock is not poisoned and the store keeps working
        assert!(store.set(s("after"), s("ok")));
        assert_eq!(store.get("after"), Some(s("ok")));
        assert!(store.delete("key"));
        assert_eq!(store.cleanup_expired(), 0);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_set_clears_previous_ttl() {
        let store: ExpiringStore = ExpiringStore::new();

        store
            .set_with_ttl(s("key"), s("v1"), Duration::from_millis(30))
            .unwrap();
        store.set(s("key"), s("v2"));

        thread::sleep(Duration::from_millis(80));

        assert_eq!(store.get("key"), Some(s("v2")));
        assert_eq!(store.ttl("key"), Some(None));
    }

    #[test]
    fn test_refresh_ttl() {
        let store: ExpiringStore = ExpiringStore::new();

        store
            .set_with_ttl(s("key"), s("v1"), Duration::from_millis(30))
            .unwrap();
        let is_new = store
            .set_with_ttl(s("key"), s("v2"), Duration::from_secs(60))
            .unwrap();
        assert!(!is_new);

        thread::sleep(Duration::from_millis(80));
        assert_eq!(store.get("key"), Some(s("v2")));
    }

    #[test]
    fn test_set_over_expired_entry_counts_as_new() {
        let store: ExpiringStore = ExpiringStore::new();

        store
            .set_with_ttl(s("key"), s("old"), Duration::from_millis(10))
            .unwrap();
        thread::sleep(Duration::from_millis(30));

        assert!(store.set(s("key"), s("fresh")));
        assert_eq!(store.get("key"), Some(s("fresh")));
    }

    #[test]
    fn test_delete_expired_entry() {
        let store: ExpiringStore = ExpiringStore::new();

        store
            .set_with_ttl(s("key"), s("value"), Duration::from_millis(10))
            .unwrap();
        thread::sleep(Duration::from_millis(30));

        // Physically removed, but it was not live
        assert!(!store.delete("key"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_ttl() {
        let store: ExpiringStore = ExpiringStore::new();

        // No TTL on non-existent key
        assert_eq!(store.ttl("nonexistent"), None);

        // No TTL on persistent key
        store.set(s("persistent"), s("value"));
        assert_eq!(store.ttl("persistent"), Some(None));

        // TTL on expiring key
        store
            .set_with_ttl(s("expiring"), s("value"), Duration::from_secs(100))
            .unwrap();
        let remaining = store.ttl("expiring").flatten().unwrap();
        assert!(remaining > Duration::from_secs(90) && remaining <= Duration::from_secs(100));
    }

    #[test]
    fn test_expire_and_persist() {
        let store: ExpiringStore = ExpiringStore::new();

        assert_eq!(store.expire("missing", Duration::from_secs(60)), Ok(false));

        store.set(s("key"), s("value"));
        assert_eq!(store.expire("key", Duration::from_secs(60)), Ok(true));
        assert!(store.ttl("key").flatten().is_some());

        assert_eq!(
            store.expire("key", Duration::ZERO),
            Err(StoreError::InvalidTtl(Duration::ZERO))
        );

        // Persist (remove expiry)
        assert!(store.persist("key"));
        assert_eq!(store.ttl("key"), Some(None));
        assert!(!store.persist("key"));
        assert!(!store.persist("missing"));
    }

    #[test]
    fn test_expire_makes_key_vanish() {
        let store: ExpiringStore = ExpiringStore::new();

        store.set(s("key"), s("value"));
        store.expire("key", Duration::from_millis(20)).unwrap();

        thread::sleep(Duration::from_millis(60));
        assert_eq!(store.get("key"), None);
        assert!(!store.persist("key"));
    }

    #[test]
    fn test_get_entry() {
        let store: ExpiringStore = ExpiringStore::new();

        store
            .set_with_ttl(s("key"), s("value"), Duration::from_secs(60))
            .unwrap();

        let entry = store.get_entry("key").unwrap();
        assert_eq!(entry.value, s("value"));
        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_deadline_is_inclusive() {
        let now = Instant::now();
        let entry = Entry::with_ttl("v", Duration::from_millis(5), now);
        let deadline = entry.expires_at.unwrap();

        assert!(!entry.is_expired_at(now));
        assert!(entry.is_expired_at(deadline));
        assert_eq!(entry.remaining_ttl(deadline), Some(Duration::ZERO));
        assert_eq!(Entry::new("v").remaining_ttl(now), None);
    }

    #[test]
    fn test_clear() {
        let store: ExpiringStore = ExpiringStore::new();

        store.set(s("key1"), s("value1"));
        store.set(s("key2"), s("value2"));
        assert_eq!(store.len(), 2);

        store.clear();

        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_cleanup_expired() {
        let store: ExpiringStore = ExpiringStore::new();

        store
            .set_with_ttl(s("key1"), s("value1"), Duration::from_millis(10))
            .unwrap();
        store
            .set_with_ttl(s("key2"), s("value2"), Duration::from_millis(10))
            .unwrap();
        store
            .set_with_ttl(s("key3"), s("value3"), Duration::from_secs(60))
            .unwrap();
        store.set(s("key4"), s("value4")); // No expiry

        thread::sleep(Duration::from_millis(50));

        assert_eq!(store.cleanup_expired(), 2);
        assert_eq!(store.len(), 2);
        assert!(store.contains_key("key3"));
        assert!(store.contains_key("key4"));

        // Nothing left to clean
        assert_eq!(store.cleanup_expired(), 0);
        assert_eq!(store.stats().expired, 2);
    }

    #[test]
    fn test_stats() {
        let store: ExpiringStore = ExpiringStore::new();

        store.set(s("a"), s("1"));
        store
            .set_with_ttl(s("b"), s("2"), Duration::from_secs(60))
            .unwrap();
        store.get("a");
        store.get("b");
        store.get("missing");
        store.delete("a");

        let stats = store.stats();
        assert_eq!(stats.keys, 1);
        assert_eq!(stats.set_ops, 2);
        assert_eq!(stats.get_ops, 3);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.del_ops, 1);
        assert_eq!(stats.expired, 0);
    }

    #[test]
    fn test_generic_key_and_value() {
        let store: ExpiringStore<u64, Vec<u8>> = ExpiringStore::new();

        store.set(7, vec![1, 2, 3]);
        assert_eq!(store.get(&7), Some(vec![1, 2, 3]));
        assert_eq!(store.get(&8), None);
    }

    #[test]
    fn test_key_value_store_trait() {
        fn roundtrip<S: KeyValueStore<String, String>>(store: &S) -> Option<String> {
            store.set(s("k"), s("v"));
            let value = store.get("k");
            store.delete("k");
            value
        }

        let store: ExpiringStore = ExpiringStore::new();
        assert_eq!(roundtrip(&store), Some(s("v")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        let store: Arc<ExpiringStore> = Arc::new(ExpiringStore::new());

        // Disjoint writers
        let writers: Vec<_> = (0..10)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..100 {
                        store.set(format!("key-{}-{}", i, j), format!("value-{}-{}", i, j));
                    }
                })
            })
            .collect();

        for handle in writers {
            handle.join().unwrap();
        }

        // Readers each check their own writer's keys
        let readers: Vec<_> = (0..10)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for j in 0..100 {
                        let value = store.get(format!("key-{}-{}", i, j).as_str());
                        assert_eq!(value, Some(format!("value-{}-{}", i, j)));
                    }
                })
            })
            .collect();

        for handle in readers {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 1000);
    }

    #[test]
    fn test_concurrent_writes_same_key() {
        let store: Arc<ExpiringStore> = Arc::new(ExpiringStore::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..200 {
                        if i % 2 == 0 {
                            store.set(s("shared"), format!("plain-{}", i));
                        } else {
                            store
                                .set_with_ttl(
                                    s("shared"),
                                    format!("ttl-{}", i),
                                    Duration::from_secs(60),
                                )
                                .unwrap();
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // Value and deadline always come from the same writer
        let entry = store.get_entry("shared").unwrap();
        if entry.value.starts_with("plain-") {
            assert!(entry.expires_at.is_none());
        } else {
            assert!(entry.expires_at.is_some());
        }
        assert_eq!(store.len(), 1);
    }
}
