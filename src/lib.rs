//! # ttlkv - An In-Process Key-Value Store with TTL Expiry
//!
//! ttlkv is a concurrency-safe, in-memory key-value store where each entry may
//! carry a time-to-live. It is meant as a fast local cache: no persistence,
//! no network surface.
//!
//! ## Features
//!
//! - **Thread Safe**: One `RwLock` serializes writers and admits concurrent readers
//! - **TTL Support**: Keys can expire after a per-entry duration
//! - **Lazy + Active Expiry**: Expired keys are hidden on read and reclaimed
//!   by a background sweeper
//! - **Explicit Shutdown**: The sweeper is owned by a handle that stops it on drop
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         ttlkv                            │
//! │                                                          │
//! │   callers ──set/get/delete──> ┌──────────────────────┐   │
//! │   (any thread)                │    ExpiringStore     │   │
//! │                               │  RwLock<HashMap<..>> │   │
//! │                               └──────────▲───────────┘   │
//! │                                          │ cleanup       │
//! │                               ┌──────────┴───────────┐   │
//! │                               │    ExpirySweeper     │   │
//! │                               │ (Background Tokio    │   │
//! │                               │  Task)               │   │
//! │                               └──────────────────────┘   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use ttlkv::{ExpiringStore, ExpiryConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ttlkv::StoreError> {
//!     // Create the store and start its background sweeper
//!     let (store, sweeper) = ExpiringStore::<String, String>::start(ExpiryConfig::default())?;
//!
//!     store.set("key".to_string(), "val".to_string());
//!     store.set_with_ttl("temp".to_string(), "expire soon".to_string(), Duration::from_secs(2))?;
//!
//!     assert_eq!(store.get("key"), Some("val".to_string()));
//!     assert_eq!(store.get("temp"), Some("expire soon".to_string()));
//!
//!     // Stop the sweeper deterministically
//!     sweeper.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`storage`]: The expiring store, its sweeper, and the plain in-memory store
//!
//! ## Design Highlights
//!
//! ### Lazy + Active Expiry
//!
//! Keys with TTL are expired in two ways:
//! 1. **Lazy**: Every read compares the deadline to the clock, so an expired
//!    key is never returned
//! 2. **Active**: A background task periodically removes expired keys
//!
//! This ensures memory is reclaimed even for keys that are never accessed again.
//!
//! ### TTL Bounds
//!
//! A zero TTL is rejected with [`StoreError::InvalidTtl`] instead of storing an
//! entry that is already expired. A TTL longer than [`MAX_TTL`] (~100 years) is
//! accepted and clamped to it, so even `Duration::MAX` cannot overflow the
//! deadline.

pub mod storage;

// Re-export commonly used types for convenience
pub use storage::{
    Entry, ExpiringStore, ExpiryConfig, ExpirySweeper, InMemoryStore, KeyValueStore,
    StorageStats, StoreError, MAX_TTL,
};

/// Default interval between background sweeps, in milliseconds
pub const DEFAULT_SWEEP_INTERVAL_MS: u64 = 1000;

/// Version of ttlkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
