//! Storage Module
//!
//! This module provides the core storage functionality for ttlkv.
//! It includes a thread-safe key-value store with per-key TTL support
//! and a background expiry sweeper.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                ExpiringStore                │
//! │     RwLock<HashMap<K, Entry<V>>>            │
//! │     lazy expiry on every read               │
//! └─────────────────────────────────────────────┘
//!                        ▲
//!                        │ Weak
//!          ┌─────────────┴─────────────┐
//!          │      ExpirySweeper        │
//!          │  (Background Tokio Task)  │
//!          └───────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use ttlkv::storage::{ExpiringStore, ExpiryConfig};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), ttlkv::StoreError> {
//! let (store, _sweeper) = ExpiringStore::<String, String>::start(ExpiryConfig::default())?;
//!
//! // Basic operations
//! store.set("name".to_string(), "ttlkv".to_string());
//! assert_eq!(store.get("name"), Some("ttlkv".to_string()));
//!
//! // Set with TTL
//! store.set_with_ttl(
//!     "session".to_string(),
//!     "token123".to_string(),
//!     Duration::from_secs(3600),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod expiry;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use engine::{Entry, ExpiringStore, StorageStats, MAX_TTL};
pub use error::StoreError;
pub use expiry::{ExpiryConfig, ExpirySweeper};
pub use memory::InMemoryStore;
pub use traits::KeyValueStore;
