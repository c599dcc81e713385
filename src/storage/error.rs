//! Store Errors
//!
//! Absence of a key is never an error: lookups return `Option`.
//! The variants here cover the few arguments the store refuses outright.

use std::time::Duration;
use thiserror::Error;

/// Errors returned by the expiring store and its sweeper.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A TTL of zero would create an entry that is expired on arrival
    #[error("invalid TTL: {0:?} (must be greater than zero)")]
    InvalidTtl(Duration),

    /// The sweeper cannot tick on a zero period
    #[error("invalid sweep interval: {0:?} (must be greater than zero)")]
    InvalidSweepInterval(Duration),

    /// The sweeper was started outside of a Tokio runtime
    #[error("no Tokio runtime available to run the expiry sweeper")]
    NoRuntime,
}
