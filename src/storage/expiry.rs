//! Background Expiry Sweeper
//!
//! This module implements a background task that periodically scans the store
//! for expired keys and removes them. This is called "active expiry" as opposed
//! to "lazy expiry" (which happens on every read).
//!
//! ## Why Do We Need This?
//!
//! Lazy expiry hides expired keys from readers but never frees them.
//! If a key expires and is never accessed again, it would stay in memory
//! forever. The sweeper bounds that by reclaiming expired entries once per
//! interval.
//!
//! ## Design
//!
//! The sweeper runs as a Tokio task and:
//! 1. Sleeps for the configured interval (default: 1s)
//! 2. Wakes up and removes every expired entry in one pass
//! 3. Logs how many entries were reclaimed
//!
//! The task only holds a weak reference to the store. It exits when the
//! [`ExpirySweeper`] handle is stopped or dropped, or when the last strong
//! reference to the store goes away.

use crate::storage::{ExpiringStore, StoreError};
use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

/// Configuration for the expiry sweeper.
///
/// # Example
///
/// ```
/// use ttlkv::storage::ExpiryConfig;
/// use std::time::Duration;
///
/// let config = ExpiryConfig::default().with_sweep_interval(Duration::from_millis(250));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryConfig {
    /// Interval between sweeps (default: 1s)
    ///
    /// Shorter intervals reclaim memory sooner but take the write lock more
    /// often. Reads are correct regardless of this value.
    pub sweep_interval: Duration,
}

impl Default for ExpiryConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_millis(crate::DEFAULT_SWEEP_INTERVAL_MS),
        }
    }
}

impl ExpiryConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the interval between sweeps.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Checks that the configuration can drive a sweeper.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.sweep_interval.is_zero() {
            return Err(StoreError::InvalidSweepInterval(self.sweep_interval));
        }
        Ok(())
    }
}

/// A handle to the running expiry sweeper.
///
/// When this handle is dropped, the sweeper task will be stopped.
#[derive(Debug)]
pub struct ExpirySweeper {
    /// Sender to signal shutdown
    shutdown_tx: watch::Sender<bool>,

    /// The spawned sweep loop
    task: JoinHandle<()>,
}

impl ExpirySweeper {
    /// Starts the expiry sweeper as a background task on the current Tokio runtime.
    ///
    /// The task keeps only a weak reference to `store`. The caller must hold
    /// on to its own `Arc` for as long as sweeping should continue: passing in
    /// the only handle (e.g. `ExpirySweeper::start(Arc::new(store), config)`)
    /// drops the store right away, and the sweeper exits on its first tick.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidSweepInterval`] if `config` has a zero interval
    /// - [`StoreError::NoRuntime`] if called outside a Tokio runtime
    ///
    /// # Example
    ///
    /// ```
    /// use ttlkv::storage::{ExpiringStore, ExpirySweeper, ExpiryConfig};
    /// use std::sync::Arc;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), ttlkv::StoreError> {
    /// let store: Arc<ExpiringStore> = Arc::new(ExpiringStore::new());
    /// let sweeper = ExpirySweeper::start(Arc::clone(&store), ExpiryConfig::default())?;
    ///
    /// // Sweeper runs in the background...
    ///
    /// // Dropping the sweeper will stop it
    /// drop(sweeper);
    /// # Ok(())
    /// # }
    /// ```
    pub fn start<K, V>(
        store: Arc<ExpiringStore<K, V>>,
        config: ExpiryConfig,
    ) -> Result<Self, StoreError>
    where
        K: Eq + Hash + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
    {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| StoreError::NoRuntime)?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = runtime.spawn(sweeper_loop(
            Arc::downgrade(&store),
            config.sweep_interval,
            shutdown_rx,
        ));

        info!(
            interval_ms = config.sweep_interval.as_millis(),
            "Background expiry sweeper started"
        );

        Ok(Self { shutdown_tx, task })
    }

    /// Stops the expiry sweeper.
    ///
    /// This is called automatically when the handle is dropped. Calling it
    /// more than once has no further effect.
    pub fn stop(&self) {
        if !self.shutdown_tx.send_replace(true) {
            info!("Background expiry sweeper stopped");
        }
    }

    /// Stops the sweeper and waits for its task to finish.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Err(e) = (&mut self.task).await {
            debug!(error = %e, "Expiry sweeper task ended abnormally");
        }
    }

    /// Returns true while the sweep loop is still running.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<K, V> ExpiringStore<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a store together with a running expiry sweeper.
    ///
    /// The sweeper stops when its handle is dropped or when the returned
    /// store (and every clone of the `Arc`) is dropped.
    ///
    /// # Errors
    ///
    /// Same as [`ExpirySweeper::start`].
    pub fn start(config: ExpiryConfig) -> Result<(Arc<Self>, ExpirySweeper), StoreError> {
        let store = Arc::new(Self::new());
        let sweeper = ExpirySweeper::start(Arc::clone(&store), config)?;
        Ok((store, sweeper))
    }
}

/// The main sweeper loop.
async fn sweeper_loop<K, V>(
    weak_store: Weak<ExpiringStore<K, V>>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    K: Eq + Hash,
    V: Clone,
{
    loop {
        // Wait for the interval or shutdown signal
        tokio::select! {
            biased;
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("Expiry sweeper received shutdown signal");
                    return;
                }
            }
            _ = tokio::time::sleep(interval) => {}
        }

        let Some(store) = weak_store.upgrade() else {
            debug!("Store dropped, expiry sweeper exiting");
            return;
        };

        let expired = store.cleanup_expired();

        if expired > 0 {
            debug!(
                expired = expired,
                keys_remaining = store.len(),
                "Expired keys cleaned up"
            );
        } else {
            trace!("Sweep found no expired keys");
        }
    }
}
