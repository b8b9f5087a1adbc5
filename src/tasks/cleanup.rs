//! Expiry Sweep Task
//!
//! Background task that periodically releases and removes invalid holders.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::EntryStore;

/// Spawns a background task that periodically sweeps expired holders.
///
/// The task sleeps for the specified interval between runs and takes the write
/// lock only for the duration of [`EntryStore::cleanup_expired`].
///
/// # Arguments
/// * `store` - shared reference to the store
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(RwLock::new(EntryStore::<String>::new(&config, clock)));
/// let cleanup_handle = spawn_cleanup_task(store.clone(), 1);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<V, C>(
    store: Arc<RwLock<EntryStore<V, C>>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
    C: 'static,
{
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let released = {
                let mut store_guard = store.write().await;
                store_guard.cleanup_expired()
            };

            if released > 0 {
                info!("Expiry sweep: released {} holders", released);
            } else {
                debug!("Expiry sweep: no expired holders found");
            }
        }
    })
}
