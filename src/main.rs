//! Cache Holder - demo driver
//!
//! Runs an entry store on the system clock with the expiry sweep enabled and
//! reports statistics until interrupted.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cache_holder::cache::{EntryStore, SystemClock};
use cache_holder::{spawn_cleanup_task, Config};

/// Number of entries seeded at startup.
const SEED_ENTRIES: usize = 16;

/// Main entry point for the demo driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the entry store on the system clock
/// 4. Start background expiry sweep
/// 5. Seed entries and report stats every sweep interval
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cache_holder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cache Holder demo");

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_idle={}s, max_cache={}s, jitter={}s, write_mode={:?}, cleanup_interval={}s",
        config.default_idle_secs,
        config.max_cache_secs,
        config.expire_jitter_secs,
        config.write_mode,
        config.cleanup_interval
    );

    let store: Arc<RwLock<EntryStore<String>>> = Arc::new(RwLock::new(EntryStore::new(
        &config,
        Arc::new(SystemClock::new()),
    )));

    {
        let mut store_guard = store.write().await;
        for i in 0..SEED_ENTRIES {
            store_guard
                .put(format!("key{i}"), format!("value{i}"))
                .with_context(|| format!("failed to seed key{i}"))?;
        }
    }
    info!("Seeded {} entries", SEED_ENTRIES);

    let cleanup_handle = spawn_cleanup_task(store.clone(), config.cleanup_interval);
    info!("Background expiry sweep started");

    let report_interval = Duration::from_secs(config.cleanup_interval.max(1));
    let reporter = async {
        let mut ticker = tokio::time::interval(report_interval);
        loop {
            ticker.tick().await;
            let stats = store.read().await.stats();
            match serde_json::to_string(&stats) {
                Ok(json) => info!("Stats: {}", json),
                Err(err) => warn!("Failed to encode stats: {}", err),
            }
        }
    };

    tokio::select! {
        _ = reporter => {}
        _ = shutdown_signal() => {}
    }

    cleanup_handle.abort();
    warn!("Expiry sweep aborted");
    info!("Shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
