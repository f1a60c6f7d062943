//! Watcher binary for Livepulse.
//!
//! Wires together configuration, the snapshot store, the replay feed,
//! and the core run loop, then runs until a termination signal forces
//! the final flush.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from the environment / arguments
//! 3. Create the session aggregate
//! 4. Create the file snapshot store
//! 5. Create the feed client
//! 6. Run the watcher loop until SIGINT/SIGTERM
//! 7. Log the final counters

mod config;
mod error;
mod replay;

use chrono::Utc;
use livepulse_core::persist::FileSnapshotStore;
use livepulse_core::shutdown::shutdown_signal;
use livepulse_core::watcher::run_watcher;
use livepulse_types::SessionState;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::WatcherConfig;
use crate::replay::ReplayFeed;

/// Application entry point for the watcher.
///
/// # Errors
///
/// Returns an error if configuration loading fails; the run loop
/// itself has no fatal error path.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("livepulse-watcher starting");

    // 2. Load configuration.
    let config = WatcherConfig::from_env()?;
    info!(
        username = config.username,
        out = %config.out_path.display(),
        replay = ?config.replay_source,
        debounce_ms = u64::try_from(config.debounce.as_millis()).unwrap_or(u64::MAX),
        session_cookie = config.session_id.is_some(),
        "Configuration loaded"
    );

    // 3. Create the session aggregate.
    let state = SessionState::new(config.username.clone(), Utc::now());

    // 4. Create the snapshot store.
    let store = FileSnapshotStore::new(&config.out_path);
    info!(path = %store.path().display(), "Snapshot store ready");

    // 5. Create the feed client.
    let feed = ReplayFeed::new(config.replay_source.clone(), config.feed_auth());

    // 6. Run until a termination signal arrives.
    let final_state = run_watcher(feed, state, store, config.debounce, shutdown_signal()).await;

    // 7. Log the final counters.
    info!(
        likes = final_state.likes,
        comments = final_state.comments,
        viewers = final_state.viewers,
        shares = final_state.shares,
        diamonds = final_state.diamonds,
        gifts = final_state.gifts.len(),
        "livepulse-watcher shutdown complete"
    );

    Ok(())
}
