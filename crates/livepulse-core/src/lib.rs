//! Session lifecycle, event aggregation, and debounced persistence for
//! the Livepulse broadcast watcher.
//!
//! The engine consumes typed engagement events from an abstract feed
//! capability ([`feed::FeedClient`]), folds them into the per-session
//! aggregate ([`aggregate::EventAggregator`]), and persists snapshots
//! through a debounced scheduler ([`scheduler::PersistenceScheduler`])
//! so bursts of events coalesce into a single durable write.
//!
//! # Modules
//!
//! - [`feed`] -- The feed capability trait and session handle
//! - [`error`] -- Connect failures and remediation hints
//! - [`aggregate`] -- Event application onto the session aggregate
//! - [`persist`] -- Snapshot sink trait and the file-backed store
//! - [`scheduler`] -- Reset-on-call debounce and flush
//! - [`connection`] -- Connect/retry/reconnect state machine
//! - [`shutdown`] -- Termination signal listener
//! - [`watcher`] -- The single-task run loop tying it all together

pub mod aggregate;
pub mod connection;
pub mod error;
pub mod feed;
pub mod persist;
pub mod scheduler;
pub mod shutdown;
pub mod watcher;

pub use aggregate::EventAggregator;
pub use connection::{ConnectionManager, ConnectionState};
pub use error::ConnectError;
pub use feed::{FeedAuth, FeedClient, FeedSession};
pub use persist::{FileSnapshotStore, PersistError, SnapshotSink};
pub use scheduler::{DEFAULT_DEBOUNCE, PersistenceScheduler};
pub use shutdown::shutdown_signal;
pub use watcher::run_watcher;
