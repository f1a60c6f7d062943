//! Error types for the watcher binary.
//!
//! [`WatcherError`] covers startup failures only. Once the run loop is
//! entered there is no fatal error path: connect failures retry forever
//! and snapshot write failures are logged and superseded.

/// Top-level error for the watcher binary.
#[derive(Debug, thiserror::Error)]
pub enum WatcherError {
    /// Configuration loading failed.
    #[error("config error: {message}")]
    Config {
        /// Description of the configuration problem.
        message: String,
    },
}
