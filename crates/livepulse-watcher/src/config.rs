//! Configuration for the watcher binary.
//!
//! All configuration is loaded once at startup from environment
//! variables, with the first command-line argument accepted as a
//! fallback for the username, and is immutable afterwards.
//!
//! Variables:
//!
//! - `LIVEPULSE_USERNAME` -- broadcaster to observe (required unless
//!   passed as the first argument); a leading `@` is stripped
//! - `LIVEPULSE_OUT` -- snapshot path (default `live_<username>.json`)
//! - `LIVEPULSE_SESSION_ID` -- optional platform session cookie
//! - `LIVEPULSE_MS_TOKEN` -- optional platform `msToken` cookie
//! - `LIVEPULSE_REPLAY` -- NDJSON event source path, `-` for stdin
//!   (default stdin)
//! - `LIVEPULSE_DEBOUNCE_MS` -- snapshot debounce window (default 300)

use std::path::PathBuf;
use std::time::Duration;

use livepulse_core::feed::FeedAuth;
use livepulse_core::scheduler::DEFAULT_DEBOUNCE;

use crate::error::WatcherError;

/// Where the replay feed reads its NDJSON events from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaySource {
    /// Read events from standard input.
    Stdin,
    /// Read events from a file.
    Path(PathBuf),
}

/// Complete watcher configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Broadcaster to observe, with any leading `@` stripped.
    pub username: String,
    /// Snapshot output path.
    pub out_path: PathBuf,
    /// Optional platform session cookie.
    pub session_id: Option<String>,
    /// Optional platform `msToken` cookie.
    pub ms_token: Option<String>,
    /// NDJSON event source for the replay feed.
    pub replay_source: ReplaySource,
    /// Debounce window for snapshot writes.
    pub debounce: Duration,
}

impl WatcherConfig {
    /// Load configuration from the process environment and arguments.
    ///
    /// # Errors
    ///
    /// Returns [`WatcherError::Config`] if the username is missing or
    /// empty, or a numeric variable fails to parse.
    pub fn from_env() -> Result<Self, WatcherError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_parts(&args, |name| std::env::var(name).ok())
    }

    /// Build a configuration from explicit arguments and a variable
    /// lookup. Split out from [`from_env`] so tests need not mutate
    /// the process environment.
    ///
    /// [`from_env`]: WatcherConfig::from_env
    pub fn from_parts(
        args: &[String],
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, WatcherError> {
        let raw_username = var("LIVEPULSE_USERNAME")
            .or_else(|| args.first().cloned())
            .unwrap_or_default();
        let username = raw_username
            .trim()
            .strip_prefix('@')
            .unwrap_or(raw_username.trim())
            .to_owned();
        if username.is_empty() {
            return Err(WatcherError::Config {
                message: String::from(
                    "no username: set LIVEPULSE_USERNAME or pass it as the first argument",
                ),
            });
        }

        let out_path = var("LIVEPULSE_OUT")
            .map_or_else(|| PathBuf::from(format!("live_{username}.json")), PathBuf::from);

        let replay_source = match var("LIVEPULSE_REPLAY") {
            None => ReplaySource::Stdin,
            Some(s) if s == "-" => ReplaySource::Stdin,
            Some(path) => ReplaySource::Path(PathBuf::from(path)),
        };

        let debounce = match var("LIVEPULSE_DEBOUNCE_MS") {
            None => DEFAULT_DEBOUNCE,
            Some(raw) => {
                let millis: u64 = raw.parse().map_err(|e| WatcherError::Config {
                    message: format!("invalid LIVEPULSE_DEBOUNCE_MS: {e}"),
                })?;
                Duration::from_millis(millis)
            }
        };

        Ok(Self {
            username,
            out_path,
            session_id: var("LIVEPULSE_SESSION_ID"),
            ms_token: var("LIVEPULSE_MS_TOKEN"),
            replay_source,
            debounce,
        })
    }

    /// Authentication artifacts for the feed transport.
    pub fn feed_auth(&self) -> FeedAuth {
        FeedAuth::from_cookies(self.session_id.clone(), self.ms_token.clone())
    }
}
