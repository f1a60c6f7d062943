//! Connect/retry/reconnect state machine against the feed capability.
//!
//! States: `Idle -> Connecting -> Connected -> Disconnected ->
//! Connecting -> ...`. There is no terminal state short of process
//! exit: the watcher is meant to run unattended for a broadcast of
//! unknown length, so retries are unconditional and unbounded with two
//! fixed delays and no backoff growth.
//!
//! - Initial connect failure: retry after [`CONNECT_RETRY_DELAY`] (5 s)
//! - Drop of an established subscription: retry after
//!   [`RECONNECT_DELAY`] (2 s) -- mid-session drops are expected to be
//!   transient, so the reconnect is deliberately more aggressive
//!
//! The retry sleeps run on the watcher's own task, so a termination
//! signal cancels them like any other pending wait.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::feed::{FeedClient, FeedSession};

/// Delay before retrying a failed initial connect.
pub const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Delay before reconnecting after a dropped subscription.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Lifecycle state of the feed subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection attempt has been made yet.
    Idle,
    /// A connect attempt is in flight.
    Connecting,
    /// A subscription is established and delivering events.
    Connected,
    /// The subscription failed or dropped; a retry is pending.
    Disconnected,
}

/// Drives the session lifecycle against the feed capability.
#[derive(Debug)]
pub struct ConnectionManager<F> {
    feed: F,
    state: ConnectionState,
}

impl<F: FeedClient> ConnectionManager<F> {
    /// Wrap a feed client, starting in [`ConnectionState::Idle`].
    pub const fn new(feed: F) -> Self {
        Self {
            feed,
            state: ConnectionState::Idle,
        }
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Establish a subscription, retrying failed attempts forever.
    ///
    /// Only returns once a subscription is established; the caller
    /// races this against the shutdown signal.
    pub async fn establish(&mut self) -> FeedSession {
        loop {
            self.state = ConnectionState::Connecting;
            match self.feed.connect().await {
                Ok(session) => {
                    self.state = ConnectionState::Connected;
                    info!(room_id = session.info.room_id, "Connected to live session");
                    return session;
                }
                Err(e) => {
                    self.state = ConnectionState::Disconnected;
                    error!(error = %e, "Feed connect failed");
                    if let Some(hint) = e.remediation_hint() {
                        warn!(hint, "Connect failure matches a known auth signature");
                    }
                    info!(
                        retry_in_secs = CONNECT_RETRY_DELAY.as_secs(),
                        "Retrying connect"
                    );
                    tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                }
            }
        }
    }

    /// Handle a dropped subscription: wait the shorter reconnect delay,
    /// then re-enter the connect cycle.
    pub async fn reconnect(&mut self) -> FeedSession {
        self.state = ConnectionState::Disconnected;
        warn!(
            retry_in_secs = RECONNECT_DELAY.as_secs(),
            "Feed disconnected, reconnecting"
        );
        tokio::time::sleep(RECONNECT_DELAY).await;
        self.establish().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;

    use livepulse_types::SessionInfo;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    use crate::error::ConnectError;

    use super::*;

    /// Feed stub that plays back a scripted sequence of connect outcomes.
    struct ScriptedFeed {
        outcomes: VecDeque<Result<FeedSession, ConnectError>>,
    }

    impl ScriptedFeed {
        fn new(outcomes: Vec<Result<FeedSession, ConnectError>>) -> Self {
            Self {
                outcomes: outcomes.into(),
            }
        }
    }

    impl FeedClient for ScriptedFeed {
        async fn connect(&mut self) -> Result<FeedSession, ConnectError> {
            self.outcomes.pop_front().unwrap_or_else(|| {
                Err(ConnectError::Handshake {
                    message: String::from("script exhausted"),
                })
            })
        }
    }

    fn open_session(room_id: &str) -> (FeedSession, mpsc::Sender<livepulse_types::FeedEvent>) {
        let (tx, rx) = mpsc::channel(8);
        (
            FeedSession {
                info: SessionInfo {
                    room_id: String::from(room_id),
                },
                events: rx,
            },
            tx,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn starts_idle_and_connects() {
        let (session, _tx) = open_session("room-1");
        let mut manager = ConnectionManager::new(ScriptedFeed::new(vec![Ok(session)]));
        assert_eq!(manager.state(), ConnectionState::Idle);

        let established = manager.establish().await;
        assert_eq!(manager.state(), ConnectionState::Connected);
        assert_eq!(established.info.room_id, "room-1");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_connect_retries_after_fixed_delay() {
        let (session, _tx) = open_session("room-1");
        let mut manager = ConnectionManager::new(ScriptedFeed::new(vec![
            Err(ConnectError::Handshake {
                message: String::from("room offline"),
            }),
            Ok(session),
        ]));

        let start = Instant::now();
        manager.establish().await;
        assert!(start.elapsed() >= CONNECT_RETRY_DELAY);
        assert_eq!(manager.state(), ConnectionState::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_uses_shorter_delay() {
        let (first, _tx1) = open_session("room-1");
        let (second, _tx2) = open_session("room-1");
        let mut manager = ConnectionManager::new(ScriptedFeed::new(vec![Ok(first), Ok(second)]));

        manager.establish().await;
        let start = Instant::now();
        manager.reconnect().await;

        let elapsed = start.elapsed();
        assert!(elapsed >= RECONNECT_DELAY);
        assert!(elapsed < CONNECT_RETRY_DELAY);
        assert_eq!(manager.state(), ConnectionState::Connected);
    }
}
