//! The feed capability boundary.
//!
//! The live-platform transport is out of scope for this crate; the
//! engine only sees it through [`FeedClient`], an abstract capability
//! that hands back a [`FeedSession`] on a successful connect. Events
//! arrive through a bounded channel, which preserves in-order,
//! non-reentrant delivery into the watcher's single consuming task --
//! no locks are needed around the aggregate.
//!
//! Implementations can be a real platform transport, an NDJSON replay
//! reader, or a scripted test stub.

use livepulse_types::{FeedEvent, SessionInfo};
use tokio::sync::mpsc;

use crate::error::ConnectError;

/// Default browser user agent presented to the platform.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Authentication artifacts handed to the feed transport.
///
/// Some regions require a logged-in session cookie before the platform
/// will serve the event feed. These values are loaded once at startup
/// and are immutable afterwards; transports that need no authentication
/// (such as the replay adapter) ignore them.
#[derive(Debug, Clone)]
pub struct FeedAuth {
    /// Platform session cookie, if available.
    pub session_id: Option<String>,
    /// Platform `msToken` cookie, if available.
    pub ms_token: Option<String>,
    /// User agent header presented during the handshake.
    pub user_agent: String,
}

impl Default for FeedAuth {
    fn default() -> Self {
        Self {
            session_id: None,
            ms_token: None,
            user_agent: String::from(DEFAULT_USER_AGENT),
        }
    }
}

impl FeedAuth {
    /// Build auth artifacts from optional cookie values, using the
    /// default user agent.
    pub fn from_cookies(session_id: Option<String>, ms_token: Option<String>) -> Self {
        Self {
            session_id,
            ms_token,
            ..Self::default()
        }
    }
}

/// An established subscription to one live session.
///
/// Dropping the receiver ends the subscription; the transport closing
/// its sender is treated by the watcher exactly like an explicit
/// `disconnected` event.
#[derive(Debug)]
pub struct FeedSession {
    /// Metadata reported by the platform on connect.
    pub info: SessionInfo,
    /// In-order stream of typed engagement events.
    pub events: mpsc::Receiver<FeedEvent>,
}

/// An abstract source of live engagement events.
///
/// The connection manager calls [`connect`] to establish a subscription
/// and calls it again after every failure or drop -- implementations
/// must tolerate repeated connect attempts for the lifetime of the
/// process.
///
/// [`connect`]: FeedClient::connect
#[allow(async_fn_in_trait)]
pub trait FeedClient {
    /// Attempt to establish a subscription to the live session.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError`] if the handshake fails; the caller
    /// retries after a fixed delay.
    async fn connect(&mut self) -> Result<FeedSession, ConnectError>;
}
