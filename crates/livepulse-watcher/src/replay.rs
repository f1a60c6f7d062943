//! NDJSON replay feed.
//!
//! The live-platform wire protocol is out of scope for this repository;
//! [`ReplayFeed`] is the shipped [`FeedClient`]: it reads typed
//! [`FeedEvent`] values as newline-delimited JSON from a file or from
//! stdin and forwards them through the bounded session channel. Lines
//! that fail to decode are logged and skipped so one malformed record
//! never stalls the session.
//!
//! A replay source plays once. After it has been consumed, further
//! connect attempts fail, which keeps the watcher in its normal retry
//! cycle until the process is terminated.

use livepulse_core::error::ConnectError;
use livepulse_core::feed::{FeedAuth, FeedClient, FeedSession};
use livepulse_types::{FeedEvent, SessionInfo};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::ReplaySource;

/// Capacity of the session event channel.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A [`FeedClient`] that replays NDJSON events from a file or stdin.
#[derive(Debug)]
pub struct ReplayFeed {
    source: ReplaySource,
    auth: FeedAuth,
    exhausted: bool,
}

impl ReplayFeed {
    /// Create a replay feed over `source`.
    ///
    /// `auth` is accepted for parity with real transports; a replay
    /// source needs no authentication.
    pub const fn new(source: ReplaySource, auth: FeedAuth) -> Self {
        Self {
            source,
            auth,
            exhausted: false,
        }
    }

    fn room_id(&self) -> String {
        match &self.source {
            ReplaySource::Stdin => String::from("replay:stdin"),
            ReplaySource::Path(path) => format!("replay:{}", path.display()),
        }
    }
}

impl FeedClient for ReplayFeed {
    async fn connect(&mut self) -> Result<FeedSession, ConnectError> {
        if self.exhausted {
            return Err(ConnectError::Handshake {
                message: String::from("replay source already consumed"),
            });
        }

        debug!(
            session_cookie = self.auth.session_id.is_some(),
            ms_token = self.auth.ms_token.is_some(),
            "Replay connect (auth artifacts unused)"
        );

        let reader: Box<dyn AsyncRead + Send + Unpin> = match &self.source {
            ReplaySource::Stdin => Box::new(tokio::io::stdin()),
            ReplaySource::Path(path) => {
                let file = tokio::fs::File::open(path).await.map_err(|e| {
                    ConnectError::Handshake {
                        message: format!("failed to open replay file {}: {e}", path.display()),
                    }
                })?;
                Box::new(file)
            }
        };
        self.exhausted = true;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        tokio::spawn(forward_events(BufReader::new(reader), tx));

        Ok(FeedSession {
            info: SessionInfo {
                room_id: self.room_id(),
            },
            events: rx,
        })
    }
}

/// Read NDJSON lines and forward decoded events until EOF or until the
/// receiver is dropped.
async fn forward_events<R>(reader: BufReader<R>, tx: mpsc::Sender<FeedEvent>)
where
    R: AsyncRead + Send + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match serde_json::from_str::<FeedEvent>(trimmed) {
                    Ok(event) => {
                        if tx.send(event).await.is_err() {
                            // Receiver gone; the session was dropped.
                            return;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Skipping undecodable replay line");
                    }
                }
            }
            Ok(None) => {
                debug!("Replay source reached EOF");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Replay read failed, closing session");
                return;
            }
        }
    }
}
