//! Event application onto the session aggregate.
//!
//! [`EventAggregator`] is the sole owner of the mutable [`SessionState`];
//! nothing else mutates the aggregate directly. Each applied event is a
//! synchronous, side-effect-free fold, and the caller follows every
//! application with a save-scheduling request.
//!
//! Counter arithmetic saturates rather than wraps; a marathon broadcast
//! should degrade to a pinned counter, never to a corrupted one.

use chrono::Utc;
use livepulse_types::{FeedEvent, GiftRecord, SessionState};
use tracing::debug;

/// Owns the session aggregate and folds feed events into it.
#[derive(Debug)]
pub struct EventAggregator {
    state: SessionState,
}

impl EventAggregator {
    /// Take ownership of the aggregate.
    pub const fn new(state: SessionState) -> Self {
        Self { state }
    }

    /// Read-only view of the aggregate.
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mutable access for the flush path (stamping `last_update`).
    /// Crate-private so no external component can mutate the aggregate.
    pub(crate) const fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Consume the aggregator and return the final aggregate.
    pub fn into_state(self) -> SessionState {
        self.state
    }

    /// Fold one engagement event into the aggregate.
    ///
    /// Lifecycle events (`stream-ended`, `disconnected`) carry no
    /// engagement data and leave the aggregate untouched; the watcher
    /// loop handles their control-flow meaning.
    pub fn apply(&mut self, event: FeedEvent) {
        // Share detection first: it spans two event shapes.
        if event.is_share() {
            self.state.shares = self.state.shares.saturating_add(1);
            return;
        }

        match event {
            FeedEvent::ViewerUpdate { viewer_count } => {
                // Absolute value, replaced on each report; non-numeric
                // reports are ignored.
                if let Some(count) = viewer_count {
                    self.state.viewers = count;
                }
            }
            FeedEvent::Like {
                like_count,
                total_like_count,
            } => {
                // Delta form increments; absolute form replaces. Only
                // one is expected per message, and the delta form wins
                // if both are somehow present.
                if let Some(delta) = like_count {
                    self.state.likes = self.state.likes.saturating_add(delta);
                } else if let Some(total) = total_like_count {
                    self.state.likes = total;
                }
            }
            FeedEvent::Comment => {
                self.state.comments = self.state.comments.saturating_add(1);
            }
            FeedEvent::Gift {
                unique_id,
                gift_name,
                repeat_count,
                diamond_count,
            } => {
                let record = GiftRecord {
                    user: unique_id,
                    gift: gift_name,
                    amount: repeat_count.unwrap_or(1),
                    diamonds: diamond_count.unwrap_or(0),
                    ts: Utc::now(),
                };
                debug!(
                    user = record.user,
                    gift = record.gift,
                    amount = record.amount,
                    diamonds = record.diamonds,
                    "Gift received"
                );
                self.state.diamonds = self.state.diamonds.saturating_add(record.diamonds);
                self.state.gifts.push(record);
            }
            FeedEvent::Share
            | FeedEvent::Social { .. }
            | FeedEvent::StreamEnded
            | FeedEvent::Disconnected => {}
        }
    }
}
