//! The per-session engagement aggregate.
//!
//! [`SessionState`] is the sole mutable record for one observed broadcast.
//! It is created once at process start, owned exclusively by the event
//! aggregator, and serialized directly as the persisted snapshot -- the
//! serde field names below are the on-disk contract consumed by
//! dashboards and alerting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One monetized gifting action, immutable once appended to the gift log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftRecord {
    /// Unique id of the sending viewer.
    pub user: String,
    /// Display name of the gift.
    pub gift: String,
    /// How many times the gift was repeated in one action (at least 1).
    pub amount: u32,
    /// Diamond value attributed to this action.
    pub diamonds: u64,
    /// Arrival timestamp.
    pub ts: DateTime<Utc>,
}

/// The running aggregate for one broadcast session.
///
/// Invariants maintained by the aggregator:
///
/// - `diamonds` always equals the sum of `diamonds` over `gifts`
/// - `gifts` is append-only; insertion order is arrival order
/// - `likes` is monotonically non-decreasing
/// - `last_update` is `None` until the first successful flush
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Identifier of the observed broadcaster, immutable after creation.
    pub username: String,
    /// Running like total (delta-incremented or set absolutely,
    /// depending on the event shape received).
    pub likes: u64,
    /// Number of comment events observed.
    pub comments: u64,
    /// Most recently reported viewer count (absolute, replaced on update).
    pub viewers: u64,
    /// Total diamond value across the gift log.
    pub diamonds: u64,
    /// Number of share events observed.
    pub shares: u64,
    /// Append-only log of gifting actions, in arrival order.
    pub gifts: Vec<GiftRecord>,
    /// When observation of this session began, set once at startup.
    pub started_at: DateTime<Utc>,
    /// When the snapshot was last flushed, stamped on every successful
    /// write. `None` until the first flush.
    pub last_update: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Create a fresh aggregate for `username` with all counters at zero.
    pub const fn new(username: String, started_at: DateTime<Utc>) -> Self {
        Self {
            username,
            likes: 0,
            comments: 0,
            viewers: 0,
            diamonds: 0,
            shares: 0,
            gifts: Vec::new(),
            started_at,
            last_update: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_field_names_match_contract() {
        let state = SessionState::new(String::from("streamer"), Utc::now());
        let value = serde_json::to_value(&state).unwrap();
        let obj = value.as_object().unwrap();

        for key in [
            "username",
            "likes",
            "comments",
            "viewers",
            "diamonds",
            "shares",
            "gifts",
            "startedAt",
            "lastUpdate",
        ] {
            assert!(obj.contains_key(key), "missing snapshot key {key}");
        }
        assert!(obj.get("lastUpdate").unwrap().is_null());
    }

    #[test]
    fn gift_record_serializes_with_contract_keys() {
        let record = GiftRecord {
            user: String::from("alice"),
            gift: String::from("Rose"),
            amount: 3,
            diamonds: 3,
            ts: Utc::now(),
        };
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.get("user").unwrap(), "alice");
        assert_eq!(obj.get("gift").unwrap(), "Rose");
        assert_eq!(obj.get("amount").unwrap(), 3);
        assert_eq!(obj.get("diamonds").unwrap(), 3);
        assert!(obj.get("ts").unwrap().is_string());
    }

    #[test]
    fn snapshot_round_trips() {
        let mut state = SessionState::new(String::from("streamer"), Utc::now());
        state.likes = 42;
        state.gifts.push(GiftRecord {
            user: String::from("bob"),
            gift: String::from("Galaxy"),
            amount: 1,
            diamonds: 1000,
            ts: Utc::now(),
        });
        state.last_update = Some(Utc::now());

        let json = serde_json::to_string(&state).unwrap();
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
