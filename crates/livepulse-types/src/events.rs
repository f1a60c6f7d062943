//! Typed engagement events delivered by the feed capability.
//!
//! The feed transport decodes raw platform messages into [`FeedEvent`]
//! values and pushes them through a bounded channel into the watcher's
//! single consuming task. The serde representation (`"type"` tag,
//! kebab-case variant names, camelCase payload fields) matches the
//! upstream message shapes, which is also what the NDJSON replay
//! adapter reads.

use serde::{Deserialize, Serialize};

/// Metadata returned by the feed capability on a successful connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// Platform-assigned room identifier for the live session.
    pub room_id: String,
}

/// A typed engagement event for one broadcast session.
///
/// Payload fields that the upstream omits on some messages are optional;
/// the aggregator applies the documented defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FeedEvent {
    /// Absolute viewer count report for the room.
    #[serde(rename_all = "camelCase")]
    ViewerUpdate {
        /// Reported viewer count; ignored when absent.
        #[serde(default)]
        viewer_count: Option<u64>,
    },

    /// Like activity. Carries either a delta (`like_count`) or an
    /// absolute running total (`total_like_count`), not both.
    #[serde(rename_all = "camelCase")]
    Like {
        /// Number of new likes in this burst.
        #[serde(default)]
        like_count: Option<u64>,
        /// Absolute like total for the session.
        #[serde(default)]
        total_like_count: Option<u64>,
    },

    /// A viewer posted a comment.
    Comment,

    /// A viewer shared the broadcast (dedicated event shape).
    Share,

    /// Generic social notification; denotes a share when its display
    /// type or label says so.
    #[serde(rename_all = "camelCase")]
    Social {
        /// Display type of the notification (e.g. `"share"`).
        #[serde(default)]
        display_type: Option<String>,
        /// Alternative label field carrying the same information.
        #[serde(default)]
        label: Option<String>,
    },

    /// A viewer sent a monetized gift.
    #[serde(rename_all = "camelCase")]
    Gift {
        /// Unique id of the sending viewer.
        unique_id: String,
        /// Display name of the gift.
        gift_name: String,
        /// Repeat count within one gifting action; defaults to 1.
        #[serde(default)]
        repeat_count: Option<u32>,
        /// Diamond value of the action; defaults to 0.
        #[serde(default)]
        diamond_count: Option<u64>,
    },

    /// The broadcaster ended the stream. Aggregation-relevant only;
    /// the connection is not considered dropped.
    StreamEnded,

    /// The subscription to the feed was lost.
    Disconnected,
}

impl FeedEvent {
    /// Whether this event denotes a share action, covering both the
    /// dedicated `share` shape and the generic `social` shape tagged
    /// as a share.
    pub fn is_share(&self) -> bool {
        match self {
            Self::Share => true,
            Self::Social {
                display_type,
                label,
            } => {
                display_type.as_deref() == Some("share") || label.as_deref() == Some("share")
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_upstream_shapes() {
        let gift: FeedEvent = serde_json::from_str(
            r#"{"type":"gift","uniqueId":"alice","giftName":"Rose","repeatCount":3,"diamondCount":3}"#,
        )
        .unwrap();
        assert_eq!(
            gift,
            FeedEvent::Gift {
                unique_id: String::from("alice"),
                gift_name: String::from("Rose"),
                repeat_count: Some(3),
                diamond_count: Some(3),
            }
        );

        let like: FeedEvent =
            serde_json::from_str(r#"{"type":"like","totalLikeCount":120}"#).unwrap();
        assert_eq!(
            like,
            FeedEvent::Like {
                like_count: None,
                total_like_count: Some(120),
            }
        );

        let ended: FeedEvent = serde_json::from_str(r#"{"type":"stream-ended"}"#).unwrap();
        assert_eq!(ended, FeedEvent::StreamEnded);
    }

    #[test]
    fn gift_fields_default_when_absent() {
        let gift: FeedEvent = serde_json::from_str(
            r#"{"type":"gift","uniqueId":"bob","giftName":"Heart"}"#,
        )
        .unwrap();
        assert_eq!(
            gift,
            FeedEvent::Gift {
                unique_id: String::from("bob"),
                gift_name: String::from("Heart"),
                repeat_count: None,
                diamond_count: None,
            }
        );
    }

    #[test]
    fn social_share_detection() {
        assert!(FeedEvent::Share.is_share());
        assert!(
            FeedEvent::Social {
                display_type: Some(String::from("share")),
                label: None,
            }
            .is_share()
        );
        assert!(
            FeedEvent::Social {
                display_type: None,
                label: Some(String::from("share")),
            }
            .is_share()
        );
        assert!(
            !FeedEvent::Social {
                display_type: Some(String::from("follow")),
                label: None,
            }
            .is_share()
        );
        assert!(!FeedEvent::Comment.is_share());
    }
}
