//! Shared type definitions for the Livepulse broadcast watcher.
//!
//! This crate is the single source of truth for the types that flow
//! between the feed boundary, the aggregation engine, and the persisted
//! snapshot.
//!
//! # Modules
//!
//! - [`events`] -- Typed engagement events delivered by the feed capability
//! - [`state`] -- The per-session aggregate and its gift log

pub mod events;
pub mod state;

// Re-export all public types at crate root for convenience.
pub use events::{FeedEvent, SessionInfo};
pub use state::{GiftRecord, SessionState};
