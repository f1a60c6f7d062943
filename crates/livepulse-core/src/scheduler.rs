//! Reset-on-call debounce for snapshot writes.
//!
//! Every mutation of the aggregate requests a save; a naive per-event
//! write would thrash the store during bursts. [`PersistenceScheduler`]
//! bounds the write rate with a quiescence window: each
//! [`schedule_save`] re-arms a single deadline, and only once no
//! further requests arrive within the window does the pending write
//! commit.
//!
//! The deadline is a plain value polled by the watcher's `select!`
//! loop rather than a spawned timer task, so a flush can never race a
//! concurrent mutation -- it always observes a fully-settled aggregate.
//!
//! [`schedule_save`]: PersistenceScheduler::schedule_save

use std::time::Duration;

use chrono::Utc;
use livepulse_types::SessionState;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::persist::SnapshotSink;

/// Quiescence window before a pending save commits.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Debounces and durably writes snapshots of the session aggregate.
#[derive(Debug)]
pub struct PersistenceScheduler<S> {
    sink: S,
    debounce: Duration,
    deadline: Option<Instant>,
}

impl<S: SnapshotSink> PersistenceScheduler<S> {
    /// Create a scheduler flushing through `sink` after `debounce` of
    /// quiescence.
    pub const fn new(sink: S, debounce: Duration) -> Self {
        Self {
            sink,
            debounce,
            deadline: None,
        }
    }

    /// Arm or re-arm the debounce deadline.
    ///
    /// Each call replaces any pending deadline, so only the last call
    /// in a burst results in a write.
    pub fn schedule_save(&mut self) {
        self.deadline = Instant::now().checked_add(self.debounce);
    }

    /// The pending flush deadline, if a save is scheduled.
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Synchronously flush the aggregate to the durable store,
    /// discarding any pending deadline.
    ///
    /// Stamps `last_update` on success. Write failures are logged and
    /// swallowed: the in-memory aggregate is the source of truth and
    /// the next scheduled save retries the write.
    pub async fn flush_now(&mut self, state: &mut SessionState) {
        self.deadline = None;

        let previous = state.last_update;
        state.last_update = Some(Utc::now());
        match self.sink.write(state).await {
            Ok(()) => {
                debug!(
                    likes = state.likes,
                    comments = state.comments,
                    viewers = state.viewers,
                    diamonds = state.diamonds,
                    shares = state.shares,
                    gifts = state.gifts.len(),
                    "Snapshot flushed"
                );
            }
            Err(e) => {
                // last_update records successful flushes only.
                state.last_update = previous;
                warn!(error = %e, "Snapshot write failed, will retry on next save");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::persist::PersistError;

    use super::*;

    /// Records every snapshot it is asked to write.
    #[derive(Debug, Clone, Default)]
    struct RecordingSink {
        writes: Arc<Mutex<Vec<SessionState>>>,
    }

    impl SnapshotSink for RecordingSink {
        async fn write(&self, state: &SessionState) -> Result<(), PersistError> {
            self.writes.lock().unwrap().push(state.clone());
            Ok(())
        }
    }

    /// Always fails.
    #[derive(Debug, Clone, Copy, Default)]
    struct BrokenSink;

    impl SnapshotSink for BrokenSink {
        async fn write(&self, _state: &SessionState) -> Result<(), PersistError> {
            Err(PersistError::Write(String::from("disk on fire")))
        }
    }

    fn sample_state() -> SessionState {
        SessionState::new(String::from("streamer"), Utc::now())
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_save_rearms_the_deadline() {
        let mut scheduler = PersistenceScheduler::new(RecordingSink::default(), DEFAULT_DEBOUNCE);
        assert!(scheduler.deadline().is_none());

        scheduler.schedule_save();
        let first = scheduler.deadline().unwrap();

        tokio::time::advance(Duration::from_millis(100)).await;
        scheduler.schedule_save();
        let second = scheduler.deadline().unwrap();

        assert!(second > first, "re-arming must push the deadline out");
    }

    #[tokio::test(start_paused = true)]
    async fn flush_stamps_last_update_and_clears_deadline() {
        let sink = RecordingSink::default();
        let mut scheduler = PersistenceScheduler::new(sink.clone(), DEFAULT_DEBOUNCE);
        let mut state = sample_state();

        scheduler.schedule_save();
        scheduler.flush_now(&mut state).await;

        assert!(scheduler.deadline().is_none());
        assert!(state.last_update.is_some());

        let writes = sink.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes.first().unwrap().last_update, state.last_update);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_flush_leaves_last_update_untouched() {
        let mut scheduler = PersistenceScheduler::new(BrokenSink, DEFAULT_DEBOUNCE);
        let mut state = sample_state();

        scheduler.flush_now(&mut state).await;
        assert!(state.last_update.is_none());

        // The failure also must not leave a stale deadline behind.
        assert!(scheduler.deadline().is_none());
    }
}
