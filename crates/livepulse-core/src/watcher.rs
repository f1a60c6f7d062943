//! The watcher run loop.
//!
//! [`run_watcher`] is the top-level async driver: a single task that
//! owns the connection manager, the aggregator, and the persistence
//! scheduler, and selects over three wake sources:
//!
//! - the shutdown future (termination signal),
//! - the pending debounce deadline,
//! - the next feed event.
//!
//! Because everything runs on this one task, an event's mutation plus
//! its save-scheduling request complete atomically relative to other
//! events, and a flush always observes a fully-settled aggregate.
//! Reconnect waits happen here too, so shutdown cancels them like any
//! other pending timer.

use std::pin::pin;
use std::time::Duration;

use livepulse_types::{FeedEvent, SessionState};
use tokio::time::Instant;
use tracing::info;

use crate::aggregate::EventAggregator;
use crate::connection::ConnectionManager;
use crate::feed::FeedClient;
use crate::persist::SnapshotSink;
use crate::scheduler::PersistenceScheduler;

/// Sleep until `deadline`, or forever when no save is pending.
async fn debounce_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Run the watcher until the shutdown future resolves.
///
/// Connects to the feed (retrying forever), folds events into the
/// aggregate, and flushes debounced snapshots through `sink`. A
/// dropped subscription (explicit `disconnected` event or a closed
/// event channel) re-enters the connect cycle without touching the
/// aggregate. When `shutdown` resolves, one final flush runs
/// unconditionally -- discarding any pending debounce deadline -- and
/// the final aggregate is returned.
///
/// There is no fatal error path: connect failures retry forever and
/// write failures are logged and superseded by the next save.
pub async fn run_watcher<F, S>(
    feed: F,
    state: SessionState,
    sink: S,
    debounce: Duration,
    shutdown: impl Future<Output = ()>,
) -> SessionState
where
    F: FeedClient,
    S: SnapshotSink,
{
    let mut connection = ConnectionManager::new(feed);
    let mut aggregator = EventAggregator::new(state);
    let mut scheduler = PersistenceScheduler::new(sink, debounce);
    tokio::pin!(shutdown);

    let mut session = tokio::select! {
        session = connection.establish() => session,
        () = &mut shutdown => {
            info!("Shutdown before connect, flushing final snapshot");
            scheduler.flush_now(aggregator.state_mut()).await;
            return aggregator.into_state();
        }
    };

    loop {
        let deadline = scheduler.deadline();
        tokio::select! {
            () = &mut shutdown => {
                info!("Shutting down, flushing final snapshot");
                scheduler.flush_now(aggregator.state_mut()).await;
                break;
            }

            () = debounce_elapsed(deadline), if deadline.is_some() => {
                scheduler.flush_now(aggregator.state_mut()).await;
            }

            event = session.events.recv() => match event {
                Some(FeedEvent::Disconnected) | None => {
                    // The reconnect wait shares the task with the
                    // debounce: a save scheduled before the drop still
                    // commits on time while the retry cycle runs.
                    let mut reconnect = pin!(connection.reconnect());
                    session = loop {
                        let deadline = scheduler.deadline();
                        tokio::select! {
                            session = &mut reconnect => break session,
                            () = &mut shutdown => {
                                info!("Shutdown during reconnect, flushing final snapshot");
                                scheduler.flush_now(aggregator.state_mut()).await;
                                return aggregator.into_state();
                            }
                            () = debounce_elapsed(deadline), if deadline.is_some() => {
                                scheduler.flush_now(aggregator.state_mut()).await;
                            }
                        }
                    };
                }
                Some(FeedEvent::StreamEnded) => {
                    // Aggregation-relevant only: flush, but stay
                    // connected until an explicit disconnect arrives.
                    info!("Stream ended, flushing snapshot");
                    scheduler.flush_now(aggregator.state_mut()).await;
                }
                Some(event) => {
                    aggregator.apply(event);
                    scheduler.schedule_save();
                }
            },
        }
    }

    aggregator.into_state()
}
