//! Termination signal listener.
//!
//! The watcher runs until explicitly terminated; SIGINT and SIGTERM
//! are the only intentional exit paths. The returned future resolves
//! once either signal arrives, and the run loop reacts with one final
//! unconditional flush before returning.

use tracing::{info, warn};

/// Resolves when SIGINT (ctrl-c) or SIGTERM is received.
///
/// If a signal listener cannot be installed the corresponding arm
/// stays pending forever; losing one of two signals is preferable to
/// refusing to start.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install ctrl-c handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("Termination signal received");
}
