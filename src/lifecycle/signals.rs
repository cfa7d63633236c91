//! OS signal handling.

use tokio::sync::broadcast;

/// Wait until shutdown is requested.
///
/// Resolves on SIGINT (Ctrl+C), SIGTERM (unix), or a coordinator trigger,
/// whichever comes first.
pub async fn shutdown_requested(mut external: broadcast::Receiver<()>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
        _ = external.recv() => {},
    }

    tracing::info!("Shutdown signal received");
}
