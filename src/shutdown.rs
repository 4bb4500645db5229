// Process shutdown signals

use std::future::Future;
use std::io;

/// Resolves on Ctrl-C or, on unix, SIGTERM. A listener that cannot be installed is logged and
/// never resolves, so a registration failure does not stop the agent.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let terminate = async {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
            sigterm.recv().await;
            Ok::<(), io::Error>(())
        };
        tokio::select! {
            _ = until_signal("ctrl-c", tokio::signal::ctrl_c()) => {}
            _ = until_signal("sigterm", terminate) => {}
        }
    }
    #[cfg(not(unix))]
    until_signal("ctrl-c", tokio::signal::ctrl_c()).await;
}

/// Waits for `listener`. If it fails, logs the error and waits forever.
pub async fn until_signal<F>(signal: &str, listener: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(e) = listener.await {
        tracing::error!(error = %e, signal, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
