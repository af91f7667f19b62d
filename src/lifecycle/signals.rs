//! OS signal handling.

/// Wait for Ctrl-C.
///
/// If the handler cannot be installed this never resolves, so callers racing
/// it against other work are unaffected.
pub async fn interrupted() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Interrupt received"),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}
