use std::io;

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Install a handler for SIGTERM and SIGINT.
///
/// The returned token is cancelled when either signal arrives; the controller stops at its next
/// wait and logs how far it got.
#[cfg(unix)]
pub fn install_shutdown_handler() -> io::Result<CancellationToken> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM, stopping submission run"),
            _ = sigint.recv() => info!("received SIGINT, stopping submission run"),
        }
        cancel.cancel();
    });

    Ok(token)
}

#[cfg(not(unix))]
pub fn install_shutdown_handler() -> io::Result<CancellationToken> {
    let token = CancellationToken::new();
    let cancel = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl-C, stopping submission run");
            cancel.cancel();
        }
    });
    Ok(token)
}
