use std::io;

use tokio_util::sync::CancellationToken;

/// Completes when the process receives a termination signal.
///
/// On Unix this listens for `SIGINT`, `SIGTERM`, `SIGHUP` and `SIGQUIT`;
/// elsewhere only Ctrl-C is awaited. Each call registers independent
/// listeners.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
        _ = sighup.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Completes when the process receives a termination signal.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Returns a token that is canceled when the process receives a
/// termination signal.
///
/// The usual governing token for [`Supervisor::start`](crate::Supervisor::start)
/// in a binary: cancel-on-signal is the whole shutdown trigger.
pub fn cancel_on_signal() -> CancellationToken {
    let token = CancellationToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if wait_for_shutdown_signal().await.is_ok() {
            signal_token.cancel();
        }
    });
    token
}
