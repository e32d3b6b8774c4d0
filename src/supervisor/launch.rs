use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::AppEntry;
use crate::app::{App, AppError, AppResult};
use crate::error::Canceled;
use crate::logging::Logger;
use crate::policy::OnFailure;
use crate::AppName;

/// Terminal outcome of one app task. Every spawned task reports exactly
/// one of these, panics included.
pub(crate) struct AppExit {
    pub(crate) app: AppName,
    pub(crate) result: AppResult,
}

/// Spawns one tracked task driving the entry's app through its retrying
/// start routine, reporting the terminal outcome on `outcomes`.
pub(crate) fn spawn_app(
    tracker: &TaskTracker,
    outcomes: &mpsc::UnboundedSender<AppExit>,
    ctx: &CancellationToken,
    logger: &Logger,
    entry: &AppEntry,
    restored: bool,
) {
    let app = Arc::clone(&entry.app);
    let policy = entry.on_failure;
    let name: AppName = app.name().to_string();
    let outcomes = outcomes.clone();
    let ctx = ctx.clone();
    let logger = logger.clone();

    tracker.spawn(async move {
        logger.info(format!("starting app {name:?}"));
        // The inner spawn is the fault boundary: a panic inside the app
        // surfaces as a JoinError here instead of unwinding further.
        let attempt = tokio::spawn(start_with_retry(app, ctx, policy, restored));
        let result = match attempt.await {
            Ok(result) => result,
            Err(fault) => Err(fault_error(&name, fault)),
        };
        let _ = outcomes.send(AppExit { app: name, result });
    });
}

/// Calls `app.start` up to the policy's attempt budget, sleeping the
/// policy's backoff between failed attempts. The first success wins; once
/// the budget is spent the last error is returned as-is.
async fn start_with_retry(
    app: Arc<dyn App>,
    ctx: CancellationToken,
    policy: OnFailure,
    restored: bool,
) -> AppResult {
    let attempts = policy.attempts();
    let backoff = policy.backoff();
    let mut attempt = 0;
    loop {
        attempt += 1;
        match app.start(ctx.clone(), restored).await {
            Ok(()) => return Ok(()),
            Err(err) if attempt >= attempts => return Err(err),
            Err(_) => {
                tokio::select! {
                    _ = tokio::time::sleep(backoff) => {}
                    _ = ctx.cancelled() => return Err(Canceled.into()),
                }
            }
        }
    }
}

fn fault_error(app: &str, fault: JoinError) -> AppError {
    if fault.is_panic() {
        let payload = fault.into_panic();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        anyhow!("app {app:?} panicked: {message}")
    } else {
        Canceled.into()
    }
}
