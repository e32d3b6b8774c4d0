use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::bail;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use app_supervisor::{
    cancel_on_signal, shutdown_gracefully, App, AppResult, OnFailure, Supervisor,
};

/// Prints a heartbeat every second until shutdown.
struct Ticker;

#[async_trait]
impl App for Ticker {
    async fn start(&self, ctx: CancellationToken, restored: bool) -> AppResult {
        if restored {
            tracing::info!("ticker is back after a failed probe");
        }
        let mut beat = tokio::time::interval(Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = beat.tick() => tracing::info!("tick"),
                _ = ctx.cancelled() => break,
            }
        }
        Ok(())
    }

    async fn status(&self, _ctx: CancellationToken) -> AppResult {
        Ok(())
    }

    fn name(&self) -> &str {
        "ticker"
    }
}

/// Parks until shutdown, but reports an unhealthy probe every third check.
struct Flaky {
    checks: AtomicU32,
}

#[async_trait]
impl App for Flaky {
    async fn start(&self, ctx: CancellationToken, _restored: bool) -> AppResult {
        shutdown_gracefully(ctx, async { Ok(()) }).await
    }

    async fn status(&self, _ctx: CancellationToken) -> AppResult {
        let check = self.checks.fetch_add(1, Ordering::SeqCst) + 1;
        if check % 3 == 0 {
            bail!("flaky check {check} came up unhealthy");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut supervisor = Supervisor::new();
    supervisor.add(Ticker)?;
    supervisor.add(Flaky {
        checks: AtomicU32::new(0),
    })?;

    // The ticker comes up first, and the flaky app gets a tighter restart
    // budget than the default.
    supervisor.set_app_priority("ticker", -1)?;
    supervisor.set_app_on_failure(
        "flaky",
        OnFailure::restart()
            .with_retry_count(2)
            .with_retry_backoff(Duration::from_secs(1)),
    )?;
    supervisor.set_status_check_interval(Duration::from_secs(2));
    supervisor.set_graceful_shutdown_timeout(Duration::from_secs(5));

    // Runs until Ctrl-C (or SIGTERM and friends on Unix).
    supervisor.start(cancel_on_signal()).await?;
    Ok(())
}
