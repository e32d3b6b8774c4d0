use std::future::Future;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

pub type AppError = anyhow::Error;

pub type AppResult = Result<(), AppError>;

/// The trait users implement for components managed by the supervisor.
///
/// An app is a long-running unit: its `start` is expected to block until
/// the governing token is canceled, typically via [`shutdown_gracefully`].
/// The supervisor keeps one task alive per app, probes `status` on a fixed
/// interval, and reacts to probe failures with the app's
/// [`OnFailure`](crate::OnFailure) policy.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use app_supervisor::{shutdown_gracefully, App, AppResult};
///
/// struct Worker;
///
/// #[async_trait]
/// impl App for Worker {
///     async fn start(&self, ctx: CancellationToken, _restored: bool) -> AppResult {
///         // set up resources here, then park until shutdown
///         shutdown_gracefully(ctx, async { Ok(()) }).await
///     }
///
///     async fn status(&self, _ctx: CancellationToken) -> AppResult {
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "worker"
///     }
/// }
/// ```
#[async_trait]
pub trait App: Send + Sync + 'static {
    /// Runs the app. Should block until `ctx` is canceled or a fatal
    /// condition occurs. `restored` is true when this launch follows a
    /// failed health probe rather than initial startup.
    async fn start(&self, ctx: CancellationToken, restored: bool) -> AppResult;

    /// Cheap liveness probe. Any `Err` triggers the app's failure policy.
    async fn status(&self, ctx: CancellationToken) -> AppResult;

    /// Stable, process-unique identifier for this app.
    fn name(&self) -> &str;
}

/// Parks until `ctx` is canceled, then runs `cleanup` exactly once and
/// returns its result.
///
/// This is the usual tail of an [`App::start`] implementation: bind your
/// resources, then hand the token and a teardown future to this helper.
pub async fn shutdown_gracefully<Fut>(ctx: CancellationToken, cleanup: Fut) -> AppResult
where
    Fut: Future<Output = AppResult>,
{
    ctx.cancelled().await;
    cleanup.await
}
