use thiserror::Error;

use crate::app::AppError;

/// Errors returned by the supervisor's configuration surface and by
/// [`Supervisor::start`](crate::Supervisor::start).
///
/// Registration errors are synchronous and never surface after startup;
/// `AppFailed` is the single fatal path out of a running supervisor.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// An app with the same name is already registered.
    #[error("app {0:?} already exists")]
    AlreadyExists(String),

    /// No app with the given name is registered.
    #[error("app {0:?} does not exist")]
    NotExists(String),

    /// An app exhausted its retry budget or its task faulted; this aborts
    /// the whole supervisor even if other apps are still healthy.
    #[error("app {app:?} failed: {error:#}")]
    AppFailed { app: String, error: AppError },
}

/// Marker error an app returns from `start` to report that it stopped
/// because the governing token was canceled.
///
/// Outcomes carrying this error anywhere in their chain are treated as a
/// clean shutdown, never as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("context canceled")]
pub struct Canceled;

pub(crate) fn is_cancellation(err: &AppError) -> bool {
    err.downcast_ref::<Canceled>().is_some()
}
