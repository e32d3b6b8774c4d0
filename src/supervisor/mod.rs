mod launch;
mod watch;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use launch::spawn_app;

use crate::app::App;
use crate::error::{is_cancellation, SupervisorError};
use crate::logging::{LogSink, Logger};
use crate::policy::OnFailure;
use crate::AppName;

/// Default bound on the post-cancellation wait for app tasks.
pub const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(20);

/// Default period between health-probe sweeps.
pub const STATUS_CHECK_INTERVAL: Duration = Duration::from_secs(5);

pub(crate) struct AppEntry {
    pub(crate) app: Arc<dyn App>,
    pub(crate) on_failure: OnFailure,
    pub(crate) priority: i32,
}

/// Owns a set of registered [`App`]s and keeps them running.
///
/// Configure the set with [`add`](Supervisor::add) and the `set_*` methods,
/// then call [`start`](Supervisor::start) with a governing
/// [`CancellationToken`]. `start` launches one task per app in ascending
/// priority order, probes every app's `status` on a fixed interval, and
/// applies each app's [`OnFailure`] policy when a probe fails. Canceling
/// the token triggers a graceful shutdown bounded by the configured
/// timeout.
///
/// `start` consumes the supervisor, so the configuration surface is only
/// reachable while nothing is running; the run loop is the sole owner of
/// the app table for its whole lifetime.
pub struct Supervisor {
    apps: HashMap<AppName, AppEntry>,
    default_on_failure: OnFailure,
    graceful_shutdown_timeout: Duration,
    status_check_interval: Duration,
    logger: Logger,
}

impl Supervisor {
    pub fn new() -> Self {
        Self {
            apps: HashMap::new(),
            default_on_failure: OnFailure::restart(),
            graceful_shutdown_timeout: GRACEFUL_SHUTDOWN_TIMEOUT,
            status_check_interval: STATUS_CHECK_INTERVAL,
            logger: Logger::default(),
        }
    }

    /// Registers an app under its [`App::name`] with the current default
    /// failure policy and priority 0.
    ///
    /// Fails with [`SupervisorError::AlreadyExists`] if the name is taken;
    /// the registry is left untouched in that case.
    pub fn add(&mut self, app: impl App) -> Result<(), SupervisorError> {
        let name = app.name().to_string();
        if self.apps.contains_key(&name) {
            self.logger.error(format!("app {name:?} is already registered"));
            return Err(SupervisorError::AlreadyExists(name));
        }
        self.apps.insert(
            name,
            AppEntry {
                app: Arc::new(app),
                on_failure: self.default_on_failure,
                priority: 0,
            },
        );
        Ok(())
    }

    /// Sets the policy applied to apps registered by subsequent
    /// [`add`](Supervisor::add) calls. Existing entries keep theirs.
    pub fn set_default_on_failure(&mut self, on_failure: OnFailure) {
        self.default_on_failure = on_failure;
    }

    /// Replaces the failure policy of a registered app.
    pub fn set_app_on_failure(
        &mut self,
        name: &str,
        on_failure: OnFailure,
    ) -> Result<(), SupervisorError> {
        match self.apps.get_mut(name) {
            Some(entry) => {
                entry.on_failure = on_failure;
                Ok(())
            }
            None => Err(SupervisorError::NotExists(name.to_string())),
        }
    }

    /// Sets a registered app's start priority. Lower values start first;
    /// the default is 0.
    pub fn set_app_priority(&mut self, name: &str, priority: i32) -> Result<(), SupervisorError> {
        match self.apps.get_mut(name) {
            Some(entry) => {
                entry.priority = priority;
                Ok(())
            }
            None => Err(SupervisorError::NotExists(name.to_string())),
        }
    }

    /// Bounds how long [`start`](Supervisor::start) waits for app tasks to
    /// finish after cancellation. The bound is advisory: tasks still
    /// running when it elapses are left running.
    pub fn set_graceful_shutdown_timeout(&mut self, timeout: Duration) {
        self.graceful_shutdown_timeout = timeout;
    }

    /// Sets the period between health-probe sweeps.
    pub fn set_status_check_interval(&mut self, interval: Duration) {
        self.status_check_interval = interval;
    }

    /// Replaces the log sink. The default forwards to `tracing`.
    pub fn set_logger(&mut self, sink: impl LogSink + 'static) {
        self.logger = Logger::new(Arc::new(sink));
    }

    /// Sorted names of the currently registered apps.
    pub fn app_names(&self) -> Vec<AppName> {
        let mut names: Vec<AppName> = self.apps.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// The failure policy of a registered app, if any.
    pub fn app_on_failure(&self, name: &str) -> Option<OnFailure> {
        self.apps.get(name).map(|entry| entry.on_failure)
    }

    /// The start priority of a registered app, if any.
    pub fn app_priority(&self, name: &str) -> Option<i32> {
        self.apps.get(name).map(|entry| entry.priority)
    }

    /// Runs every registered app until `ctx` is canceled or an app fails
    /// beyond its retry budget.
    ///
    /// Apps are launched in ascending priority order; priority governs
    /// spawn order only, not readiness. Returns `Ok(())` once a
    /// cancellation-triggered shutdown completes (or its grace period
    /// elapses), and the first non-cancellation error otherwise — a single
    /// failed app aborts the whole supervisor.
    pub async fn start(mut self, ctx: CancellationToken) -> Result<(), SupervisorError> {
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
        let tracker = TaskTracker::new();

        let mut order: Vec<&AppEntry> = self.apps.values().collect();
        order.sort_by_key(|entry| entry.priority);
        for entry in order {
            spawn_app(&tracker, &outcome_tx, &ctx, &self.logger, entry, false);
        }

        let mut probes = interval_at(
            Instant::now() + self.status_check_interval,
            self.status_check_interval,
        );

        loop {
            tokio::select! {
                _ = ctx.cancelled() => {
                    self.logger.info("shutdown requested; waiting for apps to stop");
                    self.wait_for_apps_stop(&tracker).await;
                    return Ok(());
                }
                Some(exit) = outcome_rx.recv() => {
                    match exit.result {
                        Ok(()) => self.logger.info(format!("app {:?} exited", exit.app)),
                        Err(err) if is_cancellation(&err) => {}
                        Err(err) => {
                            self.logger.error(format!("app {:?} failed: {err:#}", exit.app));
                            return Err(SupervisorError::AppFailed {
                                app: exit.app,
                                error: err,
                            });
                        }
                    }
                }
                _ = probes.tick() => {
                    self.sweep_status(&tracker, &outcome_tx, &ctx).await;
                }
            }
        }
    }

    /// Bounded wait for in-flight app tasks after cancellation. Either
    /// outcome is a clean shutdown; the timeout only stops the waiting,
    /// never the tasks.
    async fn wait_for_apps_stop(&self, tracker: &TaskTracker) {
        tracker.close();
        match tokio::time::timeout(self.graceful_shutdown_timeout, tracker.wait()).await {
            Ok(()) => self.logger.info("all apps stopped"),
            Err(_) => self
                .logger
                .error("graceful shutdown timeout elapsed; no longer waiting for apps"),
        }
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}
