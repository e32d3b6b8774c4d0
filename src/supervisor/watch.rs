use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::launch::{spawn_app, AppExit};
use super::Supervisor;
use crate::policy::OnFailure;
use crate::AppName;

impl Supervisor {
    /// One probe sweep over every registered app.
    ///
    /// Failing probes are collected during the pass and acted on after it,
    /// so an `Ignore` removal can never disturb the iteration that decided
    /// it. A restart reuses the entry's own policy, `restored` set; the
    /// previous task is taken to have exited already — the failed probe is
    /// the evidence — and is neither canceled nor joined.
    pub(crate) async fn sweep_status(
        &mut self,
        tracker: &TaskTracker,
        outcomes: &mpsc::UnboundedSender<AppExit>,
        ctx: &CancellationToken,
    ) {
        let mut failed: Vec<(AppName, OnFailure)> = Vec::new();
        for (name, entry) in &self.apps {
            if let Err(err) = entry.app.status(ctx.clone()).await {
                self.logger
                    .error(format!("app {name:?} status check failed: {err:#}"));
                failed.push((name.clone(), entry.on_failure));
            }
        }

        for (name, policy) in failed {
            match policy {
                OnFailure::Restart { .. } => {
                    self.logger.info(format!("restarting app {name:?}"));
                    if let Some(entry) = self.apps.get(&name) {
                        spawn_app(tracker, outcomes, ctx, &self.logger, entry, true);
                    }
                }
                OnFailure::Ignore => {
                    self.logger
                        .warn(format!("ignoring failure of app {name:?}; removing it"));
                    self.apps.remove(&name);
                }
            }
        }
    }
}
