//! # app-supervisor
//!
//! `app-supervisor` keeps a set of long-running in-process components
//! ("apps") alive. It starts them concurrently in priority order, probes
//! their health on a fixed interval, and restarts or drops them on failure
//! according to a per-app policy. When the governing token is canceled it
//! coordinates a timeout-bounded graceful shutdown.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use tokio_util::sync::CancellationToken;
//! use app_supervisor::{
//!     cancel_on_signal, shutdown_gracefully, App, AppResult, OnFailure, Supervisor,
//! };
//!
//! struct Worker;
//!
//! #[async_trait]
//! impl App for Worker {
//!     async fn start(&self, ctx: CancellationToken, _restored: bool) -> AppResult {
//!         // bind resources here, then park until shutdown
//!         shutdown_gracefully(ctx, async { Ok(()) }).await
//!     }
//!
//!     async fn status(&self, _ctx: CancellationToken) -> AppResult {
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "worker"
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut supervisor = Supervisor::new();
//!     supervisor.add(Worker)?;
//!     supervisor.set_app_on_failure("worker", OnFailure::restart().with_retry_count(5))?;
//!
//!     // Blocks until a termination signal, then shuts down gracefully.
//!     supervisor.start(cancel_on_signal()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## What you get
//!
//! * **Ordered concurrent startup** — one task per app, spawned in
//!   ascending priority order, with per-app retry and backoff.
//! * **Health watching** — periodic `status` probes; a failing app is
//!   restarted (`restored = true`) or dropped, per its [`OnFailure`] policy.
//! * **Graceful shutdown** — cancel the token and the supervisor waits for
//!   app tasks up to a configurable timeout, without ever killing them.
//! * **Fault containment** — a panicking app becomes an error value, never
//!   a crashed process.

pub use app::{shutdown_gracefully, App, AppError, AppResult};
pub use error::{Canceled, SupervisorError};
pub use logging::{LogLevel, LogSink, TracingLog, WriterLog};
pub use policy::OnFailure;
pub use signal::{cancel_on_signal, wait_for_shutdown_signal};
pub use supervisor::{Supervisor, GRACEFUL_SHUTDOWN_TIMEOUT, STATUS_CHECK_INTERVAL};

mod app;
mod error;
mod logging;
mod policy;
mod signal;
mod supervisor;

pub type AppName = String;
