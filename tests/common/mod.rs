#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::bail;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use app_supervisor::{shutdown_gracefully, App, AppResult, LogLevel, LogSink};

/// Blocks until cancellation; probes always pass.
pub struct SteadyApp {
    name: String,
    pub probes: Arc<AtomicU32>,
}

impl SteadyApp {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            probes: Arc::new(AtomicU32::new(0)),
        }
    }
}

#[async_trait]
impl App for SteadyApp {
    async fn start(&self, ctx: CancellationToken, _restored: bool) -> AppResult {
        shutdown_gracefully(ctx, async { Ok(()) }).await
    }

    async fn status(&self, _ctx: CancellationToken) -> AppResult {
        self.probes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Records its name into a shared log when its task first runs.
pub struct OrderedApp {
    name: String,
    log: Arc<Mutex<Vec<String>>>,
}

impl OrderedApp {
    pub fn new(name: &str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            log,
        }
    }
}

#[async_trait]
impl App for OrderedApp {
    async fn start(&self, ctx: CancellationToken, _restored: bool) -> AppResult {
        self.log.lock().unwrap().push(self.name.clone());
        shutdown_gracefully(ctx, async { Ok(()) }).await
    }

    async fn status(&self, _ctx: CancellationToken) -> AppResult {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fails its first `fail_first` start attempts, then blocks until
/// cancellation. Records when every attempt began.
pub struct FlakyStartApp {
    name: String,
    fail_first: u32,
    pub attempts: Arc<AtomicU32>,
    pub attempt_at: Arc<Mutex<Vec<tokio::time::Instant>>>,
}

impl FlakyStartApp {
    pub fn new(name: &str, fail_first: u32) -> Self {
        Self {
            name: name.to_string(),
            fail_first,
            attempts: Arc::new(AtomicU32::new(0)),
            attempt_at: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl App for FlakyStartApp {
    async fn start(&self, ctx: CancellationToken, _restored: bool) -> AppResult {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        self.attempt_at.lock().unwrap().push(tokio::time::Instant::now());
        if attempt <= self.fail_first {
            bail!("induced failure on attempt {attempt}");
        }
        shutdown_gracefully(ctx, async { Ok(()) }).await
    }

    async fn status(&self, _ctx: CancellationToken) -> AppResult {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Every start attempt fails.
pub struct AlwaysFailingApp {
    name: String,
    pub attempts: Arc<AtomicU32>,
}

impl AlwaysFailingApp {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attempts: Arc::new(AtomicU32::new(0)),
        }
    }
}

#[async_trait]
impl App for AlwaysFailingApp {
    async fn start(&self, _ctx: CancellationToken, _restored: bool) -> AppResult {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        bail!("induced failure on attempt {attempt}");
    }

    async fn status(&self, _ctx: CancellationToken) -> AppResult {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Starts fine (and blocks), but its probe fails whenever `healthy` is
/// false. Counts probes, launches, and restored launches.
pub struct ProbeFailApp {
    name: String,
    pub healthy: Arc<AtomicBool>,
    pub probes: Arc<AtomicU32>,
    pub starts: Arc<AtomicU32>,
    pub restored_starts: Arc<AtomicU32>,
}

impl ProbeFailApp {
    pub fn new(name: &str, healthy: bool) -> Self {
        Self {
            name: name.to_string(),
            healthy: Arc::new(AtomicBool::new(healthy)),
            probes: Arc::new(AtomicU32::new(0)),
            starts: Arc::new(AtomicU32::new(0)),
            restored_starts: Arc::new(AtomicU32::new(0)),
        }
    }
}

#[async_trait]
impl App for ProbeFailApp {
    async fn start(&self, ctx: CancellationToken, restored: bool) -> AppResult {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if restored {
            self.restored_starts.fetch_add(1, Ordering::SeqCst);
        }
        shutdown_gracefully(ctx, async { Ok(()) }).await
    }

    async fn status(&self, _ctx: CancellationToken) -> AppResult {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            bail!("probe failed");
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Ignores cancellation entirely; never exits.
pub struct StuckApp {
    name: String,
}

impl StuckApp {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl App for StuckApp {
    async fn start(&self, _ctx: CancellationToken, _restored: bool) -> AppResult {
        std::future::pending().await
    }

    async fn status(&self, _ctx: CancellationToken) -> AppResult {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Panics as soon as its task runs.
pub struct PanickingApp {
    name: String,
}

impl PanickingApp {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl App for PanickingApp {
    async fn start(&self, _ctx: CancellationToken, _restored: bool) -> AppResult {
        panic!("boom");
    }

    async fn status(&self, _ctx: CancellationToken) -> AppResult {
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Log sink that keeps every line for later assertions.
#[derive(Clone, Default)]
pub struct CapturingSink {
    pub lines: Arc<Mutex<Vec<String>>>,
}

impl LogSink for CapturingSink {
    fn log(&self, level: LogLevel, message: &str) {
        self.lines.lock().unwrap().push(format!("{level} {message}"));
    }
}
