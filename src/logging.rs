use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Severity attached to every line the supervisor logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination for supervisor log lines.
///
/// The default sink forwards to [`tracing`]; install your own with
/// [`Supervisor::set_logger`](crate::Supervisor::set_logger) to capture
/// lines elsewhere.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

/// Default sink: emits each line as a `tracing` event at the matching level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warn => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        }
    }
}

/// Sink that writes `LEVEL message` lines to any writer.
pub struct WriterLog<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> WriterLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl<W: Write + Send> LogSink for WriterLog<W> {
    fn log(&self, level: LogLevel, message: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{level} {message}");
        }
    }
}

#[derive(Clone)]
pub(crate) struct Logger {
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub(crate) fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    pub(crate) fn info(&self, message: impl AsRef<str>) {
        self.sink.log(LogLevel::Info, message.as_ref());
    }

    pub(crate) fn warn(&self, message: impl AsRef<str>) {
        self.sink.log(LogLevel::Warn, message.as_ref());
    }

    pub(crate) fn error(&self, message: impl AsRef<str>) {
        self.sink.log(LogLevel::Error, message.as_ref());
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Arc::new(TracingLog))
    }
}
