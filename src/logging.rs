//! Log sink boundary and the tracing-backed default
//!
//! Actions log through an injected [`LogSink`] so each session owns its own
//! wiring; [`TracingLog`] forwards to the `tracing` macros for normal runs,
//! [`MemoryLog`] records entries for inspection.

use std::sync::Mutex;

use crate::core::ErrorRecord;

/// Severity of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Destination for leveled log records
pub trait LogSink: Send + Sync {
    /// Informational record
    fn info(&self, message: &str);

    /// Warning record
    fn warn(&self, message: &str);

    /// Error record, optionally carrying the structured error payload
    fn error(&self, message: &str, record: Option<&ErrorRecord>);
}

/// Forwards log records to the `tracing` macros
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn error(&self, message: &str, record: Option<&ErrorRecord>) {
        match record {
            Some(record) => {
                let payload =
                    serde_json::to_string(record).unwrap_or_else(|_| record.message.clone());
                tracing::error!(error = %payload, "{}", message);
            }
            None => tracing::error!("{}", message),
        }
    }
}

/// One recorded log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub record: Option<ErrorRecord>,
}

/// In-memory sink recording every entry in arrival order
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded entries
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().expect("log lock poisoned").clone()
    }

    /// Messages recorded at the given level, in order
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }

    fn push(&self, level: LogLevel, message: &str, record: Option<&ErrorRecord>) {
        self.entries.lock().expect("log lock poisoned").push(LogEntry {
            level,
            message: message.to_string(),
            record: record.cloned(),
        });
    }
}

impl LogSink for MemoryLog {
    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message, None);
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message, None);
    }

    fn error(&self, message: &str, record: Option<&ErrorRecord>) {
        self.push(LogLevel::Error, message, record);
    }
}

/// Install a global tracing subscriber honoring `RUST_LOG`.
///
/// Call once per process, typically from the test harness setup. Subsequent
/// calls are no-ops.
pub fn init() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init();
}
