//! Report bridge - thin adapter over the external report sink
//!
//! Mirrors the step/attachment/parameter surface of report tooling such as
//! Allure. Sink implementations are expected to swallow their own I/O
//! failures; reporting must never break the action being reported on.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::{MimeKind, StepStatus};

/// Destination for step and attachment events
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Open a named step
    async fn open_step(&self, name: &str);

    /// Close the most recently opened step with the given status
    async fn close_step(&self, status: StepStatus);

    /// Attach a text block to the current step
    async fn attach_text(&self, label: &str, content: &str);

    /// Attach a binary payload to the current step
    async fn attach_binary(&self, label: &str, payload: Vec<u8>, mime: MimeKind);

    /// Record a named parameter on the current test
    async fn add_parameter(&self, name: &str, value: &str);

    /// Record a link on the current test
    async fn add_link(&self, url: &str, name: Option<&str>, kind: Option<&str>);
}

/// One recorded report event
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    /// A step was opened
    StepOpened(String),
    /// A step was closed
    StepClosed(StepStatus),
    /// A text attachment
    Text { label: String, content: String },
    /// A binary attachment
    Binary {
        label: String,
        payload: Vec<u8>,
        mime: MimeKind,
    },
    /// A named parameter
    Parameter { name: String, value: String },
    /// A link
    Link {
        url: String,
        name: Option<String>,
        kind: Option<String>,
    },
}

/// In-memory sink recording every event in arrival order.
///
/// Used to wire uiprobe without a real report backend and to assert on
/// reporting behavior in tests.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl MemoryReporter {
    /// Create an empty reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().expect("reporter lock poisoned").clone()
    }

    /// Number of opened steps
    pub fn steps_opened(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ReportEvent::StepOpened(_)))
            .count()
    }

    /// Number of closed steps
    pub fn steps_closed(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, ReportEvent::StepClosed(_)))
            .count()
    }

    /// Statuses of closed steps, in close order
    pub fn closed_statuses(&self) -> Vec<StepStatus> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                ReportEvent::StepClosed(status) => Some(*status),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ReportEvent) {
        self.events.lock().expect("reporter lock poisoned").push(event);
    }
}

#[async_trait]
impl ReportSink for MemoryReporter {
    async fn open_step(&self, name: &str) {
        self.push(ReportEvent::StepOpened(name.to_string()));
    }

    async fn close_step(&self, status: StepStatus) {
        self.push(ReportEvent::StepClosed(status));
    }

    async fn attach_text(&self, label: &str, content: &str) {
        self.push(ReportEvent::Text {
            label: label.to_string(),
            content: content.to_string(),
        });
    }

    async fn attach_binary(&self, label: &str, payload: Vec<u8>, mime: MimeKind) {
        self.push(ReportEvent::Binary {
            label: label.to_string(),
            payload,
            mime,
        });
    }

    async fn add_parameter(&self, name: &str, value: &str) {
        self.push(ReportEvent::Parameter {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    async fn add_link(&self, url: &str, name: Option<&str>, kind: Option<&str>) {
        self.push(ReportEvent::Link {
            url: url.to_string(),
            name: name.map(str::to_string),
            kind: kind.map(str::to_string),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_reporter_records_in_order() {
        let reporter = MemoryReporter::new();
        reporter.open_step("Click login").await;
        reporter.attach_text("note", "hello").await;
        reporter.close_step(StepStatus::Passed).await;

        let events = reporter.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], ReportEvent::StepOpened("Click login".to_string()));
        assert_eq!(events[2], ReportEvent::StepClosed(StepStatus::Passed));
        assert_eq!(reporter.steps_opened(), reporter.steps_closed());
    }
}
