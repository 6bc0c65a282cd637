//! Shared types used across uiprobe modules
//!
//! Contains step statuses, attachment kinds, and verification modes.

use serde::{Deserialize, Serialize};

/// Terminal status of a reporting step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Step completed successfully
    Passed,
    /// Step raised an error
    Failed,
    /// Step was skipped
    Skipped,
    /// Step failed for infrastructure reasons rather than an assertion
    Broken,
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepStatus::Passed => write!(f, "passed"),
            StepStatus::Failed => write!(f, "failed"),
            StepStatus::Skipped => write!(f, "skipped"),
            StepStatus::Broken => write!(f, "broken"),
        }
    }
}

/// Media kind of a report attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MimeKind {
    /// Plain text
    Text,
    /// JSON payload
    Json,
    /// PNG image (screenshots)
    Png,
}

impl MimeKind {
    /// MIME type string for the report sink
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeKind::Text => "text/plain",
            MimeKind::Json => "application/json",
            MimeKind::Png => "image/png",
        }
    }
}

/// How a batch verification reacts to individual failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyMode {
    /// Raise on the first failing item
    FailFast,
    /// Run every item and aggregate all failures into one error
    CollectAll,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_status_display() {
        assert_eq!(StepStatus::Passed.to_string(), "passed");
        assert_eq!(StepStatus::Broken.to_string(), "broken");
    }

    #[test]
    fn test_mime_kind_strings() {
        assert_eq!(MimeKind::Png.as_str(), "image/png");
        assert_eq!(MimeKind::Json.as_str(), "application/json");
    }
}
