//! Custom error types for uiprobe
//!
//! Provides the failure taxonomy raised by instrumented actions and
//! batch verifications.

use thiserror::Error;

/// Main error type for instrumented UI operations
#[derive(Error, Debug, Clone)]
pub enum TestError {
    /// Generic soft-check failure
    #[error("{0}")]
    Assertion(String),

    /// A wait exceeded its bound
    #[error("{0}")]
    Timeout(String),

    /// Element text diverged from the expected content
    #[error("{0}")]
    TextMismatch(String),

    /// Input value diverged from the expected content
    #[error("{0}")]
    ValueMismatch(String),

    /// CSS property diverged from the expected value
    #[error("{0}")]
    CssMismatch(String),

    /// Attribute diverged from the expected value
    #[error("{0}")]
    AttributeMismatch(String),

    /// Input arity or element-count divergence
    #[error("{0}")]
    CountMismatch(String),

    /// Selector never became visible within the timeout
    #[error("{0}")]
    ElementNotVisible(String),

    /// Selector matched nothing
    #[error("{0}")]
    SelectorNotFound(String),

    /// Navigation failed
    #[error("{0}")]
    Navigation(String),

    /// Fallback for unclassified failures
    #[error("{0}")]
    Unexpected(String),
}

/// Convenience Result type for uiprobe operations
pub type Result<T> = std::result::Result<T, TestError>;

impl TestError {
    /// Canonical kind name as it appears in reports and logs
    pub fn kind(&self) -> &'static str {
        match self {
            TestError::Assertion(_) => "AssertionError",
            TestError::Timeout(_) => "TimeoutError",
            TestError::TextMismatch(_) => "TextMismatchError",
            TestError::ValueMismatch(_) => "ValueMismatchError",
            TestError::CssMismatch(_) => "CssMismatchError",
            TestError::AttributeMismatch(_) => "AttributeMismatchError",
            TestError::CountMismatch(_) => "CountMismatchError",
            TestError::ElementNotVisible(_) => "ElementNotVisibleError",
            TestError::SelectorNotFound(_) => "SelectorNotFoundError",
            TestError::Navigation(_) => "NavigationError",
            TestError::Unexpected(_) => "UnexpectedError",
        }
    }

    /// The message carried by this error
    pub fn message(&self) -> &str {
        match self {
            TestError::Assertion(m)
            | TestError::Timeout(m)
            | TestError::TextMismatch(m)
            | TestError::ValueMismatch(m)
            | TestError::CssMismatch(m)
            | TestError::AttributeMismatch(m)
            | TestError::CountMismatch(m)
            | TestError::ElementNotVisible(m)
            | TestError::SelectorNotFound(m)
            | TestError::Navigation(m)
            | TestError::Unexpected(m) => m,
        }
    }

    /// Build an error from a canonical kind name, falling back to Unexpected
    pub fn from_kind(kind: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            "AssertionError" => Self::Assertion(message),
            "TimeoutError" => Self::Timeout(message),
            "TextMismatchError" => Self::TextMismatch(message),
            "ValueMismatchError" => Self::ValueMismatch(message),
            "CssMismatchError" => Self::CssMismatch(message),
            "AttributeMismatchError" => Self::AttributeMismatch(message),
            "CountMismatchError" => Self::CountMismatch(message),
            "ElementNotVisibleError" => Self::ElementNotVisible(message),
            "SelectorNotFoundError" => Self::SelectorNotFound(message),
            "NavigationError" => Self::Navigation(message),
            _ => Self::Unexpected(message),
        }
    }
}
