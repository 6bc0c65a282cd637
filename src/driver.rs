//! Driver boundary - the browser-automation backend
//!
//! uiprobe does not drive a browser itself. It consumes an implementation of
//! [`UiDriver`] (CDP client, WebDriver client, a subprocess CLI, ...) and
//! treats every error it raises as unstructured text to be normalized.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Raw, unstructured error produced at the driver boundary.
///
/// `message` and `stack` may contain ANSI escapes, multi-line dumps, and
/// framework prefixes; the normalizer is responsible for cleaning them up.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct RawError {
    /// Declared error kind, when the backend provides one
    pub name: Option<String>,
    /// Raw message text
    pub message: String,
    /// Raw stack-trace text, when available
    pub stack: Option<String>,
}

impl RawError {
    /// Create a raw error with a declared kind
    pub fn new(name: impl Into<String>, message: impl Into<String>, stack: Option<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: message.into(),
            stack,
        }
    }

    /// Create a raw error carrying only message text
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            name: None,
            message: message.into(),
            stack: None,
        }
    }

    /// Create a timeout error the way automation backends phrase them
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            name: Some("TimeoutError".to_string()),
            message: format!("TimeoutError: {}", message.into()),
            stack: None,
        }
    }

    /// Whether the backend declared this a timeout
    pub fn is_timeout(&self) -> bool {
        self.name.as_deref() == Some("TimeoutError")
            || self.message.trim_start().starts_with("TimeoutError:")
    }
}

/// Result type for driver operations
pub type DriverResult<T> = std::result::Result<T, RawError>;

/// Asynchronous interface to the underlying browser-automation backend.
///
/// All operations may suspend and may fail with backend-specific errors.
/// Selectors are plain CSS/text selector strings owned by the caller.
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// Wait until the selector is visible, bounded by `timeout`
    async fn wait_for_visible(&self, selector: &str, timeout: Duration) -> DriverResult<()>;

    /// Click the element
    async fn click(&self, selector: &str) -> DriverResult<()>;

    /// Double-click the element
    async fn double_click(&self, selector: &str) -> DriverResult<()>;

    /// Hover over the element
    async fn hover(&self, selector: &str) -> DriverResult<()>;

    /// Replace the element's input value with `text`
    async fn fill(&self, selector: &str, text: &str) -> DriverResult<()>;

    /// Give the element keyboard focus
    async fn focus(&self, selector: &str) -> DriverResult<()>;

    /// Scroll the element into the viewport
    async fn scroll_into_view(&self, selector: &str) -> DriverResult<()>;

    /// Navigate to an absolute URL
    async fn navigate(&self, url: &str) -> DriverResult<()>;

    /// Current page URL
    async fn current_location(&self) -> DriverResult<String>;

    /// Current page title
    async fn title(&self) -> DriverResult<String>;

    /// Trimmed text content of the element
    async fn text_content(&self, selector: &str) -> DriverResult<String>;

    /// Current value of an input element
    async fn input_value(&self, selector: &str) -> DriverResult<String>;

    /// Attribute value, or None when the attribute is absent
    async fn attribute_value(&self, selector: &str, attribute: &str)
        -> DriverResult<Option<String>>;

    /// Computed CSS value of a property
    async fn css_value(&self, selector: &str, property: &str) -> DriverResult<String>;

    /// Number of elements matching the selector
    async fn count(&self, selector: &str) -> DriverResult<usize>;

    /// PNG screenshot of the current viewport
    async fn capture_snapshot(&self) -> DriverResult<Vec<u8>>;

    /// Whether the underlying session has already been torn down
    async fn is_session_closed(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_constructor_carries_prefix() {
        let err = RawError::timeout("waiting for selector \"#a\"");
        assert!(err.is_timeout());
        assert!(err.message.starts_with("TimeoutError:"));
    }

    #[test]
    fn test_prefix_only_timeouts_are_detected() {
        let err = RawError::message("TimeoutError: page.waitForSelector exceeded");
        assert!(err.is_timeout());
        assert!(!RawError::message("net::ERR_ABORTED").is_timeout());
    }
}
