//! Error normalization
//!
//! Turns the raw, unstructured errors thrown by the browser driver into a
//! structured [`ErrorRecord`] suitable for logs, report attachments, and
//! re-raising. Pure transformation: normalization itself never fails.

use std::sync::Arc;

use regex::Regex;
use serde::Serialize;

use crate::driver::RawError;

/// Prefix the driver prepends to wait-timeout messages
const TIMEOUT_PREFIX: &str = "TimeoutError:";

/// Message used when the raw error carries no message at all
const UNKNOWN_MESSAGE: &str = "Unknown error message";

/// Normalized representation of a raw driver error
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    /// Declared error kind, or "UnknownError" when the driver gave none
    pub kind: String,
    /// First non-empty line of the raw message, ANSI- and prefix-stripped
    pub message: String,
    /// Call-stack lines in original order, innermost first
    pub frames: Vec<String>,
}

impl ErrorRecord {
    /// Last frame recognized by the given predicate, if any.
    ///
    /// Callers typically pass a predicate matching their test-file naming
    /// convention to find the frame inside the failing test itself.
    pub fn matching_frame<P>(&self, predicate: P) -> Option<&str>
    where
        P: Fn(&str) -> bool,
    {
        self.frames
            .iter()
            .rev()
            .find(|frame| predicate(frame))
            .map(String::as_str)
    }
}

/// Shared predicate for classifying stack frames
pub type FrameMatcher = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Converts raw driver errors into [`ErrorRecord`]s
#[derive(Clone)]
pub struct Normalizer {
    ansi: Regex,
    frame_matcher: Option<FrameMatcher>,
}

impl Normalizer {
    /// Create a normalizer with no frame classification
    pub fn new() -> Self {
        Self {
            // Matches SGR color/style escape sequences
            ansi: Regex::new(r"\x1B\[[0-9;]*m").expect("ANSI pattern is valid"),
            frame_matcher: None,
        }
    }

    /// Install a predicate that recognizes test-owned stack frames
    pub fn with_frame_matcher<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.frame_matcher = Some(Arc::new(predicate));
        self
    }

    /// Normalize a raw driver error into a structured record
    pub fn normalize(&self, raw: &RawError) -> ErrorRecord {
        let message = self.clean_message(&raw.message);

        let kind = match &raw.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ if self.strip_ansi(&raw.message).trim_start().starts_with(TIMEOUT_PREFIX) => {
                "TimeoutError".to_string()
            }
            _ => "UnknownError".to_string(),
        };

        // The stack usually embeds the message header; when the driver gave
        // no separate stack, frames may still be inlined in the message.
        let stack_text = raw.stack.as_deref().unwrap_or(&raw.message);
        let frames = self.extract_frames(stack_text);

        ErrorRecord {
            kind,
            message,
            frames,
        }
    }

    /// Frame the matcher recognizes as test-owned, for the given record
    pub fn test_frame<'a>(&self, record: &'a ErrorRecord) -> Option<&'a str> {
        let matcher = self.frame_matcher.as_ref()?;
        record.matching_frame(|frame| matcher(frame))
    }

    fn strip_ansi(&self, text: &str) -> String {
        self.ansi.replace_all(text, "").into_owned()
    }

    fn clean_message(&self, raw: &str) -> String {
        let cleaned = self.strip_ansi(raw);
        let first_line = cleaned
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("");

        let stripped = first_line
            .strip_prefix(TIMEOUT_PREFIX)
            .map(str::trim)
            .unwrap_or(first_line);

        if stripped.is_empty() {
            UNKNOWN_MESSAGE.to_string()
        } else {
            stripped.to_string()
        }
    }

    fn extract_frames(&self, stack: &str) -> Vec<String> {
        self.strip_ansi(stack)
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with("at "))
            .map(str::to_string)
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_timeout_with_ansi_codes() {
        let raw = RawError::message(
            "\x1B[31mTimeoutError: waiting for selector\x1B[0m\nat foo.ts:10:2",
        );
        let record = Normalizer::new().normalize(&raw);
        assert_eq!(record.kind, "TimeoutError");
        assert_eq!(record.message, "waiting for selector");
        assert_eq!(record.frames, vec!["at foo.ts:10:2"]);
    }

    #[test]
    fn test_normalize_is_idempotent_on_clean_input() {
        let normalizer = Normalizer::new();
        let raw = RawError::message("element #login not found");
        let once = normalizer.normalize(&raw);
        let twice = normalizer.normalize(&RawError::message(&once.message));
        assert_eq!(once.message, twice.message);
        assert_eq!(once.message, "element #login not found");
    }

    #[test]
    fn test_declared_name_wins_over_prefix_detection() {
        let raw = RawError::new("NavigationError", "net::ERR_ABORTED", None);
        let record = Normalizer::new().normalize(&raw);
        assert_eq!(record.kind, "NavigationError");
    }

    #[test]
    fn test_missing_message_degrades_to_default() {
        let raw = RawError::message("   \n  ");
        let record = Normalizer::new().normalize(&raw);
        assert_eq!(record.kind, "UnknownError");
        assert_eq!(record.message, "Unknown error message");
        assert!(record.frames.is_empty());
    }

    #[test]
    fn test_frames_keep_original_order_and_drop_headers() {
        let raw = RawError::new(
            "Error",
            "boom",
            Some(
                "Error: boom\n  at inner (/app/helper.ts:4:1)\n\n  at outer (/app/login.spec.ts:22:9)"
                    .to_string(),
            ),
        );
        let record = Normalizer::new().normalize(&raw);
        assert_eq!(
            record.frames,
            vec![
                "at inner (/app/helper.ts:4:1)",
                "at outer (/app/login.spec.ts:22:9)"
            ]
        );
    }

    #[test]
    fn test_frame_matcher_selects_last_matching_frame() {
        let normalizer =
            Normalizer::new().with_frame_matcher(|frame: &str| frame.contains(".spec.ts"));
        let raw = RawError::new(
            "Error",
            "boom",
            Some(
                "at a (/app/x.spec.ts:1:1)\nat b (/app/util.ts:2:2)\nat c (/app/y.spec.ts:3:3)"
                    .to_string(),
            ),
        );
        let record = normalizer.normalize(&raw);
        assert_eq!(
            normalizer.test_frame(&record),
            Some("at c (/app/y.spec.ts:3:3)")
        );
    }
}
