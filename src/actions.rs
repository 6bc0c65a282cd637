//! Instrumented action execution
//!
//! [`Actions`] wraps named asynchronous UI operations with uniform
//! observability: an attempt log and an open report step before the work, a
//! completion log and a passed step on success, and on failure a failed step,
//! a structured error log, an attached diagnostic summary, a best-effort
//! screenshot, and a normalized re-raised error.
//!
//! Every dependency (driver, report sink, log sink) is injected at
//! construction, so each session owns its own wiring.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::core::{Config, ErrorRecord, MimeKind, Normalizer, Result, StepStatus, TestError};
use crate::driver::{RawError, UiDriver};
use crate::logging::LogSink;
use crate::report::ReportSink;

/// Failure raised by an executor closure.
///
/// Driver calls fail with raw unstructured errors; assertion logic inside a
/// closure fails with an already-classified [`TestError`]. The wrapper
/// normalizes the former and re-raises the latter unchanged, so one
/// instrumented action can safely invoke another without double-wrapping.
#[derive(Debug)]
pub enum ActionFailure {
    /// Unstructured error from the driver boundary
    Raw(RawError),
    /// Already-classified error, re-raised as is
    Classified(TestError),
}

impl From<RawError> for ActionFailure {
    fn from(raw: RawError) -> Self {
        Self::Raw(raw)
    }
}

impl From<TestError> for ActionFailure {
    fn from(err: TestError) -> Self {
        Self::Classified(err)
    }
}

/// Result type for executor closures passed to [`Actions::run`]
pub type ActionResult<R> = std::result::Result<R, ActionFailure>;

/// Instrumented executor for named UI actions
#[derive(Clone)]
pub struct Actions {
    driver: Arc<dyn UiDriver>,
    reporter: Arc<dyn ReportSink>,
    log: Arc<dyn LogSink>,
    normalizer: Normalizer,
    config: Config,
}

impl Actions {
    /// Create an instrumented executor with explicit dependencies
    pub fn new(
        driver: Arc<dyn UiDriver>,
        reporter: Arc<dyn ReportSink>,
        log: Arc<dyn LogSink>,
        config: Config,
    ) -> Self {
        Self {
            driver,
            reporter,
            log,
            normalizer: Normalizer::new(),
            config,
        }
    }

    /// Replace the default normalizer (e.g. to install a frame matcher)
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// The driver this executor drives
    pub fn driver(&self) -> &Arc<dyn UiDriver> {
        &self.driver
    }

    /// The report sink this executor reports to
    pub fn reporter(&self) -> &Arc<dyn ReportSink> {
        &self.reporter
    }

    /// The log sink this executor logs to
    pub fn log(&self) -> &Arc<dyn LogSink> {
        &self.log
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The normalizer applied to raw driver errors
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Execute a named operation with full instrumentation.
    ///
    /// The report step opened for `name` is closed on every exit path. On
    /// failure the error is normalized, logged, attached to the report
    /// together with a screenshot, and re-raised as a [`TestError`].
    pub async fn run<R, F>(&self, name: &str, op: F) -> Result<R>
    where
        F: Future<Output = ActionResult<R>>,
    {
        self.log.info(&format!("attempting: {}", name));
        self.reporter.open_step(name).await;

        match op.await {
            Ok(value) => {
                self.log.info(&format!("completed: {}", name));
                self.reporter.close_step(StepStatus::Passed).await;
                Ok(value)
            }
            Err(failure) => {
                self.reporter.close_step(StepStatus::Failed).await;
                Err(self.report_failure(name, failure).await)
            }
        }
    }

    /// Normalize, log, and report one failed action, returning the error to
    /// raise. Diagnostics run inside their own nested step so they appear
    /// next to the failed step in the report.
    async fn report_failure(&self, name: &str, failure: ActionFailure) -> TestError {
        let (record, err) = match failure {
            ActionFailure::Classified(err) => {
                let record = ErrorRecord {
                    kind: err.kind().to_string(),
                    message: err.message().to_string(),
                    frames: Vec::new(),
                };
                (record, err)
            }
            ActionFailure::Raw(raw) => {
                let record = self.normalizer.normalize(&raw);
                let err = TestError::from_kind(&record.kind, record.message.clone());
                (record, err)
            }
        };

        self.log
            .error(&format!("action \"{}\" failed", name), Some(&record));

        self.reporter
            .open_step(&format!("Error details for \"{}\"", name))
            .await;

        if self.config.diagnostics.attach_error_summary {
            let location = self
                .driver
                .current_location()
                .await
                .unwrap_or_else(|_| "unknown".to_string());

            let frames = if record.frames.is_empty() {
                "No stack trace".to_string()
            } else {
                record.frames.join("\n")
            };

            let mut summary = format!(
                "ACTION: {}\nKIND: {}\nMESSAGE: {}\nPAGE URL: {}\nSTACK:\n{}",
                name, record.kind, record.message, location, frames
            );
            if let Some(frame) = self.normalizer.test_frame(&record) {
                summary.push_str(&format!("\nTEST FRAME: {}", frame));
            }
            self.reporter.attach_text("Error information", &summary).await;
        }

        if self.config.diagnostics.screenshot_on_failure {
            self.capture_on_failure(name).await;
        }

        self.reporter.close_step(StepStatus::Failed).await;

        err
    }

    /// Best-effort screenshot of the current UI state.
    ///
    /// Never raises: a torn-down session is skipped, and capture failures are
    /// logged and swallowed so they cannot mask the primary error.
    pub async fn capture_on_failure(&self, action_name: &str) {
        if self.driver.is_session_closed().await {
            self.log.warn(&format!(
                "session already closed, skipping screenshot for \"{}\"",
                action_name
            ));
            return;
        }

        match self.driver.capture_snapshot().await {
            Ok(png) => {
                self.reporter
                    .attach_binary(&format!("{} Screenshot", action_name), png, MimeKind::Png)
                    .await;
                self.log.info(&format!(
                    "screenshot captured for failed action \"{}\"",
                    action_name
                ));
            }
            Err(raw) => {
                let record = self.normalizer.normalize(&raw);
                self.log.error(
                    &format!("error capturing screenshot for \"{}\"", action_name),
                    Some(&record),
                );
            }
        }
    }

    fn timeout_or_default(&self, timeout: Option<Duration>) -> Duration {
        timeout.unwrap_or_else(|| self.config.default_timeout())
    }

    /// Navigate to a path or absolute URL, resolved against the base URL
    pub async fn navigate_to(&self, path: &str) -> Result<()> {
        let name = format!("Navigate to \"{}\"", path);
        self.run(&name, async {
            let url = self.config.resolve_url(path)?;
            self.driver.navigate(&url).await?;
            self.reporter.add_parameter("url", &url).await;
            self.reporter.add_link(&url, Some("visited page"), Some("url")).await;
            Ok(())
        })
        .await
    }

    /// Wait for the element and click it
    pub async fn click_on(&self, selector: &str, timeout: Option<Duration>) -> Result<()> {
        let name = format!("Click on element: <<{}>>", selector);
        let timeout = self.timeout_or_default(timeout);
        self.run(&name, async {
            self.driver.wait_for_visible(selector, timeout).await?;
            self.driver.click(selector).await?;
            Ok(())
        })
        .await
    }

    /// Wait for the element and double-click it
    pub async fn double_click_on(&self, selector: &str, timeout: Option<Duration>) -> Result<()> {
        let name = format!("Double-click on element: <<{}>>", selector);
        let timeout = self.timeout_or_default(timeout);
        self.run(&name, async {
            self.driver.wait_for_visible(selector, timeout).await?;
            self.driver.double_click(selector).await?;
            Ok(())
        })
        .await
    }

    /// Wait for the element and hover over it
    pub async fn hover_over(&self, selector: &str, timeout: Option<Duration>) -> Result<()> {
        let name = format!("Mouse hover over element: <<{}>>", selector);
        let timeout = self.timeout_or_default(timeout);
        self.run(&name, async {
            self.driver.wait_for_visible(selector, timeout).await?;
            self.driver.hover(selector).await?;
            Ok(())
        })
        .await
    }

    /// Wait for the input and replace its value with `text`
    pub async fn fill_input(
        &self,
        selector: &str,
        text: &str,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let name = format!("Fill input box <<{}>> with text: \"{}\"", selector, text);
        let timeout = self.timeout_or_default(timeout);
        self.run(&name, async {
            self.driver.wait_for_visible(selector, timeout).await?;
            self.driver.fill(selector, text).await?;
            Ok(())
        })
        .await
    }

    /// Clear the input, then fill it with `text`
    pub async fn type_input(&self, selector: &str, text: &str) -> Result<()> {
        let name = format!("Type text: \"{}\" in input box <<{}>>", text, selector);
        self.run(&name, async {
            self.driver.fill(selector, "").await?;
            self.driver.fill(selector, text).await?;
            Ok(())
        })
        .await
    }

    /// Wait for the input and clear its value
    pub async fn clear_input(&self, selector: &str, timeout: Option<Duration>) -> Result<()> {
        let name = format!("Clear input field: <<{}>>", selector);
        let timeout = self.timeout_or_default(timeout);
        self.run(&name, async {
            self.driver.wait_for_visible(selector, timeout).await?;
            self.driver.fill(selector, "").await?;
            Ok(())
        })
        .await
    }

    /// Wait for the element and give it keyboard focus
    pub async fn focus_on(&self, selector: &str, timeout: Option<Duration>) -> Result<()> {
        let name = format!("Focus on element: <<{}>>", selector);
        let timeout = self.timeout_or_default(timeout);
        self.run(&name, async {
            self.driver.wait_for_visible(selector, timeout).await?;
            self.driver.focus(selector).await?;
            Ok(())
        })
        .await
    }

    /// Scroll the element into the viewport and click it
    pub async fn scroll_and_click(&self, selector: &str, timeout: Option<Duration>) -> Result<()> {
        let name = format!("Scroll and click on element: <<{}>>", selector);
        let timeout = self.timeout_or_default(timeout);
        self.run(&name, async {
            self.driver.wait_for_visible(selector, timeout).await?;
            self.driver.scroll_into_view(selector).await?;
            self.driver.click(selector).await?;
            Ok(())
        })
        .await
    }

    /// Click only when the element's text matches the expectation exactly
    pub async fn validate_and_click(
        &self,
        selector: &str,
        expected_text: &str,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let name = format!(
            "Validate and click on element: <<{}>> with expected text: \"{}\"",
            selector, expected_text
        );
        let timeout = self.timeout_or_default(timeout);
        self.run(&name, async {
            self.driver.wait_for_visible(selector, timeout).await?;
            self.driver.focus(selector).await?;

            let actual = self.driver.text_content(selector).await?;
            if actual.trim() == expected_text {
                self.driver.click(selector).await?;
                Ok(())
            } else {
                Err(TestError::TextMismatch(format!(
                    "Text mismatch on {}. Expected: \"{}\", Found: \"{}\"",
                    selector,
                    expected_text,
                    actual.trim()
                ))
                .into())
            }
        })
        .await
    }
}
