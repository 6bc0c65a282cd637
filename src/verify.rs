//! Batch verification engine
//!
//! Runs independent checks concurrently and aggregates their failures into
//! one consolidated error, so a screen with many assertable elements yields a
//! single diagnostic artifact instead of N truncated runs. Launch order
//! follows input order; completion order is unconstrained; aggregation
//! re-sorts failures back into input order before reporting.

use std::time::Duration;

use futures::future::{self, BoxFuture};

use crate::actions::{ActionFailure, Actions};
use crate::core::{ErrorRecord, Result, TestError, VerifyMode};
use crate::driver::DriverResult;

/// Failures collected from one batch, in original request order
#[derive(Debug, Default, Clone)]
pub struct AggregatedFailure {
    /// Identifiers of failed items, request-ordered
    pub failed_identifiers: Vec<String>,
    /// Per-identifier error details, request-ordered
    pub details: Vec<(String, ErrorRecord)>,
}

impl AggregatedFailure {
    /// Create an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failed item
    pub fn push(&mut self, identifier: &str, record: ErrorRecord) {
        self.failed_identifiers.push(identifier.to_string());
        self.details.push((identifier.to_string(), record));
    }

    /// Whether any item failed
    pub fn is_empty(&self) -> bool {
        self.failed_identifiers.is_empty()
    }

    /// One line per failed identifier
    pub fn identifier_list(&self) -> String {
        self.failed_identifiers.join("\n")
    }

    /// One block per failed item with its expected/actual detail message
    pub fn detail_list(&self) -> String {
        self.details
            .iter()
            .map(|(id, record)| format!("- Selector: <<{}>>\n  {}", id, record.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Concurrent verification built on top of [`Actions`]
#[derive(Clone)]
pub struct Verify {
    actions: Actions,
}

impl Verify {
    /// Create a verification engine sharing the given executor's wiring
    pub fn new(actions: Actions) -> Self {
        Self { actions }
    }

    /// The underlying instrumented executor
    pub fn actions(&self) -> &Actions {
        &self.actions
    }

    /// Run every check concurrently, each bounded by `timeout`.
    ///
    /// Checks are lazy futures; none is polled before the arity check
    /// passes. Per-item timeouts are recorded as missing and aggregated into
    /// one `ElementNotVisible` error enumerating every missing identifier in
    /// input order. Any non-timeout error aborts the batch immediately.
    /// Requires one check per identifier; an arity mismatch raises
    /// `CountMismatch` before any check runs.
    pub async fn verify_all(
        &self,
        identifiers: &[&str],
        checks: Vec<BoxFuture<'_, DriverResult<()>>>,
        timeout: Duration,
        mode: VerifyMode,
    ) -> Result<()> {
        if identifiers.len() != checks.len() {
            return Err(TestError::CountMismatch(format!(
                "Expected {} checks but received {} identifiers. Make sure both sequences are of equal length.",
                checks.len(),
                identifiers.len()
            )));
        }

        let name = format!("Verify {} concurrent checks", identifiers.len());
        self.actions
            .run(&name, async {
                let missing = self.settle(identifiers, checks, timeout).await?;
                if missing.is_empty() {
                    return Ok(());
                }
                Err(Self::not_visible_error(&missing, timeout, mode).into())
            })
            .await
    }

    /// Wait for every selector to become visible, aggregating the ones that
    /// never do.
    pub async fn verify_visible_all(
        &self,
        selectors: &[&str],
        timeout: Option<Duration>,
        mode: VerifyMode,
    ) -> Result<()> {
        let timeout = self.timeout_or_default(timeout);
        let name = if selectors.len() == 1 {
            format!("Verify element <<{}>> is visible", selectors[0])
        } else {
            format!("Verify {} elements are visible", selectors.len())
        };

        self.actions
            .run(&name, async {
                let missing = self.await_visibility(selectors, timeout).await?;
                if missing.is_empty() {
                    return Ok(());
                }
                Err(Self::not_visible_error(&missing, timeout, mode).into())
            })
            .await
    }

    /// Verify that every element's text contains its expected content.
    ///
    /// Two phases, both fanned out concurrently: first visibility (missing
    /// elements aggregate into one `ElementNotVisible` error), then content
    /// (mismatches aggregate into one `TextMismatch` error listing expected
    /// and actual per identifier, in input order). `FailFast` raises on the
    /// first failing item instead of collecting.
    pub async fn verify_text_all(
        &self,
        selectors: &[&str],
        expected: &[&str],
        timeout: Option<Duration>,
        mode: VerifyMode,
    ) -> Result<()> {
        if selectors.len() != expected.len() {
            return Err(TestError::CountMismatch(format!(
                "Expected {} texts but received {} identifiers. Make sure both sequences are of equal length.",
                expected.len(),
                selectors.len()
            )));
        }

        let timeout = self.timeout_or_default(timeout);
        let name = if selectors.len() == 1 {
            format!(
                "Verify element <<{}>> contains text: \"{}\"",
                selectors[0], expected[0]
            )
        } else {
            format!("Verify {} elements contain expected texts", selectors.len())
        };

        self.actions
            .run(&name, async {
                let missing = self.await_visibility(selectors, timeout).await?;
                if !missing.is_empty() {
                    return Err(Self::not_visible_error(&missing, timeout, mode).into());
                }

                let driver = self.actions.driver();
                let fetches = selectors.iter().map(|sel| driver.text_content(sel));
                let texts = future::join_all(fetches).await;

                let mut mismatches = AggregatedFailure::new();
                for ((selector, want), fetched) in
                    selectors.iter().zip(expected.iter()).zip(texts)
                {
                    let actual = fetched?;
                    let actual = actual.trim();
                    let want = want.trim();
                    if actual.contains(want) {
                        continue;
                    }

                    let record = ErrorRecord {
                        kind: "TextMismatchError".to_string(),
                        message: format!("Expected: \"{}\"\n  Actual: \"{}\"", want, actual),
                        frames: Vec::new(),
                    };
                    if mode == VerifyMode::FailFast {
                        return Err(TestError::TextMismatch(format!(
                            "Text mismatch on <<{}>>. Expected: \"{}\", Actual: \"{}\"",
                            selector, want, actual
                        ))
                        .into());
                    }
                    mismatches.push(selector, record);
                }

                if mismatches.is_empty() {
                    return Ok(());
                }
                Err(TestError::TextMismatch(format!(
                    "Text content mismatches:\n{}",
                    mismatches.detail_list()
                ))
                .into())
            })
            .await
    }

    /// Verify the page title matches exactly
    pub async fn verify_title(&self, expected: &str) -> Result<()> {
        let name = format!("Verify page title: \"{}\"", expected);
        self.actions
            .run(&name, async {
                let actual = self.actions.driver().title().await?;
                if actual.trim() == expected {
                    Ok(())
                } else {
                    Err(TestError::TextMismatch(format!(
                        "Page title mismatch. Expected: \"{}\", Actual: \"{}\"",
                        expected,
                        actual.trim()
                    ))
                    .into())
                }
            })
            .await
    }

    /// Verify the current URL contains the expected fragment
    pub async fn verify_url_contains(&self, fragment: &str) -> Result<()> {
        let name = format!("Verify URL contains: \"{}\"", fragment);
        self.actions
            .run(&name, async {
                let location = self.actions.driver().current_location().await?;
                if location.contains(fragment) {
                    Ok(())
                } else {
                    Err(TestError::Navigation(format!(
                        "URL mismatch. Expected to contain: \"{}\", Actual: \"{}\"",
                        fragment, location
                    ))
                    .into())
                }
            })
            .await
    }

    /// Verify an input element carries the expected value
    pub async fn verify_value(
        &self,
        selector: &str,
        expected: &str,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let name = format!("Verify element <<{}>> has value: \"{}\"", selector, expected);
        let timeout = self.timeout_or_default(timeout);
        self.actions
            .run(&name, async {
                let driver = self.actions.driver();
                driver.wait_for_visible(selector, timeout).await?;
                let actual = driver.input_value(selector).await?;
                if actual == expected {
                    Ok(())
                } else {
                    Err(TestError::ValueMismatch(format!(
                        "Value mismatch on <<{}>>. Expected: \"{}\", Actual: \"{}\"",
                        selector, expected, actual
                    ))
                    .into())
                }
            })
            .await
    }

    /// Verify a computed CSS property value
    pub async fn verify_css(
        &self,
        selector: &str,
        property: &str,
        expected: &str,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let name = format!(
            "Verify element <<{}>> has CSS property \"{}\": \"{}\"",
            selector, property, expected
        );
        let timeout = self.timeout_or_default(timeout);
        self.actions
            .run(&name, async {
                let driver = self.actions.driver();
                driver.wait_for_visible(selector, timeout).await?;
                let actual = driver.css_value(selector, property).await?;
                if actual == expected {
                    Ok(())
                } else {
                    Err(TestError::CssMismatch(format!(
                        "CSS mismatch on <<{}>> for \"{}\". Expected: \"{}\", Actual: \"{}\"",
                        selector, property, expected, actual
                    ))
                    .into())
                }
            })
            .await
    }

    /// Verify an attribute value, treating an absent attribute as a mismatch
    pub async fn verify_attribute(
        &self,
        selector: &str,
        attribute: &str,
        expected: &str,
        timeout: Option<Duration>,
    ) -> Result<()> {
        let name = format!(
            "Verify <<{}>> has attribute [{}=\"{}\"]",
            selector, attribute, expected
        );
        let timeout = self.timeout_or_default(timeout);
        self.actions
            .run(&name, async {
                let driver = self.actions.driver();
                driver.wait_for_visible(selector, timeout).await?;
                match driver.attribute_value(selector, attribute).await? {
                    Some(actual) if actual == expected => Ok(()),
                    Some(actual) => Err(TestError::AttributeMismatch(format!(
                        "Attribute mismatch on <<{}>>. Expected [{}=\"{}\"], Actual: \"{}\"",
                        selector, attribute, expected, actual
                    ))
                    .into()),
                    None => Err(TestError::AttributeMismatch(format!(
                        "Attribute \"{}\" is absent on <<{}>>",
                        attribute, selector
                    ))
                    .into()),
                }
            })
            .await
    }

    /// Verify how many elements match the selector
    pub async fn verify_count(&self, selector: &str, expected: usize) -> Result<()> {
        let name = format!("Verify <<{}>> has count: {}", selector, expected);
        self.actions
            .run(&name, async {
                let actual = self.actions.driver().count(selector).await?;
                if actual == expected {
                    Ok(())
                } else {
                    Err(TestError::CountMismatch(format!(
                        "Count mismatch on <<{}>>. Expected: {}, Actual: {}",
                        selector, expected, actual
                    ))
                    .into())
                }
            })
            .await
    }

    fn timeout_or_default(&self, timeout: Option<Duration>) -> Duration {
        timeout.unwrap_or_else(|| self.actions.config().default_timeout())
    }

    /// Fan out the checks and classify each settled result. Timeouts (both
    /// the outer bound and driver-declared ones) come back as the missing
    /// aggregate; the first non-timeout error aborts the batch.
    async fn settle(
        &self,
        identifiers: &[&str],
        checks: Vec<BoxFuture<'_, DriverResult<()>>>,
        timeout: Duration,
    ) -> std::result::Result<AggregatedFailure, ActionFailure> {
        let bounded = checks
            .into_iter()
            .map(|check| tokio::time::timeout(timeout, check));
        let results = future::join_all(bounded).await;

        let mut missing = AggregatedFailure::new();
        for (identifier, result) in identifiers.iter().zip(results) {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(raw)) if raw.is_timeout() => {
                    missing.push(identifier, self.actions.normalizer().normalize(&raw));
                }
                Ok(Err(raw)) => return Err(raw.into()),
                Err(_elapsed) => {
                    let record = ErrorRecord {
                        kind: "TimeoutError".to_string(),
                        message: format!("check for {} exceeded {:?}", identifier, timeout),
                        frames: Vec::new(),
                    };
                    missing.push(identifier, record);
                }
            }
        }
        Ok(missing)
    }

    /// Fan out visibility waits for every selector
    async fn await_visibility(
        &self,
        selectors: &[&str],
        timeout: Duration,
    ) -> std::result::Result<AggregatedFailure, ActionFailure> {
        let driver = self.actions.driver();
        let waits = selectors
            .iter()
            .map(|sel| driver.wait_for_visible(sel, timeout));
        let results = future::join_all(waits).await;

        let mut missing = AggregatedFailure::new();
        for (selector, result) in selectors.iter().zip(results) {
            match result {
                Ok(()) => {}
                Err(raw) if raw.is_timeout() => {
                    missing.push(selector, self.actions.normalizer().normalize(&raw));
                }
                Err(raw) => return Err(raw.into()),
            }
        }
        Ok(missing)
    }

    fn not_visible_error(
        missing: &AggregatedFailure,
        timeout: Duration,
        mode: VerifyMode,
    ) -> TestError {
        if mode == VerifyMode::FailFast {
            // First missing item only, in input order
            let first = missing
                .failed_identifiers
                .first()
                .map(String::as_str)
                .unwrap_or("<none>");
            return TestError::ElementNotVisible(format!(
                "Element {} was NOT visible within {:?}",
                first, timeout
            ));
        }
        TestError::ElementNotVisible(format!(
            "The following elements were NOT visible within {:?}:\n{}",
            timeout,
            missing.identifier_list()
        ))
    }
}
