#![allow(dead_code)]

//! Shared test doubles: a scriptable mock driver.
//!
//! The mock resolves every operation from per-selector scripts configured at
//! construction and records every interaction, so tests can assert both on
//! outcomes and on which driver calls actually happened.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uiprobe::driver::{DriverResult, RawError, UiDriver};

/// Scripted behavior of one visibility wait
#[derive(Clone)]
pub enum WaitScript {
    /// Becomes visible immediately
    Visible,
    /// Becomes visible after the given delay
    VisibleAfter(Duration),
    /// Driver raises its own timeout after the given delay
    TimesOutAfter(Duration),
    /// Driver raises a timeout immediately
    TimesOut,
    /// Driver raises a non-timeout error
    Fails(String),
}

#[derive(Default)]
pub struct MockDriver {
    waits: HashMap<String, WaitScript>,
    texts: HashMap<String, String>,
    values: HashMap<String, String>,
    attributes: HashMap<(String, String), String>,
    css: HashMap<(String, String), String>,
    counts: HashMap<String, usize>,
    title: String,
    location: Mutex<String>,
    navigate_error: Option<String>,
    snapshot_error: Option<String>,
    session_closed: AtomicBool,
    pub calls: Mutex<Vec<String>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            title: "Mock Page".to_string(),
            location: Mutex::new("https://shop.example.com/".to_string()),
            ..Self::default()
        }
    }

    pub fn wait(mut self, selector: &str, script: WaitScript) -> Self {
        self.waits.insert(selector.to_string(), script);
        self
    }

    pub fn text(mut self, selector: &str, text: &str) -> Self {
        self.texts.insert(selector.to_string(), text.to_string());
        self
    }

    pub fn value(mut self, selector: &str, value: &str) -> Self {
        self.values.insert(selector.to_string(), value.to_string());
        self
    }

    pub fn attribute(mut self, selector: &str, attribute: &str, value: &str) -> Self {
        self.attributes
            .insert((selector.to_string(), attribute.to_string()), value.to_string());
        self
    }

    pub fn css_property(mut self, selector: &str, property: &str, value: &str) -> Self {
        self.css
            .insert((selector.to_string(), property.to_string()), value.to_string());
        self
    }

    pub fn count_of(mut self, selector: &str, count: usize) -> Self {
        self.counts.insert(selector.to_string(), count);
        self
    }

    pub fn page_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn failing_navigation(mut self, message: &str) -> Self {
        self.navigate_error = Some(message.to_string());
        self
    }

    pub fn failing_snapshot(mut self, message: &str) -> Self {
        self.snapshot_error = Some(message.to_string());
        self
    }

    pub fn closed_session(self) -> Self {
        self.session_closed.store(true, Ordering::SeqCst);
        self
    }

    pub fn recorded_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn run_wait(&self, selector: &str, timeout: Duration) -> DriverResult<()> {
        match self.waits.get(selector).cloned().unwrap_or(WaitScript::Visible) {
            WaitScript::Visible => Ok(()),
            WaitScript::VisibleAfter(delay) => {
                tokio::time::sleep(delay).await;
                if delay > timeout {
                    Err(RawError::timeout(format!(
                        "waiting for selector \"{}\"",
                        selector
                    )))
                } else {
                    Ok(())
                }
            }
            WaitScript::TimesOutAfter(delay) => {
                tokio::time::sleep(delay).await;
                Err(RawError::timeout(format!(
                    "waiting for selector \"{}\"",
                    selector
                )))
            }
            WaitScript::TimesOut => Err(RawError::timeout(format!(
                "waiting for selector \"{}\"",
                selector
            ))),
            WaitScript::Fails(message) => Err(RawError::message(message)),
        }
    }
}

#[async_trait]
impl UiDriver for MockDriver {
    async fn wait_for_visible(&self, selector: &str, timeout: Duration) -> DriverResult<()> {
        self.record(format!("wait:{}", selector));
        self.run_wait(selector, timeout).await
    }

    async fn click(&self, selector: &str) -> DriverResult<()> {
        self.record(format!("click:{}", selector));
        Ok(())
    }

    async fn double_click(&self, selector: &str) -> DriverResult<()> {
        self.record(format!("double_click:{}", selector));
        Ok(())
    }

    async fn hover(&self, selector: &str) -> DriverResult<()> {
        self.record(format!("hover:{}", selector));
        Ok(())
    }

    async fn fill(&self, selector: &str, text: &str) -> DriverResult<()> {
        self.record(format!("fill:{}={}", selector, text));
        Ok(())
    }

    async fn focus(&self, selector: &str) -> DriverResult<()> {
        self.record(format!("focus:{}", selector));
        Ok(())
    }

    async fn scroll_into_view(&self, selector: &str) -> DriverResult<()> {
        self.record(format!("scroll:{}", selector));
        Ok(())
    }

    async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.record(format!("navigate:{}", url));
        if let Some(message) = &self.navigate_error {
            return Err(RawError::new("NavigationError", message.clone(), None));
        }
        *self.location.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn current_location(&self) -> DriverResult<String> {
        Ok(self.location.lock().unwrap().clone())
    }

    async fn title(&self) -> DriverResult<String> {
        Ok(self.title.clone())
    }

    async fn text_content(&self, selector: &str) -> DriverResult<String> {
        self.record(format!("text:{}", selector));
        Ok(self.texts.get(selector).cloned().unwrap_or_default())
    }

    async fn input_value(&self, selector: &str) -> DriverResult<String> {
        Ok(self.values.get(selector).cloned().unwrap_or_default())
    }

    async fn attribute_value(
        &self,
        selector: &str,
        attribute: &str,
    ) -> DriverResult<Option<String>> {
        Ok(self
            .attributes
            .get(&(selector.to_string(), attribute.to_string()))
            .cloned())
    }

    async fn css_value(&self, selector: &str, property: &str) -> DriverResult<String> {
        Ok(self
            .css
            .get(&(selector.to_string(), property.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn count(&self, selector: &str) -> DriverResult<usize> {
        Ok(self.counts.get(selector).copied().unwrap_or(0))
    }

    async fn capture_snapshot(&self) -> DriverResult<Vec<u8>> {
        self.record("snapshot".to_string());
        if let Some(message) = &self.snapshot_error {
            return Err(RawError::message(message.clone()));
        }
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    async fn is_session_closed(&self) -> bool {
        self.session_closed.load(Ordering::SeqCst)
    }
}
