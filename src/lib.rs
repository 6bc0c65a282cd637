//! uiprobe - Instrumented UI Action Execution
//!
//! A library that turns fallible, asynchronous UI-driving operations into
//! reportable, classifiable, diagnosable units of work.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, error taxonomy, normalization
//! - **Driver**: Trait boundary to the browser-automation backend
//! - **Report**: Trait boundary to the step/attachment report sink
//! - **Logging**: Trait boundary to the leveled log sink
//! - **Actions**: The instrumented action wrapper and interaction helpers
//! - **Verify**: Concurrent batch verification with failure aggregation
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use uiprobe::{Actions, Config, MemoryReporter, TracingLog, Verify, VerifyMode};
//! # use uiprobe::driver::UiDriver;
//! # async fn demo(driver: Arc<dyn UiDriver>) -> uiprobe::Result<()> {
//! let actions = Actions::new(
//!     driver,
//!     Arc::new(MemoryReporter::new()),
//!     Arc::new(TracingLog),
//!     Config::load(),
//! );
//!
//! actions.navigate_to("/login").await?;
//! actions.fill_input("#email", "user@example.com", None).await?;
//! actions.click_on("#submit", None).await?;
//!
//! let verify = Verify::new(actions);
//! verify
//!     .verify_text_all(
//!         &["#banner", "#greeting"],
//!         &["Welcome", "Hello"],
//!         None,
//!         VerifyMode::CollectAll,
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod core;
pub mod driver;
pub mod logging;
pub mod report;
pub mod verify;

// Re-export commonly used items
pub use actions::{ActionFailure, ActionResult, Actions};
pub use core::{Config, ErrorRecord, MimeKind, Normalizer, Result, StepStatus, TestError, VerifyMode};
pub use driver::{DriverResult, RawError, UiDriver};
pub use logging::{LogSink, MemoryLog, TracingLog};
pub use report::{MemoryReporter, ReportEvent, ReportSink};
pub use verify::{AggregatedFailure, Verify};
