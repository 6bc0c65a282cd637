//! Core module - shared infrastructure for uiprobe
//!
//! Contains configuration, the error taxonomy, error normalization,
//! and shared types.

pub mod config;
pub mod error;
pub mod normalize;
pub mod types;

pub use config::Config;
pub use error::{Result, TestError};
pub use normalize::{ErrorRecord, Normalizer};
pub use types::{MimeKind, StepStatus, VerifyMode};
