//! Configuration management for uiprobe
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/uiprobe/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::{Result, TestError};

/// Main configuration for uiprobe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target environment configuration
    pub target: TargetConfig,
    /// Wait and timeout configuration
    pub waits: WaitConfig,
    /// Failure-diagnostics configuration
    pub diagnostics: DiagnosticsConfig,
    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Target environment under test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Base URL every relative navigation is resolved against
    pub base_url: String,
}

/// Wait and timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Default timeout for visibility waits, in seconds
    pub default_timeout_secs: u64,
    /// Timeout for navigations, in seconds
    pub navigation_timeout_secs: u64,
}

/// Failure-diagnostics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Whether to capture a screenshot when an action fails
    pub screenshot_on_failure: bool,
    /// Whether to attach the structured error summary to the report
    pub attach_error_summary: bool,
}

/// Retry configuration for flaky environments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Number of retries the runner should apply to a failing test
    pub retries: u32,
    /// Delay between retries, in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: TargetConfig::default(),
            waits: WaitConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("UIPROBE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        }
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: env::var("UIPROBE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            navigation_timeout_secs: 30,
        }
    }
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            screenshot_on_failure: env::var("UIPROBE_SCREENSHOTS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            attach_error_summary: true,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: env::var("UIPROBE_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            retry_delay_ms: env::var("UIPROBE_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("uiprobe")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: env vars > config file > defaults
    pub fn load() -> Self {
        // Pick up a .env file if one exists
        let _ = dotenvy::dotenv();

        if let Ok(config) = Self::load_from_file() {
            return config;
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(TestError::Unexpected("Config file not found".to_string()));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| TestError::Unexpected(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| TestError::Unexpected(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).map_err(|e| {
                TestError::Unexpected(format!("Failed to create config dir: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| TestError::Unexpected(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| TestError::Unexpected(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Check that the configured values are usable
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.target.base_url)
            .map_err(|e| TestError::Navigation(format!("Invalid base URL: {}", e)))?;
        Ok(())
    }

    /// Resolve a possibly-relative path against the base URL
    pub fn resolve_url(&self, path: &str) -> Result<String> {
        let base = url::Url::parse(&self.target.base_url)
            .map_err(|e| TestError::Navigation(format!("Invalid base URL: {}", e)))?;
        let resolved = base
            .join(path)
            .map_err(|e| TestError::Navigation(format!("Invalid URL '{}': {}", path, e)))?;
        Ok(resolved.into())
    }

    /// Default visibility-wait timeout as a Duration
    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.waits.default_timeout_secs)
    }

    /// Navigation timeout as a Duration
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.waits.navigation_timeout_secs)
    }
}
