//! Parser configuration.
//!
//! Controls how artifact URLs are built and a few fallback values. Loaded
//! from YAML, optionally overridden from the environment.
//!
//! # Example YAML
//!
//! ```yaml
//! media_base_url: "https://qa.example.com/api"
//! default_browser: "Chrome"
//! step_duration_secs: 2
//! legacy_titles:
//!   - checkout-suite
//! ```

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RunlogError};

/// Environment variable overriding [`ParserConfig::media_base_url`].
pub const BASE_URL_ENV: &str = "RUNLOG_API_BASE_URL";

/// Environment variable overriding [`ParserConfig::default_browser`].
pub const DEFAULT_BROWSER_ENV: &str = "RUNLOG_DEFAULT_BROWSER";

/// Configuration for one [`LogParser`](crate::LogParser).
///
/// Missing YAML keys fall back to [`ParserConfig::default`].
///
/// # Examples
///
/// ```
/// use runlog_parser::ParserConfig;
///
/// let config = ParserConfig::default().with_base_url("https://qa.example.com/api/");
/// assert_eq!(
///     config.video_url("run1.webm"),
///     "https://qa.example.com/api/videos/run1.webm"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Base URL of the job API serving `/videos/` and `/screenshots/`.
    pub media_base_url: String,
    /// Browser reported when the transcript never names one.
    pub default_browser: String,
    /// Seconds added to the synthetic duration per step.
    pub step_duration_secs: u32,
    /// Project names matched case-insensitively as a last resort before
    /// falling back to the last active test case.
    pub legacy_titles: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            media_base_url: "http://localhost:8000".to_string(),
            default_browser: "Unknown".to_string(),
            step_duration_secs: 2,
            legacy_titles: Vec::new(),
        }
    }
}

impl ParserConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](RunlogError::Io) if the file cannot be read,
    /// [`Yaml`](RunlogError::Yaml) if parsing fails, or
    /// [`InvalidConfig`](RunlogError::InvalidConfig) if a value is unusable.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies [`BASE_URL_ENV`] and [`DEFAULT_BROWSER_ENV`] when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup. Empty values are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.media_base_url = url.trim().to_string();
        }
        if let Some(browser) = lookup(DEFAULT_BROWSER_ENV).filter(|v| !v.trim().is_empty()) {
            self.default_browser = browser.trim().to_string();
        }
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.media_base_url = url.into();
        self
    }

    /// Checks that the configuration can produce usable output.
    pub fn validate(&self) -> Result<()> {
        if self.media_base_url.trim().is_empty() {
            return Err(RunlogError::InvalidConfig(
                "media_base_url cannot be empty".to_string(),
            ));
        }
        if self.default_browser.trim().is_empty() {
            return Err(RunlogError::InvalidConfig(
                "default_browser cannot be empty".to_string(),
            ));
        }
        if let Some(blank) = self.legacy_titles.iter().position(|t| t.trim().is_empty()) {
            return Err(RunlogError::InvalidConfig(format!(
                "legacy_titles[{blank}] is blank"
            )));
        }
        Ok(())
    }

    /// Canonical URL of a recorded video file.
    pub fn video_url(&self, file_name: &str) -> String {
        format!("{}/videos/{file_name}", self.base())
    }

    /// Canonical URL of a screenshot file.
    pub fn screenshot_url(&self, file_name: &str) -> String {
        format!("{}/screenshots/{file_name}", self.base())
    }

    /// Stable textual fingerprint, used to key cached results.
    ///
    /// Every field is length-prefixed, so no choice of field contents can
    /// make two different configurations share a fingerprint.
    pub fn fingerprint(&self) -> String {
        let duration = self.step_duration_secs.to_string();
        let fields = [
            self.media_base_url.as_str(),
            self.default_browser.as_str(),
            duration.as_str(),
        ];

        let mut out = String::new();
        for field in fields
            .into_iter()
            .chain(self.legacy_titles.iter().map(String::as_str))
        {
            out.push_str(&format!("{}:{field};", field.len()));
        }
        out
    }

    fn base(&self) -> &str {
        self.media_base_url.trim_end_matches('/')
    }
}
