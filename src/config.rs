//! Configuration types for the analytics pipeline.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`ThreadConfig`] - inactivity timeout and minimum thread length
//! - [`AnalysisConfig`] - local phone number, merge rules and thread settings,
//!   loadable from a JSON file
//!
//! # Example
//!
//! ```rust
//! use threadline::config::ThreadConfig;
//! use chrono::Duration;
//!
//! # fn main() -> threadline::Result<()> {
//! let config = ThreadConfig::new()
//!     .with_timeout_str("45m")?
//!     .with_min_thread_length(3);
//!
//! assert_eq!(config.timeout, Duration::minutes(45));
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::core::identity::MergeRule;
use crate::error::{Result, ThreadlineError};

/// Default inactivity timeout between two messages of the same thread.
pub const DEFAULT_TIMEOUT_MINUTES: i64 = 60;

/// Default minimum number of messages for a thread to be emitted.
pub const DEFAULT_MIN_THREAD_LENGTH: usize = 2;

/// Configuration for thread segmentation.
///
/// A new thread starts when the contact changes or when the gap to the
/// previous message is strictly greater than `timeout`. Threads shorter than
/// `min_thread_length` are discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadConfig {
    /// Inactivity timeout (default: 60 minutes)
    #[serde(with = "timeout_serde")]
    pub timeout: Duration,

    /// Minimum messages per emitted thread (default: 2)
    pub min_thread_length: usize,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::minutes(DEFAULT_TIMEOUT_MINUTES),
            min_thread_length: DEFAULT_MIN_THREAD_LENGTH,
        }
    }
}

impl ThreadConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the inactivity timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the inactivity timeout from text such as `90s`, `45m`, `2h`,
    /// `1d`, or a bare number of minutes.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadlineError::InvalidTimeout`] if the text is not a
    /// positive duration.
    pub fn with_timeout_str(mut self, timeout: &str) -> Result<Self> {
        self.timeout = parse_timeout(timeout)?;
        Ok(self)
    }

    /// Sets the minimum number of messages per emitted thread.
    #[must_use]
    pub fn with_min_thread_length(mut self, min: usize) -> Self {
        self.min_thread_length = min;
        self
    }
}

/// Parses a timeout such as `90s`, `45m`, `2h`, `1d`, or plain minutes.
///
/// ```
/// use threadline::config::parse_timeout;
/// use chrono::Duration;
///
/// assert_eq!(parse_timeout("90s").unwrap(), Duration::seconds(90));
/// assert_eq!(parse_timeout("60").unwrap(), Duration::minutes(60));
/// assert!(parse_timeout("0m").is_err());
/// ```
pub fn parse_timeout(input: &str) -> Result<Duration> {
    let trimmed = input.trim().to_lowercase();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    let value: i64 = number
        .parse()
        .map_err(|_| ThreadlineError::invalid_timeout(input))?;

    let multiplier = match unit.trim() {
        "s" | "sec" | "secs" => 1,
        "" | "m" | "min" | "mins" => 60,
        "h" | "hr" | "hrs" => 3600,
        "d" | "day" | "days" => 86_400,
        _ => return Err(ThreadlineError::invalid_timeout(input)),
    };

    value
        .checked_mul(multiplier)
        .filter(|secs| *secs > 0)
        .and_then(Duration::try_seconds)
        .ok_or_else(|| ThreadlineError::invalid_timeout(input))
}

/// Formats a timeout in the largest whole unit, e.g. `60m` or `2h`.
pub fn format_timeout(timeout: Duration) -> String {
    let secs = timeout.num_seconds();
    if secs != 0 && secs % 86_400 == 0 {
        format!("{}d", secs / 86_400)
    } else if secs != 0 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs != 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

mod timeout_serde {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(timeout: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timeout(*timeout))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timeout(&raw).map_err(de::Error::custom)
    }
}

/// Full analysis configuration, typically loaded from a JSON file.
///
/// ```json
/// {
///   "own_phone": "+15550000000",
///   "merge_rules": [
///     {
///       "source": {"name": "Mike", "phone": "5551234567"},
///       "target": {"name": "Michael Smith", "phone": "+15551234567"},
///       "result": {"name": "Michael Smith", "phone": "+15551234567"}
///     }
///   ],
///   "threads": {"timeout": "45m", "min_thread_length": 2}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Phone number of the local user, excluded from contact comparisons.
    pub own_phone: String,

    /// Ordered merge rules.
    pub merge_rules: Vec<MergeRule>,

    /// Thread segmentation settings.
    pub threads: ThreadConfig,
}

impl AnalysisConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the local user's phone number.
    #[must_use]
    pub fn with_own_phone(mut self, phone: impl Into<String>) -> Self {
        self.own_phone = phone.into();
        self
    }

    /// Appends a merge rule.
    #[must_use]
    pub fn with_merge_rule(mut self, rule: MergeRule) -> Self {
        self.merge_rules.push(rule);
        self
    }

    /// Sets the thread segmentation settings.
    #[must_use]
    pub fn with_threads(mut self, threads: ThreadConfig) -> Self {
        self.threads = threads;
        self
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Every merge rule is validated; the first invalid rule fails the load.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        for rule in &config.merge_rules {
            rule.validate()?;
        }
        log::debug!(
            "loaded config from {} ({} merge rules)",
            path.as_ref().display(),
            config.merge_rules.len()
        );
        Ok(config)
    }

    /// Writes the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
