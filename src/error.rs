//! Unified error types for threadline.
//!
//! This module provides a single [`ThreadlineError`] enum that covers all
//! error cases in the library.
//!
//! # Error Categories
//!
//! - **Configuration**: invalid merge rules, timeouts, dates, identities.
//!   These are rejected when the value is constructed, never later.
//! - **Input**: unreadable or malformed message files.
//! - **Output**: failures while writing reports.
//!
//! Empty inputs and contacts without exchanges are *not* errors; they produce
//! empty or zero-valued results.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for threadline operations.
///
/// # Example
///
/// ```rust
/// use threadline::error::Result;
/// use threadline::Message;
///
/// fn my_function() -> Result<Vec<Message>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ThreadlineError>;

/// The error type for all threadline operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ThreadlineError {
    /// An I/O error occurred while reading input or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading or writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A message file was readable but its records are malformed.
    #[error("Failed to load messages{}: {message}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Load {
        /// The file being loaded, if known
        path: Option<PathBuf>,
        /// Description of what's wrong
        message: String,
    },

    /// A merge rule was rejected at construction.
    #[error("Invalid merge rule: {field} {reason}")]
    InvalidMergeRule {
        /// Which part of the rule is invalid (e.g. "source phone")
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Contact identity text could not be parsed.
    #[error("Invalid contact identity '{input}'. Expected format: NAME|PHONE")]
    InvalidIdentity {
        /// The text that was provided
        input: String,
    },

    /// Thread timeout could not be parsed or is not positive.
    #[error("Invalid timeout '{input}'. Expected a positive duration such as 90s, 45m, 2h, 1d or plain minutes")]
    InvalidTimeout {
        /// The text that was provided
        input: String,
    },

    /// Invalid date format in filter configuration.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// The file format doesn't match anything supported.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The kind of format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ThreadlineError {
    /// Creates a load error for a malformed message file.
    pub fn load(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        ThreadlineError::Load {
            path,
            message: message.into(),
        }
    }

    /// Creates an invalid merge rule error.
    pub fn invalid_merge_rule(field: &'static str, reason: &'static str) -> Self {
        ThreadlineError::InvalidMergeRule { field, reason }
    }

    /// Creates an invalid identity error.
    pub fn invalid_identity(input: impl Into<String>) -> Self {
        ThreadlineError::InvalidIdentity {
            input: input.into(),
        }
    }

    /// Creates an invalid timeout error.
    pub fn invalid_timeout(input: impl Into<String>) -> Self {
        ThreadlineError::InvalidTimeout {
            input: input.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ThreadlineError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ThreadlineError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ThreadlineError::Io(_))
    }

    /// Returns `true` if this is a message loading error.
    pub fn is_load(&self) -> bool {
        matches!(self, ThreadlineError::Load { .. })
    }

    /// Returns `true` if this error came from validating configuration
    /// (merge rules, identities, timeouts or dates).
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ThreadlineError::InvalidMergeRule { .. }
                | ThreadlineError::InvalidIdentity { .. }
                | ThreadlineError::InvalidTimeout { .. }
                | ThreadlineError::InvalidDate { .. }
        )
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ThreadlineError::InvalidFormat { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
