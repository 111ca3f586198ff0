//! Input and output format types.
//!
//! These types don't depend on CLI frameworks and are usable from library
//! code directly. The CLI maps its own `clap` enum onto [`OutputFormat`].
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "csv-output")]
//! # fn example() -> threadline::Result<()> {
//! use threadline::core::models::DuplicateRow;
//! use threadline::format::{OutputFormat, to_format_string};
//!
//! let rows: Vec<DuplicateRow> = Vec::new();
//! let json = to_format_string(&rows, OutputFormat::Json)?;
//! assert_eq!(json, "[]");
//!
//! // Or use format detection from extension
//! let format = OutputFormat::from_path("report.jsonl")?;
//! assert_eq!(format, OutputFormat::Jsonl);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ThreadlineError;

fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Output format for reports.
///
/// - [`Csv`](OutputFormat::Csv) - semicolon-delimited table, opens in spreadsheets
/// - [`Json`](OutputFormat::Json) - pretty-printed array
/// - [`Jsonl`](OutputFormat::Jsonl) - one JSON object per line
///
/// # Example
///
/// ```rust
/// use threadline::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("jsonl").unwrap();
/// assert_eq!(format, OutputFormat::Jsonl);
/// assert_eq!(format.extension(), "jsonl");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// CSV with semicolon delimiter
    Csv,

    /// JSON array (default)
    #[default]
    Json,

    /// JSON Lines - one JSON object per line. Also known as NDJSON.
    Jsonl,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["csv", "json", "jsonl", "ndjson"]
    }

    /// Detects format from a file path based on extension.
    ///
    /// ```rust
    /// use threadline::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::from_path("out/threads.CSV").unwrap(), OutputFormat::Csv);
    /// assert!(OutputFormat::from_path("report.txt").is_err());
    /// ```
    pub fn from_path(path: &str) -> Result<Self, ThreadlineError> {
        let ext = extension_of(path);

        match ext.as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(ThreadlineError::invalid_format(
                "output",
                format!(
                    "Unknown file extension: '.{}'. Expected one of: csv, json, jsonl",
                    ext
                ),
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

/// Format of a message history file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum InputFormat {
    /// A JSON array of messages, or an object with a `messages` array.
    Json,
    /// One JSON message per line; blank lines are skipped.
    Jsonl,
    /// Semicolon- or comma-delimited table with a header row.
    Csv,
}

impl InputFormat {
    /// Detects the input format from a file extension.
    pub fn from_path(path: &str) -> Result<Self, ThreadlineError> {
        let ext = extension_of(path);

        match ext.as_str() {
            "json" => Ok(InputFormat::Json),
            "jsonl" | "ndjson" => Ok(InputFormat::Jsonl),
            "csv" => Ok(InputFormat::Csv),
            _ => Err(ThreadlineError::invalid_format(
                "input",
                format!(
                    "Unknown file extension: '.{}'. Expected one of: json, jsonl, ndjson, csv",
                    ext
                ),
            )),
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Json => write!(f, "JSON"),
            InputFormat::Jsonl => write!(f, "JSONL"),
            InputFormat::Csv => write!(f, "CSV"),
        }
    }
}

fn feature_missing(format: OutputFormat) -> ThreadlineError {
    ThreadlineError::invalid_format(
        "output",
        format!(
            "Output format {} requires the 'csv-output' feature to be enabled",
            format
        ),
    )
}

/// Writes rows to a file in the specified format.
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The file cannot be written
pub fn write_to_format<R: Serialize>(
    rows: &[R],
    path: &str,
    format: OutputFormat,
) -> Result<(), ThreadlineError> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(rows, path),
        OutputFormat::Json => crate::core::output::write_json(rows, path),
        OutputFormat::Jsonl => crate::core::output::write_jsonl(rows, path),
        #[allow(unreachable_patterns)]
        _ => Err(feature_missing(format)),
    }
}

/// Converts rows to a string in the specified format.
pub fn to_format_string<R: Serialize>(
    rows: &[R],
    format: OutputFormat,
) -> Result<String, ThreadlineError> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(rows),
        OutputFormat::Json => crate::core::output::to_json(rows),
        OutputFormat::Jsonl => crate::core::output::to_jsonl(rows),
        #[allow(unreachable_patterns)]
        _ => Err(feature_missing(format)),
    }
}
