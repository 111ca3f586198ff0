//! Loading message histories from disk.
//!
//! Three layouts are understood, chosen by file extension:
//!
//! | Extension | Layout |
//! |-----------|--------|
//! | `.json` | array of messages, or `{"messages": [...]}` |
//! | `.jsonl`, `.ndjson` | one message object per line |
//! | `.csv` | header `timestamp,direction,from_name,from_phone,to_name,to_phone,body` |
//!
//! JSON messages use the [`Message`] serde layout. CSV timestamps may be
//! RFC 3339 (with or without fractional seconds) or Unix seconds, and either
//! `,` or `;` may separate fields, so files written by the `merge` command
//! load back unchanged in every format.
//!
//! # Example
//!
//! ```rust
//! use threadline::format::InputFormat;
//! use threadline::loader::load_messages_from_str;
//!
//! # fn main() -> threadline::Result<()> {
//! let jsonl = r#"
//! {"timestamp":"2024-03-01T09:00:00Z","direction":"received","from":{"name":"Alex","phone":"+1555"},"to":{"name":"Me","phone":"+1000"},"body":"hi"}
//!
//! {"timestamp":"2024-03-01T09:05:00Z","direction":"sent","from":{"name":"Me","phone":"+1000"},"to":{"name":"Alex","phone":"+1555"},"body":"hey"}
//! "#;
//!
//! let messages = load_messages_from_str(jsonl, InputFormat::Jsonl)?;
//! assert_eq!(messages.len(), 2);
//! assert!(messages[1].is_sent());
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::Path;

#[cfg(feature = "csv-output")]
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{Result, ThreadlineError};
use crate::format::InputFormat;
use crate::message::Message;

/// Reads a message file, picking the layout from its extension.
///
/// # Errors
///
/// - [`ThreadlineError::InvalidFormat`] for an unknown extension
/// - [`ThreadlineError::Io`] if the file cannot be read
/// - [`ThreadlineError::Load`] if a record is malformed
pub fn load_messages(path: impl AsRef<Path>) -> Result<Vec<Message>> {
    let path = path.as_ref();
    let format = InputFormat::from_path(&path.to_string_lossy())?;
    let content = fs::read_to_string(path)?;

    let messages = load_messages_from_str(&content, format).map_err(|e| match e {
        ThreadlineError::Load { message, .. } => {
            ThreadlineError::load(Some(path.to_path_buf()), message)
        }
        other => other,
    })?;

    log::debug!(
        "loaded {} messages from {} ({})",
        messages.len(),
        path.display(),
        format
    );
    Ok(messages)
}

/// Parses messages from an in-memory string.
pub fn load_messages_from_str(content: &str, format: InputFormat) -> Result<Vec<Message>> {
    match format {
        InputFormat::Json => parse_json(content),
        InputFormat::Jsonl => parse_jsonl(content),
        #[cfg(feature = "csv-output")]
        InputFormat::Csv => parse_csv(content),
        #[allow(unreachable_patterns)]
        _ => Err(ThreadlineError::invalid_format(
            "input",
            format!("{} input requires the 'csv-output' feature to be enabled", format),
        )),
    }
}

fn parse_json(content: &str) -> Result<Vec<Message>> {
    let root: Value = serde_json::from_str(content)?;

    let records = match root {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("messages") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(ThreadlineError::load(
                    None,
                    "expected a top-level array or an object with a \"messages\" array",
                ));
            }
        },
        _ => {
            return Err(ThreadlineError::load(
                None,
                "expected a top-level array or an object with a \"messages\" array",
            ));
        }
    };

    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            serde_json::from_value(record)
                .map_err(|e| ThreadlineError::load(None, format!("message {}: {}", idx + 1, e)))
        })
        .collect()
}

fn parse_jsonl(content: &str) -> Result<Vec<Message>> {
    let mut messages = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let msg: Message = serde_json::from_str(line)
            .map_err(|e| ThreadlineError::load(None, format!("line {}: {}", idx + 1, e)))?;
        messages.push(msg);
    }

    Ok(messages)
}

/// Parses an RFC 3339 timestamp or integer Unix seconds.
#[cfg(feature = "csv-output")]
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

#[cfg(feature = "csv-output")]
fn parse_csv(content: &str) -> Result<Vec<Message>> {
    use crate::core::models::MessageRow;

    let header = content.lines().next().unwrap_or("");
    let delimiter = if header.contains(';') { b';' } else { b',' };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    let mut messages = Vec::new();
    for (idx, record) in reader.deserialize::<MessageRow>().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let row = record.map_err(|e| ThreadlineError::load(None, format!("row {}: {}", line, e)))?;

        let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| {
            ThreadlineError::load(
                None,
                format!("row {}: invalid timestamp '{}'", line, row.timestamp),
            )
        })?;
        messages.push(row.into_message(timestamp));
    }

    Ok(messages)
}
