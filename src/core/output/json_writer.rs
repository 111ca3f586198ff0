//! JSON output writer.

use std::fs::File;
use std::io::Write;

use serde::Serialize;

use crate::error::Result;

/// Writes rows to a JSON file as a pretty-printed array.
///
/// # Format
/// ```json
/// [
///   {"phone": "+15551234567", "name": "Alex", "message_count": 12, "score": 1000}
/// ]
/// ```
pub fn write_json<R: Serialize>(rows: &[R], output_path: &str) -> Result<()> {
    let json = to_json(rows)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts rows to a JSON array string.
///
/// Same format as [`write_json`], but returns a String instead of writing to file.
pub fn to_json<R: Serialize>(rows: &[R]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}
