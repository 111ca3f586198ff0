//! JSON Lines (JSONL) output writer.
//!
//! One compact JSON object per line. Suits line-oriented tools
//! (`grep`, `jq -c`) and appending to existing datasets.

use std::fs::File;
use std::io::{BufWriter, Write};

use serde::Serialize;

use crate::error::Result;

/// Writes rows to a JSONL file.
///
/// # Format
/// ```text
/// {"contact_name":"Alex","contact_phone":"+1555","messages":3,...}
/// {"contact_name":"Sam","contact_phone":"+1666","messages":2,...}
/// ```
pub fn write_jsonl<R: Serialize>(rows: &[R], output_path: &str) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);

    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

/// Converts rows to a JSONL string.
///
/// Every line, including the last, ends with `\n`.
pub fn to_jsonl<R: Serialize>(rows: &[R]) -> Result<String> {
    let mut output = String::new();
    for row in rows {
        output.push_str(&serde_json::to_string(row)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::SearchHitRow;
    use tempfile::NamedTempFile;

    fn hit(name: &str, score: u32) -> SearchHitRow {
        SearchHitRow {
            phone: "+1555".into(),
            name: name.into(),
            message_count: 1,
            score,
        }
    }

    #[test]
    fn test_write_jsonl_one_object_per_line() {
        let rows = vec![hit("Alex", 1000), hit("Alexis", 500)];

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();
        write_jsonl(&rows, path).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        for line in &lines {
            let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(parsed.get("score").is_some());
        }
    }

    #[test]
    fn test_to_jsonl_matches_file_output() {
        let rows = vec![hit("Alex", 1000)];

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();
        write_jsonl(&rows, path).unwrap();

        let from_file = std::fs::read_to_string(path).unwrap();
        assert_eq!(to_jsonl(&rows).unwrap(), from_file);
    }

    #[test]
    fn test_to_jsonl_empty() {
        let empty: Vec<SearchHitRow> = Vec::new();
        assert!(to_jsonl(&empty).unwrap().is_empty());
    }
}
