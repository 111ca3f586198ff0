//! CSV output writer.

use std::fs::File;
use std::io;

use serde::Serialize;

use crate::error::{Result, ThreadlineError};

/// Writes rows to CSV with semicolon delimiter.
///
/// # Format
/// - Delimiter: `;`
/// - Header: the row type's field names, written with the first row
/// - Encoding: UTF-8
///
/// Row types must be flat (no nested maps or sequences).
pub fn write_csv<R: Serialize>(rows: &[R], output_path: &str) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Converts rows to a CSV string.
///
/// Same format as [`write_csv`].
pub fn to_csv<R: Serialize>(rows: &[R]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    for row in rows {
        writer.serialize(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ThreadlineError::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| ThreadlineError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
