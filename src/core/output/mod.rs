//! Report writers.
//!
//! Every writer is generic over [`serde::Serialize`] rows, so the same
//! functions emit threads, response-time tables, duplicate candidates,
//! search hits and (merged) message lists:
//!
//! - [`write_json`] / [`to_json`] - pretty-printed JSON array
//! - [`write_jsonl`] / [`to_jsonl`] - JSON Lines, one row per line
//! - [`write_csv`] / [`to_csv`] - CSV with semicolon delimiter - requires `csv-output` feature
//!
//! # Example
//!
//! ```rust
//! # fn main() -> threadline::Result<()> {
//! use threadline::core::models::SearchHitRow;
//! use threadline::core::output::{to_json, to_jsonl};
//!
//! let rows = vec![SearchHitRow {
//!     phone: "+15551234567".into(),
//!     name: "Alex".into(),
//!     message_count: 12,
//!     score: 1000,
//! }];
//!
//! let json = to_json(&rows)?;
//! assert!(json.contains("\"score\": 1000"));
//!
//! let jsonl = to_jsonl(&rows)?;
//! assert_eq!(jsonl.lines().count(), 1);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
mod json_writer;
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
pub use json_writer::{to_json, write_json};
pub use jsonl_writer::{to_jsonl, write_jsonl};
