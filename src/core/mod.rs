//! Core analytics for threadline.
//!
//! This module contains:
//! - [`identity`] - Merge rules, duplicate detection and contact search
//! - [`threads`] - Conversation thread segmentation and statistics
//! - [`response`] - Per-contact response-time analysis
//! - [`filter`] - Message filtering by date and contact
//! - [`processor`] - The [`Analysis`] pipeline tying the steps together
//! - [`models`] - Serializable report rows
//! - [`output`] - Format writers (CSV, JSON, JSONL)
//!
//! # Quick Start
//!
//! ```rust
//! use threadline::core::{
//!     Analysis, FilterConfig, IdentityResolver, ThreadSegmenter,
//!     analyze_response_times, apply_filters, find_duplicates, search_contacts,
//!     to_json, write_jsonl,
//! };
//! ```

pub mod filter;
pub mod identity;
pub mod models;
pub mod output;
pub mod processor;
pub mod response;
pub mod threads;

// Re-export main types for convenience
pub use filter::{FilterConfig, apply_filters};
pub use identity::{
    ContactSummary, DuplicateCandidate, DuplicateReason, IdentityResolver, MergeRule, SearchHit,
    contact_directory, find_duplicates, search_contacts,
};
pub use processor::{Analysis, ProcessingStats};
pub use response::{LatencySummary, ResponseTimeAnalyzer, ResponseTimeStats, analyze_response_times};
pub use threads::{ConversationThread, ThreadSegmenter, ThreadStatistics, segment_threads};

#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
