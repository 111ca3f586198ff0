//! # Threadline
//!
//! A Rust library for turning raw SMS/chat histories into conversation
//! analytics: who you talked to, in how many conversations, and how fast
//! each side replied.
//!
//! ## Overview
//!
//! Analysis runs in three stages over a flat list of [`Message`]s:
//!
//! 1. **Identity resolution** - merge rules fold several `name|phone`
//!    identities into one canonical contact; duplicate detection and fuzzy
//!    search help find the rules worth writing.
//! 2. **Thread segmentation** - messages with one contact are split into
//!    threads wherever the silence exceeds a timeout.
//! 3. **Response times** - every change of direction within a contact's
//!    history is a reply, attributed to whoever wrote it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use threadline::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let messages = load_messages("sms.jsonl")?;
//!
//!     let config = AnalysisConfig::new()
//!         .with_own_phone("+15550000000")
//!         .with_threads(ThreadConfig::new().with_timeout_str("45m")?);
//!
//!     let analysis = Analysis::new(messages, &config);
//!
//!     let rows: Vec<ThreadRow> = analysis.threads().iter().map(ThreadRow::from).collect();
//!     write_json(&rows, "threads.json")?;
//!
//!     for (contact, stats) in analysis.response_times() {
//!         println!("{}: we reply in {}s", contact, stats.ours.median.num_seconds());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`message`] - [`Message`], [`Direction`], [`ContactIdentity`]
//! - [`config`] - [`ThreadConfig`](config::ThreadConfig), [`AnalysisConfig`](config::AnalysisConfig), timeout strings
//! - [`loader`] - reading JSON, JSONL and CSV message files
//! - [`core`] - analytics
//!   - [`core::identity`] - merge rules, duplicates, contact search
//!   - [`core::threads`] - thread segmentation and statistics
//!   - [`core::response`] - response-time analysis
//!   - [`core::filter`] - date and contact filters
//!   - [`core::processor`] - the [`Analysis`](core::Analysis) pipeline
//!   - [`core::models`] / [`core::output`] - report rows and writers
//! - [`format`] - [`OutputFormat`](format::OutputFormat) dispatch
//! - `cli` - CLI argument types (requires the `cli` feature)
//! - [`error`] - [`ThreadlineError`], [`Result`]
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod loader;
pub mod message;

// Re-export the main types at the crate root for convenience
pub use error::{Result, ThreadlineError};
pub use message::{ContactIdentity, Direction, Message};

/// Convenient re-exports for common usage.
///
/// Import everything you need with a single line:
///
/// ```rust
/// use threadline::prelude::*;
/// ```
pub mod prelude {
    // Message types
    pub use crate::{ContactIdentity, Direction, Message};

    // Error types
    pub use crate::error::{Result, ThreadlineError};

    // Configuration
    pub use crate::config::{AnalysisConfig, ThreadConfig, parse_timeout};

    // Loading
    pub use crate::loader::{load_messages, load_messages_from_str};

    // Identity resolution
    pub use crate::core::identity::{
        DuplicateCandidate, DuplicateReason, IdentityResolver, MergeRule, SearchHit,
        contact_directory, find_duplicates, load_rules, save_rules, search_contacts,
    };

    // Threads and response times
    pub use crate::core::response::{ResponseTimeStats, analyze_response_times};
    pub use crate::core::threads::{ConversationThread, ThreadStatistics, segment_threads};

    // Filtering and the pipeline
    pub use crate::core::filter::{FilterConfig, apply_filters};
    pub use crate::core::processor::{Analysis, ProcessingStats};

    // Report rows
    pub use crate::core::models::{
        DuplicateRow, MessageRow, ResponseTimeRow, SearchHitRow, ThreadRow, ThreadStatsReport,
    };

    // Output (file writers and string converters)
    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};
    pub use crate::format::{InputFormat, OutputFormat, write_to_format};
}
