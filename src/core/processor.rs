//! The analysis pipeline.
//!
//! [`Analysis`] runs identity resolution once, applies filters, and then
//! serves every analytic over the same canonical message list.
//!
//! ```text
//! raw messages ──► merge rules ──► filters ──► threads / responses / duplicates / search
//! ```
//!
//! # Example
//!
//! ```rust
//! use threadline::config::AnalysisConfig;
//! use threadline::core::processor::Analysis;
//! use threadline::{ContactIdentity, Message};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let me = ContactIdentity::new("Me", "+1000");
//! let alex = ContactIdentity::new("Alex", "+1555");
//! let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
//!
//! let messages = vec![
//!     Message::received(t0, alex.clone(), me.clone(), "hi"),
//!     Message::sent(t0 + Duration::seconds(300), me, alex, "hey"),
//! ];
//!
//! let analysis = Analysis::new(messages, &AnalysisConfig::new().with_own_phone("+1000"));
//! assert_eq!(analysis.threads().len(), 1);
//! assert_eq!(analysis.stats().contacts_after, 1);
//! ```

use std::collections::BTreeMap;

use crate::config::{AnalysisConfig, ThreadConfig};
use crate::core::filter::{FilterConfig, apply_filters};
use crate::core::identity::{
    DuplicateCandidate, IdentityResolver, SearchHit, contact_directory, find_duplicates,
    search_contacts,
};
use crate::core::response::{ResponseTimeStats, analyze_response_times};
use crate::core::threads::{ConversationThread, ThreadStatistics, segment_threads};
use crate::message::Message;

/// Statistics about the resolution and filtering steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessingStats {
    /// Messages before filtering.
    pub original_count: usize,
    /// Messages left after filtering.
    pub analyzed_count: usize,
    /// Distinct contact phones before merge rules.
    pub contacts_before: usize,
    /// Distinct contact phones after merge rules.
    pub contacts_after: usize,
}

impl ProcessingStats {
    /// Percentage of contacts folded away by merge rules.
    pub fn reduction_ratio(&self) -> f64 {
        if self.contacts_before == 0 {
            return 0.0;
        }
        (1.0 - (self.contacts_after as f64 / self.contacts_before as f64)) * 100.0
    }

    /// Messages dropped by filters.
    pub fn filtered_out(&self) -> usize {
        self.original_count - self.analyzed_count
    }
}

/// Canonical, filtered messages plus the settings every analytic needs.
#[derive(Debug, Clone)]
pub struct Analysis {
    messages: Vec<Message>,
    own_phone: String,
    thread_config: ThreadConfig,
    stats: ProcessingStats,
}

impl Analysis {
    /// Resolves identities with the configured merge rules. No filtering.
    pub fn new(messages: Vec<Message>, config: &AnalysisConfig) -> Self {
        Self::with_filters(messages, config, &FilterConfig::default())
    }

    /// Resolves identities, then keeps only messages passing `filter`.
    pub fn with_filters(
        messages: Vec<Message>,
        config: &AnalysisConfig,
        filter: &FilterConfig,
    ) -> Self {
        let resolver = IdentityResolver::from_rules(config.merge_rules.clone());
        let original_count = messages.len();
        let contacts_before = contact_directory(&messages, &config.own_phone).len();

        let canonical = if resolver.is_empty() {
            messages
        } else {
            resolver.apply_merges(&messages)
        };
        let contacts_after = contact_directory(&canonical, &config.own_phone).len();
        let messages = apply_filters(canonical, filter);

        let stats = ProcessingStats {
            original_count,
            analyzed_count: messages.len(),
            contacts_before,
            contacts_after,
        };
        log::debug!(
            "analysis ready: {} messages, contacts {} -> {}",
            stats.analyzed_count,
            contacts_before,
            contacts_after
        );

        Self {
            messages,
            own_phone: config.own_phone.clone(),
            thread_config: config.threads.clone(),
            stats,
        }
    }

    /// Canonical messages in input order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Message and contact counts from preparation.
    pub fn stats(&self) -> ProcessingStats {
        self.stats
    }

    /// Threads over the canonical messages, in order of start.
    pub fn threads(&self) -> Vec<ConversationThread<'_>> {
        segment_threads(&self.messages, &self.thread_config)
    }

    /// Aggregate statistics over [`threads`](Self::threads).
    pub fn thread_statistics(&self) -> ThreadStatistics {
        ThreadStatistics::from_threads(&self.threads())
    }

    /// Response-time stats keyed by contact key.
    pub fn response_times(&self) -> BTreeMap<String, ResponseTimeStats> {
        analyze_response_times(&self.messages, &self.own_phone)
    }

    /// Contacts that still look like the same person after merging.
    pub fn duplicates(&self) -> Vec<DuplicateCandidate> {
        find_duplicates(&self.messages, &self.own_phone)
    }

    /// Ranks contacts against `query`.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        search_contacts(&self.messages, &self.own_phone, query)
    }
}
