//! Serializable report rows.
//!
//! Analytics types hold `chrono::Duration` values and borrowed messages; the
//! rows here flatten them into plain fields for the JSON, JSONL and CSV
//! writers. Durations are expressed in seconds.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::core::identity::{DuplicateCandidate, SearchHit};
use crate::core::response::ResponseTimeStats;
use crate::core::threads::{ConversationThread, ThreadStatistics};
use crate::message::{ContactIdentity, Direction, Message};

fn secs(d: Duration) -> f64 {
    d.num_milliseconds() as f64 / 1000.0
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// One message with identities flattened into columns.
///
/// This is also the record layout accepted by the CSV loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRow {
    /// RFC 3339 timestamp (the loader also accepts Unix seconds).
    pub timestamp: String,
    pub direction: Direction,
    #[serde(default)]
    pub from_name: String,
    pub from_phone: String,
    #[serde(default)]
    pub to_name: String,
    pub to_phone: String,
    #[serde(default)]
    pub body: String,
}

impl From<&Message> for MessageRow {
    fn from(msg: &Message) -> Self {
        Self {
            timestamp: rfc3339(msg.timestamp),
            direction: msg.direction,
            from_name: msg.from.name.clone(),
            from_phone: msg.from.phone.clone(),
            to_name: msg.to.name.clone(),
            to_phone: msg.to.phone.clone(),
            body: msg.body.clone(),
        }
    }
}

impl MessageRow {
    /// Converts back into a [`Message`] once the timestamp is parsed.
    pub(crate) fn into_message(self, timestamp: DateTime<Utc>) -> Message {
        Message::new(
            timestamp,
            self.direction,
            ContactIdentity::new(self.from_name, self.from_phone),
            ContactIdentity::new(self.to_name, self.to_phone),
            self.body,
        )
    }
}

/// One conversation thread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadRow {
    pub contact_name: String,
    pub contact_phone: String,
    pub start: String,
    pub end: String,
    pub messages: usize,
    pub sent: usize,
    pub received: usize,
    pub duration_secs: f64,
    pub average_gap_secs: f64,
}

impl From<&ConversationThread<'_>> for ThreadRow {
    fn from(thread: &ConversationThread<'_>) -> Self {
        Self {
            contact_name: thread.contact.name.clone(),
            contact_phone: thread.contact.phone.clone(),
            start: rfc3339(thread.start),
            end: rfc3339(thread.end),
            messages: thread.message_count(),
            sent: thread.sent_count(),
            received: thread.received_count(),
            duration_secs: secs(thread.duration()),
            average_gap_secs: secs(thread.average_response_time()),
        }
    }
}

/// Thread statistics as a single JSON document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadStatsReport {
    pub total_threads: usize,
    pub average_messages_per_thread: f64,
    pub min_messages: usize,
    pub max_messages: usize,
    pub average_duration_secs: f64,
    pub total_messages: usize,
    pub threads_per_contact: BTreeMap<String, usize>,
}

impl From<&ThreadStatistics> for ThreadStatsReport {
    fn from(stats: &ThreadStatistics) -> Self {
        Self {
            total_threads: stats.total_threads,
            average_messages_per_thread: stats.average_messages_per_thread,
            min_messages: stats.min_messages,
            max_messages: stats.max_messages,
            average_duration_secs: secs(stats.average_duration),
            total_messages: stats.total_messages,
            threads_per_contact: stats.threads_per_contact.clone(),
        }
    }
}

/// Per-contact thread count, the tabular form of thread statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactThreadCountRow {
    pub contact: String,
    pub threads: usize,
}

impl ContactThreadCountRow {
    /// One row per contact, in key order.
    pub fn from_stats(stats: &ThreadStatistics) -> Vec<Self> {
        stats
            .threads_per_contact
            .iter()
            .map(|(contact, threads)| Self {
                contact: contact.clone(),
                threads: *threads,
            })
            .collect()
    }
}

/// Response-time summary for one contact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseTimeRow {
    pub contact_name: String,
    pub contact_phone: String,
    pub total_exchanges: usize,
    pub our_count: usize,
    pub our_average_secs: f64,
    pub our_median_secs: f64,
    pub our_fastest_secs: f64,
    pub their_count: usize,
    pub their_average_secs: f64,
    pub their_median_secs: f64,
    pub their_fastest_secs: f64,
}

impl From<&ResponseTimeStats> for ResponseTimeRow {
    fn from(stats: &ResponseTimeStats) -> Self {
        Self {
            contact_name: stats.contact.name.clone(),
            contact_phone: stats.contact.phone.clone(),
            total_exchanges: stats.total_exchanges,
            our_count: stats.ours.count,
            our_average_secs: secs(stats.ours.average),
            our_median_secs: secs(stats.ours.median),
            our_fastest_secs: secs(stats.ours.fastest),
            their_count: stats.theirs.count,
            their_average_secs: secs(stats.theirs.average),
            their_median_secs: secs(stats.theirs.median),
            their_fastest_secs: secs(stats.theirs.fastest),
        }
    }
}

/// A candidate duplicate pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRow {
    pub first_name: String,
    pub first_phone: String,
    pub second_name: String,
    pub second_phone: String,
    pub reason: String,
}

impl From<&DuplicateCandidate> for DuplicateRow {
    fn from(candidate: &DuplicateCandidate) -> Self {
        Self {
            first_name: candidate.first.name.clone(),
            first_phone: candidate.first.phone.clone(),
            second_name: candidate.second.name.clone(),
            second_phone: candidate.second.phone.clone(),
            reason: candidate.reason.to_string(),
        }
    }
}

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHitRow {
    pub phone: String,
    pub name: String,
    pub message_count: usize,
    pub score: u32,
}

impl From<&SearchHit> for SearchHitRow {
    fn from(hit: &SearchHit) -> Self {
        Self {
            phone: hit.phone.clone(),
            name: hit.name.clone(),
            message_count: hit.message_count,
            score: hit.score,
        }
    }
}
