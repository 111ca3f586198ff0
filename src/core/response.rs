//! Per-contact response-time analysis.
//!
//! A response is a message whose direction differs from the previous message
//! exchanged with the same contact. The gap between the two is attributed to
//! whoever wrote the later message:
//!
//! - a **received** message after a sent one is *their* response time;
//! - a **sent** message after a received one is *our* response time.
//!
//! Two consecutive messages in the same direction never count as a response.
//!
//! # Example
//!
//! ```
//! use threadline::core::response::ResponseTimeAnalyzer;
//! use threadline::{ContactIdentity, Message};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let me = ContactIdentity::new("Me", "+1000");
//! let alex = ContactIdentity::new("Alex", "+1555");
//! let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
//!
//! let messages = vec![
//!     Message::received(t0, alex.clone(), me.clone(), "hi"),
//!     Message::sent(t0 + Duration::seconds(300), me.clone(), alex.clone(), "hey"),
//!     Message::received(t0 + Duration::seconds(900), alex.clone(), me.clone(), "you there?"),
//! ];
//!
//! let stats = ResponseTimeAnalyzer::new("+1000").analyze(&messages);
//! let alex_stats = &stats["Alex|+1555"];
//! assert_eq!(alex_stats.our_response_times, [Duration::seconds(300)]);
//! assert_eq!(alex_stats.their_response_times, [Duration::seconds(600)]);
//! assert_eq!(alex_stats.total_exchanges, 2);
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::Duration;

use crate::message::{ContactIdentity, Direction, Message, sorted_by_time};

/// Average, median and fastest of one latency list.
///
/// All values are zero when the list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencySummary {
    /// Number of samples.
    pub count: usize,
    /// Arithmetic mean.
    pub average: Duration,
    /// Middle value, or the mean of the two middle values for even counts.
    pub median: Duration,
    /// Smallest value.
    pub fastest: Duration,
}

impl Default for LatencySummary {
    fn default() -> Self {
        Self {
            count: 0,
            average: Duration::zero(),
            median: Duration::zero(),
            fastest: Duration::zero(),
        }
    }
}

impl LatencySummary {
    /// Summarizes a list of latencies.
    ///
    /// ```
    /// use threadline::core::response::LatencySummary;
    /// use chrono::Duration;
    ///
    /// let samples: Vec<Duration> = [10, 20, 30, 40].map(Duration::seconds).to_vec();
    /// let summary = LatencySummary::from_samples(&samples);
    /// assert_eq!(summary.median, Duration::seconds(25));
    /// assert_eq!(summary.fastest, Duration::seconds(10));
    /// ```
    pub fn from_samples(samples: &[Duration]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort();

        let n = sorted.len();
        let total_ms: i64 = sorted.iter().map(Duration::num_milliseconds).sum();
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            let low = sorted[n / 2 - 1].num_milliseconds();
            let high = sorted[n / 2].num_milliseconds();
            Duration::milliseconds((low + high) / 2)
        };

        Self {
            count: n,
            average: Duration::milliseconds(total_ms / n as i64),
            median,
            fastest: sorted[0],
        }
    }

    /// Returns `true` if there were no samples.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Reply latencies for one contact, in both directions.
///
/// The raw lists are filled during the scan; the summaries are filled by
/// [`calculate`](Self::calculate) once the scan is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTimeStats {
    /// The other party.
    pub contact: ContactIdentity,
    /// How long the local user took to reply to this contact.
    pub our_response_times: Vec<Duration>,
    /// How long this contact took to reply to the local user.
    pub their_response_times: Vec<Duration>,
    /// Summary of `our_response_times`.
    pub ours: LatencySummary,
    /// Summary of `their_response_times`.
    pub theirs: LatencySummary,
    /// `our_response_times.len() + their_response_times.len()`.
    pub total_exchanges: usize,
}

impl ResponseTimeStats {
    /// Creates empty stats for a contact.
    pub fn new(contact: ContactIdentity) -> Self {
        Self {
            contact,
            our_response_times: Vec::new(),
            their_response_times: Vec::new(),
            ours: LatencySummary::default(),
            theirs: LatencySummary::default(),
            total_exchanges: 0,
        }
    }

    /// Records a reply gap attributed by the direction of the replying message.
    pub fn record(&mut self, reply_direction: Direction, gap: Duration) {
        match reply_direction {
            Direction::Received => self.their_response_times.push(gap),
            Direction::Sent => self.our_response_times.push(gap),
        }
    }

    /// Computes the derived summaries from the raw lists.
    pub fn calculate(&mut self) {
        self.ours = LatencySummary::from_samples(&self.our_response_times);
        self.theirs = LatencySummary::from_samples(&self.their_response_times);
        self.total_exchanges = self.our_response_times.len() + self.their_response_times.len();
    }
}

/// Computes response-time statistics per contact.
#[derive(Debug, Clone)]
pub struct ResponseTimeAnalyzer {
    own_phone: String,
}

impl ResponseTimeAnalyzer {
    /// Creates an analyzer for the local user's phone number.
    pub fn new(own_phone: impl Into<String>) -> Self {
        Self {
            own_phone: own_phone.into(),
        }
    }

    /// Scans `messages` and returns stats keyed by contact key.
    ///
    /// The input does not need to be sorted. Messages whose other party is
    /// the local user are skipped.
    pub fn analyze(&self, messages: &[Message]) -> BTreeMap<String, ResponseTimeStats> {
        let mut stats: BTreeMap<String, ResponseTimeStats> = BTreeMap::new();
        let mut last_by_contact: HashMap<String, &Message> = HashMap::new();
        let mut skipped = 0usize;

        for msg in sorted_by_time(messages) {
            let counterpart = msg.counterpart();
            if !self.own_phone.is_empty() && counterpart.phone == self.own_phone {
                skipped += 1;
                continue;
            }

            let key = counterpart.key();
            let entry = stats
                .entry(key.clone())
                .or_insert_with(|| ResponseTimeStats::new(counterpart.clone()));

            if let Some(previous) = last_by_contact.get(&key) {
                if previous.direction == msg.direction.opposite() {
                    entry.record(msg.direction, msg.timestamp - previous.timestamp);
                }
            }

            last_by_contact.insert(key, msg);
        }

        for entry in stats.values_mut() {
            entry.calculate();
        }

        log::debug!(
            "response times for {} contacts ({} self-addressed messages skipped)",
            stats.len(),
            skipped
        );
        stats
    }
}

/// Shorthand for `ResponseTimeAnalyzer::new(own_phone).analyze(messages)`.
pub fn analyze_response_times(
    messages: &[Message],
    own_phone: &str,
) -> BTreeMap<String, ResponseTimeStats> {
    ResponseTimeAnalyzer::new(own_phone).analyze(messages)
}
