//! Conversation thread segmentation.
//!
//! Messages are sorted by time and cut into threads: a contiguous run of
//! messages with one contact, where no gap exceeds the configured timeout.
//!
//! # Segmentation rules
//!
//! - Each message is keyed by its non-local party (`to` for sent messages,
//!   `from` for received ones).
//! - A new thread starts when the key changes **or** the gap to the previous
//!   message is strictly greater than the timeout. A gap exactly equal to the
//!   timeout stays in the same thread.
//! - Threads with fewer than `min_thread_length` messages are discarded.
//!
//! # Example
//!
//! ```
//! use threadline::core::threads::{ThreadSegmenter, ThreadStatistics};
//! use threadline::config::ThreadConfig;
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
//! let threads = ThreadSegmenter::new(ThreadConfig::default()).segment(&messages);
//! assert_eq!(threads.len(), 1);
//! assert_eq!(threads[0].message_count(), 3);
//! assert_eq!(threads[0].average_response_time(), Duration::seconds(450));
//!
//! let stats = ThreadStatistics::from_threads(&threads);
//! assert_eq!(stats.total_messages, 3);
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::config::ThreadConfig;
use crate::message::{ContactIdentity, Message, sorted_by_time};

/// A contiguous, time-bounded run of messages with one contact.
///
/// Threads borrow their messages from the input slice.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationThread<'a> {
    /// Contact key (`name|phone`) of the other party.
    pub contact_key: String,
    /// The other party.
    pub contact: ContactIdentity,
    /// Timestamp of the first message.
    pub start: DateTime<Utc>,
    /// Timestamp of the last message.
    pub end: DateTime<Utc>,
    /// Messages in ascending time order.
    pub messages: Vec<&'a Message>,
}

impl<'a> ConversationThread<'a> {
    fn open(msg: &'a Message) -> Self {
        let contact = msg.counterpart().clone();
        Self {
            contact_key: contact.key(),
            contact,
            start: msg.timestamp,
            end: msg.timestamp,
            messages: vec![msg],
        }
    }

    fn push(&mut self, msg: &'a Message) {
        self.end = msg.timestamp;
        self.messages.push(msg);
    }

    /// Number of messages in the thread.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Time between the first and the last message.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Messages the local user sent in this thread.
    pub fn sent_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_sent()).count()
    }

    /// Messages the local user received in this thread.
    pub fn received_count(&self) -> usize {
        self.message_count() - self.sent_count()
    }

    /// Mean gap between consecutive messages, or zero with fewer than two.
    pub fn average_response_time(&self) -> Duration {
        let gaps = self.message_count().saturating_sub(1);
        if gaps == 0 {
            return Duration::zero();
        }
        let total_ms: i64 = self
            .messages
            .windows(2)
            .map(|pair| (pair[1].timestamp - pair[0].timestamp).num_milliseconds())
            .sum();
        Duration::milliseconds(total_ms / gaps as i64)
    }
}

/// Splits a message stream into conversation threads.
#[derive(Debug, Clone, Default)]
pub struct ThreadSegmenter {
    config: ThreadConfig,
}

impl ThreadSegmenter {
    /// Creates a segmenter with the given configuration.
    pub fn new(config: ThreadConfig) -> Self {
        Self { config }
    }

    /// Segments `messages` into threads, in order of thread start.
    ///
    /// The input does not need to be sorted.
    pub fn segment<'a>(&self, messages: &'a [Message]) -> Vec<ConversationThread<'a>> {
        let mut threads = Vec::new();
        let mut discarded = 0usize;
        let mut current: Option<ConversationThread<'a>> = None;

        for msg in sorted_by_time(messages) {
            let breaks = match &current {
                None => true,
                Some(thread) => {
                    msg.contact_key() != thread.contact_key
                        || msg.timestamp - thread.end > self.config.timeout
                }
            };

            if breaks {
                if let Some(done) = current.take() {
                    self.close(done, &mut threads, &mut discarded);
                }
                current = Some(ConversationThread::open(msg));
            } else if let Some(thread) = current.as_mut() {
                thread.push(msg);
            }
        }

        if let Some(done) = current.take() {
            self.close(done, &mut threads, &mut discarded);
        }

        log::debug!(
            "segmented {} messages into {} threads ({} below minimum length)",
            messages.len(),
            threads.len(),
            discarded
        );
        threads
    }

    fn close<'a>(
        &self,
        thread: ConversationThread<'a>,
        threads: &mut Vec<ConversationThread<'a>>,
        discarded: &mut usize,
    ) {
        if thread.message_count() >= self.config.min_thread_length {
            threads.push(thread);
        } else {
            *discarded += 1;
        }
    }
}

/// Segments `messages` with the given configuration.
///
/// Shorthand for `ThreadSegmenter::new(config.clone()).segment(messages)`.
pub fn segment_threads<'a>(
    messages: &'a [Message],
    config: &ThreadConfig,
) -> Vec<ConversationThread<'a>> {
    ThreadSegmenter::new(config.clone()).segment(messages)
}

/// Aggregate statistics over emitted threads.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreadStatistics {
    /// Number of threads.
    pub total_threads: usize,
    /// Mean messages per thread.
    pub average_messages_per_thread: f64,
    /// Smallest thread.
    pub min_messages: usize,
    /// Largest thread.
    pub max_messages: usize,
    /// Mean of `end - start` over all threads.
    pub average_duration: Duration,
    /// Messages across all threads.
    pub total_messages: usize,
    /// Thread count per contact key.
    pub threads_per_contact: BTreeMap<String, usize>,
}

impl Default for ThreadStatistics {
    fn default() -> Self {
        Self {
            total_threads: 0,
            average_messages_per_thread: 0.0,
            min_messages: 0,
            max_messages: 0,
            average_duration: Duration::zero(),
            total_messages: 0,
            threads_per_contact: BTreeMap::new(),
        }
    }
}

impl ThreadStatistics {
    /// Computes statistics; an empty slice yields all zeros.
    pub fn from_threads(threads: &[ConversationThread<'_>]) -> Self {
        if threads.is_empty() {
            return Self::default();
        }

        let counts = threads.iter().map(ConversationThread::message_count);
        let total_messages: usize = counts.clone().sum();

        // Seconds keep the sum far from overflow on multi-year spans.
        let total_secs: f64 = threads
            .iter()
            .map(|t| t.duration().num_seconds() as f64)
            .sum();
        let average_secs = total_secs / threads.len() as f64;

        let mut threads_per_contact = BTreeMap::new();
        for thread in threads {
            *threads_per_contact
                .entry(thread.contact_key.clone())
                .or_insert(0) += 1;
        }

        Self {
            total_threads: threads.len(),
            average_messages_per_thread: total_messages as f64 / threads.len() as f64,
            min_messages: counts.clone().min().unwrap_or(0),
            max_messages: counts.max().unwrap_or(0),
            average_duration: Duration::seconds(average_secs.round() as i64),
            total_messages,
            threads_per_contact,
        }
    }
}
