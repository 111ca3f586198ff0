//! Filter messages by date range and contact.
//!
//! This module provides [`FilterConfig`] for defining filter criteria and
//! [`apply_filters`] for filtering message collections. Filters run after
//! identity resolution, so contact matching sees canonical identities.
//!
//! # Filter Types
//!
//! | Filter | Method | Description |
//! |--------|--------|-------------|
//! | Date from | [`with_date_from`](FilterConfig::with_date_from) | Messages on or after date |
//! | Date to | [`with_date_to`](FilterConfig::with_date_to) | Messages on or before date |
//! | Contact | [`with_contact`](FilterConfig::with_contact) | Messages with one contact |
//!
//! # Examples
//!
//! ```
//! use threadline::core::filter::{FilterConfig, apply_filters};
//! use threadline::{ContactIdentity, Message};
//! use chrono::{TimeZone, Utc};
//!
//! # fn main() -> threadline::Result<()> {
//! let me = ContactIdentity::new("Me", "+1000");
//! let alex = ContactIdentity::new("Alex", "+1555");
//! let sam = ContactIdentity::new("Sam", "+1666");
//! let jan = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
//! let jun = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
//!
//! let messages = vec![
//!     Message::received(jan, alex.clone(), me.clone(), "old"),
//!     Message::received(jun, alex.clone(), me.clone(), "new"),
//!     Message::received(jun, sam, me.clone(), "other"),
//! ];
//!
//! let config = FilterConfig::new()
//!     .with_date_from("2024-06-01")?
//!     .with_contact("alex");
//!
//! let filtered = apply_filters(messages, &config);
//! assert_eq!(filtered.len(), 1);
//! assert_eq!(filtered[0].body, "new");
//! # Ok(())
//! # }
//! ```
//!
//! # Behavior Notes
//!
//! - Date bounds are inclusive and whole-day (UTC)
//! - Contact matching checks the non-local party: case-insensitive name or
//!   exact phone number
//! - Multiple filters are combined with AND logic

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::Message;
use crate::error::ThreadlineError;

/// Configuration for filtering messages by date and contact.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    /// Include only messages on or after this timestamp.
    pub after: Option<DateTime<Utc>>,

    /// Include only messages on or before this timestamp.
    pub before: Option<DateTime<Utc>>,

    /// Include only messages with this contact (name or phone).
    pub contact: Option<String>,
}

impl FilterConfig {
    /// Creates a new empty filter configuration.
    ///
    /// No filters are active by default; all messages pass through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadlineError::InvalidDate`] if the format is invalid.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self, ThreadlineError> {
        self.after = Some(parse_date_at(date_str, NaiveTime::MIN)?);
        Ok(self)
    }

    /// Sets the end date filter (inclusive). Date format: `YYYY-MM-DD`.
    ///
    /// The bound is the last second of that day.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self, ThreadlineError> {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)
            .ok_or_else(|| ThreadlineError::invalid_date(date_str))?;
        self.before = Some(parse_date_at(date_str, end_of_day)?);
        Ok(self)
    }

    /// Sets the contact filter.
    #[must_use]
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    /// Sets the start timestamp directly.
    #[must_use]
    pub fn with_after(mut self, dt: DateTime<Utc>) -> Self {
        self.after = Some(dt);
        self
    }

    /// Sets the end timestamp directly.
    #[must_use]
    pub fn with_before(mut self, dt: DateTime<Utc>) -> Self {
        self.before = Some(dt);
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        self.after.is_some() || self.before.is_some() || self.contact.is_some()
    }

    /// Returns `true` if `msg` passes every active filter.
    pub fn matches(&self, msg: &Message) -> bool {
        if let Some(contact) = &self.contact {
            let other = msg.counterpart();
            if !other.name.eq_ignore_ascii_case(contact) && other.phone != *contact {
                return false;
            }
        }

        if self.after.is_some_and(|after| msg.timestamp < after) {
            return false;
        }
        if self.before.is_some_and(|before| msg.timestamp > before) {
            return false;
        }

        true
    }
}

fn parse_date_at(date_str: &str, time: NaiveTime) -> Result<DateTime<Utc>, ThreadlineError> {
    let naive = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| ThreadlineError::invalid_date(date_str))?;
    Ok(naive.and_time(time).and_utc())
}

/// Filters a collection of messages based on the provided configuration.
///
/// If no filters are active, returns the original messages unchanged.
pub fn apply_filters(messages: Vec<Message>, config: &FilterConfig) -> Vec<Message> {
    if !config.is_active() {
        return messages;
    }

    let before = messages.len();
    let filtered: Vec<Message> = messages
        .into_iter()
        .filter(|msg| config.matches(msg))
        .collect();

    log::debug!("filters kept {} of {} messages", filtered.len(), before);
    filtered
}
