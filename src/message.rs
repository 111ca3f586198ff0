//! Normalized message and contact identity types.
//!
//! This module provides [`Message`], the in-memory representation every
//! analytics stage works on, together with [`ContactIdentity`] and
//! [`Direction`].
//!
//! # Overview
//!
//! A message consists of:
//! - **When**: `timestamp` (UTC)
//! - **Which way**: `direction` ([`Direction::Sent`] or [`Direction::Received`])
//! - **Who**: `from` and `to` identities, one of which is the local user
//! - **What**: `body` (may be empty)
//!
//! # Examples
//!
//! ```
//! use threadline::{ContactIdentity, Direction, Message};
//! use chrono::{TimeZone, Utc};
//!
//! let me = ContactIdentity::new("Me", "+15550000000");
//! let alex = ContactIdentity::new("Alex", "+15551234567");
//! let ts = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
//!
//! let msg = Message::received(ts, alex.clone(), me, "hi");
//! assert_eq!(msg.direction, Direction::Received);
//! assert_eq!(msg.counterpart(), &alex);
//! assert_eq!(msg.contact_key(), "Alex|+15551234567");
//! ```
//!
//! ## Serialization
//!
//! ```
//! use threadline::Message;
//!
//! let json = r#"{
//!     "timestamp": "2024-03-01T09:00:00Z",
//!     "direction": "sent",
//!     "from": {"name": "Me", "phone": "+15550000000"},
//!     "to": {"name": "Alex", "phone": "+15551234567"},
//!     "body": "hey"
//! }"#;
//! let msg: Message = serde_json::from_str(json)?;
//! assert_eq!(msg.contact_key(), "Alex|+15551234567");
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ThreadlineError;

/// Separator between name and phone in a contact key.
pub const KEY_SEPARATOR: char = '|';

/// Which side of the conversation produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Written by the local user.
    Sent,
    /// Written by the other party.
    Received,
}

impl Direction {
    /// Returns the other direction.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Sent => Direction::Received,
            Direction::Received => Direction::Sent,
        }
    }

    /// Lower-case name, as used in files.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Sent => "sent",
            Direction::Received => "received",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sent" | "out" | "outgoing" => Ok(Direction::Sent),
            "received" | "in" | "incoming" => Ok(Direction::Received),
            other => Err(format!(
                "Unknown direction: '{}'. Expected 'sent' or 'received'",
                other
            )),
        }
    }
}

/// A `(name, phone)` pair identifying one correspondent.
///
/// Two identities are grouped by their [contact key](Self::key),
/// `name|phone`. Equality is byte-exact on both fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContactIdentity {
    /// Display name (may be empty when only the number is known).
    #[serde(default)]
    pub name: String,

    /// Phone number as stored by the importer.
    pub phone: String,
}

impl ContactIdentity {
    /// Creates a new identity.
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }

    /// Returns the grouping key `name|phone`.
    ///
    /// ```
    /// use threadline::ContactIdentity;
    ///
    /// let id = ContactIdentity::new("Alex", "+1555");
    /// assert_eq!(id.key(), "Alex|+1555");
    /// ```
    pub fn key(&self) -> String {
        format!("{}{}{}", self.name, KEY_SEPARATOR, self.phone)
    }

    /// Returns `true` if the phone number is not blank.
    pub fn has_phone(&self) -> bool {
        !self.phone.trim().is_empty()
    }

    /// Returns only the ASCII digits of the phone number.
    pub fn phone_digits(&self) -> String {
        digits_of(&self.phone)
    }
}

impl fmt::Display for ContactIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, KEY_SEPARATOR, self.phone)
    }
}

/// Parses `name|phone`. The split happens at the last `|`, so names may
/// contain the separator but phone numbers may not.
impl FromStr for ContactIdentity {
    type Err = ThreadlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, phone) = s
            .rsplit_once(KEY_SEPARATOR)
            .ok_or_else(|| ThreadlineError::invalid_identity(s))?;

        if phone.trim().is_empty() {
            return Err(ThreadlineError::invalid_identity(s));
        }

        Ok(Self::new(name.trim(), phone.trim()))
    }
}

/// Extracts ASCII digits from arbitrary text.
pub(crate) fn digits_of(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// One inbound or outbound message.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `timestamp` | `DateTime<Utc>` | When the message was sent or received |
/// | `direction` | [`Direction`] | Which side wrote it |
/// | `from` | [`ContactIdentity`] | Author |
/// | `to` | [`ContactIdentity`] | Recipient |
/// | `body` | `String` | Text content, possibly empty |
///
/// Only `from` and `to` are ever rewritten after import, by the identity
/// resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// When the message was sent or received.
    pub timestamp: DateTime<Utc>,

    /// Which side wrote the message.
    pub direction: Direction,

    /// Author identity.
    pub from: ContactIdentity,

    /// Recipient identity.
    pub to: ContactIdentity,

    /// Text content.
    #[serde(default)]
    pub body: String,
}

impl Message {
    /// Creates a message with every field specified.
    pub fn new(
        timestamp: DateTime<Utc>,
        direction: Direction,
        from: ContactIdentity,
        to: ContactIdentity,
        body: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            direction,
            from,
            to,
            body: body.into(),
        }
    }

    /// Creates a message the local user sent to `contact`.
    pub fn sent(
        timestamp: DateTime<Utc>,
        me: ContactIdentity,
        contact: ContactIdentity,
        body: impl Into<String>,
    ) -> Self {
        Self::new(timestamp, Direction::Sent, me, contact, body)
    }

    /// Creates a message the local user received from `contact`.
    pub fn received(
        timestamp: DateTime<Utc>,
        contact: ContactIdentity,
        me: ContactIdentity,
        body: impl Into<String>,
    ) -> Self {
        Self::new(timestamp, Direction::Received, contact, me, body)
    }

    /// Returns the non-local party: `to` for sent messages, `from` otherwise.
    pub fn counterpart(&self) -> &ContactIdentity {
        match self.direction {
            Direction::Sent => &self.to,
            Direction::Received => &self.from,
        }
    }

    /// Returns the contact key of the non-local party.
    pub fn contact_key(&self) -> String {
        self.counterpart().key()
    }

    /// Returns `true` if the local user wrote this message.
    pub fn is_sent(&self) -> bool {
        self.direction == Direction::Sent
    }

    /// Returns `true` if the body is empty or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// Sorts references to messages ascending by timestamp.
///
/// The sort is stable, so messages sharing a timestamp keep input order.
pub(crate) fn sorted_by_time(messages: &[Message]) -> Vec<&Message> {
    let mut sorted: Vec<&Message> = messages.iter().collect();
    sorted.sort_by_key(|m| m.timestamp);
    sorted
}
