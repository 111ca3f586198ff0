//! Candidate duplicate contact detection.
//!
//! Every distinct contact (by phone number, excluding the local user) is
//! compared against every other one. The checks below run in order and the
//! first one that matches decides the reported [`DuplicateReason`]:
//!
//! | Order | Check | Reason |
//! |-------|-------|--------|
//! | 1 | names equal, ignoring case | "same name, different numbers" |
//! | 2 | one name contains the other | "similar names" |
//! | 3 | nickname table, or first name is a prefix (≥3 chars) of the other | "possible nickname match" |
//! | 4 | last 10 digits equal, full numbers differ | "same number, different country code prefix" |
//!
//! Detection is advisory and never modifies messages.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::message::{ContactIdentity, Message};

/// Number of trailing digits compared by the country-code check.
const SUBSCRIBER_DIGITS: usize = 10;

/// Minimum length of a first name accepted as a prefix of another.
const MIN_PREFIX_LEN: usize = 3;

/// Nicknames and the full-name stems they abbreviate.
const NICKNAMES: &[(&str, &[&str])] = &[
    ("abby", &["abigail"]),
    ("alex", &["alexander", "alexandra", "alexis"]),
    ("andy", &["andrew"]),
    ("ben", &["benjamin"]),
    ("beth", &["elizabeth", "bethany"]),
    ("betty", &["elizabeth"]),
    ("bill", &["william"]),
    ("billy", &["william"]),
    ("bob", &["robert"]),
    ("bobby", &["robert"]),
    ("cathy", &["catherine", "cathleen"]),
    ("charlie", &["charles", "charlotte"]),
    ("chris", &["christopher", "christine", "christina", "christian"]),
    ("chuck", &["charles"]),
    ("dan", &["daniel"]),
    ("danny", &["daniel"]),
    ("dave", &["david"]),
    ("drew", &["andrew"]),
    ("ed", &["edward", "edwin"]),
    ("eddie", &["edward"]),
    ("greg", &["gregory"]),
    ("hank", &["henry"]),
    ("jack", &["john", "jackson"]),
    ("jake", &["jacob"]),
    ("jen", &["jennifer"]),
    ("jenny", &["jennifer"]),
    ("jim", &["james"]),
    ("jimmy", &["james"]),
    ("joe", &["joseph"]),
    ("johnny", &["john", "jonathan"]),
    ("jon", &["jonathan"]),
    ("josh", &["joshua"]),
    ("kate", &["katherine", "catherine", "kathleen"]),
    ("katie", &["katherine", "catherine", "kathleen"]),
    ("larry", &["lawrence"]),
    ("liz", &["elizabeth"]),
    ("maggie", &["margaret"]),
    ("matt", &["matthew"]),
    ("meg", &["margaret", "megan"]),
    ("mike", &["michael"]),
    ("nate", &["nathan", "nathaniel"]),
    ("nick", &["nicholas"]),
    ("pat", &["patrick", "patricia"]),
    ("peggy", &["margaret"]),
    ("rich", &["richard"]),
    ("rick", &["richard"]),
    ("rob", &["robert"]),
    ("sam", &["samuel", "samantha"]),
    ("steve", &["steven", "stephen"]),
    ("sue", &["susan"]),
    ("tim", &["timothy"]),
    ("tom", &["thomas"]),
    ("tony", &["anthony"]),
    ("will", &["william"]),
    ("zach", &["zachary"]),
];

/// Why two contacts look like the same person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateReason {
    /// Identical names (ignoring case) on different numbers.
    SameName,
    /// One name contains the other.
    SimilarNames,
    /// Nickname/full-name pair, or a shared first-name prefix.
    NicknameMatch,
    /// Same subscriber number with a different country code prefix.
    CountryCodePrefix,
}

impl DuplicateReason {
    /// Human-readable explanation.
    pub fn as_str(self) -> &'static str {
        match self {
            DuplicateReason::SameName => "same name, different numbers",
            DuplicateReason::SimilarNames => "similar names",
            DuplicateReason::NicknameMatch => "possible nickname match",
            DuplicateReason::CountryCodePrefix => "same number, different country code prefix",
        }
    }
}

impl fmt::Display for DuplicateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pair of contacts that may be the same person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCandidate {
    /// Contact seen first in the message list.
    pub first: ContactIdentity,
    /// Contact seen later.
    pub second: ContactIdentity,
    /// First matching check.
    pub reason: DuplicateReason,
}

/// Normalized view of a contact used by the checks.
struct Candidate<'a> {
    identity: &'a ContactIdentity,
    name: String,
    digits: String,
}

impl<'a> Candidate<'a> {
    fn new(identity: &'a ContactIdentity) -> Self {
        Self {
            identity,
            name: identity.name.trim().to_lowercase(),
            digits: identity.phone_digits(),
        }
    }

    fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }

    fn has_name(&self) -> bool {
        !self.name.is_empty()
    }
}

type Check = fn(&Candidate<'_>, &Candidate<'_>) -> bool;

/// Checks in priority order. The first match wins.
const CHECKS: &[(Check, DuplicateReason)] = &[
    (same_name, DuplicateReason::SameName),
    (similar_names, DuplicateReason::SimilarNames),
    (nickname_match, DuplicateReason::NicknameMatch),
    (country_code_prefix, DuplicateReason::CountryCodePrefix),
];

fn same_name(a: &Candidate<'_>, b: &Candidate<'_>) -> bool {
    a.has_name() && a.name == b.name
}

fn similar_names(a: &Candidate<'_>, b: &Candidate<'_>) -> bool {
    a.has_name() && b.has_name() && (a.name.contains(&b.name) || b.name.contains(&a.name))
}

fn nickname_match(a: &Candidate<'_>, b: &Candidate<'_>) -> bool {
    let (x, y) = (a.first_name(), b.first_name());
    if x.is_empty() || y.is_empty() {
        return false;
    }
    is_nickname_of(x, y) || is_nickname_of(y, x) || is_short_prefix(x, y) || is_short_prefix(y, x)
}

fn country_code_prefix(a: &Candidate<'_>, b: &Candidate<'_>) -> bool {
    if a.digits.len() < SUBSCRIBER_DIGITS || b.digits.len() < SUBSCRIBER_DIGITS {
        return false;
    }
    let tail_a = &a.digits[a.digits.len() - SUBSCRIBER_DIGITS..];
    let tail_b = &b.digits[b.digits.len() - SUBSCRIBER_DIGITS..];
    tail_a == tail_b && a.identity.phone != b.identity.phone
}

fn is_nickname_of(nick: &str, full: &str) -> bool {
    NICKNAMES
        .iter()
        .find(|(n, _)| *n == nick)
        .is_some_and(|(_, stems)| stems.iter().any(|stem| full.starts_with(stem)))
}

fn is_short_prefix(short: &str, long: &str) -> bool {
    short.chars().count() >= MIN_PREFIX_LEN && short != long && long.starts_with(short)
}

/// Returns the first matching reason for a pair, if any.
fn classify(a: &Candidate<'_>, b: &Candidate<'_>) -> Option<DuplicateReason> {
    CHECKS
        .iter()
        .find(|(check, _)| check(a, b))
        .map(|(_, reason)| *reason)
}

/// Collects distinct contacts by phone, in first-seen order, skipping the
/// local user. The first name seen for a phone is kept.
pub(crate) fn distinct_contacts<'a>(
    messages: &'a [Message],
    own_phone: &str,
) -> Vec<&'a ContactIdentity> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut contacts = Vec::new();

    for msg in messages {
        for identity in [&msg.from, &msg.to] {
            if identity.phone == own_phone || !identity.has_phone() {
                continue;
            }
            if seen.insert(identity.phone.as_str()) {
                contacts.push(identity);
            }
        }
    }

    contacts
}

/// Finds pairs of contacts that probably belong to the same person.
///
/// # Example
///
/// ```
/// use threadline::core::identity::{DuplicateReason, find_duplicates};
/// use threadline::{ContactIdentity, Message};
/// use chrono::Utc;
///
/// let me = ContactIdentity::new("Me", "+15550000000");
/// let now = Utc::now();
/// let messages = vec![
///     Message::received(now, ContactIdentity::new("Dana", "+15551112222"), me.clone(), "hi"),
///     Message::received(now, ContactIdentity::new("dana", "+15553334444"), me.clone(), "hey"),
/// ];
///
/// let found = find_duplicates(&messages, "+15550000000");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].reason, DuplicateReason::SameName);
/// ```
pub fn find_duplicates(messages: &[Message], own_phone: &str) -> Vec<DuplicateCandidate> {
    let contacts: Vec<Candidate<'_>> = distinct_contacts(messages, own_phone)
        .into_iter()
        .map(Candidate::new)
        .collect();

    let mut found = Vec::new();
    for (i, a) in contacts.iter().enumerate() {
        for b in &contacts[i + 1..] {
            if let Some(reason) = classify(a, b) {
                found.push(DuplicateCandidate {
                    first: a.identity.clone(),
                    second: b.identity.clone(),
                    reason,
                });
            }
        }
    }

    log::debug!(
        "compared {} contacts, {} candidate duplicates",
        contacts.len(),
        found.len()
    );
    found
}
