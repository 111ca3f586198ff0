//! Contact directory and fuzzy contact search.

use std::collections::HashMap;

use crate::message::{ContactIdentity, Message, digits_of};

use super::duplicates::distinct_contacts;

/// Score for a name equal to the query.
pub const SCORE_EXACT: u32 = 1000;
/// Score for a name starting with the query.
pub const SCORE_PREFIX: u32 = 500;
/// Score for a name containing the query.
pub const SCORE_CONTAINS: u32 = 250;
/// Score per query word that prefixes a name word.
pub const SCORE_PER_WORD: u32 = 100;
/// Score for a phone number containing the query digits.
pub const SCORE_PHONE: u32 = 150;

/// A known contact and how many messages involve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSummary {
    /// Contact identity (first name seen for the phone).
    pub identity: ContactIdentity,
    /// Messages sent to or received from this phone.
    pub message_count: usize,
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Contact phone number.
    pub phone: String,
    /// Contact display name.
    pub name: String,
    /// Messages involving this contact.
    pub message_count: usize,
    /// Relevance score, higher is better.
    pub score: u32,
}

/// Lists distinct contacts by phone (excluding the local user), in
/// first-seen order, with message counts.
pub fn contact_directory(messages: &[Message], own_phone: &str) -> Vec<ContactSummary> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for msg in messages {
        let counterpart = msg.counterpart();
        if counterpart.phone != own_phone {
            *counts.entry(counterpart.phone.as_str()).or_default() += 1;
        }
    }

    distinct_contacts(messages, own_phone)
        .into_iter()
        .map(|identity| ContactSummary {
            identity: identity.clone(),
            message_count: counts.get(identity.phone.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

/// Scores a display name against a lower-cased, trimmed query.
fn name_score(name: &str, query: &str) -> u32 {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return 0;
    }

    if name == query {
        SCORE_EXACT
    } else if name.starts_with(query) {
        SCORE_PREFIX
    } else if name.contains(query) {
        SCORE_CONTAINS
    } else {
        let name_words: Vec<&str> = name.split_whitespace().collect();
        let matched = query
            .split_whitespace()
            .filter(|word| name_words.iter().any(|nw| nw.starts_with(word)))
            .count();
        matched as u32 * SCORE_PER_WORD
    }
}

/// Scores a phone number by partial digit containment.
fn phone_score(identity: &ContactIdentity, query_digits: &str) -> u32 {
    if !query_digits.is_empty() && identity.phone_digits().contains(query_digits) {
        SCORE_PHONE
    } else {
        0
    }
}

/// Ranks contacts against a free-text query.
///
/// The name and phone scores are combined by taking the larger one. Results
/// are sorted by score, then by message count, both descending; contacts
/// scoring zero are left out. A blank query matches nothing.
///
/// # Example
///
/// ```
/// use threadline::core::identity::search_contacts;
/// use threadline::{ContactIdentity, Message};
/// use chrono::Utc;
///
/// let me = ContactIdentity::new("Me", "+1000");
/// let now = Utc::now();
/// let messages = vec![
///     Message::received(now, ContactIdentity::new("Michael Smith", "+1555"), me.clone(), "hi"),
///     Message::received(now, ContactIdentity::new("Not Michael At All", "+1666"), me.clone(), "yo"),
/// ];
///
/// let hits = search_contacts(&messages, "+1000", "michael");
/// assert_eq!(hits[0].name, "Michael Smith");
/// assert_eq!(hits[0].score, 500);
/// assert_eq!(hits[1].score, 250);
/// ```
pub fn search_contacts(messages: &[Message], own_phone: &str, query: &str) -> Vec<SearchHit> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    let query_digits = digits_of(&query);

    let mut hits: Vec<SearchHit> = contact_directory(messages, own_phone)
        .into_iter()
        .filter_map(|contact| {
            let score = name_score(&contact.identity.name, &query)
                .max(phone_score(&contact.identity, &query_digits));
            (score > 0).then(|| SearchHit {
                phone: contact.identity.phone,
                name: contact.identity.name,
                message_count: contact.message_count,
                score,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.message_count.cmp(&a.message_count))
    });

    log::debug!("search '{}' matched {} contacts", query, hits.len());
    hits
}
