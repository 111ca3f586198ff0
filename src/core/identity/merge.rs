//! Merge rules and canonical identity rewriting.
//!
//! A [`MergeRule`] says "treat `source` and `target` as one person, shown as
//! `result`". An [`IdentityResolver`] holds an ordered list of rules and
//! rewrites message identities accordingly.
//!
//! # Mapping semantics
//!
//! Rules are folded into a single `phone -> canonical identity` map, in
//! registration order. For each rule the source, target and result phones are
//! inserted **only if the phone has no entry yet**. A later rule can therefore
//! never re-map a phone an earlier rule already claimed, and chains
//! (A into B, then B into C) do not resolve transitively.
//!
//! ```
//! use threadline::core::identity::IdentityResolver;
//! use threadline::ContactIdentity;
//!
//! # fn main() -> threadline::Result<()> {
//! let a = ContactIdentity::new("A", "+1001");
//! let b = ContactIdentity::new("B", "+1002");
//! let c = ContactIdentity::new("C", "+1003");
//! let r1 = ContactIdentity::new("R1", "+1002");
//! let r2 = ContactIdentity::new("R2", "+1003");
//!
//! let mut resolver = IdentityResolver::new();
//! resolver.add_merge_rule(a, b.clone(), r1.clone())?;
//! resolver.add_merge_rule(b.clone(), c, r2)?;
//!
//! assert_eq!(resolver.resolve(&b), r1);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThreadlineError};
use crate::message::{ContactIdentity, Message};

/// A directive unifying two identities into a result identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRule {
    /// First identity to merge.
    pub source: ContactIdentity,
    /// Second identity to merge.
    pub target: ContactIdentity,
    /// Identity both are rewritten to.
    pub result: ContactIdentity,
}

impl MergeRule {
    /// Creates a validated merge rule.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadlineError::InvalidMergeRule`] if any phone number or
    /// the result name is blank.
    pub fn new(
        source: ContactIdentity,
        target: ContactIdentity,
        result: ContactIdentity,
    ) -> Result<Self> {
        let rule = Self {
            source,
            target,
            result,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Checks that every required field is present.
    pub fn validate(&self) -> Result<()> {
        if !self.source.has_phone() {
            return Err(ThreadlineError::invalid_merge_rule(
                "source phone",
                "must not be empty",
            ));
        }
        if !self.target.has_phone() {
            return Err(ThreadlineError::invalid_merge_rule(
                "target phone",
                "must not be empty",
            ));
        }
        if !self.result.has_phone() {
            return Err(ThreadlineError::invalid_merge_rule(
                "result phone",
                "must not be empty",
            ));
        }
        if self.result.name.trim().is_empty() {
            return Err(ThreadlineError::invalid_merge_rule(
                "result name",
                "must not be empty",
            ));
        }
        Ok(())
    }

    fn phones(&self) -> [&str; 3] {
        [&self.source.phone, &self.target.phone, &self.result.phone]
    }
}

/// Applies an ordered set of merge rules to messages.
///
/// The resolver owns its rules; there is no shared registry. Construct one
/// per run from configuration or by calling
/// [`add_merge_rule`](Self::add_merge_rule).
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    rules: Vec<MergeRule>,
}

impl IdentityResolver {
    /// Creates a resolver without rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver from an ordered list of rules.
    ///
    /// The rules are trusted as given; rules with blank phones simply map
    /// nothing for that phone.
    pub fn from_rules(rules: Vec<MergeRule>) -> Self {
        Self { rules }
    }

    /// Validates and registers a rule after all previously registered ones.
    pub fn add_merge_rule(
        &mut self,
        source: ContactIdentity,
        target: ContactIdentity,
        result: ContactIdentity,
    ) -> Result<()> {
        let rule = MergeRule::new(source, target, result)?;
        self.rules.push(rule);
        Ok(())
    }

    /// Registered rules in registration order.
    pub fn rules(&self) -> &[MergeRule] {
        &self.rules
    }

    /// Returns `true` if no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Builds the `phone -> canonical identity` map, first write wins.
    pub fn canonical_map(&self) -> HashMap<String, ContactIdentity> {
        let mut map: HashMap<String, ContactIdentity> = HashMap::new();

        for rule in &self.rules {
            for phone in rule.phones() {
                if phone.trim().is_empty() {
                    log::warn!("merge rule for '{}' has a blank phone, skipping it", rule.result);
                    continue;
                }
                map.entry(phone.to_string())
                    .or_insert_with(|| rule.result.clone());
            }
        }

        log::debug!(
            "{} merge rules map {} phone numbers",
            self.rules.len(),
            map.len()
        );
        map
    }

    /// Returns the canonical form of a single identity.
    pub fn resolve(&self, identity: &ContactIdentity) -> ContactIdentity {
        self.canonical_map()
            .get(&identity.phone)
            .cloned()
            .unwrap_or_else(|| identity.clone())
    }

    /// Returns a canonicalized copy of `messages`, leaving the input untouched.
    pub fn apply_merges(&self, messages: &[Message]) -> Vec<Message> {
        let mut resolved = messages.to_vec();
        self.apply_merges_in_place(&mut resolved);
        resolved
    }

    /// Rewrites `from` and `to` of every message in place.
    ///
    /// Returns the number of identity fields that changed.
    pub fn apply_merges_in_place(&self, messages: &mut [Message]) -> usize {
        if self.rules.is_empty() {
            return 0;
        }

        let map = self.canonical_map();
        let mut rewritten = 0;

        for msg in messages.iter_mut() {
            for identity in [&mut msg.from, &mut msg.to] {
                if let Some(canonical) = map.get(&identity.phone) {
                    if *identity != *canonical {
                        identity.clone_from(canonical);
                        rewritten += 1;
                    }
                }
            }
        }

        log::debug!("rewrote {} identity fields", rewritten);
        rewritten
    }
}

/// Loads merge rules from a JSON array file, validating each one.
pub fn load_rules(path: impl AsRef<Path>) -> Result<Vec<MergeRule>> {
    let content = fs::read_to_string(path)?;
    let rules: Vec<MergeRule> = serde_json::from_str(&content)?;
    for rule in &rules {
        rule.validate()?;
    }
    Ok(rules)
}

/// Saves merge rules as a pretty-printed JSON array.
pub fn save_rules(path: impl AsRef<Path>, rules: &[MergeRule]) -> Result<()> {
    let json = serde_json::to_string_pretty(rules)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Direction;
    use chrono::{TimeZone, Utc};
    use tempfile::NamedTempFile;

    fn id(name: &str, phone: &str) -> ContactIdentity {
        ContactIdentity::new(name, phone)
    }

    fn msg(direction: Direction, from: ContactIdentity, to: ContactIdentity) -> Message {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        Message::new(ts, direction, from, to, "body")
    }

    #[test]
    fn test_rule_validation() {
        assert!(MergeRule::new(id("A", "+1"), id("B", "+2"), id("R", "+2")).is_ok());

        let err = MergeRule::new(id("A", ""), id("B", "+2"), id("R", "+2")).unwrap_err();
        assert!(matches!(
            err,
            ThreadlineError::InvalidMergeRule {
                field: "source phone",
                ..
            }
        ));

        assert!(MergeRule::new(id("A", "+1"), id("B", " "), id("R", "+2")).is_err());
        assert!(MergeRule::new(id("A", "+1"), id("B", "+2"), id("R", "")).is_err());
        assert!(MergeRule::new(id("A", "+1"), id("B", "+2"), id("", "+2")).is_err());
    }

    #[test]
    fn test_first_write_wins() {
        let mut resolver = IdentityResolver::new();
        resolver
            .add_merge_rule(id("A", "+1"), id("B", "+2"), id("R1", "+10"))
            .unwrap();
        resolver
            .add_merge_rule(id("B", "+2"), id("C", "+3"), id("R2", "+20"))
            .unwrap();

        let map = resolver.canonical_map();
        assert_eq!(map["+1"], id("R1", "+10"));
        assert_eq!(map["+2"], id("R1", "+10"));
        assert_eq!(map["+3"], id("R2", "+20"));
        assert_eq!(map["+10"], id("R1", "+10"));
        assert_eq!(map["+20"], id("R2", "+20"));
    }

    #[test]
    fn test_apply_rewrites_both_fields() {
        let mut resolver = IdentityResolver::new();
        resolver
            .add_merge_rule(id("Mike", "555"), id("Michael", "+1555"), id("Michael", "+1555"))
            .unwrap();

        let me = id("Me", "+1000");
        let mut messages = vec![
            msg(Direction::Received, id("Mike", "555"), me.clone()),
            msg(Direction::Sent, me.clone(), id("Mike", "555")),
            msg(Direction::Sent, me.clone(), id("Other", "+1999")),
        ];

        let rewritten = resolver.apply_merges_in_place(&mut messages);
        assert_eq!(rewritten, 2);
        assert_eq!(messages[0].from, id("Michael", "+1555"));
        assert_eq!(messages[0].to, me);
        assert_eq!(messages[1].to, id("Michael", "+1555"));
        assert_eq!(messages[2].to, id("Other", "+1999"));
    }

    #[test]
    fn test_apply_merges_does_not_mutate_input() {
        let resolver = IdentityResolver::from_rules(vec![
            MergeRule::new(id("A", "+1"), id("B", "+2"), id("B", "+2")).unwrap(),
        ]);
        let messages = vec![msg(Direction::Received, id("A", "+1"), id("Me", "+0"))];

        let resolved = resolver.apply_merges(&messages);
        assert_eq!(messages[0].from, id("A", "+1"));
        assert_eq!(resolved[0].from, id("B", "+2"));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let resolver = IdentityResolver::from_rules(vec![
            MergeRule::new(id("A", "+1"), id("B", "+2"), id("B", "+2")).unwrap(),
        ]);
        let mut messages = vec![msg(Direction::Received, id("A", "+1"), id("Me", "+0"))];

        assert_eq!(resolver.apply_merges_in_place(&mut messages), 1);
        let once = messages.clone();
        assert_eq!(resolver.apply_merges_in_place(&mut messages), 0);
        assert_eq!(messages, once);
    }

    #[test]
    fn test_blank_phones_are_inert() {
        let resolver = IdentityResolver::from_rules(vec![MergeRule {
            source: id("A", ""),
            target: id("B", ""),
            result: id("R", ""),
        }]);
        assert!(resolver.canonical_map().is_empty());

        let mut messages = vec![msg(Direction::Received, id("A", ""), id("Me", "+0"))];
        assert_eq!(resolver.apply_merges_in_place(&mut messages), 0);
    }

    #[test]
    fn test_no_rules_is_passthrough() {
        let resolver = IdentityResolver::new();
        let messages = vec![msg(Direction::Received, id("A", "+1"), id("Me", "+0"))];
        assert_eq!(resolver.apply_merges(&messages), messages);
        assert_eq!(resolver.resolve(&id("A", "+1")), id("A", "+1"));
    }

    #[test]
    fn test_rules_file_roundtrip() {
        let rules = vec![MergeRule::new(id("A", "+1"), id("B", "+2"), id("B", "+2")).unwrap()];
        let file = NamedTempFile::new().unwrap();

        save_rules(file.path(), &rules).unwrap();
        let loaded = load_rules(file.path()).unwrap();
        assert_eq!(loaded, rules);
    }

    #[test]
    fn test_load_rules_rejects_invalid() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"[{"source":{"name":"A","phone":"+1"},"target":{"name":"B","phone":"+2"},"result":{"name":"","phone":"+2"}}]"#,
        )
        .unwrap();
        assert!(load_rules(file.path()).unwrap_err().is_config());
    }
}
