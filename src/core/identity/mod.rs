//! Contact identity resolution.
//!
//! This module canonicalizes who a message is with, before any thread or
//! response-time analysis runs:
//!
//! - [`merge`] - [`MergeRule`] and [`IdentityResolver`], which rewrite message
//!   identities to a canonical `name|phone`
//! - [`duplicates`] - [`find_duplicates`], advisory detection of contacts that
//!   look like the same person
//! - [`search`] - [`search_contacts`] and [`contact_directory`]
//!
//! # Example
//!
//! ```rust
//! use threadline::core::identity::IdentityResolver;
//! use threadline::{ContactIdentity, Message};
//! use chrono::Utc;
//!
//! # fn main() -> threadline::Result<()> {
//! let me = ContactIdentity::new("Me", "+15550000000");
//! let mike = ContactIdentity::new("Mike", "5551234567");
//! let michael = ContactIdentity::new("Michael Smith", "+15551234567");
//!
//! let mut resolver = IdentityResolver::new();
//! resolver.add_merge_rule(mike.clone(), michael.clone(), michael.clone())?;
//!
//! let messages = vec![Message::received(Utc::now(), mike, me, "hi")];
//! let canonical = resolver.apply_merges(&messages);
//! assert_eq!(canonical[0].from, michael);
//! # Ok(())
//! # }
//! ```

pub mod duplicates;
pub mod merge;
pub mod search;

pub use duplicates::{DuplicateCandidate, DuplicateReason, find_duplicates};
pub use merge::{IdentityResolver, MergeRule, load_rules, save_rules};
pub use search::{ContactSummary, SearchHit, contact_directory, search_contacts};
