//! Author roster for the index report.
//!
//! # Responsibility
//! - Merge every cited author by name and resolve one email per name.
//! - Order entries by surname sort key.
//!
//! # Invariants
//! - One entry per distinct `Author::full_name`.
//! - A name never maps to two different non-empty emails.

use crate::index::IndexError;
use crate::model::author::Author;
use crate::model::rep::Rep;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// One roster line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub author: Author,
    /// Resolved email; empty when no citation of this name had one.
    pub email: String,
}

/// An author cited with more than one email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConflict {
    pub name: String,
    pub emails: Vec<String>,
}

impl Display for EmailConflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.emails.join(", "))
    }
}

/// Deduplicated authors across a proposal set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Builds the roster from every author of every proposal.
    ///
    /// # Errors
    /// - `IndexError::AmbiguousAuthorEmail` listing every author with more
    ///   than one distinct non-empty email, sorted by name.
    pub fn build(reps: &[Rep]) -> Result<Self, IndexError> {
        let mut slots: HashMap<&str, usize> = HashMap::new();
        let mut collected: Vec<(&Author, Vec<&str>)> = Vec::new();

        for author in reps.iter().flat_map(|rep| rep.authors.iter()) {
            let slot = *slots.entry(author.full_name.as_str()).or_insert_with(|| {
                collected.push((author, Vec::new()));
                collected.len() - 1
            });
            let emails = &mut collected[slot].1;
            if !author.email.is_empty() && !emails.contains(&author.email.as_str()) {
                emails.push(author.email.as_str());
            }
        }

        let mut conflicts: Vec<EmailConflict> = collected
            .iter()
            .filter(|(_, emails)| emails.len() > 1)
            .map(|(author, emails)| EmailConflict {
                name: author.full_name.clone(),
                emails: emails.iter().map(|email| email.to_string()).collect(),
            })
            .collect();
        if !conflicts.is_empty() {
            conflicts.sort_by(|a, b| a.name.cmp(&b.name));
            return Err(IndexError::AmbiguousAuthorEmail(conflicts));
        }

        let mut entries: Vec<RosterEntry> = collected
            .into_iter()
            .map(|(author, emails)| RosterEntry {
                author: author.clone(),
                email: emails.first().map(|email| email.to_string()).unwrap_or_default(),
            })
            .collect();
        entries.sort_by(|a, b| {
            a.author
                .sort_key
                .cmp(&b.author.sort_key)
                .then_with(|| a.author.last_first.cmp(&b.author.last_first))
        });
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolved email for an author name, if the name is on the roster.
    pub fn email_of(&self, full_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.author.full_name == full_name)
            .map(|entry| entry.email.as_str())
    }
}

/// Rewrites `user@host` as `user at host` unless the address is allowlisted.
pub fn mask_email(email: &str, unmasked: &[String]) -> String {
    if unmasked.iter().any(|allowed| allowed.eq_ignore_ascii_case(email)) {
        return email.to_string();
    }
    email.replace('@', " at ")
}
