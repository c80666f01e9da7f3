//! Author citation model.
//!
//! # Responsibility
//! - Turn one `(name, email)` citation into a normalized person record.
//! - Derive display and sort keys used by the index roster.
//!
//! # Invariants
//! - Identity (`Eq`/`Hash`) is keyed on `full_name` only.
//! - `sort_key` always exists for a constructed author; names without a
//!   capitalised surname token are rejected at construction.
//! - `email` is stored lowercased and is never validated.

use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use unicode_normalization::UnicodeNormalization;

/// One author as cited in a proposal `Author` header.
#[derive(Debug, Clone, Serialize)]
pub struct Author {
    /// Name exactly as written (trimmed), suffix included.
    pub full_name: String,
    /// `Last, First[, Suffix]`, or just the last name for mononyms.
    pub last_first: String,
    /// Everything before the last-name fragment. May be empty.
    pub first: String,
    /// Last name, including lowercase particles such as `van`.
    pub last: String,
    /// Comma-separated suffix such as `Jr.`. May be empty.
    pub suffix: String,
    /// ASCII-folded, lowercased surname used for roster ordering.
    pub sort_key: String,
    /// Lowercased email, empty when the citation had none.
    pub email: String,
    /// Short name used in abbreviated author columns.
    pub nick: String,
}

impl Author {
    /// Parses one citation.
    ///
    /// # Errors
    /// - `AuthorParseError::EmptyName` when no name token remains after
    ///   removing the suffix.
    /// - `AuthorParseError::NoCapitalizedSurname` when no last-name token
    ///   starts with an uppercase letter.
    pub fn new(name: &str, email: &str) -> Result<Self, AuthorParseError> {
        let full_name = name.trim();
        let (no_suffix, suffix) = match full_name.split_once(',') {
            Some((head, tail)) => (head.trim(), tail.trim()),
            None => (full_name, ""),
        };

        let tokens = tokens_with_offsets(no_suffix);
        let last_start = match tokens.len() {
            0 => return Err(AuthorParseError::EmptyName(full_name.to_string())),
            1 | 2 => tokens.len() - 1,
            count if is_particle(tokens[count - 2].1) => count - 2,
            count => count - 1,
        };
        let last_tokens: Vec<&str> = tokens[last_start..].iter().map(|(_, t)| *t).collect();
        let last = last_tokens.join(" ");
        let first = no_suffix[..tokens[last_start].0].trim_end().to_string();
        let sort_key = derive_sort_key(&last_tokens)
            .ok_or_else(|| AuthorParseError::NoCapitalizedSurname(full_name.to_string()))?;

        let last_first = if first.is_empty() {
            last.clone()
        } else if suffix.is_empty() {
            format!("{last}, {first}")
        } else {
            format!("{last}, {first}, {suffix}")
        };

        Ok(Self {
            full_name: full_name.to_string(),
            last_first,
            first,
            nick: last.clone(),
            last,
            suffix: suffix.to_string(),
            sort_key,
            email: email.trim().to_lowercase(),
        })
    }
}

impl PartialEq for Author {
    fn eq(&self, other: &Self) -> bool {
        self.full_name == other.full_name
    }
}

impl Eq for Author {}

impl Hash for Author {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_name.hash(state);
    }
}

/// Author citation could not be turned into a sortable record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorParseError {
    EmptyName(String),
    NoCapitalizedSurname(String),
}

impl Display for AuthorParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName(raw) => write!(f, "author name is empty: {raw:?}"),
            Self::NoCapitalizedSurname(name) => {
                write!(f, "last name missing a capital letter: {name:?}")
            }
        }
    }
}

impl Error for AuthorParseError {}

/// Whitespace tokens paired with their byte offset in `text`.
fn tokens_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (index, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(begin) = start.take() {
                tokens.push((begin, &text[begin..index]));
            }
        } else if start.is_none() {
            start = Some(index);
        }
    }
    if let Some(begin) = start {
        tokens.push((begin, &text[begin..]));
    }
    tokens
}

/// A particle has at least one lowercase letter and no uppercase ones.
fn is_particle(token: &str) -> bool {
    token.chars().any(char::is_lowercase) && !token.chars().any(char::is_uppercase)
}

fn derive_sort_key(last_tokens: &[&str]) -> Option<String> {
    let start = last_tokens.iter().position(|token| {
        token
            .chars()
            .next()
            .map(char::is_uppercase)
            .unwrap_or(false)
    })?;
    let base = last_tokens[start..].join(" ").to_lowercase();
    Some(base.nfkd().filter(char::is_ascii).collect())
}

#[cfg(test)]
mod tests {
    use super::{is_particle, tokens_with_offsets, Author, AuthorParseError};

    #[test]
    fn mononym_has_no_first_name() {
        let author = Author::new("Aahz", "").unwrap();
        assert_eq!(author.first, "");
        assert_eq!(author.last, "Aahz");
        assert_eq!(author.last_first, "Aahz");
        assert_eq!(author.sort_key, "aahz");
    }

    #[test]
    fn particle_joins_last_name_but_not_sort_key() {
        let author = Author::new("Jane van Doe", "").unwrap();
        assert_eq!(author.first, "Jane");
        assert_eq!(author.last, "van Doe");
        assert_eq!(author.sort_key, "doe");
        assert_eq!(author.last_first, "van Doe, Jane");
    }

    #[test]
    fn two_token_name_keeps_lowercase_prefix_as_first_name() {
        let author = Author::new("van Doe", "").unwrap();
        assert_eq!(author.first, "van");
        assert_eq!(author.last, "Doe");
    }

    #[test]
    fn middle_initial_stays_in_first_name() {
        let author = Author::new("Guido Q. Public", "").unwrap();
        assert_eq!(author.first, "Guido Q.");
        assert_eq!(author.last, "Public");
    }

    #[test]
    fn suffix_is_split_off() {
        let author = Author::new("John Smith, Jr.", "").unwrap();
        assert_eq!(author.full_name, "John Smith, Jr.");
        assert_eq!(author.first, "John");
        assert_eq!(author.last, "Smith");
        assert_eq!(author.suffix, "Jr.");
        assert_eq!(author.last_first, "Smith, John, Jr.");
    }

    #[test]
    fn repeated_token_uses_last_occurrence() {
        let author = Author::new("Ann Ann", "").unwrap();
        assert_eq!(author.first, "Ann");
        assert_eq!(author.last, "Ann");
    }

    #[test]
    fn sort_key_is_ascii_folded() {
        let author = Author::new("Martin von Löwis", "").unwrap();
        assert_eq!(author.last, "von Löwis");
        assert_eq!(author.sort_key, "lowis");
    }

    #[test]
    fn email_is_lowercased() {
        let author = Author::new("Jane Doe", "Jane.Doe@Example.ORG").unwrap();
        assert_eq!(author.email, "jane.doe@example.org");
    }

    #[test]
    fn lowercase_surname_is_rejected() {
        let err = Author::new("jane doe", "").unwrap_err();
        assert_eq!(
            err,
            AuthorParseError::NoCapitalizedSurname("jane doe".to_string())
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = Author::new("  , Jr.", "").unwrap_err();
        assert!(matches!(err, AuthorParseError::EmptyName(_)));
    }

    #[test]
    fn identity_ignores_email() {
        let a = Author::new("Jane Doe", "a@example.org").unwrap();
        let b = Author::new("Jane Doe", "b@example.org").unwrap();
        let c = Author::new("jane Doe", "a@example.org").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn tokenizer_tracks_offsets() {
        assert_eq!(
            tokens_with_offsets("  a  bc d"),
            vec![(2, "a"), (5, "bc"), (8, "d")]
        );
    }

    #[test]
    fn particle_detection() {
        assert!(is_particle("van"));
        assert!(is_particle("d'"));
        assert!(!is_particle("Van"));
        assert!(!is_particle("Q."));
    }
}
