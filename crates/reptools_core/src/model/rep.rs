//! Proposal (REP) record model.
//!
//! # Responsibility
//! - Build a validated `Rep` from the raw text of one proposal file.
//! - Provide the abbreviated projections used by index listings.
//!
//! # Invariants
//! - `authors` is never empty for a parsed record.
//! - `RepStatus::Active` only pairs with `RepType::Process` or
//!   `RepType::Informational`.
//! - Errors carry the source identifier and, once parsed, the number.

use crate::model::author::{Author, AuthorParseError};
use crate::model::header::{HeaderError, HeaderField, RepHeaders};
use crate::model::wrap::wrap;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

static ANGLED_AUTHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<author>.+?) <(?P<email>.+?)>(,\s*)?").expect("valid angled author regex")
});
static PAREN_AUTHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<email>.+?) \((?P<author>.+?)\)(,\s*)?").expect("valid paren author regex")
});
static SIMPLE_AUTHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?P<author>[^,]+)(,\s*)?").expect("valid simple author regex"));

/// Proposal type, from the `Type` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RepType {
    #[serde(rename = "Standards Track")]
    StandardsTrack,
    Informational,
    Process,
}

impl RepType {
    pub const ALL: [RepType; 3] = [Self::StandardsTrack, Self::Informational, Self::Process];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StandardsTrack => "Standards Track",
            Self::Informational => "Informational",
            Self::Process => "Process",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// One-letter code shown in index listings.
    pub fn abbreviation(self) -> char {
        first_letter(self.as_str())
    }
}

/// Proposal lifecycle status, from the `Status` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RepStatus {
    Accepted,
    Rejected,
    Withdrawn,
    Deferred,
    Final,
    Active,
    Draft,
    Replaced,
}

impl RepStatus {
    pub const ALL: [RepStatus; 8] = [
        Self::Accepted,
        Self::Rejected,
        Self::Withdrawn,
        Self::Deferred,
        Self::Final,
        Self::Active,
        Self::Draft,
        Self::Replaced,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
            Self::Withdrawn => "Withdrawn",
            Self::Deferred => "Deferred",
            Self::Final => "Final",
            Self::Active => "Active",
            Self::Draft => "Draft",
            Self::Replaced => "Replaced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    /// One-letter code shown in index listings; blank for open statuses.
    pub fn abbreviation(self) -> char {
        match self {
            Self::Draft | Self::Active => ' ',
            other => first_letter(other.as_str()),
        }
    }
}

/// Validated metadata of one proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rep {
    pub number: u32,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: RepType,
    pub status: RepStatus,
    pub authors: Vec<Author>,
    /// Where the text came from (usually a file name); used in errors.
    pub source_id: String,
    /// Full typed header block, optional headers included.
    pub headers: RepHeaders,
}

impl Rep {
    /// Parses and validates the header of one proposal text.
    ///
    /// The body after the header block is ignored.
    pub fn parse(source_id: &str, text: &str) -> Result<Self, RepError> {
        let headers =
            RepHeaders::parse(text).map_err(|err| RepError::new(source_id, None, err.into()))?;

        let number = headers.rep.parse::<u32>().map_err(|_| {
            RepError::new(
                source_id,
                None,
                RepErrorKind::NumberParse(headers.rep.clone()),
            )
        })?;
        let fail = |kind: RepErrorKind| RepError::new(source_id, Some(number), kind);

        let kind = RepType::parse(&headers.kind).ok_or_else(|| {
            fail(RepErrorKind::InvalidField {
                field: HeaderField::Type,
                value: headers.kind.clone(),
                reason: "is not a valid Type value",
            })
        })?;
        let status = RepStatus::parse(&headers.status).ok_or_else(|| {
            fail(RepErrorKind::InvalidField {
                field: HeaderField::Status,
                value: headers.status.clone(),
                reason: "is not a valid Status value",
            })
        })?;
        check_active_type(status, kind).map_err(&fail)?;

        let citations = parse_author_list(&headers.author);
        if citations.is_empty() {
            return Err(fail(RepErrorKind::MissingAuthor));
        }
        let authors = citations
            .iter()
            .map(|(name, email)| Author::new(name, email))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| fail(RepErrorKind::AuthorParse(err)))?;

        debug!(
            "event=rep_parse module=rep status=ok number={} authors={}",
            number,
            authors.len()
        );

        Ok(Self {
            number,
            title: headers.title.clone(),
            kind,
            status,
            authors,
            source_id: source_id.to_string(),
            headers,
        })
    }

    /// Re-checks cross-field invariants of a record.
    ///
    /// `parse` already enforces these; this is for records assembled or
    /// edited by hand.
    pub fn validate(&self) -> Result<(), RepError> {
        let fail = |kind: RepErrorKind| RepError::new(&self.source_id, Some(self.number), kind);
        check_active_type(self.status, self.kind).map_err(&fail)?;
        if self.authors.is_empty() {
            return Err(fail(RepErrorKind::MissingAuthor));
        }
        Ok(())
    }

    pub fn type_abbr(&self) -> char {
        self.kind.abbreviation()
    }

    pub fn status_abbr(&self) -> char {
        self.status.abbreviation()
    }

    /// Author display names joined with `, `.
    pub fn author_abbr(&self) -> String {
        self.authors
            .iter()
            .map(|author| author.nick.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Title shortened to at most `width` characters.
    ///
    /// Long titles keep the first wrapped line at `width - 4` columns and
    /// gain a ` ...` marker.
    pub fn title_abbr(&self, width: usize) -> String {
        if self.title.chars().count() <= width {
            return self.title.clone();
        }
        let mut line = wrap(&self.title, width.saturating_sub(4))
            .into_iter()
            .next()
            .unwrap_or_default();
        line.push_str(" ...");
        line
    }
}

/// Splits an `Author` header value into `(name, email)` citations.
///
/// Tries `Name <email>`, then `email (Name)`, then bare names; the first
/// style with any match is used for the whole value. A bare `Jr.`-style
/// fragment is folded back into the preceding name.
pub fn parse_author_list(value: &str) -> Vec<(String, String)> {
    let styles: [&Regex; 3] = [&ANGLED_AUTHOR_RE, &PAREN_AUTHOR_RE, &SIMPLE_AUTHOR_RE];
    let mut citations: Vec<(String, String)> = Vec::new();
    for regex in styles {
        for captures in regex.captures_iter(value) {
            let Some(author) = captures.name("author") else {
                continue;
            };
            let mut name = author.as_str().trim().to_string();
            if name.is_empty() {
                continue;
            }
            let email = captures
                .name("email")
                .map(|email| email.as_str().trim().to_string())
                .unwrap_or_default();
            if is_detached_suffix(&name) {
                if let Some((previous, _)) = citations.pop() {
                    name = format!("{previous}, {name}");
                }
            }
            citations.push((name, email));
        }
        if !citations.is_empty() {
            break;
        }
    }
    citations
}

fn is_detached_suffix(name: &str) -> bool {
    !name.contains(' ') && name.ends_with('.')
}

fn check_active_type(status: RepStatus, kind: RepType) -> Result<(), RepErrorKind> {
    if status == RepStatus::Active && !matches!(kind, RepType::Process | RepType::Informational) {
        return Err(RepErrorKind::InvalidField {
            field: HeaderField::Status,
            value: status.as_str().to_string(),
            reason: "is only allowed for Process and Informational REPs",
        });
    }
    Ok(())
}

fn first_letter(value: &str) -> char {
    value
        .chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or(' ')
}

/// Failure to build one `Rep`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepError {
    pub kind: RepErrorKind,
    pub source_id: String,
    pub number: Option<u32>,
}

impl RepError {
    pub fn new(source_id: &str, number: Option<u32>, kind: RepErrorKind) -> Self {
        Self {
            kind,
            source_id: source_id.to_string(),
            number,
        }
    }
}

impl Display for RepError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.number {
            Some(number) => write!(f, "REP {number}: {}", self.kind),
            None => write!(f, "({}): {}", self.source_id, self.kind),
        }
    }
}

impl Error for RepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            RepErrorKind::AuthorParse(err) => Some(err),
            _ => None,
        }
    }
}

/// Rule violated while building a `Rep`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepErrorKind {
    MalformedHeader {
        line: usize,
        content: String,
    },
    UnknownHeader(String),
    DuplicateHeader(HeaderField),
    MissingHeader(HeaderField),
    HeaderOrder {
        found: HeaderField,
        after: HeaderField,
    },
    NumberParse(String),
    InvalidField {
        field: HeaderField,
        value: String,
        reason: &'static str,
    },
    MissingAuthor,
    AuthorParse(AuthorParseError),
    /// Header number disagrees with the number in the source identifier.
    NumberMismatch {
        source_number: u32,
    },
}

impl Display for RepErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedHeader { line, content } => {
                write!(f, "malformed header line {line}: {content:?}")
            }
            Self::UnknownHeader(name) => write!(f, "unknown header {name:?}"),
            Self::DuplicateHeader(field) => write!(f, "header {:?} appears twice", field.name()),
            Self::MissingHeader(field) => write!(f, "REP is missing its {:?}", field.name()),
            Self::HeaderOrder { found, after } => write!(
                f,
                "header {:?} must come before {:?}",
                found.name(),
                after.name()
            ),
            Self::NumberParse(value) => write!(f, "REP number isn't an integer: {value:?}"),
            Self::InvalidField {
                field,
                value,
                reason,
            } => write!(f, "{} {value:?} {reason}", field.name()),
            Self::MissingAuthor => write!(f, "no authors found"),
            Self::AuthorParse(err) => write!(f, "{err}"),
            Self::NumberMismatch { source_number } => write!(
                f,
                "REP number does not match source identifier (expected {source_number})"
            ),
        }
    }
}

impl From<HeaderError> for RepErrorKind {
    fn from(value: HeaderError) -> Self {
        match value {
            HeaderError::Malformed { line, content } => Self::MalformedHeader { line, content },
            HeaderError::Unknown(name) => Self::UnknownHeader(name),
            HeaderError::Duplicate(field) => Self::DuplicateHeader(field),
            HeaderError::Missing(field) => Self::MissingHeader(field),
            HeaderError::OutOfOrder { found, after } => Self::HeaderOrder { found, after },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_author_list, RepStatus, RepType};

    fn pairs(value: &[(&str, &str)]) -> Vec<(String, String)> {
        value
            .iter()
            .map(|(name, email)| (name.to_string(), email.to_string()))
            .collect()
    }

    #[test]
    fn angled_citations() {
        assert_eq!(
            parse_author_list("Jane Doe <jane@example.org>, John Roe <JR@example.org>"),
            pairs(&[
                ("Jane Doe", "jane@example.org"),
                ("John Roe", "JR@example.org")
            ])
        );
    }

    #[test]
    fn parenthetical_citations() {
        assert_eq!(
            parse_author_list("jane@example.org (Jane Doe), john@example.org (John Roe)"),
            pairs(&[
                ("Jane Doe", "jane@example.org"),
                ("John Roe", "john@example.org")
            ])
        );
    }

    #[test]
    fn bare_names_default_to_empty_email() {
        assert_eq!(
            parse_author_list("Jane Doe, Aahz"),
            pairs(&[("Jane Doe", ""), ("Aahz", "")])
        );
    }

    #[test]
    fn detached_suffix_merges_into_previous_name() {
        assert_eq!(
            parse_author_list("John Smith, Jr., Jane Doe"),
            pairs(&[("John Smith, Jr.", ""), ("Jane Doe", "")])
        );
    }

    #[test]
    fn suffix_inside_angled_citation_is_kept() {
        assert_eq!(
            parse_author_list("John Smith, Jr. <js@example.org>"),
            pairs(&[("John Smith, Jr.", "js@example.org")])
        );
    }

    #[test]
    fn empty_value_has_no_citations() {
        assert!(parse_author_list("").is_empty());
        assert!(parse_author_list(" , ").is_empty());
    }

    #[test]
    fn abbreviations() {
        assert_eq!(RepType::StandardsTrack.abbreviation(), 'S');
        assert_eq!(RepType::Process.abbreviation(), 'P');
        assert_eq!(RepStatus::Draft.abbreviation(), ' ');
        assert_eq!(RepStatus::Active.abbreviation(), ' ');
        assert_eq!(RepStatus::Replaced.abbreviation(), 'R');
        assert_eq!(RepStatus::Final.abbreviation(), 'F');
    }

    #[test]
    fn enum_text_round_trips() {
        for kind in RepType::ALL {
            assert_eq!(RepType::parse(kind.as_str()), Some(kind));
        }
        for status in RepStatus::ALL {
            assert_eq!(RepStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RepType::parse("standards track"), None);
        assert_eq!(RepStatus::parse("Incomplete"), None);
    }
}
