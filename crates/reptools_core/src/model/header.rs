//! Proposal header block parsing and schema validation.
//!
//! # Responsibility
//! - Split the RFC-2822-style header block off a proposal text.
//! - Map header names onto a closed, ordered schema and a typed record.
//!
//! # Invariants
//! - Every header name is known, appears at most once and in schema order.
//! - Required headers are always populated in a returned `RepHeaders`.
//! - The body after the first blank line is never inspected.

use serde::Serialize;

/// One header of the proposal schema, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeaderField {
    Rep,
    Title,
    Version,
    LastModified,
    Author,
    DiscussionsTo,
    Status,
    Type,
    ContentType,
    Requires,
    Created,
    RosVersion,
    PostHistory,
    Replaces,
    ReplacedBy,
    Resolution,
}

impl HeaderField {
    /// All fields in canonical order.
    pub const ALL: [HeaderField; 16] = [
        Self::Rep,
        Self::Title,
        Self::Version,
        Self::LastModified,
        Self::Author,
        Self::DiscussionsTo,
        Self::Status,
        Self::Type,
        Self::ContentType,
        Self::Requires,
        Self::Created,
        Self::RosVersion,
        Self::PostHistory,
        Self::Replaces,
        Self::ReplacedBy,
        Self::Resolution,
    ];

    /// Header name as written in proposal files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rep => "REP",
            Self::Title => "Title",
            Self::Version => "Version",
            Self::LastModified => "Last-Modified",
            Self::Author => "Author",
            Self::DiscussionsTo => "Discussions-To",
            Self::Status => "Status",
            Self::Type => "Type",
            Self::ContentType => "Content-Type",
            Self::Requires => "Requires",
            Self::Created => "Created",
            Self::RosVersion => "ROS-Version",
            Self::PostHistory => "Post-History",
            Self::Replaces => "Replaces",
            Self::ReplacedBy => "Replaced-By",
            Self::Resolution => "Resolution",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(
            self,
            Self::Rep | Self::Title | Self::Author | Self::Status | Self::Type | Self::Created
        )
    }

    /// Resolves a header name. Matching is case-insensitive, as in RFC 2822.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.name().eq_ignore_ascii_case(name))
    }
}

/// Typed view of a validated header block.
///
/// Values are unfolded and trimmed but otherwise raw; interpretation of the
/// required fields happens in `Rep::parse`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepHeaders {
    pub rep: String,
    pub title: String,
    pub version: Option<String>,
    pub last_modified: Option<String>,
    pub author: String,
    pub discussions_to: Option<String>,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content_type: Option<String>,
    pub requires: Option<String>,
    pub created: String,
    pub ros_version: Option<String>,
    pub post_history: Option<String>,
    pub replaces: Option<String>,
    pub replaced_by: Option<String>,
    pub resolution: Option<String>,
}

impl RepHeaders {
    /// Parses and validates the header block at the top of `text`.
    ///
    /// Validation runs in a fixed sequence so the reported error is stable:
    /// malformed lines, unknown names, duplicates, missing required headers,
    /// then relative order.
    pub fn parse(text: &str) -> Result<Self, HeaderError> {
        let raw = split_header_block(text)?;

        let mut fields = Vec::with_capacity(raw.len());
        for (name, value) in raw {
            let field = HeaderField::from_name(&name).ok_or(HeaderError::Unknown(name))?;
            if fields.iter().any(|(seen, _)| *seen == field) {
                return Err(HeaderError::Duplicate(field));
            }
            fields.push((field, value));
        }

        if let Some(missing) = HeaderField::ALL
            .into_iter()
            .filter(|field| field.is_required())
            .find(|field| !fields.iter().any(|(seen, _)| seen == field))
        {
            return Err(HeaderError::Missing(missing));
        }

        for pair in fields.windows(2) {
            let (before, after) = (pair[0].0, pair[1].0);
            if after < before {
                return Err(HeaderError::OutOfOrder {
                    found: after,
                    after: before,
                });
            }
        }

        let mut headers = Self::default();
        for (field, value) in fields {
            headers.set(field, value);
        }
        Ok(headers)
    }

    /// Returns the raw value of one header, if present.
    pub fn get(&self, field: HeaderField) -> Option<&str> {
        let value = match field {
            HeaderField::Rep => Some(&self.rep),
            HeaderField::Title => Some(&self.title),
            HeaderField::Version => self.version.as_ref(),
            HeaderField::LastModified => self.last_modified.as_ref(),
            HeaderField::Author => Some(&self.author),
            HeaderField::DiscussionsTo => self.discussions_to.as_ref(),
            HeaderField::Status => Some(&self.status),
            HeaderField::Type => Some(&self.kind),
            HeaderField::ContentType => self.content_type.as_ref(),
            HeaderField::Requires => self.requires.as_ref(),
            HeaderField::Created => Some(&self.created),
            HeaderField::RosVersion => self.ros_version.as_ref(),
            HeaderField::PostHistory => self.post_history.as_ref(),
            HeaderField::Replaces => self.replaces.as_ref(),
            HeaderField::ReplacedBy => self.replaced_by.as_ref(),
            HeaderField::Resolution => self.resolution.as_ref(),
        };
        value.map(String::as_str)
    }

    fn set(&mut self, field: HeaderField, value: String) {
        match field {
            HeaderField::Rep => self.rep = value,
            HeaderField::Title => self.title = value,
            HeaderField::Version => self.version = Some(value),
            HeaderField::LastModified => self.last_modified = Some(value),
            HeaderField::Author => self.author = value,
            HeaderField::DiscussionsTo => self.discussions_to = Some(value),
            HeaderField::Status => self.status = value,
            HeaderField::Type => self.kind = value,
            HeaderField::ContentType => self.content_type = Some(value),
            HeaderField::Requires => self.requires = Some(value),
            HeaderField::Created => self.created = value,
            HeaderField::RosVersion => self.ros_version = Some(value),
            HeaderField::PostHistory => self.post_history = Some(value),
            HeaderField::Replaces => self.replaces = Some(value),
            HeaderField::ReplacedBy => self.replaced_by = Some(value),
            HeaderField::Resolution => self.resolution = Some(value),
        }
    }
}

/// Header block violations. Wrapped into `RepError` by the record parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    Malformed { line: usize, content: String },
    Unknown(String),
    Duplicate(HeaderField),
    Missing(HeaderField),
    OutOfOrder { found: HeaderField, after: HeaderField },
}

/// Collects `(name, value)` pairs up to the first blank line.
///
/// Indented lines continue the previous value and are joined with a single
/// space.
fn split_header_block(text: &str) -> Result<Vec<(String, String)>, HeaderError> {
    let mut headers: Vec<(String, String)> = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            break;
        }
        if line.starts_with([' ', '\t']) {
            match headers.last_mut() {
                Some((_, value)) => {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(line.trim());
                    continue;
                }
                None => return Err(malformed(index, line)),
            }
        }
        match line.split_once(':') {
            Some((name, value)) if is_header_name(name) => {
                headers.push((name.to_string(), value.trim().to_string()));
            }
            _ => return Err(malformed(index, line)),
        }
    }
    Ok(headers)
}

fn malformed(index: usize, line: &str) -> HeaderError {
    HeaderError::Malformed {
        line: index + 1,
        content: line.to_string(),
    }
}

fn is_header_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_graphic() && c != ':')
}
