//! Proposal index aggregation.
//!
//! # Responsibility
//! - Check cross-record invariants once the full proposal set is known.
//! - Categorize, build the author roster and render the index document.
//!
//! # Invariants
//! - A `RepIndex` only exists for a set with unique numbers, complete
//!   categorization and an unambiguous roster.
//! - Rendering is a pure function of the index, config and supplied date.

pub mod category;
pub mod format;
pub mod roster;

use crate::config::IndexConfig;
use crate::index::category::{require_category, CategorizedReps, Category};
use crate::index::roster::{EmailConflict, Roster};
use crate::model::rep::{Rep, RepError, RepErrorKind, RepStatus, RepType};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static SOURCE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^rep-(\d+)\.txt$").expect("valid source number regex"));

/// Aggregation failures. All of them abort report generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// A record in the set no longer satisfies its own invariants.
    InvalidRep(RepError),
    DuplicateNumber {
        number: u32,
        sources: Vec<String>,
    },
    Uncategorized {
        number: u32,
        source_id: String,
        kind: RepType,
        status: RepStatus,
    },
    AmbiguousAuthorEmail(Vec<EmailConflict>),
}

impl Display for IndexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRep(err) => write!(f, "{err}"),
            Self::DuplicateNumber { number, sources } => write!(
                f,
                "REP {number} is defined more than once: {}",
                sources.join(", ")
            ),
            Self::Uncategorized {
                number,
                source_id,
                kind,
                status,
            } => write!(
                f,
                "REP {number} ({source_id}): unsorted ({}/{})",
                kind.as_str(),
                status.as_str()
            ),
            Self::AmbiguousAuthorEmail(conflicts) => {
                write!(f, "some authors have more than one email address listed:")?;
                for conflict in conflicts {
                    write!(f, "\n    {conflict}")?;
                }
                Ok(())
            }
        }
    }
}

impl Error for IndexError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRep(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepError> for IndexError {
    fn from(value: RepError) -> Self {
        Self::InvalidRep(value)
    }
}

/// Validated, number-ordered proposal set ready for rendering.
#[derive(Debug, Clone)]
pub struct RepIndex {
    reps: Vec<Rep>,
    /// Category of each entry in `reps`, same order.
    categories: Vec<Category>,
    roster: Roster,
}

impl RepIndex {
    /// Aggregates parsed proposals.
    ///
    /// # Errors
    /// - `InvalidRep` when a record fails `Rep::validate`.
    /// - `DuplicateNumber` when two proposals share a number.
    /// - `Uncategorized` when no category rule accepts a proposal.
    /// - `AmbiguousAuthorEmail` when an author name carries two emails.
    pub fn build(mut reps: Vec<Rep>) -> Result<Self, IndexError> {
        for rep in &reps {
            rep.validate()?;
        }
        reps.sort_by_key(|rep| rep.number);

        if let Some(err) = find_duplicate_number(&reps) {
            warn!("event=index_build module=index status=error reason=duplicate_number");
            return Err(err);
        }
        let categories = reps
            .iter()
            .map(require_category)
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|_| {
                warn!("event=index_build module=index status=error reason=uncategorized");
            })?;
        let category_count = Category::ALL
            .iter()
            .filter(|category| categories.contains(category))
            .count();
        let roster = Roster::build(&reps).inspect_err(|_| {
            warn!("event=index_build module=index status=error reason=ambiguous_author_email");
        })?;

        info!(
            "event=index_build module=index status=ok reps={} categories={} authors={}",
            reps.len(),
            category_count,
            roster.len()
        );
        Ok(Self {
            reps,
            categories,
            roster,
        })
    }

    /// Proposals in ascending number order.
    pub fn reps(&self) -> &[Rep] {
        &self.reps
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Category buckets, each in number order.
    pub fn categorized(&self) -> CategorizedReps<'_> {
        CategorizedReps::from_assigned(self.categories.iter().copied().zip(&self.reps))
    }

    /// Renders the full index document.
    pub fn render(&self, last_modified: &str, config: &IndexConfig) -> String {
        format::render_document(
            &self.reps,
            &self.categorized(),
            &self.roster,
            last_modified,
            config,
        )
    }
}

/// Proposal number embedded in a `rep-NNNN.txt` source identifier.
///
/// Only the final path component is inspected.
pub fn source_number(source_id: &str) -> Option<u32> {
    let file_name = source_id.rsplit(['/', '\\']).next().unwrap_or(source_id);
    SOURCE_NUMBER_RE
        .captures(file_name)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

/// Fails when the header number disagrees with the source identifier.
///
/// Identifiers without an embedded number are accepted as-is.
pub fn check_source_number(rep: &Rep) -> Result<(), RepError> {
    match source_number(&rep.source_id) {
        Some(source_number) if source_number != rep.number => Err(RepError::new(
            &rep.source_id,
            Some(rep.number),
            RepErrorKind::NumberMismatch { source_number },
        )),
        _ => Ok(()),
    }
}

/// Parses one source and checks its number against the identifier.
pub fn parse_source(source_id: &str, text: &str) -> Result<Rep, RepError> {
    let rep = Rep::parse(source_id, text)?;
    check_source_number(&rep)?;
    Ok(rep)
}

fn find_duplicate_number(sorted: &[Rep]) -> Option<IndexError> {
    let pair = sorted
        .windows(2)
        .find(|pair| pair[0].number == pair[1].number)?;
    let number = pair[0].number;
    let sources = sorted
        .iter()
        .filter(|rep| rep.number == number)
        .map(|rep| rep.source_id.clone())
        .collect();
    Some(IndexError::DuplicateNumber { number, sources })
}
