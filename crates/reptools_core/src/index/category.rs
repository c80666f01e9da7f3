//! Display buckets for the index report.
//!
//! # Invariants
//! - Rules are evaluated in declaration order; the first match wins.
//! - Every proposal lands in exactly one bucket, or categorization fails.
//! - Bucket contents keep the input order.

use crate::index::IndexError;
use crate::model::rep::{Rep, RepStatus, RepType};
use serde::Serialize;

/// Index section a proposal is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Meta,
    Informational,
    Accepted,
    Open,
    Finished,
    Dead,
}

impl Category {
    /// Categories in report order.
    pub const ALL: [Category; 6] = [
        Self::Meta,
        Self::Informational,
        Self::Accepted,
        Self::Open,
        Self::Finished,
        Self::Dead,
    ];

    /// Section caption used in the index document.
    pub fn caption(self) -> &'static str {
        match self {
            Self::Meta => "Meta-REPs (REPs about REPs or Processes)",
            Self::Informational => "Other Informational REPs",
            Self::Accepted => "Accepted REPs (accepted; may not be implemented yet)",
            Self::Open => "Open REPs (under consideration)",
            Self::Finished => "Finished REPs (done, implemented in code repository)",
            Self::Dead => "Deferred, Abandoned, Withdrawn, and Rejected REPs",
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::Meta => 0,
            Self::Informational => 1,
            Self::Accepted => 2,
            Self::Open => 3,
            Self::Finished => 4,
            Self::Dead => 5,
        }
    }
}

struct CategoryRule {
    category: Category,
    matches: fn(RepType, RepStatus) -> bool,
}

// Status rules and type rules interleave; order is significant.
const RULES: [CategoryRule; 6] = [
    CategoryRule {
        category: Category::Meta,
        matches: |kind, _| kind == RepType::Process,
    },
    CategoryRule {
        category: Category::Open,
        matches: |_, status| status == RepStatus::Draft,
    },
    CategoryRule {
        category: Category::Dead,
        matches: |_, status| {
            matches!(
                status,
                RepStatus::Rejected
                    | RepStatus::Withdrawn
                    | RepStatus::Deferred
                    | RepStatus::Replaced
            )
        },
    },
    CategoryRule {
        category: Category::Informational,
        matches: |kind, _| kind == RepType::Informational,
    },
    CategoryRule {
        category: Category::Accepted,
        matches: |_, status| matches!(status, RepStatus::Accepted | RepStatus::Active),
    },
    CategoryRule {
        category: Category::Finished,
        matches: |_, status| status == RepStatus::Final,
    },
];

/// Picks the bucket for one proposal; `None` when no rule applies.
pub fn categorize(rep: &Rep) -> Option<Category> {
    RULES
        .iter()
        .find(|rule| (rule.matches)(rep.kind, rep.status))
        .map(|rule| rule.category)
}

/// Proposals partitioned by `Category`.
#[derive(Debug, Clone, Default)]
pub struct CategorizedReps<'a> {
    groups: [Vec<&'a Rep>; 6],
}

impl<'a> CategorizedReps<'a> {
    pub fn get(&self, category: Category) -> &[&'a Rep] {
        &self.groups[category.slot()]
    }

    /// Buckets in report order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[&'a Rep])> + '_ {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    /// Total number of categorized proposals.
    pub fn len(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buckets from categories already assigned to each proposal.
    pub(crate) fn from_assigned<I>(assigned: I) -> Self
    where
        I: IntoIterator<Item = (Category, &'a Rep)>,
    {
        let mut categorized = Self::default();
        for (category, rep) in assigned {
            categorized.push(category, rep);
        }
        categorized
    }

    fn push(&mut self, category: Category, rep: &'a Rep) {
        self.groups[category.slot()].push(rep);
    }
}

/// Stable partition of `reps` into categories.
///
/// # Errors
/// - `IndexError::Uncategorized` for the first proposal no rule accepts.
pub fn categorize_all<'a, I>(reps: I) -> Result<CategorizedReps<'a>, IndexError>
where
    I: IntoIterator<Item = &'a Rep>,
{
    let mut categorized = CategorizedReps::default();
    for rep in reps {
        categorized.push(require_category(rep)?, rep);
    }
    Ok(categorized)
}

/// Like `categorize`, but a proposal no rule accepts is an error.
pub(crate) fn require_category(rep: &Rep) -> Result<Category, IndexError> {
    categorize(rep).ok_or_else(|| IndexError::Uncategorized {
        number: rep.number,
        source_id: rep.source_id.clone(),
        kind: rep.kind,
        status: rep.status,
    })
}
