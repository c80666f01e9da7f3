//! Core logic for REP (ROS Enhancement Proposal) tooling.
//! This crate is the single source of truth for proposal metadata rules.

pub mod config;
pub mod index;
pub mod logging;
pub mod model;

pub use config::{ConfigError, IndexConfig, DEFAULT_TITLE_WIDTH};
pub use index::category::{categorize, categorize_all, CategorizedReps, Category};
pub use index::roster::{mask_email, EmailConflict, Roster, RosterEntry};
pub use index::{check_source_number, parse_source, source_number, IndexError, RepIndex};
pub use logging::{default_log_level, init_logging, logging_status, LogSink};
pub use model::author::{Author, AuthorParseError};
pub use model::header::{HeaderField, RepHeaders};
pub use model::rep::{parse_author_list, Rep, RepError, RepErrorKind, RepStatus, RepType};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
