//! Index generation settings.
//!
//! # Responsibility
//! - Hold the layout width and static prose of the generated index.
//! - Load partial overrides from TOML; unspecified keys keep defaults.
//!
//! # Invariants
//! - `title_width` is at least `MIN_TITLE_WIDTH` after loading.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Column width reserved for proposal titles in index listings.
pub const DEFAULT_TITLE_WIDTH: usize = 55;
/// Narrowest title column that still fits a word plus ` ...`.
pub const MIN_TITLE_WIDTH: usize = 8;

const DEFAULT_INTRO: &str = "    The REP contains the index of all ROS Enhancement Proposals,
    known as REPs.  REP numbers are assigned by the REP Editor, and
    once assigned are never changed.  The GIT history[1] of the REP
    texts represent their historical record.";

const DEFAULT_REFERENCES: &str = "    [1] View REP history online
        https://github.com/ros-infrastructure/rep";

const DEFAULT_FOOTER: &str = "Local Variables:
mode: indented-text
indent-tabs-mode: nil
sentence-end-double-space: t
fill-column: 70
coding: utf-8
End:";

/// Settings consumed by index rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    pub title_width: usize,
    /// `Title` header of the generated index document.
    pub title: String,
    /// `Author` header of the generated index document.
    pub author: String,
    /// `Created` header of the generated index document.
    pub created: String,
    pub intro: String,
    pub references: String,
    pub footer: String,
    /// Rewrite roster emails as `user at host`.
    pub mask_emails: bool,
    /// Addresses left untouched when `mask_emails` is set.
    pub unmasked_addresses: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            title_width: DEFAULT_TITLE_WIDTH,
            title: "Index of ROS Enhancement Proposals (REPs)".to_string(),
            author: "ROS Developers".to_string(),
            created: "13-Jul-2000".to_string(),
            intro: DEFAULT_INTRO.to_string(),
            references: DEFAULT_REFERENCES.to_string(),
            footer: DEFAULT_FOOTER.to_string(),
            mask_emails: false,
            unmasked_addresses: vec![
                "reps@python.org".to_string(),
                "ros-users@code.ros.org".to_string(),
                "ros-developers@code.ros.org".to_string(),
            ],
        }
    }
}

impl IndexConfig {
    /// Parses TOML overrides on top of the defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title_width < MIN_TITLE_WIDTH {
            return Err(ConfigError::InvalidTitleWidth(self.title_width));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    InvalidTitleWidth(usize),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid index config: {err}"),
            Self::InvalidTitleWidth(width) => write!(
                f,
                "title_width must be at least {MIN_TITLE_WIDTH}, got {width}"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::InvalidTitleWidth(_) => None,
        }
    }
}
