//! Proposal source discovery.
//!
//! # Responsibility
//! - Turn a CLI path into `(source id, text)` pairs for the core parser.
//!
//! # Invariants
//! - Directory scans only pick up `rep-*.txt` regular files, ordered by name.
//! - Source ids of scanned files are bare file names, so the number check
//!   in `reptools_core::parse_source` applies; a single explicit file is
//!   never number-checked.

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Raw text of one proposal plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub source_id: String,
    pub text: String,
    /// Whether the source id is expected to carry the proposal number.
    pub numbered: bool,
}

/// Reads all proposal sources under `path`.
pub fn collect_sources(path: &Path) -> Result<Vec<SourceText>> {
    if path.is_dir() {
        scan_dir(path)
    } else if path.is_file() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        Ok(vec![SourceText {
            source_id: path.display().to_string(),
            text,
            numbered: false,
        }])
    } else {
        bail!(
            "argument must be a directory or file path: `{}`",
            path.display()
        )
    }
}

fn scan_dir(dir: &Path) -> Result<Vec<SourceText>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to list `{}`", dir.display()))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list `{}`", dir.display()))?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if is_rep_file_name(&name) && entry.path().is_file() {
            names.push(name);
        }
    }
    names.sort();

    names
        .into_iter()
        .map(|name| {
            let path = dir.join(&name);
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read `{}`", path.display()))?;
            Ok(SourceText {
                source_id: name,
                text,
                numbered: true,
            })
        })
        .collect()
}

fn is_rep_file_name(name: &str) -> bool {
    name.starts_with("rep-") && name.ends_with(".txt")
}

#[cfg(test)]
mod tests {
    use super::{collect_sources, is_rep_file_name};
    use std::fs;

    #[test]
    fn file_name_filter() {
        assert!(is_rep_file_name("rep-0001.txt"));
        assert!(!is_rep_file_name("rep-0001.rst"));
        assert!(!is_rep_file_name("README.txt"));
    }

    #[test]
    fn directory_scan_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("rep-0002.txt"), "two").unwrap();
        fs::write(dir.path().join("rep-0001.txt"), "one").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip").unwrap();
        fs::create_dir(dir.path().join("rep-0003.txt")).unwrap();

        let sources = collect_sources(dir.path()).unwrap();
        let ids: Vec<&str> = sources.iter().map(|s| s.source_id.as_str()).collect();
        assert_eq!(ids, vec!["rep-0001.txt", "rep-0002.txt"]);
        assert_eq!(sources[0].text, "one");
        assert!(sources.iter().all(|s| s.numbered));
    }

    #[test]
    fn single_file_is_not_numbered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.txt");
        fs::write(&path, "text").unwrap();

        let sources = collect_sources(&path).unwrap();
        assert_eq!(sources.len(), 1);
        assert!(!sources[0].numbered);
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_sources(&dir.path().join("absent")).unwrap_err();
        assert!(err.to_string().contains("directory or file path"));
    }
}
