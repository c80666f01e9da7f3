//! Text rendering of the proposal index.
//!
//! The column layout is consumed by downstream renderers, so line shapes
//! here are stable: ` TS NNNN  <title padded to width> <authors>`.

use crate::config::IndexConfig;
use crate::index::category::CategorizedReps;
use crate::index::roster::{mask_email, Roster};
use crate::model::rep::{Rep, RepStatus, RepType};
use unicode_normalization::UnicodeNormalization;

const NAME_HEADER: &str = "name";
const EMAIL_HEADER: &str = "email address";

/// Formats one row of the fixed-width listing.
pub fn column_line(
    type_code: &str,
    status_code: &str,
    number: &str,
    title: &str,
    authors: &str,
    title_width: usize,
) -> String {
    format!(" {type_code:<1}{status_code:<1} {number:>4}  {title:<title_width$} {authors}")
}

/// Listing row for one proposal.
pub fn rep_line(rep: &Rep, title_width: usize) -> String {
    column_line(
        &rep.type_abbr().to_string(),
        &rep.status_abbr().to_string(),
        &rep.number.to_string(),
        &rep.title_abbr(title_width),
        &rep.author_abbr(),
        title_width,
    )
}

/// Column header row and its dashed underline.
pub fn column_headers(title_width: usize) -> [String; 2] {
    let headers = ["", "", "num", "title", "owner"];
    let underline = headers.map(|header| "-".repeat(header.len()));
    [
        column_line(
            headers[0], headers[1], headers[2], headers[3], headers[4], title_width,
        ),
        column_line(
            &underline[0],
            &underline[1],
            &underline[2],
            &underline[3],
            &underline[4],
            title_width,
        ),
    ]
}

/// Line-oriented report buffer.
#[derive(Debug, Default)]
pub(crate) struct ReportWriter {
    out: String,
}

impl ReportWriter {
    pub(crate) fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub(crate) fn blank(&mut self) {
        self.out.push('\n');
    }

    pub(crate) fn lines(&mut self, text: &str) {
        for line in text.lines() {
            self.line(line);
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

/// Proposals by number with one blank line before each numbering gap.
///
/// Numbering is taken to start at 1, so a set whose first number is above 1
/// also opens with a blank line.
pub fn numerical_listing(reps: &[Rep], title_width: usize) -> Vec<String> {
    let mut sorted: Vec<&Rep> = reps.iter().collect();
    sorted.sort_by_key(|rep| rep.number);

    let mut lines = Vec::with_capacity(sorted.len());
    let mut previous = 0_u64;
    for rep in sorted {
        if u64::from(rep.number) > previous + 1 {
            lines.push(String::new());
        }
        lines.push(rep_line(rep, title_width));
        previous = u64::from(rep.number);
    }
    lines
}

/// Letter legend for types and statuses.
pub fn key_lines() -> (Vec<String>, Vec<String>) {
    let types = RepType::ALL
        .into_iter()
        .map(|kind| format!("    {} - {} REP", kind.abbreviation(), kind.as_str()))
        .collect();
    let statuses = RepStatus::ALL
        .into_iter()
        .map(|status| {
            let letter = status.as_str().chars().next().unwrap_or(' ');
            format!("    {letter} - {} proposal", status.as_str())
        })
        .collect();
    (types, statuses)
}

/// Owner table: header, underline, then one row per roster entry.
///
/// The name column is as wide as the longest NFC-normalized name.
pub fn roster_lines(roster: &Roster, config: &IndexConfig) -> Vec<String> {
    let width = roster
        .entries()
        .iter()
        .map(|entry| entry.author.last_first.nfc().count())
        .chain(std::iter::once(NAME_HEADER.len()))
        .max()
        .unwrap_or(NAME_HEADER.len());

    let mut lines = vec![
        format!("    {NAME_HEADER:<width$}  {EMAIL_HEADER}"),
        format!(
            "    {:<width$}  {}",
            "-".repeat(NAME_HEADER.len()),
            "-".repeat(EMAIL_HEADER.len())
        ),
    ];
    for entry in roster.entries() {
        let email = if config.mask_emails {
            mask_email(&entry.email, &config.unmasked_addresses)
        } else {
            entry.email.clone()
        };
        lines.push(format!("    {:<width$}  {email}", entry.author.last_first));
    }
    lines
}

/// Renders the complete index document.
///
/// `reps` must already be sorted by number; `last_modified` is written
/// verbatim into the document header.
pub(crate) fn render_document(
    reps: &[Rep],
    categorized: &CategorizedReps<'_>,
    roster: &Roster,
    last_modified: &str,
    config: &IndexConfig,
) -> String {
    let width = config.title_width;
    let mut out = ReportWriter::default();

    out.line("REP: 0");
    out.line(&format!("Title: {}", config.title));
    out.line(&format!("Last-Modified: {last_modified}"));
    out.line(&format!("Author: {}", config.author));
    out.line(&format!("Status: {}", RepStatus::Active.as_str()));
    out.line(&format!("Type: {}", RepType::Informational.as_str()));
    out.line(&format!("Created: {}", config.created));
    out.blank();
    out.blank();

    out.line("Introduction");
    out.blank();
    out.lines(&config.intro);
    out.blank();
    out.blank();
    out.blank();

    out.line("Index by Category");
    out.blank();
    for header in column_headers(width) {
        out.line(&header);
    }
    for (category, group) in categorized.iter() {
        out.blank();
        out.line(&format!(" {}", category.caption()));
        out.blank();
        for rep in group {
            out.line(&rep_line(rep, width));
        }
    }
    out.blank();
    out.blank();

    out.line(" Numerical Index");
    out.blank();
    for header in column_headers(width) {
        out.line(&header);
    }
    for line in numerical_listing(reps, width) {
        out.line(&line);
    }
    out.blank();
    out.blank();

    out.line("Key");
    out.blank();
    let (type_keys, status_keys) = key_lines();
    for line in type_keys {
        out.line(&line);
    }
    out.blank();
    for line in status_keys {
        out.line(&line);
    }
    out.blank();
    out.blank();

    out.line("Owners");
    out.blank();
    for line in roster_lines(roster, config) {
        out.line(&line);
    }
    out.blank();
    out.blank();

    out.line("References");
    out.blank();
    out.blank();
    out.lines(&config.references);
    out.blank();
    out.blank();
    out.lines(&config.footer);

    out.finish()
}
