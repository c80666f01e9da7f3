use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use reptools_core::{
    core_version, default_log_level, init_logging, parse_source, IndexConfig, Rep, RepError,
    RepIndex,
};

use crate::scan::{collect_sources, SourceText};

const DEFAULT_OUTPUT: &str = "rep-0000.txt";

#[derive(Debug, Parser)]
#[command(
    name = "repindex",
    version = core_version(),
    about = "Validate REP headers and generate the REP index"
)]
pub struct Cli {
    #[command(flatten)]
    logging: LoggingArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse every proposal and write the index document
    Index(IndexArgs),
    /// Parse and cross-check every proposal without writing anything
    Check(CheckArgs),
}

#[derive(Debug, Args, Clone)]
struct LoggingArgs {
    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files; logs go to stderr otherwise
    #[arg(long, global = true)]
    log_dir: Option<String>,
}

#[derive(Debug, Args, Clone)]
struct IndexArgs {
    /// Directory of rep-NNNN.txt files, or a single proposal file
    #[arg(value_name = "PATH", default_value = ".")]
    path: PathBuf,
    /// Output file; `-` writes to stdout
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: String,
    /// Last-Modified date for the index header (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// TOML file overriding index layout and prose
    #[arg(long)]
    config: Option<PathBuf>,
    /// Report invalid proposals and leave them out instead of aborting
    #[arg(long)]
    skip_invalid: bool,
}

#[derive(Debug, Args, Clone)]
struct CheckArgs {
    #[arg(value_name = "PATH", default_value = ".")]
    path: PathBuf,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        self.logging.init()?;
        match self.command {
            Command::Index(args) => run_index(args),
            Command::Check(args) => run_check(args),
        }
    }
}

impl LoggingArgs {
    fn init(&self) -> Result<()> {
        let level = match (&self.log_level, &self.log_dir) {
            (Some(level), _) => level.as_str(),
            (None, Some(_)) => default_log_level(),
            (None, None) => "warn",
        };
        init_logging(level, self.log_dir.as_deref()).map_err(anyhow::Error::msg)
    }
}

fn run_index(args: IndexArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => IndexConfig::load(path)?,
        None => IndexConfig::default(),
    };
    let sources = collect_sources(&args.path)?;
    let (reps, skipped) = parse_for_index(&sources, args.skip_invalid)?;
    for message in &skipped {
        eprintln!("{message}");
    }

    let index = RepIndex::build(reps)?;
    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive())
        .format("%Y-%m-%d")
        .to_string();
    let report = index.render(&date, &config);

    emit_report(&args.output, &report, &mut std::io::stdout().lock())?;
    info!(
        "event=index_write module=cli status=ok reps={} output={}",
        index.reps().len(),
        args.output
    );
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    let sources = collect_sources(&args.path)?;

    let mut reps = Vec::with_capacity(sources.len());
    let mut failures = 0_usize;
    for source in &sources {
        match parse(source) {
            Ok(rep) => reps.push(rep),
            Err(err) => {
                failures += 1;
                eprintln!("{err}");
            }
        }
    }

    let parsed = reps.len();
    if let Err(err) = RepIndex::build(reps) {
        failures += 1;
        eprintln!("{err}");
    }

    if failures > 0 {
        bail!("{failures} problem(s) found in {} source(s)", sources.len());
    }
    println!("{parsed} REP(s) OK");
    Ok(())
}

/// Parses every source under the abort/skip policy.
///
/// Returns the parsed proposals and one message per skipped source.
fn parse_for_index(
    sources: &[SourceText],
    skip_invalid: bool,
) -> Result<(Vec<Rep>, Vec<String>)> {
    let mut reps = Vec::with_capacity(sources.len());
    let mut skipped = Vec::new();
    for source in sources {
        match parse(source) {
            Ok(rep) => reps.push(rep),
            Err(err) if skip_invalid => {
                warn!(
                    "event=rep_skip module=cli status=error source={}",
                    err.source_id
                );
                skipped.push(excluding_message(&err));
            }
            Err(err) => bail!("{}", excluding_message(&err)),
        }
    }
    Ok((reps, skipped))
}

fn parse(source: &SourceText) -> Result<Rep, RepError> {
    if source.numbered {
        parse_source(&source.source_id, &source.text)
    } else {
        Rep::parse(&source.source_id, &source.text)
    }
}

fn excluding_message(err: &RepError) -> String {
    let number = err
        .number
        .map(|number| number.to_string())
        .unwrap_or_else(|| "?".to_string());
    format!(
        "Error processing REP {number} ({}), excluding: {err}",
        err.source_id
    )
}

/// Writes the report to `output`, or to `stdout` when `output` is `-`.
fn emit_report(output: &str, report: &str, stdout: &mut impl Write) -> Result<()> {
    if output == "-" {
        return stdout
            .write_all(report.as_bytes())
            .context("failed to write report to stdout");
    }
    let path = Path::new(output);
    std::fs::write(path, report).with_context(|| format!("failed to write `{}`", path.display()))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD, got `{raw}`: {err}"))
}
