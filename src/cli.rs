//! Command-line interface module for bucketdir.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Deciding on colored output from flags and settings
//! - Running the organizer and printing its confirmation

use crate::config::Settings;
use crate::criteria::Criteria;
use crate::file_organizer::{FileOrganizer, OrganizeReport, OrganizeResult};
use crate::output::OutputFormatter;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Sort the loose files of a directory into subdirectories.
#[derive(Debug, Clone, Parser)]
#[command(name = "bucketdir", version, about, long_about = None)]
pub struct Cli {
    /// The directory to organize
    pub directory: PathBuf,

    /// Criteria for organizing files
    #[arg(long, value_enum, default_value_t = Criteria::Type)]
    pub criteria: Criteria,

    /// Settings file to read instead of the default locations
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print a per-bucket file count after organizing
    #[arg(long)]
    pub summary: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Runs the CLI application with parsed arguments.
///
/// # Examples
///
/// ```no_run
/// use bucketdir::cli::{run_cli, Cli};
/// use clap::Parser;
///
/// let cli = Cli::parse_from(["bucketdir", "/path/to/directory", "--criteria", "size"]);
/// if let Err(e) = run_cli(&cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<(), String> {
    OutputFormatter::set_color_enabled(color_enabled(cli));

    let report = organize_directory(&cli.directory, cli.criteria).map_err(|e| {
        log::debug!("Organizing stopped at {}", e.path().display());
        e.to_string()
    })?;

    OutputFormatter::success(&report.confirmation());
    if cli.summary {
        OutputFormatter::summary_table(&report.bucket_counts(), report.moved_files());
    }
    Ok(())
}

/// Whether output may be colored. Settings are only read when `--no-color`
/// is absent, and a broken settings file never stops a run.
fn color_enabled(cli: &Cli) -> bool {
    !cli.no_color && Settings::load_or_default(cli.config.as_deref()).organize.color
}

/// Organizes `directory`, showing move progress on stderr.
///
/// Returns the report without printing it.
pub fn organize_directory(
    directory: &Path,
    criteria: Criteria,
) -> OrganizeResult<OrganizeReport> {
    let buckets = FileOrganizer::classify(directory, criteria)?;
    let pb = OutputFormatter::create_progress_bar(buckets.file_count() as u64);
    let moved = FileOrganizer::relocate(directory, &buckets, |path| {
        if let Some(name) = path.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }
        pb.inc(1);
    });
    pb.finish_and_clear();
    moved?;

    Ok(OrganizeReport {
        directory: directory.to_path_buf(),
        criteria,
        buckets: buckets.into_vec(),
    })
}
