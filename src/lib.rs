//! bucketdir - sort the loose files of a directory into subdirectories
//!
//! This library classifies the regular files directly under a directory by
//! extension, size range or date, then moves each file into a subdirectory
//! named after its bucket.

pub mod cli;
pub mod config;
pub mod criteria;
pub mod file_organizer;
pub mod output;

pub use config::{ConfigError, Settings};
pub use criteria::{Criteria, SizeRange, UnsupportedCriteria};
pub use file_organizer::{Bucket, FileOrganizer, OrganizeError, OrganizeReport, OrganizeResult};

pub use cli::{Cli, run_cli};
