//! Classify-and-relocate: the core of bucketdir.
//!
//! A run lists the immediate entries of a directory, computes a bucket key for
//! every regular file, groups the files by key and finally moves each group
//! into a subdirectory named after its key. The run is a single best-effort
//! pass: the first I/O error stops it and moves already made stay in place.

use crate::criteria::Criteria;
use crate::output::OutputFormatter;
use log::{debug, info};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// A regular file found by the scan.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// The file name as listed in the directory.
    pub name: OsString,
    /// The full path to the file.
    pub path: PathBuf,
}

/// Files sharing a bucket key, in listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// The bucket key, also the destination subdirectory name.
    pub key: String,
    /// Names of the files in this bucket.
    pub files: Vec<OsString>,
}

/// Buckets in the order their keys were first seen.
#[derive(Debug, Clone, Default)]
pub struct Buckets {
    buckets: Vec<Bucket>,
    index: HashMap<String, usize>,
}

impl Buckets {
    /// Creates an empty grouping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a file to the bucket for `key`, opening the bucket on first sight.
    pub fn insert(&mut self, key: String, file: OsString) {
        match self.index.get(&key) {
            Some(&position) => self.buckets[position].files.push(file),
            None => {
                self.index.insert(key.clone(), self.buckets.len());
                self.buckets.push(Bucket {
                    key,
                    files: vec![file],
                });
            }
        }
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no file was grouped.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of files across all buckets.
    pub fn file_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.files.len()).sum()
    }

    /// Iterates buckets in first-seen order.
    pub fn iter(&self) -> std::slice::Iter<'_, Bucket> {
        self.buckets.iter()
    }

    /// Consumes the grouping, returning the ordered buckets.
    pub fn into_vec(self) -> Vec<Bucket> {
        self.buckets
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct OrganizeReport {
    /// The directory that was organized.
    pub directory: PathBuf,
    /// The strategy used.
    pub criteria: Criteria,
    /// Buckets in the order they were processed.
    pub buckets: Vec<Bucket>,
}

impl OrganizeReport {
    /// Number of files moved.
    pub fn moved_files(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.files.len()).sum()
    }

    /// The one-line confirmation shown after a run.
    pub fn confirmation(&self) -> String {
        format!(
            "Files in '{}' organized by {}.",
            self.directory.display(),
            self.criteria.description()
        )
    }

    /// File counts per bucket key.
    pub fn bucket_counts(&self) -> HashMap<String, usize> {
        self.buckets
            .iter()
            .map(|bucket| (bucket.key.clone(), bucket.files.len()))
            .collect()
    }
}

/// Errors that can occur while organizing a directory.
///
/// `Display` renders the underlying I/O error unchanged; [`OrganizeError::path`]
/// tells which path it concerned.
#[derive(Debug)]
pub enum OrganizeError {
    /// The target directory could not be listed.
    ReadDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The metadata a strategy needs could not be read.
    ReadMetadata {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a bucket directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file into its bucket directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
}

impl OrganizeError {
    /// The path the failed operation was acting on.
    pub fn path(&self) -> &Path {
        match self {
            Self::ReadDirectory { path, .. }
            | Self::ReadMetadata { path, .. }
            | Self::DirectoryCreationFailed { path, .. } => path,
            Self::FileMoveFailure { source, .. } => source,
        }
    }

    /// The underlying I/O error.
    pub fn io_error(&self) -> &std::io::Error {
        match self {
            Self::ReadDirectory { source, .. }
            | Self::ReadMetadata { source, .. }
            | Self::DirectoryCreationFailed { source, .. } => source,
            Self::FileMoveFailure { source_error, .. } => source_error,
        }
    }
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.io_error())
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.io_error())
    }
}

/// Result type for organize operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Groups the regular files of a directory and moves them into bucket directories.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Organizes `directory` with the given strategy.
    ///
    /// Scans and classifies every regular file first, then creates bucket
    /// directories and moves files group by group.
    ///
    /// # Errors
    ///
    /// Returns the first I/O error hit. Files moved before it stay moved.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bucketdir::criteria::Criteria;
    /// use bucketdir::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// match FileOrganizer::organize(Path::new("/path/to/downloads"), Criteria::Type) {
    ///     Ok(report) => println!("{}", report.confirmation()),
    ///     Err(e) => eprintln!("Error: {}", e),
    /// }
    /// ```
    pub fn organize(directory: &Path, criteria: Criteria) -> OrganizeResult<OrganizeReport> {
        let buckets = Self::classify(directory, criteria)?;
        Self::relocate(directory, &buckets, |_| {})?;

        Ok(OrganizeReport {
            directory: directory.to_path_buf(),
            criteria,
            buckets: buckets.into_vec(),
        })
    }

    /// Organizes `directory` using a strategy given by name.
    ///
    /// An unknown name is reported and nothing is touched; the result is
    /// then `Ok(None)`.
    pub fn organize_by_name(
        directory: &Path,
        criteria_name: &str,
    ) -> OrganizeResult<Option<OrganizeReport>> {
        match criteria_name.parse::<Criteria>() {
            Ok(criteria) => Self::organize(directory, criteria).map(Some),
            Err(unsupported) => {
                OutputFormatter::warning(&unsupported.to_string());
                Ok(None)
            }
        }
    }

    /// Lists the regular files directly under `directory`.
    ///
    /// Directories, symlinks and other special entries are skipped; symlinks
    /// are not followed.
    pub fn scan(directory: &Path) -> OrganizeResult<Vec<ScannedFile>> {
        let read_dir_error = |source| OrganizeError::ReadDirectory {
            path: directory.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(directory).map_err(read_dir_error)? {
            let entry = entry.map_err(read_dir_error)?;
            let file_type = entry.file_type().map_err(|source| OrganizeError::ReadMetadata {
                path: entry.path(),
                source,
            })?;

            if file_type.is_file() {
                files.push(ScannedFile {
                    name: entry.file_name(),
                    path: entry.path(),
                });
            } else {
                debug!("Skipping non-regular entry {}", entry.path().display());
            }
        }
        Ok(files)
    }

    /// Scans `directory` and groups its regular files by bucket key.
    pub fn classify(directory: &Path, criteria: Criteria) -> OrganizeResult<Buckets> {
        let mut buckets = Buckets::new();
        for file in Self::scan(directory)? {
            let metadata_error = |source| OrganizeError::ReadMetadata {
                path: file.path.clone(),
                source,
            };
            let metadata = fs::symlink_metadata(&file.path).map_err(metadata_error)?;
            let key = criteria
                .bucket_key(&file.name.to_string_lossy(), &metadata)
                .map_err(metadata_error)?;
            buckets.insert(key, file.name);
        }
        info!(
            "{} files in {} buckets under {}",
            buckets.file_count(),
            buckets.len(),
            directory.display()
        );
        Ok(buckets)
    }

    /// Creates bucket directories and moves every grouped file into its bucket.
    ///
    /// `on_move` is called after each successful move with the new path.
    pub fn relocate<F>(directory: &Path, buckets: &Buckets, mut on_move: F) -> OrganizeResult<()>
    where
        F: FnMut(&Path),
    {
        for bucket in buckets.iter() {
            let bucket_dir = Self::ensure_bucket_dir(directory, &bucket.key)?;
            for name in &bucket.files {
                let moved = Self::move_into(&directory.join(name), &bucket_dir)?;
                on_move(&moved);
            }
        }
        Ok(())
    }

    /// Returns `directory/<key>`, creating it when no directory of that name exists.
    ///
    /// A plain file with the bucket's name makes the creation fail.
    pub fn ensure_bucket_dir(directory: &Path, key: &str) -> OrganizeResult<PathBuf> {
        let bucket_dir = directory.join(key);
        if !bucket_dir.is_dir() {
            fs::create_dir(&bucket_dir).map_err(|e| {
                debug!("Could not create {}: {}", bucket_dir.display(), e);
                OrganizeError::DirectoryCreationFailed {
                    path: bucket_dir.clone(),
                    source: e,
                }
            })?;
            info!("Created bucket directory {}", bucket_dir.display());
        }
        Ok(bucket_dir)
    }

    /// Moves `file_path` into `bucket_dir`, keeping its name. Returns the new path.
    ///
    /// An existing file at the destination is handled by [`fs::rename`] alone.
    pub fn move_into(file_path: &Path, bucket_dir: &Path) -> OrganizeResult<PathBuf> {
        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::FileMoveFailure {
                source: file_path.to_path_buf(),
                destination: bucket_dir.to_path_buf(),
                source_error: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            })?;
        let destination = bucket_dir.join(file_name);

        fs::rename(file_path, &destination).map_err(|e| {
            debug!(
                "Could not move {} to {}: {}",
                file_path.display(),
                destination.display(),
                e
            );
            OrganizeError::FileMoveFailure {
                source: file_path.to_path_buf(),
                destination: destination.clone(),
                source_error: e,
            }
        })?;

        debug!("Moved {} -> {}", file_path.display(), destination.display());
        Ok(destination)
    }
}
