//! Classification strategies for grouping files into buckets.
//!
//! Every strategy is a pure function from a file name and its metadata to a
//! bucket key, which doubles as the name of the destination subdirectory.
//!
//! # Examples
//!
//! ```
//! use bucketdir::criteria::{type_key, SizeRange};
//!
//! assert_eq!(type_key("report.pdf"), "PDF");
//! assert_eq!(type_key("readme"), "README");
//! assert_eq!(SizeRange::from_len(1_048_576).label(), "1MB-10MB");
//! ```

use chrono::{DateTime, Local};
use std::fmt;
use std::fs::Metadata;
use std::io;
use std::str::FromStr;

const MIB: u64 = 1024 * 1024;
const GIB: u64 = 1024 * MIB;

/// The criterion used to build bucket keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Criteria {
    /// Uppercased file extension.
    Type,
    /// One of five fixed size ranges.
    Size,
    /// Last modification date in local time.
    Date,
    /// Creation date in local time. See [`creation_time`] for what "creation"
    /// means on each platform. Not offered by `--criteria`.
    #[value(skip)]
    CreationDate,
}

impl Criteria {
    /// Every strategy, in declaration order.
    pub const ALL: [Criteria; 4] = [
        Criteria::Type,
        Criteria::Size,
        Criteria::Date,
        Criteria::CreationDate,
    ];

    /// The name accepted by [`Criteria::from_str`].
    pub fn name(&self) -> &'static str {
        match self {
            Criteria::Type => "type",
            Criteria::Size => "size",
            Criteria::Date => "date",
            Criteria::CreationDate => "creation-date",
        }
    }

    /// Human-readable phrase used in the confirmation message.
    pub fn description(&self) -> &'static str {
        match self {
            Criteria::Type => "file type",
            Criteria::Size => "size",
            Criteria::Date => "modification date",
            Criteria::CreationDate => "creation date",
        }
    }

    /// Computes the bucket key for a regular file.
    ///
    /// # Errors
    ///
    /// Fails when the platform cannot report the timestamp the date
    /// strategies need.
    pub fn bucket_key(&self, file_name: &str, metadata: &Metadata) -> io::Result<String> {
        match self {
            Criteria::Type => Ok(type_key(file_name)),
            Criteria::Size => Ok(SizeRange::from_len(metadata.len()).label().to_string()),
            Criteria::Date => Ok(date_key(DateTime::from(metadata.modified()?))),
            Criteria::CreationDate => Ok(date_key(creation_time(metadata)?)),
        }
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A criteria name that maps to no strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedCriteria(pub String);

impl fmt::Display for UnsupportedCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Criteria '{}' is not supported yet.", self.0)
    }
}

impl std::error::Error for UnsupportedCriteria {}

impl FromStr for Criteria {
    type Err = UnsupportedCriteria;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Criteria::ALL
            .into_iter()
            .find(|criteria| criteria.name() == s)
            .ok_or_else(|| UnsupportedCriteria(s.to_string()))
    }
}

/// Returns the uppercased text after the last `.` of a file name.
///
/// A name without any `.` is used whole, so `readme` maps to `README`.
/// Callers pass names through `to_string_lossy`, so bytes that are not valid
/// UTF-8 show up as `U+FFFD` in the key and hence in the bucket directory name.
pub fn type_key(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .unwrap_or(file_name)
        .to_uppercase()
}

/// Fixed, half-open size ranges. Together they cover every possible length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeRange {
    /// `[0, 1 MiB)`
    UnderOneMb,
    /// `[1 MiB, 10 MiB)`
    OneToTenMb,
    /// `[10 MiB, 100 MiB)`
    TenToHundredMb,
    /// `[100 MiB, 1 GiB)`
    HundredMbToOneGb,
    /// `[1 GiB, ∞)`
    OverOneGb,
}

impl SizeRange {
    /// Ranges in ascending order of their lower bound.
    pub const ALL: [SizeRange; 5] = [
        SizeRange::UnderOneMb,
        SizeRange::OneToTenMb,
        SizeRange::TenToHundredMb,
        SizeRange::HundredMbToOneGb,
        SizeRange::OverOneGb,
    ];

    /// Inclusive lower and exclusive upper bound in bytes. `None` means unbounded.
    pub fn bounds(&self) -> (u64, Option<u64>) {
        match self {
            SizeRange::UnderOneMb => (0, Some(MIB)),
            SizeRange::OneToTenMb => (MIB, Some(10 * MIB)),
            SizeRange::TenToHundredMb => (10 * MIB, Some(100 * MIB)),
            SizeRange::HundredMbToOneGb => (100 * MIB, Some(GIB)),
            SizeRange::OverOneGb => (GIB, None),
        }
    }

    /// Directory name for this range.
    pub fn label(&self) -> &'static str {
        match self {
            SizeRange::UnderOneMb => "0-1MB",
            SizeRange::OneToTenMb => "1MB-10MB",
            SizeRange::TenToHundredMb => "10MB-100MB",
            SizeRange::HundredMbToOneGb => "100MB-1GB",
            SizeRange::OverOneGb => "1GB+",
        }
    }

    /// Finds the first range with `min <= len < max`.
    pub fn from_len(len: u64) -> SizeRange {
        Self::ALL
            .into_iter()
            .find(|range| match range.bounds() {
                (min, Some(max)) => min <= len && len < max,
                (min, None) => min <= len,
            })
            .unwrap_or(SizeRange::OverOneGb)
    }
}

/// Formats a timestamp as `YYYY-MM-DD`.
pub fn date_key(time: DateTime<Local>) -> String {
    time.format("%Y-%m-%d").to_string()
}

/// Returns the timestamp used by [`Criteria::CreationDate`].
///
/// On Unix this is the inode status-change time (`st_ctime`), which moves on
/// chmod, rename or link changes and is not a true birth time. Other
/// platforms report the file system creation time via [`Metadata::created`].
#[cfg(unix)]
pub fn creation_time(metadata: &Metadata) -> io::Result<DateTime<Local>> {
    use std::os::unix::fs::MetadataExt;

    let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
    DateTime::from_timestamp(metadata.ctime(), nanos)
        .map(|utc| utc.with_timezone(&Local))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "status-change time out of range",
            )
        })
}

/// Returns the timestamp used by [`Criteria::CreationDate`].
///
/// On Unix this is the inode status-change time (`st_ctime`), which moves on
/// chmod, rename or link changes and is not a true birth time. Other
/// platforms report the file system creation time via [`Metadata::created`].
#[cfg(not(unix))]
pub fn creation_time(metadata: &Metadata) -> io::Result<DateTime<Local>> {
    let created: std::time::SystemTime = metadata.created()?;
    Ok(DateTime::from(created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_type_key_uses_last_segment() {
        assert_eq!(type_key("a.txt"), "TXT");
        assert_eq!(type_key("b.TXT"), "TXT");
        assert_eq!(type_key("archive.tar.gz"), "GZ");
        assert_eq!(type_key(".bashrc"), "BASHRC");
    }

    #[test]
    fn test_type_key_without_extension_uses_whole_name() {
        assert_eq!(type_key("readme"), "README");
        assert_eq!(type_key("Makefile"), "MAKEFILE");
    }

    #[test]
    fn test_type_key_trailing_dot_is_empty() {
        assert_eq!(type_key("notes."), "");
    }

    #[test]
    fn test_size_range_boundaries() {
        assert_eq!(SizeRange::from_len(0), SizeRange::UnderOneMb);
        assert_eq!(SizeRange::from_len(MIB - 1), SizeRange::UnderOneMb);
        assert_eq!(SizeRange::from_len(MIB), SizeRange::OneToTenMb);
        assert_eq!(SizeRange::from_len(10 * MIB), SizeRange::TenToHundredMb);
        assert_eq!(SizeRange::from_len(100 * MIB), SizeRange::HundredMbToOneGb);
        assert_eq!(SizeRange::from_len(GIB - 1), SizeRange::HundredMbToOneGb);
        assert_eq!(SizeRange::from_len(GIB), SizeRange::OverOneGb);
        assert_eq!(SizeRange::from_len(u64::MAX), SizeRange::OverOneGb);
    }

    #[test]
    fn test_size_ranges_are_contiguous() {
        let mut expected_min = 0;
        for range in SizeRange::ALL {
            let (min, max) = range.bounds();
            assert_eq!(min, expected_min, "gap before {}", range.label());
            match max {
                Some(max) => expected_min = max,
                None => assert_eq!(range, SizeRange::OverOneGb),
            }
        }
    }

    #[test]
    fn test_date_key_format() {
        let time = Local.with_ymd_and_hms(2024, 3, 7, 23, 59, 0).unwrap();
        assert_eq!(date_key(time), "2024-03-07");
    }

    #[test]
    fn test_criteria_from_str() {
        assert_eq!("type".parse::<Criteria>(), Ok(Criteria::Type));
        assert_eq!("size".parse::<Criteria>(), Ok(Criteria::Size));
        assert_eq!("date".parse::<Criteria>(), Ok(Criteria::Date));
        assert_eq!(
            "creation-date".parse::<Criteria>(),
            Ok(Criteria::CreationDate)
        );
        assert_eq!(
            "color".parse::<Criteria>(),
            Err(UnsupportedCriteria("color".to_string()))
        );
    }

    #[test]
    fn test_cli_values_hide_creation_date() {
        use clap::ValueEnum;

        let names: Vec<_> = Criteria::value_variants()
            .iter()
            .filter_map(|c| c.to_possible_value())
            .filter(|v| !v.is_hide_set())
            .map(|v| v.get_name().to_string())
            .collect();
        assert_eq!(names, vec!["type", "size", "date"]);
    }

    #[test]
    fn test_bucket_key_reads_metadata() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("clip.mp4");
        std::fs::write(&path, vec![0u8; 2048]).expect("Failed to write test file");
        let metadata = std::fs::metadata(&path).expect("Failed to read metadata");

        assert_eq!(Criteria::Type.bucket_key("clip.mp4", &metadata).unwrap(), "MP4");
        assert_eq!(Criteria::Size.bucket_key("clip.mp4", &metadata).unwrap(), "0-1MB");

        let modified = DateTime::<Local>::from(metadata.modified().unwrap());
        assert_eq!(
            Criteria::Date.bucket_key("clip.mp4", &metadata).unwrap(),
            date_key(modified)
        );

        let created = creation_time(&metadata).unwrap();
        assert_eq!(
            Criteria::CreationDate.bucket_key("clip.mp4", &metadata).unwrap(),
            date_key(created)
        );
    }
}
