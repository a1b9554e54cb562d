// ABOUTME: Timestamped archive file names and the release stems derived from them.
// ABOUTME: Stems split on the first dot, so "a.b.tgz" yields "a".

use chrono::NaiveDateTime;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Extension given to every packed archive.
pub const ARCHIVE_EXTENSION: &str = "tgz";

/// Second-resolution timestamp embedded in archive names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Error)]
pub enum ArchiveNameError {
    #[error("archive path has no file name: {0}")]
    NoFileName(String),

    #[error("archive file name is not valid UTF-8: {0}")]
    NotUtf8(String),

    #[error("archive file name has an empty stem: {0}")]
    EmptyStem(String),
}

/// File name of a packed archive, e.g. `web_static_20240101120000.tgz`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveName(String);

impl ArchiveName {
    /// Build the name for an archive packed at `at`.
    pub fn for_timestamp(prefix: &str, at: NaiveDateTime) -> Self {
        Self(format!(
            "{}_{}.{}",
            prefix,
            at.format(TIMESTAMP_FORMAT),
            ARCHIVE_EXTENSION
        ))
    }

    /// Take the last segment of `path` as the archive name.
    pub fn from_path(path: &Path) -> Result<Self, ArchiveNameError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| ArchiveNameError::NoFileName(path.display().to_string()))?;
        let file_name = file_name
            .to_str()
            .ok_or_else(|| ArchiveNameError::NotUtf8(path.display().to_string()))?;

        let name = Self(file_name.to_string());
        if name.stem().is_empty() {
            return Err(ArchiveNameError::EmptyStem(file_name.to_string()));
        }
        Ok(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the first dot. Names the release directory.
    pub fn stem(&self) -> &str {
        self.0.split('.').next().unwrap_or_default()
    }
}

impl fmt::Display for ArchiveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
