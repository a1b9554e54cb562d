// ABOUTME: Error types for packing and inspecting archives.
// ABOUTME: Packing failures carry the path involved and the underlying cause.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("content directory not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("content directory has no usable name: {}", .0.display())]
    UnnamedSource(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PackError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        PackError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Ways an archive can fail to have exactly one top-level directory.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive is empty")]
    Empty,

    #[error("archive has a file at its top level: {0}")]
    LooseFile(String),

    #[error("archive has more than one top-level directory: {}", .0.join(", "))]
    MultipleRoots(Vec<String>),
}

pub type Result<T> = std::result::Result<T, PackError>;
