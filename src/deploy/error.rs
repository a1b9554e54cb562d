// ABOUTME: Step-tagged error types for deploying an archive to one host.
// ABOUTME: Tells callers which step failed and whether a retry is safe.

use crate::archive::LayoutError;
use crate::remote::RemoteError;
use crate::types::ArchiveNameError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while deploying an archive.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The archive path does not name an existing local file.
    #[error("archive not found: {}", .0.display())]
    ArchiveMissing(PathBuf),

    /// The archive file name cannot yield a release name.
    #[error("invalid archive name: {0}")]
    ArchiveName(#[from] ArchiveNameError),

    /// The archive is not laid out as one top-level directory.
    #[error("unexpected archive layout in {}: {source}", path.display())]
    ArchiveLayout {
        path: PathBuf,
        #[source]
        source: LayoutError,
    },

    /// Copying the archive to the host failed.
    #[error("failed to upload archive: {0}")]
    Upload(#[source] RemoteError),

    /// Creating the release directory failed.
    #[error("failed to create release directory: {0}")]
    Provision(#[source] RemoteError),

    /// Unpacking the archive on the host failed.
    #[error("failed to extract archive: {0}")]
    Extract(#[source] RemoteError),

    /// Removing the uploaded archive failed.
    #[error("failed to remove uploaded archive: {0}")]
    Cleanup(#[source] RemoteError),

    /// Moving content out of the nested directory failed.
    #[error("failed to flatten release: {0}")]
    Flatten(#[source] RemoteError),

    /// Repointing `current` failed.
    #[error("failed to activate release: {0}")]
    Activation(#[source] RemoteError),

    /// Deploy lock held by another process.
    #[error("deploy lock held by {holder} (pid {pid}) since {started_at}")]
    LockHeld {
        holder: String,
        pid: u32,
        started_at: DateTime<Utc>,
    },

    /// Deploy lock could not be taken or read.
    #[error("deploy lock error: {0}")]
    Lock(String),
}

/// The deploy step an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Precondition,
    Upload,
    Provision,
    Extract,
    Cleanup,
    Flatten,
    Activation,
    Lock,
}

impl fmt::Display for DeployErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeployErrorKind::Precondition => "precondition",
            DeployErrorKind::Upload => "upload",
            DeployErrorKind::Provision => "provision",
            DeployErrorKind::Extract => "extract",
            DeployErrorKind::Cleanup => "cleanup",
            DeployErrorKind::Flatten => "flatten",
            DeployErrorKind::Activation => "activation",
            DeployErrorKind::Lock => "lock",
        };
        f.write_str(name)
    }
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::ArchiveMissing(_)
            | DeployError::ArchiveName(_)
            | DeployError::ArchiveLayout { .. } => DeployErrorKind::Precondition,
            DeployError::Upload(_) => DeployErrorKind::Upload,
            DeployError::Provision(_) => DeployErrorKind::Provision,
            DeployError::Extract(_) => DeployErrorKind::Extract,
            DeployError::Cleanup(_) => DeployErrorKind::Cleanup,
            DeployError::Flatten(_) => DeployErrorKind::Flatten,
            DeployError::Activation(_) => DeployErrorKind::Activation,
            DeployError::LockHeld { .. } | DeployError::Lock(_) => DeployErrorKind::Lock,
        }
    }

    /// True when the failure happened before anything outside the temp
    /// directory changed on the host, so the deploy can simply be rerun.
    pub fn is_retry_safe(&self) -> bool {
        matches!(
            self.kind(),
            DeployErrorKind::Precondition | DeployErrorKind::Upload | DeployErrorKind::Lock
        )
    }
}
