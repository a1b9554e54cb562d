// ABOUTME: Application-wide error types for webship.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::archive::PackError;
use crate::deploy::DeployError;
use crate::remote::RemoteError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("unknown destination: {0}")]
    UnknownDestination(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("packaging failed: {0}")]
    Pack(#[from] PackError),

    #[error("deploy failed at {kind} step: {0}", kind = .0.kind())]
    Deploy(#[from] DeployError),

    #[error("SSH error: {0}")]
    Ssh(#[from] crate::ssh::Error),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("{failed} of {total} host(s) failed")]
    HostsFailed { failed: usize, total: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<crate::release::ReleaseError> for Error {
    fn from(err: crate::release::ReleaseError) -> Self {
        match err {
            crate::release::ReleaseError::Pack(e) => Error::Pack(e),
            crate::release::ReleaseError::Deploy(e) => Error::Deploy(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
