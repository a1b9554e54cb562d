// ABOUTME: Error type shared by every remote host transport.
// ABOUTME: Wraps SSH failures, failed commands, and local I/O for the filesystem transport.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error(transparent)]
    Ssh(#[from] crate::ssh::Error),

    #[error("`{command}` exited with status {exit_code}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: u32,
        stderr: String,
    },

    #[error("remote path must be absolute: {0}")]
    RelativePath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RemoteError>;
