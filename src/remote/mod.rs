// ABOUTME: Transport seam between the deploy pipeline and a target host.
// ABOUTME: Ships SSH, local-filesystem, recording, and dry-run implementations.

mod error;
mod layout;
mod local;
mod recording;
pub mod shell;
mod ssh;

pub use error::{RemoteError, Result};
pub use layout::{DEFAULT_ROOT, DEFAULT_TMP_DIR, RemoteLayout};
pub use local::LocalHost;
pub use recording::{DryRunHost, RecordingHost, RemoteOp};
pub use ssh::SshHost;

use async_trait::async_trait;
use std::path::Path;

/// Operations the deploy pipeline performs on one host.
///
/// Paths are absolute POSIX paths on the host. Every call is one blocking
/// round trip; callers never overlap calls on the same host.
#[async_trait]
pub trait RemoteHost: Send + Sync {
    /// Human-readable name for progress output.
    fn name(&self) -> &str;

    /// Copy a local file to `remote` without privilege escalation.
    async fn upload(&self, local: &Path, remote: &str) -> Result<()>;

    /// Create `path` and any missing parents.
    async fn create_dir(&self, path: &str) -> Result<()>;

    /// Unpack the gzip tarball at `archive` into `dest`.
    async fn extract(&self, archive: &str, dest: &str) -> Result<()>;

    /// Remove a regular file. Fails if it does not exist.
    async fn remove_file(&self, path: &str) -> Result<()>;

    /// Move the entries of `nested` into `dest` and remove `nested`.
    async fn flatten(&self, nested: &str, dest: &str) -> Result<()>;

    /// Remove a symlink if present.
    async fn remove_link(&self, path: &str) -> Result<()>;

    /// Create a symlink at `link` pointing to `target`, replacing any link already there.
    async fn symlink(&self, target: &str, link: &str) -> Result<()>;

    /// Atomically rename `from` over `to`.
    async fn rename(&self, from: &str, to: &str) -> Result<()>;

    /// Target of the symlink at `path`, or `None` if there is no link.
    async fn read_link(&self, path: &str) -> Result<Option<String>>;

    /// Entry names of directory `path`; empty if it does not exist.
    async fn list_dir(&self, path: &str) -> Result<Vec<String>>;
}
