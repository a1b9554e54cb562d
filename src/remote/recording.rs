// ABOUTME: Host wrappers that log every operation, for dry runs and assertions.
// ABOUTME: DryRunHost accepts every call without touching anything.

use super::error::Result;
use super::{RemoteHost, shell};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt;
use std::path::{Path, PathBuf};

/// One call made against a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOp {
    Upload { local: PathBuf, remote: String },
    CreateDir(String),
    Extract { archive: String, dest: String },
    RemoveFile(String),
    Flatten { nested: String, dest: String },
    RemoveLink(String),
    Symlink { target: String, link: String },
    Rename { from: String, to: String },
    ReadLink(String),
    ListDir(String),
}

impl fmt::Display for RemoteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteOp::Upload { local, remote } => {
                write!(f, "upload {} -> {}", local.display(), remote)
            }
            RemoteOp::CreateDir(path) => f.write_str(&shell::make_dir(path)),
            RemoteOp::Extract { archive, dest } => f.write_str(&shell::extract(archive, dest)),
            RemoteOp::RemoveFile(path) => f.write_str(&shell::remove_file(path)),
            RemoteOp::Flatten { nested, dest } => f.write_str(&shell::flatten(nested, dest)),
            RemoteOp::RemoveLink(path) => f.write_str(&shell::remove_link(path)),
            RemoteOp::Symlink { target, link } => f.write_str(&shell::symlink(target, link)),
            RemoteOp::Rename { from, to } => f.write_str(&shell::rename(from, to)),
            RemoteOp::ReadLink(path) => f.write_str(&shell::read_link(path)),
            RemoteOp::ListDir(path) => f.write_str(&shell::list_dir(path)),
        }
    }
}

/// Records each call, then forwards it to the wrapped host.
#[derive(Debug)]
pub struct RecordingHost<H> {
    inner: H,
    ops: Mutex<Vec<RemoteOp>>,
}

impl<H: RemoteHost> RecordingHost<H> {
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            ops: Mutex::new(Vec::new()),
        }
    }

    /// Every operation attempted so far, in call order.
    pub fn ops(&self) -> Vec<RemoteOp> {
        self.ops.lock().clone()
    }

    fn record(&self, op: RemoteOp) {
        tracing::debug!("{}: {}", self.inner.name(), op);
        self.ops.lock().push(op);
    }
}

#[async_trait]
impl<H: RemoteHost> RemoteHost for RecordingHost<H> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn upload(&self, local: &Path, remote: &str) -> Result<()> {
        self.record(RemoteOp::Upload {
            local: local.to_path_buf(),
            remote: remote.to_string(),
        });
        self.inner.upload(local, remote).await
    }

    async fn create_dir(&self, path: &str) -> Result<()> {
        self.record(RemoteOp::CreateDir(path.to_string()));
        self.inner.create_dir(path).await
    }

    async fn extract(&self, archive: &str, dest: &str) -> Result<()> {
        self.record(RemoteOp::Extract {
            archive: archive.to_string(),
            dest: dest.to_string(),
        });
        self.inner.extract(archive, dest).await
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        self.record(RemoteOp::RemoveFile(path.to_string()));
        self.inner.remove_file(path).await
    }

    async fn flatten(&self, nested: &str, dest: &str) -> Result<()> {
        self.record(RemoteOp::Flatten {
            nested: nested.to_string(),
            dest: dest.to_string(),
        });
        self.inner.flatten(nested, dest).await
    }

    async fn remove_link(&self, path: &str) -> Result<()> {
        self.record(RemoteOp::RemoveLink(path.to_string()));
        self.inner.remove_link(path).await
    }

    async fn symlink(&self, target: &str, link: &str) -> Result<()> {
        self.record(RemoteOp::Symlink {
            target: target.to_string(),
            link: link.to_string(),
        });
        self.inner.symlink(target, link).await
    }

    async fn rename(&self, from: &str, to: &str) -> Result<()> {
        self.record(RemoteOp::Rename {
            from: from.to_string(),
            to: to.to_string(),
        });
        self.inner.rename(from, to).await
    }

    async fn read_link(&self, path: &str) -> Result<Option<String>> {
        self.record(RemoteOp::ReadLink(path.to_string()));
        self.inner.read_link(path).await
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<String>> {
        self.record(RemoteOp::ListDir(path.to_string()));
        self.inner.list_dir(path).await
    }
}

/// Accepts every operation and changes nothing.
#[derive(Debug, Clone)]
pub struct DryRunHost {
    name: String,
}

impl DryRunHost {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl RemoteHost for DryRunHost {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upload(&self, _local: &Path, _remote: &str) -> Result<()> {
        Ok(())
    }

    async fn create_dir(&self, _path: &str) -> Result<()> {
        Ok(())
    }

    async fn extract(&self, _archive: &str, _dest: &str) -> Result<()> {
        Ok(())
    }

    async fn remove_file(&self, _path: &str) -> Result<()> {
        Ok(())
    }

    async fn flatten(&self, _nested: &str, _dest: &str) -> Result<()> {
        Ok(())
    }

    async fn remove_link(&self, _path: &str) -> Result<()> {
        Ok(())
    }

    async fn symlink(&self, _target: &str, _link: &str) -> Result<()> {
        Ok(())
    }

    async fn rename(&self, _from: &str, _to: &str) -> Result<()> {
        Ok(())
    }

    async fn read_link(&self, _path: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn list_dir(&self, _path: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
