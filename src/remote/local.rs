// ABOUTME: RemoteHost implementation backed by a directory on this machine.
// ABOUTME: Remote absolute paths are mapped beneath a local root, like a chroot.

use super::error::{RemoteError, Result};
use super::RemoteHost;
use async_trait::async_trait;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Treats `root` as the `/` of a host.
#[derive(Debug, Clone)]
pub struct LocalHost {
    root: PathBuf,
    name: String,
}

impl LocalHost {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = format!("local:{}", root.display());
        Self { root, name }
    }

    /// Local location of a remote absolute path.
    pub fn resolve(&self, remote: &str) -> Result<PathBuf> {
        let relative = remote
            .strip_prefix('/')
            .ok_or_else(|| RemoteError::RelativePath(remote.to_string()))?;
        Ok(self.root.join(relative))
    }

    fn unresolve(&self, local: &Path) -> String {
        match local.strip_prefix(&self.root) {
            Ok(rest) => format!("/{}", rest.display()),
            Err(_) => local.display().to_string(),
        }
    }
}

#[async_trait]
impl RemoteHost for LocalHost {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upload(&self, local: &Path, remote: &str) -> Result<()> {
        let dest = self.resolve(remote)?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(local, &dest).await?;
        Ok(())
    }

    async fn create_dir(&self, path: &str) -> Result<()> {
        tokio::fs::create_dir_all(self.resolve(path)?).await?;
        Ok(())
    }

    async fn extract(&self, archive: &str, dest: &str) -> Result<()> {
        let archive = self.resolve(archive)?;
        let dest = self.resolve(dest)?;
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            let file = File::open(&archive)?;
            tar::Archive::new(GzDecoder::new(file)).unpack(&dest)
        })
        .await
        .map_err(io::Error::other)??;
        Ok(())
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        tokio::fs::remove_file(self.resolve(path)?).await?;
        Ok(())
    }

    async fn flatten(&self, nested: &str, dest: &str) -> Result<()> {
        let nested = self.resolve(nested)?;
        let dest = self.resolve(dest)?;

        let mut entries = tokio::fs::read_dir(&nested).await?;
        while let Some(entry) = entries.next_entry().await? {
            tokio::fs::rename(entry.path(), dest.join(entry.file_name())).await?;
        }
        tokio::fs::remove_dir(&nested).await?;
        Ok(())
    }

    async fn remove_link(&self, path: &str) -> Result<()> {
        match tokio::fs::remove_file(self.resolve(path)?).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn symlink(&self, target: &str, link: &str) -> Result<()> {
        let target = self.resolve(target)?;
        let link = self.resolve(link)?;

        if let Ok(meta) = tokio::fs::symlink_metadata(&link).await
            && meta.file_type().is_symlink()
        {
            tokio::fs::remove_file(&link).await?;
        }
        tokio::fs::symlink(&target, &link).await?;
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> Result<()> {
        tokio::fs::rename(self.resolve(from)?, self.resolve(to)?).await?;
        Ok(())
    }

    async fn read_link(&self, path: &str) -> Result<Option<String>> {
        match tokio::fs::read_link(self.resolve(path)?).await {
            Ok(target) => Ok(Some(self.unresolve(&target))),
            Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::InvalidInput) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<String>> {
        let dir = self.resolve(path)?;
        if !tokio::fs::metadata(&dir).await.is_ok_and(|m| m.is_dir()) {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}
