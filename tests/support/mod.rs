// ABOUTME: Test support utilities.
// ABOUTME: Provides site fixtures and a host wrapper that fails on a chosen operation.

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use webship::remote::{RemoteError, RemoteHost, Result};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("webship=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Create `web_static/` with `index.html` and `styles/main.css` under `dir`.
#[allow(dead_code)]
pub fn site(dir: &Path) -> PathBuf {
    let source = dir.join("web_static");
    fs::create_dir_all(source.join("styles")).unwrap();
    fs::write(source.join("index.html"), "<h1>Hello</h1>").unwrap();
    fs::write(source.join("styles/main.css"), "h1 { color: teal; }").unwrap();
    source
}

/// Write a file that is not a gzip tarball under `dir`.
#[allow(dead_code)]
pub fn bogus_archive(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"not a tarball").unwrap();
    path
}

/// Forwards to `inner` but fails the first call to `fail_on`.
#[allow(dead_code)]
pub struct FaultyHost<H> {
    inner: H,
    fail_on: &'static str,
}

#[allow(dead_code)]
impl<H: RemoteHost> FaultyHost<H> {
    pub fn new(inner: H, fail_on: &'static str) -> Self {
        Self { inner, fail_on }
    }

    fn check(&self, op: &str) -> Result<()> {
        if op == self.fail_on {
            return Err(RemoteError::CommandFailed {
                command: op.to_string(),
                exit_code: 1,
                stderr: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<H: RemoteHost> RemoteHost for FaultyHost<H> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn upload(&self, local: &Path, remote: &str) -> Result<()> {
        self.check("upload")?;
        self.inner.upload(local, remote).await
    }

    async fn create_dir(&self, path: &str) -> Result<()> {
        self.check("create_dir")?;
        self.inner.create_dir(path).await
    }

    async fn extract(&self, archive: &str, dest: &str) -> Result<()> {
        self.check("extract")?;
        self.inner.extract(archive, dest).await
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        self.check("remove_file")?;
        self.inner.remove_file(path).await
    }

    async fn flatten(&self, nested: &str, dest: &str) -> Result<()> {
        self.check("flatten")?;
        self.inner.flatten(nested, dest).await
    }

    async fn remove_link(&self, path: &str) -> Result<()> {
        self.check("remove_link")?;
        self.inner.remove_link(path).await
    }

    async fn symlink(&self, target: &str, link: &str) -> Result<()> {
        self.check("symlink")?;
        self.inner.symlink(target, link).await
    }

    async fn rename(&self, from: &str, to: &str) -> Result<()> {
        self.check("rename")?;
        self.inner.rename(from, to).await
    }

    async fn read_link(&self, path: &str) -> Result<Option<String>> {
        self.check("read_link")?;
        self.inner.read_link(path).await
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<String>> {
        self.check("list_dir")?;
        self.inner.list_dir(path).await
    }
}
