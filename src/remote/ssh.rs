// ABOUTME: RemoteHost implementation over an SSH session.
// ABOUTME: Privileged steps run through sudo; uploads stay unprivileged.

use super::error::{RemoteError, Result};
use super::{RemoteHost, shell};
use crate::ssh::{CommandOutput, Session};
use async_trait::async_trait;
use std::path::Path;

/// A host reached through an established SSH session.
#[derive(Debug)]
pub struct SshHost {
    session: Session,
    privileged: bool,
}

impl SshHost {
    pub fn new(session: Session, privileged: bool) -> Self {
        Self {
            session,
            privileged,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub async fn disconnect(self) -> crate::ssh::Result<()> {
        self.session.disconnect().await
    }

    /// Run a command that needs root on the host.
    async fn run_privileged(&self, command: &str) -> Result<CommandOutput> {
        if self.privileged {
            self.run(&shell::privileged(command)).await
        } else {
            self.run(command).await
        }
    }

    async fn run(&self, command: &str) -> Result<CommandOutput> {
        let output = self.session.exec(command).await?;
        if !output.success() {
            return Err(RemoteError::CommandFailed {
                command: command.to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}

#[async_trait]
impl RemoteHost for SshHost {
    fn name(&self) -> &str {
        self.session.host()
    }

    async fn upload(&self, local: &Path, remote: &str) -> Result<()> {
        self.session.upload(local, remote).await?;
        Ok(())
    }

    async fn create_dir(&self, path: &str) -> Result<()> {
        self.run_privileged(&shell::make_dir(path)).await?;
        Ok(())
    }

    async fn extract(&self, archive: &str, dest: &str) -> Result<()> {
        self.run_privileged(&shell::extract(archive, dest)).await?;
        Ok(())
    }

    async fn remove_file(&self, path: &str) -> Result<()> {
        self.run_privileged(&shell::remove_file(path)).await?;
        Ok(())
    }

    async fn flatten(&self, nested: &str, dest: &str) -> Result<()> {
        self.run_privileged(&shell::flatten(nested, dest)).await?;
        Ok(())
    }

    async fn remove_link(&self, path: &str) -> Result<()> {
        self.run_privileged(&shell::remove_link(path)).await?;
        Ok(())
    }

    async fn symlink(&self, target: &str, link: &str) -> Result<()> {
        self.run_privileged(&shell::symlink(target, link)).await?;
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> Result<()> {
        self.run_privileged(&shell::rename(from, to)).await?;
        Ok(())
    }

    async fn read_link(&self, path: &str) -> Result<Option<String>> {
        // readlink exits non-zero when the path is missing or not a link
        let output = self.session.exec(&shell::read_link(path)).await?;
        if !output.success() {
            return Ok(None);
        }
        let target = output.stdout.trim_end_matches('\n');
        Ok((!target.is_empty()).then(|| target.to_string()))
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<String>> {
        let output = self.run(&shell::list_dir(path)).await?;
        Ok(output
            .stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
