// ABOUTME: Deploy lock serializing deploys of one site to the same host.
// ABOUTME: Uses atomic file creation with lock info stored in ~/.local/state/webship/.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::remote::shell;
use crate::ssh::Session;
use crate::types::SiteName;

use super::DeployError;

/// Base directory for webship state files (XDG Base Directory compliant).
const STATE_DIR: &str = ".local/state/webship";

/// Information about who holds a deploy lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Hostname of the machine that holds the lock.
    pub holder: String,
    /// Process ID of the lock holder.
    pub pid: u32,
    /// When the lock was acquired.
    pub started_at: DateTime<Utc>,
    /// Site being deployed.
    pub site: String,
}

impl LockInfo {
    /// Create new lock info for the current process.
    pub fn new(site: &SiteName) -> Self {
        Self {
            holder: gethostname::gethostname().to_string_lossy().into_owned(),
            pid: std::process::id(),
            started_at: Utc::now(),
            site: site.to_string(),
        }
    }

    /// Check if this lock is stale (older than 1 hour).
    pub fn is_stale(&self) -> bool {
        let age = Utc::now() - self.started_at;
        age.num_hours() >= 1
    }

    /// Path to the lock file for a site.
    /// Uses $HOME for shell expansion compatibility.
    pub fn lock_path(site: &SiteName) -> String {
        format!("$HOME/{}/{}.lock", STATE_DIR, site)
    }
}

/// A held deploy lock. Call [`DeployLock::release`] when done.
pub struct DeployLock<'a> {
    session: &'a Session,
    site: SiteName,
}

impl std::fmt::Debug for DeployLock<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeployLock")
            .field("site", &self.site)
            .finish()
    }
}

impl<'a> DeployLock<'a> {
    /// Acquire a deploy lock for the given site.
    ///
    /// Uses shell noclobber mode for atomic lock acquisition.
    /// Returns error if lock is already held by another process.
    /// Auto-breaks stale locks (>1 hour) with a warning.
    pub async fn acquire(
        session: &'a Session,
        site: &SiteName,
        force: bool,
    ) -> Result<Self, DeployError> {
        let lock_path = LockInfo::lock_path(site);

        Self::ensure_state_dir(session).await?;

        let lock_info = LockInfo::new(site);
        let lock_json = serde_json::to_string(&lock_info)
            .map_err(|e| DeployError::Lock(format!("failed to serialize lock: {}", e)))?;

        // set -C makes > fail if the file already exists.
        // Double quotes let $HOME expand; the JSON is single-quoted.
        let acquire_cmd = format!(
            "(set -C; echo {} > \"{}\") 2>/dev/null",
            shell::quote(&lock_json),
            lock_path
        );

        if Self::try_create(session, &acquire_cmd).await? {
            return Ok(Self {
                session,
                site: site.clone(),
            });
        }

        if !Self::should_break(session, &lock_path, force).await? {
            let output = session.exec(&format!("cat \"{}\"", lock_path)).await;
            if let Ok(output) = output
                && let Ok(existing) = serde_json::from_str::<LockInfo>(&output.stdout)
            {
                return Err(DeployError::LockHeld {
                    holder: existing.holder,
                    pid: existing.pid,
                    started_at: existing.started_at,
                });
            }
            return Err(DeployError::Lock(
                "lock held by another process".to_string(),
            ));
        }

        tracing::debug!("Removing stale/forced lock at {}", lock_path);
        let _ = session.exec(&format!("rm -f \"{}\"", lock_path)).await;

        if !Self::try_create(session, &acquire_cmd).await? {
            return Err(DeployError::Lock(
                "lock acquired by another process during break".to_string(),
            ));
        }

        Ok(Self {
            session,
            site: site.clone(),
        })
    }

    async fn try_create(session: &Session, acquire_cmd: &str) -> Result<bool, DeployError> {
        let output = session
            .exec(acquire_cmd)
            .await
            .map_err(|e| DeployError::Lock(format!("failed to acquire lock: {}", e)))?;
        Ok(output.success())
    }

    /// Ensure the state directory exists on the remote server.
    async fn ensure_state_dir(session: &Session) -> Result<(), DeployError> {
        let cmd = format!("mkdir -p ~/{}", STATE_DIR);
        let output = session.exec(&cmd).await.map_err(|e| {
            DeployError::Lock(format!("failed to create state directory: {}", e))
        })?;

        if !output.success() {
            return Err(DeployError::Lock(format!(
                "failed to create state directory: {}",
                output.stderr
            )));
        }
        Ok(())
    }

    /// Check if an existing lock should be broken (stale, forced, or corrupted).
    async fn should_break(
        session: &Session,
        lock_path: &str,
        force: bool,
    ) -> Result<bool, DeployError> {
        let output = session
            .exec(&format!("cat \"{}\"", lock_path))
            .await
            .map_err(|e| DeployError::Lock(format!("failed to read lock info: {}", e)))?;

        if !output.success() {
            tracing::warn!("Lock info unreadable, breaking lock");
            return Ok(true);
        }

        match serde_json::from_str::<LockInfo>(&output.stdout) {
            Ok(existing) => Ok(breaks(&existing, force)),
            Err(_) => {
                tracing::warn!("Lock info corrupted, breaking lock");
                Ok(true)
            }
        }
    }

    /// Release the lock.
    pub async fn release(self) -> Result<(), DeployError> {
        let lock_path = LockInfo::lock_path(&self.site);
        let output = self
            .session
            .exec(&format!("rm -f \"{}\"", lock_path))
            .await
            .map_err(|e| DeployError::Lock(format!("failed to release lock: {}", e)))?;
        if !output.success() {
            return Err(DeployError::Lock(format!(
                "failed to release lock: {}",
                output.stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Whether an existing, readable lock may be taken over.
fn breaks(existing: &LockInfo, force: bool) -> bool {
    if force {
        tracing::warn!(
            "Breaking lock held by {} (pid {}) since {}",
            existing.holder,
            existing.pid,
            existing.started_at
        );
        true
    } else if existing.is_stale() {
        tracing::warn!(
            "Auto-breaking stale lock held by {} (pid {}) since {}",
            existing.holder,
            existing.pid,
            existing.started_at
        );
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(name: &str) -> SiteName {
        SiteName::new(name).unwrap()
    }

    #[test]
    fn lock_info_creates_with_current_host_and_pid() {
        let info = LockInfo::new(&site("web-static"));

        assert_eq!(info.site, "web-static");
        assert_eq!(info.pid, std::process::id());
        assert!(!info.holder.is_empty());
    }

    #[test]
    fn lock_path_uses_state_dir() {
        assert_eq!(
            LockInfo::lock_path(&site("blog")),
            "$HOME/.local/state/webship/blog.lock"
        );
    }

    #[test]
    fn fresh_lock_is_not_stale() {
        assert!(!LockInfo::new(&site("blog")).is_stale());
    }

    #[test]
    fn old_lock_is_stale() {
        let mut info = LockInfo::new(&site("blog"));
        info.started_at = Utc::now() - chrono::Duration::hours(2);
        assert!(info.is_stale());
    }

    #[test]
    fn active_lock_is_kept_unless_forced() {
        let info = LockInfo::new(&site("blog"));
        assert!(!breaks(&info, false));
        assert!(breaks(&info, true));
    }

    #[test]
    fn lock_info_round_trips_through_json() {
        let info = LockInfo::new(&site("blog"));
        let json = serde_json::to_string(&info).unwrap();
        let parsed: LockInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.site, "blog");
        assert_eq!(parsed.pid, info.pid);
    }
}
