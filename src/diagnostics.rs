// ABOUTME: Diagnostics accumulator for non-fatal warnings during a deploy run.
// ABOUTME: Collects warnings that shouldn't fail a deployment but should be shown to users.

/// Collects non-fatal warnings during deployment operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn lock_release(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LockRelease,
            message: message.into(),
        }
    }

    pub fn ssh_disconnect(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::SshDisconnect,
            message: message.into(),
        }
    }

    pub fn partial_release(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::PartialRelease,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Failed to release deploy lock (lock file may remain).
    LockRelease,
    /// Failed to cleanly disconnect SSH session.
    SshDisconnect,
    /// A deploy failed after changing the host; a release directory or
    /// uploaded archive may be left behind.
    PartialRelease,
}
