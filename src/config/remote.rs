// ABOUTME: Remote layout and privilege settings.
// ABOUTME: Defaults reproduce the /data/web_static and /tmp convention.

use crate::remote::{DEFAULT_ROOT, DEFAULT_TMP_DIR};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteConfig {
    /// Directory holding `releases/` and the `current` link.
    #[serde(default = "default_root")]
    pub root: String,

    /// Where archives are uploaded before extraction.
    #[serde(default = "default_tmp_dir")]
    pub tmp_dir: String,

    /// Run filesystem changes through `sudo -n`.
    #[serde(default = "default_privileged")]
    pub privileged: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            tmp_dir: default_tmp_dir(),
            privileged: default_privileged(),
        }
    }
}

impl RemoteConfig {
    pub(crate) fn validate(&self) -> Result<(), String> {
        for (field, path) in [("remote.root", &self.root), ("remote.tmp_dir", &self.tmp_dir)] {
            if !path.starts_with('/') {
                return Err(format!("{} must be an absolute path: {}", field, path));
            }
        }
        if self.root.trim_end_matches('/').is_empty() {
            return Err("remote.root cannot be /".to_string());
        }
        Ok(())
    }
}

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

fn default_tmp_dir() -> String {
    DEFAULT_TMP_DIR.to_string()
}

fn default_privileged() -> bool {
    true
}
