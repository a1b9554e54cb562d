// ABOUTME: Configuration types and parsing for webship.yml.
// ABOUTME: Handles YAML parsing, validation, discovery, and destination merging.

mod deserialize;
mod init;
mod remote;
mod server;

pub use init::init_config;
pub use remote::RemoteConfig;
pub use server::ServerConfig;

use crate::archive::{DEFAULT_ARCHIVE_PREFIX, DEFAULT_VERSIONS_DIR, root_dir_name};
use crate::deploy::{Activation, LayoutPolicy};
use crate::error::{Error, Result};
use crate::types::SiteName;
use deserialize::{deserialize_servers, deserialize_servers_option, deserialize_site_name};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "webship.yml";
pub const CONFIG_FILENAME_ALT: &str = "webship.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".webship/config.yml";

/// Content directory packed when `source` is not set.
pub const DEFAULT_SOURCE_DIR: &str = "web_static";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "deserialize_site_name")]
    pub site: SiteName,

    /// Content directory, relative to the project directory.
    #[serde(default = "default_source")]
    pub source: PathBuf,

    /// Where archives are written, relative to the project directory.
    #[serde(default = "default_versions_dir")]
    pub versions_dir: PathBuf,

    #[serde(default = "default_archive_prefix")]
    pub archive_prefix: String,

    #[serde(deserialize_with = "deserialize_servers")]
    pub servers: NonEmpty<ServerConfig>,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub activation: Activation,

    #[serde(default)]
    pub layout: LayoutPolicy,

    #[serde(default = "default_command_timeout", with = "humantime_serde")]
    pub command_timeout: Duration,

    #[serde(default)]
    pub destinations: HashMap<String, Destination>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Destination {
    #[serde(default, deserialize_with = "deserialize_servers_option")]
    pub servers: Option<NonEmpty<ServerConfig>>,

    #[serde(default)]
    pub remote: Option<RemoteConfig>,

    #[serde(default)]
    pub activation: Option<Activation>,
}

fn default_source() -> PathBuf {
    PathBuf::from(DEFAULT_SOURCE_DIR)
}

fn default_versions_dir() -> PathBuf {
    PathBuf::from(DEFAULT_VERSIONS_DIR)
}

fn default_archive_prefix() -> String {
    DEFAULT_ARCHIVE_PREFIX.to_string()
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(300)
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("loading config from {}", path.display());
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn for_destination(&self, name: &str) -> Result<Config> {
        let dest = self
            .destinations
            .get(name)
            .ok_or_else(|| Error::UnknownDestination(name.to_string()))?;

        let mut merged = self.clone();

        if let Some(ref servers) = dest.servers {
            merged.servers = servers.clone();
        }

        if let Some(ref remote) = dest.remote {
            merged.remote = remote.clone();
        }

        if let Some(activation) = dest.activation {
            merged.activation = activation;
        }

        merged.validate()?;
        Ok(merged)
    }

    /// Name of the directory packed archives nest the content under.
    ///
    /// Resolves `source` against `project_dir` the same way packing does, so
    /// `source: .` yields the project directory's own name. Falls back to the
    /// configured path's last component when the directory is not present.
    pub fn source_name(&self, project_dir: &Path) -> String {
        root_dir_name(&project_dir.join(&self.source)).unwrap_or_else(|_| {
            self.source
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(DEFAULT_SOURCE_DIR)
                .to_string()
        })
    }

    fn validate(&self) -> Result<()> {
        let prefix = &self.archive_prefix;
        if prefix.is_empty() {
            return Err(Error::InvalidConfig(
                "archive_prefix cannot be empty".to_string(),
            ));
        }
        // A dot would cut the release stem short.
        if prefix.contains(['.', '/']) {
            return Err(Error::InvalidConfig(format!(
                "archive_prefix cannot contain '.' or '/': {}",
                prefix
            )));
        }

        self.remote.validate().map_err(Error::InvalidConfig)
    }
}
