// ABOUTME: Runs a full rollout of one archive against one host.
// ABOUTME: Steps run strictly in order and stop at the first failure, with no rollback.

use std::path::Path;

use crate::config::{Config, DEFAULT_SOURCE_DIR};
use crate::remote::{RemoteHost, RemoteLayout};

use super::error::DeployError;
use super::rollout::{Deployed, Rollout};
use super::strategy::{Activation, LayoutPolicy};

/// Deploys archives using one remote layout and set of policies.
#[derive(Debug, Clone)]
pub struct Deployer {
    layout: RemoteLayout,
    activation: Activation,
    policy: LayoutPolicy,
    source_name: String,
}

impl Default for Deployer {
    fn default() -> Self {
        Self::new(RemoteLayout::default())
    }
}

impl Deployer {
    pub fn new(layout: RemoteLayout) -> Self {
        Self {
            layout,
            activation: Activation::default(),
            policy: LayoutPolicy::default(),
            source_name: DEFAULT_SOURCE_DIR.to_string(),
        }
    }

    /// Deployer for a project whose config was discovered in `project_dir`.
    pub fn from_config(config: &Config, project_dir: &Path) -> Self {
        Self::new(RemoteLayout::from_config(&config.remote))
            .activation(config.activation)
            .layout_policy(config.layout)
            .source_name(config.source_name(project_dir))
    }

    pub fn activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn layout_policy(mut self, policy: LayoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Name of the directory expected inside archives under [`LayoutPolicy::Compat`].
    pub fn source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    pub fn layout(&self) -> &RemoteLayout {
        &self.layout
    }

    /// Make `archive` the live release on `host`.
    ///
    /// A failure before upload leaves the host untouched. A later failure
    /// leaves whatever earlier steps created (a release directory, possibly the
    /// uploaded archive) in place.
    pub async fn deploy<H: RemoteHost + ?Sized>(
        &self,
        host: &H,
        archive: &Path,
    ) -> Result<Deployed, DeployError> {
        let rollout = Rollout::verify(archive, &self.layout, self.policy, &self.source_name)?;

        let live = rollout
            .upload(host)
            .await?
            .provision(host)
            .await?
            .extract(host)
            .await?
            .remove_upload(host)
            .await?
            .flatten(host)
            .await?
            .activate(host, self.activation)
            .await?;

        let deployed = live.finish();
        tracing::info!("{}: {} is live", host.name(), deployed.stem());
        Ok(deployed)
    }
}
