// ABOUTME: Step methods for a rollout, one remote round trip each.
// ABOUTME: Each method consumes self and returns the next state on success.

use crate::remote::RemoteHost;

use super::error::DeployError;
use super::rollout::Rollout;
use super::state::{Extracted, Flattened, Live, Provisioned, Unpacked, Uploaded, Verified};
use super::strategy::Activation;

impl Rollout<Verified> {
    /// Copy the archive into the host's temp directory.
    pub async fn upload<H: RemoteHost + ?Sized>(
        self,
        host: &H,
    ) -> Result<Rollout<Uploaded>, DeployError> {
        tracing::info!("{}: uploading {}", host.name(), self.plan.name);
        host.upload(&self.plan.archive, &self.plan.upload_path)
            .await
            .map_err(DeployError::Upload)?;
        Ok(self.transition())
    }
}

impl Rollout<Uploaded> {
    /// Create the release directory.
    pub async fn provision<H: RemoteHost + ?Sized>(
        self,
        host: &H,
    ) -> Result<Rollout<Provisioned>, DeployError> {
        tracing::info!("{}: creating {}", host.name(), self.plan.release_dir);
        host.create_dir(&self.plan.release_dir)
            .await
            .map_err(DeployError::Provision)?;
        Ok(self.transition())
    }
}

impl Rollout<Provisioned> {
    /// Unpack the uploaded archive into the release directory.
    pub async fn extract<H: RemoteHost + ?Sized>(
        self,
        host: &H,
    ) -> Result<Rollout<Extracted>, DeployError> {
        tracing::info!("{}: extracting into {}", host.name(), self.plan.release_dir);
        host.extract(&self.plan.upload_path, &self.plan.release_dir)
            .await
            .map_err(DeployError::Extract)?;
        Ok(self.transition())
    }
}

impl Rollout<Extracted> {
    /// Delete the uploaded archive from the temp directory.
    pub async fn remove_upload<H: RemoteHost + ?Sized>(
        self,
        host: &H,
    ) -> Result<Rollout<Unpacked>, DeployError> {
        tracing::info!("{}: removing {}", host.name(), self.plan.upload_path);
        host.remove_file(&self.plan.upload_path)
            .await
            .map_err(DeployError::Cleanup)?;
        Ok(self.transition())
    }
}

impl Rollout<Unpacked> {
    /// Lift the nested directory's contents to the release root.
    pub async fn flatten<H: RemoteHost + ?Sized>(
        self,
        host: &H,
    ) -> Result<Rollout<Flattened>, DeployError> {
        let nested = self.plan.extracted_root();
        tracing::info!("{}: flattening {}", host.name(), nested);
        host.flatten(&nested, &self.plan.release_dir)
            .await
            .map_err(DeployError::Flatten)?;
        Ok(self.transition())
    }
}

impl Rollout<Flattened> {
    /// Point `current` at the release.
    pub async fn activate<H: RemoteHost + ?Sized>(
        self,
        host: &H,
        activation: Activation,
    ) -> Result<Rollout<Live>, DeployError> {
        let plan = &self.plan;
        tracing::info!(
            "{}: activating {} ({})",
            host.name(),
            plan.release_dir,
            activation
        );

        match activation {
            Activation::Swap => {
                host.symlink(&plan.release_dir, &plan.staging_link)
                    .await
                    .map_err(DeployError::Activation)?;
                host.rename(&plan.staging_link, &plan.current)
                    .await
                    .map_err(DeployError::Activation)?;
            }
            Activation::Replace => {
                host.remove_link(&plan.current)
                    .await
                    .map_err(DeployError::Activation)?;
                host.symlink(&plan.release_dir, &plan.current)
                    .await
                    .map_err(DeployError::Activation)?;
            }
        }

        Ok(self.transition())
    }
}
