// ABOUTME: Pack-then-deploy pipeline: one archive, rolled out host by host.
// ABOUTME: A packaging failure stops the pipeline before any remote call.

use std::path::{Path, PathBuf};

use crate::archive::{PackError, Packager};
use crate::deploy::{DeployError, Deployed, Deployer};
use crate::remote::RemoteHost;

#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    #[error("packaging failed: {0}")]
    Pack(#[from] PackError),

    #[error(transparent)]
    Deploy(#[from] DeployError),
}

/// An archive ready to be made live, freshly packed or supplied by the caller.
#[derive(Debug, Clone)]
pub struct Release {
    archive: PathBuf,
}

impl Release {
    /// Pack the content directory.
    pub fn pack(packager: &Packager) -> Result<Self, ReleaseError> {
        Ok(Self {
            archive: packager.pack()?,
        })
    }

    /// Use an archive that already exists on this machine.
    pub fn from_archive(archive: impl Into<PathBuf>) -> Result<Self, ReleaseError> {
        let archive = archive.into();
        if !archive.is_file() {
            return Err(DeployError::ArchiveMissing(archive).into());
        }
        Ok(Self { archive })
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }

    /// Make this release live on `host`. Hosts are independent, so this may
    /// be called once per host with the same release.
    pub async fn deploy_to<H: RemoteHost + ?Sized>(
        &self,
        deployer: &Deployer,
        host: &H,
    ) -> Result<Deployed, ReleaseError> {
        Ok(deployer.deploy(host, &self.archive).await?)
    }
}

/// Pack the content directory and make the new archive live on `host`.
///
/// Neither stage is retried.
pub async fn release<H: RemoteHost + ?Sized>(
    packager: &Packager,
    deployer: &Deployer,
    host: &H,
) -> Result<Deployed, ReleaseError> {
    Release::pack(packager)?.deploy_to(deployer, host).await
}
