// ABOUTME: Generic rollout struct parameterized by state marker.
// ABOUTME: Holds the release plan every step reads its paths from.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::archive::single_root;
use crate::remote::RemoteLayout;
use crate::types::ArchiveName;

use super::error::DeployError;
use super::state::{Live, Verified};
use super::strategy::LayoutPolicy;

/// Every local and remote path one rollout touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    /// Local archive being deployed.
    pub archive: PathBuf,
    /// Archive file name; its stem names the release.
    pub name: ArchiveName,
    /// Directory inside the archive whose contents become the release root.
    pub nested_dir: String,
    /// Where the archive is uploaded on the host.
    pub upload_path: String,
    /// Release directory on the host.
    pub release_dir: String,
    /// The activation pointer.
    pub current: String,
    /// Temporary link used by swap activation.
    pub staging_link: String,
}

impl ReleasePlan {
    /// Path of the nested directory after extraction.
    pub fn extracted_root(&self) -> String {
        format!("{}/{}", self.release_dir, self.nested_dir)
    }
}

/// A deploy of one archive to one host, parameterized by its progress.
///
/// Each step consumes the rollout and returns it in the next state, so steps
/// cannot be skipped or reordered.
#[derive(Debug)]
pub struct Rollout<S> {
    pub(crate) plan: ReleasePlan,
    pub(crate) _state: PhantomData<S>,
}

/// Outcome of a completed rollout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployed {
    pub archive: ArchiveName,
    pub release_dir: String,
}

impl Deployed {
    /// Release name, the archive's stem.
    pub fn stem(&self) -> &str {
        self.archive.stem()
    }
}

impl Rollout<Verified> {
    /// Check the archive locally and plan the remote paths.
    ///
    /// Fails without touching the host if the archive is missing, its name has
    /// no stem, or (under [`LayoutPolicy::Strict`]) it does not hold exactly
    /// one top-level directory.
    pub fn verify(
        archive: &Path,
        layout: &RemoteLayout,
        policy: LayoutPolicy,
        source_name: &str,
    ) -> Result<Self, DeployError> {
        if !archive.is_file() {
            return Err(DeployError::ArchiveMissing(archive.to_path_buf()));
        }

        let name = ArchiveName::from_path(archive)?;

        let nested_dir = match policy {
            LayoutPolicy::Strict => {
                single_root(archive).map_err(|source| DeployError::ArchiveLayout {
                    path: archive.to_path_buf(),
                    source,
                })?
            }
            LayoutPolicy::Compat => source_name.to_string(),
        };

        let plan = ReleasePlan {
            archive: archive.to_path_buf(),
            upload_path: layout.upload_path(name.as_str()),
            release_dir: layout.release_dir(name.stem()),
            current: layout.current(),
            staging_link: layout.staging_link(),
            nested_dir,
            name,
        };

        Ok(Rollout {
            plan,
            _state: PhantomData,
        })
    }
}

impl<S> Rollout<S> {
    pub fn plan(&self) -> &ReleasePlan {
        &self.plan
    }

    pub fn release_dir(&self) -> &str {
        &self.plan.release_dir
    }

    pub(crate) fn transition<T>(self) -> Rollout<T> {
        Rollout {
            plan: self.plan,
            _state: PhantomData,
        }
    }
}

impl Rollout<Live> {
    pub fn finish(self) -> Deployed {
        Deployed {
            archive: self.plan.name,
            release_dir: self.plan.release_dir,
        }
    }
}
