// ABOUTME: Deploys an archive to one host using the type state pattern.
// ABOUTME: Exports rollout states, the deployer, step-tagged errors, the deploy lock, and host status.

mod deployer;
mod error;
mod lock;
mod rollout;
mod state;
mod status;
mod strategy;
mod transitions;

pub use deployer::Deployer;
pub use error::{DeployError, DeployErrorKind};
pub use lock::{DeployLock, LockInfo};
pub use rollout::{Deployed, ReleasePlan, Rollout};
pub use status::{HostStatus, host_status};
pub use state::{Extracted, Flattened, Live, Provisioned, Unpacked, Uploaded, Verified};
pub use strategy::{Activation, LayoutPolicy};
