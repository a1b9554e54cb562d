// ABOUTME: Command module aggregator for the webship CLI.
// ABOUTME: Re-exports pack, deploy, release, and status command handlers.

mod deploy;
mod pack;
mod status;

pub use deploy::{Target, deploy, release};
pub use pack::pack;
pub use status::status;
