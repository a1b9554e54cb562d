// ABOUTME: Library root for webship - exposes packaging and deployment for testing.
// ABOUTME: The main binary is in main.rs.

pub mod archive;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod release;
pub mod remote;
pub mod ssh;
pub mod types;
