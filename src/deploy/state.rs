// ABOUTME: Rollout state marker types for the type state pattern.
// ABOUTME: Zero-sized types enforce the order of deploy steps at compile time.

/// Archive checked locally; nothing has touched the host yet.
/// Available actions: `upload()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Verified;

/// Archive copied to the host's temp directory.
/// Available actions: `provision()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Uploaded;

/// Release directory exists.
/// Available actions: `extract()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Provisioned;

/// Archive unpacked into the release directory.
/// Available actions: `remove_upload()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Extracted;

/// Uploaded archive removed from the temp directory.
/// Available actions: `flatten()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpacked;

/// Release contents sit at the release directory root.
/// Available actions: `activate()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Flattened;

/// `current` points at the release.
/// Available actions: `finish()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Live;
