// ABOUTME: Pack command implementation.
// ABOUTME: Writes a timestamped archive of the content directory into the versions directory.

use std::path::Path;
use webship::archive::Packager;
use webship::config::Config;
use webship::error::Result;
use webship::output::Output;

pub fn pack(config: &Config, project_dir: &Path, output: &Output) -> Result<()> {
    let packager = Packager::from_config(config, project_dir);
    output.progress(&format!("Packing {}", packager.source().display()));

    let archive = packager.pack()?;
    output.success(&archive.display().to_string());
    Ok(())
}
