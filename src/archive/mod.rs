// ABOUTME: Packs the local content directory into a timestamped gzip tarball.
// ABOUTME: Archives land in the versions directory and are never modified afterwards.

mod error;
mod inspect;

pub use error::{LayoutError, PackError, Result};
pub use inspect::single_root;

use crate::config::Config;
use crate::types::ArchiveName;
use chrono::{Local, NaiveDateTime};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_ARCHIVE_PREFIX: &str = "web_static";
pub const DEFAULT_VERSIONS_DIR: &str = "versions";

/// Builds archives of one content directory.
#[derive(Debug, Clone)]
pub struct Packager {
    source: PathBuf,
    versions_dir: PathBuf,
    prefix: String,
}

impl Packager {
    pub fn new(source: impl Into<PathBuf>, versions_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            versions_dir: versions_dir.into(),
            prefix: DEFAULT_ARCHIVE_PREFIX.to_string(),
        }
    }

    /// Packager for a project whose config was discovered in `project_dir`.
    pub fn from_config(config: &Config, project_dir: &Path) -> Self {
        Self::new(
            project_dir.join(&config.source),
            project_dir.join(&config.versions_dir),
        )
        .prefix(config.archive_prefix.clone())
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn versions_dir(&self) -> &Path {
        &self.versions_dir
    }

    /// Pack the content directory, stamped with the local wall clock.
    pub fn pack(&self) -> Result<PathBuf> {
        self.pack_at(Local::now().naive_local())
    }

    /// Pack the content directory, stamped with `at`.
    ///
    /// Two packs within the same second produce the same name; the second
    /// overwrites the first. A versions directory inside the content
    /// directory is left out of the archive.
    pub fn pack_at(&self, at: NaiveDateTime) -> Result<PathBuf> {
        fs::create_dir_all(&self.versions_dir).map_err(|e| PackError::io(&self.versions_dir, e))?;

        if !self.source.is_dir() {
            return Err(PackError::SourceMissing(self.source.clone()));
        }

        let source = fs::canonicalize(&self.source).map_err(|e| PackError::io(&self.source, e))?;
        let versions =
            fs::canonicalize(&self.versions_dir).map_err(|e| PackError::io(&self.versions_dir, e))?;
        let root = root_dir_name(&self.source)?;
        let name = ArchiveName::for_timestamp(&self.prefix, at);
        let archive_path = self.versions_dir.join(name.as_str());

        tracing::debug!(
            "packing {} into {}",
            self.source.display(),
            archive_path.display()
        );

        let file = File::create(&archive_path).map_err(|e| PackError::io(&archive_path, e))?;
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        builder.follow_symlinks(false);
        append_tree(&mut builder, &source, Path::new(&root), &versions)?;

        let encoder = builder
            .into_inner()
            .map_err(|e| PackError::io(&archive_path, e))?;
        encoder
            .finish()
            .map_err(|e| PackError::io(&archive_path, e))?;

        tracing::info!("packed {}", archive_path.display());
        Ok(archive_path)
    }
}

/// Name of the single top-level directory an archive of `source` holds.
///
/// `source` is resolved first, so `.` yields the directory's real name.
pub fn root_dir_name(source: &Path) -> Result<String> {
    let canonical = fs::canonicalize(source).map_err(|e| PackError::io(source, e))?;
    canonical
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| PackError::UnnamedSource(source.to_path_buf()))
}

/// Add `dir` to the archive as `name`, recursing into subdirectories and
/// leaving out `skip`.
fn append_tree<W: Write>(
    builder: &mut tar::Builder<W>,
    dir: &Path,
    name: &Path,
    skip: &Path,
) -> Result<()> {
    builder
        .append_dir(name, dir)
        .map_err(|e| PackError::io(dir, e))?;

    let mut entries = fs::read_dir(dir)
        .and_then(|entries| entries.collect::<io::Result<Vec<_>>>())
        .map_err(|e| PackError::io(dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if path == skip {
            tracing::debug!("leaving {} out of the archive", path.display());
            continue;
        }

        let entry_name = name.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| PackError::io(&path, e))?;
        if file_type.is_dir() {
            append_tree(builder, &path, &entry_name, skip)?;
        } else {
            builder
                .append_path_with_name(&path, &entry_name)
                .map_err(|e| PackError::io(&path, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use flate2::read::GzDecoder;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn site(dir: &Path) -> PathBuf {
        let source = dir.join("web_static");
        fs::create_dir_all(source.join("styles")).unwrap();
        fs::write(source.join("index.html"), "<h1>hi</h1>").unwrap();
        fs::write(source.join("styles/main.css"), "h1 {}").unwrap();
        source
    }

    fn entry_paths(archive: &Path) -> Vec<String> {
        let file = File::open(archive).unwrap();
        let mut tar = tar::Archive::new(GzDecoder::new(file));
        tar.entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn archive_nests_content_under_source_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = site(dir.path());
        let packager = Packager::new(&source, dir.path().join("versions"));

        let archive = packager.pack_at(stamp()).unwrap();
        let paths = entry_paths(&archive);

        assert!(paths.iter().any(|p| p == "web_static/index.html"));
        assert!(paths.iter().any(|p| p == "web_static/styles/main.css"));
        assert!(paths.iter().all(|p| p.starts_with("web_static")));
    }

    #[test]
    fn custom_prefix_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let source = site(dir.path());
        let packager = Packager::new(&source, dir.path().join("versions")).prefix("blog");

        let archive = packager.pack_at(stamp()).unwrap();
        assert_eq!(
            archive.file_name().unwrap().to_str().unwrap(),
            "blog_20240101120000.tgz"
        );
    }

    #[test]
    fn missing_source_leaves_versions_empty() {
        let dir = tempfile::tempdir().unwrap();
        let packager = Packager::new(dir.path().join("absent"), dir.path().join("versions"));

        let err = packager.pack_at(stamp()).unwrap_err();
        assert!(matches!(err, PackError::SourceMissing(_)));
        assert!(dir.path().join("versions").is_dir());
        assert_eq!(fs::read_dir(dir.path().join("versions")).unwrap().count(), 0);
    }

    #[test]
    fn source_given_as_dot_uses_directory_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = site(dir.path());

        assert_eq!(root_dir_name(&source.join(".")).unwrap(), "web_static");
    }

    #[test]
    fn versions_inside_source_is_left_out() {
        let dir = tempfile::tempdir().unwrap();
        let source = site(dir.path());
        let versions = source.join("versions");
        fs::create_dir_all(&versions).unwrap();
        fs::write(versions.join("web_static_20200101000000.tgz"), "old").unwrap();
        let packager = Packager::new(source.join("."), &versions);

        let archive = packager.pack_at(stamp()).unwrap();
        let paths = entry_paths(&archive);

        assert!(paths.iter().any(|p| p == "web_static/index.html"));
        assert!(paths.iter().all(|p| !p.contains("versions")));
        assert_eq!(crate::archive::single_root(&archive).unwrap(), "web_static");
    }

    #[test]
    fn symlinks_are_stored_as_links() {
        let dir = tempfile::tempdir().unwrap();
        let source = site(dir.path());
        std::os::unix::fs::symlink("index.html", source.join("home.html")).unwrap();

        let archive = Packager::new(&source, dir.path().join("versions"))
            .pack_at(stamp())
            .unwrap();

        let file = File::open(&archive).unwrap();
        let mut tar = tar::Archive::new(GzDecoder::new(file));
        let link = tar
            .entries()
            .unwrap()
            .map(|e| e.unwrap())
            .find(|e| e.path().unwrap().to_string_lossy() == "web_static/home.html")
            .unwrap();
        assert!(link.header().entry_type().is_symlink());
        assert_eq!(
            link.link_name().unwrap().unwrap().to_string_lossy(),
            "index.html"
        );
    }
}
