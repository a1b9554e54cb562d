// ABOUTME: Local inspection of an archive's top-level layout.
// ABOUTME: Used to check that flattening will find the directory it expects.

use super::error::LayoutError;
use flate2::read::GzDecoder;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Component, Path};

/// Return the name of the one directory every entry of `archive` lives under.
pub fn single_root(archive: &Path) -> Result<String, LayoutError> {
    let file = File::open(archive)?;
    let mut tar = tar::Archive::new(GzDecoder::new(file));

    let mut roots = BTreeSet::new();
    for entry in tar.entries()? {
        let entry = entry?;
        let entry_type = entry.header().entry_type();
        // `git archive` output starts with one of these; it is metadata, not content.
        if entry_type.is_pax_global_extensions() {
            continue;
        }
        let is_dir = entry_type.is_dir();
        let path = entry.path()?.into_owned();

        let mut components = path
            .components()
            .filter(|c| !matches!(c, Component::CurDir));
        let Some(first) = components.next() else {
            continue;
        };
        let first = first.as_os_str().to_string_lossy().into_owned();

        if components.next().is_none() && !is_dir {
            return Err(LayoutError::LooseFile(first));
        }
        roots.insert(first);
    }

    let mut roots = roots.into_iter();
    match (roots.next(), roots.next()) {
        (None, _) => Err(LayoutError::Empty),
        (Some(root), None) => Ok(root),
        (Some(first), Some(second)) => {
            let mut all = vec![first, second];
            all.extend(roots);
            Err(LayoutError::MultipleRoots(all))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    fn archive_with(dir: &Path, entries: &[&str]) -> std::path::PathBuf {
        let path = dir.join("test.tgz");
        let file = File::create(&path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for name in entries {
            let data = b"x";
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, &data[..]).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
        path
    }

    #[test]
    fn finds_single_root() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_with(dir.path(), &["site/index.html", "site/css/a.css"]);
        assert_eq!(single_root(&archive).unwrap(), "site");
    }

    #[test]
    fn ignores_leading_current_dir() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_with(dir.path(), &["./site/index.html"]);
        assert_eq!(single_root(&archive).unwrap(), "site");
    }

    #[test]
    fn rejects_two_roots() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_with(dir.path(), &["a/index.html", "b/index.html"]);
        match single_root(&archive) {
            Err(LayoutError::MultipleRoots(roots)) => assert_eq!(roots, vec!["a", "b"]),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_top_level_file() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_with(dir.path(), &["index.html"]);
        assert!(matches!(
            single_root(&archive),
            Err(LayoutError::LooseFile(name)) if name == "index.html"
        ));
    }

    #[test]
    fn rejects_empty_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archive = archive_with(dir.path(), &[]);
        assert!(matches!(single_root(&archive), Err(LayoutError::Empty)));
    }

    #[test]
    fn skips_pax_global_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("git.tgz");
        let file = File::create(&path).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

        let record = b"15 comment=abc\n";
        let mut header = tar::Header::new_ustar();
        header.set_entry_type(tar::EntryType::XGlobalHeader);
        header.set_size(record.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, "pax_global_header", &record[..])
            .unwrap();

        let data = b"x";
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, "site/index.html", &data[..])
            .unwrap();
        builder.into_inner().unwrap().finish().unwrap();

        assert_eq!(single_root(&path).unwrap(), "site");
    }

    #[test]
    fn rejects_non_gzip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.tgz");
        std::fs::write(&path, b"not an archive").unwrap();
        assert!(matches!(single_root(&path), Err(LayoutError::Io(_))));
    }
}
