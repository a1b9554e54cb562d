// ABOUTME: Remote directory convention for releases and the activation pointer.
// ABOUTME: Derives every remote path from a configurable root and temp directory.

use crate::config::RemoteConfig;

pub const DEFAULT_ROOT: &str = "/data/web_static";
pub const DEFAULT_TMP_DIR: &str = "/tmp";

/// Where releases, the `current` pointer, and uploads live on a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLayout {
    root: String,
    tmp_dir: String,
}

impl Default for RemoteLayout {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT, DEFAULT_TMP_DIR)
    }
}

impl RemoteLayout {
    pub fn new(root: impl Into<String>, tmp_dir: impl Into<String>) -> Self {
        Self {
            root: trim_slashes(root.into()),
            tmp_dir: trim_slashes(tmp_dir.into()),
        }
    }

    pub fn from_config(config: &RemoteConfig) -> Self {
        Self::new(config.root.clone(), config.tmp_dir.clone())
    }

    pub fn releases_dir(&self) -> String {
        format!("{}/releases", self.root)
    }

    pub fn release_dir(&self, stem: &str) -> String {
        format!("{}/releases/{}", self.root, stem)
    }

    /// The activation pointer.
    pub fn current(&self) -> String {
        format!("{}/current", self.root)
    }

    /// Link built next to `current` and renamed over it during a swap.
    pub fn staging_link(&self) -> String {
        format!("{}/current.next", self.root)
    }

    pub fn upload_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.tmp_dir, file_name)
    }
}

fn trim_slashes(mut path: String) -> String {
    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_convention() {
        let layout = RemoteLayout::default();
        assert_eq!(layout.releases_dir(), "/data/web_static/releases");
        assert_eq!(
            layout.release_dir("web_static_20240101120000"),
            "/data/web_static/releases/web_static_20240101120000"
        );
        assert_eq!(layout.current(), "/data/web_static/current");
        assert_eq!(
            layout.upload_path("web_static_20240101120000.tgz"),
            "/tmp/web_static_20240101120000.tgz"
        );
    }

    #[test]
    fn trailing_slashes_are_ignored() {
        let layout = RemoteLayout::new("/srv/site/", "/var/tmp//");
        assert_eq!(layout.current(), "/srv/site/current");
        assert_eq!(layout.upload_path("a.tgz"), "/var/tmp/a.tgz");
    }

    #[test]
    fn staging_link_sits_beside_current() {
        let layout = RemoteLayout::default();
        assert_eq!(layout.staging_link(), "/data/web_static/current.next");
    }
}
