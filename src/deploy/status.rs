// ABOUTME: Read-only view of which release a host is serving.
// ABOUTME: Resolves the `current` link and lists release directories.

use crate::remote::{RemoteHost, RemoteLayout, Result};

/// What a host is serving and what it has on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostStatus {
    /// Release name `current` points at, if the link exists.
    pub current: Option<String>,
    /// Release directory names, sorted.
    pub releases: Vec<String>,
}

pub async fn host_status<H: RemoteHost + ?Sized>(
    host: &H,
    layout: &RemoteLayout,
) -> Result<HostStatus> {
    let current = host
        .read_link(&layout.current())
        .await?
        .and_then(|target| release_name(&target));

    let mut releases = host.list_dir(&layout.releases_dir()).await?;
    releases.sort();

    Ok(HostStatus { current, releases })
}

fn release_name(target: &str) -> Option<String> {
    target
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_name_tolerates_trailing_slash() {
        assert_eq!(
            release_name("/data/web_static/releases/web_static_1/").as_deref(),
            Some("web_static_1")
        );
        assert_eq!(release_name("web_static_1").as_deref(), Some("web_static_1"));
        assert_eq!(release_name("/"), None);
    }
}
