// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Writes a commented webship.yml template.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::SiteName;

use super::CONFIG_FILENAME;

pub fn init_config(dir: &Path, site: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let site = SiteName::new(site.unwrap_or("web-static"))
        .map_err(|e| Error::InvalidConfig(e.to_string()))?;

    std::fs::write(&config_path, template_yaml(&site))?;
    Ok(())
}

fn template_yaml(site: &SiteName) -> String {
    format!(
        r#"site: {site}

# Content directory and where archives are written (relative to this file)
source: web_static
versions_dir: versions

servers:
  - ubuntu@web-01.example.com
  - host: web-02.example.com
    user: ubuntu
    # SSH host key verification (default: false for security)
    # Set to true to enable Trust-On-First-Use, or pre-populate ~/.ssh/known_hosts
    # trust_first_connection: true

remote:
  root: /data/web_static
  tmp_dir: /tmp
  privileged: true

# swap: rename a new link over `current` (never missing)
# replace: remove `current`, then link it again
activation: swap

# strict: require one top-level directory in the archive before deploying
# compat: assume it is named after `source`
layout: strict
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn template_parses_back() {
        let site = SiteName::new("blog").unwrap();
        let config = Config::from_yaml(&template_yaml(&site)).unwrap();
        assert_eq!(config.site.as_str(), "blog");
        assert_eq!(config.servers.len(), 2);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "site: x").unwrap();

        assert!(matches!(
            init_config(dir.path(), None, false),
            Err(Error::AlreadyExists(_))
        ));
        init_config(dir.path(), None, true).unwrap();
    }

    #[test]
    fn rejects_invalid_site_name() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            init_config(dir.path(), Some("My Site"), false),
            Err(Error::InvalidConfig(_))
        ));
    }
}
