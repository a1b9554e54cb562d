// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, defaults, discovery, and destination merging.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use webship::config::*;
use webship::deploy::{Activation, Deployer, LayoutPolicy};
use webship::error::Error;
use webship::remote::RemoteLayout;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let yaml = r#"
site: blog
servers:
  - web-01.example.com
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.site.as_str(), "blog");
        assert_eq!(config.servers.len(), 1);
        assert_eq!(config.source, PathBuf::from("web_static"));
        assert_eq!(config.versions_dir, PathBuf::from("versions"));
        assert_eq!(config.archive_prefix, "web_static");
        assert_eq!(config.remote, RemoteConfig::default());
        assert!(config.remote.privileged);
        assert_eq!(config.activation, Activation::Swap);
        assert_eq!(config.layout, LayoutPolicy::Strict);
        assert_eq!(config.command_timeout, Duration::from_secs(300));
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
site: blog
source: public
versions_dir: build/versions
archive_prefix: blog

servers:
  - deploy@web-01.example.com:2222
  - host: web-02.example.com
    user: ubuntu
    key: /home/me/.ssh/deploy
    trust_first_connection: true

remote:
  root: /srv/blog
  tmp_dir: /var/tmp
  privileged: false

activation: replace
layout: compat
command_timeout: 2m
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.source_name(Path::new("/nonexistent")), "public");
        assert_eq!(config.archive_prefix, "blog");

        let first = config.servers.first();
        assert_eq!(first.host, "web-01.example.com");
        assert_eq!(first.port, 2222);
        assert_eq!(first.user.as_deref(), Some("deploy"));

        let second = config.servers.get(1).unwrap();
        assert_eq!(second.user.as_deref(), Some("ubuntu"));
        assert_eq!(second.key, Some(PathBuf::from("/home/me/.ssh/deploy")));
        assert!(second.trust_first_connection);

        assert_eq!(config.remote.root, "/srv/blog");
        assert!(!config.remote.privileged);
        assert_eq!(config.activation, Activation::Replace);
        assert_eq!(config.layout, LayoutPolicy::Compat);
        assert_eq!(config.command_timeout, Duration::from_secs(120));
    }

    #[test]
    fn deployer_follows_config() {
        let yaml = r#"
site: blog
servers: [web-01]
remote:
  root: /srv/blog
  tmp_dir: /var/tmp
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let deployer = Deployer::from_config(&config, Path::new("/nonexistent"));
        assert_eq!(deployer.layout(), &RemoteLayout::new("/srv/blog", "/var/tmp"));
    }
}

mod validation {
    use super::*;

    fn invalid(yaml: &str) -> String {
        match Config::from_yaml(yaml) {
            Err(Error::InvalidConfig(msg)) => msg,
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_server_list() {
        let yaml = "site: blog\nservers: []\n";
        assert!(matches!(Config::from_yaml(yaml), Err(Error::Yaml(_))));
    }

    #[test]
    fn rejects_invalid_site_name() {
        let yaml = "site: \"my site\"\nservers: [web-01]\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn rejects_prefix_with_dot() {
        let msg = invalid("site: blog\narchive_prefix: blog.v2\nservers: [web-01]\n");
        assert!(msg.contains("archive_prefix"));
    }

    #[test]
    fn rejects_empty_prefix() {
        let msg = invalid("site: blog\narchive_prefix: \"\"\nservers: [web-01]\n");
        assert!(msg.contains("archive_prefix"));
    }

    #[test]
    fn rejects_relative_remote_root() {
        let msg = invalid("site: blog\nservers: [web-01]\nremote:\n  root: data/site\n");
        assert!(msg.contains("remote.root"));
    }

    #[test]
    fn rejects_filesystem_root_as_remote_root() {
        let msg = invalid("site: blog\nservers: [web-01]\nremote:\n  root: /\n");
        assert!(msg.contains("remote.root"));
    }

    #[test]
    fn rejects_unknown_activation() {
        let yaml = "site: blog\nservers: [web-01]\nactivation: teleport\n";
        assert!(Config::from_yaml(yaml).is_err());
    }
}

mod destinations {
    use super::*;

    const YAML: &str = r#"
site: blog
servers:
  - web-01.example.com
destinations:
  staging:
    servers:
      - staging.example.com
    remote:
      root: /srv/staging
      tmp_dir: /tmp
    activation: replace
  mirror: {}
"#;

    #[test]
    fn destination_overrides_servers_and_remote() {
        let config = Config::from_yaml(YAML).unwrap();
        let staging = config.for_destination("staging").unwrap();

        assert_eq!(staging.servers.first().host, "staging.example.com");
        assert_eq!(staging.remote.root, "/srv/staging");
        assert_eq!(staging.activation, Activation::Replace);
        assert_eq!(staging.site.as_str(), "blog");
    }

    #[test]
    fn empty_destination_keeps_base_values() {
        let config = Config::from_yaml(YAML).unwrap();
        let mirror = config.for_destination("mirror").unwrap();

        assert_eq!(mirror.servers.first().host, "web-01.example.com");
        assert_eq!(mirror.remote, RemoteConfig::default());
        assert_eq!(mirror.activation, Activation::Swap);
    }

    #[test]
    fn unknown_destination_is_an_error() {
        let config = Config::from_yaml(YAML).unwrap();
        assert!(matches!(
            config.for_destination("production"),
            Err(Error::UnknownDestination(name)) if name == "production"
        ));
    }
}

mod discovery {
    use super::*;

    #[test]
    fn finds_primary_file_first() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "site: primary\nservers: [a]\n").unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_ALT), "site: alt\nservers: [a]\n").unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.site.as_str(), "primary");
    }

    #[test]
    fn finds_config_in_dot_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".webship")).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_DIR), "site: hidden\nservers: [a]\n").unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.site.as_str(), "hidden");
    }

    #[test]
    fn missing_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::discover(dir.path()),
            Err(Error::ConfigNotFound(_))
        ));
    }

    #[test]
    fn dot_source_is_named_after_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("mysite");
        fs::create_dir_all(&project).unwrap();
        fs::write(
            project.join(CONFIG_FILENAME),
            "site: mysite\nsource: .\nservers: [a]\n",
        )
        .unwrap();

        let config = Config::discover(&project).unwrap();
        assert_eq!(config.source_name(&project), "mysite");
    }

    #[test]
    fn init_template_is_discoverable() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), Some("docs"), false).unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.site.as_str(), "docs");
        assert_eq!(config.servers.len(), 2);
    }
}
