// ABOUTME: Server configuration for SSH connections.
// ABOUTME: Parses formats like "host", "user@host", "host:port", "user@host:port".

use crate::ssh::SessionConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub user: Option<String>,
    /// Private key to authenticate with instead of the agent.
    #[serde(default)]
    pub key: Option<PathBuf>,
    #[serde(default)]
    pub trust_first_connection: bool,
}

fn default_port() -> u16 {
    22
}

impl ServerConfig {
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("server address cannot be empty".to_string());
        }

        // Parse format: [user@]host[:port]
        let (user_part, rest) = match s.split_once('@') {
            Some((user, rest)) => (Some(user), rest),
            None => (None, s),
        };

        let (host, port) = match rest.rsplit_once(':') {
            Some((host, port_str)) => {
                let port = port_str
                    .parse::<u16>()
                    .map_err(|_| format!("invalid port: {}", port_str))?;
                (host, port)
            }
            None => (rest, 22),
        };

        if host.is_empty() {
            return Err("hostname cannot be empty".to_string());
        }
        if user_part.is_some_and(str::is_empty) {
            return Err("user cannot be empty".to_string());
        }

        Ok(ServerConfig {
            host: host.to_string(),
            port,
            user: user_part.map(str::to_string),
            key: None,
            trust_first_connection: false,
        })
    }

    /// Login user, falling back to $USER and then root.
    pub fn login_user(&self) -> String {
        self.user
            .clone()
            .unwrap_or_else(|| std::env::var("USER").unwrap_or_else(|_| "root".to_string()))
    }

    pub fn session_config(&self, command_timeout: Duration) -> SessionConfig {
        let config = SessionConfig::new(&self.host, self.login_user())
            .port(self.port)
            .trust_on_first_use(self.trust_first_connection)
            .command_timeout(command_timeout);
        match &self.key {
            Some(key) => config.key_path(key),
            None => config,
        }
    }
}
