// ABOUTME: SSH session management using russh.
// ABOUTME: Handles connection, authentication, command execution, and file upload.

use super::error::{Error, Result};
use crate::remote::shell;
use russh::client::{self, Config, Handle, Msg};
use russh::keys::agent::client::AgentClient;
use russh::keys::known_hosts::{
    check_known_hosts, check_known_hosts_path, learn_known_hosts, learn_known_hosts_path,
};
use russh::keys::{PrivateKeyWithHashAlg, load_secret_key, ssh_key};
use russh::{Channel, ChannelMsg, Disconnect};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UnixStream;

/// Configuration for establishing an SSH session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Remote host to connect to.
    pub host: String,
    /// SSH port (default: 22).
    pub port: u16,
    /// Username for authentication.
    pub user: String,
    /// Optional path to private key file.
    /// If None, will try SSH agent then default key locations.
    pub key_path: Option<PathBuf>,
    /// Whether to accept unknown hosts (Trust On First Use).
    /// If false, connection to unknown hosts will fail.
    pub trust_on_first_use: bool,
    /// Optional path to known_hosts file.
    /// If None, uses the default ~/.ssh/known_hosts.
    pub known_hosts_path: Option<PathBuf>,
    /// Timeout for command execution and uploads (default: 5 minutes).
    pub command_timeout: Duration,
}

impl SessionConfig {
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            user: user.into(),
            key_path: None,
            trust_on_first_use: false,
            known_hosts_path: None,
            command_timeout: Duration::from_secs(300),
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn key_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_path = Some(path.into());
        self
    }

    pub fn trust_on_first_use(mut self, tofu: bool) -> Self {
        self.trust_on_first_use = tofu;
        self
    }

    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }
}

/// Output from a remote command execution.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code of the command.
    pub exit_code: u32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// SSH client handler for russh.
pub(crate) struct SshHandler {
    host: String,
    port: u16,
    trust_on_first_use: bool,
    known_hosts_path: Option<PathBuf>,
}

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &ssh_key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        let check_result = match &self.known_hosts_path {
            Some(path) => check_known_hosts_path(&self.host, self.port, server_public_key, path),
            None => check_known_hosts(&self.host, self.port, server_public_key),
        };

        match check_result {
            Ok(true) => Ok(true),
            Ok(false) if self.trust_on_first_use => {
                tracing::warn!(
                    "Trust-On-First-Use: accepting unknown host key for {}:{}",
                    self.host,
                    self.port
                );
                let learn_result = match &self.known_hosts_path {
                    Some(path) => {
                        learn_known_hosts_path(&self.host, self.port, server_public_key, path)
                    }
                    None => learn_known_hosts(&self.host, self.port, server_public_key),
                };
                if let Err(e) = learn_result {
                    tracing::warn!("Failed to save host key to known_hosts: {}", e);
                }
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(russh::keys::Error::KeyChanged { .. }) => {
                tracing::warn!(
                    "Host key for {}:{} does not match known_hosts",
                    self.host,
                    self.port
                );
                Ok(false)
            }
            Err(_) => Ok(self.trust_on_first_use),
        }
    }
}

/// Authentication method resolved from config.
enum AuthMethod {
    Agent(AgentClient<UnixStream>),
    KeyFile(Arc<ssh_key::PrivateKey>),
}

/// An established SSH session.
pub struct Session {
    config: SessionConfig,
    handle: Handle<SshHandler>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("handle", &"<russh::Handle>")
            .finish()
    }
}

impl Session {
    /// Connect to the remote host.
    pub async fn connect(config: SessionConfig) -> Result<Self> {
        let auth_method = Self::resolve_auth_method(&config).await?;

        let russh_config = Config {
            inactivity_timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        let handler = SshHandler {
            host: config.host.clone(),
            port: config.port,
            trust_on_first_use: config.trust_on_first_use,
            known_hosts_path: config.known_hosts_path.clone(),
        };

        tracing::debug!("connecting to {}@{}:{}", config.user, config.host, config.port);
        let mut handle = client::connect(
            Arc::new(russh_config),
            (config.host.as_str(), config.port),
            handler,
        )
        .await
        .map_err(|e| {
            if e.to_string().contains("Connection refused") {
                Error::Connection(format!(
                    "connection refused to {}:{}",
                    config.host, config.port
                ))
            } else {
                Error::Connection(e.to_string())
            }
        })?;

        let auth_success = Self::authenticate(&mut handle, &config, auth_method).await?;
        if !auth_success {
            return Err(Error::AuthenticationFailed);
        }

        Ok(Self { config, handle })
    }

    /// Host this session is connected to.
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Resolve which authentication method to use.
    async fn resolve_auth_method(config: &SessionConfig) -> Result<AuthMethod> {
        if let Some(key_path) = &config.key_path {
            let key = load_secret_key(key_path, None).map_err(|e| Error::KeyLoadFailed {
                path: key_path.clone(),
                reason: e.to_string(),
            })?;
            return Ok(AuthMethod::KeyFile(Arc::new(key)));
        }

        if let Ok(agent) = AgentClient::connect_env().await {
            return Ok(AuthMethod::Agent(agent));
        }

        // Fall back to default key locations
        let home = std::env::var("HOME").map_err(|_| {
            Error::AgentUnavailable("SSH agent not available and HOME not set".to_string())
        })?;

        let default_keys = [
            format!("{}/.ssh/id_ed25519", home),
            format!("{}/.ssh/id_rsa", home),
            format!("{}/.ssh/id_ecdsa", home),
        ];

        for key_path in &default_keys {
            if let Ok(key) = load_secret_key(key_path, None) {
                return Ok(AuthMethod::KeyFile(Arc::new(key)));
            }
        }

        Err(Error::AgentUnavailable(
            "SSH agent not available and no default keys found".to_string(),
        ))
    }

    async fn authenticate(
        handle: &mut Handle<SshHandler>,
        config: &SessionConfig,
        auth_method: AuthMethod,
    ) -> Result<bool> {
        match auth_method {
            AuthMethod::Agent(mut agent) => {
                let keys = agent.request_identities().await.map_err(|e| {
                    Error::AgentUnavailable(format!("failed to list agent keys: {}", e))
                })?;

                if keys.is_empty() {
                    return Err(Error::AgentUnavailable("no keys in SSH agent".to_string()));
                }

                for key in &keys {
                    match handle
                        .authenticate_publickey_with(&config.user, key.clone(), None, &mut agent)
                        .await
                    {
                        Ok(result) if result.success() => return Ok(true),
                        _ => continue,
                    }
                }
                Ok(false)
            }
            AuthMethod::KeyFile(key) => {
                let hash_alg = handle
                    .best_supported_rsa_hash()
                    .await
                    .map_err(Error::Protocol)?
                    .flatten();

                let result = handle
                    .authenticate_publickey(&config.user, PrivateKeyWithHashAlg::new(key, hash_alg))
                    .await
                    .map_err(Error::Protocol)?;

                Ok(result.success())
            }
        }
    }

    /// Execute a command on the remote host.
    pub async fn exec(&self, command: &str) -> Result<CommandOutput> {
        self.exec_with_timeout(command, self.config.command_timeout)
            .await
    }

    /// Execute a command with a custom timeout.
    pub async fn exec_with_timeout(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<CommandOutput> {
        tracing::debug!("{}: {}", self.config.host, command);
        match tokio::time::timeout(timeout, self.exec_inner(command)).await {
            Ok(result) => result,
            Err(_) => Err(Error::CommandTimeout(timeout)),
        }
    }

    async fn exec_inner(&self, command: &str) -> Result<CommandOutput> {
        let channel = self.open_exec(command).await?;
        collect_output(channel).await
    }

    /// Stream a local file into `remote` through `cat` on the host.
    pub async fn upload(&self, local: &Path, remote: &str) -> Result<()> {
        let timeout = self.config.command_timeout;
        match tokio::time::timeout(timeout, self.upload_inner(local, remote)).await {
            Ok(result) => result,
            Err(_) => Err(Error::CommandTimeout(timeout)),
        }
    }

    async fn upload_inner(&self, local: &Path, remote: &str) -> Result<()> {
        let file = tokio::fs::File::open(local).await?;
        let command = shell::upload_sink(remote);
        tracing::debug!("{}: {} < {}", self.config.host, command, local.display());

        let channel = self.open_exec(&command).await?;
        channel
            .data(file)
            .await
            .map_err(|e| Error::UploadFailed(format!("failed to send data: {}", e)))?;
        channel
            .eof()
            .await
            .map_err(|e| Error::UploadFailed(format!("failed to close stream: {}", e)))?;

        let output = collect_output(channel).await?;
        if !output.success() {
            return Err(Error::UploadFailed(format!(
                "`{}` exited with status {}: {}",
                command,
                output.exit_code,
                output.stderr.trim()
            )));
        }
        Ok(())
    }

    async fn open_exec(&self, command: &str) -> Result<Channel<Msg>> {
        let channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|e| Error::CommandFailed(format!("failed to open channel: {}", e)))?;

        channel
            .exec(true, command)
            .await
            .map_err(|e| Error::CommandFailed(format!("failed to exec command: {}", e)))?;

        Ok(channel)
    }

    /// Disconnect the session.
    pub async fn disconnect(self) -> Result<()> {
        self.handle
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(Error::Protocol)?;
        Ok(())
    }
}

/// Drain a channel until it reports both an exit status and EOF.
async fn collect_output(mut channel: Channel<Msg>) -> Result<CommandOutput> {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut exit_code = 0u32;

    let mut got_exit_status = false;
    let mut got_eof = false;

    loop {
        match channel.wait().await {
            Some(ChannelMsg::Data { data }) => {
                stdout.extend_from_slice(&data);
            }
            Some(ChannelMsg::ExtendedData { data, ext }) => {
                // ext 1 is stderr
                if ext == 1 {
                    stderr.extend_from_slice(&data);
                }
            }
            Some(ChannelMsg::ExitStatus { exit_status }) => {
                exit_code = exit_status;
                got_exit_status = true;
                if got_eof {
                    break;
                }
            }
            Some(ChannelMsg::Eof) => {
                got_eof = true;
                if got_exit_status {
                    break;
                }
            }
            Some(ChannelMsg::Close) => {
                break;
            }
            Some(_) => {}
            None => break,
        }
    }

    // No exit status means the channel died (connection drop, timeout).
    if !got_exit_status {
        return Err(Error::ChannelClosed);
    }

    Ok(CommandOutput {
        exit_code,
        stdout: String::from_utf8_lossy(&stdout).to_string(),
        stderr: String::from_utf8_lossy(&stderr).to_string(),
    })
}
