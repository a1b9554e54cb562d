// ABOUTME: Status command implementation.
// ABOUTME: Reports the live release and the release directories present on each host.

use std::path::Path;
use webship::config::{Config, ServerConfig};
use webship::deploy::{HostStatus, host_status};
use webship::diagnostics::{Diagnostics, Warning};
use webship::error::{Error, Result};
use webship::output::Output;
use webship::remote::{LocalHost, RemoteLayout, SshHost};
use webship::ssh::Session;

pub async fn status(config: &Config, local_root: Option<&Path>, output: &Output) -> Result<()> {
    let layout = RemoteLayout::from_config(&config.remote);

    if let Some(root) = local_root {
        let host = LocalHost::new(root);
        let status = host_status(&host, &layout).await?;
        output.success(&describe(&root.display().to_string(), &status));
        return Ok(());
    }

    let mut diag = Diagnostics::default();
    let total = config.servers.len();
    let mut failed = 0;

    for server in &config.servers {
        match server_status(config, server, &layout, &mut diag).await {
            Ok(status) => output.success(&describe(&server.host, &status)),
            Err(e) => {
                failed += 1;
                output.host_result(&server.host, Err(e.to_string().as_str()));
            }
        }
    }

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    if failed > 0 {
        return Err(Error::HostsFailed { failed, total });
    }
    Ok(())
}

async fn server_status(
    config: &Config,
    server: &ServerConfig,
    layout: &RemoteLayout,
    diag: &mut Diagnostics,
) -> Result<HostStatus> {
    let session = Session::connect(server.session_config(config.command_timeout)).await?;
    let host = SshHost::new(session, config.remote.privileged);

    let result = host_status(&host, layout).await;

    if let Err(e) = host.disconnect().await {
        diag.warn(Warning::ssh_disconnect(format!(
            "SSH disconnect failed for {}: {}",
            server.host, e
        )));
    }

    Ok(result?)
}

fn describe(host: &str, status: &HostStatus) -> String {
    let current = status.current.as_deref().unwrap_or("none");
    format!(
        "{}: serving {} ({} release(s) on disk)",
        host,
        current,
        status.releases.len()
    )
}
