// ABOUTME: Deploy and release command implementations.
// ABOUTME: Runs one rollout per host under a deploy lock and keeps going past failed hosts.

use crate::cli::TargetArgs;
use std::path::{Path, PathBuf};
use webship::archive::Packager;
use webship::config::{Config, ServerConfig};
use webship::deploy::{DeployLock, Deployed, Deployer};
use webship::diagnostics::{Diagnostics, Warning};
use webship::error::{Error, Result};
use webship::output::Output;
use webship::release::Release;
use webship::remote::{DryRunHost, LocalHost, RecordingHost, RemoteHost, SshHost};
use webship::ssh::Session;

/// Where and how a deploy runs.
pub struct Target {
    pub force: bool,
    pub local_root: Option<PathBuf>,
    pub dry_run: bool,
}

impl From<TargetArgs> for Target {
    fn from(args: TargetArgs) -> Self {
        Self {
            force: args.force,
            local_root: args.local_root,
            dry_run: args.dry_run,
        }
    }
}

/// Deploy an existing archive to every configured server.
pub async fn deploy(
    config: &Config,
    project_dir: &Path,
    archive: &Path,
    target: &Target,
    mut output: Output,
) -> Result<()> {
    // Checked once up front so a bad path never opens a connection.
    let release = Release::from_archive(archive)?;

    output.start_timer();
    deploy_everywhere(config, project_dir, &release, target, &output).await
}

/// Pack the content directory once, then deploy the new archive everywhere.
pub async fn release(
    config: &Config,
    project_dir: &Path,
    target: &Target,
    mut output: Output,
) -> Result<()> {
    output.start_timer();

    let packager = Packager::from_config(config, project_dir);
    output.progress(&format!("Packing {}", packager.source().display()));
    let release = Release::pack(&packager)?;
    output.progress(&format!("  → Created {}", release.archive().display()));

    deploy_everywhere(config, project_dir, &release, target, &output).await
}

async fn deploy_everywhere(
    config: &Config,
    project_dir: &Path,
    release: &Release,
    target: &Target,
    output: &Output,
) -> Result<()> {
    let deployer = Deployer::from_config(config, project_dir);
    let archive = release.archive();
    let mut diag = Diagnostics::default();

    let outcomes = if let Some(root) = &target.local_root {
        output.progress(&format!(
            "Deploying {} into {}",
            archive.display(),
            root.display()
        ));
        let host = LocalHost::new(root);
        let result = release
            .deploy_to(&deployer, &host)
            .await
            .map_err(Error::from);
        vec![(host.name().to_string(), result)]
    } else {
        output.progress(&format!(
            "Deploying {} to {} server(s)",
            archive.display(),
            config.servers.len()
        ));
        let mut outcomes = Vec::with_capacity(config.servers.len());
        for server in &config.servers {
            let result = if target.dry_run {
                dry_run(&deployer, server, release, output).await
            } else {
                deploy_to_server(
                    config,
                    server,
                    &deployer,
                    release,
                    target.force,
                    output,
                    &mut diag,
                )
                .await
            };
            outcomes.push((server.host.clone(), result));
        }
        outcomes
    };

    let total = outcomes.len();
    let mut failed = 0;
    for (host, result) in &outcomes {
        match result {
            Ok(deployed) => output.host_result(host, Ok(deployed.stem())),
            Err(e) => {
                failed += 1;
                if let Error::Deploy(err) = e
                    && !err.is_retry_safe()
                {
                    diag.warn(Warning::partial_release(format!(
                        "{} may hold a partial release after the {} step failed",
                        host,
                        err.kind()
                    )));
                }
                output.host_result(host, Err(e.to_string().as_str()));
            }
        }
    }

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    if failed > 0 {
        return Err(Error::HostsFailed { failed, total });
    }

    output.success("Deployment complete!");
    Ok(())
}

/// Plan the rollout for one server and print each operation instead of running it.
async fn dry_run(
    deployer: &Deployer,
    server: &ServerConfig,
    release: &Release,
    output: &Output,
) -> Result<Deployed> {
    let host = RecordingHost::new(DryRunHost::new(&server.host));
    let deployed = release.deploy_to(deployer, &host).await?;

    output.progress(&format!("  {} (dry run):", server.host));
    for op in host.ops() {
        output.progress(&format!("    {}", op));
    }
    Ok(deployed)
}

/// Deploy to a single server.
async fn deploy_to_server(
    config: &Config,
    server: &ServerConfig,
    deployer: &Deployer,
    release: &Release,
    force: bool,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<Deployed> {
    output.progress(&format!("  → Connecting to {}...", server.host));

    let session = Session::connect(server.session_config(config.command_timeout)).await?;
    let host = SshHost::new(session, config.remote.privileged);

    let result = deploy_locked(config, &host, deployer, release, force, output, diag).await;

    // Disconnect SSH session (non-fatal if it fails)
    if let Err(e) = host.disconnect().await {
        diag.warn(Warning::ssh_disconnect(format!(
            "SSH disconnect failed for {}: {}",
            server.host, e
        )));
    }

    result
}

/// Run the rollout while holding the site's deploy lock.
async fn deploy_locked(
    config: &Config,
    host: &SshHost,
    deployer: &Deployer,
    release: &Release,
    force: bool,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<Deployed> {
    output.progress("  → Acquiring deploy lock...");
    let lock = DeployLock::acquire(host.session(), &config.site, force).await?;

    output.progress(&format!("  → Rolling out {}...", release.archive().display()));
    let result = release.deploy_to(deployer, host).await;

    if let Err(e) = lock.release().await {
        diag.warn(Warning::lock_release(format!(
            "failed to release deploy lock on {}: {}",
            host.name(),
            e
        )));
    }

    Ok(result?)
}
