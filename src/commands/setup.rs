// ABOUTME: Setup command implementation.
// ABOUTME: Runs a privileged provisioning command on a remote machine over SSH.

use dockhand::error::Result;
use dockhand::ssh::{self, SessionConfig};
use std::path::PathBuf;

/// Run a single privileged command on a remote machine through SSH.
pub async fn setup(
    host: String,
    command: String,
    user: String,
    port: u16,
    key: Option<PathBuf>,
    trust: bool,
    known_hosts: Option<PathBuf>,
) -> Result<()> {
    println!("  → Connecting to {}...", host);

    let mut config = SessionConfig::new(host, user)
        .port(port)
        .accept_new_hosts(trust);
    if let Some(key) = key {
        config = config.identity(key);
    }
    if let Some(path) = known_hosts {
        config = config.known_hosts(path);
    }

    let output = ssh::run_setup_command(config, &command).await?;
    print!("{}", output.stdout);
    eprint!("{}", output.stderr);

    if output.success() {
        println!("  ✓ Setup command succeeded");
        Ok(())
    } else {
        Err(ssh::Error::CommandFailed(format!(
            "setup command exited with {}",
            output.exit_code
        ))
        .into())
    }
}
