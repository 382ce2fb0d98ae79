// ABOUTME: SSH sessions over russh for remote machine setup.
// ABOUTME: Key-file auth, known-hosts verification, one-shot command execution.

use super::error::{Error, Result};
use super::known_hosts;
use russh::client::{self, Config, Handle};
use russh::keys::known_hosts::{check_known_hosts, check_known_hosts_path};
use russh::keys::{PrivateKeyWithHashAlg, load_secret_key, ssh_key};
use russh::{ChannelMsg, Disconnect};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_EXEC_TIMEOUT: Duration = Duration::from_secs(300);

/// Connection settings for an SSH session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Remote host.
    pub host: String,
    /// SSH port, 22 unless overridden.
    pub port: u16,
    /// Login user.
    pub user: String,
    /// Private key file. Without one the usual names under ~/.ssh are tried.
    pub identity: Option<PathBuf>,
    /// Accept and record host keys not yet in known_hosts.
    pub accept_new_hosts: bool,
    /// known_hosts file; the user's default when absent.
    pub known_hosts: Option<PathBuf>,
    /// Upper bound on a single command execution.
    pub timeout: Duration,
}

impl SessionConfig {
    pub fn new(host: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            user: user.into(),
            identity: None,
            accept_new_hosts: false,
            known_hosts: None,
            timeout: DEFAULT_EXEC_TIMEOUT,
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn identity(mut self, path: impl Into<PathBuf>) -> Self {
        self.identity = Some(path.into());
        self
    }

    pub fn accept_new_hosts(mut self, accept: bool) -> Self {
        self.accept_new_hosts = accept;
        self
    }

    pub fn known_hosts(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// What a remote command produced.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: u32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Server key verification backed by a known_hosts file.
struct HostVerifier {
    host: String,
    port: u16,
    accept_new: bool,
    known_hosts: Option<PathBuf>,
}

impl HostVerifier {
    fn check(&self, key: &ssh_key::PublicKey) -> std::result::Result<bool, russh::keys::Error> {
        match &self.known_hosts {
            Some(path) => check_known_hosts_path(&self.host, self.port, key, path),
            None => check_known_hosts(&self.host, self.port, key),
        }
    }

    /// Persist a freshly trusted key so later connections recognize it.
    fn record(&self, key: &ssh_key::PublicKey) -> Result<()> {
        let path = match &self.known_hosts {
            Some(path) => path.clone(),
            None => default_known_hosts_path()?,
        };
        let entry_host = if self.port == 22 {
            self.host.clone()
        } else {
            format!("[{}]:{}", self.host, self.port)
        };
        let key_line = key
            .to_openssh()
            .map_err(|e| Error::KnownHosts(format!("cannot encode host key: {}", e)))?;
        known_hosts::record(&path, &entry_host, &key_line)
    }

    fn trust_unknown(&self, key: &ssh_key::PublicKey) -> bool {
        if !self.accept_new {
            return false;
        }
        tracing::warn!(
            "accepting unrecognized host key for {}:{} (trust on first use)",
            self.host,
            self.port
        );
        if let Err(e) = self.record(key) {
            tracing::warn!("could not save host key: {}", e);
        }
        true
    }
}

impl client::Handler for HostVerifier {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &ssh_key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        match self.check(server_public_key) {
            Ok(true) => Ok(true),
            Err(russh::keys::Error::KeyChanged { .. }) => {
                tracing::error!(
                    "host key for {}:{} does not match known_hosts, refusing",
                    self.host,
                    self.port
                );
                Ok(false)
            }
            // Unknown host, or a known_hosts file we cannot read.
            Ok(false) | Err(_) => Ok(self.trust_unknown(server_public_key)),
        }
    }
}

fn default_known_hosts_path() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| Error::KnownHosts("HOME not set, cannot locate known_hosts".to_string()))?;
    Ok(PathBuf::from(home).join(".ssh").join("known_hosts"))
}

/// An established, authenticated SSH session.
pub struct Session {
    config: SessionConfig,
    handle: Handle<HostVerifier>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Connect and authenticate with a private key.
    pub async fn connect(config: SessionConfig) -> Result<Self> {
        let key = load_identity(&config)?;
        let verifier = HostVerifier {
            host: config.host.clone(),
            port: config.port,
            accept_new: config.accept_new_hosts,
            known_hosts: config.known_hosts.clone(),
        };
        let ssh_config = Arc::new(Config {
            inactivity_timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        });

        let mut handle = client::connect(ssh_config, (config.host.as_str(), config.port), verifier)
            .await
            .map_err(|e| connect_error(&config.host, config.port, e))?;

        let rsa_hash = handle
            .best_supported_rsa_hash()
            .await
            .map_err(Error::Protocol)?
            .flatten();
        let auth = handle
            .authenticate_publickey(&config.user, PrivateKeyWithHashAlg::new(key, rsa_hash))
            .await
            .map_err(Error::Protocol)?;
        if !auth.success() {
            return Err(Error::AuthenticationFailed);
        }

        Ok(Self { config, handle })
    }

    /// Execute one command on the remote host.
    ///
    /// Bounded by the session's timeout; a command that overruns is cut off
    /// and reported as [`Error::Timeout`].
    pub async fn exec(&self, command: &str) -> Result<CommandOutput> {
        let limit = self.config.timeout;
        tokio::time::timeout(limit, self.run_command(command))
            .await
            .unwrap_or(Err(Error::Timeout(limit)))
    }

    async fn run_command(&self, command: &str) -> Result<CommandOutput> {
        let mut channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|e| Error::CommandFailed(format!("cannot open channel: {}", e)))?;
        channel
            .exec(true, command)
            .await
            .map_err(|e| Error::CommandFailed(format!("cannot send command: {}", e)))?;

        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let mut exit_code = None;
        let mut eof = false;

        while let Some(msg) = channel.wait().await {
            match msg {
                ChannelMsg::Data { data } => stdout.extend_from_slice(&data),
                ChannelMsg::ExtendedData { data, ext } if ext == 1 => {
                    stderr.extend_from_slice(&data)
                }
                ChannelMsg::ExitStatus { exit_status } => exit_code = Some(exit_status),
                ChannelMsg::Eof => eof = true,
                ChannelMsg::Close => break,
                _ => {}
            }
            if eof && exit_code.is_some() {
                break;
            }
        }

        // A channel that went away without an exit status means the command
        // was cut off, not that it finished.
        let Some(exit_code) = exit_code else {
            return Err(Error::ChannelClosed);
        };

        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
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

fn connect_error(host: &str, port: u16, e: russh::Error) -> Error {
    let text = e.to_string();
    if text.contains("Connection refused") {
        Error::Connection(format!("connection refused to {}:{}", host, port))
    } else {
        Error::Connection(text)
    }
}

/// Resolve the private key to authenticate with.
///
/// An explicit path must load; without one, the usual key names under
/// ~/.ssh are tried in turn.
fn load_identity(config: &SessionConfig) -> Result<Arc<ssh_key::PrivateKey>> {
    if let Some(path) = &config.identity {
        let key = load_secret_key(path, None).map_err(|e| Error::KeyUnreadable {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        return Ok(Arc::new(key));
    }

    let home = std::env::var("HOME")
        .map_err(|_| Error::MissingKey("no key given and HOME is not set".to_string()))?;
    let ssh_dir = PathBuf::from(home).join(".ssh");
    for name in ["id_ed25519", "id_rsa", "id_ecdsa"] {
        if let Ok(key) = load_secret_key(ssh_dir.join(name), None) {
            return Ok(Arc::new(key));
        }
    }

    Err(Error::MissingKey(format!(
        "no key given and none of the usual names exist under {}",
        ssh_dir.display()
    )))
}

/// Run a single privileged setup command on a remote machine.
///
/// The command is wrapped as `sudo sh -c "<command>"`, executed once and the
/// session is closed again regardless of the outcome.
pub async fn run_setup_command(config: SessionConfig, command: &str) -> Result<CommandOutput> {
    let wrapped = setup_command_line(command);
    let session = Session::connect(config).await?;
    tracing::debug!("running setup command: {}", wrapped);

    let result = session.exec(&wrapped).await;
    if let Err(e) = session.disconnect().await {
        tracing::debug!("disconnect after setup command failed: {}", e);
    }
    result
}

fn setup_command_line(command: &str) -> String {
    format!("sudo sh -c \"{}\"", command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_commands_run_under_a_root_shell() {
        assert_eq!(
            setup_command_line("apt-get install -y docker.io"),
            "sudo sh -c \"apt-get install -y docker.io\""
        );
    }

    #[test]
    fn session_config_defaults() {
        let config = SessionConfig::new("10.0.0.5", "docker");

        assert_eq!(config.port, 22);
        assert!(config.identity.is_none());
        assert!(!config.accept_new_hosts);
        assert_eq!(config.timeout, Duration::from_secs(300));
    }

    #[test]
    fn command_output_success_tracks_exit_code() {
        let ok = CommandOutput {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        };
        let failed = CommandOutput {
            exit_code: 127,
            stdout: String::new(),
            stderr: "sh: not found".to_string(),
        };

        assert!(ok.success());
        assert!(!failed.success());
    }

    #[test]
    fn missing_key_file_is_reported_with_its_path() {
        let config = SessionConfig::new("10.0.0.5", "docker").identity("/nonexistent/key/path");

        let err = load_identity(&config).unwrap_err();
        assert!(matches!(err, Error::KeyUnreadable { ref path, .. }
            if path == &PathBuf::from("/nonexistent/key/path")));
    }
}
