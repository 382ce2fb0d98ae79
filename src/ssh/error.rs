// ABOUTME: Error taxonomy for the SSH setup helper.
// ABOUTME: Connection, key, and remote-command failures, each with context.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ssh connection failed: {0}")]
    Connection(String),

    #[error("server rejected the offered key")]
    AuthenticationFailed,

    #[error("no private key available: {0}")]
    MissingKey(String),

    #[error("cannot read key {path}: {reason}")]
    KeyUnreadable { path: PathBuf, reason: String },

    #[error("remote command failed: {0}")]
    CommandFailed(String),

    #[error("remote command timed out after {0:?}")]
    Timeout(Duration),

    #[error("channel closed before the command reported an exit status")]
    ChannelClosed,

    #[error("known_hosts update failed: {0}")]
    KnownHosts(String),

    #[error("ssh protocol error: {0}")]
    Protocol(#[from] russh::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
