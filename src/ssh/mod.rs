// ABOUTME: SSH client module for remote machine setup.
// ABOUTME: Key-based authentication with known_hosts verification and one-shot commands.

mod client;
mod error;
pub mod known_hosts;

pub use client::{CommandOutput, Session, SessionConfig, run_setup_command};
pub use error::{Error, Result};
