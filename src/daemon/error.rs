// ABOUTME: Error taxonomy for the daemon boundary with SNAFU pattern.
// ABOUTME: Splits daemon rejections from transport failures so callers can retry selectively.

use snafu::Snafu;

/// Errors crossing the Docker daemon boundary.
///
/// The source system folded all of these into one exception type; they are
/// kept distinct here so a caller can tell a rejected request apart from a
/// dead socket without parsing messages.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DockerError {
    #[snafu(display("cannot connect to daemon on {host}: {reason}"))]
    Connection { host: String, reason: String },

    #[snafu(display("{message}"))]
    Validation { message: String },

    #[snafu(display("daemon rejected request ({status_code}): {message}"))]
    Rejected { status_code: u16, message: String },

    #[snafu(display("transport failure talking to daemon: {source}"))]
    Transport { source: bollard::errors::Error },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockerErrorKind {
    /// Connection could not be built for the target host.
    Connection,
    /// Malformed declarative input, caught before any daemon call.
    Validation,
    /// The daemon answered with an error response.
    Rejected,
    /// Network or IO failure before a daemon answer arrived.
    Transport,
}

impl DockerError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DockerErrorKind {
        match self {
            DockerError::Connection { .. } => DockerErrorKind::Connection,
            DockerError::Validation { .. } => DockerErrorKind::Validation,
            DockerError::Rejected { .. } => DockerErrorKind::Rejected,
            DockerError::Transport { .. } => DockerErrorKind::Transport,
        }
    }

    /// HTTP status of a daemon rejection, if that is what this is.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            DockerError::Rejected { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        DockerError::Validation {
            message: message.into(),
        }
    }
}

/// Classify a client-library error: an error response from the daemon becomes
/// `Rejected` with its status; everything else never reached the daemon and
/// is `Transport`.
pub fn classify(err: bollard::errors::Error) -> DockerError {
    match err {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } => DockerError::Rejected {
            status_code,
            message,
        },
        other => DockerError::Transport { source: other },
    }
}
