// ABOUTME: Logical host identity and the daemon endpoint it exposes.
// ABOUTME: Connections are keyed by host name, not by endpoint.

use serde::Deserialize;

/// Where a host's Docker daemon listens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Platform default socket, honoring `DOCKER_HOST`.
    #[default]
    Local,
    /// Unix socket path.
    Unix(String),
    /// HTTP address, e.g. `http://10.0.0.5:2375`.
    Tcp(String),
}

/// A machine running a Docker daemon.
///
/// Two hosts with the same name are the same binding as far as connection
/// pooling is concerned, matching the source model where the machine name is
/// the identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Host {
    #[serde(default = "local_host_name")]
    pub name: String,

    #[serde(default)]
    pub endpoint: Endpoint,
}

impl Host {
    /// The local machine, named after its hostname.
    pub fn local() -> Self {
        Self {
            name: local_host_name(),
            endpoint: Endpoint::Local,
        }
    }

    pub fn named(name: impl Into<String>, endpoint: Endpoint) -> Self {
        Self {
            name: name.into(),
            endpoint,
        }
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::local()
    }
}

fn local_host_name() -> String {
    gethostname::gethostname().to_string_lossy().into_owned()
}
