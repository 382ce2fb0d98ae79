// ABOUTME: Declarative container description and its observed runtime state.
// ABOUTME: List-valued attributes keep the source model's `;`-delimited encoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Observed container state, as reported by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputeStatus {
    Active,
    Suspended,
    #[default]
    Inactive,
}

impl fmt::Display for ComputeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputeStatus::Active => write!(f, "active"),
            ComputeStatus::Suspended => write!(f, "suspended"),
            ComputeStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// One resource-usage sample for a running container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContainerUsage {
    pub cpu_percent: f64,
    pub memory_used: u64,
    pub memory_limit: u64,
    pub network_rx: u64,
    pub network_tx: u64,
    pub disk_read: u64,
    pub disk_write: u64,
    pub sampled_at: DateTime<Utc>,
}

/// Origin of a volume declared as a link on the container.
///
/// The source model dispatched on the linked resource's runtime type; here the
/// two shapes are explicit variants.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeSource {
    /// Adopt the volumes of another container.
    Container { name: String },
    /// Bind a host path into the container.
    HostPath { source: String, destination: String },
}

/// Declarative description of one container.
///
/// Attributes mirror the source model: most are optional free-form strings,
/// and list-valued ones (`ports`, `environment`, `dns`, ...) stay in their
/// `;`-delimited encoding. The translator owns all splitting and validation;
/// this type is deliberately dumb.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerSpec {
    pub name: String,

    #[serde(default)]
    pub image: Option<String>,

    /// Comma-delimited token list, e.g. `"sleep,9999"`.
    #[serde(default)]
    pub command: Option<String>,

    /// Comma-delimited token list.
    #[serde(default)]
    pub entrypoint: Option<String>,

    #[serde(default)]
    pub cpu_shares: Option<i64>,

    #[serde(default)]
    pub cpuset_cpus: Option<String>,

    #[serde(default)]
    pub cpuset_mems: Option<String>,

    /// Memory limit in bytes.
    #[serde(default)]
    pub mem_limit: Option<i64>,

    /// Memory-plus-swap limit in bytes.
    #[serde(default)]
    pub memory_swap: Option<i64>,

    #[serde(default)]
    pub hostname: Option<String>,

    #[serde(default)]
    pub domain_name: Option<String>,

    #[serde(default)]
    pub user: Option<String>,

    /// Network mode (`bridge`, `host`, `container:<name>`, ...).
    #[serde(default)]
    pub net: Option<String>,

    /// `;`-separated `containerPort[:hostPort]` tokens.
    #[serde(default)]
    pub ports: Option<String>,

    /// `;`-separated `KEY=value` entries.
    #[serde(default)]
    pub environment: Option<String>,

    /// `;`-separated resolver addresses.
    #[serde(default)]
    pub dns: Option<String>,

    /// `;`-separated search domains.
    #[serde(default)]
    pub dns_search: Option<String>,

    /// `;`-separated `host:ip` entries for /etc/hosts.
    #[serde(default)]
    pub add_host: Option<String>,

    /// `;`-separated destination paths (anonymous volumes).
    #[serde(default)]
    pub volumes: Option<String>,

    /// Volumes adopted from other containers or bound from host paths.
    #[serde(default)]
    pub mounts: Vec<VolumeSource>,

    /// `;`-separated capability names.
    #[serde(default)]
    pub cap_add: Option<String>,

    #[serde(default)]
    pub cap_drop: Option<String>,

    /// `;`-separated `key:value` legacy driver options.
    #[serde(default)]
    pub lxc_conf: Option<String>,

    #[serde(default)]
    pub working_dir: Option<String>,

    #[serde(default)]
    pub pid: Option<String>,

    /// Restart policy string, e.g. `"always"` or `"on-failure:3"`.
    #[serde(default)]
    pub restart: Option<String>,

    #[serde(default)]
    pub privileged: bool,

    #[serde(default)]
    pub read_only: bool,

    #[serde(default)]
    pub publish_all: bool,

    #[serde(default)]
    pub stdin_open: bool,

    #[serde(default)]
    pub tty: bool,

    #[serde(default)]
    pub monitored: bool,

    /// Spacing between usage samples when monitored.
    #[serde(default, with = "humantime_serde")]
    pub monitoring_interval: Option<Duration>,

    // Written back by the reconciler, never read from a manifest.
    #[serde(skip)]
    pub container_id: Option<String>,

    #[serde(skip)]
    pub state: ComputeStatus,

    #[serde(skip)]
    pub usage: Option<ContainerUsage>,
}

impl ContainerSpec {
    /// Minimal spec with just a name, everything else defaulted.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_fields_deserialize_with_defaults() {
        let spec: ContainerSpec = serde_yaml::from_str(
            r#"
name: web
image: nginx
ports: "8080:80;4043:443"
environment: "A=1;B=2"
monitored: true
monitoring_interval: 5s
"#,
        )
        .unwrap();

        assert_eq!(spec.name, "web");
        assert_eq!(spec.image.as_deref(), Some("nginx"));
        assert_eq!(spec.ports.as_deref(), Some("8080:80;4043:443"));
        assert!(spec.monitored);
        assert_eq!(spec.monitoring_interval, Some(Duration::from_secs(5)));
        assert!(!spec.privileged);
        assert_eq!(spec.state, ComputeStatus::Inactive);
        assert!(spec.container_id.is_none());
    }

    #[test]
    fn mounts_deserialize_as_tagged_variants() {
        let spec: ContainerSpec = serde_yaml::from_str(
            r#"
name: app
mounts:
  - container:
      name: data
  - host_path:
      source: /srv/app
      destination: /data
"#,
        )
        .unwrap();

        assert_eq!(
            spec.mounts,
            vec![
                VolumeSource::Container {
                    name: "data".to_string()
                },
                VolumeSource::HostPath {
                    source: "/srv/app".to_string(),
                    destination: "/data".to_string()
                },
            ]
        );
    }

    #[test]
    fn status_displays_lowercase() {
        assert_eq!(ComputeStatus::Active.to_string(), "active");
        assert_eq!(ComputeStatus::Suspended.to_string(), "suspended");
        assert_eq!(ComputeStatus::Inactive.to_string(), "inactive");
    }
}
