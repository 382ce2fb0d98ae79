// ABOUTME: Manifest types and parsing for dockhand.yml.
// ABOUTME: Handles YAML parsing, reference validation, and template generation.

mod init;

pub use init::init_manifest;

use crate::error::{Error, Result};
use crate::model::{ContainerSpec, DependencyGraph, Host, NetworkAttachment, NetworkSpec};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

pub const MANIFEST_FILENAME: &str = "dockhand.yml";
pub const MANIFEST_FILENAME_ALT: &str = "dockhand.yaml";

/// A parsed manifest: one host, the containers to run on it, and the
/// networks and links between them.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Target daemon. Defaults to the local one.
    #[serde(default)]
    pub host: Host,

    #[serde(deserialize_with = "deserialize_containers")]
    pub containers: NonEmpty<ContainerSpec>,

    #[serde(default)]
    pub networks: Vec<NetworkSpec>,

    /// Container-to-container links, keyed by the dependent container.
    #[serde(default)]
    pub links: DependencyGraph,

    /// Requested container-to-network attachments.
    #[serde(default)]
    pub attachments: Vec<NetworkAttachment>,
}

impl Manifest {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let manifest: Manifest = serde_yaml::from_str(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [dir.join(MANIFEST_FILENAME), dir.join(MANIFEST_FILENAME_ALT)];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ManifestNotFound(dir.to_path_buf()))
    }

    pub fn container_names(&self) -> Vec<String> {
        self.containers.iter().map(|c| c.name.clone()).collect()
    }

    /// Container names ordered so link targets come before their dependents.
    pub fn creation_order(&self) -> Result<Vec<String>> {
        self.links
            .creation_order(&self.container_names())
            .map_err(Error::InvalidManifest)
    }

    /// Reject manifests with blank or duplicate container names, links or
    /// attachments that point at undeclared resources, or a link cycle.
    fn validate(&self) -> Result<()> {
        let names = self.container_names();

        for spec in self.containers.iter() {
            if spec.name.trim().is_empty() {
                return Err(Error::InvalidManifest(
                    "container names cannot be blank".to_string(),
                ));
            }
        }

        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(Error::InvalidManifest(format!(
                    "duplicate container name: {}",
                    name
                )));
            }
        }

        for (source, targets) in self.links.iter() {
            if !names.iter().any(|n| n == source) {
                return Err(Error::InvalidManifest(format!(
                    "link source {} is not a declared container",
                    source
                )));
            }
            for target in targets {
                if !names.iter().any(|n| n == target) {
                    return Err(Error::InvalidManifest(format!(
                        "link target {} is not a declared container",
                        target
                    )));
                }
            }
        }

        for attachment in &self.attachments {
            if !names.iter().any(|n| n == &attachment.container) {
                return Err(Error::InvalidManifest(format!(
                    "attachment references undeclared container {}",
                    attachment.container
                )));
            }
            if !self.networks.iter().any(|n| n.name == attachment.network) {
                return Err(Error::InvalidManifest(format!(
                    "attachment references undeclared network {}",
                    attachment.network
                )));
            }
        }

        // Cycles fail here rather than halfway through creation.
        self.links
            .creation_order(&names)
            .map_err(Error::InvalidManifest)?;

        Ok(())
    }

    pub fn template() -> Self {
        let mut web = ContainerSpec::named("web");
        web.image = Some("nginx:latest".to_string());
        web.ports = Some("8080:80".to_string());

        Manifest {
            host: Host::local(),
            containers: NonEmpty::new(web),
            networks: Vec::new(),
            links: DependencyGraph::new(),
            attachments: Vec::new(),
        }
    }
}

// Custom deserializers

fn deserialize_containers<'de, D>(
    deserializer: D,
) -> std::result::Result<NonEmpty<ContainerSpec>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<ContainerSpec> = Vec::deserialize(deserializer)?;
    NonEmpty::from_vec(values)
        .ok_or_else(|| serde::de::Error::custom("at least one container is required"))
}
