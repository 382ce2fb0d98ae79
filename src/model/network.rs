// ABOUTME: Declarative network description with IPAM parameters.
// ABOUTME: The provisioner fills in the daemon-assigned id after creation.

use serde::Deserialize;

/// Declarative description of one network.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkSpec {
    pub name: String,

    /// Network driver (`bridge`, `overlay`, ...). Daemon default when unset.
    #[serde(default)]
    pub driver: Option<String>,

    /// CIDR subnet. A fixed default applies when unset.
    #[serde(default)]
    pub subnet: Option<String>,

    #[serde(default)]
    pub gateway: Option<String>,

    #[serde(default)]
    pub ip_range: Option<String>,

    // Written back by the provisioner.
    #[serde(skip)]
    pub network_id: Option<String>,
}

impl NetworkSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Requested attachment of a manifest container to a manifest network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkAttachment {
    pub container: String,
    pub network: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_deserializes_with_optional_ipam() {
        let net: NetworkSpec = serde_yaml::from_str(
            r#"
name: backbone
driver: bridge
subnet: 10.67.79.0/24
gateway: 10.67.79.1
"#,
        )
        .unwrap();

        assert_eq!(net.name, "backbone");
        assert_eq!(net.driver.as_deref(), Some("bridge"));
        assert_eq!(net.subnet.as_deref(), Some("10.67.79.0/24"));
        assert_eq!(net.gateway.as_deref(), Some("10.67.79.1"));
        assert!(net.ip_range.is_none());
        assert!(net.network_id.is_none());
    }
}
