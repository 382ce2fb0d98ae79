// ABOUTME: Network provisioning against the daemon.
// ABOUTME: Creation is conflict-tolerant; attachment failures are fatal.

use super::DockerManager;
use crate::daemon::{DockerError, classify};
use crate::model::{Host, NetworkSpec};
use crate::types::{ContainerId, NetworkId};
use bollard::models::{Ipam, IpamConfig, NetworkConnectRequest, NetworkCreateRequest};

/// Subnet applied when a network declares none.
pub const DEFAULT_SUBNET: &str = "10.67.79.0/24";

/// Build the create request: one IPAM config carrying the subnet, with
/// gateway and IP range included only when declared.
pub(crate) fn build_network_request(spec: &NetworkSpec) -> NetworkCreateRequest {
    let subnet = spec
        .subnet
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_SUBNET);

    let config = IpamConfig {
        subnet: Some(subnet.to_string()),
        gateway: spec.gateway.clone().filter(|s| !s.trim().is_empty()),
        ip_range: spec.ip_range.clone().filter(|s| !s.trim().is_empty()),
        ..Default::default()
    };

    NetworkCreateRequest {
        name: spec.name.clone(),
        driver: spec.driver.clone().filter(|s| !s.trim().is_empty()),
        ipam: Some(Ipam {
            config: Some(vec![config]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

impl DockerManager {
    /// Create `netspec`'s network on `host` and write the daemon-assigned id
    /// back into the spec.
    ///
    /// Creation is idempotent under conflict: when the daemon rejects the
    /// name as taken (409, or 500 from older daemons), the existing network
    /// is looked up by name and adopted instead of failing.
    pub async fn create_network(
        &self,
        host: &Host,
        netspec: &mut NetworkSpec,
    ) -> Result<NetworkId, DockerError> {
        let client = self.pool.ensure(host)?;
        let request = build_network_request(netspec);

        let id = match client.create_network(request).await {
            Ok(response) => response.id,
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code,
                message,
            }) if status_code == 409 || status_code == 500 => {
                tracing::debug!(
                    network = %netspec.name,
                    status = status_code,
                    %message,
                    "network already exists, adopting it"
                );
                let existing = client
                    .inspect_network(
                        &netspec.name,
                        None::<bollard::query_parameters::InspectNetworkOptions>,
                    )
                    .await
                    .map_err(classify)?;
                existing.id.ok_or_else(|| DockerError::Rejected {
                    status_code,
                    message: format!(
                        "network {} exists but the daemon returned no id",
                        netspec.name
                    ),
                })?
            }
            Err(e) => return Err(classify(e)),
        };

        netspec.network_id = Some(id.clone());
        tracing::info!(network = %netspec.name, id = %id, host = %host.name, "network ready");
        Ok(NetworkId::new(id))
    }

    /// Attach a container to a network. Unlike creation, any rejection here
    /// is fatal.
    pub async fn connect_container(
        &self,
        host: &Host,
        container: &ContainerId,
        network: &NetworkId,
    ) -> Result<(), DockerError> {
        let client = self.pool.ensure(host)?;
        let config = NetworkConnectRequest {
            container: container.as_str().to_string(),
            endpoint_config: None,
        };
        client
            .connect_network(network.as_str(), config)
            .await
            .map_err(classify)?;
        tracing::info!(container = %container, network = %network, host = %host.name, "container attached");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_spec_gets_the_default_subnet_and_nothing_else() {
        let request = build_network_request(&NetworkSpec::named("backbone"));

        assert_eq!(request.name, "backbone");
        assert!(request.driver.is_none());

        let configs = request.ipam.unwrap().config.unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].subnet.as_deref(), Some(DEFAULT_SUBNET));
        assert!(configs[0].gateway.is_none());
        assert!(configs[0].ip_range.is_none());
    }

    #[test]
    fn declared_ipam_fields_land_in_the_single_config() {
        let mut spec = NetworkSpec::named("backbone");
        spec.driver = Some("bridge".to_string());
        spec.subnet = Some("10.1.0.0/16".to_string());
        spec.gateway = Some("10.1.0.1".to_string());
        spec.ip_range = Some("10.1.5.0/24".to_string());

        let request = build_network_request(&spec);
        assert_eq!(request.driver.as_deref(), Some("bridge"));

        let configs = request.ipam.unwrap().config.unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].subnet.as_deref(), Some("10.1.0.0/16"));
        assert_eq!(configs[0].gateway.as_deref(), Some("10.1.0.1"));
        assert_eq!(configs[0].ip_range.as_deref(), Some("10.1.5.0/24"));
    }

    #[test]
    fn blank_ipam_strings_are_treated_as_absent() {
        let mut spec = NetworkSpec::named("backbone");
        spec.subnet = Some("  ".to_string());
        spec.gateway = Some(String::new());

        let request = build_network_request(&spec);
        let configs = request.ipam.unwrap().config.unwrap();
        assert_eq!(configs[0].subnet.as_deref(), Some(DEFAULT_SUBNET));
        assert!(configs[0].gateway.is_none());
    }
}
