// ABOUTME: Up command implementation.
// ABOUTME: Creates networks and containers in link order, then starts and attaches them.

use dockhand::config::Manifest;
use dockhand::error::{Error, Result};
use dockhand::manager::DockerManager;
use dockhand::model::ContainerSpec;
use dockhand::types::{ContainerId, NetworkId};

/// Create networks, pull missing images, then create and start every
/// container in link order, finally wiring declared attachments.
pub async fn up(mut manifest: Manifest) -> Result<()> {
    let order = manifest.creation_order()?;
    let host = manifest.host.clone();
    let links = manifest.links.clone();
    let manager = DockerManager::new();

    for network in &mut manifest.networks {
        println!("  → Creating network {}...", network.name);
        manager.create_network(&host, network).await?;
    }

    for name in &order {
        let Some(spec) = container_mut(&mut manifest, name) else {
            continue;
        };
        if !manager.has_image(&host, spec.image.as_deref()) {
            println!("  → Pulling image for {}...", name);
            manager.pull_image(&host, spec.image.as_deref()).await?;
        }
        println!("  → Creating container {}...", name);
        manager.create_container(&host, spec, Some(&links)).await?;
    }

    for name in &order {
        let Some(spec) = container_mut(&mut manifest, name) else {
            continue;
        };
        println!("  → Starting {}...", name);
        let _monitor = manager.start_container(&host, spec).await?;
    }

    for attachment in &manifest.attachments {
        println!(
            "  → Attaching {} to {}...",
            attachment.container, attachment.network
        );
        let container_id = manifest
            .containers
            .iter()
            .find(|c| c.name == attachment.container)
            .and_then(|c| c.container_id.clone())
            .map(ContainerId::new)
            .ok_or_else(|| {
                Error::InvalidManifest(format!(
                    "attachment container {} has no recorded id",
                    attachment.container
                ))
            })?;
        let network_id = manifest
            .networks
            .iter()
            .find(|n| n.name == attachment.network)
            .and_then(|n| n.network_id.clone())
            .map(NetworkId::new)
            .ok_or_else(|| {
                Error::InvalidManifest(format!(
                    "attachment network {} has no recorded id",
                    attachment.network
                ))
            })?;
        manager
            .connect_container(&host, &container_id, &network_id)
            .await?;
    }

    println!("  ✓ {} container(s) up", order.len());
    Ok(())
}

fn container_mut<'a>(manifest: &'a mut Manifest, name: &str) -> Option<&'a mut ContainerSpec> {
    manifest.containers.iter_mut().find(|c| c.name == name)
}
