// ABOUTME: Down command implementation.
// ABOUTME: Stops and removes manifest containers, dependents first.

use dockhand::config::Manifest;
use dockhand::error::Result;
use dockhand::manager::DockerManager;

/// Stop and remove every manifest container, dependents first.
pub async fn down(manifest: Manifest) -> Result<()> {
    let order = manifest.creation_order()?;
    let host = manifest.host.clone();
    let manager = DockerManager::new();

    for name in order.iter().rev() {
        let Some(spec) = manifest.containers.iter().find(|c| c.name == *name) else {
            continue;
        };
        println!("  → Stopping {}...", name);
        if let Err(e) = manager.stop_container(&host, spec).await {
            match e.status_code() {
                // Already stopped or already gone is fine for down
                Some(304 | 404) => tracing::debug!(container = %name, "nothing to stop: {}", e),
                _ => return Err(e.into()),
            }
        }
        println!("  → Removing {}...", name);
        if let Err(e) = manager.remove_container(&host, spec).await {
            match e.status_code() {
                Some(404) => tracing::debug!(container = %name, "nothing to remove: {}", e),
                _ => return Err(e.into()),
            }
        }
    }

    println!("  ✓ {} container(s) down", order.len());
    Ok(())
}
