// ABOUTME: Pull command implementation.
// ABOUTME: Pre-fetches every image the manifest references.

use dockhand::config::Manifest;
use dockhand::error::Result;
use dockhand::manager::DockerManager;

/// Pull every image the manifest references, skipping already-pulled ones.
pub async fn pull(manifest: Manifest) -> Result<()> {
    let host = manifest.host.clone();
    let manager = DockerManager::new();

    for spec in manifest.containers.iter() {
        if manager.has_image(&host, spec.image.as_deref()) {
            continue;
        }
        println!("  → Pulling image for {}...", spec.name);
        manager.pull_image(&host, spec.image.as_deref()).await?;
    }

    println!("  ✓ Images up to date");
    Ok(())
}
