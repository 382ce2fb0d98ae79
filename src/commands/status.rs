// ABOUTME: Status command implementation.
// ABOUTME: Refreshes manifest containers from the daemon and prints a table or JSON.

use dockhand::config::Manifest;
use dockhand::error::Result;
use dockhand::manager::DockerManager;

/// Refresh each container from the daemon and print a table or JSON.
pub async fn status(mut manifest: Manifest, json: bool) -> Result<()> {
    let host = manifest.host.clone();
    let manager = DockerManager::new();

    for spec in manifest.containers.iter_mut() {
        manager.refresh_container(&host, spec).await?;
    }

    if json {
        let rows: Vec<_> = manifest
            .containers
            .iter()
            .map(|spec| {
                serde_json::json!({
                    "name": spec.name,
                    "container_id": spec.container_id,
                    "status": spec.state.to_string(),
                    "cpu_percent": spec.usage.as_ref().map(|u| u.cpu_percent),
                    "memory_used": spec.usage.as_ref().map(|u| u.memory_used),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!(
            "{:<20} {:<14} {:<10} {}",
            "NAME", "CONTAINER ID", "STATUS", "CPU%"
        );
        for spec in manifest.containers.iter() {
            let id = spec.container_id.as_deref().map(short_id).unwrap_or("-");
            let cpu = spec
                .usage
                .as_ref()
                .map(|u| format!("{:.1}", u.cpu_percent))
                .unwrap_or_else(|| "-".to_string());
            println!("{:<20} {:<14} {:<10} {}", spec.name, id, spec.state, cpu);
        }
    }
    Ok(())
}

/// First 12 characters of a full container id.
fn short_id(id: &str) -> &str {
    &id[..id.len().min(12)]
}
