// ABOUTME: Live end-to-end test against a real Docker daemon.
// ABOUTME: Ignored by default; run with `cargo test -- --ignored` on a Docker host.

use dockhand::manager::DockerManager;
use dockhand::model::{ComputeStatus, ContainerSpec, Host};

#[tokio::test]
#[ignore] // Requires a running Docker daemon
async fn create_start_inspect_and_remove_a_container() {
    let host = Host::local();
    let manager = DockerManager::new();

    let mut spec = ContainerSpec::named("dockhand-e2e-web");
    spec.image = Some("nginx:latest".to_string());
    spec.ports = Some("8080:80".to_string());

    manager
        .pull_image(&host, spec.image.as_deref())
        .await
        .expect("pull should succeed");

    let id = manager
        .create_container(&host, &mut spec, None)
        .await
        .expect("create should succeed");
    assert_eq!(spec.container_id.as_deref(), Some(id.as_str()));

    manager
        .start_container(&host, &spec)
        .await
        .expect("start should succeed");

    let status = manager
        .current_status(&host, &spec)
        .await
        .expect("status should succeed");
    assert_eq!(status, ComputeStatus::Active);

    let details = manager
        .inspect_container(&host, &id)
        .await
        .expect("inspect should succeed");
    assert_eq!(
        details.name.as_deref().map(|n| n.trim_start_matches('/')),
        Some("dockhand-e2e-web")
    );

    manager
        .stop_container(&host, &spec)
        .await
        .expect("stop should succeed");
    manager
        .remove_container(&host, &spec)
        .await
        .expect("remove should succeed");
}

#[tokio::test]
#[ignore] // Requires a running Docker daemon
async fn refresh_samples_usage_for_a_running_container() {
    let host = Host::local();
    let manager = DockerManager::new();

    let mut spec = ContainerSpec::named("dockhand-e2e-idle");
    spec.image = Some("busybox".to_string());

    manager
        .pull_image(&host, spec.image.as_deref())
        .await
        .expect("pull should succeed");
    manager
        .create_container(&host, &mut spec, None)
        .await
        .expect("create should succeed");
    manager
        .start_container(&host, &spec)
        .await
        .expect("start should succeed");

    manager
        .refresh_container(&host, &mut spec)
        .await
        .expect("refresh should succeed");
    assert_eq!(spec.state, ComputeStatus::Active);
    assert!(spec.usage.is_some(), "running container should have a sample");

    manager
        .stop_container(&host, &spec)
        .await
        .expect("stop should succeed");
    manager
        .remove_container(&host, &spec)
        .await
        .expect("remove should succeed");
}
