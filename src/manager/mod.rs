// ABOUTME: Reconciliation layer turning declarative specs into daemon actions.
// ABOUTME: Translation, lifecycle operations, networks, images, usage monitoring.

mod images;
mod network;
mod stats;
mod translate;

pub use images::ImageCache;
pub use network::DEFAULT_SUBNET;
pub use stats::UsageReceiver;
pub use translate::{CreateRequest, DEFAULT_IMAGE, FALLBACK_HOST_PORT, build_create_request};

use crate::daemon::{ConnectionPool, DockerError, classify};
use crate::model::{ComputeStatus, ContainerSpec, DependencyGraph, Host};
use crate::types::ContainerId;
use bollard::models::{ContainerInspectResponse, ContainerState, ContainerSummary};
use bollard::query_parameters::{
    CreateContainerOptions, CreateImageOptions, InspectContainerOptions, KillContainerOptions,
    ListContainersOptions, RemoveContainerOptions, RenameContainerOptions, StartContainerOptions,
    StopContainerOptions, WaitContainerOptions,
};
use futures::StreamExt;

/// Applies declarative container and network specs to Docker daemons.
///
/// Operations are idempotent pass-throughs: ensure a client for the target
/// host, translate the spec, submit, and write daemon-assigned state (ids,
/// status, usage) back into the spec. No operation retries and none rolls
/// back; a failed start after a successful create leaves the container
/// created.
///
/// All state lives behind sync primitives, so `&self` methods can be shared
/// across tasks.
#[derive(Default)]
pub struct DockerManager {
    pool: ConnectionPool,
    images: ImageCache,
    monitors: stats::Monitors,
}

impl DockerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the container described by `spec`, writing the daemon-assigned
    /// id back into the spec. Does not start it.
    pub async fn create_container(
        &self,
        host: &Host,
        spec: &mut ContainerSpec,
        deps: Option<&DependencyGraph>,
    ) -> Result<ContainerId, DockerError> {
        let client = self.pool.ensure(host)?;
        let request = translate::build_create_request(spec, deps)?;

        // The engine API dropped its LXC options field; validated entries are
        // surfaced and skipped rather than silently discarded.
        if !request.lxc_conf.is_empty() {
            tracing::warn!(
                container = %spec.name,
                entries = request.lxc_conf.len(),
                "lxc options have no engine api field, skipping them"
            );
        }

        let options = request.name.clone().map(|name| CreateContainerOptions {
            name: Some(name),
            ..Default::default()
        });
        let response = client
            .create_container(options, request.body)
            .await
            .map_err(classify)?;

        spec.container_id = Some(response.id.clone());
        tracing::info!(container = %spec.name, id = %response.id, host = %host.name, "container created");
        Ok(ContainerId::new(response.id))
    }

    /// Start the container. When the spec is monitored, a fresh client opens
    /// a stats subscription and the caller receives the sample channel; each
    /// start replaces any previous monitor for the container.
    pub async fn start_container(
        &self,
        host: &Host,
        spec: &ContainerSpec,
    ) -> Result<Option<UsageReceiver>, DockerError> {
        let client = self.pool.ensure(host)?;
        let reference = daemon_ref(spec)?;
        client
            .start_container(&reference, None::<StartContainerOptions>)
            .await
            .map_err(classify)?;
        tracing::info!(container = %spec.name, host = %host.name, "container started");

        if !spec.monitored {
            return Ok(None);
        }

        // Streaming consumers get their own client so a wedged stream cannot
        // poison the pooled one.
        let streaming_client = self.pool.fresh(host)?;
        let receiver =
            self.monitors
                .start(streaming_client, &spec.name, reference, spec.monitoring_interval);
        Ok(Some(receiver))
    }

    /// Stop the container, closing its monitor first so a later start gets a
    /// fresh sink.
    pub async fn stop_container(&self, host: &Host, spec: &ContainerSpec) -> Result<(), DockerError> {
        self.monitors.close(&spec.name);

        let client = self.pool.ensure(host)?;
        let reference = daemon_ref(spec)?;
        client
            .stop_container(&reference, None::<StopContainerOptions>)
            .await
            .map_err(classify)?;
        tracing::info!(container = %spec.name, host = %host.name, "container stopped");
        Ok(())
    }

    /// Block until the container exits and return its terminal status code.
    pub async fn suspend_container(
        &self,
        host: &Host,
        spec: &ContainerSpec,
    ) -> Result<i64, DockerError> {
        let client = self.pool.ensure(host)?;
        let reference = daemon_ref(spec)?;

        let mut wait = client.wait_container(&reference, None::<WaitContainerOptions>);
        let mut status_code = 0i64;
        while let Some(item) = wait.next().await {
            match item {
                Ok(response) => status_code = response.status_code,
                // A non-zero exit surfaces as an error variant carrying the code.
                Err(bollard::errors::Error::DockerContainerWaitError { code, .. }) => {
                    status_code = code;
                }
                Err(e) => return Err(classify(e)),
            }
        }
        Ok(status_code)
    }

    /// Rename the container on the daemon and in the spec.
    pub async fn rename_container(
        &self,
        host: &Host,
        spec: &mut ContainerSpec,
        new_name: &str,
    ) -> Result<(), DockerError> {
        let client = self.pool.ensure(host)?;
        let reference = daemon_ref(spec)?;
        client
            .rename_container(
                &reference,
                RenameContainerOptions {
                    name: new_name.to_string(),
                },
            )
            .await
            .map_err(classify)?;
        spec.name = new_name.to_string();
        Ok(())
    }

    /// Remove the container. Requires a named host.
    pub async fn remove_container(
        &self,
        host: &Host,
        spec: &ContainerSpec,
    ) -> Result<(), DockerError> {
        if host.name.trim().is_empty() {
            return Err(DockerError::validation(
                "cannot remove a container without the machine name",
            ));
        }

        let client = self.pool.ensure(host)?;
        let reference = daemon_ref(spec)?;
        client
            .remove_container(&reference, None::<RemoveContainerOptions>)
            .await
            .map_err(classify)?;
        tracing::info!(container = %spec.name, host = %host.name, "container removed");
        Ok(())
    }

    /// Send a signal to the container, the daemon's default when none given.
    pub async fn kill_container(
        &self,
        host: &Host,
        spec: &ContainerSpec,
        signal: Option<&str>,
    ) -> Result<(), DockerError> {
        let client = self.pool.ensure(host)?;
        let reference = daemon_ref(spec)?;
        let options = signal.map(|signal| KillContainerOptions {
            signal: signal.to_string(),
        });
        client
            .kill_container(&reference, options)
            .await
            .map_err(classify)
    }

    /// Inspect a container by its daemon id.
    pub async fn inspect_container(
        &self,
        host: &Host,
        id: &ContainerId,
    ) -> Result<ContainerInspectResponse, DockerError> {
        let client = self.pool.ensure(host)?;
        client
            .inspect_container(id.as_str(), None::<InspectContainerOptions>)
            .await
            .map_err(classify)
    }

    /// Inspect a container located by the spec's name, scanning the host's
    /// container list. `None`, with a warning, when nothing matches.
    pub async fn inspect_by_spec(
        &self,
        host: &Host,
        spec: &ContainerSpec,
    ) -> Result<Option<ContainerInspectResponse>, DockerError> {
        let summaries = self.list_containers(host).await?;
        let Some(id) = find_container_id_by_name(&summaries, &spec.name) else {
            tracing::warn!(
                container = %spec.name,
                host = %host.name,
                "no container on the host matches this name"
            );
            return Ok(None);
        };

        let client = self.pool.ensure(host)?;
        let details = client
            .inspect_container(&id, None::<InspectContainerOptions>)
            .await
            .map_err(classify)?;
        Ok(Some(details))
    }

    /// All containers on the host, stopped ones included.
    pub async fn list_containers(
        &self,
        host: &Host,
    ) -> Result<Vec<ContainerSummary>, DockerError> {
        let client = self.pool.ensure(host)?;
        let options = ListContainersOptions {
            all: true,
            ..Default::default()
        };
        client
            .list_containers(Some(options))
            .await
            .map_err(classify)
    }

    /// True only when the daemon knows the container by name and the locally
    /// tracked list also contains it.
    pub async fn container_exists(
        &self,
        host: &Host,
        spec: &ContainerSpec,
        tracked: &[String],
    ) -> Result<bool, DockerError> {
        let summaries = self.list_containers(host).await?;
        let on_daemon = find_container_id_by_name(&summaries, &spec.name).is_some();
        Ok(on_daemon && tracked.iter().any(|name| name == &spec.name))
    }

    /// Whether any container name on the host already claims `name`,
    /// counting link aliases by their target suffix.
    pub async fn container_name_exists(
        &self,
        host: &Host,
        name: &str,
    ) -> Result<bool, DockerError> {
        let summaries = self.list_containers(host).await?;
        Ok(name_taken(&summaries, name))
    }

    /// Observed status of the container: running maps to active, paused wins
    /// over running, anything else (a missing container included) is
    /// inactive.
    pub async fn current_status(
        &self,
        host: &Host,
        spec: &ContainerSpec,
    ) -> Result<ComputeStatus, DockerError> {
        let details = self.inspect_details(host, spec).await?;
        Ok(details
            .map(|d| status_from_state(d.state.as_ref()))
            .unwrap_or_default())
    }

    /// Inspect by recorded id when present (a 404 maps to absent), otherwise
    /// by name scan.
    async fn inspect_details(
        &self,
        host: &Host,
        spec: &ContainerSpec,
    ) -> Result<Option<ContainerInspectResponse>, DockerError> {
        match &spec.container_id {
            Some(id) => {
                let client = self.pool.ensure(host)?;
                match client
                    .inspect_container(id, None::<InspectContainerOptions>)
                    .await
                {
                    Ok(details) => Ok(Some(details)),
                    Err(bollard::errors::Error::DockerResponseServerError {
                        status_code: 404,
                        ..
                    }) => Ok(None),
                    Err(e) => Err(classify(e)),
                }
            }
            None => self.inspect_by_spec(host, spec).await,
        }
    }

    /// Refresh the spec's observed state and recorded id, taking one usage
    /// sample when the container is running.
    pub async fn refresh_container(
        &self,
        host: &Host,
        spec: &mut ContainerSpec,
    ) -> Result<(), DockerError> {
        let details = self.inspect_details(host, spec).await?;
        if let Some(details) = &details
            && spec.container_id.is_none()
        {
            spec.container_id = details.id.clone();
        }
        spec.state = details
            .map(|d| status_from_state(d.state.as_ref()))
            .unwrap_or_default();
        spec.usage = None;

        if spec.state == ComputeStatus::Active {
            let client = self.pool.ensure(host)?;
            let reference = daemon_ref(spec)?;
            spec.usage = stats::sample_once(&client, &reference).await?;
        }
        Ok(())
    }

    /// Pull an image, streaming daemon progress to completion, and record it
    /// in the per-host cache. Blank references fall back to the default
    /// image, untagged ones pull `:latest`.
    pub async fn pull_image(&self, host: &Host, image: Option<&str>) -> Result<(), DockerError> {
        let reference = images::normalize_image(image);
        let client = self.pool.ensure(host)?;

        let options = CreateImageOptions {
            from_image: Some(reference.clone()),
            ..Default::default()
        };
        let mut stream = client.create_image(Some(options), None, None);
        while let Some(result) = stream.next().await {
            result.map_err(classify)?;
        }

        self.images.record(&host.name, &reference);
        tracing::info!(image = %reference, host = %host.name, "image pulled");
        Ok(())
    }

    /// Whether the image is already recorded as pulled on the host. The
    /// reference is normalized the same way `pull_image` normalizes it.
    pub fn has_image(&self, host: &Host, image: Option<&str>) -> bool {
        self.images
            .contains(&host.name, &images::normalize_image(image))
    }

    /// Record an image as present on the host without pulling it.
    pub fn record_image(&self, host: &Host, image: Option<&str>) {
        self.images
            .record(&host.name, &images::normalize_image(image));
    }
}

/// Daemon-side reference for a spec: the recorded id when present, otherwise
/// the whitespace-stripped name.
fn daemon_ref(spec: &ContainerSpec) -> Result<String, DockerError> {
    if let Some(id) = &spec.container_id {
        return Ok(id.clone());
    }
    let name = translate::strip_whitespace(&spec.name);
    if name.is_empty() {
        return Err(DockerError::validation(
            "container has neither an id nor a name",
        ));
    }
    Ok(name)
}

/// Map the daemon's running/paused booleans onto the model's status.
fn status_from_state(state: Option<&ContainerState>) -> ComputeStatus {
    let Some(state) = state else {
        return ComputeStatus::Inactive;
    };
    if state.paused.unwrap_or(false) {
        ComputeStatus::Suspended
    } else if state.running.unwrap_or(false) {
        ComputeStatus::Active
    } else {
        ComputeStatus::Inactive
    }
}

/// Resolve a container id by its first listed name, compared with the leading
/// slash stripped and case-insensitively against the whitespace-stripped
/// target.
fn find_container_id_by_name(summaries: &[ContainerSummary], name: &str) -> Option<String> {
    let wanted = translate::strip_whitespace(name);
    summaries.iter().find_map(|summary| {
        let listed = summary.names.as_ref()?.first()?;
        if listed.trim_start_matches('/').eq_ignore_ascii_case(&wanted) {
            summary.id.clone()
        } else {
            None
        }
    })
}

/// Whether any listed container name claims `name`. Link aliases of the form
/// `<owner>LinkTo<target>` match on their target suffix; everything else
/// compares exactly.
fn name_taken(summaries: &[ContainerSummary], name: &str) -> bool {
    summaries
        .iter()
        .filter_map(|summary| summary.names.as_ref())
        .flatten()
        .any(|listed| {
            let listed = listed.trim_start_matches('/');
            match listed.split_once("LinkTo") {
                Some((_, target)) => target == name,
                None => listed == name,
            }
        })
}
