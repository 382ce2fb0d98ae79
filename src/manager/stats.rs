// ABOUTME: Usage sampling from the daemon's stats endpoint.
// ABOUTME: One cancellable monitor task per container, samples over a bounded channel.

use crate::daemon::{DockerError, classify};
use crate::model::ContainerUsage;
use bollard::Docker;
use bollard::models::ContainerStatsResponse;
use bollard::query_parameters::StatsOptionsBuilder;
use chrono::Utc;
use futures::StreamExt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Receiving end of a container monitor.
pub type UsageReceiver = mpsc::Receiver<ContainerUsage>;

/// Samples buffered per monitor before the producer blocks.
const SAMPLE_CHANNEL_CAPACITY: usize = 32;

impl ContainerUsage {
    /// Fold one stats payload into a usage sample.
    ///
    /// CPU percent uses the daemon's own formula: the container's share of the
    /// system delta, scaled by the number of online CPUs. Zero when either
    /// delta is missing or non-positive.
    pub fn from_stats(stats: &ContainerStatsResponse) -> Self {
        let mut cpu_percent = 0.0;
        if let (Some(cpu), Some(precpu)) = (stats.cpu_stats.as_ref(), stats.precpu_stats.as_ref())
        {
            let total = cpu
                .cpu_usage
                .as_ref()
                .and_then(|u| u.total_usage)
                .unwrap_or(0);
            let prev_total = precpu
                .cpu_usage
                .as_ref()
                .and_then(|u| u.total_usage)
                .unwrap_or(0);
            let cpu_delta = total.saturating_sub(prev_total);

            let system = cpu.system_cpu_usage.unwrap_or(0);
            let prev_system = precpu.system_cpu_usage.unwrap_or(0);
            let system_delta = system.saturating_sub(prev_system);

            if cpu_delta > 0 && system_delta > 0 {
                let online = cpu.online_cpus.unwrap_or(1) as f64;
                cpu_percent = cpu_delta as f64 / system_delta as f64 * online * 100.0;
            }
        }

        let (memory_used, memory_limit) = stats
            .memory_stats
            .as_ref()
            .map(|m| (m.usage.unwrap_or(0), m.limit.unwrap_or(0)))
            .unwrap_or((0, 0));

        let (network_rx, network_tx) = stats
            .networks
            .as_ref()
            .map(|nets| {
                nets.values().fold((0u64, 0u64), |(rx, tx), n| {
                    (rx + n.rx_bytes.unwrap_or(0), tx + n.tx_bytes.unwrap_or(0))
                })
            })
            .unwrap_or((0, 0));

        let (disk_read, disk_write) = stats
            .blkio_stats
            .as_ref()
            .and_then(|b| b.io_service_bytes_recursive.as_ref())
            .map(|entries| {
                entries.iter().fold((0u64, 0u64), |(read, write), entry| {
                    let value = entry.value.unwrap_or(0);
                    match entry.op.as_deref() {
                        Some(op) if op.eq_ignore_ascii_case("read") => (read + value, write),
                        Some(op) if op.eq_ignore_ascii_case("write") => (read, write + value),
                        _ => (read, write),
                    }
                })
            })
            .unwrap_or((0, 0));

        Self {
            cpu_percent,
            memory_used,
            memory_limit,
            network_rx,
            network_tx,
            disk_read,
            disk_write,
            sampled_at: Utc::now(),
        }
    }
}

/// Take one stats sample from a running container.
pub(crate) async fn sample_once(
    client: &Docker,
    container: &str,
) -> Result<Option<ContainerUsage>, DockerError> {
    let options = StatsOptionsBuilder::new().stream(false).build();
    let mut stream = client.stats(container, Some(options));
    match stream.next().await {
        Some(Ok(stats)) => Ok(Some(ContainerUsage::from_stats(&stats))),
        Some(Err(e)) => Err(classify(e)),
        None => Ok(None),
    }
}

/// Live monitor tasks keyed by container name.
///
/// Each stop/restart cycle replaces the sink object instead of reusing it;
/// the source system reused closed sinks, which wedged the transport.
#[derive(Default)]
pub(crate) struct Monitors {
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Monitors {
    /// Spawn a task draining `client`'s stats stream for `container`, sending
    /// samples into a bounded channel. Replaces, and aborts, any previous
    /// monitor registered under `name`.
    pub(crate) fn start(
        &self,
        client: Docker,
        name: &str,
        container: String,
        interval: Option<Duration>,
    ) -> UsageReceiver {
        let (tx, rx) = mpsc::channel(SAMPLE_CHANNEL_CAPACITY);
        let task = tokio::spawn(sample_loop(client, container, interval, tx));
        if let Some(previous) = self.tasks.lock().insert(name.to_string(), task) {
            previous.abort();
        }
        rx
    }

    /// Abort the monitor for `name`, if any. Idempotent.
    pub(crate) fn close(&self, name: &str) {
        if let Some(task) = self.tasks.lock().remove(name) {
            task.abort();
        }
    }
}

impl Drop for Monitors {
    fn drop(&mut self) {
        for (_, task) in self.tasks.get_mut().drain() {
            task.abort();
        }
    }
}

async fn sample_loop(
    client: Docker,
    container: String,
    interval: Option<Duration>,
    sink: mpsc::Sender<ContainerUsage>,
) {
    let options = StatsOptionsBuilder::new().stream(true).build();
    let mut stream = client.stats(&container, Some(options));
    let mut last_sent: Option<tokio::time::Instant> = None;

    while let Some(item) = stream.next().await {
        let stats = match item {
            Ok(stats) => stats,
            Err(e) => {
                tracing::debug!(container = %container, error = %e, "stats stream ended");
                break;
            }
        };

        // Thin the daemon's one-second cadence down to the requested interval.
        if let Some(interval) = interval
            && let Some(previous) = last_sent
            && previous.elapsed() < interval
        {
            continue;
        }

        let sample = ContainerUsage::from_stats(&stats);
        if sink.send(sample).await.is_err() {
            // Receiver gone, stop sampling.
            break;
        }
        last_sent = Some(tokio::time::Instant::now());
    }
}
