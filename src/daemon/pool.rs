// ABOUTME: Per-host Docker client pool keyed by logical host name.
// ABOUTME: Builds clients lazily under one lock so host switches cannot race.

use super::error::DockerError;
use crate::model::{Endpoint, Host};
use bollard::Docker;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Timeout applied to daemon requests, in seconds.
const DAEMON_TIMEOUT_SECS: u64 = 120;

/// Pool of daemon clients, one per host name.
///
/// The source system cached a single client and compared host names on every
/// call, which raced when two callers targeted different hosts. Keying a map
/// by host name under one lock removes the race and keeps the same observable
/// contract: a repeated host reuses its client, a new host builds one.
#[derive(Default)]
pub struct ConnectionPool {
    clients: Mutex<HashMap<String, Docker>>,
    built: AtomicU64,
}

/// Snapshot of pool state, used to observe rebuild behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Distinct hosts with a cached client.
    pub hosts: usize,
    /// Total clients constructed, pooled and unpooled.
    pub connections_built: u64,
}

impl ConnectionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the client bound to `host`, building and caching one on first
    /// use. Lookup and build happen under the same lock, so concurrent calls
    /// targeting different hosts each end up with a client bound to their own
    /// host.
    pub fn ensure(&self, host: &Host) -> Result<Docker, DockerError> {
        let mut clients = self.clients.lock();
        if let Some(client) = clients.get(&host.name) {
            return Ok(client.clone());
        }
        let client = self.build(host)?;
        clients.insert(host.name.clone(), client.clone());
        Ok(client)
    }

    /// Build a client outside the pool. Streaming consumers take one of these
    /// so a wedged stream cannot poison the shared client.
    pub fn fresh(&self, host: &Host) -> Result<Docker, DockerError> {
        self.build(host)
    }

    /// Drop the cached client for `host`, forcing a rebuild on next use.
    pub fn invalidate(&self, host: &Host) {
        self.clients.lock().remove(&host.name);
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            hosts: self.clients.lock().len(),
            connections_built: self.built.load(Ordering::Relaxed),
        }
    }

    fn build(&self, host: &Host) -> Result<Docker, DockerError> {
        let client = match &host.endpoint {
            Endpoint::Local => Docker::connect_with_local_defaults(),
            Endpoint::Unix(socket) => {
                Docker::connect_with_unix(socket, DAEMON_TIMEOUT_SECS, bollard::API_DEFAULT_VERSION)
            }
            Endpoint::Tcp(address) => Docker::connect_with_http(
                address,
                DAEMON_TIMEOUT_SECS,
                bollard::API_DEFAULT_VERSION,
            ),
        }
        .map_err(|e| DockerError::Connection {
            host: host.name.clone(),
            reason: e.to_string(),
        })?;

        self.built.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(host = %host.name, "built daemon client");
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unix_host(name: &str) -> Host {
        Host::named(name, Endpoint::Unix("/var/run/docker.sock".to_string()))
    }

    #[test]
    fn repeated_host_reuses_the_cached_client() {
        let pool = ConnectionPool::new();
        let host = unix_host("alpha");

        pool.ensure(&host).unwrap();
        pool.ensure(&host).unwrap();

        let stats = pool.stats();
        assert_eq!(stats.hosts, 1);
        assert_eq!(stats.connections_built, 1);
    }

    #[test]
    fn switching_hosts_builds_exactly_one_more_client() {
        let pool = ConnectionPool::new();

        pool.ensure(&unix_host("alpha")).unwrap();
        pool.ensure(&unix_host("beta")).unwrap();

        let stats = pool.stats();
        assert_eq!(stats.hosts, 2);
        assert_eq!(stats.connections_built, 2);

        // Returning to the first host must not rebuild.
        pool.ensure(&unix_host("alpha")).unwrap();
        assert_eq!(pool.stats().connections_built, 2);
    }

    #[test]
    fn invalidate_forces_a_rebuild_on_next_use() {
        let pool = ConnectionPool::new();
        let host = unix_host("alpha");

        pool.ensure(&host).unwrap();
        pool.invalidate(&host);
        assert_eq!(pool.stats().hosts, 0);

        pool.ensure(&host).unwrap();
        assert_eq!(pool.stats().connections_built, 2);
    }

    #[test]
    fn fresh_clients_never_enter_the_pool() {
        let pool = ConnectionPool::new();
        let host = unix_host("alpha");

        pool.fresh(&host).unwrap();

        let stats = pool.stats();
        assert_eq!(stats.hosts, 0);
        assert_eq!(stats.connections_built, 1);
    }
}
