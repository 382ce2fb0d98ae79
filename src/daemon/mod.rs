// ABOUTME: Docker daemon connection layer.
// ABOUTME: Per-host client pool and the boundary error taxonomy.

mod error;
mod pool;

pub use error::{DockerError, DockerErrorKind, classify};
pub use pool::{ConnectionPool, PoolStats};
