// ABOUTME: Type-safe identifiers for daemon resources.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;

pub use id::{ContainerId, ContainerTag, Id, NetworkId, NetworkTag};
