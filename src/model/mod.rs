// ABOUTME: Declarative model consumed by the reconciler.
// ABOUTME: Hosts, container specs, networks, link graph, restart policies.

mod container;
mod host;
mod links;
mod network;
mod restart;

pub use container::{ComputeStatus, ContainerSpec, ContainerUsage, VolumeSource};
pub use host::{Endpoint, Host};
pub use links::DependencyGraph;
pub use network::{NetworkAttachment, NetworkSpec};
pub use restart::RestartPolicy;
