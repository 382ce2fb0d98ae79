// ABOUTME: Phantom-typed identifiers for daemon-assigned resource ids.
// ABOUTME: A NetworkId cannot be handed to an operation wanting a ContainerId.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Uninhabited tag types; they exist only to parameterize [`Id`].
pub enum ContainerTag {}
pub enum NetworkTag {}

/// Opaque hex id the daemon assigned, tagged with the resource kind it names.
#[must_use = "a daemon id is only useful if stored or compared"]
pub struct Id<T>(String, PhantomData<T>);

pub type ContainerId = Id<ContainerTag>;
pub type NetworkId = Id<NetworkTag>;

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Id(value.into(), PhantomData)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Handwritten impls: deriving would bound T, which is never stored.

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.0).finish()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Id(self.0.clone(), PhantomData)
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Id::new)
    }
}
