//! Version tag of the proxy storage layout.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Version of the persistent storage layout held at the proxy.
///
/// Layouts only grow: a version is never reordered or resized, and moving
/// from one version to the next is an explicit migration step.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SchemaVersion(u16);

impl SchemaVersion {
    /// Layout of the first deployed implementation: fee configuration only.
    pub const V1: Self = Self(1);

    /// Wraps a raw version number.
    #[must_use]
    pub const fn new(version: u16) -> Self {
        Self(version)
    }

    /// Returns the raw version number.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }

    /// The version after this one, or `None` at the end of the range.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}
