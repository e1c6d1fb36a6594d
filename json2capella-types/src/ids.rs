//! Identifier types for model elements.
//!
//! Capella addresses every element by a UUID. Elements created by an import
//! get a UUID v5 derived from their data package and scope path, so planning
//! the same import twice yields the same ids.

use crate::ScopePath;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Namespace for [`ElementId::derived`].
const DERIVED_NAMESPACE: Uuid = Uuid::from_u128(0x8c1f_4e62_2b7d_4a3e_9f51_6d0a_c3e4_7b19);

/// Unique identifier for a model element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Creates a new random element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives the id of an element at `path` below the data package `root`.
    ///
    /// Segments are joined with a NUL separator so that `["a/b"]` and
    /// `["a", "b"]` derive different ids.
    #[must_use]
    pub fn derived(root: ElementId, path: &ScopePath) -> Self {
        let mut key = root.0.as_hyphenated().to_string();
        for segment in path.segments() {
            key.push('\0');
            key.push_str(segment);
        }
        Self(Uuid::new_v5(&DERIVED_NAMESPACE, key.as_bytes()))
    }

    /// Creates an element ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses an element ID from a string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ElementId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
