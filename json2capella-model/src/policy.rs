use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a name collision between an incoming data element and an existing
/// model element in the same scope is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Keep the existing element and discard the incoming one.
    #[default]
    Skip,
    /// Overwrite the existing element's attributes, keeping its id.
    Replace,
    /// Fail the whole import.
    Abort,
    /// Ask a [`ConflictResolver`](crate::ConflictResolver) for every collision.
    Ask,
}

impl ConflictPolicy {
    pub const ALL: [ConflictPolicy; 4] = [
        ConflictPolicy::Skip,
        ConflictPolicy::Replace,
        ConflictPolicy::Abort,
        ConflictPolicy::Ask,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ConflictPolicy::Skip => "skip",
            ConflictPolicy::Replace => "replace",
            ConflictPolicy::Abort => "abort",
            ConflictPolicy::Ask => "ask",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown conflict policy '{0}' (expected one of: skip, replace, abort, ask)")]
pub struct UnknownPolicy(pub String);

impl FromStr for ConflictPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConflictPolicy::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPolicy(s.to_string()))
    }
}

/// A decision for one colliding pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Keep the existing element for this pair only.
    Skip,
    /// Overwrite the existing element for this pair only.
    Replace,
    /// Skip this pair and every later collision of the run.
    SkipAll,
    /// Replace this pair and every later collision of the run.
    ReplaceAll,
    /// Stop the import.
    Abort,
}

impl Resolution {
    /// The policy that governs later collisions, if this decision changes it.
    pub const fn sticky_policy(&self) -> Option<ConflictPolicy> {
        match self {
            Resolution::SkipAll => Some(ConflictPolicy::Skip),
            Resolution::ReplaceAll => Some(ConflictPolicy::Replace),
            _ => None,
        }
    }

    /// Collapses the decision to what happens to the current pair.
    pub const fn for_pair(&self) -> Resolution {
        match self {
            Resolution::SkipAll => Resolution::Skip,
            Resolution::ReplaceAll => Resolution::Replace,
            other => *other,
        }
    }
}
