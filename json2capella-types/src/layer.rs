use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An architecture layer of a Capella model. Each layer owns one data package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Operational Analysis.
    Oa,
    /// System Analysis.
    Sa,
    /// Logical Architecture.
    La,
    /// Physical Architecture.
    Pa,
}

impl Layer {
    pub const ALL: [Layer; 4] = [Layer::Oa, Layer::Sa, Layer::La, Layer::Pa];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Layer::Oa => "oa",
            Layer::Sa => "sa",
            Layer::La => "la",
            Layer::Pa => "pa",
        }
    }

    pub const fn long_name(&self) -> &'static str {
        match self {
            Layer::Oa => "Operational Analysis",
            Layer::Sa => "System Analysis",
            Layer::La => "Logical Architecture",
            Layer::Pa => "Physical Architecture",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = Error;

    /// Accepts the short layer names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Layer::ALL
            .into_iter()
            .find(|layer| layer.as_str() == wanted)
            .ok_or_else(|| Error::UnknownLayer(s.to_string()))
    }
}
