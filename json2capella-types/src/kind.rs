use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of a data element or model element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Package,
    Class,
    Enumeration,
    EnumerationLiteral,
    PrimitiveType,
    Property,
}

impl ElementKind {
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Package,
        ElementKind::Class,
        ElementKind::Enumeration,
        ElementKind::EnumerationLiteral,
        ElementKind::PrimitiveType,
        ElementKind::Property,
    ];

    /// The snake_case tag used in change files and model snapshots.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Package => "package",
            ElementKind::Class => "class",
            ElementKind::Enumeration => "enumeration",
            ElementKind::EnumerationLiteral => "enumeration_literal",
            ElementKind::PrimitiveType => "primitive_type",
            ElementKind::Property => "property",
        }
    }

    /// Whether elements of this kind may own children.
    pub const fn is_container(&self) -> bool {
        matches!(
            self,
            ElementKind::Package | ElementKind::Class | ElementKind::Enumeration
        )
    }

    /// Classes and enumerations: what a reference or composition can name.
    pub const fn is_classifier(&self) -> bool {
        matches!(self, ElementKind::Class | ElementKind::Enumeration)
    }

    /// Whether a property may be typed by elements of this kind.
    pub const fn is_type(&self) -> bool {
        self.is_classifier() || matches!(self, ElementKind::PrimitiveType)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}
