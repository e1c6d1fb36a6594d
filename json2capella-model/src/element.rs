use json2capella_types::{ElementId, ElementKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind-specific payload of an element.
///
/// The type parameter is how a property names its type: parsed data elements
/// carry an unresolved [`TypeSpec`], model elements carry the [`ElementId`]
/// of the type element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementData<T = ElementId> {
    Package,
    Class,
    Enumeration,
    EnumerationLiteral { value: i64 },
    PrimitiveType { primitive: PrimitiveKind },
    Property(PropertyData<T>),
}

impl<T> ElementData<T> {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementData::Package => ElementKind::Package,
            ElementData::Class => ElementKind::Class,
            ElementData::Enumeration => ElementKind::Enumeration,
            ElementData::EnumerationLiteral { .. } => ElementKind::EnumerationLiteral,
            ElementData::PrimitiveType { .. } => ElementKind::PrimitiveType,
            ElementData::Property(_) => ElementKind::Property,
        }
    }

    /// Maps the property type reference, leaving every other payload as is.
    pub fn try_map_type<U, E>(
        self,
        f: impl FnOnce(T) -> Result<U, E>,
    ) -> Result<ElementData<U>, E> {
        Ok(match self {
            ElementData::Package => ElementData::Package,
            ElementData::Class => ElementData::Class,
            ElementData::Enumeration => ElementData::Enumeration,
            ElementData::EnumerationLiteral { value } => ElementData::EnumerationLiteral { value },
            ElementData::PrimitiveType { primitive } => ElementData::PrimitiveType { primitive },
            ElementData::Property(p) => ElementData::Property(PropertyData {
                type_ref: f(p.type_ref)?,
                aggregation: p.aggregation,
                min_card: p.min_card,
                max_card: p.max_card,
                min_value: p.min_value,
                max_value: p.max_value,
            }),
        })
    }
}

/// A property of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyData<T = ElementId> {
    /// The property's type.
    #[serde(rename = "type")]
    pub type_ref: T,
    pub aggregation: Aggregation,
    /// Lower cardinality bound.
    pub min_card: String,
    /// Upper cardinality bound; `*` for unbounded.
    pub max_card: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<String>,
}

/// How a property holds its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// A reference to an element owned elsewhere.
    Association,
    /// An owned part or a plain value.
    Composition,
}

/// The flavour of a primitive data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveKind {
    StringType,
    BooleanType,
    NumericType,
}

impl PrimitiveKind {
    /// Guesses the primitive kind from a type name such as `uint8` or `char[]`.
    pub fn for_type_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.contains("char") || lower.contains("str") {
            PrimitiveKind::StringType
        } else if lower.contains("bool") || lower.contains("byte") {
            PrimitiveKind::BooleanType
        } else {
            PrimitiveKind::NumericType
        }
    }
}

/// An unresolved property type as written in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSpec {
    /// A primitive type looked up (or created) in the types package.
    Primitive(String),
    Class(QualifiedName),
    Enumeration(QualifiedName),
}

/// A `prefix.Name` reference, or a bare `Name`.
///
/// A bare name refers to an element of the package the reference is
/// written in; a prefixed one to an element of the package with that prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    pub name: String,
}

impl QualifiedName {
    /// Splits `raw` at its last dot.
    pub fn parse(raw: &str) -> Self {
        match raw.rsplit_once('.') {
            Some((prefix, name)) => Self {
                prefix: Some(prefix.to_string()),
                name: name.to_string(),
            },
            None => Self::local(raw),
        }
    }

    pub fn local(name: impl Into<String>) -> Self {
        Self {
            prefix: None,
            name: name.into(),
        }
    }

    pub fn is_local(&self) -> bool {
        self.prefix.is_none()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}.{}", prefix, self.name),
            None => f.write_str(&self.name),
        }
    }
}
