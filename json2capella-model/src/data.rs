use crate::{ElementData, TypeSpec};
use json2capella_types::ElementKind;
use std::fmt;
use std::path::PathBuf;

/// An element parsed from a JSON definition file.
///
/// Data elements are built once by the parser, consumed by the reconciler and
/// then dropped. The parent relation is implicit in the tree: the reconciler
/// tracks the scope path while it walks `children`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataElement {
    /// Unique among siblings.
    pub name: String,
    pub description: String,
    pub data: ElementData<TypeSpec>,
    pub children: Vec<DataElement>,
    /// Where the element was defined, for error reporting.
    pub origin: Origin,
}

impl DataElement {
    pub fn new(name: impl Into<String>, data: ElementData<TypeSpec>, origin: Origin) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            data,
            children: Vec::new(),
            origin,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_children(mut self, children: Vec<DataElement>) -> Self {
        self.children = children;
        self
    }

    pub fn child_by_name(&self, name: &str) -> Option<&DataElement> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Location of a definition: a file and a JSON pointer into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Origin {
    pub file: PathBuf,
    pub pointer: String,
}

impl Origin {
    pub fn new(file: impl Into<PathBuf>, pointer: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            pointer: pointer.into(),
        }
    }

    /// Returns the origin of a member of this value, e.g. `at("structs").at(2)`.
    pub fn at(&self, token: impl fmt::Display) -> Self {
        let token = token.to_string().replace('~', "~0").replace('/', "~1");
        Self {
            file: self.file.clone(),
            pointer: format!("{}/{}", self.pointer, token),
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.file.display(), self.pointer)
    }
}
