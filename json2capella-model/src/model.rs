use crate::ElementData;
use json2capella_types::{ElementId, ElementKind, Layer, ScopePath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name Capella gives every layer's root data package.
pub const DATA_PACKAGE_NAME: &str = "Data";

/// An element of the target model.
///
/// Model elements are long-lived: they are only created, overwritten or
/// re-parented by applying a change set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelElement {
    pub id: ElementId,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub data: ElementData,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ModelElement>,
}

impl ModelElement {
    pub fn new(id: ElementId, name: impl Into<String>, data: ElementData) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            data,
            children: Vec::new(),
        }
    }

    /// Shorthand for an empty package with a fresh id.
    pub fn package(name: impl Into<String>) -> Self {
        Self::new(ElementId::new(), name, ElementData::Package)
    }

    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    pub fn is_package(&self) -> bool {
        self.kind() == ElementKind::Package
    }

    pub fn child_by_name(&self, name: &str) -> Option<&ModelElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Walks `path` down from this element.
    pub fn resolve(&self, path: &ScopePath) -> Option<&ModelElement> {
        path.segments()
            .iter()
            .try_fold(self, |element, segment| element.child_by_name(segment))
    }

    /// Finds this element or a descendant by id.
    pub fn find(&self, id: ElementId) -> Option<&ModelElement> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: ElementId) -> Option<&mut ModelElement> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Scope path of the descendant with the given id, relative to this element.
    pub fn path_of(&self, id: ElementId) -> Option<ScopePath> {
        if self.id == id {
            return Some(ScopePath::root());
        }
        self.children.iter().find_map(|c| {
            c.path_of(id)
                .map(|rest| ScopePath::root().child(&c.name).join(&rest))
        })
    }

    /// All descendants in pre-order with their paths relative to this element.
    pub fn descendants(&self) -> Vec<(ScopePath, &ModelElement)> {
        let mut out = Vec::new();
        collect_descendants(self, &ScopePath::root(), &mut out);
        out
    }
}

fn collect_descendants<'a>(
    element: &'a ModelElement,
    path: &ScopePath,
    out: &mut Vec<(ScopePath, &'a ModelElement)>,
) {
    for child in &element.children {
        let child_path = path.child(&child.name);
        out.push((child_path.clone(), child));
        collect_descendants(child, &child_path, out);
    }
}

/// A Capella model reduced to its layers' data packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub layers: BTreeMap<Layer, ModelElement>,
}

impl Model {
    /// Creates a model with an empty data package in every layer.
    pub fn new(name: impl Into<String>) -> Self {
        let layers = Layer::ALL
            .into_iter()
            .map(|layer| (layer, ModelElement::package(DATA_PACKAGE_NAME)))
            .collect();
        Self {
            name: name.into(),
            layers,
        }
    }

    pub fn data_package(&self, layer: Layer) -> Option<&ModelElement> {
        self.layers.get(&layer)
    }

    pub fn data_package_mut(&mut self, layer: Layer) -> Option<&mut ModelElement> {
        self.layers.get_mut(&layer)
    }

    /// Finds an element in any layer.
    pub fn find(&self, id: ElementId) -> Option<(Layer, &ModelElement)> {
        self.layers
            .iter()
            .find_map(|(layer, pkg)| pkg.find(id).map(|e| (*layer, e)))
    }

    /// Number of elements in the model, data packages included.
    pub fn element_count(&self) -> usize {
        self.layers
            .values()
            .map(|pkg| 1 + pkg.descendants().len())
            .sum()
    }
}
