//! Change records: the declarative form of an import.

use crate::{ElementData, ModelElement};
use json2capella_types::{ElementId, ElementKind, Layer, ScopePath};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The attributes of one element, without its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub id: ElementId,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub data: ElementData,
}

impl ElementSnapshot {
    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    /// A childless model element with these attributes.
    pub fn to_element(&self) -> ModelElement {
        ModelElement {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            data: self.data.clone(),
            children: Vec::new(),
        }
    }
}

impl From<&ModelElement> for ElementSnapshot {
    fn from(element: &ModelElement) -> Self {
        Self {
            id: element.id,
            name: element.name.clone(),
            description: element.description.clone(),
            data: element.data.clone(),
        }
    }
}

/// One instruction of a change set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ChangeRecord {
    /// Create `element` as the last child of `parent`.
    Add {
        parent: ElementId,
        path: ScopePath,
        element: ElementSnapshot,
    },
    /// Overwrite the attributes of the element with id `element.id`.
    ///
    /// Children are kept unless the element kind changes.
    Replace {
        path: ScopePath,
        element: ElementSnapshot,
    },
    /// A collision that was resolved by keeping the existing element.
    Skip {
        path: ScopePath,
        id: ElementId,
        kind: ElementKind,
    },
}

impl ChangeRecord {
    pub fn path(&self) -> &ScopePath {
        match self {
            ChangeRecord::Add { path, .. }
            | ChangeRecord::Replace { path, .. }
            | ChangeRecord::Skip { path, .. } => path,
        }
    }

    /// Id of the element the record creates, overwrites or keeps.
    pub fn target(&self) -> ElementId {
        match self {
            ChangeRecord::Add { element, .. } | ChangeRecord::Replace { element, .. } => {
                element.id
            }
            ChangeRecord::Skip { id, .. } => *id,
        }
    }

    pub fn op(&self) -> &'static str {
        match self {
            ChangeRecord::Add { .. } => "add",
            ChangeRecord::Replace { .. } => "replace",
            ChangeRecord::Skip { .. } => "skip",
        }
    }
}

/// An ordered list of change records against one layer of a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub layer: Layer,
    /// The package the import was rooted at.
    pub root: ElementId,
    /// New description of the root package, if the input carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_description: Option<String>,
    #[serde(default)]
    pub records: Vec<ChangeRecord>,
}

impl ChangeSet {
    pub fn new(layer: Layer, root: ElementId) -> Self {
        Self {
            layer,
            root,
            root_description: None,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: ChangeRecord) {
        self.records.push(record);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if applying the set cannot add or overwrite anything.
    pub fn is_noop(&self) -> bool {
        self.root_description.is_none()
            && self
                .records
                .iter()
                .all(|r| matches!(r, ChangeRecord::Skip { .. }))
    }

    pub fn summary(&self) -> ChangeSummary {
        let mut summary = ChangeSummary::default();
        for record in &self.records {
            match record {
                ChangeRecord::Add { .. } => summary.added += 1,
                ChangeRecord::Replace { .. } => summary.replaced += 1,
                ChangeRecord::Skip { .. } => summary.skipped += 1,
            }
        }
        summary
    }
}

/// Record counts of a change set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub added: usize,
    pub replaced: usize,
    pub skipped: usize,
}

impl fmt::Display for ChangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} replaced, {} skipped",
            self.added, self.replaced, self.skipped
        )
    }
}
