//! Element model for json2capella.
//!
//! Defines the types the importer works on:
//! - [`DataElement`]: an element parsed from a JSON definition file
//! - [`ModelElement`] / [`Model`]: the target model's data packages
//! - [`ConflictPolicy`] / [`Resolution`]: how name collisions are resolved
//! - [`ConflictResolver`]: pluggable decision provider for the `ask` policy
//! - [`ChangeRecord`] / [`ChangeSet`]: the declarative form of an import
//!
//! These types carry no I/O. Parsing, reconciliation and change application
//! live in `json2capella-import`.

mod change;
mod data;
mod element;
mod model;
mod policy;
mod resolver;

pub use change::{ChangeRecord, ChangeSet, ChangeSummary, ElementSnapshot};
pub use data::{DataElement, Origin};
pub use element::{Aggregation, ElementData, PrimitiveKind, PropertyData, QualifiedName, TypeSpec};
pub use model::{DATA_PACKAGE_NAME, Model, ModelElement};
pub use policy::{ConflictPolicy, Resolution, UnknownPolicy};
pub use resolver::{Conflict, ConflictResolver, ScriptedResolver};
