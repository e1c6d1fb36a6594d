//! JSON data-definition import for Capella data packages.
//!
//! The pipeline has three stages:
//! - [`ImportSet`]: parses definition files into data elements
//! - [`Reconciler`]: matches them against a layer's data package under a
//!   [`ConflictPolicy`](json2capella_model::ConflictPolicy) and plans a
//!   [`ChangeSet`](json2capella_model::ChangeSet)
//! - [`ChangeApplicator`]: applies a change set, all or nothing
//!
//! [`Importer`] wires the stages into the direct-write and diff modes.
//! Change sets can be stored as YAML or JSON change files, and any data
//! package can be exported back into the definition format.

mod apply;
mod changefile;
pub mod definitions;
mod description;
mod error;
mod export;
mod importer;
mod packages;
mod parse;
mod reconcile;
mod store;

pub use apply::ChangeApplicator;
pub use changefile::{ChangeFormat, read_change_set, write_change_set};
pub use error::{ImportError, ImportResult};
pub use export::{export_package, format_multiplicity, package_to_json};
pub use importer::Importer;
pub use packages::{PackageInfo, find_package, find_package_in_model, list_packages};
pub use parse::{ImportSet, parse_multiplicity, parse_range};
pub use reconcile::{DATA_TYPES_PACKAGE, ImportOptions, Reconciler};
pub use store::{load_model, save_model};
