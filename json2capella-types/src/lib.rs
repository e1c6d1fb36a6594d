//! Core type definitions for json2capella.
//!
//! This crate defines the small, model-agnostic vocabulary shared by the
//! importer and the CLI:
//! - Element identifiers (UUID v4 for fresh elements, UUID v5 for ids derived
//!   from a scope path)
//! - Scope paths, the name-based address of an element below a data package
//! - Element kinds and model layers
//!
//! Element payloads and the model tree itself live in `json2capella-model`.

mod ids;
mod kind;
mod layer;
mod scope;

pub use ids::ElementId;
pub use kind::ElementKind;
pub use layer::Layer;
pub use scope::ScopePath;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("unknown layer '{0}' (expected one of: oa, sa, la, pa)")]
    UnknownLayer(String),

    #[error("unknown element kind '{0}'")]
    UnknownKind(String),
}
