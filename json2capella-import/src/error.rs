//! Error types for the import pipeline.

use json2capella_model::Origin;
use json2capella_types::{ElementId, ElementKind, ScopePath};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Errors that can occur while importing, applying or exporting.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Malformed or incomplete JSON input.
    #[error("parse error in {}#{pointer}: {message}", .file.display())]
    Parse {
        file: PathBuf,
        /// JSON pointer to the offending value.
        pointer: String,
        message: String,
    },

    /// A name collision that was not allowed to be resolved.
    #[error("conflict at {path}: incoming {incoming} collides with existing {existing} {id}")]
    Conflict {
        path: ScopePath,
        id: ElementId,
        existing: ElementKind,
        incoming: ElementKind,
    },

    /// Invalid layer, root package or types package reference.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A change record that cannot be applied to the model.
    #[error("invalid change: {0}")]
    InvalidChange(String),

    /// I/O error on an input, model or change file.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error outside of definition parsing.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ImportError {
    pub(crate) fn parse(origin: &Origin, message: impl Into<String>) -> Self {
        ImportError::Parse {
            file: origin.file.clone(),
            pointer: origin.pointer.clone(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImportError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        ImportError::Configuration(message.into())
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, ImportError::Parse { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ImportError::Conflict { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, ImportError::Configuration(_))
    }
}
