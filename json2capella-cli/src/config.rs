//! Defaults from a TOML config file.
//!
//! ```toml
//! layer = "la"
//! policy = "replace"
//! root = "Interfaces"
//! types = "Data Types"
//! ```
//!
//! Command-line flags take precedence over every key.

use crate::cli::ImportArgs;
use anyhow::{Context, Result};
use json2capella_import::{ImportError, ImportOptions};
use json2capella_model::ConflictPolicy;
use json2capella_types::Layer;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "json2capella.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub layer: Option<Layer>,
    pub policy: Option<ConflictPolicy>,
    pub root: Option<String>,
    pub types: Option<String>,
}

impl FileConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        let config = toml::from_str(text).map_err(|e| ImportError::Configuration(e.to_string()))?;
        Ok(config)
    }

    /// Reads `path`, or the default config file if it exists, or nothing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Path::new(DEFAULT_CONFIG_FILE),
            None => return Ok(Self::default()),
        };
        let text = fs::read_to_string(path).map_err(|e| {
            ImportError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        debug!("Using config file {}", path.display());
        Self::from_toml(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Merges the command line over this config.
    pub fn import_options(&self, args: &ImportArgs) -> Result<ImportOptions> {
        let layer = args.layer.or(self.layer).ok_or_else(|| {
            ImportError::Configuration(
                "no layer given; pass --layer or set `layer` in the config file".to_string(),
            )
        })?;
        let policy = args.policy.or(self.policy).unwrap_or_default();
        Ok(ImportOptions {
            layer,
            root: args.root.clone().or_else(|| self.root.clone()),
            types: args.types.clone().or_else(|| self.types.clone()),
            policy,
        })
    }
}
