//! Reading and writing declarative change files.

use crate::{ImportError, ImportResult};
use json2capella_model::ChangeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Serialization format of a change file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChangeFormat {
    #[default]
    Yaml,
    Json,
}

impl ChangeFormat {
    /// JSON for `*.json` paths, YAML for everything else.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ChangeFormat::Json,
            _ => ChangeFormat::Yaml,
        }
    }

    pub fn render(&self, set: &ChangeSet) -> ImportResult<String> {
        Ok(match self {
            ChangeFormat::Yaml => serde_yaml::to_string(set)?,
            ChangeFormat::Json => {
                let mut text = serde_json::to_string_pretty(set)?;
                text.push('\n');
                text
            }
        })
    }

    pub fn parse(&self, text: &str) -> ImportResult<ChangeSet> {
        Ok(match self {
            ChangeFormat::Yaml => serde_yaml::from_str(text)?,
            ChangeFormat::Json => serde_json::from_str(text)?,
        })
    }
}

pub fn write_change_set(path: &Path, set: &ChangeSet) -> ImportResult<()> {
    let text = ChangeFormat::for_path(path).render(set)?;
    fs::write(path, text).map_err(|e| ImportError::io(path, e))?;
    debug!("Wrote {} change records to {}", set.len(), path.display());
    Ok(())
}

pub fn read_change_set(path: &Path) -> ImportResult<ChangeSet> {
    let text = fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
    ChangeFormat::for_path(path).parse(&text)
}
