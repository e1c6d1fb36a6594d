//! Model snapshot persistence.
//!
//! A model is stored as one pretty-printed JSON document. Saving writes a
//! sibling temp file first and renames it over the target, so an
//! interrupted save never leaves a truncated model behind.

use crate::{ImportError, ImportResult};
use json2capella_model::Model;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub fn load_model(path: &Path) -> ImportResult<Model> {
    let text = fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
    let model: Model = serde_json::from_str(&text)?;
    debug!(
        "Loaded model '{}' ({} elements) from {}",
        model.name,
        model.element_count(),
        path.display()
    );
    Ok(model)
}

pub fn save_model(path: &Path, model: &Model) -> ImportResult<()> {
    let mut text = serde_json::to_string_pretty(model)?;
    text.push('\n');

    let tmp = temp_path(path);
    fs::write(&tmp, text).map_err(|e| ImportError::io(&tmp, e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(ImportError::io(path, e));
    }
    debug!("Saved model '{}' to {}", model.name, path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "model".into());
    name.push(".tmp");
    path.with_file_name(name)
}
