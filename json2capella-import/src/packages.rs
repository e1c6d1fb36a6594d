//! Looking up data packages by id or name.

use crate::{ImportError, ImportResult};
use json2capella_model::{Model, ModelElement};
use json2capella_types::{ElementId, Layer, ScopePath};
use std::fmt::Write as _;

/// A data package found in a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub layer: Layer,
    pub id: ElementId,
    pub name: String,
    /// Path below the layer's data package.
    pub path: ScopePath,
}

/// Every data package of the model, layer by layer, in pre-order.
pub fn list_packages(model: &Model) -> Vec<PackageInfo> {
    let mut out = Vec::new();
    for (layer, data_package) in &model.layers {
        for (path, element) in packages_below(data_package) {
            out.push(PackageInfo {
                layer: *layer,
                id: element.id,
                name: element.name.clone(),
                path,
            });
        }
    }
    out
}

/// Finds a package below (or equal to) `data_package` by id or unique name.
///
/// Returns the package and its path relative to `data_package`.
pub fn find_package<'m>(
    data_package: &'m ModelElement,
    reference: &str,
) -> ImportResult<(ScopePath, &'m ModelElement)> {
    if let Ok(id) = ElementId::parse(reference) {
        let element = data_package.find(id).ok_or_else(|| {
            ImportError::config(format!("no element with id {id} in this data package"))
        })?;
        if !element.is_package() {
            return Err(ImportError::config(format!(
                "expected a package at id {id}, but found a {} instead",
                element.kind()
            )));
        }
        let path = data_package.path_of(id).unwrap_or_default();
        return Ok((path, element));
    }

    let mut matches: Vec<(ScopePath, &ModelElement)> = packages_below(data_package)
        .into_iter()
        .filter(|(_, element)| element.name == reference)
        .collect();
    match matches.len() {
        0 => Err(ImportError::config(format!(
            "couldn't find a package with id or name '{reference}'"
        ))),
        1 => Ok(matches.remove(0)),
        _ => Err(ImportError::config(ambiguous(reference, &matches))),
    }
}

/// Like [`find_package`], searching every layer of the model.
pub fn find_package_in_model<'m>(
    model: &'m Model,
    reference: &str,
) -> ImportResult<(Layer, ScopePath, &'m ModelElement)> {
    let mut found = Vec::new();
    let mut last_err = None;
    for (layer, data_package) in &model.layers {
        match find_package(data_package, reference) {
            Ok((path, element)) => found.push((*layer, path, element)),
            Err(err) => last_err = Some(err),
        }
    }
    match found.len() {
        1 => Ok(found.remove(0)),
        0 => Err(last_err.unwrap_or_else(|| {
            ImportError::config(format!("couldn't find a package with id or name '{reference}'"))
        })),
        _ => {
            let listed: Vec<(ScopePath, &ModelElement)> =
                found.iter().map(|(_, path, e)| (path.clone(), *e)).collect();
            Err(ImportError::config(ambiguous(reference, &listed)))
        }
    }
}

fn packages_below(data_package: &ModelElement) -> Vec<(ScopePath, &ModelElement)> {
    std::iter::once((ScopePath::root(), data_package))
        .chain(data_package.descendants())
        .filter(|(_, element)| element.is_package())
        .collect()
}

fn ambiguous(reference: &str, matches: &[(ScopePath, &ModelElement)]) -> String {
    let mut message = format!("found more than one package named '{reference}':");
    for (path, element) in matches {
        let _ = write!(message, "\n  {} at {}", element.id, path);
    }
    message
}
