//! Application of change sets to a model.

use crate::{ImportError, ImportResult};
use json2capella_model::{
    ChangeRecord, ChangeSet, ChangeSummary, ElementData, ElementSnapshot, Model, ModelElement,
};
use json2capella_types::ElementId;
use tracing::{debug, info};

/// Executes change sets against a model.
///
/// Records are applied in order to a copy of the target data package, which
/// replaces the original only once every record has succeeded and every
/// property of the result is still typed. A failing set leaves the model as
/// it was.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChangeApplicator;

impl ChangeApplicator {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, model: &mut Model, set: &ChangeSet) -> ImportResult<ChangeSummary> {
        let current = model.data_package(set.layer).ok_or_else(|| {
            ImportError::InvalidChange(format!("model has no {} layer", set.layer.long_name()))
        })?;
        match current.find(set.root) {
            Some(root) if root.is_package() => {}
            Some(root) => {
                return Err(ImportError::InvalidChange(format!(
                    "import root {} is a {}, not a package",
                    set.root,
                    root.kind()
                )));
            }
            None => {
                return Err(ImportError::InvalidChange(format!(
                    "import root {} is not in the {} data package",
                    set.root, set.layer
                )));
            }
        }

        let mut staged = current.clone();
        for (index, record) in set.records.iter().enumerate() {
            apply_record(&mut staged, record).map_err(|err| match err {
                ImportError::InvalidChange(message) => ImportError::InvalidChange(format!(
                    "record {} ({} {}): {message}",
                    index + 1,
                    record.op(),
                    record.path()
                )),
                other => other,
            })?;
        }
        if let Some(description) = &set.root_description {
            if let Some(root) = staged.find_mut(set.root) {
                debug!("Setting description of '{}'", root.name);
                root.description = description.clone();
            }
        }
        check_type_refs(current, &staged)?;

        if let Some(slot) = model.data_package_mut(set.layer) {
            *slot = staged;
        }
        let summary = set.summary();
        info!("Applied change set to {}: {}", set.layer, summary);
        Ok(summary)
    }
}

fn apply_record(package: &mut ModelElement, record: &ChangeRecord) -> ImportResult<()> {
    match record {
        ChangeRecord::Add {
            parent, element, ..
        } => apply_add(package, *parent, element),
        ChangeRecord::Replace { element, .. } => apply_replace(package, element),
        ChangeRecord::Skip { path, .. } => {
            debug!("Kept {}", path);
            Ok(())
        }
    }
}

fn apply_add(
    package: &mut ModelElement,
    parent: ElementId,
    element: &ElementSnapshot,
) -> ImportResult<()> {
    if package.find(element.id).is_some() {
        return Err(ImportError::InvalidChange(format!(
            "an element with id {} already exists",
            element.id
        )));
    }
    let parent = package
        .find_mut(parent)
        .ok_or_else(|| ImportError::InvalidChange(format!("no parent element with id {parent}")))?;
    if !parent.kind().is_container() {
        return Err(ImportError::InvalidChange(format!(
            "a {} cannot contain elements",
            parent.kind()
        )));
    }
    if parent.child_by_name(&element.name).is_some() {
        return Err(ImportError::InvalidChange(format!(
            "'{}' already has a child named '{}'",
            parent.name, element.name
        )));
    }
    debug!("Adding {} '{}' to '{}'", element.kind(), element.name, parent.name);
    parent.children.push(element.to_element());
    Ok(())
}

fn apply_replace(package: &mut ModelElement, element: &ElementSnapshot) -> ImportResult<()> {
    if package.id == element.id {
        return Err(ImportError::InvalidChange(
            "the data package itself cannot be replaced".to_string(),
        ));
    }
    let parent_id = parent_of(package, element.id)
        .ok_or_else(|| ImportError::InvalidChange(format!("no element with id {}", element.id)))?;
    let parent = package
        .find_mut(parent_id)
        .ok_or_else(|| ImportError::InvalidChange(format!("no element with id {parent_id}")))?;
    if parent
        .children
        .iter()
        .any(|c| c.id != element.id && c.name == element.name)
    {
        return Err(ImportError::InvalidChange(format!(
            "'{}' already has a child named '{}'",
            parent.name, element.name
        )));
    }

    let Some(target) = parent.children.iter_mut().find(|c| c.id == element.id) else {
        return Err(ImportError::InvalidChange(format!(
            "no element with id {}",
            element.id
        )));
    };
    if target.kind() != element.kind() {
        debug!(
            "'{}' changes from {} to {}, dropping {} children",
            target.name,
            target.kind(),
            element.kind(),
            target.children.len()
        );
        target.children.clear();
    }
    target.name = element.name.clone();
    target.description = element.description.clone();
    target.data = element.data.clone();
    Ok(())
}

fn parent_of(element: &ModelElement, id: ElementId) -> Option<ElementId> {
    for child in &element.children {
        if child.id == id {
            return Some(element.id);
        }
        if let Some(found) = parent_of(child, id) {
            return Some(found);
        }
    }
    None
}

/// Every property of the staged package must be typed by a class,
/// enumeration or primitive type of the package. A replace that changes an
/// element's kind drops its children, which can orphan properties outside
/// the set. Properties that were already broken and are left untouched are
/// not reported.
fn check_type_refs(before: &ModelElement, after: &ModelElement) -> ImportResult<()> {
    for (path, element) in after.descendants() {
        let ElementData::Property(property) = &element.data else {
            continue;
        };
        let problem = match after.find(property.type_ref) {
            Some(target) if target.kind().is_type() => continue,
            Some(target) => format!(
                "refers to {}, a {}, which is not a type",
                target.id,
                target.kind()
            ),
            None => format!("refers to unknown type {}", property.type_ref),
        };
        let was_typed = before
            .find(property.type_ref)
            .is_some_and(|target| target.kind().is_type());
        let untouched = before
            .find(element.id)
            .is_some_and(|old| old.data == element.data);
        if untouched && !was_typed {
            continue;
        }
        return Err(ImportError::InvalidChange(format!("property {path} {problem}")));
    }
    Ok(())
}
