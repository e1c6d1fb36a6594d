//! Conversion of model data packages back into the JSON definition format.

use crate::definitions::{JsonAttr, JsonEnum, JsonLiteral, JsonPackage, JsonStruct};
use crate::ImportResult;
use crate::packages::find_package_in_model;
use json2capella_model::{Aggregation, ElementData, Model, ModelElement, PropertyData};
use json2capella_types::{ElementId, ElementKind};
use tracing::{debug, warn};

/// Exports the package with the given id or unique name from any layer.
pub fn export_package(model: &Model, reference: &str) -> ImportResult<JsonPackage> {
    let (layer, path, package) = find_package_in_model(model, reference)?;
    debug!("Exporting {} of layer {}", path, layer);
    let scope = model.data_package(layer).unwrap_or(package);
    Ok(package_to_json(scope, package))
}

/// Converts `package` and everything below it.
///
/// `scope` is searched for the types properties refer to; it is normally the
/// layer's data package.
pub fn package_to_json(scope: &ModelElement, package: &ModelElement) -> JsonPackage {
    let mut out = JsonPackage {
        name: package.name.clone(),
        info: package.description.clone(),
        prefix: Some(package.id.to_string()),
        ..JsonPackage::default()
    };
    for child in &package.children {
        match &child.data {
            ElementData::Package => out.sub_packages.push(package_to_json(scope, child)),
            ElementData::Class => out.structs.push(class_to_json(scope, child)),
            ElementData::Enumeration => out.enums.push(enum_to_json(child)),
            _ => {}
        }
    }
    out
}

fn class_to_json(scope: &ModelElement, class: &ModelElement) -> JsonStruct {
    let attrs = class
        .children
        .iter()
        .filter_map(|child| match &child.data {
            ElementData::Property(property) => Some(attr_to_json(scope, child, property)),
            _ => None,
        })
        .collect();
    JsonStruct {
        name: class.name.clone(),
        info: class.description.clone(),
        attrs,
        ..JsonStruct::default()
    }
}

fn attr_to_json(scope: &ModelElement, attr: &ModelElement, property: &PropertyData) -> JsonAttr {
    let mut out = JsonAttr {
        name: attr.name.clone(),
        info: attr.description.clone(),
        multiplicity: Some(format_multiplicity(
            &attr.name,
            &property.min_card,
            &property.max_card,
        )),
        ..JsonAttr::default()
    };
    if let (Some(min), Some(max)) = (&property.min_value, &property.max_value) {
        out.range = Some(format!("{min}..{max}"));
    }

    let Some(type_element) = scope.find(property.type_ref) else {
        warn!("No type set, falling back to 'string' for {}", attr.name);
        out.data_type = Some("string".to_string());
        return out;
    };
    match type_element.kind() {
        ElementKind::Class => {
            let name = qualified(scope, property.type_ref, &type_element.name);
            match property.aggregation {
                Aggregation::Association => out.reference = Some(name),
                Aggregation::Composition => out.composition = Some(name),
            }
        }
        ElementKind::Enumeration => {
            out.enum_type = Some(qualified(scope, property.type_ref, &type_element.name));
        }
        _ => out.data_type = Some(type_element.name.clone()),
    }
    out
}

/// `prefix.Name`, where the prefix is the id of the type's owning package.
fn qualified(scope: &ModelElement, id: ElementId, name: &str) -> String {
    match owner_of(scope, id) {
        Some(owner) => format!("{owner}.{name}"),
        None => name.to_string(),
    }
}

fn owner_of(element: &ModelElement, id: ElementId) -> Option<ElementId> {
    element.children.iter().find_map(|child| {
        if child.id == id {
            Some(element.id)
        } else {
            owner_of(child, id)
        }
    })
}

fn enum_to_json(enumeration: &ModelElement) -> JsonEnum {
    let enum_literals = enumeration
        .children
        .iter()
        .filter_map(|literal| match literal.data {
            ElementData::EnumerationLiteral { value } => Some(JsonLiteral {
                name: literal.name.clone(),
                int_id: Some(value),
                info: literal.description.clone(),
                ..JsonLiteral::default()
            }),
            _ => None,
        })
        .collect();
    JsonEnum {
        name: enumeration.name.clone(),
        info: enumeration.description.clone(),
        enum_literals,
        ..JsonEnum::default()
    }
}

/// Renders cardinality bounds as `n`, `*` or `min..max`.
///
/// Unparseable bounds are ignored with a warning: a bad lower bound counts
/// as `0`, a bad upper bound as unbounded.
pub fn format_multiplicity(owner: &str, min_card: &str, max_card: &str) -> String {
    let max = match max_card {
        "" | "*" => None,
        v => v
            .parse::<u64>()
            .inspect_err(|_| {
                warn!("Cannot convert max_card value '{}' of {} to int, ignoring", v, owner)
            })
            .ok(),
    };
    let min = match min_card {
        "" => 0,
        v => v.parse::<u64>().unwrap_or_else(|_| {
            warn!("Cannot convert min_card value '{}' of {} to int, ignoring", v, owner);
            0
        }),
    };

    match max {
        None if min == 0 => "*".to_string(),
        Some(max) if max == min => max.to_string(),
        Some(max) => format!("{min}..{max}"),
        None => format!("{min}..*"),
    }
}
