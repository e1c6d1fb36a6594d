//! Parsing of JSON definition files into data elements.
//!
//! A single file is merged straight into the import root: its classes,
//! enumerations and sub-packages become children of the root, and its
//! description becomes the root's. A directory
//! is read recursively and every file becomes a sub-package of the root,
//! in path order.

use crate::definitions::{JsonAttr, JsonEnum, JsonPackage, JsonStruct};
use crate::{ImportError, ImportResult, description};
use json2capella_model::{
    Aggregation, DataElement, ElementData, Origin, PropertyData, QualifiedName, TypeSpec,
};
use json2capella_types::{ElementKind, ScopePath};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

static MULTIPLICITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(\d+)\.\.)?(\d+|\*)$").expect("valid regex"));
static RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?\d+)\.\.(-?\d+|\*)$").expect("valid regex"));

/// The parsed contents of one import run.
#[derive(Debug, Clone, Default)]
pub struct ImportSet {
    /// Elements to merge into the import root.
    pub elements: Vec<DataElement>,
    /// Package prefixes mapped to their scope paths relative to the import root.
    pub prefixes: BTreeMap<String, ScopePath>,
    /// Prefixes claimed by more than one package.
    pub shared_prefixes: BTreeSet<String>,
    /// Description of a single input file's top-level package.
    pub root_description: Option<String>,
    /// Files the set was read from.
    pub files: Vec<PathBuf>,
}

impl ImportSet {
    /// Loads a definition file, or every `*.json` file below a directory.
    pub fn load(path: &Path) -> ImportResult<Self> {
        if path.is_dir() {
            Self::from_dir(path)
        } else {
            Self::from_file(path)
        }
    }

    pub fn from_file(path: &Path) -> ImportResult<Self> {
        let package = read_package(path)?;
        let mut set = Self::default();
        set.merge_into_root(&package, Origin::new(path, ""))?;
        set.files.push(path.to_path_buf());
        Ok(set)
    }

    pub fn from_dir(dir: &Path) -> ImportResult<Self> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(|e| ImportError::io(dir, e.into()))?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
        if files.is_empty() {
            return Err(ImportError::config(format!(
                "no .json files found below {}",
                dir.display()
            )));
        }

        let mut packages = Vec::with_capacity(files.len());
        for file in &files {
            packages.push((file.clone(), read_package(file)?));
        }
        let mut set = Self::from_packages(packages)?;
        set.files = files;
        Ok(set)
    }

    /// Parses a single definition document as if it were read from `file`.
    pub fn from_json_str(json: &str, file: impl Into<PathBuf>) -> ImportResult<Self> {
        let file = file.into();
        let package = parse_package(json, &file)?;
        let mut set = Self::default();
        set.merge_into_root(&package, Origin::new(&file, ""))?;
        set.files.push(file);
        Ok(set)
    }

    /// Builds a set in which every package becomes a sub-package of the root.
    pub fn from_packages(packages: Vec<(PathBuf, JsonPackage)>) -> ImportResult<Self> {
        let mut set = Self::default();
        let mut converter = Converter {
            prefixes: &mut set.prefixes,
            shared: &mut set.shared_prefixes,
        };
        let mut elements = Vec::with_capacity(packages.len());
        for (file, package) in &packages {
            let element =
                converter.package(package, Origin::new(file, ""), &ScopePath::root())?;
            elements.push(element);
        }
        ensure_unique(&elements)?;
        set.elements = elements;
        set.files = packages.into_iter().map(|(file, _)| file).collect();
        Ok(set)
    }

    fn merge_into_root(&mut self, package: &JsonPackage, origin: Origin) -> ImportResult<()> {
        required_name(&package.name, &origin)?;
        let mut converter = Converter {
            prefixes: &mut self.prefixes,
            shared: &mut self.shared_prefixes,
        };
        self.elements = converter.package_contents(package, &origin, &ScopePath::root())?;
        let description = description::render(&package.info, &package.see, None, None);
        self.root_description = (!description.is_empty()).then_some(description);
        Ok(())
    }

    /// Kind of every element in the set, keyed by its scope path relative to
    /// the import root.
    pub fn defined_kinds(&self) -> HashMap<ScopePath, ElementKind> {
        let mut kinds = HashMap::new();
        collect_kinds(&self.elements, &ScopePath::root(), &mut kinds);
        kinds
    }

    /// Number of elements in the set, at every depth.
    pub fn element_count(&self) -> usize {
        fn count(elements: &[DataElement]) -> usize {
            elements.iter().map(|e| 1 + count(&e.children)).sum()
        }
        count(&self.elements)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

fn collect_kinds(
    elements: &[DataElement],
    scope: &ScopePath,
    out: &mut HashMap<ScopePath, ElementKind>,
) {
    for element in elements {
        let path = scope.child(&element.name);
        collect_kinds(&element.children, &path, out);
        out.insert(path, element.kind());
    }
}

fn read_package(path: &Path) -> ImportResult<JsonPackage> {
    let text = fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
    debug!("Read definitions from {}", path.display());
    parse_package(&text, path)
}

fn parse_package(json: &str, file: &Path) -> ImportResult<JsonPackage> {
    serde_json::from_str(json).map_err(|e| ImportError::Parse {
        file: file.to_path_buf(),
        pointer: String::new(),
        message: e.to_string(),
    })
}

fn required_name<'a>(name: &'a str, origin: &Origin) -> ImportResult<&'a str> {
    if name.trim().is_empty() {
        Err(ImportError::parse(origin, "missing required field `name`"))
    } else {
        Ok(name)
    }
}

/// Fails on the first element whose name repeats an earlier sibling's.
fn ensure_unique(elements: &[DataElement]) -> ImportResult<()> {
    let mut seen = HashSet::new();
    for element in elements {
        if !seen.insert(element.name.as_str()) {
            return Err(ImportError::parse(
                &element.origin,
                format!("duplicate name '{}' in the same scope", element.name),
            ));
        }
    }
    Ok(())
}

struct Converter<'a> {
    prefixes: &'a mut BTreeMap<String, ScopePath>,
    shared: &'a mut BTreeSet<String>,
}

impl Converter<'_> {
    /// Only `prefix.Name` references go through the prefix map; a shared
    /// prefix makes them ambiguous.
    fn register_prefix(&mut self, package: &JsonPackage, name: &str, path: &ScopePath) {
        let prefix = package
            .prefix
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(name)
            .to_string();
        match self.prefixes.get(&prefix) {
            Some(existing) if existing != path => {
                warn!(
                    "Prefix '{}' of {} is already used by {}, references to it are ambiguous",
                    prefix, path, existing
                );
                self.shared.insert(prefix);
            }
            Some(_) => {}
            None => {
                self.prefixes.insert(prefix, path.clone());
            }
        }
    }

    fn package(
        &mut self,
        package: &JsonPackage,
        origin: Origin,
        parent: &ScopePath,
    ) -> ImportResult<DataElement> {
        let name = required_name(&package.name, &origin)?;
        let path = parent.child(name);
        let children = self.package_contents(package, &origin, &path)?;
        Ok(DataElement::new(name, ElementData::Package, origin)
            .with_description(description::render(&package.info, &package.see, None, None))
            .with_children(children))
    }

    fn package_contents(
        &mut self,
        package: &JsonPackage,
        origin: &Origin,
        path: &ScopePath,
    ) -> ImportResult<Vec<DataElement>> {
        let name = path.name().unwrap_or(&package.name).to_string();
        self.register_prefix(package, &name, path);

        let mut children = Vec::new();
        for (i, sub) in package.sub_packages.iter().enumerate() {
            children.push(self.package(sub, origin.at("subPackages").at(i), path)?);
        }
        for (i, s) in package.structs.iter().enumerate() {
            children.push(class(s, origin.at("structs").at(i))?);
        }
        for (i, e) in package.enums.iter().enumerate() {
            children.push(enumeration(e, origin.at("enums").at(i))?);
        }
        ensure_unique(&children)?;
        Ok(children)
    }
}

fn class(def: &JsonStruct, origin: Origin) -> ImportResult<DataElement> {
    let name = required_name(&def.name, &origin)?;
    if def.extends.is_some() {
        debug!("Ignoring `extends` of struct {}", name);
    }
    let mut properties = Vec::with_capacity(def.attrs.len());
    for (i, attr) in def.attrs.iter().enumerate() {
        properties.push(property(attr, origin.at("attrs").at(i))?);
    }
    ensure_unique(&properties)?;
    Ok(DataElement::new(name, ElementData::Class, origin)
        .with_description(description::render(&def.info, &def.see, None, None))
        .with_children(properties))
}

fn property(attr: &JsonAttr, origin: Origin) -> ImportResult<DataElement> {
    let name = required_name(&attr.name, &origin)?;

    let sources = [
        ("dataType", attr.data_type.as_deref()),
        ("reference", attr.reference.as_deref()),
        ("composition", attr.composition.as_deref()),
        ("enumType", attr.enum_type.as_deref()),
    ];
    let given: Vec<(&str, &str)> = sources
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
        .collect();
    let (type_ref, aggregation) = match given.as_slice() {
        [("dataType", v)] => (TypeSpec::Primitive(v.to_string()), Aggregation::Composition),
        [("reference", v)] => (
            TypeSpec::Class(QualifiedName::parse(v)),
            Aggregation::Association,
        ),
        [("composition", v)] => (
            TypeSpec::Class(QualifiedName::parse(v)),
            Aggregation::Composition,
        ),
        [(_, v)] => (
            TypeSpec::Enumeration(QualifiedName::parse(v)),
            Aggregation::Composition,
        ),
        _ => {
            return Err(ImportError::parse(
                &origin,
                "attributes need exactly one of dataType, reference, composition or enumType",
            ));
        }
    };

    let (min_card, max_card) = match attr.multiplicity.as_deref() {
        Some(m) => parse_multiplicity(m).ok_or_else(|| {
            ImportError::parse(
                &origin.at("multiplicity"),
                format!("invalid multiplicity '{m}', expected `n`, `*` or `min..max`"),
            )
        })?,
        None => ("1".to_string(), "1".to_string()),
    };

    let (min_value, max_value) = match attr.range.as_deref() {
        Some(r) => {
            let (min, max) = parse_range(r).ok_or_else(|| {
                ImportError::parse(
                    &origin.at("range"),
                    format!("invalid value range '{r}', expected `min..max`"),
                )
            })?;
            (Some(min), Some(max))
        }
        None => (None, None),
    };

    let data = ElementData::Property(PropertyData {
        type_ref,
        aggregation,
        min_card,
        max_card,
        min_value,
        max_value,
    });
    Ok(DataElement::new(name, data, origin).with_description(description::render(
        &attr.info,
        &attr.see,
        attr.exp,
        attr.unit.as_deref(),
    )))
}

fn enumeration(def: &JsonEnum, origin: Origin) -> ImportResult<DataElement> {
    let name = required_name(&def.name, &origin)?;
    let mut literals = Vec::with_capacity(def.enum_literals.len());
    for (i, literal) in def.enum_literals.iter().enumerate() {
        let literal_origin = origin.at("enumLiterals").at(i);
        let literal_name = required_name(&literal.name, &literal_origin)?;
        let value = literal.int_id.unwrap_or(i as i64);
        literals.push(
            DataElement::new(
                literal_name,
                ElementData::EnumerationLiteral { value },
                literal_origin,
            )
            .with_description(description::render(&literal.info, &literal.see, None, None)),
        );
    }
    ensure_unique(&literals)?;
    Ok(DataElement::new(name, ElementData::Enumeration, origin)
        .with_description(description::render(&def.info, &def.see, None, None))
        .with_children(literals))
}

/// Splits a multiplicity into `(min_card, max_card)`.
pub fn parse_multiplicity(raw: &str) -> Option<(String, String)> {
    let caps = MULTIPLICITY.captures(raw.trim())?;
    let max = caps.get(2)?.as_str().to_string();
    let min = match caps.get(1) {
        Some(min) => min.as_str().to_string(),
        None if max == "*" => "0".to_string(),
        None => max.clone(),
    };
    Some((min, max))
}

/// Splits a value range into `(min_value, max_value)`.
pub fn parse_range(raw: &str) -> Option<(String, String)> {
    let caps = RANGE.captures(raw.trim())?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplicity_forms() {
        let pair = |a: &str, b: &str| Some((a.to_string(), b.to_string()));
        assert_eq!(parse_multiplicity("1"), pair("1", "1"));
        assert_eq!(parse_multiplicity("*"), pair("0", "*"));
        assert_eq!(parse_multiplicity("0..*"), pair("0", "*"));
        assert_eq!(parse_multiplicity("2..5"), pair("2", "5"));
        assert_eq!(parse_multiplicity("1..2..3"), None);
        assert_eq!(parse_multiplicity("-1"), None);
        assert_eq!(parse_multiplicity("*..1"), None);
    }

    #[test]
    fn range_forms() {
        let pair = |a: &str, b: &str| Some((a.to_string(), b.to_string()));
        assert_eq!(parse_range("0..150"), pair("0", "150"));
        assert_eq!(parse_range("-40..85"), pair("-40", "85"));
        assert_eq!(parse_range("1..*"), pair("1", "*"));
        assert_eq!(parse_range("150"), None);
        assert_eq!(parse_range("a..b"), None);
    }
}
