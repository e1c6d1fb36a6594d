//! Reconciliation of data elements against a model's data package.
//!
//! The reconciler never touches the model. It walks the incoming element tree
//! alongside the existing one, matching on `(scope path, name)`, and records
//! what has to happen in a [`ChangeSet`]. Direct-write imports apply that set
//! afterwards; diff imports serialize it.

use crate::packages::find_package;
use crate::{ImportError, ImportResult, ImportSet};
use json2capella_model::{
    ChangeRecord, ChangeSet, Conflict, ConflictPolicy, ConflictResolver, DataElement, ElementData,
    ElementSnapshot, Model, ModelElement, Origin, PrimitiveKind, QualifiedName, Resolution,
    TypeSpec,
};
use json2capella_types::{ElementId, ElementKind, Layer, ScopePath};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Name of the package primitive types are created in when no types package
/// is configured.
pub const DATA_TYPES_PACKAGE: &str = "Data Types";

/// Where an import goes and how collisions are handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub layer: Layer,
    /// Id or name of the package to import into; the layer's data package if unset.
    pub root: Option<String>,
    /// Id or name of the package holding primitive types.
    pub types: Option<String>,
    pub policy: ConflictPolicy,
}

impl ImportOptions {
    pub fn new(layer: Layer, policy: ConflictPolicy) -> Self {
        Self {
            layer,
            root: None,
            types: None,
            policy,
        }
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_types(mut self, types: impl Into<String>) -> Self {
        self.types = Some(types.into());
        self
    }
}

enum TypesTarget<'m> {
    Existing {
        package: &'m ModelElement,
        path: ScopePath,
    },
    Planned {
        parent: ElementId,
        path: ScopePath,
        id: ElementId,
    },
}

impl TypesTarget<'_> {
    fn path(&self) -> &ScopePath {
        match self {
            TypesTarget::Existing { path, .. } | TypesTarget::Planned { path, .. } => path,
        }
    }
}

struct PlannedPrimitive {
    name: String,
    path: ScopePath,
    id: ElementId,
}

/// Plans one import run.
pub struct Reconciler<'m, 'r> {
    data_package: &'m ModelElement,
    root: &'m ModelElement,
    root_path: ScopePath,
    types: TypesTarget<'m>,
    policy: ConflictPolicy,
    resolver: Option<&'r mut dyn ConflictResolver>,
    input: &'m ImportSet,
    /// Kinds of every element the input defines, by absolute path.
    defined: HashMap<ScopePath, ElementKind>,
    /// Absolute paths of every element added so far.
    added: HashSet<ScopePath>,
    primitives: Vec<PlannedPrimitive>,
    set: ChangeSet,
}

impl<'m, 'r> Reconciler<'m, 'r> {
    /// Resolves the layer, root and types package of `options` in `model`.
    pub fn new(
        model: &'m Model,
        options: &ImportOptions,
        input: &'m ImportSet,
    ) -> ImportResult<Self> {
        let data_package = model.data_package(options.layer).ok_or_else(|| {
            ImportError::config(format!("model has no {} layer", options.layer.long_name()))
        })?;

        let (root_path, root) = match options.root.as_deref() {
            Some(reference) => find_package(data_package, reference)?,
            None => (ScopePath::root(), data_package),
        };

        let types = match options.types.as_deref() {
            Some(reference) => {
                let (path, package) = find_package(data_package, reference)?;
                TypesTarget::Existing { package, path }
            }
            None => {
                let path = ScopePath::root().child(DATA_TYPES_PACKAGE);
                match data_package.child_by_name(DATA_TYPES_PACKAGE) {
                    Some(package) if package.is_package() => {
                        TypesTarget::Existing { package, path }
                    }
                    Some(other) => {
                        return Err(ImportError::config(format!(
                            "'{DATA_TYPES_PACKAGE}' in the {} data package is a {}, not a package",
                            options.layer,
                            other.kind()
                        )));
                    }
                    None => TypesTarget::Planned {
                        parent: data_package.id,
                        id: ElementId::derived(data_package.id, &path),
                        path,
                    },
                }
            }
        };

        let defined = input
            .defined_kinds()
            .into_iter()
            .map(|(rel, kind)| (root_path.join(&rel), kind))
            .collect();

        debug!(
            "Importing into {} of layer {} ({} policy)",
            root_path, options.layer, options.policy
        );
        Ok(Self {
            data_package,
            root,
            root_path,
            types,
            policy: options.policy,
            resolver: None,
            input,
            defined,
            added: HashSet::new(),
            primitives: Vec::new(),
            set: ChangeSet::new(options.layer, root.id),
        })
    }

    /// Sets the decision provider consulted under [`ConflictPolicy::Ask`].
    pub fn with_resolver(mut self, resolver: &'r mut dyn ConflictResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Plans the import. Fails without side effects on the first parse,
    /// conflict or configuration error.
    pub fn plan(mut self) -> ImportResult<ChangeSet> {
        if self.policy == ConflictPolicy::Ask && self.resolver.is_none() {
            return Err(ImportError::config(
                "the ask policy needs an interactive or scripted conflict resolver",
            ));
        }
        let root = self.root;
        let root_path = self.root_path.clone();
        let input = self.input;
        self.merge_scope(&root_path, Some(root), root.id, &input.elements)?;
        if let Some(description) = &input.root_description {
            if *description != root.description {
                debug!("Updating description of {}", root.name);
                self.set.root_description = Some(description.clone());
            }
        }
        self.finish_types();
        Ok(self.set)
    }

    /// Merges `incoming` into the scope at `scope`.
    ///
    /// `existing` is the element currently at `scope`, or `None` when the
    /// scope is new (or about to lose its children) and nothing can collide.
    fn merge_scope(
        &mut self,
        scope: &ScopePath,
        existing: Option<&'m ModelElement>,
        parent: ElementId,
        incoming: &[DataElement],
    ) -> ImportResult<()> {
        for element in incoming {
            let path = scope.child(&element.name);
            match existing.and_then(|e| e.child_by_name(&element.name)) {
                None => self.add(parent, &path, element)?,
                Some(current)
                    if current.is_package() && element.kind() == ElementKind::Package =>
                {
                    debug!("Merging into existing package {}", path);
                    self.merge_scope(&path, Some(current), current.id, &element.children)?;
                }
                Some(current) => self.collide(&path, current, element)?,
            }
        }
        Ok(())
    }

    fn add(&mut self, parent: ElementId, path: &ScopePath, element: &DataElement) -> ImportResult<()> {
        let id = ElementId::derived(self.data_package.id, path);
        let data = self.resolve_data(path, element)?;
        debug!("{} {} created", element.kind(), path);
        self.set.push(ChangeRecord::Add {
            parent,
            path: path.clone(),
            element: ElementSnapshot {
                id,
                name: element.name.clone(),
                description: element.description.clone(),
                data,
            },
        });
        self.added.insert(path.clone());
        self.merge_scope(path, None, id, &element.children)
    }

    fn collide(
        &mut self,
        path: &ScopePath,
        current: &'m ModelElement,
        element: &DataElement,
    ) -> ImportResult<()> {
        match self.decide(path, current, element) {
            Resolution::Skip | Resolution::SkipAll => {
                info!("{} {} already exists, skipped", current.kind(), path);
                self.set.push(ChangeRecord::Skip {
                    path: path.clone(),
                    id: current.id,
                    kind: current.kind(),
                });
                Ok(())
            }
            Resolution::Replace | Resolution::ReplaceAll => {
                info!("{} {} already exists, replaced", current.kind(), path);
                let data = self.resolve_data(path, element)?;
                self.set.push(ChangeRecord::Replace {
                    path: path.clone(),
                    element: ElementSnapshot {
                        id: current.id,
                        name: element.name.clone(),
                        description: element.description.clone(),
                        data,
                    },
                });
                // A kind change drops the old children, so nothing below can collide.
                let kept = (current.kind() == element.kind()).then_some(current);
                self.merge_scope(path, kept, current.id, &element.children)
            }
            Resolution::Abort => Err(ImportError::Conflict {
                path: path.clone(),
                id: current.id,
                existing: current.kind(),
                incoming: element.kind(),
            }),
        }
    }

    fn decide(
        &mut self,
        path: &ScopePath,
        current: &ModelElement,
        element: &DataElement,
    ) -> Resolution {
        match self.policy {
            ConflictPolicy::Skip => Resolution::Skip,
            ConflictPolicy::Replace => Resolution::Replace,
            ConflictPolicy::Abort => Resolution::Abort,
            ConflictPolicy::Ask => {
                let conflict = Conflict {
                    path,
                    existing: current,
                    incoming: element,
                };
                let answer = match self.resolver.as_mut() {
                    Some(resolver) => resolver.resolve(&conflict),
                    None => Resolution::Abort,
                };
                if let Some(policy) = answer.sticky_policy() {
                    info!("Applying {} to all remaining conflicts", policy);
                    self.policy = policy;
                }
                answer.for_pair()
            }
        }
    }

    fn resolve_data(&mut self, path: &ScopePath, element: &DataElement) -> ImportResult<ElementData> {
        let origin = &element.origin;
        element
            .data
            .clone()
            .try_map_type(|spec| self.resolve_type(spec, path, origin))
    }

    fn resolve_type(
        &mut self,
        spec: TypeSpec,
        property: &ScopePath,
        origin: &Origin,
    ) -> ImportResult<ElementId> {
        match spec {
            TypeSpec::Primitive(name) => self.primitive(&name, origin),
            TypeSpec::Class(name) | TypeSpec::Enumeration(name) => {
                self.reference(&name, property, origin)
            }
        }
    }

    /// Id of the primitive type `name`, planning its creation if needed.
    fn primitive(&mut self, name: &str, origin: &Origin) -> ImportResult<ElementId> {
        let path = self.types.path().child(name);
        let taken = match &self.types {
            TypesTarget::Existing { package, .. } => match package.child_by_name(name) {
                Some(existing) if existing.kind() == ElementKind::PrimitiveType => {
                    return Ok(existing.id);
                }
                Some(existing) => Some(existing.kind()),
                None => None,
            },
            TypesTarget::Planned { .. } => None,
        };
        // The input never defines primitive types itself.
        if let Some(kind) = taken.or_else(|| self.defined.get(&path).copied()) {
            return Err(ImportError::parse(
                origin,
                format!("type '{name}' at {path} is a {kind}, not a primitive type"),
            ));
        }
        if let Some(planned) = self.primitives.iter().find(|p| p.name == name) {
            return Ok(planned.id);
        }
        let id = ElementId::derived(self.data_package.id, &path);
        self.primitives.push(PlannedPrimitive {
            name: name.to_string(),
            path,
            id,
        });
        Ok(id)
    }

    /// Id of the class or enumeration `name` refers to from the property at
    /// `property`.
    fn reference(
        &self,
        name: &QualifiedName,
        property: &ScopePath,
        origin: &Origin,
    ) -> ImportResult<ElementId> {
        let Some(prefix) = name.prefix.as_deref() else {
            // A bare name lives next to the class that owns the property.
            let scope = property
                .parent()
                .and_then(|class| class.parent())
                .unwrap_or_else(ScopePath::root);
            return self
                .type_at(&scope.child(&name.name), name, origin)?
                .ok_or_else(|| {
                    ImportError::parse(
                        origin,
                        format!("unresolved type reference '{name}' in {scope}"),
                    )
                });
        };

        if self.input.shared_prefixes.contains(prefix) {
            return Err(ImportError::parse(
                origin,
                format!(
                    "ambiguous type reference '{name}', prefix '{prefix}' belongs to more than one package"
                ),
            ));
        }
        if let Some(rel) = self.input.prefixes.get(prefix) {
            let path = self.root_path.join(rel).child(&name.name);
            if let Some(id) = self.type_at(&path, name, origin)? {
                return Ok(id);
            }
        }

        // Exported files qualify names with the owning package's id.
        if let Ok(id) = ElementId::parse(prefix) {
            if let Some(found) = self
                .data_package
                .find(id)
                .filter(|pkg| pkg.is_package())
                .and_then(|pkg| pkg.child_by_name(&name.name))
            {
                referable(found.kind(), name, origin)?;
                return Ok(found.id);
            }
        }

        // Not part of this import: look for a package of that name in the layer.
        let candidates: Vec<&ModelElement> = self
            .data_package
            .descendants()
            .into_iter()
            .filter(|(_, e)| e.is_package() && e.name == prefix)
            .filter_map(|(_, pkg)| pkg.child_by_name(&name.name))
            .filter(|e| e.kind().is_classifier())
            .collect();
        match candidates.as_slice() {
            [found] => Ok(found.id),
            [] => Err(ImportError::parse(
                origin,
                format!("unresolved type reference '{name}'"),
            )),
            _ => Err(ImportError::parse(
                origin,
                format!("ambiguous type reference '{name}'"),
            )),
        }
    }

    /// Id of the class or enumeration at `path`, in the model or in the input.
    fn type_at(
        &self,
        path: &ScopePath,
        name: &QualifiedName,
        origin: &Origin,
    ) -> ImportResult<Option<ElementId>> {
        if let Some(found) = self.data_package.resolve(path) {
            referable(found.kind(), name, origin)?;
            return Ok(Some(found.id));
        }
        match self.defined.get(path) {
            Some(kind) => {
                referable(*kind, name, origin)?;
                Ok(Some(ElementId::derived(self.data_package.id, path)))
            }
            None => Ok(None),
        }
    }

    /// Plans the types package and the primitive types the import needs.
    fn finish_types(&mut self) {
        if self.primitives.is_empty() {
            return;
        }
        let parent = match &self.types {
            TypesTarget::Existing { package, .. } => package.id,
            TypesTarget::Planned { parent, path, id } => {
                if !self.added.contains(path) {
                    debug!("package {} created", path);
                    self.set.push(ChangeRecord::Add {
                        parent: *parent,
                        path: path.clone(),
                        element: ElementSnapshot {
                            id: *id,
                            name: DATA_TYPES_PACKAGE.to_string(),
                            description: String::new(),
                            data: ElementData::Package,
                        },
                    });
                }
                *id
            }
        };
        for primitive in std::mem::take(&mut self.primitives) {
            let kind = PrimitiveKind::for_type_name(&primitive.name);
            debug!("primitive type {} created as {:?}", primitive.path, kind);
            self.set.push(ChangeRecord::Add {
                parent,
                path: primitive.path,
                element: ElementSnapshot {
                    id: primitive.id,
                    name: primitive.name,
                    description: String::new(),
                    data: ElementData::PrimitiveType { primitive: kind },
                },
            });
        }
    }
}

fn referable(kind: ElementKind, name: &QualifiedName, origin: &Origin) -> ImportResult<()> {
    if kind.is_classifier() {
        Ok(())
    } else {
        Err(ImportError::parse(
            origin,
            format!("type reference '{name}' names a {kind}, not a class or enumeration"),
        ))
    }
}
