//! The two import modes on top of the reconciler.

use crate::{ChangeApplicator, ImportOptions, ImportResult, ImportSet, Reconciler};
use json2capella_model::{ChangeSet, ChangeSummary, ConflictResolver, Model};
use tracing::info;

/// Imports parsed definitions into a model, or plans the import as a change set.
#[derive(Debug, Clone)]
pub struct Importer {
    options: ImportOptions,
}

impl Importer {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Diff mode: reconciles `input` against `model` without changing it.
    pub fn plan(
        &self,
        model: &Model,
        input: &ImportSet,
        resolver: Option<&mut dyn ConflictResolver>,
    ) -> ImportResult<ChangeSet> {
        let mut reconciler = Reconciler::new(model, &self.options, input)?;
        if let Some(resolver) = resolver {
            reconciler = reconciler.with_resolver(resolver);
        }
        let set = reconciler.plan()?;
        info!(
            "Planned {} changes from {} elements: {}",
            set.len(),
            input.element_count(),
            set.summary()
        );
        Ok(set)
    }

    /// Direct-write mode: plans the import and applies it to `model`.
    ///
    /// On error the model is unchanged.
    pub fn import(
        &self,
        model: &mut Model,
        input: &ImportSet,
        resolver: Option<&mut dyn ConflictResolver>,
    ) -> ImportResult<ChangeSummary> {
        let set = self.plan(model, input, resolver)?;
        ChangeApplicator::new().apply(model, &set)
    }
}
