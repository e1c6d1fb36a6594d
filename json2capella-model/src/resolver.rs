use crate::{DataElement, ModelElement, Resolution};
use json2capella_types::ScopePath;
use std::collections::VecDeque;

/// A name collision awaiting a decision.
#[derive(Debug, Clone, Copy)]
pub struct Conflict<'a> {
    /// Scope path of the colliding name.
    pub path: &'a ScopePath,
    pub existing: &'a ModelElement,
    pub incoming: &'a DataElement,
}

/// Decides collisions under [`ConflictPolicy::Ask`](crate::ConflictPolicy::Ask).
///
/// The reconciler calls `resolve` once per colliding pair and blocks until it
/// returns. Interactive front ends prompt the user; batch runs use a
/// [`ScriptedResolver`] or a closure.
pub trait ConflictResolver {
    fn resolve(&mut self, conflict: &Conflict<'_>) -> Resolution;
}

impl<F> ConflictResolver for F
where
    F: FnMut(&Conflict<'_>) -> Resolution,
{
    fn resolve(&mut self, conflict: &Conflict<'_>) -> Resolution {
        self(conflict)
    }
}

/// Answers collisions from a fixed list, then falls back to a default.
#[derive(Debug, Clone)]
pub struct ScriptedResolver {
    answers: VecDeque<Resolution>,
    fallback: Resolution,
    asked: Vec<ScopePath>,
}

impl ScriptedResolver {
    pub fn new(answers: impl IntoIterator<Item = Resolution>, fallback: Resolution) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            fallback,
            asked: Vec::new(),
        }
    }

    /// Always gives the same answer.
    pub fn always(answer: Resolution) -> Self {
        Self::new([], answer)
    }

    /// Paths of every collision this resolver was asked about, in order.
    pub fn asked(&self) -> &[ScopePath] {
        &self.asked
    }
}

impl ConflictResolver for ScriptedResolver {
    fn resolve(&mut self, conflict: &Conflict<'_>) -> Resolution {
        self.asked.push(conflict.path.clone());
        self.answers.pop_front().unwrap_or(self.fallback)
    }
}
