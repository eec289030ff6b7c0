//! # Chain
//!
//! One traversal step: the edge taken, the value it reached, and a link back
//! to the chain of the source object.
//!
//! Chains are immutable. Siblings share their parent through an `Rc`, so a
//! chain lives exactly as long as some pending work or visitor keeps it.

use crate::enumerator::{Edge, Step};
use crate::{DeclaredType, SharedKind, Value};
use std::fmt;
use std::rc::Rc;

/// A path from the root of an exploration to one reached value.
#[derive(Debug, Clone)]
pub struct Chain<R> {
    parent: Option<Rc<Chain<R>>>,
    step: Step,
    declared: DeclaredType,
    value: Value<R>,
    shared: Option<SharedKind>,
    depth: usize,
}

impl<R> Chain<R> {
    /// The synthetic root chain. It has no incoming edge.
    #[must_use]
    pub fn root(value: Value<R>, declared: DeclaredType, shared: Option<SharedKind>) -> Self {
        Self {
            parent: None,
            step: Step::Root,
            declared,
            value,
            shared,
            depth: 0,
        }
    }

    /// Extend `parent` by one edge.
    #[must_use]
    pub fn append(parent: &Rc<Self>, edge: Edge<R>) -> Self {
        Self {
            parent: Some(Rc::clone(parent)),
            step: edge.step,
            declared: edge.declared,
            value: edge.value,
            shared: edge.shared,
            depth: parent.depth.saturating_add(1),
        }
    }

    /// The reached value.
    #[must_use]
    pub fn value(&self) -> &Value<R> {
        &self.value
    }

    /// Static type of the edge into the value.
    #[must_use]
    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared
    }

    /// Classified by the declared type, never by the runtime value.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.declared.is_primitive()
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.shared.is_some()
    }

    /// Shared and left out of every count.
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        self.shared.is_some_and(SharedKind::is_excluded)
    }

    #[must_use]
    pub fn shared_kind(&self) -> Option<SharedKind> {
        self.shared
    }

    /// Chain of the object owning the edge; `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<&Chain<R>> {
        self.parent.as_deref()
    }

    /// Number of edges between the root and this value.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn step(&self) -> &Step {
        &self.step
    }

    #[must_use]
    pub fn is_through_field(&self) -> bool {
        matches!(self.step, Step::Field(_))
    }

    #[must_use]
    pub fn is_through_index(&self) -> bool {
        matches!(self.step, Step::Index(_))
    }

    /// Name of the field this chain went through, if any.
    #[must_use]
    pub fn field_name(&self) -> Option<&str> {
        match &self.step {
            Step::Field(name) => Some(&**name),
            _ => None,
        }
    }

    /// Array index this chain went through, if any.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self.step {
            Step::Index(index) => Some(index),
            _ => None,
        }
    }

    /// The root chain of this path.
    #[must_use]
    pub fn root_chain(&self) -> &Chain<R> {
        let mut current = self;
        while let Some(parent) = current.parent.as_deref() {
            current = parent;
        }
        current
    }

    /// Render the path, e.g. `root.items[2].next`.
    #[must_use]
    pub fn path(&self) -> String {
        let mut steps = Vec::with_capacity(self.depth.saturating_add(1));
        let mut current = Some(self);
        while let Some(chain) = current {
            steps.push(&chain.step);
            current = chain.parent.as_deref();
        }
        steps.iter().rev().map(|step| step.to_string()).collect()
    }
}

// Unlink parents iteratively; a recursive drop of a long path would exhaust
// the stack the explorer avoids using.
impl<R> Drop for Chain<R> {
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(rc) = parent {
            match Rc::try_unwrap(rc) {
                Ok(mut chain) => parent = chain.parent.take(),
                Err(_) => break,
            }
        }
    }
}

impl<R> fmt::Display for Chain<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// =============================================================================
// TESTS
// =============================================================================
