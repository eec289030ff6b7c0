//! # Predicate Pipeline
//!
//! Decides which reached objects belong to the measured graph.
//!
//! The pipeline is a fixed AND of three checks, evaluated left to right with
//! short-circuit:
//! 1. [`not_shared`]: static slots, type descriptors and enum constants are
//!    shared infrastructure
//! 2. the caller's acceptor over the reached value (never asked about the root)
//! 3. [`AtMostOnce`]: identity-keyed cycle guard
//!
//! The guard runs last so that objects rejected by the first two checks never
//! enter its seen-set.

use crate::{Chain, Value};
use std::collections::BTreeSet;

/// Rejects chains into shared infrastructure.
#[must_use]
pub fn not_shared<R>(chain: &Chain<R>) -> bool {
    !chain.is_shared()
}

/// The default acceptor.
#[must_use]
pub fn always_accept<R>(_value: &Value<R>) -> bool {
    true
}

// =============================================================================
// CYCLE GUARD
// =============================================================================

/// Accepts each object identity the first time it is seen, and never again.
///
/// Identity is the enumerator's handle, so two distinct objects with equal
/// contents are both accepted while one object reached twice is accepted
/// once. Values without identity (boxed primitives) are always accepted.
#[derive(Debug, Clone)]
pub struct AtMostOnce<R> {
    seen: BTreeSet<R>,
}

impl<R: Ord + Copy> AtMostOnce<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            seen: BTreeSet::new(),
        }
    }

    /// Test the chain's value, recording its identity.
    pub fn apply(&mut self, chain: &Chain<R>) -> bool {
        match chain.value() {
            Value::Object(handle) => self.seen.insert(*handle),
            Value::Primitive(_) | Value::Null => true,
        }
    }

    /// Number of identities recorded so far.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

impl<R: Ord + Copy> Default for AtMostOnce<R> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// PIPELINE
// =============================================================================

/// The composed acceptance test for one measurement.
pub struct Pipeline<R, F> {
    acceptor: F,
    guard: AtMostOnce<R>,
}

impl<R, F> Pipeline<R, F>
where
    R: Ord + Copy,
    F: Fn(&Value<R>) -> bool,
{
    /// A pipeline with a fresh cycle guard.
    #[must_use]
    pub fn new(acceptor: F) -> Self {
        Self {
            acceptor,
            guard: AtMostOnce::new(),
        }
    }

    /// Whether the chain's value should be counted and explored.
    ///
    /// Callers pass only non-null, non-primitive chains.
    pub fn accept(&mut self, chain: &Chain<R>) -> bool {
        not_shared(chain)
            && (chain.is_root() || (self.acceptor)(chain.value()))
            && self.guard.apply(chain)
    }

    /// The embedded cycle guard.
    #[must_use]
    pub fn guard(&self) -> &AtMostOnce<R> {
        &self.guard
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerator::Edge;
    use crate::{DeclaredType, ObjectId, PrimitiveValue, SharedKind};
    use std::rc::Rc;

    fn root(id: u64) -> Rc<Chain<ObjectId>> {
        Rc::new(Chain::root(
            Value::Object(ObjectId(id)),
            DeclaredType::reference("Node"),
            None,
        ))
    }

    fn child(parent: &Rc<Chain<ObjectId>>, id: u64) -> Chain<ObjectId> {
        Chain::append(
            parent,
            Edge::field("next", DeclaredType::reference("Node"), Value::Object(ObjectId(id))),
        )
    }

    #[test]
    fn guard_accepts_identity_once() {
        let parent = root(0);
        let mut guard = AtMostOnce::new();

        assert!(guard.apply(&child(&parent, 1)));
        assert!(!guard.apply(&child(&parent, 1)));
        assert!(guard.apply(&child(&parent, 2)));
        assert_eq!(guard.seen_count(), 2);
    }

    #[test]
    fn guard_accepts_boxed_values_every_time() {
        let parent = root(0);
        let boxed = Chain::append(
            &parent,
            Edge::field(
                "any",
                DeclaredType::reference("boxed int"),
                Value::Primitive(PrimitiveValue::Int(4)),
            ),
        );
        let mut guard = AtMostOnce::new();
        assert!(guard.apply(&boxed));
        assert!(guard.apply(&boxed));
        assert_eq!(guard.seen_count(), 0);
    }

    #[test]
    fn shared_chains_are_rejected() {
        let parent = root(0);
        let shared = Chain::append(
            &parent,
            Edge::field("type", DeclaredType::reference("Type"), Value::Object(ObjectId(9)))
                .shared_as(SharedKind::TypeDescriptor),
        );
        assert!(!not_shared(&shared));

        let mut pipeline = Pipeline::new(always_accept);
        assert!(!pipeline.accept(&shared));
        assert_eq!(pipeline.guard().seen_count(), 0);
    }

    #[test]
    fn acceptor_rejection_does_not_pollute_guard() {
        let parent = root(0);
        let mut pipeline = Pipeline::new(|_: &Value<ObjectId>| false);

        assert!(!pipeline.accept(&child(&parent, 1)));
        assert_eq!(pipeline.guard().seen_count(), 0);
    }

    #[test]
    fn acceptor_is_not_asked_about_the_root() {
        let mut pipeline = Pipeline::new(|_: &Value<ObjectId>| false);
        assert!(pipeline.accept(&root(0)));
        assert!(!pipeline.accept(&root(0)));
    }
}
