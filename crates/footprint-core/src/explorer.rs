//! # Exploration Engine
//!
//! Drives a depth-first walk over an object graph, handing every step to an
//! [`ObjectVisitor`].
//!
//! The walk uses an explicit work stack instead of recursion, so graph depth
//! is limited by heap memory rather than by the call stack. The engine itself
//! keeps no state between calls.

use crate::enumerator::{Edge, FieldEnumerator};
use crate::traversal::{Feature, Features, Traversal};
use crate::{Chain, DeclaredType, SharedKind, TypeName, Value};
use std::rc::Rc;

/// Initial capacity of the work stack.
const INITIAL_STACK_CAPACITY: usize = 32;

/// Field name of the single primitive slot inside a boxed value.
pub const BOXED_VALUE_FIELD: &str = "value";

/// Type name given to a null root.
pub const NULL_TYPE_NAME: &str = "null";

// =============================================================================
// VISITOR TRAIT
// =============================================================================

/// Observes the chains of an exploration and produces a result.
pub trait ObjectVisitor<R> {
    /// What the visitor produces once the walk is over.
    type Output;

    /// Observe one chain. The decision is honoured only for chains that can
    /// have outgoing edges; primitive and null chains are leaves.
    fn visit(&mut self, chain: &Chain<R>) -> Traversal;

    /// Consume the visitor after the walk.
    fn result(self) -> Self::Output;
}

// =============================================================================
// ENGINE
// =============================================================================

/// The traversal driver.
pub struct ObjectExplorer;

impl ObjectExplorer {
    /// Walk the graph reachable from `root`.
    ///
    /// The root chain is always visited. Every other chain is classified
    /// before dispatch: primitives reach the visitor only with
    /// [`Feature::VisitPrimitives`], nulls only with [`Feature::VisitNull`],
    /// and both are visited on the spot. Remaining chains are pushed on the
    /// work stack and visited in enumeration order; each one the visitor
    /// answers [`Traversal::Explore`] for has its own edges enumerated.
    pub fn explore<E, V>(
        enumerator: &E,
        root: Value<E::Ref>,
        mut visitor: V,
        features: &Features,
    ) -> V::Output
    where
        E: FieldEnumerator,
        V: ObjectVisitor<E::Ref>,
    {
        let visit_primitives = features.contains(Feature::VisitPrimitives);
        let visit_null = features.contains(Feature::VisitNull);

        let mut stack: Vec<Rc<Chain<E::Ref>>> = Vec::with_capacity(INITIAL_STACK_CAPACITY);
        stack.push(Rc::new(Self::root_chain(enumerator, root)));

        let mut visited: usize = 0;
        while let Some(chain) = stack.pop() {
            visited = visited.saturating_add(1);
            if visitor.visit(&chain) == Traversal::Skip {
                continue;
            }

            let edges = match chain.value() {
                Value::Object(handle) => enumerator.edges(*handle),
                Value::Primitive(value) => vec![Edge::field(
                    BOXED_VALUE_FIELD,
                    DeclaredType::Primitive(value.kind()),
                    Value::Primitive(*value),
                )],
                Value::Null => continue,
            };

            let mut pending = Vec::new();
            for edge in edges {
                let child = Chain::append(&chain, edge);
                if child.is_primitive() {
                    if visit_primitives {
                        visited = visited.saturating_add(1);
                        visitor.visit(&child);
                    }
                    continue;
                }
                if child.is_null() {
                    if visit_null {
                        visited = visited.saturating_add(1);
                        visitor.visit(&child);
                    }
                    continue;
                }
                pending.push(Rc::new(child));
            }
            // Reversed so the first edge is popped first.
            stack.extend(pending.into_iter().rev());
        }

        tracing::trace!(chains = visited, "exploration finished");
        visitor.result()
    }

    /// The synthetic root chain. The root is reached through a reference of
    /// its own runtime type, so a primitive root is a boxed value.
    ///
    /// An enum constant is shared only as the target of a field; as the root
    /// it has no owner and is measured like any other object.
    fn root_chain<E: FieldEnumerator>(enumerator: &E, root: Value<E::Ref>) -> Chain<E::Ref> {
        match root {
            Value::Object(handle) => Chain::root(
                root,
                DeclaredType::Reference(enumerator.runtime_type(handle)),
                enumerator
                    .shared_kind(handle)
                    .filter(|kind| *kind != SharedKind::EnumConstant),
            ),
            Value::Primitive(value) => Chain::root(
                root,
                DeclaredType::reference(value.kind().boxed_name()),
                None,
            ),
            Value::Null => Chain::root(
                root,
                DeclaredType::Reference(TypeName::new(NULL_TYPE_NAME)),
                None,
            ),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
