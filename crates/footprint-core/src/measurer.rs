//! # Object Graph Measurer
//!
//! Measures the footprint of the graph reachable from a root: every object
//! reached through instance edges, excluding shared infrastructure (static
//! slots, type descriptors, enum constants) and anything the caller's
//! acceptor rejects.

use crate::enumerator::FieldEnumerator;
use crate::explorer::{ObjectExplorer, ObjectVisitor};
use crate::predicate::{Pipeline, always_accept};
use crate::traversal::{Features, Traversal};
use crate::{Chain, DeclaredType, Footprint, FootprintError, Value};
use std::collections::BTreeMap;

/// Reference counter start: the root is visited once but has no incoming
/// reference.
const REFERENCE_BIAS: i64 = -1;

// =============================================================================
// ACCUMULATOR
// =============================================================================

/// Visitor that tallies objects, references and primitives.
pub struct ObjectGraphVisitor<R, F> {
    pipeline: Pipeline<R, F>,
    objects: i64,
    references: i64,
    primitives: BTreeMap<DeclaredType, i64>,
}

impl<R, F> ObjectGraphVisitor<R, F>
where
    R: Ord + Copy,
    F: Fn(&Value<R>) -> bool,
{
    #[must_use]
    pub fn new(pipeline: Pipeline<R, F>) -> Self {
        Self {
            pipeline,
            objects: 0,
            references: REFERENCE_BIAS,
            primitives: BTreeMap::new(),
        }
    }
}

impl<R, F> ObjectVisitor<R> for ObjectGraphVisitor<R, F>
where
    R: Ord + Copy,
    F: Fn(&Value<R>) -> bool,
{
    type Output = Result<Footprint, FootprintError>;

    fn visit(&mut self, chain: &Chain<R>) -> Traversal {
        // Shared infrastructure is not part of this graph at all. Fields of
        // an enum constant are counted below; the pipeline stops them there.
        if !chain.is_root() && chain.is_excluded() {
            return Traversal::Skip;
        }
        if chain.is_primitive() {
            let count = self
                .primitives
                .entry(chain.declared_type().clone())
                .or_insert(0);
            *count = count.saturating_add(1);
            return Traversal::Skip;
        }

        self.references = self.references.saturating_add(1);
        if !chain.is_null() && self.pipeline.accept(chain) {
            self.objects = self.objects.saturating_add(1);
            return Traversal::Explore;
        }
        Traversal::Skip
    }

    /// Only meaningful once the exploration has finished.
    fn result(self) -> Self::Output {
        Footprint::new(self.objects, self.references, self.primitives)
    }
}

// =============================================================================
// MEASURER
// =============================================================================

/// Measures object graphs of one object model.
pub struct ObjectGraphMeasurer<'e, E> {
    enumerator: &'e E,
}

impl<'e, E: FieldEnumerator> ObjectGraphMeasurer<'e, E> {
    #[must_use]
    pub fn new(enumerator: &'e E) -> Self {
        Self { enumerator }
    }

    /// Measure the graph reachable from `root`, accepting every object.
    pub fn measure(&self, root: Value<E::Ref>) -> Result<Footprint, FootprintError> {
        self.measure_with(root, Some(always_accept::<E::Ref>))
    }

    /// Measure the graph reachable from `root`, exploring only objects the
    /// acceptor returns `true` for. The root itself is always counted.
    ///
    /// Returns `FootprintError::InvalidArgument` when no acceptor is given;
    /// nothing is traversed in that case.
    pub fn measure_with<F>(
        &self,
        root: Value<E::Ref>,
        acceptor: Option<F>,
    ) -> Result<Footprint, FootprintError>
    where
        F: Fn(&Value<E::Ref>) -> bool,
    {
        let acceptor = acceptor
            .ok_or_else(|| FootprintError::InvalidArgument("predicate".to_string()))?;

        tracing::debug!(root = ?root, "measuring object graph");
        let visitor = ObjectGraphVisitor::new(Pipeline::new(acceptor));
        let footprint = ObjectExplorer::explore(self.enumerator, root, visitor, &Features::all())?;
        tracing::debug!(
            objects = footprint.objects(),
            references = footprint.references(),
            primitives = footprint.total_primitives(),
            "measurement finished"
        );
        Ok(footprint)
    }
}

/// Measure the graph reachable from `root` with every object accepted.
pub fn measure<E: FieldEnumerator>(
    enumerator: &E,
    root: Value<E::Ref>,
) -> Result<Footprint, FootprintError> {
    ObjectGraphMeasurer::new(enumerator).measure(root)
}

// =============================================================================
// TESTS
// =============================================================================
