//! # Field Enumeration
//!
//! The capability the exploration engine consumes to look inside objects.
//!
//! The engine has no notion of fields on its own. Whatever owns the object
//! model (the in-crate [`crate::Heap`], the [`crate::native`] adapter, or a
//! caller's own registry) implements [`FieldEnumerator`] and hands back one
//! [`Edge`] per outgoing slot.

use crate::{DeclaredType, SharedKind, TypeName, Value};
use std::borrow::Cow;
use std::fmt;

// =============================================================================
// EDGE
// =============================================================================

/// How an edge leaves its source object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    /// The synthetic step into the root; no incoming edge exists.
    Root,
    /// A named field.
    Field(Cow<'static, str>),
    /// An array element.
    Index(usize),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Root => f.write_str("root"),
            Step::Field(name) => write!(f, ".{}", name),
            Step::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// One outgoing slot of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<R> {
    /// How the slot is reached.
    pub step: Step,
    /// Static type of the slot.
    pub declared: DeclaredType,
    /// Current content of the slot.
    pub value: Value<R>,
    /// Set when the slot belongs to shared infrastructure.
    pub shared: Option<SharedKind>,
}

impl<R> Edge<R> {
    /// An instance field.
    #[must_use]
    pub fn field(
        name: impl Into<Cow<'static, str>>,
        declared: DeclaredType,
        value: Value<R>,
    ) -> Self {
        Self {
            step: Step::Field(name.into()),
            declared,
            value,
            shared: None,
        }
    }

    /// An array element.
    #[must_use]
    pub fn index(index: usize, declared: DeclaredType, value: Value<R>) -> Self {
        Self {
            step: Step::Index(index),
            declared,
            value,
            shared: None,
        }
    }

    /// Mark the edge as shared infrastructure.
    #[must_use]
    pub fn shared_as(mut self, kind: SharedKind) -> Self {
        self.shared = Some(kind);
        self
    }
}

// =============================================================================
// FIELD ENUMERATOR TRAIT
// =============================================================================

/// Enumerates the outgoing edges of objects in some object model.
///
/// Implementations must:
/// - yield every instance-level edge reachable by normal field access
/// - flag edges into static slots, type descriptors and enum constants
/// - return an empty list for handles they cannot resolve
///
/// The enumeration order is the implementation's contract; footprints do not
/// depend on it.
pub trait FieldEnumerator {
    /// Object handle. Identity of the handle is object identity.
    type Ref: Copy + Ord + fmt::Debug;

    /// Runtime type of an object, used as the declared type of a root.
    fn runtime_type(&self, object: Self::Ref) -> TypeName;

    /// Whether the object itself is shared infrastructure.
    fn shared_kind(&self, _object: Self::Ref) -> Option<SharedKind> {
        None
    }

    /// Outgoing edges of an object.
    fn edges(&self, object: Self::Ref) -> Vec<Edge<Self::Ref>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ObjectId, PrimitiveKind, PrimitiveValue};

    #[test]
    fn step_rendering() {
        assert_eq!(Step::Root.to_string(), "root");
        assert_eq!(Step::Field("next".into()).to_string(), ".next");
        assert_eq!(Step::Index(4).to_string(), "[4]");
    }

    #[test]
    fn edge_builders() {
        let edge: Edge<ObjectId> = Edge::field(
            "count",
            PrimitiveKind::Int.into(),
            Value::Primitive(PrimitiveValue::Int(1)),
        );
        assert_eq!(edge.step, Step::Field("count".into()));
        assert_eq!(edge.shared, None);

        let edge: Edge<ObjectId> =
            Edge::index(0, DeclaredType::reference("Type"), Value::Object(ObjectId(1)))
                .shared_as(SharedKind::TypeDescriptor);
        assert_eq!(edge.step, Step::Index(0));
        assert_eq!(edge.shared, Some(SharedKind::TypeDescriptor));
    }
}
