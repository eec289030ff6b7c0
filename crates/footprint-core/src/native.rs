//! # Native Values
//!
//! Measuring ordinary Rust values. Types describe their own fields by
//! implementing [`Traverse`]; [`NativeEnumerator`] turns that description into
//! edges.
//!
//! Object identity is the value's address paired with its type name, so a
//! value shared through `Rc`/`Arc` or plain references is one object while two
//! equal values are two. A struct and its first field share an address but not
//! a type, and stay distinct. Zero-sized values of one type are
//! indistinguishable and count once.
//!
//! Cycles need shared references (`Cell`/`OnceCell` of `&T`); for graphs built
//! at runtime, prefer [`crate::Heap`].

use crate::enumerator::{Edge, FieldEnumerator};
use crate::measurer::measure;
use crate::{DeclaredType, Footprint, FootprintError, PrimitiveValue, SharedKind, TypeName, Value};
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

// =============================================================================
// TRAVERSE TRAIT
// =============================================================================

/// A value that can list its outgoing edges.
pub trait Traverse {
    /// Runtime type name.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Whether this value is shared infrastructure (an enum-like singleton,
    /// a global table).
    fn shared_kind(&self) -> Option<SharedKind> {
        None
    }

    /// Describe every field.
    fn fields<'a>(&'a self, fields: &mut Fields<'a>);
}

impl<T: Traverse> Traverse for Vec<T> {
    fn fields<'a>(&'a self, fields: &mut Fields<'a>) {
        fields.items(self.as_slice());
    }
}

/// One `byte` per UTF-8 byte.
impl Traverse for String {
    fn fields<'a>(&'a self, fields: &mut Fields<'a>) {
        fields.primitive_items(self.as_bytes());
    }
}

// =============================================================================
// HANDLES
// =============================================================================

/// Identity handle of a native value.
#[derive(Clone, Copy)]
pub struct NativeRef<'a>(&'a dyn Traverse);

impl<'a> NativeRef<'a> {
    #[must_use]
    pub fn new(target: &'a dyn Traverse) -> Self {
        Self(target)
    }

    /// The referenced value.
    #[must_use]
    pub fn get(&self) -> &'a dyn Traverse {
        self.0
    }

    fn address(&self) -> usize {
        std::ptr::from_ref(self.0).cast::<()>() as usize
    }

    fn key(&self) -> (usize, &'static str) {
        (self.address(), self.0.type_name())
    }
}

impl PartialEq for NativeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for NativeRef<'_> {}

impl PartialOrd for NativeRef<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NativeRef<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Debug for NativeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:#x}", self.0.type_name(), self.address())
    }
}

// =============================================================================
// FIELD BUILDER
// =============================================================================

/// Collects the edges a [`Traverse`] implementation describes.
pub struct Fields<'a> {
    edges: Vec<Edge<NativeRef<'a>>>,
}

impl<'a> Fields<'a> {
    fn new() -> Self {
        Self { edges: Vec::new() }
    }

    /// An inline primitive field.
    pub fn primitive(&mut self, name: &'static str, value: impl Into<PrimitiveValue>) -> &mut Self {
        let value = value.into();
        self.edges.push(Edge::field(
            name,
            DeclaredType::Primitive(value.kind()),
            Value::Primitive(value),
        ));
        self
    }

    /// A reference field.
    pub fn reference<T: Traverse>(&mut self, name: &'static str, target: &'a T) -> &mut Self {
        self.dyn_reference(name, target)
    }

    /// A reference field holding a trait object.
    pub fn dyn_reference(&mut self, name: &'static str, target: &'a dyn Traverse) -> &mut Self {
        let mut edge = Edge::field(
            name,
            DeclaredType::reference(target.type_name()),
            Value::Object(NativeRef(target)),
        );
        edge.shared = target.shared_kind();
        self.edges.push(edge);
        self
    }

    /// A nullable reference field.
    pub fn optional<T: Traverse>(&mut self, name: &'static str, target: Option<&'a T>) -> &mut Self {
        let mut edge = Edge::field(
            name,
            DeclaredType::reference(std::any::type_name::<T>()),
            target
                .map(|target| NativeRef(target as &dyn Traverse))
                .into(),
        );
        edge.shared = target.and_then(Traverse::shared_kind);
        self.edges.push(edge);
        self
    }

    /// A reference into shared infrastructure (a global table, a type
    /// descriptor, a static).
    pub fn shared<T: Traverse>(
        &mut self,
        name: &'static str,
        target: &'a T,
        kind: SharedKind,
    ) -> &mut Self {
        self.edges.push(
            Edge::field(
                name,
                DeclaredType::reference(target.type_name()),
                Value::Object(NativeRef(target)),
            )
            .shared_as(kind),
        );
        self
    }

    /// Elements of a slice, one reference each.
    pub fn items<T: Traverse>(&mut self, items: &'a [T]) -> &mut Self {
        for (index, item) in items.iter().enumerate() {
            let mut edge = Edge::index(
                index,
                DeclaredType::reference(std::any::type_name::<T>()),
                Value::Object(NativeRef(item)),
            );
            edge.shared = item.shared_kind();
            self.edges.push(edge);
        }
        self
    }

    /// Elements of a primitive slice.
    pub fn primitive_items<P>(&mut self, items: &[P]) -> &mut Self
    where
        P: Copy + Into<PrimitiveValue>,
    {
        for (index, item) in items.iter().enumerate() {
            let value: PrimitiveValue = (*item).into();
            self.edges.push(Edge::index(
                index,
                DeclaredType::Primitive(value.kind()),
                Value::Primitive(value),
            ));
        }
        self
    }
}

// =============================================================================
// ENUMERATOR
// =============================================================================

/// Field enumerator over [`Traverse`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeEnumerator<'a>(PhantomData<&'a ()>);

impl NativeEnumerator<'_> {
    #[must_use]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<'a> FieldEnumerator for NativeEnumerator<'a> {
    type Ref = NativeRef<'a>;

    fn runtime_type(&self, object: NativeRef<'a>) -> TypeName {
        TypeName::new(object.0.type_name())
    }

    fn shared_kind(&self, object: NativeRef<'a>) -> Option<SharedKind> {
        object.0.shared_kind()
    }

    fn edges(&self, object: NativeRef<'a>) -> Vec<Edge<NativeRef<'a>>> {
        let mut fields = Fields::new();
        object.0.fields(&mut fields);
        if object.0.shared_kind() == Some(SharedKind::EnumConstant) {
            for edge in &mut fields.edges {
                edge.shared = Some(SharedKind::EnumField);
            }
        }
        fields.edges
    }
}

/// Measure the footprint of a native value.
pub fn measure_native<T: Traverse>(root: &T) -> Result<Footprint, FootprintError> {
    let enumerator = NativeEnumerator::new();
    measure(&enumerator, Value::Object(NativeRef::new(root)))
}

// =============================================================================
// TESTS
// =============================================================================
