//! # Core Type Definitions
//!
//! This module contains the vocabulary shared by every part of the engine:
//! - Heap identifiers (`ObjectId`, `ClassId`)
//! - Primitive classification (`PrimitiveKind`, `PrimitiveValue`)
//! - Edge typing (`TypeName`, `DeclaredType`, `SharedKind`)
//! - Reached values (`Value`)
//! - Error types (`FootprintError`)
//!
//! ## Determinism Guarantees
//!
//! Every identifier implements `Ord` so that seen-sets and tallies can live in
//! `BTreeSet`/`BTreeMap`. No `HashMap` is used anywhere in the engine.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// HEAP IDENTIFIERS
// =============================================================================

/// Stable handle of an object allocated in a [`crate::Heap`].
/// Object identity for cycle detection is this handle, never the contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// Handle of a type registered in a [`crate::Heap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClassId(pub u64);

// =============================================================================
// PRIMITIVES
// =============================================================================

/// The closed set of primitive kinds a footprint may tally.
///
/// Declaration order is the rendering order of a footprint's tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Float,
    Long,
    Double,
}

impl PrimitiveKind {
    /// Every primitive kind, in tally order.
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Char,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Float,
        PrimitiveKind::Long,
        PrimitiveKind::Double,
    ];

    /// Lowercase tag of this kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Double => "double",
        }
    }

    /// Type name of a boxed value of this kind.
    #[must_use]
    pub fn boxed_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boxed boolean",
            PrimitiveKind::Byte => "boxed byte",
            PrimitiveKind::Char => "boxed char",
            PrimitiveKind::Short => "boxed short",
            PrimitiveKind::Int => "boxed int",
            PrimitiveKind::Float => "boxed float",
            PrimitiveKind::Long => "boxed long",
            PrimitiveKind::Double => "boxed double",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrimitiveKind {
    type Err = FootprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| FootprintError::TypeMismatch(format!("'{}' is not a primitive", s)))
    }
}

/// A primitive leaf value.
///
/// Only the kind matters to a footprint; the payload is carried so that
/// enumerators can hand over real field contents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PrimitiveValue {
    Boolean(bool),
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
}

impl PrimitiveValue {
    /// The kind of this value.
    #[must_use]
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            PrimitiveValue::Boolean(_) => PrimitiveKind::Boolean,
            PrimitiveValue::Byte(_) => PrimitiveKind::Byte,
            PrimitiveValue::Char(_) => PrimitiveKind::Char,
            PrimitiveValue::Short(_) => PrimitiveKind::Short,
            PrimitiveValue::Int(_) => PrimitiveKind::Int,
            PrimitiveValue::Float(_) => PrimitiveKind::Float,
            PrimitiveValue::Long(_) => PrimitiveKind::Long,
            PrimitiveValue::Double(_) => PrimitiveKind::Double,
        }
    }
}

impl From<bool> for PrimitiveValue {
    fn from(v: bool) -> Self {
        PrimitiveValue::Boolean(v)
    }
}

impl From<i8> for PrimitiveValue {
    fn from(v: i8) -> Self {
        PrimitiveValue::Byte(v)
    }
}

/// Unsigned bytes keep their bit pattern.
impl From<u8> for PrimitiveValue {
    fn from(v: u8) -> Self {
        PrimitiveValue::Byte(v as i8)
    }
}

impl From<char> for PrimitiveValue {
    fn from(v: char) -> Self {
        PrimitiveValue::Char(v)
    }
}

impl From<i16> for PrimitiveValue {
    fn from(v: i16) -> Self {
        PrimitiveValue::Short(v)
    }
}

impl From<i32> for PrimitiveValue {
    fn from(v: i32) -> Self {
        PrimitiveValue::Int(v)
    }
}

impl From<f32> for PrimitiveValue {
    fn from(v: f32) -> Self {
        PrimitiveValue::Float(v)
    }
}

impl From<i64> for PrimitiveValue {
    fn from(v: i64) -> Self {
        PrimitiveValue::Long(v)
    }
}

impl From<f64> for PrimitiveValue {
    fn from(v: f64) -> Self {
        PrimitiveValue::Double(v)
    }
}

// =============================================================================
// EDGE TYPING
// =============================================================================

/// Name of a runtime or declared reference type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeName(pub Cow<'static, str>);

impl TypeName {
    /// Create a type name.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Get the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The static type of an edge at the point of reference.
///
/// Primitive classification follows this type, not the runtime value: a
/// primitive value stored behind a reference declaration is a boxed object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeclaredType {
    /// A primitive slot holding its value inline.
    Primitive(PrimitiveKind),
    /// A reference slot; may be null.
    Reference(TypeName),
}

impl DeclaredType {
    /// Reference declaration helper.
    #[must_use]
    pub fn reference(name: impl Into<Cow<'static, str>>) -> Self {
        DeclaredType::Reference(TypeName::new(name))
    }

    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self, DeclaredType::Primitive(_))
    }

    /// The primitive kind, if this is a primitive declaration.
    #[must_use]
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            DeclaredType::Primitive(kind) => Some(*kind),
            DeclaredType::Reference(_) => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            DeclaredType::Primitive(kind) => kind.name(),
            DeclaredType::Reference(name) => name.as_str(),
        }
    }
}

impl From<PrimitiveKind> for DeclaredType {
    fn from(kind: PrimitiveKind) -> Self {
        DeclaredType::Primitive(kind)
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why an edge belongs to shared infrastructure rather than to one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SharedKind {
    /// A static (type-level) slot, shared by every instance.
    Static,
    /// A type-descriptor object.
    TypeDescriptor,
    /// An enum-constant singleton.
    EnumConstant,
    /// A field owned by an enum-constant singleton.
    EnumField,
}

impl SharedKind {
    /// Whether chains of this kind are left out of every count. Fields owned
    /// by an enum constant are still counted, but never explored.
    #[must_use]
    pub fn is_excluded(self) -> bool {
        !matches!(self, SharedKind::EnumField)
    }
}

// =============================================================================
// VALUE
// =============================================================================

/// A value reached through an edge.
///
/// `R` is the enumerator's object handle; the engine only ever copies the
/// handle, never the object behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<R> {
    /// A null reference.
    Null,
    /// A primitive (inline, or boxed when reached through a reference).
    Primitive(PrimitiveValue),
    /// An object handle.
    Object(R),
}

impl<R> Value<R> {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The object handle, if this value is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&R> {
        match self {
            Value::Object(r) => Some(r),
            _ => None,
        }
    }
}

impl<R> From<Option<R>> for Value<R> {
    fn from(handle: Option<R>) -> Self {
        handle.map_or(Value::Null, Value::Object)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the footprint workspace.
///
/// - No silent failures
/// - Use `Result<T, FootprintError>` for fallible operations
/// - No partial footprint is ever returned alongside an error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FootprintError {
    /// A required argument was absent; raised before any traversal starts.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A footprint was built from inconsistent counts.
    #[error("Invalid footprint: {0}")]
    InvalidFootprint(String),

    /// The class handle does not belong to the heap.
    #[error("Class not found: {0:?}")]
    UnknownClass(ClassId),

    /// The object handle does not belong to the heap.
    #[error("Object not found: {0:?}")]
    UnknownObject(ObjectId),

    /// The class declares no field with that name.
    #[error("Field not found: {class}.{field}")]
    UnknownField { class: String, field: String },

    /// A slot does not fit its declaration.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A configuration file was rejected.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_kind_names_round_trip() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(kind.name().parse::<PrimitiveKind>(), Ok(kind));
        }
        assert!("string".parse::<PrimitiveKind>().is_err());
    }

    #[test]
    fn only_enum_fields_stay_counted() {
        assert!(SharedKind::Static.is_excluded());
        assert!(SharedKind::TypeDescriptor.is_excluded());
        assert!(SharedKind::EnumConstant.is_excluded());
        assert!(!SharedKind::EnumField.is_excluded());
    }

    #[test]
    fn primitive_kind_ordering_is_tally_order() {
        let mut shuffled = vec![
            PrimitiveKind::Double,
            PrimitiveKind::Boolean,
            PrimitiveKind::Int,
        ];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![
                PrimitiveKind::Boolean,
                PrimitiveKind::Int,
                PrimitiveKind::Double
            ]
        );
    }

    #[test]
    fn primitive_value_kinds() {
        assert_eq!(PrimitiveValue::from(true).kind(), PrimitiveKind::Boolean);
        assert_eq!(PrimitiveValue::from(200u8).kind(), PrimitiveKind::Byte);
        assert_eq!(PrimitiveValue::from('x').kind(), PrimitiveKind::Char);
        assert_eq!(PrimitiveValue::from(7i32).kind(), PrimitiveKind::Int);
        assert_eq!(PrimitiveValue::from(7i64).kind(), PrimitiveKind::Long);
        assert_eq!(PrimitiveValue::from(0.5f64).kind(), PrimitiveKind::Double);
    }

    #[test]
    fn declared_type_classification() {
        let int: DeclaredType = PrimitiveKind::Int.into();
        assert!(int.is_primitive());
        assert_eq!(int.primitive_kind(), Some(PrimitiveKind::Int));

        let node = DeclaredType::reference("Node");
        assert!(!node.is_primitive());
        assert_eq!(node.primitive_kind(), None);
        assert_eq!(node.to_string(), "Node");
    }

    #[test]
    fn value_from_option() {
        let none: Value<ObjectId> = None.into();
        assert!(none.is_null());

        let some: Value<ObjectId> = Some(ObjectId(3)).into();
        assert_eq!(some.as_object(), Some(&ObjectId(3)));
    }
}
