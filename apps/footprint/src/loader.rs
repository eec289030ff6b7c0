//! # JSON Loader
//!
//! Builds a [`Heap`] object graph from a JSON document.
//!
//! ## Mapping
//!
//! | JSON            | Heap                                              |
//! |-----------------|---------------------------------------------------|
//! | object          | instance of a per-shape `object` class            |
//! | uniform array   | `long[]`, `double[]` or `boolean[]`               |
//! | other array     | `any[]`; primitive elements are boxed values       |
//! | string          | `char[]`                                          |
//! | integer         | `long`                                            |
//! | other number    | `double`                                          |
//! | boolean         | `boolean`                                         |
//! | null            | null reference                                    |
//!
//! A shape is the ordered list of keys together with the primitive kind of
//! each primitive member. Two objects of the same shape share one class.

use crate::config::LoaderConfig;
use footprint_core::{
    ClassId, DeclaredType, FootprintError, Heap, ObjectId, PrimitiveKind, PrimitiveValue, Slot,
    Value,
};
use serde_json::{Map, Number};
use std::collections::BTreeMap;

/// Class name of every JSON object.
pub const OBJECT_CLASS_NAME: &str = "object";

/// Declared type of members holding objects, arrays, strings or null.
pub const ANY_TYPE_NAME: &str = "any";

/// Array class of non-uniform arrays.
pub const ANY_ARRAY_NAME: &str = "any[]";

/// Array class of strings.
pub const STRING_CLASS_NAME: &str = "char[]";

/// Member layout: key plus primitive kind, `None` for reference members.
type Shape = Vec<(String, Option<PrimitiveKind>)>;

// =============================================================================
// LOADED DOCUMENT
// =============================================================================

/// A JSON document as an object graph.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub heap: Heap,
    pub root: Value<ObjectId>,
}

// =============================================================================
// LOADER
// =============================================================================

pub struct JsonLoader {
    heap: Heap,
    intern_strings: bool,
    shapes: BTreeMap<Shape, ClassId>,
    arrays: BTreeMap<&'static str, ClassId>,
    strings: BTreeMap<String, ObjectId>,
}

impl JsonLoader {
    #[must_use]
    pub fn new(config: &LoaderConfig) -> Self {
        Self {
            heap: Heap::new(),
            intern_strings: config.intern_strings,
            shapes: BTreeMap::new(),
            arrays: BTreeMap::new(),
            strings: BTreeMap::new(),
        }
    }

    /// Parse and load JSON text.
    pub fn load_str(self, text: &str) -> Result<LoadedDocument, FootprintError> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| FootprintError::SerializationError(format!("Invalid JSON: {}", e)))?;
        self.load(&value)
    }

    /// Load an already parsed document.
    pub fn load(mut self, document: &serde_json::Value) -> Result<LoadedDocument, FootprintError> {
        let root = match self.slot(document)? {
            Slot::Primitive(value) => Value::Primitive(value),
            Slot::Ref(handle) => handle.into(),
        };
        tracing::debug!(
            objects = self.heap.object_count(),
            shapes = self.shapes.len(),
            "document loaded"
        );
        Ok(LoadedDocument {
            heap: self.heap,
            root,
        })
    }

    fn slot(&mut self, value: &serde_json::Value) -> Result<Slot, FootprintError> {
        use serde_json::Value as Json;

        Ok(match value {
            Json::Null => Slot::Ref(None),
            Json::Bool(b) => Slot::Primitive(PrimitiveValue::Boolean(*b)),
            Json::Number(n) => Slot::Primitive(number(n)),
            Json::String(s) => Slot::Ref(Some(self.string(s)?)),
            Json::Array(items) => Slot::Ref(Some(self.array(items)?)),
            Json::Object(members) => Slot::Ref(Some(self.object(members)?)),
        })
    }

    fn string(&mut self, text: &str) -> Result<ObjectId, FootprintError> {
        if self.intern_strings {
            if let Some(&existing) = self.strings.get(text) {
                return Ok(existing);
            }
        }
        let class = self.array_class(STRING_CLASS_NAME, PrimitiveKind::Char.into());
        let chars = text.chars().map(|c| Slot::Primitive(c.into())).collect();
        let handle = self.heap.alloc_array(class, chars)?;
        if self.intern_strings {
            self.strings.insert(text.to_string(), handle);
        }
        Ok(handle)
    }

    fn array(&mut self, items: &[serde_json::Value]) -> Result<ObjectId, FootprintError> {
        let mut slots = Vec::with_capacity(items.len());
        for item in items {
            slots.push(self.slot(item)?);
        }

        let (name, element) = match uniform_kind(&slots) {
            Some(PrimitiveKind::Long) => ("long[]", DeclaredType::from(PrimitiveKind::Long)),
            Some(PrimitiveKind::Double) => ("double[]", DeclaredType::from(PrimitiveKind::Double)),
            Some(PrimitiveKind::Boolean) => {
                ("boolean[]", DeclaredType::from(PrimitiveKind::Boolean))
            }
            _ => (ANY_ARRAY_NAME, DeclaredType::reference(ANY_TYPE_NAME)),
        };
        let class = self.array_class(name, element);
        self.heap.alloc_array(class, slots)
    }

    fn object(&mut self, members: &Map<String, serde_json::Value>) -> Result<ObjectId, FootprintError> {
        let mut shape: Shape = Vec::with_capacity(members.len());
        let mut slots = Vec::with_capacity(members.len());
        for (key, member) in members {
            let slot = self.slot(member)?;
            let kind = match slot {
                Slot::Primitive(value) => Some(value.kind()),
                Slot::Ref(_) => None,
            };
            shape.push((key.clone(), kind));
            slots.push(slot);
        }

        let class = match self.shapes.get(&shape) {
            Some(&class) => class,
            None => {
                let fields: Vec<(String, DeclaredType)> = shape
                    .iter()
                    .map(|(key, kind)| {
                        let declared = kind
                            .map(DeclaredType::from)
                            .unwrap_or_else(|| DeclaredType::reference(ANY_TYPE_NAME));
                        (key.clone(), declared)
                    })
                    .collect();
                let class = self.heap.define_class(OBJECT_CLASS_NAME, fields);
                self.shapes.insert(shape, class);
                class
            }
        };
        self.heap.alloc(class, slots)
    }

    fn array_class(&mut self, name: &'static str, element: DeclaredType) -> ClassId {
        if let Some(&class) = self.arrays.get(name) {
            return class;
        }
        let class = self.heap.define_array(name, element);
        self.arrays.insert(name, class);
        class
    }
}

/// Integers that fit `i64` are `long`; every other number is `double`.
fn number(n: &Number) -> PrimitiveValue {
    match n.as_i64() {
        Some(i) => PrimitiveValue::Long(i),
        None => PrimitiveValue::Double(n.as_f64().unwrap_or(f64::NAN)),
    }
}

/// The primitive kind shared by every slot, if the slice is non-empty and
/// holds only primitives of one kind.
fn uniform_kind(slots: &[Slot]) -> Option<PrimitiveKind> {
    let mut kinds = slots.iter().map(|slot| match slot {
        Slot::Primitive(value) => Some(value.kind()),
        Slot::Ref(_) => None,
    });
    let first = kinds.next()??;
    kinds.all(|kind| kind == Some(first)).then_some(first)
}

// =============================================================================
// TESTS
// =============================================================================
