//! # Heap Object Model
//!
//! An arena of objects addressed by stable [`ObjectId`] handles, modelling the
//! heap of a managed runtime: classes with typed instance fields, static
//! slots, enum constants, arrays, and one type-descriptor object per type.
//!
//! The heap is the reference [`FieldEnumerator`]. It is also what the CLI
//! builds from JSON documents.
//!
//! ## Enumeration Contract
//!
//! - Instance fields in declaration order, then the class's static slots
//!   (flagged [`SharedKind::Static`])
//! - Array elements in index order
//! - Every field of an enum constant is flagged [`SharedKind::EnumField`]
//! - Edges into a type descriptor or an enum constant carry that object's
//!   shared kind

use crate::enumerator::{Edge, FieldEnumerator};
use crate::{
    ClassId, DeclaredType, FootprintError, ObjectId, PrimitiveValue, SharedKind, TypeName, Value,
};
use std::borrow::Cow;

/// Name of the built-in class of type-descriptor objects.
pub const DESCRIPTOR_CLASS_NAME: &str = "type";

/// Runtime type reported for handles the heap does not know.
pub const UNKNOWN_TYPE_NAME: &str = "unknown";

// =============================================================================
// SLOTS AND TYPES
// =============================================================================

/// Storage of one field or array element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot {
    /// Inline primitive, or a boxed value under a reference declaration.
    Primitive(PrimitiveValue),
    /// Reference; `None` is null.
    Ref(Option<ObjectId>),
}

impl Slot {
    fn value(self) -> Value<ObjectId> {
        match self {
            Slot::Primitive(value) => Value::Primitive(value),
            Slot::Ref(handle) => handle.into(),
        }
    }
}

/// Shape of a registered type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Ordinary class with instance fields.
    Class,
    /// Enum type; its instances are shared singletons.
    Enum,
    /// Array with a single element type.
    Array,
    /// The built-in class of type descriptors.
    Descriptor,
}

#[derive(Debug, Clone)]
struct FieldDef {
    name: Cow<'static, str>,
    declared: DeclaredType,
}

#[derive(Debug, Clone)]
struct ClassDef {
    name: TypeName,
    kind: TypeKind,
    fields: Vec<FieldDef>,
    element: Option<DeclaredType>,
    statics: Vec<(FieldDef, Slot)>,
    descriptor: ObjectId,
}

#[derive(Debug, Clone)]
struct HeapObject {
    class: ClassId,
    slots: Vec<Slot>,
}

// =============================================================================
// HEAP
// =============================================================================

/// Arena of objects.
///
/// Handles are indices; objects are never freed, so a handle stays valid for
/// the lifetime of the heap.
#[derive(Debug, Clone)]
pub struct Heap {
    classes: Vec<ClassDef>,
    objects: Vec<HeapObject>,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    /// Create a heap holding only the built-in descriptor class.
    #[must_use]
    pub fn new() -> Self {
        // The descriptor class is described by its own first instance.
        Self {
            classes: vec![ClassDef {
                name: TypeName::new(DESCRIPTOR_CLASS_NAME),
                kind: TypeKind::Descriptor,
                fields: Vec::new(),
                element: None,
                statics: Vec::new(),
                descriptor: ObjectId(0),
            }],
            objects: vec![HeapObject {
                class: ClassId(0),
                slots: Vec::new(),
            }],
        }
    }

    /// Register a class with typed instance fields.
    pub fn define_class<N, I>(&mut self, name: impl Into<Cow<'static, str>>, fields: I) -> ClassId
    where
        N: Into<Cow<'static, str>>,
        I: IntoIterator<Item = (N, DeclaredType)>,
    {
        self.define(name.into(), TypeKind::Class, fields, None)
    }

    /// Register an enum type. Every instance is an enum constant.
    pub fn define_enum<N, I>(&mut self, name: impl Into<Cow<'static, str>>, fields: I) -> ClassId
    where
        N: Into<Cow<'static, str>>,
        I: IntoIterator<Item = (N, DeclaredType)>,
    {
        self.define(name.into(), TypeKind::Enum, fields, None)
    }

    /// Register an array type.
    pub fn define_array(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        element: DeclaredType,
    ) -> ClassId {
        self.define(
            name.into(),
            TypeKind::Array,
            Vec::<(&'static str, DeclaredType)>::new(),
            Some(element),
        )
    }

    fn define<N, I>(
        &mut self,
        name: Cow<'static, str>,
        kind: TypeKind,
        fields: I,
        element: Option<DeclaredType>,
    ) -> ClassId
    where
        N: Into<Cow<'static, str>>,
        I: IntoIterator<Item = (N, DeclaredType)>,
    {
        let descriptor = self.push_object(ClassId(0), Vec::new());
        let id = ClassId(self.classes.len() as u64);
        self.classes.push(ClassDef {
            name: TypeName::new(name),
            kind,
            fields: fields
                .into_iter()
                .map(|(name, declared)| FieldDef {
                    name: name.into(),
                    declared,
                })
                .collect(),
            element,
            statics: Vec::new(),
            descriptor,
        });
        id
    }

    /// Attach a static slot to a type.
    pub fn add_static(
        &mut self,
        class: ClassId,
        name: impl Into<Cow<'static, str>>,
        declared: DeclaredType,
        slot: Slot,
    ) -> Result<(), FootprintError> {
        self.check_slot(&declared, slot)?;
        let def = self.class_mut(class)?;
        def.statics.push((
            FieldDef {
                name: name.into(),
                declared,
            },
            slot,
        ));
        Ok(())
    }

    /// Allocate an instance of a class or enum, one slot per declared field.
    pub fn alloc(&mut self, class: ClassId, slots: Vec<Slot>) -> Result<ObjectId, FootprintError> {
        let def = self.class(class)?;
        match def.kind {
            TypeKind::Class | TypeKind::Enum => {}
            TypeKind::Array | TypeKind::Descriptor => {
                return Err(FootprintError::TypeMismatch(format!(
                    "{} is not instantiable with fields",
                    def.name
                )));
            }
        }
        if slots.len() != def.fields.len() {
            return Err(FootprintError::TypeMismatch(format!(
                "{} declares {} fields, got {} slots",
                def.name,
                def.fields.len(),
                slots.len()
            )));
        }
        for (field, slot) in def.fields.iter().zip(&slots) {
            self.check_slot(&field.declared, *slot)?;
        }
        Ok(self.push_object(class, slots))
    }

    /// Allocate an array.
    pub fn alloc_array(
        &mut self,
        class: ClassId,
        elements: Vec<Slot>,
    ) -> Result<ObjectId, FootprintError> {
        let def = self.class(class)?;
        let Some(element) = def.element.as_ref() else {
            return Err(FootprintError::TypeMismatch(format!(
                "{} is not an array type",
                def.name
            )));
        };
        for slot in &elements {
            self.check_slot(element, *slot)?;
        }
        Ok(self.push_object(class, elements))
    }

    /// Overwrite a named field of an object.
    pub fn set_field(
        &mut self,
        object: ObjectId,
        name: &str,
        slot: Slot,
    ) -> Result<(), FootprintError> {
        let index = self.field_index(object, name)?;
        let def = self.class(self.object(object)?.class)?;
        self.check_slot(&def.fields[index].declared, slot)?;
        self.object_mut(object)?.slots[index] = slot;
        Ok(())
    }

    /// Overwrite an element of an array.
    pub fn set_element(
        &mut self,
        object: ObjectId,
        index: usize,
        slot: Slot,
    ) -> Result<(), FootprintError> {
        let obj = self.object(object)?;
        let def = self.class(obj.class)?;
        let Some(element) = def.element.as_ref() else {
            return Err(FootprintError::TypeMismatch(format!(
                "{} is not an array type",
                def.name
            )));
        };
        if index >= obj.slots.len() {
            return Err(FootprintError::InvalidArgument(format!(
                "index {} out of bounds for {} of length {}",
                index,
                def.name,
                obj.slots.len()
            )));
        }
        self.check_slot(element, slot)?;
        self.object_mut(object)?.slots[index] = slot;
        Ok(())
    }

    /// Read a named field of an object.
    pub fn get_field(&self, object: ObjectId, name: &str) -> Result<Slot, FootprintError> {
        let index = self.field_index(object, name)?;
        Ok(self.object(object)?.slots[index])
    }

    /// The type-descriptor object of a type.
    pub fn descriptor(&self, class: ClassId) -> Result<ObjectId, FootprintError> {
        Ok(self.class(class)?.descriptor)
    }

    /// The class of an object.
    #[must_use]
    pub fn class_of(&self, object: ObjectId) -> Option<ClassId> {
        self.object(object).ok().map(|obj| obj.class)
    }

    /// Runtime type name of an object.
    #[must_use]
    pub fn type_name(&self, object: ObjectId) -> Option<&TypeName> {
        let obj = self.object(object).ok()?;
        self.class(obj.class).ok().map(|def| &def.name)
    }

    /// Shape of a registered type.
    #[must_use]
    pub fn type_kind(&self, class: ClassId) -> Option<TypeKind> {
        self.class(class).ok().map(|def| def.kind)
    }

    /// Number of objects, type descriptors included.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    // -------------------------------------------------------------------------
    // internal helpers
    // -------------------------------------------------------------------------

    fn push_object(&mut self, class: ClassId, slots: Vec<Slot>) -> ObjectId {
        let id = ObjectId(self.objects.len() as u64);
        self.objects.push(HeapObject { class, slots });
        id
    }

    fn class(&self, class: ClassId) -> Result<&ClassDef, FootprintError> {
        self.classes
            .get(class.0 as usize)
            .ok_or(FootprintError::UnknownClass(class))
    }

    fn class_mut(&mut self, class: ClassId) -> Result<&mut ClassDef, FootprintError> {
        self.classes
            .get_mut(class.0 as usize)
            .ok_or(FootprintError::UnknownClass(class))
    }

    fn object(&self, object: ObjectId) -> Result<&HeapObject, FootprintError> {
        self.objects
            .get(object.0 as usize)
            .ok_or(FootprintError::UnknownObject(object))
    }

    fn object_mut(&mut self, object: ObjectId) -> Result<&mut HeapObject, FootprintError> {
        self.objects
            .get_mut(object.0 as usize)
            .ok_or(FootprintError::UnknownObject(object))
    }

    fn field_index(&self, object: ObjectId, name: &str) -> Result<usize, FootprintError> {
        let def = self.class(self.object(object)?.class)?;
        def.fields
            .iter()
            .position(|field| field.name == name)
            .ok_or_else(|| FootprintError::UnknownField {
                class: def.name.to_string(),
                field: name.to_string(),
            })
    }

    /// A slot fits a declaration when primitive kinds agree, or when the
    /// declaration is a reference (primitives are then boxed) to a live object.
    fn check_slot(&self, declared: &DeclaredType, slot: Slot) -> Result<(), FootprintError> {
        match (declared, slot) {
            (DeclaredType::Primitive(kind), Slot::Primitive(value)) if value.kind() == *kind => {
                Ok(())
            }
            (DeclaredType::Primitive(kind), other) => Err(FootprintError::TypeMismatch(format!(
                "{} slot cannot hold {:?}",
                kind, other
            ))),
            (DeclaredType::Reference(_), Slot::Ref(Some(target))) => {
                self.object(target).map(|_| ())
            }
            (DeclaredType::Reference(_), Slot::Ref(None) | Slot::Primitive(_)) => Ok(()),
        }
    }

    fn target_shared(&self, slot: Slot) -> Option<SharedKind> {
        match slot {
            Slot::Ref(Some(target)) => self.shared_kind(target),
            Slot::Ref(None) | Slot::Primitive(_) => None,
        }
    }
}

// =============================================================================
// FIELD ENUMERATION
// =============================================================================

impl FieldEnumerator for Heap {
    type Ref = ObjectId;

    fn runtime_type(&self, object: ObjectId) -> TypeName {
        self.type_name(object)
            .cloned()
            .unwrap_or_else(|| TypeName::new(UNKNOWN_TYPE_NAME))
    }

    fn shared_kind(&self, object: ObjectId) -> Option<SharedKind> {
        let def = self.class(self.object(object).ok()?.class).ok()?;
        match def.kind {
            TypeKind::Descriptor => Some(SharedKind::TypeDescriptor),
            TypeKind::Enum => Some(SharedKind::EnumConstant),
            TypeKind::Class | TypeKind::Array => None,
        }
    }

    fn edges(&self, object: ObjectId) -> Vec<Edge<ObjectId>> {
        let Ok(obj) = self.object(object) else {
            return Vec::new();
        };
        let Ok(def) = self.class(obj.class) else {
            return Vec::new();
        };

        let owner_shared = (def.kind == TypeKind::Enum).then_some(SharedKind::EnumField);
        let mut edges = Vec::with_capacity(obj.slots.len().saturating_add(def.statics.len()));

        if let Some(element) = def.element.as_ref() {
            for (index, slot) in obj.slots.iter().enumerate() {
                let mut edge = Edge::index(index, element.clone(), slot.value());
                edge.shared = self.target_shared(*slot);
                edges.push(edge);
            }
        } else {
            for (field, slot) in def.fields.iter().zip(&obj.slots) {
                let mut edge = Edge::field(field.name.clone(), field.declared.clone(), slot.value());
                edge.shared = owner_shared.or_else(|| self.target_shared(*slot));
                edges.push(edge);
            }
        }

        for (field, slot) in &def.statics {
            edges.push(
                Edge::field(field.name.clone(), field.declared.clone(), slot.value())
                    .shared_as(SharedKind::Static),
            );
        }

        edges
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PrimitiveKind;

    fn point_class(heap: &mut Heap) -> ClassId {
        heap.define_class(
            "Point",
            vec![
                ("x", PrimitiveKind::Int.into()),
                ("y", PrimitiveKind::Int.into()),
                ("next", DeclaredType::reference("Point")),
            ],
        )
    }

    fn point(heap: &mut Heap, class: ClassId, next: Option<ObjectId>) -> ObjectId {
        heap.alloc(
            class,
            vec![
                Slot::Primitive(PrimitiveValue::Int(1)),
                Slot::Primitive(PrimitiveValue::Int(2)),
                Slot::Ref(next),
            ],
        )
        .expect("alloc")
    }

    #[test]
    fn new_heap_holds_only_the_descriptor_class() {
        let heap = Heap::new();
        assert_eq!(heap.object_count(), 1);
        assert_eq!(heap.runtime_type(ObjectId(0)).as_str(), DESCRIPTOR_CLASS_NAME);
        assert_eq!(
            heap.shared_kind(ObjectId(0)),
            Some(SharedKind::TypeDescriptor)
        );
    }

    #[test]
    fn defining_a_class_allocates_its_descriptor() {
        let mut heap = Heap::new();
        let class = point_class(&mut heap);
        let descriptor = heap.descriptor(class).expect("descriptor");
        assert_eq!(heap.object_count(), 2);
        assert_eq!(heap.type_kind(class), Some(TypeKind::Class));
        assert_eq!(heap.shared_kind(descriptor), Some(SharedKind::TypeDescriptor));
    }

    #[test]
    fn alloc_validates_arity_and_kinds() {
        let mut heap = Heap::new();
        let class = point_class(&mut heap);

        let short = heap.alloc(class, vec![Slot::Ref(None)]);
        assert!(matches!(short, Err(FootprintError::TypeMismatch(_))));

        let wrong_kind = heap.alloc(
            class,
            vec![
                Slot::Primitive(PrimitiveValue::Long(1)),
                Slot::Primitive(PrimitiveValue::Int(2)),
                Slot::Ref(None),
            ],
        );
        assert!(matches!(wrong_kind, Err(FootprintError::TypeMismatch(_))));

        let dangling = heap.alloc(
            class,
            vec![
                Slot::Primitive(PrimitiveValue::Int(1)),
                Slot::Primitive(PrimitiveValue::Int(2)),
                Slot::Ref(Some(ObjectId(999))),
            ],
        );
        assert_eq!(dangling, Err(FootprintError::UnknownObject(ObjectId(999))));

        let unknown = heap.alloc(ClassId(42), Vec::new());
        assert_eq!(unknown, Err(FootprintError::UnknownClass(ClassId(42))));
    }

    #[test]
    fn set_and_get_fields() {
        let mut heap = Heap::new();
        let class = point_class(&mut heap);
        let a = point(&mut heap, class, None);
        let b = point(&mut heap, class, None);

        heap.set_field(a, "next", Slot::Ref(Some(b))).expect("set");
        assert_eq!(heap.get_field(a, "next"), Ok(Slot::Ref(Some(b))));

        let missing = heap.set_field(a, "z", Slot::Ref(None));
        assert!(matches!(missing, Err(FootprintError::UnknownField { .. })));
    }

    #[test]
    fn arrays_enumerate_by_index() {
        let mut heap = Heap::new();
        let ints = heap.define_array("int[]", PrimitiveKind::Int.into());
        let array = heap
            .alloc_array(
                ints,
                vec![
                    Slot::Primitive(PrimitiveValue::Int(1)),
                    Slot::Primitive(PrimitiveValue::Int(2)),
                ],
            )
            .expect("array");

        let edges = heap.edges(array);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[1].step, crate::Step::Index(1));
        assert!(edges.iter().all(|edge| edge.declared.is_primitive()));

        let out_of_bounds = heap.set_element(array, 2, Slot::Primitive(PrimitiveValue::Int(3)));
        assert!(matches!(out_of_bounds, Err(FootprintError::InvalidArgument(_))));

        let class_alloc = heap.alloc(ints, Vec::new());
        assert!(matches!(class_alloc, Err(FootprintError::TypeMismatch(_))));
    }

    #[test]
    fn shared_edges_are_flagged() {
        let mut heap = Heap::new();
        let color = heap.define_enum("Color", vec![("rgb", PrimitiveKind::Int.into())]);
        let red = heap
            .alloc(color, vec![Slot::Primitive(PrimitiveValue::Int(0xff0000))])
            .expect("enum constant");

        let class = heap.define_class(
            "Pixel",
            vec![
                ("color", DeclaredType::reference("Color")),
                ("kind", DeclaredType::reference("type")),
                ("alpha", PrimitiveKind::Byte.into()),
            ],
        );
        let descriptor = heap.descriptor(class).expect("descriptor");
        let count = Slot::Primitive(PrimitiveValue::Int(1));
        heap.add_static(class, "count", PrimitiveKind::Int.into(), count)
            .expect("static");
        let pixel = heap
            .alloc(
                class,
                vec![
                    Slot::Ref(Some(red)),
                    Slot::Ref(Some(descriptor)),
                    Slot::Primitive(PrimitiveValue::Byte(1)),
                ],
            )
            .expect("alloc");

        let shared: Vec<_> = heap.edges(pixel).iter().map(|edge| edge.shared).collect();
        assert_eq!(
            shared,
            vec![
                Some(SharedKind::EnumConstant),
                Some(SharedKind::TypeDescriptor),
                None,
                Some(SharedKind::Static),
            ]
        );

        // Fields owned by an enum constant are shared as well.
        let owned: Vec<_> = heap.edges(red).iter().map(|edge| edge.shared).collect();
        assert_eq!(owned, vec![Some(SharedKind::EnumField)]);
    }

    #[test]
    fn unknown_handles_enumerate_nothing() {
        let heap = Heap::new();
        assert!(heap.edges(ObjectId(77)).is_empty());
        assert_eq!(heap.runtime_type(ObjectId(77)).as_str(), UNKNOWN_TYPE_NAME);
        assert_eq!(heap.shared_kind(ObjectId(77)), None);
    }
}
