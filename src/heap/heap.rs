// Wed Jan 15 2026 - Alex

use crate::heap::{
    Builtin, BuiltinTypes, FieldDescriptor, FieldKind, FieldRef, HeapError, HeapObject, ObjectBody,
    ObjectId, PrimitiveValue, TypeRef, Value, WellKnown,
};
use ahash::AHashMap;
use std::ops::RangeInclusive;

/// Range of boxed integral values the host caches and hands out shared.
pub const DEFAULT_SMALL_VALUE_CACHE: RangeInclusive<i64> = -128..=127;

/// Arena of objects inspected by the sizing engine.
///
/// Besides plain allocation the heap keeps the host's canonical instances:
/// the boxes returned by the `box_*` value-of operations for small values and
/// the [`WellKnown`] singletons.
#[derive(Debug)]
pub struct Heap {
    objects: Vec<HeapObject>,
    builtins: BuiltinTypes,
    constants: AHashMap<WellKnown, ObjectId>,
    constant_ids: AHashMap<ObjectId, WellKnown>,
    box_cache: AHashMap<(Builtin, i64), ObjectId>,
    small_value_cache: RangeInclusive<i64>,
}

impl Heap {
    pub fn new() -> Self {
        Self::with_builtins(BuiltinTypes::new())
    }

    /// Shares builtin types with another heap, so type-keyed caches see the same types.
    pub fn with_builtins(builtins: BuiltinTypes) -> Self {
        Self {
            objects: Vec::new(),
            builtins,
            constants: AHashMap::new(),
            constant_ids: AHashMap::new(),
            box_cache: AHashMap::new(),
            small_value_cache: DEFAULT_SMALL_VALUE_CACHE,
        }
    }

    pub fn with_small_value_cache(mut self, range: RangeInclusive<i64>) -> Self {
        self.small_value_cache = range;
        self
    }

    pub fn builtins(&self) -> &BuiltinTypes {
        &self.builtins
    }

    pub fn builtin(&self, builtin: Builtin) -> &TypeRef {
        self.builtins.get(builtin)
    }

    pub fn object_type(&self) -> &TypeRef {
        self.builtins.get(Builtin::Object)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Result<&HeapObject, HeapError> {
        self.objects
            .get(id.index())
            .ok_or_else(|| HeapError::ObjectNotFound(id.to_string()))
    }

    pub fn type_of(&self, id: ObjectId) -> Result<&TypeRef, HeapError> {
        Ok(&self.get(id)?.ty)
    }

    pub fn new_instance(&mut self, ty: &TypeRef) -> Result<ObjectId, HeapError> {
        if ty.is_array() {
            return Err(HeapError::TypeMismatch(format!("{} is an array type", ty)));
        }
        let values = ty
            .ancestors()
            .flat_map(|t| t.declared_fields())
            .filter(|f| !f.is_static())
            .map(|f| (f.id(), default_value(f.kind())))
            .collect();
        self.allocate(HeapObject {
            ty: ty.clone(),
            body: ObjectBody::Fields(values),
        })
    }

    pub fn new_array(&mut self, ty: &TypeRef, elements: Vec<Value>) -> Result<ObjectId, HeapError> {
        let element = ty
            .element_kind()
            .ok_or_else(|| HeapError::TypeMismatch(format!("{} is not an array type", ty)))?;
        for value in &elements {
            self.check_value(element, value)?;
        }
        self.allocate(HeapObject {
            ty: ty.clone(),
            body: ObjectBody::Array(elements),
        })
    }

    pub fn new_string(&mut self, text: &str) -> Result<ObjectId, HeapError> {
        let chars = text
            .encode_utf16()
            .map(|c| Value::Primitive(PrimitiveValue::Char(c)))
            .collect();
        let char_array = self.builtins.char_array().clone();
        let value = self.new_array(&char_array, chars)?;
        let string = self.builtin(Builtin::String).clone();
        let id = self.new_instance(&string)?;
        self.set_field(id, "value", Value::Ref(value))?;
        Ok(id)
    }

    fn allocate(&mut self, object: HeapObject) -> Result<ObjectId, HeapError> {
        let index = u32::try_from(self.objects.len())
            .map_err(|_| HeapError::NotSupported("heap is full".to_string()))?;
        self.objects.push(object);
        Ok(ObjectId(index))
    }

    /// Looks a non-static field up by name, most derived declaration first.
    pub fn field_named(&self, id: ObjectId, name: &str) -> Result<FieldRef, HeapError> {
        let ty = self.type_of(id)?;
        ty.ancestors()
            .flat_map(|t| t.declared_fields())
            .find(|f| !f.is_static() && f.name() == name)
            .cloned()
            .ok_or_else(|| HeapError::FieldNotFound(format!("{}.{}", ty, name)))
    }

    pub fn set_field(&mut self, id: ObjectId, name: &str, value: impl Into<Value>) -> Result<(), HeapError> {
        let field = self.field_named(id, name)?;
        self.set(id, &field, value.into())
    }

    pub fn set(&mut self, id: ObjectId, field: &FieldDescriptor, value: Value) -> Result<(), HeapError> {
        if field.is_static() {
            return Err(HeapError::StaticField(field.to_string()));
        }
        self.check_value(field.kind(), &value)?;
        let object = self
            .objects
            .get_mut(id.index())
            .ok_or_else(|| HeapError::ObjectNotFound(id.to_string()))?;
        match &mut object.body {
            ObjectBody::Fields(values) => {
                let slot = values
                    .iter_mut()
                    .find(|(fid, _)| *fid == field.id())
                    .ok_or_else(|| HeapError::FieldNotFound(field.to_string()))?;
                slot.1 = value;
                Ok(())
            }
            ObjectBody::Array(_) => Err(HeapError::TypeMismatch(format!("{} is an array", id))),
        }
    }

    pub fn set_element(&mut self, id: ObjectId, index: usize, value: impl Into<Value>) -> Result<(), HeapError> {
        let value = value.into();
        let element = self
            .type_of(id)?
            .element_kind()
            .ok_or_else(|| HeapError::TypeMismatch(format!("{} is not an array", id)))?;
        self.check_value(element, &value)?;
        match &mut self.objects[id.index()].body {
            ObjectBody::Array(elements) => {
                let len = elements.len();
                let slot = elements
                    .get_mut(index)
                    .ok_or_else(|| HeapError::FieldNotFound(format!("{}[{}] of {}", id, index, len)))?;
                *slot = value;
                Ok(())
            }
            ObjectBody::Fields(_) => Err(HeapError::TypeMismatch(format!("{} is not an array", id))),
        }
    }

    /// Reads a field without an access check.
    pub fn field_value(&self, id: ObjectId, field: &FieldDescriptor) -> Result<Value, HeapError> {
        match &self.get(id)?.body {
            ObjectBody::Fields(values) => values
                .iter()
                .find(|(fid, _)| *fid == field.id())
                .map(|(_, v)| *v)
                .ok_or_else(|| HeapError::FieldNotFound(format!("{} on {}", field, id))),
            ObjectBody::Array(_) => Err(HeapError::TypeMismatch(format!("{} is an array", id))),
        }
    }

    /// Reads a field the way a structural walk does: inaccessible fields are refused.
    pub fn read_field(&self, id: ObjectId, field: &FieldDescriptor) -> Result<Value, HeapError> {
        if !field.is_accessible() {
            return Err(HeapError::AccessDenied(field.to_string()));
        }
        self.field_value(id, field)
    }

    pub fn array_elements(&self, id: ObjectId) -> Result<&[Value], HeapError> {
        match &self.get(id)?.body {
            ObjectBody::Array(elements) => Ok(elements),
            ObjectBody::Fields(_) => Err(HeapError::TypeMismatch(format!("{} is not an array", id))),
        }
    }

    pub fn array_length(&self, id: ObjectId) -> Result<u64, HeapError> {
        Ok(self.array_elements(id)?.len() as u64)
    }

    fn check_value(&self, kind: FieldKind, value: &Value) -> Result<(), HeapError> {
        match (kind, value) {
            (FieldKind::Reference, Value::Null) => Ok(()),
            (FieldKind::Reference, Value::Ref(target)) => self.get(*target).map(|_| ()),
            (FieldKind::Primitive(expected), Value::Primitive(v)) if v.kind() == expected => Ok(()),
            (kind, value) => Err(HeapError::TypeMismatch(format!("{:?} cannot hold {:?}", kind, value))),
        }
    }

    /// Boxes `value`, returning the shared cached box when the host caches it.
    pub fn box_value(&mut self, value: PrimitiveValue) -> Result<ObjectId, HeapError> {
        let builtin = Builtin::for_boxed_kind(value.kind());
        match value {
            PrimitiveValue::Boolean(true) => return self.constant(WellKnown::True),
            PrimitiveValue::Boolean(false) => return self.constant(WellKnown::False),
            _ => {}
        }
        let cacheable = match (builtin, value.as_i64()) {
            (Builtin::Byte, Some(_)) => true,
            (Builtin::Character, Some(v)) => (0..=*self.small_value_cache.end()).contains(&v),
            (_, Some(v)) => self.small_value_cache.contains(&v),
            (_, None) => false,
        };
        let Some(key) = value.as_i64().filter(|_| cacheable) else {
            return self.new_boxed(value);
        };
        if let Some(&id) = self.box_cache.get(&(builtin, key)) {
            return Ok(id);
        }
        let id = self.new_boxed(value)?;
        self.box_cache.insert((builtin, key), id);
        Ok(id)
    }

    pub fn box_int(&mut self, value: i32) -> Result<ObjectId, HeapError> {
        self.box_value(PrimitiveValue::Int(value))
    }

    pub fn box_long(&mut self, value: i64) -> Result<ObjectId, HeapError> {
        self.box_value(PrimitiveValue::Long(value))
    }

    /// Always allocates a fresh, unshared box.
    pub fn new_boxed(&mut self, value: PrimitiveValue) -> Result<ObjectId, HeapError> {
        let ty = self.builtin(Builtin::for_boxed_kind(value.kind())).clone();
        let id = self.new_instance(&ty)?;
        self.set_field(id, "value", Value::Primitive(value))?;
        Ok(id)
    }

    pub fn cached_box(&self, builtin: Builtin, value: i64) -> Option<ObjectId> {
        self.box_cache.get(&(builtin, value)).copied()
    }

    pub fn boxed_value(&self, id: ObjectId) -> Option<PrimitiveValue> {
        let ty = self.type_of(id).ok()?;
        ty.builtin()?.boxed_kind()?;
        let field = self.field_named(id, "value").ok()?;
        match self.field_value(id, &field).ok()? {
            Value::Primitive(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the singleton, allocating it on first request.
    pub fn constant(&mut self, which: WellKnown) -> Result<ObjectId, HeapError> {
        if let Some(&id) = self.constants.get(&which) {
            return Ok(id);
        }
        let ty = self.builtin(which.builtin()).clone();
        let values = ty
            .ancestors()
            .flat_map(|t| t.declared_fields())
            .filter(|f| !f.is_static())
            .map(|f| {
                let value = match which.initial_primitive() {
                    Some((name, v)) if name == f.name() => Value::Primitive(v),
                    _ => default_value(f.kind()),
                };
                (f.id(), value)
            })
            .collect();
        let id = self.allocate(HeapObject {
            ty,
            body: ObjectBody::Fields(values),
        })?;
        self.constants.insert(which, id);
        self.constant_ids.insert(id, which);
        Ok(id)
    }

    pub fn constant_of(&self, id: ObjectId) -> Option<WellKnown> {
        self.constant_ids.get(&id).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        (0..self.objects.len() as u32).map(ObjectId)
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn default_value(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Reference => Value::Null,
        FieldKind::Primitive(p) => Value::Primitive(PrimitiveValue::zero(p)),
    }
}
