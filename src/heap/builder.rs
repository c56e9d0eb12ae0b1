// Tue Jan 13 2026 - Alex

use crate::heap::{
    Builtin, FieldKind, FieldSpec, Marker, PackageRef, TypeDescriptor, TypeFlags, TypeKey, TypeRef,
    TypeShape,
};
use std::sync::Arc;

enum BuilderShape {
    Instance(Vec<FieldSpec>),
    Array(FieldKind),
}

pub struct TypeBuilder {
    name: String,
    package: Option<PackageRef>,
    superclass: Option<TypeRef>,
    shape: BuilderShape,
    flags: TypeFlags,
    markers: Vec<Marker>,
    builtin: Option<Builtin>,
}

impl TypeBuilder {
    pub fn class(name: &str) -> Self {
        Self::with_shape(name, BuilderShape::Instance(Vec::new()))
    }

    pub fn array(name: &str, element: impl Into<FieldKind>) -> Self {
        Self::with_shape(name, BuilderShape::Array(element.into()))
    }

    fn with_shape(name: &str, shape: BuilderShape) -> Self {
        Self {
            name: name.to_string(),
            package: None,
            superclass: None,
            shape,
            flags: TypeFlags::empty(),
            markers: Vec::new(),
            builtin: None,
        }
    }

    pub fn package(mut self, package: &PackageRef) -> Self {
        self.package = Some(package.clone());
        self
    }

    pub fn extends(mut self, superclass: &TypeRef) -> Self {
        self.superclass = Some(superclass.clone());
        self
    }

    pub fn field(self, name: &str, kind: impl Into<FieldKind>) -> Self {
        self.field_spec(FieldSpec::new(name, kind))
    }

    /// Ignored for array types, which declare no fields.
    pub fn field_spec(mut self, spec: FieldSpec) -> Self {
        if let BuilderShape::Instance(fields) = &mut self.shape {
            fields.push(spec);
        }
        self
    }

    pub fn marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    pub fn final_type(mut self) -> Self {
        self.flags |= TypeFlags::FINAL;
        self
    }

    pub fn enum_type(mut self) -> Self {
        self.flags |= TypeFlags::ENUM | TypeFlags::FINAL;
        self
    }

    pub fn flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub(crate) fn builtin(mut self, builtin: Builtin) -> Self {
        self.builtin = Some(builtin);
        self
    }

    pub fn build(self) -> TypeRef {
        let key = TypeKey::next();
        let Self {
            name,
            package,
            superclass,
            shape,
            flags,
            markers,
            builtin,
        } = self;

        Arc::new_cyclic(|owner| {
            let shape = match shape {
                BuilderShape::Array(element) => TypeShape::Array { element },
                BuilderShape::Instance(specs) => TypeShape::Instance {
                    fields: specs
                        .into_iter()
                        .enumerate()
                        .map(|(slot, spec)| {
                            Arc::new(spec.into_descriptor(owner.clone(), key, &name, slot as u16))
                        })
                        .collect(),
                },
            };
            TypeDescriptor {
                key,
                name,
                package,
                superclass,
                shape,
                flags,
                markers,
                builtin,
            }
        })
    }
}
