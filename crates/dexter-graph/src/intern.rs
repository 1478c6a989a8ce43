//! Item interning: names, types, protos and member signatures.
//!
//! `TypeInterner` is the single owner of every structural item the hierarchy
//! model talks about. Items are deduplicated on insertion so equality of the
//! returned handles is identity. The interner is shared across worker threads
//! (`Send + Sync`); lookups of existing items never take a write lock.

use crate::descriptor::{
    BaseType, DescriptorError, FieldDescriptor, parse_field_descriptor, parse_method_descriptor,
};
use crate::types::{
    FieldRef, FieldSig, MethodProto, MethodRef, MethodSig, PrimitiveKind, ProtoId, TypeData,
    TypeId,
};
use dashmap::DashMap;
use dexter_common::{Atom, ShardedInterner};
use rustc_hash::FxBuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::trace;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Handles for items the resolver needs by identity.
#[derive(Copy, Clone, Debug, Default)]
pub struct WellKnown {
    pub object: TypeId,
    pub object_array: TypeId,
    pub method_handle: TypeId,
    pub var_handle: TypeId,
    pub clone_name: Atom,
    pub init_name: Atom,
    pub clinit_name: Atom,
}

/// Concurrent interner for JVM types, protos and signatures.
pub struct TypeInterner {
    instance_id: u64,
    strings: ShardedInterner,
    types: RwLock<Vec<TypeData>>,
    type_ids: DashMap<TypeData, TypeId, FxBuildHasher>,
    protos: RwLock<Vec<Arc<MethodProto>>>,
    proto_ids: DashMap<MethodProto, ProtoId, FxBuildHasher>,
    well_known: WellKnown,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    /// Create an interner with the primitives and `java.lang.Object` at their
    /// fixed `TypeId`s.
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "TypeInterner::new - creating new instance");

        let strings = ShardedInterner::new();
        strings.intern_common();

        let mut interner = TypeInterner {
            instance_id,
            strings,
            types: RwLock::new(Vec::with_capacity(256)),
            type_ids: DashMap::with_hasher(FxBuildHasher),
            protos: RwLock::new(Vec::with_capacity(128)),
            proto_ids: DashMap::with_hasher(FxBuildHasher),
            well_known: WellKnown::default(),
        };

        for kind in PrimitiveKind::ALL {
            let id = interner.intern(TypeData::Primitive(kind));
            debug_assert_eq!(id, kind.type_id());
        }
        let object = interner.class_named("java/lang/Object");
        debug_assert_eq!(object, TypeId::OBJECT);

        interner.well_known = WellKnown {
            object,
            object_array: interner.array_of(object),
            method_handle: interner.class_named("java/lang/invoke/MethodHandle"),
            var_handle: interner.class_named("java/lang/invoke/VarHandle"),
            clone_name: interner.intern_string("clone"),
            init_name: interner.intern_string("<init>"),
            clinit_name: interner.intern_string("<clinit>"),
        };
        interner
    }

    #[inline]
    pub fn well_known(&self) -> &WellKnown {
        &self.well_known
    }

    // =========================================================================
    // Strings
    // =========================================================================

    #[inline]
    pub fn intern_string(&self, s: &str) -> Atom {
        self.strings.intern(s)
    }

    #[inline]
    pub fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        self.strings.resolve(atom)
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Intern a structural type, returning the existing id if already present.
    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(id) = self.type_ids.get(&data) {
            return *id;
        }
        // The entry lock serialises concurrent inserts of the same data, so the
        // vector index and the map agree.
        *self.type_ids.entry(data).or_insert_with(|| {
            let mut types = match self.types.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let id = TypeId(types.len() as u32);
            types.push(data);
            trace!(
                instance_id = self.instance_id,
                type_id = id.0,
                data = ?data,
                "TypeInterner::intern"
            );
            id
        })
    }

    /// Structural data behind `id`, or `None` for an id from another interner.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        let types = self.types.read().ok()?;
        types.get(id.0 as usize).copied()
    }

    /// Number of interned types, primitives included.
    pub fn type_count(&self) -> usize {
        self.types.read().map(|types| types.len()).unwrap_or(0)
    }

    /// Class type for an internal binary name such as `java/lang/String`.
    pub fn class_named(&self, binary_name: &str) -> TypeId {
        let descriptor = format!("L{binary_name};");
        self.intern(TypeData::Class(self.strings.intern(&descriptor)))
    }

    pub fn array_of(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element))
    }

    #[inline]
    pub fn is_array(&self, id: TypeId) -> bool {
        matches!(self.lookup(id), Some(TypeData::Array(_)))
    }

    pub fn element_type(&self, id: TypeId) -> Option<TypeId> {
        match self.lookup(id)? {
            TypeData::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Intern a field descriptor (`I`, `[Ljava/lang/String;`).
    pub fn intern_descriptor(&self, descriptor: &str) -> Result<TypeId, DescriptorError> {
        let parsed = parse_field_descriptor(descriptor)?;
        Ok(self.intern_parsed(parsed))
    }

    fn intern_parsed(&self, parsed: FieldDescriptor<'_>) -> TypeId {
        let mut ty = match parsed.base {
            BaseType::Primitive(kind) => kind.type_id(),
            BaseType::Object(name) => self.class_named(name),
        };
        for _ in 0..parsed.dimensions {
            ty = self.array_of(ty);
        }
        ty
    }

    /// Render the JVM descriptor of `id`.
    pub fn descriptor(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_descriptor(id, &mut out);
        out
    }

    fn write_descriptor(&self, id: TypeId, out: &mut String) {
        match self.lookup(id) {
            Some(TypeData::Primitive(kind)) => out.push(kind.descriptor_char()),
            Some(TypeData::Class(atom)) => out.push_str(&self.strings.resolve(atom)),
            Some(TypeData::Array(element)) => {
                out.push('[');
                self.write_descriptor(element, out);
            }
            None => out.push('?'),
        }
    }

    /// Java source-level name, e.g. `java.lang.Object` or `int[]`.
    pub fn type_name(&self, id: TypeId) -> String {
        match self.lookup(id) {
            Some(TypeData::Primitive(kind)) => kind.java_name().to_string(),
            Some(TypeData::Class(atom)) => {
                let descriptor = self.strings.resolve(atom);
                let binary = descriptor
                    .strip_prefix('L')
                    .and_then(|s| s.strip_suffix(';'))
                    .unwrap_or(&*descriptor);
                binary.replace('/', ".")
            }
            Some(TypeData::Array(element)) => format!("{}[]", self.type_name(element)),
            None => format!("<unknown type {}>", id.0),
        }
    }

    // =========================================================================
    // Protos and signatures
    // =========================================================================

    pub fn proto(&self, proto: MethodProto) -> ProtoId {
        if let Some(id) = self.proto_ids.get(&proto) {
            return *id;
        }
        let value = Arc::new(proto.clone());
        *self.proto_ids.entry(proto).or_insert_with(|| {
            let mut protos = match self.protos.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let id = ProtoId(protos.len() as u32);
            protos.push(value);
            id
        })
    }

    pub fn lookup_proto(&self, id: ProtoId) -> Option<Arc<MethodProto>> {
        let protos = self.protos.read().ok()?;
        protos.get(id.0 as usize).cloned()
    }

    /// Intern a method descriptor such as `(I[Ljava/lang/Object;)V`.
    pub fn intern_proto_descriptor(&self, descriptor: &str) -> Result<ProtoId, DescriptorError> {
        let parsed = parse_method_descriptor(descriptor)?;
        let params = parsed.params.iter().map(|p| self.intern_parsed(*p));
        let ret = self.intern_parsed(parsed.ret);
        Ok(self.proto(MethodProto::new(params, ret)))
    }

    pub fn proto_descriptor(&self, id: ProtoId) -> String {
        let Some(proto) = self.lookup_proto(id) else {
            return "(?)?".to_string();
        };
        let mut out = String::from("(");
        for param in &proto.params {
            self.write_descriptor(*param, &mut out);
        }
        out.push(')');
        self.write_descriptor(proto.ret, &mut out);
        out
    }

    pub fn method_sig(&self, name: &str, descriptor: &str) -> Result<MethodSig, DescriptorError> {
        Ok(MethodSig {
            name: self.intern_string(name),
            proto: self.intern_proto_descriptor(descriptor)?,
        })
    }

    pub fn field_sig(&self, name: &str, descriptor: &str) -> Result<FieldSig, DescriptorError> {
        Ok(FieldSig {
            name: self.intern_string(name),
            ty: self.intern_descriptor(descriptor)?,
        })
    }

    pub fn method_ref(
        &self,
        holder: TypeId,
        name: &str,
        descriptor: &str,
    ) -> Result<MethodRef, DescriptorError> {
        Ok(MethodRef::new(holder, self.method_sig(name, descriptor)?))
    }

    pub fn field_ref(
        &self,
        holder: TypeId,
        name: &str,
        descriptor: &str,
    ) -> Result<FieldRef, DescriptorError> {
        Ok(FieldRef::new(holder, self.field_sig(name, descriptor)?))
    }

    /// `Holder.name(desc)` rendering used in log output and error messages.
    pub fn display_method(&self, method: &MethodRef) -> String {
        format!(
            "{}.{}{}",
            self.type_name(method.holder),
            self.resolve_atom(method.sig.name),
            self.proto_descriptor(method.sig.proto)
        )
    }

    pub fn display_field(&self, field: &FieldRef) -> String {
        format!(
            "{}.{}:{}",
            self.type_name(field.holder),
            self.resolve_atom(field.sig.name),
            self.descriptor(field.sig.ty)
        )
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
