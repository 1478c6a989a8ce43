//! Class and member definitions.
//!
//! A `ClassDef` is immutable once published into a store or synthesized into a
//! snapshot. Changing a class means building a new `ClassDef` value and
//! publishing it in its place; member tables cached for the old value are then
//! evicted per type.
//!
//! The one exception is the obsolete marker on `MethodDef`: a code-replacement
//! pass may flag a method it has superseded, and readers that find a flagged
//! method re-fetch the holder's members once.

use crate::flags::{AccessFlags, ClassKind};
use crate::types::{FieldRef, FieldSig, MethodRef, MethodSig, TypeId};
use dexter_common::Atom;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Opaque handle to a method body owned by the IR layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CodeRef(pub u32);

/// Opaque handle to a static field's constant value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ValueRef(pub u32);

// =============================================================================
// Methods
// =============================================================================

#[derive(Debug)]
pub struct MethodDef {
    pub method: MethodRef,
    pub access_flags: AccessFlags,
    pub code: Option<CodeRef>,
    obsolete: AtomicBool,
}

impl MethodDef {
    pub fn new(method: MethodRef, access_flags: AccessFlags) -> Self {
        Self {
            method,
            access_flags,
            code: None,
            obsolete: AtomicBool::new(false),
        }
    }

    pub fn with_code(mut self, code: CodeRef) -> Self {
        self.code = Some(code);
        self
    }

    #[inline]
    pub fn holder(&self) -> TypeId {
        self.method.holder
    }

    #[inline]
    pub fn sig(&self) -> MethodSig {
        self.method.sig
    }

    #[inline]
    pub fn name(&self) -> Atom {
        self.method.sig.name
    }

    #[inline]
    pub fn is_private(&self) -> bool {
        self.access_flags.is_private()
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.access_flags.is_static()
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.access_flags.is_abstract()
    }

    /// Non-abstract instance method that takes part in virtual dispatch.
    #[inline]
    pub fn is_non_abstract_virtual(&self) -> bool {
        !self.access_flags.intersects(
            AccessFlags::ABSTRACT
                .union(AccessFlags::STATIC)
                .union(AccessFlags::PRIVATE),
        )
    }

    /// Mark this definition as superseded by a code-replacement pass.
    pub fn mark_obsolete(&self) {
        self.obsolete.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_obsolete(&self) -> bool {
        self.obsolete.load(Ordering::Acquire)
    }
}

impl Clone for MethodDef {
    /// Clones produce a live definition; the obsolete marker is per instance.
    fn clone(&self) -> Self {
        Self {
            method: self.method,
            access_flags: self.access_flags,
            code: self.code,
            obsolete: AtomicBool::new(false),
        }
    }
}

impl PartialEq for MethodDef {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method
            && self.access_flags == other.access_flags
            && self.code == other.code
    }
}

impl Eq for MethodDef {}

// =============================================================================
// Fields
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub field: FieldRef,
    pub access_flags: AccessFlags,
    pub static_value: Option<ValueRef>,
}

impl FieldDef {
    pub const fn new(field: FieldRef, access_flags: AccessFlags) -> Self {
        Self {
            field,
            access_flags,
            static_value: None,
        }
    }

    pub const fn with_static_value(mut self, value: ValueRef) -> Self {
        self.static_value = Some(value);
        self
    }

    #[inline]
    pub fn holder(&self) -> TypeId {
        self.field.holder
    }

    #[inline]
    pub fn sig(&self) -> FieldSig {
        self.field.sig
    }
}

/// A declared member: method or field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberDef {
    Method(Arc<MethodDef>),
    Field(Arc<FieldDef>),
}

impl MemberDef {
    pub fn as_method(&self) -> Option<&Arc<MethodDef>> {
        match self {
            MemberDef::Method(method) => Some(method),
            MemberDef::Field(_) => None,
        }
    }

    pub fn as_field(&self) -> Option<&Arc<FieldDef>> {
        match self {
            MemberDef::Field(field) => Some(field),
            MemberDef::Method(_) => None,
        }
    }

    pub fn holder(&self) -> TypeId {
        match self {
            MemberDef::Method(method) => method.holder(),
            MemberDef::Field(field) => field.holder(),
        }
    }
}

// =============================================================================
// Classes
// =============================================================================

/// Definition of a class or interface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDef {
    pub ty: TypeId,
    /// `None` only for `java.lang.Object`.
    pub super_type: Option<TypeId>,
    /// Directly implemented (or, for interfaces, extended) interfaces in
    /// declaration order.
    pub interfaces: Vec<TypeId>,
    pub access_flags: AccessFlags,
    pub kind: ClassKind,
    pub methods: Vec<Arc<MethodDef>>,
    pub fields: Vec<Arc<FieldDef>>,
}

impl ClassDef {
    /// A public program class extending `super_type`.
    pub fn class(ty: TypeId, super_type: Option<TypeId>) -> Self {
        Self {
            ty,
            super_type,
            interfaces: Vec::new(),
            access_flags: AccessFlags::PUBLIC,
            kind: ClassKind::Program,
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// A public interface. Interfaces always have `java.lang.Object` as
    /// their super type.
    pub fn interface(ty: TypeId) -> Self {
        Self {
            access_flags: AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ABSTRACT,
            ..Self::class(ty, Some(TypeId::OBJECT))
        }
    }

    pub fn with_interfaces(mut self, interfaces: impl IntoIterator<Item = TypeId>) -> Self {
        self.interfaces.extend(interfaces);
        self
    }

    pub fn with_access_flags(mut self, access_flags: AccessFlags) -> Self {
        self.access_flags = access_flags;
        self
    }

    pub fn with_kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    /// Declare a method on this class; the reference's holder is rewritten to
    /// this class.
    pub fn with_method(mut self, sig: MethodSig, access_flags: AccessFlags) -> Self {
        self.methods
            .push(Arc::new(MethodDef::new(MethodRef::new(self.ty, sig), access_flags)));
        self
    }

    pub fn with_method_def(mut self, method: MethodDef) -> Self {
        self.methods.push(Arc::new(method));
        self
    }

    pub fn with_field(mut self, sig: FieldSig, access_flags: AccessFlags) -> Self {
        self.fields
            .push(Arc::new(FieldDef::new(FieldRef::new(self.ty, sig), access_flags)));
        self
    }

    pub fn with_field_def(mut self, field: FieldDef) -> Self {
        self.fields.push(Arc::new(field));
        self
    }

    #[inline]
    pub const fn is_interface(&self) -> bool {
        self.access_flags.is_interface()
    }

    /// Declared method with exactly this signature.
    pub fn lookup_method(&self, sig: &MethodSig) -> Option<&Arc<MethodDef>> {
        self.methods.iter().find(|m| m.method.sig == *sig)
    }

    pub fn lookup_field(&self, sig: &FieldSig) -> Option<&Arc<FieldDef>> {
        self.fields.iter().find(|f| f.field.sig == *sig)
    }

    pub fn methods_named(&self, name: Atom) -> impl Iterator<Item = &Arc<MethodDef>> {
        self.methods.iter().filter(move |m| m.name() == name)
    }
}

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
