//! Method and field resolution (JVMS §5.4.3.2 - §5.4.3.4).
//!
//! `MethodResolver` is a thin borrow of a [`HierarchyView`]; every operation is
//! a deterministic function of the view, the holder and the signature.
//! [`crate::HierarchySnapshot`] is the production view and checks liveness
//! before handing itself to a resolver.

use crate::cache::MemberTable;
use crate::def::{ClassDef, FieldDef, MethodDef};
use crate::intern::TypeInterner;
use crate::maximally_specific::MaximallySpecificMethodsBuilder;
use crate::resolution::ResolutionResult;
use crate::types::{FieldRef, FieldSig, MethodRef, MethodSig, TypeId};
use dexter_common::Atom;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::{trace, warn};

/// What resolution needs from a hierarchy.
pub trait HierarchyView {
    fn interner(&self) -> &TypeInterner;

    /// Class definition of `ty`, or `None` when unknown.
    fn class_definition(&self, ty: TypeId) -> Option<Arc<ClassDef>>;

    /// Members declared by `ty`; empty when unknown.
    fn member_table(&self, ty: TypeId) -> Arc<MemberTable>;

    /// Bound on superclass links followed by one walk.
    fn max_hierarchy_depth(&self) -> u32;

    /// Method with exactly `sig` declared on `ty`.
    fn lookup_method(&self, ty: TypeId, sig: &MethodSig) -> Option<Arc<MethodDef>> {
        self.member_table(ty).method(sig).cloned()
    }

    /// Field with exactly `sig` declared on `ty`.
    fn lookup_field(&self, ty: TypeId, sig: &FieldSig) -> Option<Arc<FieldDef>> {
        self.member_table(ty).field(sig).cloned()
    }
}

pub struct MethodResolver<'v, V: HierarchyView + ?Sized> {
    view: &'v V,
}

impl<'v, V: HierarchyView + ?Sized> MethodResolver<'v, V> {
    pub const fn new(view: &'v V) -> Self {
        Self { view }
    }

    #[inline]
    fn is_array(&self, ty: TypeId) -> bool {
        self.view.interner().is_array(ty)
    }

    /// Resolve using the holder's own definition to choose between class and
    /// interface resolution, for formats that do not encode the reference kind.
    pub fn resolve_method_structural(&self, holder: TypeId, sig: MethodSig) -> ResolutionResult {
        if self.is_array(holder) {
            return self.resolve_method_on_array(sig);
        }
        let Some(class) = self.view.class_definition(holder) else {
            return ResolutionResult::ClassNotFound;
        };
        if class.is_interface() {
            self.resolve_method_on_interface_def(&class, sig)
        } else {
            self.resolve_method_on_class_def(&class, sig)
        }
    }

    /// Resolve as an interface method reference when `is_interface` is set,
    /// as a class method reference otherwise.
    pub fn resolve_method(
        &self,
        holder: TypeId,
        sig: MethodSig,
        is_interface: bool,
    ) -> ResolutionResult {
        if is_interface {
            self.resolve_method_on_interface(holder, sig)
        } else {
            self.resolve_method_on_class(holder, sig)
        }
    }

    /// Every method of an array type resolves on `java.lang.Object`, except
    /// `clone` which has no definition (JLS §10.7).
    fn resolve_method_on_array(&self, sig: MethodSig) -> ResolutionResult {
        let well_known = self.view.interner().well_known();
        if sig.name == well_known.clone_name {
            ResolutionResult::ArrayCloneMethod
        } else {
            self.resolve_method_on_class(well_known.object, sig)
        }
    }

    /// Class method resolution (JVMS §5.4.3.3).
    pub fn resolve_method_on_class(&self, holder: TypeId, sig: MethodSig) -> ResolutionResult {
        if self.is_array(holder) {
            return self.resolve_method_on_array(sig);
        }
        let Some(class) = self.view.class_definition(holder) else {
            return ResolutionResult::ClassNotFound;
        };
        // Step 1: an interface holder is an IncompatibleClassChangeError.
        if class.is_interface() {
            return ResolutionResult::incompatible_class();
        }
        self.resolve_method_on_class_def(&class, sig)
    }

    fn resolve_method_on_class_def(
        &self,
        class: &Arc<ClassDef>,
        sig: MethodSig,
    ) -> ResolutionResult {
        if let Some(result) = self.resolve_method_on_class_step2(class, sig) {
            return result;
        }
        self.resolve_method_step3(class, sig)
    }

    /// Walk the superclass chain looking for a signature-polymorphic method
    /// by name, then for an exact signature match.
    fn resolve_method_on_class_step2(
        &self,
        initial: &Arc<ClassDef>,
        sig: MethodSig,
    ) -> Option<ResolutionResult> {
        let holder = initial.ty;
        let max_depth = self.view.max_hierarchy_depth();
        let mut current = Arc::clone(initial);
        let mut depth = 0u32;
        loop {
            if let Some(method) = self.lookup_signature_polymorphic(&current, sig.name) {
                return Some(ResolutionResult::single(holder, current.ty, method));
            }
            if let Some(method) = self.view.lookup_method(current.ty, &sig) {
                if method.is_private() && current.ty != holder {
                    return Some(ResolutionResult::IllegalAccessOrNoSuchMethod { method });
                }
                return Some(ResolutionResult::single(holder, current.ty, method));
            }

            let super_class = current
                .super_type
                .and_then(|super_type| self.view.class_definition(super_type))?;
            depth += 1;
            if depth > max_depth {
                warn!(
                    type_id = holder.0,
                    max_depth, "superclass walk exceeded max hierarchy depth"
                );
                return None;
            }
            current = super_class;
        }
    }

    /// `MethodHandle` and `VarHandle` declare their signature-polymorphic
    /// methods once per name as `native varargs (Object[])`.
    fn lookup_signature_polymorphic(&self, class: &ClassDef, name: Atom) -> Option<Arc<MethodDef>> {
        let interner = self.view.interner();
        let well_known = interner.well_known();
        if class.ty != well_known.method_handle && class.ty != well_known.var_handle {
            return None;
        }
        let mut named = class.methods_named(name);
        let (Some(method), None) = (named.next(), named.next()) else {
            return None;
        };
        if !method.access_flags.is_varargs_native() {
            return None;
        }
        let proto = interner.lookup_proto(method.sig().proto)?;
        if proto.params.as_slice() != [well_known.object_array] {
            return None;
        }
        trace!(type_id = class.ty.0, "signature-polymorphic match");
        Some(Arc::clone(method))
    }

    fn resolve_method_step3(&self, class: &ClassDef, sig: MethodSig) -> ResolutionResult {
        let mut builder = MaximallySpecificMethodsBuilder::new(self.view, sig);
        builder.collect_from_class(class);
        builder.resolve(class.ty)
    }

    /// Interface method resolution (JVMS §5.4.3.4).
    pub fn resolve_method_on_interface(&self, holder: TypeId, sig: MethodSig) -> ResolutionResult {
        if self.is_array(holder) {
            return ResolutionResult::incompatible_class();
        }
        let Some(class) = self.view.class_definition(holder) else {
            return ResolutionResult::ClassNotFound;
        };
        if !class.is_interface() {
            return ResolutionResult::incompatible_class();
        }
        self.resolve_method_on_interface_def(&class, sig)
    }

    fn resolve_method_on_interface_def(
        &self,
        class: &ClassDef,
        sig: MethodSig,
    ) -> ResolutionResult {
        let holder = class.ty;
        if let Some(method) = self.view.lookup_method(holder, &sig) {
            return ResolutionResult::single(holder, holder, method);
        }

        // Interfaces inherit the public instance methods of java.lang.Object.
        let object = self.view.interner().well_known().object;
        if self.view.class_definition(object).is_none() {
            return ResolutionResult::ClassNotFound;
        }
        if let Some(method) = self.view.lookup_method(object, &sig) {
            if method.access_flags.is_public() && !method.is_abstract() {
                return ResolutionResult::single(holder, object, method);
            }
        }

        self.resolve_method_step3(class, sig)
    }

    /// Field resolution (JVMS §5.4.3.2): own fields, then direct
    /// superinterfaces in order, then the superclass. First match wins.
    pub fn resolve_field_on(&self, holder: TypeId, sig: FieldSig) -> Option<Arc<FieldDef>> {
        let mut searched = FxHashSet::default();
        self.resolve_field_in(holder, &sig, 0, &mut searched)
    }

    pub fn resolve_field(&self, field: &FieldRef) -> Option<Arc<FieldDef>> {
        self.resolve_field_on(field.holder, field.sig)
    }

    /// Types in `searched` were already explored without a match and are
    /// skipped.
    fn resolve_field_in(
        &self,
        ty: TypeId,
        sig: &FieldSig,
        depth: u32,
        searched: &mut FxHashSet<TypeId>,
    ) -> Option<Arc<FieldDef>> {
        let max_depth = self.view.max_hierarchy_depth();
        if depth > max_depth {
            warn!(
                type_id = ty.0,
                max_depth, "field resolution exceeded max hierarchy depth"
            );
            return None;
        }
        if !searched.insert(ty) {
            return None;
        }
        let class = self.view.class_definition(ty)?;
        if let Some(field) = self.view.lookup_field(ty, sig) {
            return Some(field);
        }
        for &iface in &class.interfaces {
            if let Some(field) = self.resolve_field_in(iface, sig, depth + 1, searched) {
                return Some(field);
            }
        }
        let super_type = class.super_type?;
        self.resolve_field_in(super_type, sig, depth + 1, searched)
    }

    /// Unique maximally-specific interface method for `sig` reachable from
    /// `class`, with the interface that declares it.
    pub fn lookup_maximally_specific_target(
        &self,
        class: TypeId,
        sig: MethodSig,
    ) -> Option<(TypeId, Arc<MethodDef>)> {
        let definition = self.view.class_definition(class)?;
        let mut builder = MaximallySpecificMethodsBuilder::new(self.view, sig);
        builder.collect_from_class(&definition);
        builder.lookup()
    }

    /// As [`Self::lookup_maximally_specific_target`] for a lambda class that
    /// extends `java.lang.Object` and implements `interfaces`.
    pub fn lookup_maximally_specific_target_for_lambda(
        &self,
        interfaces: &[TypeId],
        sig: MethodSig,
    ) -> Option<(TypeId, Arc<MethodDef>)> {
        let object = self.view.interner().well_known().object;
        let mut builder = MaximallySpecificMethodsBuilder::new(self.view, sig);
        builder.collect(Some(object), interfaces);
        builder.lookup()
    }

    /// Static method `method` declared on the program class `context`, when
    /// the reference names `context` itself.
    pub fn lookup_static_target_on_itself(
        &self,
        method: &MethodRef,
        context: TypeId,
    ) -> Option<Arc<MethodDef>> {
        self.lookup_direct_on_itself(method, context)
            .filter(|target| target.is_static())
    }

    /// Non-static direct method (private instance method or constructor)
    /// declared on the program class `context`, when the reference names
    /// `context` itself.
    pub fn lookup_direct_target_on_itself(
        &self,
        method: &MethodRef,
        context: TypeId,
    ) -> Option<Arc<MethodDef>> {
        self.lookup_direct_on_itself(method, context)
            .filter(|target| !target.is_static())
    }

    fn lookup_direct_on_itself(
        &self,
        method: &MethodRef,
        context: TypeId,
    ) -> Option<Arc<MethodDef>> {
        if method.holder != context {
            return None;
        }
        let class = self.view.class_definition(context)?;
        if !class.kind.is_program() {
            return None;
        }
        let target = self.view.lookup_method(context, &method.sig)?;
        self.is_direct(&target).then_some(target)
    }

    /// Static, private and initializer methods are dispatched directly.
    fn is_direct(&self, method: &MethodDef) -> bool {
        let well_known = self.view.interner().well_known();
        method.is_static()
            || method.is_private()
            || method.name() == well_known.init_name
            || method.name() == well_known.clinit_name
    }
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
