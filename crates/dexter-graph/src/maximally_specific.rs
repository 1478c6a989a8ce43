//! Maximally-specific superinterface method selection (JVMS §5.4.3.3 step 3).
//!
//! The builder walks the superinterfaces reachable from a starting class or
//! interface and records, per interface, either the candidate method it
//! declares or a `Shadowed` marker when a more specific interface already
//! contributed a candidate for the same signature. The map is
//! insertion-ordered so ties between abstract candidates break the same way
//! on every run.

use crate::def::{ClassDef, MethodDef};
use crate::resolution::ResolutionResult;
use crate::resolver::HierarchyView;
use crate::types::{MethodSig, TypeId};
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{trace, warn};

#[derive(Clone, Debug)]
enum Slot {
    Candidate(Arc<MethodDef>),
    /// A subinterface declares the method; nothing recorded here may win.
    Shadowed,
}

enum Selection {
    Empty,
    One(TypeId, Arc<MethodDef>),
    Conflict(Vec<Arc<MethodDef>>),
}

pub struct MaximallySpecificMethodsBuilder<'v, V: HierarchyView + ?Sized> {
    view: &'v V,
    sig: MethodSig,
    slots: IndexMap<TypeId, Slot, FxBuildHasher>,
    /// Interfaces whose superinterfaces were already searched.
    visited: FxHashSet<TypeId>,
}

impl<'v, V: HierarchyView + ?Sized> MaximallySpecificMethodsBuilder<'v, V> {
    pub fn new(view: &'v V, sig: MethodSig) -> Self {
        Self {
            view,
            sig,
            slots: IndexMap::with_hasher(FxBuildHasher),
            visited: FxHashSet::default(),
        }
    }

    /// Search the interfaces of `class` and of each of its superclasses.
    pub fn collect_from_class(&mut self, class: &ClassDef) {
        self.collect(class.super_type, &class.interfaces);
    }

    /// Search `interfaces` in declaration order, then the interfaces of
    /// `super_type` and its superclasses.
    pub fn collect(&mut self, super_type: Option<TypeId>, interfaces: &[TypeId]) {
        self.collect_interfaces(interfaces);

        let max_depth = self.view.max_hierarchy_depth();
        let mut next = super_type;
        let mut depth = 0u32;
        while let Some(ty) = next {
            if depth >= max_depth {
                warn!(
                    type_id = ty.0,
                    max_depth, "superclass walk exceeded max hierarchy depth"
                );
                break;
            }
            let Some(class) = self.view.class_definition(ty) else {
                break;
            };
            self.collect_interfaces(&class.interfaces);
            next = class.super_type;
            depth += 1;
        }
    }

    fn collect_interfaces(&mut self, interfaces: &[TypeId]) {
        for &iface in interfaces {
            let Some(definition) = self.view.class_definition(iface) else {
                // Missing interfaces are ignored.
                continue;
            };
            match self.view.lookup_method(iface, &self.sig) {
                Some(method) if is_candidate(&method) => {
                    self.add_candidate(&definition, method);
                }
                _ => {
                    if self.visited.insert(iface) {
                        self.collect(definition.super_type, &definition.interfaces);
                    }
                }
            }
        }
    }

    /// Record `method` for `holder` unless the interface is already recorded,
    /// then shadow every superinterface of `holder`.
    pub fn add_candidate(&mut self, holder: &ClassDef, method: Arc<MethodDef>) {
        if self.slots.contains_key(&holder.ty) {
            return;
        }
        trace!(type_id = holder.ty.0, "MaximallySpecificMethodsBuilder::add_candidate");
        self.slots.insert(holder.ty, Slot::Candidate(method));
        for &iface in &holder.interfaces {
            self.mark_shadowed(iface);
        }
    }

    fn mark_shadowed(&mut self, ty: TypeId) {
        let Some(definition) = self.view.class_definition(ty) else {
            return;
        };
        if matches!(self.slots.get(&ty), Some(Slot::Shadowed)) {
            return;
        }
        // Overwrites an earlier candidate in place, keeping its position.
        self.slots.insert(ty, Slot::Shadowed);
        for &iface in &definition.interfaces {
            self.mark_shadowed(iface);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_candidate(&self, ty: TypeId) -> bool {
        matches!(self.slots.get(&ty), Some(Slot::Candidate(_)))
    }

    pub fn is_shadowed(&self, ty: TypeId) -> bool {
        matches!(self.slots.get(&ty), Some(Slot::Shadowed))
    }

    /// Candidate holders in insertion order, shadowed entries excluded.
    pub fn candidate_holders(&self) -> Vec<TypeId> {
        self.slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Candidate(_)))
            .map(|(ty, _)| *ty)
            .collect()
    }

    fn select(&self) -> Selection {
        let mut first = None;
        let mut non_abstract: SmallVec<[(TypeId, &Arc<MethodDef>); 2]> = SmallVec::new();
        for (&ty, slot) in &self.slots {
            let Slot::Candidate(method) = slot else {
                continue;
            };
            if first.is_none() {
                first = Some((ty, method));
            }
            if method.is_non_abstract_virtual() {
                non_abstract.push((ty, method));
            }
        }
        match non_abstract.as_slice() {
            // Abstract candidates are interchangeable; take the first recorded.
            [] => match first {
                Some((ty, method)) => Selection::One(ty, Arc::clone(method)),
                None => Selection::Empty,
            },
            [(ty, method)] => Selection::One(*ty, Arc::clone(method)),
            conflicting => Selection::Conflict(
                conflicting
                    .iter()
                    .map(|(_, method)| Arc::clone(method))
                    .collect(),
            ),
        }
    }

    /// Resolution result for a reference whose symbolic holder is
    /// `initial_holder`.
    pub fn resolve(&self, initial_holder: TypeId) -> ResolutionResult {
        match self.select() {
            Selection::Empty => ResolutionResult::NoSuchMethod,
            Selection::One(ty, method) => ResolutionResult::single(initial_holder, ty, method),
            Selection::Conflict(conflicting) => {
                ResolutionResult::IncompatibleClass { conflicting }
            }
        }
    }

    /// Target lookup outside of resolution: the unique selected method and
    /// the interface declaring it, if there is one.
    pub fn lookup(&self) -> Option<(TypeId, Arc<MethodDef>)> {
        match self.select() {
            Selection::One(ty, method) => Some((ty, method)),
            Selection::Empty | Selection::Conflict(_) => None,
        }
    }
}

/// Neither private nor static.
#[inline]
fn is_candidate(method: &MethodDef) -> bool {
    !method.is_private() && !method.is_static()
}

#[cfg(test)]
#[path = "../tests/maximally_specific_tests.rs"]
mod tests;
