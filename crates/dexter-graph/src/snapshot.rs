//! Generation-tagged hierarchy snapshots.
//!
//! Every snapshot derived from the same root shares one [`SnapshotGeneration`]
//! counter and remembers the generation it was created at. A snapshot is live
//! while the counter still equals its own generation; deriving a successor
//! advances the counter, which makes the predecessor obsolete without touching
//! it. Querying an obsolete snapshot is a programming error and panics.
//!
//! A successor starts from a copy of its predecessor's synthesized classes and
//! definition cache, minus the entries of the types reported as changed.

use crate::cache::{CacheStats, DefinitionCache, MemberTable};
use crate::def::{ClassDef, FieldDef, MethodDef};
use crate::error::GraphError;
use crate::intern::TypeInterner;
use crate::options::GraphOptions;
use crate::query_trace;
use crate::resolution::ResolutionResult;
use crate::resolver::{HierarchyView, MethodResolver};
use crate::store::HierarchyStore;
use crate::types::{FieldRef, FieldSig, MethodRef, MethodSig, TypeId};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Shared generation counter of a snapshot lineage.
#[derive(Clone, Debug)]
pub struct SnapshotGeneration(Arc<AtomicU64>);

impl Default for SnapshotGeneration {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotGeneration {
    pub const FIRST: u64 = 1;

    pub fn new() -> Self {
        Self(Arc::new(AtomicU64::new(Self::FIRST)))
    }

    #[inline]
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Advance from `from` to `from + 1`. Fails with the current generation
    /// when `from` is no longer current.
    fn advance(&self, from: u64) -> Result<u64, u64> {
        self.0
            .compare_exchange(from, from + 1, Ordering::AcqRel, Ordering::Acquire)
            .map(|previous| previous + 1)
    }
}

pub struct HierarchySnapshot {
    generation: SnapshotGeneration,
    id: u64,
    interner: Arc<TypeInterner>,
    store: Arc<dyn HierarchyStore>,
    synthesized: DashMap<TypeId, Arc<ClassDef>, FxBuildHasher>,
    cache: DefinitionCache,
    options: Arc<GraphOptions>,
}

impl HierarchySnapshot {
    pub fn new(interner: Arc<TypeInterner>, store: Arc<dyn HierarchyStore>) -> Self {
        Self::with_options(interner, store, GraphOptions::default())
    }

    pub fn with_options(
        interner: Arc<TypeInterner>,
        store: Arc<dyn HierarchyStore>,
        options: GraphOptions,
    ) -> Self {
        let generation = SnapshotGeneration::new();
        let id = generation.current();
        debug!(generation = id, "HierarchySnapshot::new");
        Self {
            generation,
            id,
            interner,
            store,
            synthesized: DashMap::with_hasher(FxBuildHasher),
            cache: DefinitionCache::new(),
            options: Arc::new(options),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Generation this snapshot was created at.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn is_obsolete(&self) -> bool {
        self.generation.current() != self.id
    }

    /// Panics if a successor has been derived from this snapshot.
    #[track_caller]
    pub fn check_live(&self) {
        let current = self.generation.current();
        if current != self.id {
            panic!(
                "hierarchy snapshot of generation {} queried after generation {} superseded it",
                self.id, current
            );
        }
    }

    #[track_caller]
    fn live(&self) -> LiveSnapshot<'_> {
        self.check_live();
        LiveSnapshot {
            snapshot: self,
            misses: Cell::new(0),
        }
    }

    /// Derive the successor snapshot over the same store. `changed` lists the
    /// types whose definitions changed since this snapshot was created.
    #[track_caller]
    pub fn new_snapshot(&self, changed: &[TypeId]) -> HierarchySnapshot {
        self.new_snapshot_with_store(Arc::clone(&self.store), changed)
    }

    /// Derive the successor snapshot over `store`, which replaces this
    /// snapshot's store (for example after a global renaming).
    #[track_caller]
    pub fn new_snapshot_with_store(
        &self,
        store: Arc<dyn HierarchyStore>,
        changed: &[TypeId],
    ) -> HierarchySnapshot {
        self.check_live();

        let synthesized = self.synthesized.clone();
        let cache = self.cache.fork();
        for &ty in changed {
            cache.invalidate(ty);
        }

        let next = match self.generation.advance(self.id) {
            Ok(next) => next,
            Err(current) => panic!(
                "hierarchy snapshot of generation {} already has a successor (current generation {})",
                self.id, current
            ),
        };
        debug!(
            from_generation = self.id,
            to_generation = next,
            changed = changed.len(),
            cached_types = cache.len(),
            synthesized = synthesized.len(),
            "HierarchySnapshot::new_snapshot"
        );
        if self.options.query_tracing && query_trace::enabled() {
            query_trace::snapshot_derived(self.id, next, changed.len());
        }

        HierarchySnapshot {
            generation: self.generation.clone(),
            id: next,
            interner: Arc::clone(&self.interner),
            store,
            synthesized,
            cache,
            options: Arc::clone(&self.options),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn interner(&self) -> &Arc<TypeInterner> {
        &self.interner
    }

    pub fn store(&self) -> &Arc<dyn HierarchyStore> {
        &self.store
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    fn lookup_class(&self, ty: TypeId) -> Option<Arc<ClassDef>> {
        if let Some(class) = self.synthesized.get(&ty) {
            return Some(Arc::clone(class.value()));
        }
        self.store.definition_for(ty)
    }

    /// Class definition of `ty`; synthesized classes take precedence over the
    /// store.
    #[track_caller]
    pub fn definition_for(&self, ty: TypeId) -> Option<Arc<ClassDef>> {
        self.check_live();
        self.lookup_class(ty)
    }

    /// Declared method matching the reference's holder and signature.
    #[track_caller]
    pub fn definition_for_method(&self, method: &MethodRef) -> Option<Arc<MethodDef>> {
        self.live().lookup_method(method.holder, &method.sig)
    }

    #[track_caller]
    pub fn definition_for_field(&self, field: &FieldRef) -> Option<Arc<FieldDef>> {
        self.live().lookup_field(field.holder, &field.sig)
    }

    /// Member table of `ty` from the definition cache.
    #[track_caller]
    pub fn members(&self, ty: TypeId) -> Arc<MemberTable> {
        self.live().member_table(ty)
    }

    /// Drop the cached members of `ty` after its member set changed in place.
    #[track_caller]
    pub fn invalidate(&self, ty: TypeId) -> bool {
        self.check_live();
        self.cache.invalidate(ty)
    }

    /// Make a class created by the optimizer visible in this snapshot.
    ///
    /// Adding the same definition twice is a no-op.
    #[track_caller]
    pub fn add_synthesized_class(&self, class: ClassDef) -> Result<(), GraphError> {
        self.check_live();
        let ty = class.ty;
        if self.store.contains(ty) {
            return Err(GraphError::DuplicateClass {
                ty,
                descriptor: self.interner.descriptor(ty),
            });
        }
        match self.synthesized.entry(ty) {
            Entry::Occupied(existing) => {
                if **existing.get() != class {
                    return Err(GraphError::ConflictingSynthesizedClass {
                        ty,
                        descriptor: self.interner.descriptor(ty),
                    });
                }
                return Ok(());
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(class));
            }
        }
        debug!(
            generation = self.id,
            type_id = ty.0,
            "HierarchySnapshot::add_synthesized_class"
        );
        self.cache.invalidate(ty);
        Ok(())
    }

    /// Synthesized classes ordered by type descriptor.
    #[track_caller]
    pub fn synthesized_classes(&self) -> Vec<Arc<ClassDef>> {
        self.check_live();
        let mut classes: Vec<_> = self
            .synthesized
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        classes.sort_by_cached_key(|class| self.interner.descriptor(class.ty));
        classes
    }

    /// Store classes ordered by `TypeId`.
    #[track_caller]
    pub fn classes(&self) -> Vec<Arc<ClassDef>> {
        self.check_live();
        self.store.classes()
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Run one resolution query, emitting start/end trace events when query
    /// tracing is on. The cache outcome comes from the misses `live` itself
    /// recorded, so queries on other threads do not blur it.
    fn traced(
        &self,
        op: &'static str,
        holder: TypeId,
        live: &LiveSnapshot<'_>,
        run: impl FnOnce(&LiveSnapshot<'_>) -> ResolutionResult,
    ) -> ResolutionResult {
        if !(self.options.query_tracing && query_trace::enabled()) {
            return run(live);
        }
        let query_id = query_trace::next_query_id();
        let misses_before = live.misses();
        query_trace::member_start(query_id, op, holder, self.id);
        let result = run(live);
        let cache_misses = live.misses() - misses_before;
        query_trace::member_end(query_id, op, result.kind_name(), cache_misses);
        result
    }

    #[track_caller]
    pub fn resolve_method_on_class(&self, holder: TypeId, sig: MethodSig) -> ResolutionResult {
        let live = self.live();
        self.traced("resolve_method_on_class", holder, &live, |live| {
            MethodResolver::new(live).resolve_method_on_class(holder, sig)
        })
    }

    #[track_caller]
    pub fn resolve_method_on_interface(&self, holder: TypeId, sig: MethodSig) -> ResolutionResult {
        let live = self.live();
        self.traced("resolve_method_on_interface", holder, &live, |live| {
            MethodResolver::new(live).resolve_method_on_interface(holder, sig)
        })
    }

    /// Resolve with an explicit kind hint, for formats that do not record
    /// whether a reference is an interface method reference.
    #[track_caller]
    pub fn resolve_method(
        &self,
        holder: TypeId,
        sig: MethodSig,
        is_interface: bool,
    ) -> ResolutionResult {
        let live = self.live();
        self.traced("resolve_method", holder, &live, |live| {
            MethodResolver::new(live).resolve_method(holder, sig, is_interface)
        })
    }

    /// Resolve choosing the kind from the holder's own definition.
    #[track_caller]
    pub fn resolve_method_structural(&self, holder: TypeId, sig: MethodSig) -> ResolutionResult {
        let live = self.live();
        self.traced("resolve_method_structural", holder, &live, |live| {
            MethodResolver::new(live).resolve_method_structural(holder, sig)
        })
    }

    #[track_caller]
    pub fn resolve_field_on(&self, holder: TypeId, sig: FieldSig) -> Option<Arc<FieldDef>> {
        let live = self.live();
        MethodResolver::new(&live).resolve_field_on(holder, sig)
    }

    /// Resolve a field reference against its own holder.
    #[track_caller]
    pub fn resolve_field(&self, field: &FieldRef) -> Option<Arc<FieldDef>> {
        let live = self.live();
        MethodResolver::new(&live).resolve_field(field)
    }

    #[track_caller]
    pub fn lookup_maximally_specific_target(
        &self,
        class: TypeId,
        sig: MethodSig,
    ) -> Option<(TypeId, Arc<MethodDef>)> {
        let live = self.live();
        MethodResolver::new(&live).lookup_maximally_specific_target(class, sig)
    }

    #[track_caller]
    pub fn lookup_maximally_specific_target_for_lambda(
        &self,
        interfaces: &[TypeId],
        sig: MethodSig,
    ) -> Option<(TypeId, Arc<MethodDef>)> {
        let live = self.live();
        MethodResolver::new(&live).lookup_maximally_specific_target_for_lambda(interfaces, sig)
    }

    #[track_caller]
    pub fn lookup_static_target_on_itself(
        &self,
        method: &MethodRef,
        context: TypeId,
    ) -> Option<Arc<MethodDef>> {
        let live = self.live();
        MethodResolver::new(&live).lookup_static_target_on_itself(method, context)
    }

    #[track_caller]
    pub fn lookup_direct_target_on_itself(
        &self,
        method: &MethodRef,
        context: TypeId,
    ) -> Option<Arc<MethodDef>> {
        let live = self.live();
        MethodResolver::new(&live).lookup_direct_target_on_itself(method, context)
    }
}

/// A snapshot that passed its liveness check.
///
/// Each query gets its own `LiveSnapshot`, which counts the member-table
/// misses that query caused.
struct LiveSnapshot<'s> {
    snapshot: &'s HierarchySnapshot,
    misses: Cell<u32>,
}

impl LiveSnapshot<'_> {
    #[inline]
    fn misses(&self) -> u32 {
        self.misses.get()
    }
}

impl HierarchyView for LiveSnapshot<'_> {
    fn interner(&self) -> &TypeInterner {
        &self.snapshot.interner
    }

    fn class_definition(&self, ty: TypeId) -> Option<Arc<ClassDef>> {
        self.snapshot.lookup_class(ty)
    }

    fn member_table(&self, ty: TypeId) -> Arc<MemberTable> {
        self.snapshot.cache.members(ty, |ty| {
            self.misses.set(self.misses.get().saturating_add(1));
            self.snapshot.lookup_class(ty)
        })
    }

    fn max_hierarchy_depth(&self) -> u32 {
        self.snapshot.options.max_hierarchy_depth
    }

    /// A method flagged obsolete by a code-replacement pass causes one
    /// re-fetch of its holder's members.
    fn lookup_method(&self, ty: TypeId, sig: &MethodSig) -> Option<Arc<MethodDef>> {
        let method = self.member_table(ty).method(sig).cloned()?;
        if !method.is_obsolete() {
            return Some(method);
        }
        debug!(type_id = ty.0, "stale method definition, re-fetching members");
        self.snapshot.cache.invalidate(ty);
        self.member_table(ty).method(sig).cloned()
    }
}

#[cfg(test)]
#[path = "../tests/snapshot_tests.rs"]
mod tests;
