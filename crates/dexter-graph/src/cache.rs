//! Definition cache: per-type member tables.
//!
//! Each entry maps the member signatures a type declares to their definitions.
//! Entries are computed on first use from the class definition and are never
//! mutated afterwards; a changed member set replaces the whole entry after
//! [`DefinitionCache::invalidate`].
//!
//! Population is racy by design of the `DashMap` entry API: concurrent misses
//! on the same type may each build a table, the first insert wins, and every
//! caller returns the winning table.

use crate::def::{ClassDef, FieldDef, MemberDef, MethodDef};
use crate::types::{FieldSig, MemberKey, MethodSig, TypeId};
use dashmap::DashMap;
use dexter_common::limits::MEMBER_TABLE_INITIAL_CAPACITY;
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Members declared by one type, keyed by signature.
#[derive(Debug, Default)]
pub struct MemberTable {
    members: FxHashMap<MemberKey, MemberDef>,
}

impl MemberTable {
    /// Table for a type with no definition.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_class(class: &ClassDef) -> Self {
        let capacity =
            (class.methods.len() + class.fields.len()).max(MEMBER_TABLE_INITIAL_CAPACITY);
        let mut members = FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher);
        for method in &class.methods {
            members
                .entry(MemberKey::Method(method.sig()))
                .or_insert_with(|| MemberDef::Method(Arc::clone(method)));
        }
        for field in &class.fields {
            members
                .entry(MemberKey::Field(field.sig()))
                .or_insert_with(|| MemberDef::Field(Arc::clone(field)));
        }
        Self { members }
    }

    pub fn get(&self, key: &MemberKey) -> Option<&MemberDef> {
        self.members.get(key)
    }

    pub fn method(&self, sig: &MethodSig) -> Option<&Arc<MethodDef>> {
        self.members
            .get(&MemberKey::Method(*sig))
            .and_then(MemberDef::as_method)
    }

    pub fn field(&self, sig: &FieldSig) -> Option<&Arc<FieldDef>> {
        self.members
            .get(&MemberKey::Field(*sig))
            .and_then(MemberDef::as_field)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MemberKey, &MemberDef)> {
        self.members.iter()
    }
}

/// Counters describing cache effectiveness.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub entries: usize,
}

/// Concurrently readable per-type member tables.
pub struct DefinitionCache {
    entries: DashMap<TypeId, Arc<MemberTable>, FxBuildHasher>,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
}

impl Default for DefinitionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuildHasher),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    /// Member table of `ty`, computing it from `lookup` on a miss.
    ///
    /// An absent class yields an empty table; existence is checked by the
    /// caller through the class lookup itself.
    pub fn members<F>(&self, ty: TypeId, lookup: F) -> Arc<MemberTable>
    where
        F: FnOnce(TypeId) -> Option<Arc<ClassDef>>,
    {
        if let Some(entry) = self.entries.get(&ty) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(entry.value());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        // Built outside any map lock; losing a race only wastes this table.
        let table = match lookup(ty) {
            Some(class) => MemberTable::from_class(&class),
            None => MemberTable::empty(),
        };
        trace!(type_id = ty.0, members = table.len(), "DefinitionCache::populate");

        let entry = self.entries.entry(ty).or_insert(Arc::new(table));
        Arc::clone(entry.value())
    }

    /// Cached table without populating.
    pub fn get(&self, ty: TypeId) -> Option<Arc<MemberTable>> {
        self.entries.get(&ty).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop exactly the entry for `ty`. Returns whether one was present.
    pub fn invalidate(&self, ty: TypeId) -> bool {
        let removed = self.entries.remove(&ty).is_some();
        if removed {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
            trace!(type_id = ty.0, "DefinitionCache::invalidate");
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, ty: TypeId) -> bool {
        self.entries.contains_key(&ty)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }

    /// Copy of every entry for a successor snapshot. Tables are shared, the
    /// counters start from zero.
    pub fn fork(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            ..Self::new()
        }
    }
}

#[cfg(test)]
#[path = "../tests/cache_tests.rs"]
mod tests;
