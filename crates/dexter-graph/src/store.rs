//! Hierarchy store: the type → class definition mapping.
//!
//! The optimizer's application model implements [`HierarchyStore`]; this crate
//! only needs point lookups. [`ClassStore`] is a concurrent in-memory
//! implementation used by callers that build the hierarchy directly.

use crate::def::ClassDef;
use crate::error::GraphError;
use crate::intern::TypeInterner;
use crate::types::TypeId;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Point lookups of class definitions by type.
pub trait HierarchyStore: Send + Sync {
    fn definition_for(&self, ty: TypeId) -> Option<Arc<ClassDef>>;

    /// Every class in the store, ordered by `TypeId`.
    fn classes(&self) -> Vec<Arc<ClassDef>>;

    fn contains(&self, ty: TypeId) -> bool {
        self.definition_for(ty).is_some()
    }
}

/// Thread-safe in-memory [`HierarchyStore`].
pub struct ClassStore {
    /// Unique instance ID for debugging
    instance_id: u64,
    classes: DashMap<TypeId, Arc<ClassDef>, FxBuildHasher>,
}

impl Default for ClassStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassStore {
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "ClassStore::new - creating new instance");
        Self {
            instance_id,
            classes: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Build a store from definitions, rejecting duplicates.
    pub fn from_classes(
        interner: &TypeInterner,
        classes: impl IntoIterator<Item = ClassDef>,
    ) -> Result<Self, GraphError> {
        let store = Self::new();
        for class in classes {
            store.insert(interner, class)?;
        }
        Ok(store)
    }

    /// Add a class that is not yet defined.
    pub fn insert(
        &self,
        interner: &TypeInterner,
        class: ClassDef,
    ) -> Result<Arc<ClassDef>, GraphError> {
        let ty = class.ty;
        match self.classes.entry(ty) {
            Entry::Occupied(_) => Err(GraphError::DuplicateClass {
                ty,
                descriptor: interner.descriptor(ty),
            }),
            Entry::Vacant(slot) => {
                trace!(
                    instance_id = self.instance_id,
                    type_id = ty.0,
                    methods = class.methods.len(),
                    fields = class.fields.len(),
                    "ClassStore::insert"
                );
                let class = Arc::new(class);
                slot.insert(Arc::clone(&class));
                Ok(class)
            }
        }
    }

    /// Publish a new definition for a type, returning the one it replaces.
    ///
    /// Snapshots that cached members of the old definition must be told about
    /// the change (`HierarchySnapshot::new_snapshot` or `invalidate`).
    pub fn replace(&self, class: ClassDef) -> Option<Arc<ClassDef>> {
        trace!(
            instance_id = self.instance_id,
            type_id = class.ty.0,
            "ClassStore::replace"
        );
        self.classes.insert(class.ty, Arc::new(class))
    }

    pub fn remove(&self, ty: TypeId) -> Option<Arc<ClassDef>> {
        self.classes.remove(&ty).map(|(_, class)| class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl HierarchyStore for ClassStore {
    fn definition_for(&self, ty: TypeId) -> Option<Arc<ClassDef>> {
        self.classes.get(&ty).map(|entry| Arc::clone(entry.value()))
    }

    fn classes(&self) -> Vec<Arc<ClassDef>> {
        let mut classes: Vec<_> = self
            .classes
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        classes.sort_by_key(|class| class.ty);
        classes
    }

    fn contains(&self, ty: TypeId) -> bool {
        self.classes.contains_key(&ty)
    }
}

#[cfg(test)]
#[path = "../tests/store_tests.rs"]
mod tests;
