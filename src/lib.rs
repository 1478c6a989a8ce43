//! dexter: class-hierarchy model and member resolution for a whole-program
//! bytecode optimizer.
//!
//! The engine lives in [`dexter_graph`]; shared interning and limits in
//! [`dexter_common`]. This crate re-exports both and owns process-level
//! setup such as [`tracing_config::init_tracing`].

pub use dexter_common as common;
pub use dexter_graph as graph;

pub use dexter_graph::{
    AccessFlags, CacheStats, ClassDef, ClassKind, ClassStore, FieldDef, FieldRef, FieldSig,
    GraphError, GraphOptions, HierarchySnapshot, HierarchyStore, HierarchyView, MethodDef,
    MethodRef, MethodResolver, MethodSig, ResolutionResult, SingleResolution, TypeId,
    TypeInterner,
};

pub mod tracing_config;
