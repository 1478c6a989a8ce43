//! Class-hierarchy model and member resolution engine.
//!
//! Given a symbolic member reference (holder type, name, descriptor) and a
//! hierarchy snapshot, this crate computes what the JVM resolves the reference
//! to:
//!
//! - **Class method resolution**: superclass walk with signature-polymorphic
//!   priority and the private-member access rule, then the
//!   maximally-specific superinterface search
//! - **Interface method resolution**: own methods, public `java.lang.Object`
//!   methods, then the maximally-specific search
//! - **Array methods**: `clone` is special, everything else is `Object`'s
//! - **Field resolution**: own fields, superinterfaces, superclass
//!
//! Key properties:
//! - O(1) type and signature equality via interning (`TypeId`, `MethodSig`)
//! - Per-type member tables cached in a `DashMap`, invalidated per type
//! - Generation-tagged snapshots; querying a superseded snapshot panics

pub mod cache;
pub mod def;
pub mod descriptor;
pub mod error;
pub mod flags;
mod intern;
pub mod maximally_specific;
pub mod options;
mod query_trace;
pub mod resolution;
pub mod resolver;
pub mod snapshot;
pub mod store;
pub mod types;

pub use cache::{CacheStats, DefinitionCache, MemberTable};
pub use def::{ClassDef, CodeRef, FieldDef, MemberDef, MethodDef, ValueRef};
pub use descriptor::DescriptorError;
pub use error::GraphError;
pub use flags::{AccessFlags, ClassKind};
pub use intern::{TypeInterner, WellKnown};
pub use maximally_specific::MaximallySpecificMethodsBuilder;
pub use options::GraphOptions;
pub use resolution::{ResolutionResult, SingleResolution};
pub use resolver::{HierarchyView, MethodResolver};
pub use snapshot::{HierarchySnapshot, SnapshotGeneration};
pub use store::{ClassStore, HierarchyStore};
pub use types::{
    FieldRef, FieldSig, MemberKey, MethodProto, MethodRef, MethodSig, PrimitiveKind, ProtoId,
    TypeData, TypeId,
};

#[cfg(test)]
#[path = "../tests/test_fixtures.rs"]
pub(crate) mod test_fixtures;

#[cfg(test)]
#[path = "../tests/concurrent_tests.rs"]
mod concurrent_tests;
