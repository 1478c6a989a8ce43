//! Errors for misuse of the hierarchy mutation APIs.
//!
//! Resolution outcomes are never errors; see [`crate::ResolutionResult`].

use crate::TypeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The type already has a definition in the store.
    DuplicateClass { ty: TypeId, descriptor: String },
    /// A different definition was already synthesized for the type.
    ConflictingSynthesizedClass { ty: TypeId, descriptor: String },
}

impl GraphError {
    pub fn ty(&self) -> TypeId {
        match self {
            GraphError::DuplicateClass { ty, .. }
            | GraphError::ConflictingSynthesizedClass { ty, .. } => *ty,
        }
    }
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::DuplicateClass { ty, descriptor } => {
                write!(f, "class {descriptor} (type {}) is already defined", ty.0)
            }
            GraphError::ConflictingSynthesizedClass { ty, descriptor } => write!(
                f,
                "a different definition of {descriptor} (type {}) was already synthesized",
                ty.0
            ),
        }
    }
}

impl std::error::Error for GraphError {}
