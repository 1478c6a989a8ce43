//! Outcome of method resolution.

use crate::def::MethodDef;
use crate::types::TypeId;
use std::sync::Arc;

/// Unambiguous resolution: `resolved_method` is declared on `resolved_holder`,
/// which is reachable from `initial_holder`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleResolution {
    pub initial_holder: TypeId,
    pub resolved_holder: TypeId,
    pub resolved_method: Arc<MethodDef>,
}

/// Result of resolving a method reference against a hierarchy snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionResult {
    Single(SingleResolution),
    /// The holder, or a type needed mid-resolution, has no definition.
    ClassNotFound,
    /// The resolution kind does not match the holder kind, or several default
    /// methods are maximally specific. `conflicting` is empty unless it is the
    /// latter.
    IncompatibleClass { conflicting: Vec<Arc<MethodDef>> },
    /// A private method was found on a class other than the initial holder.
    /// Whether the runtime raises `IllegalAccessError` or `NoSuchMethodError`
    /// depends on the calling context (nestmates).
    IllegalAccessOrNoSuchMethod { method: Arc<MethodDef> },
    NoSuchMethod,
    /// `clone` on an array type; no method definition backs it.
    ArrayCloneMethod,
}

impl ResolutionResult {
    pub fn single(
        initial_holder: TypeId,
        resolved_holder: TypeId,
        resolved_method: Arc<MethodDef>,
    ) -> Self {
        ResolutionResult::Single(SingleResolution {
            initial_holder,
            resolved_holder,
            resolved_method,
        })
    }

    /// Kind mismatch without conflicting candidates.
    pub const fn incompatible_class() -> Self {
        ResolutionResult::IncompatibleClass {
            conflicting: Vec::new(),
        }
    }

    pub fn as_single(&self) -> Option<&SingleResolution> {
        match self {
            ResolutionResult::Single(single) => Some(single),
            _ => None,
        }
    }

    pub fn into_single(self) -> Option<SingleResolution> {
        match self {
            ResolutionResult::Single(single) => Some(single),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_single(&self) -> bool {
        matches!(self, ResolutionResult::Single(_))
    }

    /// True for every outcome except a single resolution and array `clone`.
    #[inline]
    pub const fn is_failed(&self) -> bool {
        !matches!(
            self,
            ResolutionResult::Single(_) | ResolutionResult::ArrayCloneMethod
        )
    }

    #[inline]
    pub const fn is_array_clone(&self) -> bool {
        matches!(self, ResolutionResult::ArrayCloneMethod)
    }

    pub fn resolved_method(&self) -> Option<&Arc<MethodDef>> {
        self.as_single().map(|single| &single.resolved_method)
    }

    pub fn resolved_holder(&self) -> Option<TypeId> {
        self.as_single().map(|single| single.resolved_holder)
    }

    pub fn initial_holder(&self) -> Option<TypeId> {
        self.as_single().map(|single| single.initial_holder)
    }

    /// A single resolution to a method that can be the target of virtual
    /// dispatch (neither static nor private).
    pub fn is_virtual_target(&self) -> bool {
        self.resolved_method()
            .is_some_and(|method| !method.is_static() && !method.is_private())
    }

    /// Conflicting default methods of an ambiguous resolution.
    pub fn conflicting(&self) -> &[Arc<MethodDef>] {
        match self {
            ResolutionResult::IncompatibleClass { conflicting } => conflicting,
            _ => &[],
        }
    }

    /// Stable name of the variant, used in trace output.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            ResolutionResult::Single(_) => "single",
            ResolutionResult::ClassNotFound => "class_not_found",
            ResolutionResult::IncompatibleClass { .. } => "incompatible_class",
            ResolutionResult::IllegalAccessOrNoSuchMethod { .. } => {
                "illegal_access_or_no_such_method"
            }
            ResolutionResult::NoSuchMethod => "no_such_method",
            ResolutionResult::ArrayCloneMethod => "array_clone_method",
        }
    }
}
