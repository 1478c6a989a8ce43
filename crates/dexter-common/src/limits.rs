//! Centralized limits and thresholds for hierarchy queries.
//!
//! Class files handed to the optimizer are not verified, so the hierarchy can be
//! malformed (a class that lists itself as its own superclass, interface
//! cycles produced by broken obfuscators). Walks over the hierarchy are bounded
//! by the constants below instead of trusting the input.

// =============================================================================
// Hierarchy Walk Limits
// =============================================================================

/// Maximum number of superclass links followed by a single walk.
///
/// Real applications rarely exceed a depth of 20; the Android framework's
/// deepest view classes sit around 12. A walk that reaches this bound is almost
/// certainly looping on a cyclic `super_type` chain and is cut off.
///
/// Overridable per snapshot through `GraphOptions::max_hierarchy_depth`.
pub const MAX_HIERARCHY_DEPTH: u32 = 256;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Initial capacity of a per-type member table.
///
/// Most classes declare fewer than 16 members; larger classes simply grow.
pub const MEMBER_TABLE_INITIAL_CAPACITY: usize = 16;

/// Inline capacity for method parameter lists before spilling to the heap.
pub const INLINE_PROTO_PARAMS: usize = 4;
