//! Common types and utilities for the dexter bytecode optimizer.
//!
//! This crate provides foundational types used across all dexter crates:
//! - String interning (`Atom`, `ShardedInterner`)
//! - Hierarchy walk limits and cache sizing constants

// String interning for member names and type descriptors
pub mod interner;
pub use interner::{Atom, ShardedInterner};

// Centralized limits and thresholds
pub mod limits;
