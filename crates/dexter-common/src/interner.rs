//! String interner for member names and type descriptors.
//!
//! Every name and descriptor that flows through the hierarchy model is interned
//! once and passed around as a `u32` handle (`Atom`). Member signatures then
//! compare with integer equality, which is what the per-type member tables and
//! the resolver rely on for cheap lookups.

use rustc_hash::{FxHashMap, FxHasher};
use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An interned string identifier.
///
/// Atoms are cheap to copy (just a u32) and can be compared with == in O(1).
/// To get the actual string, use `ShardedInterner::resolve(atom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// A sentinel value representing no atom / empty string.
    pub const NONE: Atom = Atom(0);

    /// Check if this is the empty/none atom.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

const SHARD_BITS: u32 = 6;
const SHARD_COUNT: usize = 1 << SHARD_BITS;
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;
/// Largest local index an atom can encode next to its shard bits.
const MAX_LOCAL_INDEX: u32 = u32::MAX >> SHARD_BITS;

/// Names that show up in nearly every application.
const COMMON_STRINGS: &[&str] = &[
    // Special method names
    "<init>",
    "<clinit>",
    "clone",
    "equals",
    "hashCode",
    "toString",
    "finalize",
    "getClass",
    "notify",
    "notifyAll",
    "wait",
    "invoke",
    "invokeExact",
    "valueOf",
    "values",
    "ordinal",
    "name",
    "length",
    "get",
    "set",
    "run",
    "call",
    "apply",
    "accept",
    "compareTo",
    "iterator",
    "close",
    // Core descriptors
    "V",
    "Z",
    "B",
    "C",
    "S",
    "I",
    "J",
    "F",
    "D",
    "Ljava/lang/Object;",
    "Ljava/lang/String;",
    "Ljava/lang/Class;",
    "Ljava/lang/Cloneable;",
    "Ljava/io/Serializable;",
    "Ljava/lang/Enum;",
    "Ljava/lang/Record;",
    "Ljava/lang/Runnable;",
    "Ljava/lang/invoke/MethodHandle;",
    "Ljava/lang/invoke/VarHandle;",
    "[Ljava/lang/Object;",
];

#[derive(Default)]
struct ShardState {
    map: FxHashMap<Arc<str>, Atom>,
    strings: Vec<Arc<str>>,
}

struct InternerShard {
    state: RwLock<ShardState>,
}

impl InternerShard {
    fn new() -> Self {
        InternerShard {
            state: RwLock::new(ShardState::default()),
        }
    }

    // Writers never leave a shard half-updated (push and insert happen after
    // every fallible step), so a poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, ShardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ShardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sharded string interner for concurrent use.
///
/// Uses fixed buckets to reduce lock contention while keeping Atom lookups O(1).
/// Optimization passes running on worker threads intern synthesized names
/// through this type.
pub struct ShardedInterner {
    shards: [InternerShard; SHARD_COUNT],
}

impl ShardedInterner {
    /// Create a new sharded interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|_| InternerShard::new());

        {
            let mut state = shards[0].write();
            let empty: Arc<str> = Arc::from("");
            state.strings.push(empty.clone());
            state.map.insert(empty, Atom::NONE);
        }

        ShardedInterner { shards }
    }

    /// Intern a string, returning its Atom handle.
    ///
    /// # Panics
    ///
    /// Panics when the string's shard already holds as many strings as an
    /// atom can address.
    #[inline]
    pub fn intern(&self, s: &str) -> Atom {
        if s.is_empty() {
            return Atom::NONE;
        }

        let shard_idx = Self::shard_for(s);
        let shard = &self.shards[shard_idx];

        // Fast path: most lookups hit an existing entry under the read lock.
        if let Some(&atom) = shard.read().map.get(s) {
            return atom;
        }

        let mut state = shard.write();
        if let Some(&atom) = state.map.get(s) {
            return atom;
        }

        let local_index = Self::next_local_index(shard_idx, state.strings.len());
        let atom = Self::make_atom(local_index, shard_idx as u32);
        let owned: Arc<str> = Arc::from(s);
        state.strings.push(owned.clone());
        state.map.insert(owned, atom);
        atom
    }

    /// Look up an already-interned string without inserting it.
    #[inline]
    pub fn get(&self, s: &str) -> Option<Atom> {
        if s.is_empty() {
            return Some(Atom::NONE);
        }
        self.shards[Self::shard_for(s)].read().map.get(s).copied()
    }

    /// Resolve an Atom back to its string value.
    /// Returns empty string if atom is out of bounds.
    #[inline]
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.try_resolve(atom).unwrap_or_else(|| Arc::from(""))
    }

    /// Try to resolve an Atom, returning None if invalid.
    #[inline]
    pub fn try_resolve(&self, atom: Atom) -> Option<Arc<str>> {
        let (shard_idx, local_index) = Self::split_atom(atom);
        let shard = self.shards.get(shard_idx)?;
        shard.read().strings.get(local_index).cloned()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.read().strings.len())
            .sum()
    }

    /// Check if the interner is empty (only has the empty string).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Pre-intern common JVM names and descriptors.
    pub fn intern_common(&self) {
        for s in COMMON_STRINGS {
            self.intern(s);
        }
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        (hasher.finish() as usize) & (SHARD_COUNT - 1)
    }

    /// Local index for the next string of a shard holding `len` strings.
    fn next_local_index(shard_idx: usize, len: usize) -> u32 {
        match u32::try_from(len) {
            Ok(index) if index <= MAX_LOCAL_INDEX => index,
            _ => panic!(
                "interner shard {shard_idx} is full ({len} strings); atoms would alias"
            ),
        }
    }

    #[inline]
    fn make_atom(local_index: u32, shard_idx: u32) -> Atom {
        Atom((local_index << SHARD_BITS) | (shard_idx & SHARD_MASK))
    }

    #[inline]
    fn split_atom(atom: Atom) -> (usize, usize) {
        if atom == Atom::NONE {
            return (0, 0);
        }
        let raw = atom.0;
        ((raw & SHARD_MASK) as usize, (raw >> SHARD_BITS) as usize)
    }
}

impl Default for ShardedInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/interner_tests.rs"]
mod tests;
