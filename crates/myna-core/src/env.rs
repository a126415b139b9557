//! The type environment: list atom definitions and interned structures.
//!
//! A [`TypeEnv`] owns everything a `SemType` handle points into:
//!
//! | Table       | Key              | Value                       |
//! |-------------|------------------|-----------------------------|
//! | list atoms  | [`Atom`]         | `Arc<ListAtomicType>`       |
//! | BDD nodes   | [`Bdd`]          | [`BddNode`] (hash-consed)   |
//! | range lists | [`RangeListId`]  | `Arc<[Range]>` (hash-consed)|
//!
//! Handles are only meaningful within the environment that produced them;
//! mixing environments is a caller bug and fails fast. All tables are
//! concurrent, so one environment can be shared across threads while
//! types are still being defined.
//!
//! Recursive types are built with [`TypeEnv::reserve_list_atom`] followed
//! by [`TypeEnv::fill_list_atom`]: the reserved atom can appear inside
//! the very member types that later define it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::trace;

use crate::bdd::{Bdd, BddNode};
use crate::list::{FixedLengthArray, ListAtomicType};
use crate::ranges::{Range, RangeListId, ranges_normalized};
use crate::types::SemType;

// =============================================================================
// Atom - list atom identifier
// =============================================================================

/// Identifier of a list atom within a [`TypeEnv`].
///
/// Atoms order the variables of the list BDDs, so the derived `Ord` is
/// load-bearing: definition order fixes the branching order of every
/// diagram built against the environment.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// An invalid atom, used to catch uninitialized ids.
    pub const INVALID: Self = Self(0);

    /// First valid atom id.
    pub const FIRST_VALID: u32 = 1;

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

// =============================================================================
// TypeEnv
// =============================================================================

/// Global counter for assigning unique instance IDs to environments.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

/// Shared store of list atom definitions and interned type structure.
#[derive(Debug)]
pub struct TypeEnv {
    /// Unique instance ID, for tracing mixed-environment bugs.
    instance_id: u64,
    /// Definitions of list atoms.
    list_atoms: DashMap<Atom, Arc<ListAtomicType>>,
    /// Structural lookup of non-recursive atoms, so identical shapes
    /// share one atom id.
    list_atom_ids: DashMap<ListAtomicType, Atom>,
    /// Next atom id to allocate.
    next_atom: AtomicU32,
    /// Structural lookup of interned BDD nodes.
    bdd_ids: DashMap<BddNode, Bdd>,
    /// Reverse side of `bdd_ids`.
    bdd_nodes: DashMap<Bdd, BddNode>,
    /// Next interior BDD id to allocate.
    next_bdd: AtomicU32,
    /// Structural lookup of interned range lists.
    range_ids: DashMap<Arc<[Range]>, RangeListId>,
    /// Reverse side of `range_ids`.
    range_lists: DashMap<RangeListId, Arc<[Range]>>,
    /// Next range list id to allocate.
    next_range_list: AtomicU32,
    /// Shared value returned for [`RangeListId::EMPTY`].
    empty_ranges: Arc<[Range]>,
}

impl TypeEnv {
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed);
        trace!(instance_id, "TypeEnv::new - creating type environment");
        Self {
            instance_id,
            list_atoms: DashMap::new(),
            list_atom_ids: DashMap::new(),
            next_atom: AtomicU32::new(Atom::FIRST_VALID),
            bdd_ids: DashMap::new(),
            bdd_nodes: DashMap::new(),
            next_bdd: AtomicU32::new(0),
            range_ids: DashMap::new(),
            range_lists: DashMap::new(),
            next_range_list: AtomicU32::new(RangeListId::FIRST_VALID),
            empty_ranges: Arc::from(vec![]),
        }
    }

    #[inline]
    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    /// Number of defined list atoms.
    pub fn atom_count(&self) -> usize {
        self.list_atoms.len()
    }

    // -------------------------------------------------------------------------
    // List atoms
    // -------------------------------------------------------------------------

    /// Define a list atom and return its id. Structurally identical
    /// definitions share an id, so equal shapes build equal `SemType`s.
    pub fn define_list_atom(&self, members: FixedLengthArray, rest: SemType) -> Atom {
        let atomic = ListAtomicType::new(members, rest);
        if let Some(atom) = self.list_atom_ids.get(&atomic) {
            return *atom;
        }
        *self
            .list_atom_ids
            .entry(atomic.clone())
            .or_insert_with(|| {
                let atom = self.reserve_list_atom();
                let prev = self.list_atoms.insert(atom, Arc::new(atomic));
                debug_assert!(prev.is_none());
                atom
            })
    }

    /// Allocate an atom id without a definition yet.
    ///
    /// The id may be referenced by `SemType`s immediately, which is what
    /// makes recursive definitions possible. It must be filled with
    /// [`TypeEnv::fill_list_atom`] before any emptiness or projection
    /// query touches it.
    pub fn reserve_list_atom(&self) -> Atom {
        let atom = Atom(self.next_atom.fetch_add(1, Ordering::Relaxed));
        trace!(
            instance_id = self.instance_id,
            atom = atom.0,
            "TypeEnv::reserve_list_atom"
        );
        atom
    }

    /// Supply the definition of a previously reserved atom.
    ///
    /// Panics if the atom was not allocated by this environment or is
    /// already defined.
    pub fn fill_list_atom(&self, atom: Atom, members: FixedLengthArray, rest: SemType) {
        assert!(
            atom.is_valid() && atom.0 < self.next_atom.load(Ordering::Relaxed),
            "atom {atom:?} was not reserved by this environment"
        );
        let atomic = ListAtomicType::new(members, rest);
        trace!(
            instance_id = self.instance_id,
            atom = atom.0,
            fixed_length = atomic.members.fixed_length,
            "TypeEnv::fill_list_atom"
        );
        let prev = self.list_atoms.insert(atom, Arc::new(atomic));
        assert!(prev.is_none(), "list atom {atom:?} defined twice");
    }

    /// Look up the definition of an atom.
    ///
    /// Panics if the atom has no definition here: either it belongs to a
    /// different environment or it was reserved and never filled.
    pub fn list_atom(&self, atom: Atom) -> Arc<ListAtomicType> {
        match self.list_atoms.get(&atom) {
            Some(entry) => Arc::clone(entry.value()),
            None => panic!(
                "list atom {atom:?} is not defined in this environment \
                 (unfilled reservation, or an atom from another environment)"
            ),
        }
    }

    /// The `SemType` containing exactly the lists matching `atom`.
    pub fn list_atom_sem_type(&self, atom: Atom) -> SemType {
        SemType::from_list_bdd(self.bdd_atom(atom))
    }

    // -------------------------------------------------------------------------
    // Interning
    // -------------------------------------------------------------------------

    /// Intern a BDD node, returning the existing id for a structurally
    /// equal node. This is what turns `==` on [`Bdd`] handles into
    /// structural equality of diagrams.
    pub(crate) fn intern_bdd_node(&self, node: BddNode) -> Bdd {
        if let Some(id) = self.bdd_ids.get(&node) {
            return *id;
        }
        *self.bdd_ids.entry(node).or_insert_with(|| {
            let raw = self.next_bdd.fetch_add(1, Ordering::Relaxed);
            assert!(raw <= Bdd::MAX_INTERIOR, "BDD node id space exhausted");
            let id = Bdd(raw);
            self.bdd_nodes.insert(id, node);
            id
        })
    }

    /// Resolve an interior BDD id. Panics on terminals and foreign ids.
    pub(crate) fn bdd_node(&self, bdd: Bdd) -> BddNode {
        match self.bdd_nodes.get(&bdd) {
            Some(entry) => *entry.value(),
            None => panic!("BDD id {bdd:?} has no node in this environment"),
        }
    }

    /// Intern a normalized range list.
    pub(crate) fn intern_ranges(&self, ranges: Vec<Range>) -> RangeListId {
        if ranges.is_empty() {
            return RangeListId::EMPTY;
        }
        debug_assert!(
            ranges_normalized(&ranges),
            "range lists must be normalized before interning"
        );
        let key: Arc<[Range]> = ranges.into();
        if let Some(id) = self.range_ids.get(&key) {
            return *id;
        }
        *self.range_ids.entry(Arc::clone(&key)).or_insert_with(|| {
            let id = RangeListId(self.next_range_list.fetch_add(1, Ordering::Relaxed));
            self.range_lists.insert(id, key);
            id
        })
    }

    /// Resolve an interned range list. The empty id resolves to a shared
    /// empty slice.
    pub fn range_list(&self, id: RangeListId) -> Arc<[Range]> {
        if id.is_empty() {
            return Arc::clone(&self.empty_ranges);
        }
        match self.range_lists.get(&id) {
            Some(entry) => Arc::clone(entry.value()),
            None => panic!("range list {id:?} is unknown to this environment"),
        }
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../tests/env_tests.rs"]
mod tests;
