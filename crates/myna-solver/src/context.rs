//! Query context: per-session solver state over one environment.

use rustc_hash::FxHashMap;
use tracing::trace;

use myna_core::{Bdd, SemType, TypeEnv};

/// Resolution state of one list BDD emptiness computation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum MemoStatus {
    /// On the current evaluation stack; a lookup hit means a cycle.
    Computing,
    /// Fully decided.
    Resolved(bool),
}

/// A solver session on top of a shared [`TypeEnv`].
///
/// The context owns the emptiness memo table, which is what lets queries
/// over recursive types terminate: a diagram whose emptiness is already
/// being computed further up the stack is assumed inhabited at the point
/// of re-entry, and the table keeps every fully decided answer for the
/// lifetime of the session.
///
/// Contexts are cheap to create and deliberately single-threaded; run
/// parallel queries by giving each thread its own context over the same
/// environment.
pub struct TypeContext<'env> {
    pub env: &'env TypeEnv,
    pub(crate) list_memo: FxHashMap<Bdd, MemoStatus>,
}

impl<'env> TypeContext<'env> {
    pub fn new(env: &'env TypeEnv) -> Self {
        trace!(instance_id = env.instance_id(), "TypeContext::new");
        Self {
            env,
            list_memo: FxHashMap::default(),
        }
    }

    /// Number of memoized list emptiness results in this session.
    pub fn list_memo_len(&self) -> usize {
        self.list_memo.len()
    }

    /// Does `t` denote the empty set?
    pub fn is_empty(&mut self, t: SemType) -> bool {
        if !t.basic_bits().is_empty() || !t.int_subset().is_empty() {
            return false;
        }
        let lists = t.list_bdd();
        if lists.is_nothing() {
            return true;
        }
        crate::emptiness::list_bdd_is_empty(self, lists)
    }

    /// Is every value of `t1` also a value of `t2`?
    pub fn is_subtype(&mut self, t1: SemType, t2: SemType) -> bool {
        let d = self.env.diff(t1, t2);
        self.is_empty(d)
    }

    /// Do `t1` and `t2` denote the same set of values?
    pub fn is_same_type(&mut self, t1: SemType, t2: SemType) -> bool {
        self.is_subtype(t1, t2) && self.is_subtype(t2, t1)
    }

    /// The type of the members of `t` at the indices given by the int
    /// portion of `key`: the union, across the list shapes in `t`, of
    /// the member types reachable at those indices. Used to type member
    /// access expressions.
    pub fn list_member_type_at(&mut self, t: SemType, key: SemType) -> SemType {
        crate::projection::list_proj(self, t, key)
    }
}

#[cfg(test)]
#[path = "../tests/subtype_tests.rs"]
mod tests;
