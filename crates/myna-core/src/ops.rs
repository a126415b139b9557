//! Set operations on `SemType`.
//!
//! Each operation works category by category: plain bit arithmetic for
//! the uniform categories, range-list algebra for int, BDD algebra for
//! list. Results are folded back into canonical form, so a subset that
//! grew to cover its whole category becomes the category bit again.

use std::sync::Arc;

use crate::bdd::Bdd;
use crate::env::TypeEnv;
use crate::ranges::{
    IntSubset, Range, RangeListId, ranges_diff, ranges_full, ranges_intersect, ranges_union,
};
use crate::types::{BasicTypeBitSet, SemType};

impl TypeEnv {
    pub fn union(&self, t1: SemType, t2: SemType) -> SemType {
        let uniform = t1
            .all
            .union(t2.all)
            .intersection(BasicTypeBitSet::UNIFORM);
        let ints = ranges_union(&self.int_ranges_of(t1), &self.int_ranges_of(t2));
        let lists = self.bdd_union(t1.list_bdd(), t2.list_bdd());
        self.canonical(uniform, ints, lists)
    }

    pub fn intersect(&self, t1: SemType, t2: SemType) -> SemType {
        let uniform = t1
            .all
            .intersection(t2.all)
            .intersection(BasicTypeBitSet::UNIFORM);
        let ints = ranges_intersect(&self.int_ranges_of(t1), &self.int_ranges_of(t2));
        let lists = self.bdd_intersect(t1.list_bdd(), t2.list_bdd());
        self.canonical(uniform, ints, lists)
    }

    pub fn diff(&self, t1: SemType, t2: SemType) -> SemType {
        let uniform = t1
            .all
            .difference(t2.all)
            .intersection(BasicTypeBitSet::UNIFORM);
        let ints = ranges_diff(&self.int_ranges_of(t1), &self.int_ranges_of(t2));
        let lists = self.bdd_diff(t1.list_bdd(), t2.list_bdd());
        self.canonical(uniform, ints, lists)
    }

    pub fn complement(&self, t: SemType) -> SemType {
        self.diff(SemType::ANY, t)
    }

    /// Union of any number of types.
    pub fn union_all(&self, types: impl IntoIterator<Item = SemType>) -> SemType {
        types
            .into_iter()
            .fold(SemType::NEVER, |acc, t| self.union(acc, t))
    }

    /// The int portion of `t` as a plain range list, expanding the int
    /// bit to the full range.
    fn int_ranges_of(&self, t: SemType) -> Arc<[Range]> {
        match t.int_subset() {
            IntSubset::All => Arc::from(vec![Range::FULL]),
            IntSubset::Empty => self.range_list(RangeListId::EMPTY),
            IntSubset::Ranges(id) => self.range_list(id),
        }
    }

    /// Reassemble a type, promoting full subsets back into the bitset.
    fn canonical(&self, mut all: BasicTypeBitSet, ints: Vec<Range>, lists: Bdd) -> SemType {
        let ints = if ranges_full(&ints) {
            all.insert(BasicTypeBitSet::INT);
            RangeListId::EMPTY
        } else {
            self.intern_ranges(ints)
        };
        let lists = if lists.is_all() {
            all.insert(BasicTypeBitSet::LIST);
            Bdd::NOTHING
        } else {
            lists
        };
        SemType { all, ints, lists }
    }
}

#[cfg(test)]
#[path = "../tests/ops_tests.rs"]
mod tests;
