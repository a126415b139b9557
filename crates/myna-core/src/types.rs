//! The `SemType` value: a set of values in the typed universe.

use bitflags::bitflags;

use crate::bdd::Bdd;
use crate::env::TypeEnv;
use crate::ranges::{IntSubset, Range, RangeListId};

bitflags! {
    /// The basic type categories of the universe.
    ///
    /// A set bit means the whole category. Int and list additionally
    /// support proper subsets, carried outside the bitset.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct BasicTypeBitSet: u32 {
        const NIL = 1 << 0;
        const BOOLEAN = 1 << 1;
        const INT = 1 << 2;
        const FLOAT = 1 << 3;
        const STRING = 1 << 4;
        const LIST = 1 << 5;
    }
}

impl BasicTypeBitSet {
    /// Categories that are all-or-nothing, with no proper-subset support.
    pub(crate) const UNIFORM: Self = Self::NIL
        .union(Self::BOOLEAN)
        .union(Self::FLOAT)
        .union(Self::STRING);
}

/// A semantic type: a subset of the value universe, closed under union,
/// intersection, and complement.
///
/// Three words, `Copy`, meaningful only against the [`TypeEnv`] whose
/// handles it carries. Canonical form: when a category's bit is set in
/// `all`, the category's subset field holds its empty value, and a
/// subset covering its whole category is always promoted to the bit.
/// Under that discipline, derived `==` never reports two structurally
/// identical types as different; semantically equal types with different
/// structure are the solver's business.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SemType {
    /// Categories contained in full.
    pub(crate) all: BasicTypeBitSet,
    /// Proper subset of the int category.
    pub(crate) ints: RangeListId,
    /// Proper subset of the list category.
    pub(crate) lists: Bdd,
}

impl SemType {
    pub const NEVER: Self = Self::basic(BasicTypeBitSet::empty());
    pub const NIL: Self = Self::basic(BasicTypeBitSet::NIL);
    pub const BOOLEAN: Self = Self::basic(BasicTypeBitSet::BOOLEAN);
    pub const INT: Self = Self::basic(BasicTypeBitSet::INT);
    pub const FLOAT: Self = Self::basic(BasicTypeBitSet::FLOAT);
    pub const STRING: Self = Self::basic(BasicTypeBitSet::STRING);
    pub const LIST: Self = Self::basic(BasicTypeBitSet::LIST);
    pub const ANY: Self = Self::basic(BasicTypeBitSet::all());

    /// The type containing exactly the named categories, in full.
    pub const fn basic(all: BasicTypeBitSet) -> Self {
        Self {
            all,
            ints: RangeListId::EMPTY,
            lists: Bdd::NOTHING,
        }
    }

    /// The type whose list portion is `lists` and which contains nothing
    /// else. The full diagram promotes to the list bit.
    pub fn from_list_bdd(lists: Bdd) -> Self {
        if lists.is_all() {
            Self::LIST
        } else {
            Self {
                all: BasicTypeBitSet::empty(),
                ints: RangeListId::EMPTY,
                lists,
            }
        }
    }

    /// The type containing exactly an interned, non-full set of integers.
    pub(crate) fn from_int_ranges(ints: RangeListId) -> Self {
        Self {
            all: BasicTypeBitSet::empty(),
            ints,
            lists: Bdd::NOTHING,
        }
    }

    /// Structurally the empty type. The converse does not hold: a type
    /// with a non-trivial list portion may still denote the empty set,
    /// which only the solver can decide.
    #[inline]
    pub fn is_never(self) -> bool {
        self == Self::NEVER
    }

    #[inline]
    pub fn is_any(self) -> bool {
        self == Self::ANY
    }

    /// Categories this type contains in full.
    #[inline]
    pub fn basic_bits(self) -> BasicTypeBitSet {
        self.all
    }

    /// The int portion, as a queryable subset.
    #[inline]
    pub fn int_subset(self) -> IntSubset {
        if self.all.contains(BasicTypeBitSet::INT) {
            IntSubset::All
        } else if self.ints.is_empty() {
            IntSubset::Empty
        } else {
            IntSubset::Ranges(self.ints)
        }
    }

    /// The list portion as a BDD, with the list bit expanded back to the
    /// full diagram.
    #[inline]
    pub fn list_bdd(self) -> Bdd {
        if self.all.contains(BasicTypeBitSet::LIST) {
            Bdd::ALL
        } else {
            self.lists
        }
    }
}

impl TypeEnv {
    /// The type containing exactly the integers in `[min, max]`.
    pub fn int_range(&self, min: i64, max: i64) -> SemType {
        let range = Range::new(min, max);
        if range == Range::FULL {
            SemType::INT
        } else {
            SemType::from_int_ranges(self.intern_ranges(vec![range]))
        }
    }

    /// The singleton type of one integer.
    pub fn int_const(&self, value: i64) -> SemType {
        self.int_range(value, value)
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
