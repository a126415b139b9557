//! List atom shapes: fixed-length member prefixes plus a rest type.

use crate::env::{Atom, TypeEnv};
use crate::ranges::{IntSubset, Range};
use crate::types::SemType;

// =============================================================================
// FixedLengthArray
// =============================================================================

/// The member types of the first `fixed_length` positions of a list, with
/// trailing repetition compressed away: `initial` stores at most
/// `fixed_length` types, and when it is shorter, its last element stands
/// for every remaining position up to `fixed_length`.
///
/// `fixed_length` is also a minimum length: a list matches only if it has
/// at least `fixed_length` members.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FixedLengthArray {
    pub initial: Vec<SemType>,
    pub fixed_length: i64,
}

impl FixedLengthArray {
    /// No required prefix at all.
    pub const EMPTY: Self = Self {
        initial: Vec::new(),
        fixed_length: 0,
    };

    /// Build a prefix, validating the compression invariants.
    pub fn new(initial: Vec<SemType>, fixed_length: i64) -> Self {
        let array = Self {
            initial,
            fixed_length,
        };
        array.check_invariants();
        array
    }

    fn check_invariants(&self) {
        assert!(
            self.fixed_length >= 0,
            "fixed length must be non-negative, got {}",
            self.fixed_length
        );
        assert!(
            self.initial.len() as i64 <= self.fixed_length,
            "initial members ({}) exceed the fixed length ({})",
            self.initial.len(),
            self.fixed_length
        );
        assert!(
            !self.initial.is_empty() || self.fixed_length == 0,
            "a non-zero fixed length needs at least one member type"
        );
    }

    /// Member type at `index`, which must be below `fixed_length`.
    pub fn member_at(&self, index: i64) -> SemType {
        debug_assert!(0 <= index && index < self.fixed_length);
        let last = self.initial.len() - 1;
        self.initial[(index as usize).min(last)]
    }
}

// =============================================================================
// ListAtomicType
// =============================================================================

/// The shape denoted by one list atom: lists with at least `fixed_length`
/// members, the first `fixed_length` of them typed by `members` and every
/// later one by `rest`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListAtomicType {
    pub members: FixedLengthArray,
    pub rest: SemType,
}

impl ListAtomicType {
    pub fn new(members: FixedLengthArray, rest: SemType) -> Self {
        members.check_invariants();
        Self { members, rest }
    }

    /// Member type at list index `index`.
    pub fn member_at(&self, index: i64) -> SemType {
        debug_assert!(index >= 0);
        if index < self.members.fixed_length {
            self.members.member_at(index)
        } else {
            self.rest
        }
    }

    /// Union of the member types at every index in `key`.
    ///
    /// This is the projection of a single atomic shape; projecting a
    /// whole type goes through the solver, which accounts for negations.
    pub fn member_type_at(&self, env: &TypeEnv, key: IntSubset) -> SemType {
        let init_len = self.members.initial.len() as i64;
        let fixed_len = self.members.fixed_length;
        match key {
            IntSubset::Empty => SemType::NEVER,
            IntSubset::All => {
                let explicit = self.members.initial.iter().copied();
                env.union_all(explicit.chain([self.rest]))
            }
            IntSubset::Ranges(_) => {
                let mut m = SemType::NEVER;
                for (i, member) in self.members.initial.iter().enumerate() {
                    if key.contains(env, i as i64) {
                        m = env.union(m, *member);
                    }
                }
                // The compressed tail of the prefix, when there is one.
                if init_len < fixed_len
                    && key.overlaps_range(env, Range::new(init_len, fixed_len - 1))
                {
                    m = env.union(m, self.members.member_at(fixed_len - 1));
                }
                let past_prefix = match key.max(env) {
                    Some(max) => fixed_len == 0 || max > fixed_len - 1,
                    None => false,
                };
                if past_prefix {
                    m = env.union(m, self.rest);
                }
                m
            }
        }
    }
}

// =============================================================================
// ListDefinition - two-phase builder
// =============================================================================

/// Builder for list types that need to mention themselves.
///
/// Creating the definition reserves an atom; [`ListDefinition::sem_type`]
/// is usable immediately, including inside the member types later passed
/// to [`ListDefinition::define`]. Defining consumes the builder, so a
/// definition cannot be supplied twice.
///
/// ```
/// use myna_core::{FixedLengthArray, ListDefinition, SemType, TypeEnv};
///
/// let env = TypeEnv::new();
/// let def = ListDefinition::new(&env);
/// let urlist = def.sem_type(&env);
/// // Lists of ints or further such lists.
/// let t = def.define(&env, FixedLengthArray::EMPTY, env.union(SemType::INT, urlist));
/// assert_eq!(t, urlist);
/// ```
#[derive(Debug)]
pub struct ListDefinition {
    atom: Atom,
}

impl ListDefinition {
    pub fn new(env: &TypeEnv) -> Self {
        Self {
            atom: env.reserve_list_atom(),
        }
    }

    #[inline]
    pub fn atom(&self) -> Atom {
        self.atom
    }

    /// The type being defined. Queries against it panic until
    /// [`ListDefinition::define`] has run.
    pub fn sem_type(&self, env: &TypeEnv) -> SemType {
        env.list_atom_sem_type(self.atom)
    }

    /// Supply the definition and return the finished type.
    pub fn define(self, env: &TypeEnv, members: FixedLengthArray, rest: SemType) -> SemType {
        env.fill_list_atom(self.atom, members, rest);
        env.list_atom_sem_type(self.atom)
    }
}

// =============================================================================
// Convenience constructors
// =============================================================================

impl TypeEnv {
    /// A tuple type: lists of exactly the given member types.
    pub fn tuple_of(&self, members: Vec<SemType>) -> SemType {
        let fixed_length = members.len() as i64;
        let atom = self.define_list_atom(
            FixedLengthArray::new(members, fixed_length),
            SemType::NEVER,
        );
        self.list_atom_sem_type(atom)
    }

    /// A homogeneous list type: any number of members, each of type
    /// `rest`.
    pub fn array_of(&self, rest: SemType) -> SemType {
        let atom = self.define_list_atom(FixedLengthArray::EMPTY, rest);
        self.list_atom_sem_type(atom)
    }

    /// Lists of exactly `length` members, each of type `member`, stored
    /// in compressed form.
    pub fn fixed_array_of(&self, member: SemType, length: i64) -> SemType {
        if length == 0 {
            return self.tuple_of(vec![]);
        }
        let atom = self.define_list_atom(
            FixedLengthArray::new(vec![member], length),
            SemType::NEVER,
        );
        self.list_atom_sem_type(atom)
    }
}

#[cfg(test)]
#[path = "../tests/list_tests.rs"]
mod tests;
