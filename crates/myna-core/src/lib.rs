//! Set-theoretic type representation for the Myna type checker.
//!
//! A type is a set of values, and the connectives are real set
//! operations: union, intersection, and complement, all closed over the
//! representation. The universe is split into basic categories (nil,
//! boolean, int, float, string, list); a [`SemType`] holds a bitset of
//! whole categories plus proper subsets of the int category (range
//! lists) and the list category (a ternary BDD over list atoms).
//!
//! Everything pointer-shaped is interned in a [`TypeEnv`]: list atom
//! definitions, BDD nodes, and range lists. That keeps `SemType` a small
//! `Copy` value and makes structural equality an id comparison. The
//! environment is concurrent and can be shared across threads while
//! definitions are still being added.
//!
//! This crate is purely representational. Whether a type is *inhabited*
//! (and hence whether one type is a subtype of another) depends on the
//! list atoms' shapes and is decided by the solver crate on top.

pub mod bdd;
pub mod env;
pub mod list;
pub mod ops;
pub mod ranges;
pub mod types;

pub use bdd::{Bdd, BddKind, BddNode, PathFold, fold_paths};
pub use env::{Atom, TypeEnv};
pub use list::{FixedLengthArray, ListAtomicType, ListDefinition};
pub use ranges::{IntSubset, Range, RangeListId};
pub use types::{BasicTypeBitSet, SemType};
