//! Ternary binary decision diagrams over list atoms.
//!
//! The list portion of a `SemType` is a BDD whose variables are [`Atom`]s.
//! Each interior node `(atom, left, middle, right)` denotes
//! `(atom AND left) OR middle OR (NOT atom AND right)`, so a path from the
//! root to the `all` terminal is a conjunction of positive and negated
//! atoms. The set operations below are structural rewrites of that
//! denotation; deciding whether the denoted set is actually empty requires
//! the atoms' shapes and lives in the solver crate.
//!
//! Nodes are hash-consed in a [`TypeEnv`], so a [`Bdd`] is a 4-byte `Copy`
//! handle and `==` on handles is structural equality of whole diagrams.
//! That makes handles usable directly as memo keys. Node ids are ordered
//! by atom along any root-to-leaf path, which the binary operations rely
//! on to merge diagrams in a single pass.

use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::env::{Atom, TypeEnv};

// =============================================================================
// Bdd - interned diagram handle
// =============================================================================

/// Handle to an interned BDD within a [`TypeEnv`].
///
/// The two terminals are reserved ids at the top of the id space; every
/// other id refers to an interior [`BddNode`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bdd(pub u32);

impl Bdd {
    /// Terminal denoting the whole list category.
    pub const ALL: Self = Self(0xffff_ffff);

    /// Terminal denoting the empty set.
    pub const NOTHING: Self = Self(0xffff_fffe);

    /// Largest id available for interior nodes.
    pub(crate) const MAX_INTERIOR: u32 = 0xffff_fffd;

    #[inline]
    pub const fn is_all(self) -> bool {
        self.0 == Self::ALL.0
    }

    #[inline]
    pub const fn is_nothing(self) -> bool {
        self.0 == Self::NOTHING.0
    }

    /// Resolve the handle against its environment.
    #[inline]
    pub fn kind(self, env: &TypeEnv) -> BddKind {
        if self.is_all() {
            BddKind::All
        } else if self.is_nothing() {
            BddKind::Nothing
        } else {
            BddKind::Node(env.bdd_node(self))
        }
    }
}

/// A resolved [`Bdd`]: either a terminal or an interior node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BddKind {
    All,
    Nothing,
    Node(BddNode),
}

/// Interior node of a ternary BDD.
///
/// Denotes `(atom AND left) OR middle OR (NOT atom AND right)`. Children
/// only mention atoms strictly greater than `atom`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BddNode {
    pub atom: Atom,
    pub left: Bdd,
    pub middle: Bdd,
    pub right: Bdd,
}

// =============================================================================
// Set operations
// =============================================================================

impl TypeEnv {
    /// The BDD denoting exactly the lists matching `atom`.
    pub fn bdd_atom(&self, atom: Atom) -> Bdd {
        self.bdd_create(atom, Bdd::ALL, Bdd::NOTHING, Bdd::NOTHING)
    }

    /// Union of two BDDs.
    pub fn bdd_union(&self, b1: Bdd, b2: Bdd) -> Bdd {
        if b1 == b2 {
            return b1;
        }
        if b1.is_all() || b2.is_all() {
            return Bdd::ALL;
        }
        if b1.is_nothing() {
            return b2;
        }
        if b2.is_nothing() {
            return b1;
        }
        let n1 = self.bdd_node(b1);
        let n2 = self.bdd_node(b2);
        match n1.atom.cmp(&n2.atom) {
            Ordering::Less => {
                self.bdd_create(n1.atom, n1.left, self.bdd_union(n1.middle, b2), n1.right)
            }
            Ordering::Greater => {
                self.bdd_create(n2.atom, n2.left, self.bdd_union(b1, n2.middle), n2.right)
            }
            Ordering::Equal => self.bdd_create(
                n1.atom,
                self.bdd_union(n1.left, n2.left),
                self.bdd_union(n1.middle, n2.middle),
                self.bdd_union(n1.right, n2.right),
            ),
        }
    }

    /// Intersection of two BDDs.
    pub fn bdd_intersect(&self, b1: Bdd, b2: Bdd) -> Bdd {
        if b1 == b2 {
            return b1;
        }
        if b1.is_all() {
            return b2;
        }
        if b2.is_all() {
            return b1;
        }
        if b1.is_nothing() || b2.is_nothing() {
            return Bdd::NOTHING;
        }
        let n1 = self.bdd_node(b1);
        let n2 = self.bdd_node(b2);
        match n1.atom.cmp(&n2.atom) {
            Ordering::Less => self.bdd_create(
                n1.atom,
                self.bdd_intersect(n1.left, b2),
                self.bdd_intersect(n1.middle, b2),
                self.bdd_intersect(n1.right, b2),
            ),
            Ordering::Greater => self.bdd_create(
                n2.atom,
                self.bdd_intersect(b1, n2.left),
                self.bdd_intersect(b1, n2.middle),
                self.bdd_intersect(b1, n2.right),
            ),
            // Once both sides branch on the same atom, fold each side's
            // middle into its branches before intersecting; the result
            // then needs no middle of its own.
            Ordering::Equal => self.bdd_create(
                n1.atom,
                self.bdd_intersect(
                    self.bdd_union(n1.left, n1.middle),
                    self.bdd_union(n2.left, n2.middle),
                ),
                Bdd::NOTHING,
                self.bdd_intersect(
                    self.bdd_union(n1.right, n1.middle),
                    self.bdd_union(n2.right, n2.middle),
                ),
            ),
        }
    }

    /// Difference of two BDDs.
    pub fn bdd_diff(&self, b1: Bdd, b2: Bdd) -> Bdd {
        self.bdd_intersect(b1, self.bdd_complement(b2))
    }

    /// Complement of a BDD with respect to the whole list category.
    pub fn bdd_complement(&self, b: Bdd) -> Bdd {
        if b.is_all() {
            return Bdd::NOTHING;
        }
        if b.is_nothing() {
            return Bdd::ALL;
        }
        let n = self.bdd_node(b);
        if n.right.is_nothing() {
            self.bdd_create(
                n.atom,
                Bdd::NOTHING,
                self.bdd_complement(self.bdd_union(n.left, n.middle)),
                self.bdd_complement(n.middle),
            )
        } else if n.left.is_nothing() {
            self.bdd_create(
                n.atom,
                self.bdd_complement(n.middle),
                self.bdd_complement(self.bdd_union(n.right, n.middle)),
                Bdd::NOTHING,
            )
        } else if n.middle.is_nothing() {
            self.bdd_create(
                n.atom,
                self.bdd_complement(n.left),
                self.bdd_complement(self.bdd_union(n.left, n.right)),
                self.bdd_complement(n.right),
            )
        } else {
            self.bdd_create(
                n.atom,
                self.bdd_complement(self.bdd_union(n.left, n.middle)),
                Bdd::NOTHING,
                self.bdd_complement(self.bdd_union(n.right, n.middle)),
            )
        }
    }

    /// Intern a node, applying the reductions that keep diagrams canonical.
    fn bdd_create(&self, atom: Atom, left: Bdd, middle: Bdd, right: Bdd) -> Bdd {
        if middle.is_all() {
            return Bdd::ALL;
        }
        if left == right {
            return self.bdd_union(left, middle);
        }
        debug_assert!(
            self.child_atoms_follow(atom, left)
                && self.child_atoms_follow(atom, middle)
                && self.child_atoms_follow(atom, right),
            "BDD node children must branch on strictly greater atoms"
        );
        self.intern_bdd_node(BddNode {
            atom,
            left,
            middle,
            right,
        })
    }

    fn child_atoms_follow(&self, parent: Atom, child: Bdd) -> bool {
        match child.kind(self) {
            BddKind::All | BddKind::Nothing => true,
            BddKind::Node(n) => parent < n.atom,
        }
    }
}

// =============================================================================
// Path folding
// =============================================================================

/// Strategy for an accumulating walk over every root-to-`all` path of a
/// BDD.
///
/// A path is the conjunction of the atoms crossed on positive edges and
/// the negations of the atoms crossed on negative edges; the diagram
/// denotes the disjunction of its paths. Implementations reduce each path
/// to a value and combine the per-path values, with an optional
/// short-circuit once further paths cannot change the outcome.
pub trait PathFold {
    type Output;

    /// Value of the `nothing` terminal (a branch contributing no paths).
    fn bottom(&self) -> Self::Output;

    /// Value of one complete path: `pos` holds the positively crossed
    /// atoms, `neg` the negated ones, in root-to-leaf order.
    fn all_leaf(&mut self, pos: &[Atom], neg: &[Atom]) -> Self::Output;

    /// Fold the values of two sibling branches.
    fn combine(&self, a: Self::Output, b: Self::Output) -> Self::Output;

    /// Whether `value` can no longer change under [`PathFold::combine`].
    fn is_saturated(&self, value: &Self::Output) -> bool;
}

/// Fold `strategy` over every path of `bdd`.
pub fn fold_paths<F: PathFold>(env: &TypeEnv, bdd: Bdd, strategy: &mut F) -> F::Output {
    let mut pos = SmallVec::new();
    let mut neg = SmallVec::new();
    fold_paths_inner(env, bdd, strategy, &mut pos, &mut neg)
}

fn fold_paths_inner<F: PathFold>(
    env: &TypeEnv,
    bdd: Bdd,
    strategy: &mut F,
    pos: &mut SmallVec<[Atom; 8]>,
    neg: &mut SmallVec<[Atom; 8]>,
) -> F::Output {
    let node = match bdd.kind(env) {
        BddKind::Nothing => return strategy.bottom(),
        BddKind::All => return strategy.all_leaf(pos, neg),
        BddKind::Node(node) => node,
    };
    pos.push(node.atom);
    let acc = fold_paths_inner(env, node.left, strategy, pos, neg);
    pos.pop();
    if strategy.is_saturated(&acc) {
        return acc;
    }
    let middle = fold_paths_inner(env, node.middle, strategy, pos, neg);
    let acc = strategy.combine(acc, middle);
    if strategy.is_saturated(&acc) {
        return acc;
    }
    neg.push(node.atom);
    let right = fold_paths_inner(env, node.right, strategy, pos, neg);
    neg.pop();
    strategy.combine(acc, right)
}

#[cfg(test)]
#[path = "../tests/bdd_tests.rs"]
mod tests;
