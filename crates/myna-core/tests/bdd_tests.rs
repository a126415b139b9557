use super::*;
use crate::env::{Atom, TypeEnv};

/// Collects every path of a diagram as (positive atoms, negated atoms).
struct CollectPaths {
    paths: Vec<(Vec<Atom>, Vec<Atom>)>,
}

impl PathFold for CollectPaths {
    type Output = ();

    fn bottom(&self) {}

    fn all_leaf(&mut self, pos: &[Atom], neg: &[Atom]) {
        self.paths.push((pos.to_vec(), neg.to_vec()));
    }

    fn combine(&self, _a: (), _b: ()) {}

    fn is_saturated(&self, _value: &()) -> bool {
        false
    }
}

fn paths_of(env: &TypeEnv, bdd: Bdd) -> Vec<(Vec<Atom>, Vec<Atom>)> {
    let mut collect = CollectPaths { paths: Vec::new() };
    fold_paths(env, bdd, &mut collect);
    collect.paths
}

// =========================================================================
// Terminals and atoms
// =========================================================================

#[test]
fn test_terminal_kinds() {
    let env = TypeEnv::new();
    assert!(Bdd::ALL.is_all());
    assert!(Bdd::NOTHING.is_nothing());
    assert_eq!(Bdd::ALL.kind(&env), BddKind::All);
    assert_eq!(Bdd::NOTHING.kind(&env), BddKind::Nothing);
}

#[test]
fn test_atom_diagram_shape() {
    let env = TypeEnv::new();
    let a = env.reserve_list_atom();
    let b = env.bdd_atom(a);
    match b.kind(&env) {
        BddKind::Node(n) => {
            assert_eq!(n.atom, a);
            assert!(n.left.is_all());
            assert!(n.middle.is_nothing());
            assert!(n.right.is_nothing());
        }
        other => panic!("expected an interior node, got {:?}", other),
    }
}

#[test]
fn test_hash_consing_gives_equal_handles() {
    let env = TypeEnv::new();
    let a1 = env.reserve_list_atom();
    let a2 = env.reserve_list_atom();
    assert_eq!(env.bdd_atom(a1), env.bdd_atom(a1));
    assert_ne!(env.bdd_atom(a1), env.bdd_atom(a2));
}

// =========================================================================
// Boolean algebra
// =========================================================================

#[test]
fn test_atom_and_its_complement_partition() {
    let env = TypeEnv::new();
    let b = env.bdd_atom(env.reserve_list_atom());
    let c = env.bdd_complement(b);
    assert_eq!(env.bdd_intersect(b, c), Bdd::NOTHING);
    assert_eq!(env.bdd_union(b, c), Bdd::ALL);
}

#[test]
fn test_complement_is_an_involution() {
    let env = TypeEnv::new();
    let a1 = env.reserve_list_atom();
    let a2 = env.reserve_list_atom();
    let b = env.bdd_union(env.bdd_atom(a1), env.bdd_atom(a2));
    assert_eq!(env.bdd_complement(env.bdd_complement(b)), b);
}

#[test]
fn test_union_roots_at_the_smaller_atom() {
    let env = TypeEnv::new();
    let a1 = env.reserve_list_atom();
    let a2 = env.reserve_list_atom();
    let b1 = env.bdd_atom(a1);
    let b2 = env.bdd_atom(a2);

    let u = env.bdd_union(b1, b2);
    match u.kind(&env) {
        BddKind::Node(n) => {
            assert_eq!(n.atom, a1);
            assert!(n.left.is_all());
            assert_eq!(n.middle, b2);
            assert!(n.right.is_nothing());
        }
        other => panic!("expected an interior node, got {:?}", other),
    }
    // Same diagram from either argument order.
    assert_eq!(env.bdd_union(b2, b1), u);
}

#[test]
fn test_intersect_absorbs_terminals() {
    let env = TypeEnv::new();
    let b = env.bdd_atom(env.reserve_list_atom());
    assert_eq!(env.bdd_intersect(b, Bdd::ALL), b);
    assert_eq!(env.bdd_intersect(Bdd::ALL, b), b);
    assert_eq!(env.bdd_intersect(b, Bdd::NOTHING), Bdd::NOTHING);
    assert_eq!(env.bdd_union(b, Bdd::NOTHING), b);
    assert_eq!(env.bdd_union(b, Bdd::ALL), Bdd::ALL);
}

// =========================================================================
// Path folding
// =========================================================================

#[test]
fn test_fold_paths_lists_union_paths() {
    let env = TypeEnv::new();
    let a1 = env.reserve_list_atom();
    let a2 = env.reserve_list_atom();
    let u = env.bdd_union(env.bdd_atom(a1), env.bdd_atom(a2));

    assert_eq!(
        paths_of(&env, u),
        vec![(vec![a1], vec![]), (vec![a2], vec![])]
    );
}

#[test]
fn test_fold_paths_tracks_negations() {
    let env = TypeEnv::new();
    let a1 = env.reserve_list_atom();
    let a2 = env.reserve_list_atom();
    let d = env.bdd_diff(env.bdd_atom(a1), env.bdd_atom(a2));

    assert_eq!(paths_of(&env, d), vec![(vec![a1], vec![a2])]);
}

#[test]
fn test_fold_paths_of_terminals() {
    let env = TypeEnv::new();
    assert_eq!(paths_of(&env, Bdd::NOTHING), vec![]);
    assert_eq!(paths_of(&env, Bdd::ALL), vec![(vec![], vec![])]);
}

/// Reports whether any path exists, saturating on the first one.
struct FirstPath {
    leaves: usize,
}

impl PathFold for FirstPath {
    type Output = bool;

    fn bottom(&self) -> bool {
        false
    }

    fn all_leaf(&mut self, _pos: &[Atom], _neg: &[Atom]) -> bool {
        self.leaves += 1;
        true
    }

    fn combine(&self, a: bool, b: bool) -> bool {
        a || b
    }

    fn is_saturated(&self, value: &bool) -> bool {
        *value
    }
}

#[test]
fn test_fold_paths_short_circuits_when_saturated() {
    let env = TypeEnv::new();
    let a1 = env.reserve_list_atom();
    let a2 = env.reserve_list_atom();
    let u = env.bdd_union(env.bdd_atom(a1), env.bdd_atom(a2));

    let mut first = FirstPath { leaves: 0 };
    assert!(fold_paths(&env, u, &mut first));
    // The second path is never visited.
    assert_eq!(first.leaves, 1);
}
