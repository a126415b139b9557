use super::*;
use crate::env::TypeEnv;
use crate::ranges::IntSubset;
use crate::types::SemType;

// =========================================================================
// FixedLengthArray invariants
// =========================================================================

#[test]
fn test_empty_prefix() {
    assert_eq!(FixedLengthArray::EMPTY.fixed_length, 0);
    assert!(FixedLengthArray::EMPTY.initial.is_empty());
    let built = FixedLengthArray::new(vec![], 0);
    assert_eq!(built, FixedLengthArray::EMPTY);
}

#[test]
#[should_panic(expected = "non-negative")]
fn test_negative_fixed_length_panics() {
    let _ = FixedLengthArray::new(vec![], -1);
}

#[test]
#[should_panic(expected = "exceed the fixed length")]
fn test_oversized_initial_panics() {
    let _ = FixedLengthArray::new(vec![SemType::INT, SemType::INT, SemType::INT], 2);
}

#[test]
#[should_panic(expected = "at least one member type")]
fn test_positive_length_without_members_panics() {
    let _ = FixedLengthArray::new(vec![], 2);
}

#[test]
fn test_member_at_repeats_the_last_member() {
    let prefix = FixedLengthArray::new(vec![SemType::INT, SemType::STRING], 5);
    assert_eq!(prefix.member_at(0), SemType::INT);
    assert_eq!(prefix.member_at(1), SemType::STRING);
    // Positions 2..5 are compressed into the last member.
    assert_eq!(prefix.member_at(2), SemType::STRING);
    assert_eq!(prefix.member_at(4), SemType::STRING);
}

// =========================================================================
// ListAtomicType
// =========================================================================

#[test]
fn test_member_at_falls_back_to_rest() {
    let atomic = ListAtomicType::new(
        FixedLengthArray::new(vec![SemType::INT], 1),
        SemType::STRING,
    );
    assert_eq!(atomic.member_at(0), SemType::INT);
    assert_eq!(atomic.member_at(1), SemType::STRING);
    assert_eq!(atomic.member_at(100), SemType::STRING);
}

#[test]
fn test_member_type_at_empty_and_all_keys() {
    let env = TypeEnv::new();
    let atomic = ListAtomicType::new(
        FixedLengthArray::new(vec![SemType::INT], 1),
        SemType::STRING,
    );
    assert_eq!(atomic.member_type_at(&env, IntSubset::Empty), SemType::NEVER);
    assert_eq!(
        atomic.member_type_at(&env, IntSubset::All),
        env.union(SemType::INT, SemType::STRING)
    );
}

#[test]
fn test_member_type_at_range_keys() {
    let env = TypeEnv::new();
    // Positions: 0 int, 1 boolean, 2..3 boolean (compressed), 4.. string.
    let atomic = ListAtomicType::new(
        FixedLengthArray::new(vec![SemType::INT, SemType::BOOLEAN], 4),
        SemType::STRING,
    );

    let at = |min, max| atomic.member_type_at(&env, env.int_range(min, max).int_subset());
    assert_eq!(at(0, 0), SemType::INT);
    assert_eq!(at(1, 1), SemType::BOOLEAN);
    assert_eq!(at(2, 2), SemType::BOOLEAN);
    assert_eq!(at(3, 10), env.union(SemType::BOOLEAN, SemType::STRING));
    assert_eq!(at(100, 200), SemType::STRING);
    assert_eq!(at(0, 1), env.union(SemType::INT, SemType::BOOLEAN));
}

#[test]
fn test_member_type_at_with_no_prefix() {
    let env = TypeEnv::new();
    let atomic = ListAtomicType::new(FixedLengthArray::EMPTY, SemType::INT);
    let key = env.int_range(5, 9).int_subset();
    assert_eq!(atomic.member_type_at(&env, key), SemType::INT);
}

// =========================================================================
// Constructors
// =========================================================================

#[test]
fn test_tuple_of_shares_atoms() {
    let env = TypeEnv::new();
    let t1 = env.tuple_of(vec![SemType::INT, SemType::STRING]);
    let t2 = env.tuple_of(vec![SemType::INT, SemType::STRING]);
    let t3 = env.tuple_of(vec![SemType::STRING, SemType::INT]);
    assert_eq!(t1, t2);
    assert_ne!(t1, t3);
}

#[test]
fn test_array_of_differs_from_tuples() {
    let env = TypeEnv::new();
    let unit = env.tuple_of(vec![]);
    let ints = env.array_of(SemType::INT);
    assert_ne!(unit, ints);
    assert_eq!(env.array_of(SemType::INT), ints);
}

#[test]
fn test_fixed_array_of_compresses() {
    let env = TypeEnv::new();
    let t = env.fixed_array_of(SemType::INT, 100);
    assert_eq!(env.fixed_array_of(SemType::INT, 100), t);
    assert_ne!(env.fixed_array_of(SemType::INT, 99), t);
    // Length zero is the unit tuple, whatever the member type.
    assert_eq!(env.fixed_array_of(SemType::INT, 0), env.tuple_of(vec![]));
    assert_eq!(env.fixed_array_of(SemType::STRING, 0), env.tuple_of(vec![]));
}

#[test]
fn test_list_definition_two_phase() {
    let env = TypeEnv::new();
    let def = ListDefinition::new(&env);
    let atom = def.atom();
    let t = def.sem_type(&env);
    // The handle is usable before the definition lands.
    assert!(!t.is_never());
    let defined = def.define(
        &env,
        FixedLengthArray::EMPTY,
        env.union(SemType::INT, t),
    );
    assert_eq!(defined, t);
    let atomic = env.list_atom(atom);
    assert_eq!(atomic.rest, env.union(SemType::INT, t));
}
