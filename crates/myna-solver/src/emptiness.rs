//! Emptiness of the list portion of a type.
//!
//! A list BDD denotes a union of paths, each path an intersection of
//! positive list atoms minus a set of negative ones. The diagram is
//! empty iff every path is. Deciding one path works on a finite set of
//! sample indices rather than on whole (possibly unbounded) lists: the
//! non-negative integers are partitioned so that two indices in the same
//! partition always get the same member type from the path's atoms, and
//! enough samples are drawn per partition to account for every negative.
//!
//! Member types of the samples are themselves `SemType`s, so the
//! procedure recurses through [`TypeContext::is_empty`]; the context's
//! memo table breaks cycles introduced by recursive atom definitions.

use myna_core::{Atom, Bdd, FixedLengthArray, PathFold, SemType, TypeEnv, fold_paths};
use tracing::trace;

use crate::context::{MemoStatus, TypeContext};

/// Red zone and growth size for the explicit stack extension. Deeply
/// nested member types recurse through here once per nesting level.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

/// Is the set denoted by `bdd` empty?
///
/// Memoized per context. A re-entrant lookup (the diagram's own
/// emptiness is still being computed further up the stack) answers "not
/// empty": the recursive occurrence is assumed inhabited and the outer
/// computation then settles the final answer, which is what makes
/// queries over recursive types terminate.
pub(crate) fn list_bdd_is_empty(cx: &mut TypeContext<'_>, bdd: Bdd) -> bool {
    if let Some(&status) = cx.list_memo.get(&bdd) {
        match status {
            MemoStatus::Resolved(empty) => return empty,
            MemoStatus::Computing => {
                trace!(bdd = ?bdd, "emptiness cycle, assuming inhabited");
                return false;
            }
        }
    }
    cx.list_memo.insert(bdd, MemoStatus::Computing);
    let env = cx.env;
    let empty = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
        fold_paths(env, bdd, &mut ListFormulaEmpty { cx: &mut *cx })
    });
    trace!(bdd = ?bdd, empty, "list emptiness resolved");
    cx.list_memo.insert(bdd, MemoStatus::Resolved(empty));
    empty
}

/// Emptiness as a path fold: the diagram is empty iff every path is, so
/// a single inhabited path short-circuits the walk.
struct ListFormulaEmpty<'a, 'env> {
    cx: &'a mut TypeContext<'env>,
}

impl PathFold for ListFormulaEmpty<'_, '_> {
    type Output = bool;

    fn bottom(&self) -> bool {
        true
    }

    fn all_leaf(&mut self, pos: &[Atom], neg: &[Atom]) -> bool {
        list_formula_is_empty(self.cx, pos, neg)
    }

    fn combine(&self, a: bool, b: bool) -> bool {
        a && b
    }

    fn is_saturated(&self, value: &bool) -> bool {
        !*value
    }
}

/// Is the path `pos1 & pos2 & ... & !neg1 & !neg2 & ...` empty?
fn list_formula_is_empty(cx: &mut TypeContext<'_>, pos: &[Atom], negs: &[Atom]) -> bool {
    let Some((members, rest)) = intersect_positives(cx, pos) else {
        return true;
    };
    let indices = list_samples(cx.env, &members, negs);
    let (member_types, n_required) = list_sample_types(cx, &members, rest, &indices);
    !list_inhabited(cx, &indices, &member_types, n_required, negs)
}

/// Intersect the positive atoms of a path into a single shape.
///
/// `None` means the conjunction is already empty: the atoms require
/// incompatible lengths, or some required member type is empty. An
/// inhabitable rest that happens to denote the empty set is normalized
/// to `NEVER` so later structural checks can rely on it.
pub(crate) fn intersect_positives(
    cx: &mut TypeContext<'_>,
    pos: &[Atom],
) -> Option<(FixedLengthArray, SemType)> {
    let Some((&first, more)) = pos.split_first() else {
        return Some((FixedLengthArray::EMPTY, SemType::ANY));
    };
    let atomic = cx.env.list_atom(first);
    let mut members = atomic.members.clone();
    let mut rest = atomic.rest;
    for &atom in more {
        let atomic = cx.env.list_atom(atom);
        let (m, r) = list_intersect_with(cx.env, &members, rest, &atomic.members, atomic.rest)?;
        members = m;
        rest = r;
    }
    if fixed_array_any_empty(cx, &members) {
        return None;
    }
    if !rest.is_never() && cx.is_empty(rest) {
        rest = SemType::NEVER;
    }
    Some((members, rest))
}

/// Pointwise intersection of two list shapes, or `None` when their
/// length requirements cannot both be met.
fn list_intersect_with(
    env: &TypeEnv,
    members1: &FixedLengthArray,
    rest1: SemType,
    members2: &FixedLengthArray,
    rest2: SemType,
) -> Option<(FixedLengthArray, SemType)> {
    if list_lengths_disjoint(members1, rest1, members2, rest2) {
        return None;
    }
    let max = members1.initial.len().max(members2.initial.len());
    let initial = (0..max as i64)
        .map(|i| {
            env.intersect(
                list_member_at(members1, rest1, i),
                list_member_at(members2, rest2, i),
            )
        })
        .collect();
    Some((
        FixedLengthArray::new(initial, members1.fixed_length.max(members2.fixed_length)),
        env.intersect(rest1, rest2),
    ))
}

/// One shape requires more members than the other can ever have.
fn list_lengths_disjoint(
    members1: &FixedLengthArray,
    rest1: SemType,
    members2: &FixedLengthArray,
    rest2: SemType,
) -> bool {
    let len1 = members1.fixed_length;
    let len2 = members2.fixed_length;
    if len1 < len2 {
        return rest1.is_never();
    }
    if len2 < len1 {
        return rest2.is_never();
    }
    false
}

pub(crate) fn list_member_at(members: &FixedLengthArray, rest: SemType, index: i64) -> SemType {
    if index < members.fixed_length {
        members.member_at(index)
    } else {
        rest
    }
}

fn fixed_array_any_empty(cx: &mut TypeContext<'_>, array: &FixedLengthArray) -> bool {
    array.initial.iter().any(|&t| cx.is_empty(t))
}

/// Sample indices for [`list_inhabited`].
///
/// The positive shape is `members` plus its rest; the negatives are
/// `negs`. Indices are chosen in two stages. First the non-negative
/// integers are partitioned so that two indices land in different
/// partitions whenever any shape involved can give them different member
/// types; the partition boundaries are `1..=max_initial_length` plus
/// the positive's and each negative's fixed length beyond that. Then
/// samples are drawn per partition. Which indices are picked does not
/// matter, but there must be at least as many samples per partition as
/// there are negatives, so that each negative can be escaped at a sample
/// of its own.
pub(crate) fn list_samples(env: &TypeEnv, members: &FixedLengthArray, negs: &[Atom]) -> Vec<i64> {
    let mut max_initial_length = members.initial.len() as i64;
    // The positive's own fixed length is a boundary too: below it a
    // compressed prefix repeats the last stored member, at and above it
    // the rest type takes over.
    let mut fixed_lengths = vec![members.fixed_length];
    for &atom in negs {
        let atomic = env.list_atom(atom);
        max_initial_length = max_initial_length.max(atomic.members.initial.len() as i64);
        if atomic.members.fixed_length > max_initial_length {
            fixed_lengths.push(atomic.members.fixed_length);
        }
    }
    fixed_lengths.sort_unstable();
    // An index b is a boundary when indices below b can differ from
    // indices at or above b.
    let mut boundaries: Vec<i64> = (1..=max_initial_length).collect();
    for n in fixed_lengths {
        // Skips duplicates as well.
        if boundaries.last().is_none_or(|&last| n > last) {
            boundaries.push(n);
        }
    }
    // Projection calls this with no negatives and still needs a sample.
    let n_neg = (negs.len() as i64).max(1);
    let mut indices = Vec::new();
    let mut last_boundary = 0i64;
    for b in boundaries {
        let segment_length = b - last_boundary;
        // No more samples than the partition holds.
        let n_samples = segment_length.min(n_neg);
        indices.extend((b - n_samples)..b);
        last_boundary = b;
    }
    for i in 0..n_neg {
        if last_boundary > i64::MAX - i {
            break;
        }
        indices.push(last_boundary + i);
    }
    indices
}

/// Member types of the sampled indices under the positive shape.
///
/// Stops at the first empty member type, so the returned vector may be
/// shorter than `indices`; a list inhabiting the positive cannot reach
/// past an empty member. `n_required` counts the leading samples that
/// fall below the positive's fixed length and are therefore required to
/// exist.
pub(crate) fn list_sample_types(
    cx: &mut TypeContext<'_>,
    members: &FixedLengthArray,
    rest: SemType,
    indices: &[i64],
) -> (Vec<SemType>, usize) {
    let mut member_types = Vec::with_capacity(indices.len());
    let mut n_required = 0;
    for (i, &index) in indices.iter().enumerate() {
        let t = list_member_at(members, rest, index);
        if cx.is_empty(t) {
            break;
        }
        member_types.push(t);
        if index < members.fixed_length {
            n_required = i + 1;
        }
    }
    (member_types, n_required)
}

/// Is some list in the positive shape outside every negative?
///
/// The positive is given through its samples: `member_types[i]` is the
/// type the positive assigns to `indices[i]`, and the first `n_required`
/// samples are required members. Each negative is escaped either by
/// being too short or too long to overlap the positive's lengths, or by
/// making some sampled member avoid the negative's member type there;
/// with the negatives all escaped, a witness list exists.
fn list_inhabited(
    cx: &mut TypeContext<'_>,
    indices: &[i64],
    member_types: &[SemType],
    n_required: usize,
    negs: &[Atom],
) -> bool {
    let Some((&neg_atom, rest_negs)) = negs.split_first() else {
        return true;
    };
    let nt = cx.env.list_atom(neg_atom);
    if n_required > 0 && nt.member_at(indices[n_required - 1]).is_never() {
        // The negative cannot be as long as the positive requires.
        return list_inhabited(cx, indices, member_types, n_required, rest_negs);
    }
    let neg_len = nt.members.fixed_length;
    if neg_len > 0 {
        let len = member_types.len();
        if len < indices.len() && indices[len] < neg_len {
            // The positive's lists all end before the negative begins.
            return list_inhabited(cx, indices, member_types, n_required, rest_negs);
        }
        // A witness shorter than the negative's minimum length escapes
        // it; try each truncation the positive allows.
        for i in n_required..member_types.len() {
            if indices[i] >= neg_len {
                break;
            }
            if list_inhabited(cx, indices, &member_types[..i], n_required, rest_negs) {
                return true;
            }
        }
    }
    // For a witness of full length, escaping [t0, t1, ...] needs some
    // coordinate i where the member is in the positive's type but not in
    // ti. Try each coordinate; the sample at i then becomes required,
    // since a shorter list would not escape this way.
    for i in 0..member_types.len() {
        let d = cx.env.diff(member_types[i], nt.member_at(indices[i]));
        if !cx.is_empty(d) {
            let mut with_d = member_types.to_vec();
            with_d[i] = d;
            if list_inhabited(cx, indices, &with_d, n_required.max(i + 1), rest_negs) {
                return true;
            }
        }
    }
    // Correct for zero samples too: then the negative's length is also
    // zero, and [] minus [] is empty.
    false
}

#[cfg(test)]
#[path = "../tests/emptiness_tests.rs"]
mod tests;
