//! Projection: the member type of a list type at an integer key.
//!
//! Projection reuses the emptiness machinery: the same path walk over
//! the list BDD, the same positive-intersection and sampling. Instead of
//! asking whether a path is inhabited, it unions the member types that
//! witnesses of the path can carry at the key's indices. The sample set
//! is widened so that every partition overlapping the key is sampled
//! inside the key, and each escape from a negative contributes the
//! member types of the witnesses it proves.

use myna_core::{
    Atom, BasicTypeBitSet, IntSubset, PathFold, Range, SemType, TypeEnv, fold_paths,
};

use crate::context::TypeContext;
use crate::emptiness::{intersect_positives, list_sample_types, list_samples};

/// Member type of `t` at the indices in the int portion of `key`.
pub(crate) fn list_proj(cx: &mut TypeContext<'_>, t: SemType, key: SemType) -> SemType {
    if t.basic_bits().contains(BasicTypeBitSet::LIST) {
        return SemType::ANY;
    }
    let key = key.int_subset();
    if key.is_empty() {
        return SemType::NEVER;
    }
    let env = cx.env;
    fold_paths(env, t.list_bdd(), &mut ListProjFold { cx: &mut *cx, key })
}

/// Projection as a path fold: a union over paths, saturating once the
/// accumulated member type already covers everything.
struct ListProjFold<'a, 'env> {
    cx: &'a mut TypeContext<'env>,
    key: IntSubset,
}

impl PathFold for ListProjFold<'_, '_> {
    type Output = SemType;

    fn bottom(&self) -> SemType {
        SemType::NEVER
    }

    fn all_leaf(&mut self, pos: &[Atom], neg: &[Atom]) -> SemType {
        list_proj_path(self.cx, self.key, pos, neg)
    }

    fn combine(&self, a: SemType, b: SemType) -> SemType {
        self.cx.env.union(a, b)
    }

    fn is_saturated(&self, value: &SemType) -> bool {
        value.is_any()
    }
}

/// Member type contributed by one path of the diagram.
fn list_proj_path(cx: &mut TypeContext<'_>, key: IntSubset, pos: &[Atom], negs: &[Atom]) -> SemType {
    let Some((members, rest)) = intersect_positives(cx, pos) else {
        return SemType::NEVER;
    };
    let samples = list_samples(cx.env, &members, negs);
    let (indices, key_indices) = list_proj_samples(cx.env, &samples, key);
    let (member_types, n_required) = list_sample_types(cx, &members, rest, &indices);
    list_proj_exclude(cx, &indices, &key_indices, &member_types, n_required, negs)
}

/// Widen the emptiness samples with the boundaries of the key's ranges,
/// and record which samples lie inside the key.
///
/// Both ends of each range are added (clamped to the non-negative
/// indices lists actually have). A key properly inside one partition
/// needs no extra sample of its own: the partition's existing end sample
/// has the same member type. Returns the combined sorted indices and the
/// positions within them that belong to the key.
fn list_proj_samples(env: &TypeEnv, samples: &[i64], key: IntSubset) -> (Vec<i64>, Vec<usize>) {
    let mut tagged: Vec<(i64, bool)> = samples
        .iter()
        .map(|&i| (i, key.contains(env, i)))
        .collect();
    if let IntSubset::Ranges(id) = key {
        for &Range { min, max } in env.range_list(id).iter() {
            if max >= 0 {
                tagged.push((max, true));
                let min = min.max(0);
                if min < max {
                    tagged.push((min, true));
                }
            }
        }
    }
    tagged.sort_by_key(|&(index, _)| index);
    let mut indices = Vec::with_capacity(tagged.len());
    let mut key_indices = Vec::new();
    for (index, in_key) in tagged {
        if indices.last() != Some(&index) {
            if in_key {
                key_indices.push(indices.len());
            }
            indices.push(index);
        }
    }
    (indices, key_indices)
}

/// The union-accumulating counterpart of the inhabitation check.
///
/// With no negatives left, the witnesses are exactly the sampled shape,
/// and the projection is the union of its member types at the key
/// samples. Each way of escaping a negative restricts the witnesses, so
/// each contributes the projection of its restricted shape.
fn list_proj_exclude(
    cx: &mut TypeContext<'_>,
    indices: &[i64],
    key_indices: &[usize],
    member_types: &[SemType],
    n_required: usize,
    negs: &[Atom],
) -> SemType {
    let Some((&neg_atom, rest_negs)) = negs.split_first() else {
        let len = member_types.len();
        return cx.env.union_all(
            key_indices
                .iter()
                .filter(|&&k| k < len)
                .map(|&k| member_types[k]),
        );
    };
    let nt = cx.env.list_atom(neg_atom);
    if n_required > 0 && nt.member_at(indices[n_required - 1]).is_never() {
        return list_proj_exclude(cx, indices, key_indices, member_types, n_required, rest_negs);
    }
    let mut projected = SemType::NEVER;
    let neg_len = nt.members.fixed_length;
    if neg_len > 0 {
        let len = member_types.len();
        if len < indices.len() && indices[len] < neg_len {
            return list_proj_exclude(cx, indices, key_indices, member_types, n_required, rest_negs);
        }
        for i in n_required..member_types.len() {
            if indices[i] >= neg_len {
                break;
            }
            let shorter = list_proj_exclude(
                cx,
                indices,
                key_indices,
                &member_types[..i],
                n_required,
                rest_negs,
            );
            projected = cx.env.union(projected, shorter);
        }
    }
    for i in 0..member_types.len() {
        let d = cx.env.diff(member_types[i], nt.member_at(indices[i]));
        if !cx.is_empty(d) {
            let mut with_d = member_types.to_vec();
            with_d[i] = d;
            let narrowed = list_proj_exclude(
                cx,
                indices,
                key_indices,
                &with_d,
                n_required.max(i + 1),
                rest_negs,
            );
            projected = cx.env.union(projected, narrowed);
        }
    }
    projected
}

#[cfg(test)]
#[path = "../tests/projection_tests.rs"]
mod tests;
