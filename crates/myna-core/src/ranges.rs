//! Integer range lists: the proper-subset representation of the int category.
//!
//! A range list is a sorted, non-overlapping, non-adjacent sequence of
//! inclusive `i64` ranges. Range lists are interned per environment
//! ([`RangeListId`]) so a `SemType` stays `Copy`; the empty list has a
//! reserved id and the full list `[i64::MIN, i64::MAX]` is never stored
//! (it is promoted to the int bit of the basic bitset by the set
//! operations).
//!
//! Projection uses the [`IntSubset`] view of a type's int portion as its
//! key: membership, maximum, and overlap queries against list index
//! boundaries.

use crate::env::TypeEnv;

// =============================================================================
// Range
// =============================================================================

/// An inclusive range of 64-bit integers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    pub min: i64,
    pub max: i64,
}

impl Range {
    /// Create a range. `min` must not exceed `max`.
    pub fn new(min: i64, max: i64) -> Self {
        assert!(min <= max, "malformed range: min {min} > max {max}");
        Self { min, max }
    }

    /// The range containing every `i64`.
    pub const FULL: Self = Self {
        min: i64::MIN,
        max: i64::MAX,
    };

    #[inline]
    pub fn contains(self, n: i64) -> bool {
        self.min <= n && n <= self.max
    }

    #[inline]
    fn overlaps(self, other: Range) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

// =============================================================================
// RangeListId - interned range list handle
// =============================================================================

/// Handle to an interned, normalized range list in a [`TypeEnv`].
///
/// Ids are only meaningful within the environment that produced them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RangeListId(pub u32);

impl RangeListId {
    /// The empty range list (no integers). Reserved; never stored.
    pub const EMPTY: Self = Self(0);

    /// First id handed out by an environment.
    pub const FIRST_VALID: u32 = 1;

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }
}

// =============================================================================
// Normalized range list operations
// =============================================================================

/// Check the range-list normal form: sorted, disjoint, with at least one
/// integer of gap between consecutive ranges.
pub(crate) fn ranges_normalized(ranges: &[Range]) -> bool {
    ranges
        .windows(2)
        .all(|w| w[0].max < i64::MAX && w[0].max.saturating_add(1) < w[1].min)
        && ranges.iter().all(|r| r.min <= r.max)
}

/// A range list denoting every integer.
#[inline]
pub(crate) fn ranges_full(ranges: &[Range]) -> bool {
    ranges.len() == 1 && ranges[0] == Range::FULL
}

/// Union of two normalized range lists.
pub(crate) fn ranges_union(a: &[Range], b: &[Range]) -> Vec<Range> {
    let mut all: Vec<Range> = Vec::with_capacity(a.len() + b.len());
    all.extend_from_slice(a);
    all.extend_from_slice(b);
    all.sort_by_key(|r| r.min);
    let mut out: Vec<Range> = Vec::with_capacity(all.len());
    for r in all {
        match out.last_mut() {
            // Overlapping or adjacent: extend the previous range.
            Some(last) if r.min <= last.max.saturating_add(1) => {
                last.max = last.max.max(r.max);
            }
            _ => out.push(r),
        }
    }
    out
}

/// Intersection of two normalized range lists.
pub(crate) fn ranges_intersect(a: &[Range], b: &[Range]) -> Vec<Range> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let lo = a[i].min.max(b[j].min);
        let hi = a[i].max.min(b[j].max);
        if lo <= hi {
            out.push(Range { min: lo, max: hi });
        }
        if a[i].max < b[j].max {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}

/// Complement of a normalized range list over all of `i64`.
pub(crate) fn ranges_complement(a: &[Range]) -> Vec<Range> {
    let mut out = Vec::with_capacity(a.len() + 1);
    let mut next = i64::MIN;
    for r in a {
        if r.min > next {
            out.push(Range {
                min: next,
                max: r.min - 1,
            });
        }
        if r.max == i64::MAX {
            return out;
        }
        next = r.max + 1;
    }
    out.push(Range {
        min: next,
        max: i64::MAX,
    });
    out
}

/// Difference of two normalized range lists.
pub(crate) fn ranges_diff(a: &[Range], b: &[Range]) -> Vec<Range> {
    ranges_intersect(a, &ranges_complement(b))
}

/// Membership test against a normalized range list.
pub(crate) fn ranges_contain(ranges: &[Range], n: i64) -> bool {
    for r in ranges {
        if n < r.min {
            return false;
        }
        if n <= r.max {
            return true;
        }
    }
    false
}

// =============================================================================
// IntSubset - the int portion of a SemType
// =============================================================================

/// View of a `SemType`'s int portion, as consumed by projection keys and
/// per-atom member-type queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntSubset {
    /// The whole int category.
    All,
    /// A proper, non-empty subset.
    Ranges(RangeListId),
    /// No integers.
    Empty,
}

impl IntSubset {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, IntSubset::Empty)
    }

    /// Does the subset contain `n`?
    pub fn contains(self, env: &TypeEnv, n: i64) -> bool {
        match self {
            IntSubset::All => true,
            IntSubset::Empty => false,
            IntSubset::Ranges(id) => ranges_contain(&env.range_list(id), n),
        }
    }

    /// Largest integer in the subset, if any.
    pub fn max(self, env: &TypeEnv) -> Option<i64> {
        match self {
            IntSubset::All => Some(i64::MAX),
            IntSubset::Empty => None,
            IntSubset::Ranges(id) => env.range_list(id).last().map(|r| r.max),
        }
    }

    /// Does the subset intersect `[min, max]`?
    pub fn overlaps_range(self, env: &TypeEnv, range: Range) -> bool {
        match self {
            IntSubset::All => true,
            IntSubset::Empty => false,
            IntSubset::Ranges(id) => env.range_list(id).iter().any(|r| r.overlaps(range)),
        }
    }
}

#[cfg(test)]
#[path = "../tests/ranges_tests.rs"]
mod tests;
