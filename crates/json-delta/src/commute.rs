//! Commutation: reordering operation pairs (and whole patches) while
//! preserving the net document effect.
//!
//! `commute_ops([a, b]) = (b', a')` such that applying `[a, b]` and
//! `[b', a']` to the same document produce the same result. Array-index
//! bookkeeping is the interesting part: whichever operation ends up applied
//! second must have its index corrected for the structural shift the other
//! one introduces.

use json_delta_pointer::{is_path_equal, is_valid_index, Path};

use crate::types::{Op, Patch, PatchError};

/// Commute one adjacent operation pair, returning `(b', a')`.
///
/// # Errors
///
/// `NotCommutable` when the pair conflicts at the identical path (an
/// assertion, replacement, move or insertion followed by a remove of the
/// same location), or when both operations target the identical non-array
/// path and neither special rule applies.
pub fn commute_ops(a: &Op, b: &Op) -> Result<(Op, Op), PatchError> {
    if matches!(b, Op::Remove { .. }) && is_path_equal(a.path(), b.path()) {
        return match a {
            // Removing the same index twice deletes two adjacent elements;
            // the order of the two removes does not matter.
            Op::Remove { .. } => Ok((b.clone(), a.clone())),
            _ => Err(PatchError::NotCommutable(format!(
                "cannot commute {},remove for the same path",
                a.op_name()
            ))),
        };
    }

    // Assertions and in-place replacements do not shift structure.
    if matches!(a, Op::Test { .. } | Op::Replace { .. })
        && matches!(b, Op::Test { .. } | Op::Replace { .. })
    {
        return Ok((b.clone(), a.clone()));
    }

    commute_paths(a, b)
}

/// Commute a pair by their paths' common ancestor.
///
/// Only array ancestors get index arithmetic. Identical non-array paths are
/// rejected; overlapping-but-distinct object paths swap unchanged, since
/// object keys are stable locations that no reordering can shift.
pub fn commute_paths(a: &Op, b: &Op) -> Result<(Op, Op), PatchError> {
    let left = a.path();
    let right = b.path();
    let prefix = common_path_prefix(left, right);
    let array = is_array_pair(left, right, prefix);

    if prefix == 0 && !array {
        // No common ancestor: simple swap.
        return Ok((b.clone(), a.clone()));
    }

    if array {
        commute_array_paths(a, b)
    } else {
        commute_tree_paths(a, b)
    }
}

fn commute_tree_paths(a: &Op, b: &Op) -> Result<(Op, Op), PatchError> {
    if is_path_equal(a.path(), b.path()) {
        return Err(PatchError::NotCommutable(format!(
            "cannot commute {},{} with identical object paths",
            a.op_name(),
            b.op_name()
        )));
    }
    Ok((b.clone(), a.clone()))
}

fn commute_array_paths(a: &Op, b: &Op) -> Result<(Op, Op), PatchError> {
    let left = a.path();
    let right = b.path();

    if left.len() == right.len() {
        return Ok(commute_array_siblings(a, b));
    }

    if left.len() > right.len() {
        // Left is deeper: its index at the shared depth absorbs the shift.
        let new_left = commute_array_ancestor(b, right, left, -1);
        Ok((b.clone(), a.with_path(new_left)))
    } else {
        let new_right = commute_array_ancestor(a, left, right, 1);
        Ok((b.with_path(new_right), a.clone()))
    }
}

/// Commute two operations referring to items of the same array at the same
/// depth.
fn commute_array_siblings(a: &Op, b: &Op) -> (Op, Op) {
    let lpath = a.path();
    let rpath = b.path();
    let target = lpath.len() - 1;

    let (Some(li), Some(ri)) = (segment_index(lpath, target), segment_index(rpath, target))
    else {
        // The final segments are not both numeric; nothing to adjust.
        return (b.clone(), a.clone());
    };

    if li < ri {
        // Reordered first, the right op sees the array without the left
        // op's effect.
        match a {
            Op::Add { .. } | Op::Copy { .. } => {
                return (
                    b.with_path(with_index(rpath, target, ri.saturating_sub(1))),
                    a.clone(),
                );
            }
            Op::Remove { .. } => {
                return (b.with_path(with_index(rpath, target, ri + 1)), a.clone());
            }
            _ => {}
        }
    } else if matches!(b, Op::Add { .. } | Op::Copy { .. }) {
        return (b.clone(), a.with_path(with_index(lpath, target, li + 1)));
    } else if li > ri && matches!(b, Op::Remove { .. }) {
        return (
            b.clone(),
            a.with_path(with_index(lpath, target, li.saturating_sub(1))),
        );
    }

    (b.clone(), a.clone())
}

/// Adjust the deeper path's index at the shared array depth for the shift
/// the shallower operation introduces. `direction` is `+1` when the
/// shallower op moves from first to second position, `-1` the other way.
fn commute_array_ancestor(
    shallow_op: &Op,
    shallow: &Path,
    deep: &Path,
    direction: i64,
) -> Path {
    let target = shallow.len() - 1;
    let (Some(si), Some(di)) = (segment_index(shallow, target), segment_index(deep, target))
    else {
        return deep.clone();
    };

    if si > di {
        // The shallow op acts past the deep path's position: no shift.
        return deep.clone();
    }

    let shifted = match shallow_op {
        Op::Add { .. } | Op::Copy { .. } => di as i64 - direction,
        Op::Remove { .. } => di as i64 + direction,
        _ => return deep.clone(),
    };
    with_index(deep, target, shifted.max(0) as usize)
}

/// Commute the adjacent patch pair `p1, p2` into an equivalent pair
/// `(p2', p1')`.
pub fn commute(p1: &[Op], p2: &[Op]) -> Result<(Patch, Patch), PatchError> {
    let mut right: Patch = p2.to_vec();
    let mut left: Patch = Vec::with_capacity(p1.len());
    for op in p1.iter().rev() {
        let (new_right, moved) = commute_through(op, &right)?;
        right = new_right;
        left.insert(0, moved);
    }
    Ok((right, left))
}

/// Carry a single operation through a whole patch, returning the commuted
/// patch and the operation as it looks on the far side.
fn commute_through(op: &Op, patch: &[Op]) -> Result<(Patch, Op), PatchError> {
    let mut moved = op.clone();
    let mut out = Vec::with_capacity(patch.len());
    for p in patch {
        let (p_new, moved_new) = commute_ops(&moved, p)?;
        out.push(p_new);
        moved = moved_new;
    }
    Ok((out, moved))
}

/// Commute `p2` leftward past `p1`, keeping only the transformed `p2`.
///
/// This is the rebase workhorse: the transformed left side is discarded.
pub fn commute_rtl(p1: &[Op], p2: &[Op]) -> Result<Patch, PatchError> {
    p2.iter()
        .map(|op| {
            let mut moved = op.clone();
            for prior in p1.iter().rev() {
                let (m, _) = commute_ops(prior, &moved)?;
                moved = m;
            }
            Ok(moved)
        })
        .collect()
}

// ── Path helpers ──────────────────────────────────────────────────────────

/// Length of the common path prefix, per the ancestor-classification rule:
/// equal-length paths exclude their final segment (it cannot be a shared
/// ancestor), and the prefix never exceeds the shorter path.
fn common_path_prefix(p1: &[String], p2: &[String]) -> usize {
    let (l1, l2) = (p1.len(), p2.len());
    if l1 == 0 || l2 == 0 || (l1 < 2 && l2 < 2) {
        return 0;
    }
    let l = if l1 == l2 { l1 - 1 } else { l1.min(l2) };
    let mut i = 0;
    while i < l && p1[i] == p2[i] {
        i += 1;
    }
    i
}

fn is_array_pair(left: &[String], right: &[String], index: usize) -> bool {
    left.get(index).is_some_and(|s| is_valid_index(s))
        && right.get(index).is_some_and(|s| is_valid_index(s))
}

fn segment_index(path: &[String], at: usize) -> Option<usize> {
    path.get(at).and_then(|s| s.parse().ok())
}

fn with_index(path: &[String], at: usize, index: usize) -> Path {
    let mut out = path.to_vec();
    out[at] = index.to_string();
    out
}
