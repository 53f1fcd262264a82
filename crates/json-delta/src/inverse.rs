//! Patch inversion.
//!
//! The patch is processed back to front; each rule pushes the inverse
//! operation(s) and reports how many source operations it consumed, since
//! inverting a `remove` or `replace` also consumes the `test` that the
//! differ pairs with it.

use json_delta_pointer::is_path_equal;

use crate::types::{Context, Op, Patch, PatchError};

/// Compute the inverse of `patch`: applying `patch` then its inverse leaves
/// a document unchanged.
///
/// # Errors
///
/// `NotInvertible` when a `remove`/`replace` is not immediately preceded by
/// a `test` on the same path carrying the pre-mutation value, and for any
/// `copy` (an inverted copy cannot be told apart from an inverted later
/// edit, which would break the involution `inverse(inverse(p)) ~ p`).
pub fn inverse(patch: &[Op]) -> Result<Patch, PatchError> {
    let mut out = Vec::new();
    let mut i = patch.len();
    while i > 0 {
        let consumed = invert_op(&mut out, &patch[i - 1], i - 1, patch)?;
        i -= consumed;
    }
    Ok(out)
}

fn invert_op(
    out: &mut Patch,
    op: &Op,
    index: usize,
    patch: &[Op],
) -> Result<usize, PatchError> {
    match op {
        Op::Test { .. } => {
            out.push(op.clone());
            Ok(1)
        }
        Op::Add {
            path,
            value,
            context,
        } => {
            let context = context
                .as_ref()
                .map(|c| c.with_inserted(value.clone()));
            out.push(Op::Remove {
                path: path.clone(),
                context,
            });
            Ok(1)
        }
        Op::Remove { path, .. } => {
            let (value, context) = paired_test(patch, index, path).ok_or_else(|| {
                PatchError::NotInvertible("cannot invert remove without a preceding test".into())
            })?;
            out.push(Op::Add {
                path: path.clone(),
                value: value.clone(),
                context: context.map(Context::with_removed),
            });
            Ok(2)
        }
        Op::Replace { path, value, .. } => {
            let (old, _) = paired_test(patch, index, path).ok_or_else(|| {
                PatchError::NotInvertible("cannot invert replace without a preceding test".into())
            })?;
            out.push(Op::Test {
                path: path.clone(),
                value: value.clone(),
                context: None,
            });
            out.push(Op::Replace {
                path: path.clone(),
                value: old.clone(),
                context: None,
            });
            Ok(2)
        }
        Op::Move {
            path,
            from,
            context,
            from_context,
        } => {
            out.push(Op::Move {
                path: from.clone(),
                from: path.clone(),
                context: from_context.clone(),
                from_context: context.clone(),
            });
            Ok(1)
        }
        Op::Copy { .. } => Err(PatchError::NotInvertible("cannot invert copy".into())),
    }
}

/// The `test` immediately preceding `index`, if it targets `path`.
fn paired_test<'a>(
    patch: &'a [Op],
    index: usize,
    path: &[String],
) -> Option<(&'a serde_json::Value, Option<&'a Context>)> {
    if index == 0 {
        return None;
    }
    match &patch[index - 1] {
        Op::Test {
            path: test_path,
            value,
            context,
        } if is_path_equal(test_path, path) => Some((value, context.as_ref())),
        _ => None,
    }
}
