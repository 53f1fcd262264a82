//! Applying patches to documents.
//!
//! [`apply`] clones the document first; [`apply_in_place`] mutates the
//! caller's value operation by operation. Either way the target is patched
//! in sequence order, so a mid-sequence failure from `apply_in_place`
//! leaves the document partially patched; earlier operations are not
//! rolled back. Callers that need all-or-nothing behavior use [`apply`],
//! whose input is untouched on error.

use serde_json::Value;

use json_delta_pointer::{find_mut, format_json_pointer, is_child, Key, Target};

use crate::types::{ApplyOptions, Context, Op, PatchError};

/// Apply `patch` to a copy of `doc` and return the patched document.
pub fn apply(
    patch: &[Op],
    doc: &Value,
    options: &ApplyOptions<'_>,
) -> Result<Value, PatchError> {
    let mut doc = doc.clone();
    apply_in_place(patch, &mut doc, options)?;
    Ok(doc)
}

/// Apply `patch` directly to `doc`.
///
/// The caller hands over exclusive write access to `doc` for the duration:
/// partial mutation is visible mid-apply, and on error the document keeps
/// the effects of every operation before the failing one.
pub fn apply_in_place(
    patch: &[Op],
    doc: &mut Value,
    options: &ApplyOptions<'_>,
) -> Result<(), PatchError> {
    for op in patch {
        apply_op(doc, op, options)?;
    }
    Ok(())
}

/// Apply a single operation to the document.
pub fn apply_op(doc: &mut Value, op: &Op, options: &ApplyOptions<'_>) -> Result<(), PatchError> {
    match op {
        Op::Test {
            path,
            value,
            context,
        } => apply_test(doc, path, value, context.as_ref(), options),
        Op::Add {
            path,
            value,
            context,
        } => apply_add(doc, path, value.clone(), context.as_ref(), options),
        Op::Remove { path, context } => {
            apply_remove(doc, path, context.as_ref(), options).map(|_| ())
        }
        Op::Replace {
            path,
            value,
            context,
        } => apply_replace(doc, path, value.clone(), context.as_ref(), options),
        Op::Move {
            path,
            from,
            context,
            from_context,
        } => apply_move(
            doc,
            path,
            from,
            context.as_ref(),
            from_context.as_ref(),
            options,
        ),
        Op::Copy {
            path,
            from,
            context,
            from_context,
        } => apply_copy(
            doc,
            path,
            from,
            context.as_ref(),
            from_context.as_ref(),
            options,
        ),
    }
}

// ── Resolution ────────────────────────────────────────────────────────────

/// Resolve a path, routing array indices through the caller's
/// positional-recovery hook when both the hook and an operation context are
/// present.
fn resolve<'a>(
    doc: &'a mut Value,
    path: &[String],
    context: Option<&Context>,
    options: &ApplyOptions<'_>,
) -> Result<Option<Target<'a>>, PatchError> {
    match (options.find_context, context) {
        (Some(f), Some(ctx)) => {
            let recover = move |index: usize, array: &[Value]| f(index, array, ctx);
            Ok(find_mut(doc, path, Some(&recover))?)
        }
        _ => Ok(find_mut(doc, path, None)?),
    }
}

fn unresolvable(what: &str, path: &[String]) -> PatchError {
    PatchError::InvalidOperation(format!(
        "{what}: path {:?} does not resolve",
        format_json_pointer(path)
    ))
}

// ── Per-kind applicators ──────────────────────────────────────────────────

fn apply_test(
    doc: &mut Value,
    path: &[String],
    expected: &Value,
    context: Option<&Context>,
    options: &ApplyOptions<'_>,
) -> Result<(), PatchError> {
    let actual = match resolve(doc, path, context, options)? {
        Some(Target::Doc(v)) => Some(&*v),
        Some(Target::Inside { parent, key }) => match (&*parent, &key) {
            (Value::Array(arr), Key::Index(idx)) => arr.get(*idx),
            (Value::Object(map), Key::Member(k)) => map.get(k),
            _ => None,
        },
        None => None,
    };
    match actual {
        Some(actual) if actual == expected => Ok(()),
        Some(_) => Err(PatchError::AssertionFailed {
            path: format_json_pointer(path),
        }),
        None => Err(unresolvable("test", path)),
    }
}

fn apply_add(
    doc: &mut Value,
    path: &[String],
    value: Value,
    context: Option<&Context>,
    options: &ApplyOptions<'_>,
) -> Result<(), PatchError> {
    match resolve(doc, path, context, options)? {
        Some(Target::Doc(slot)) => {
            *slot = value;
            Ok(())
        }
        Some(Target::Inside { parent, key }) => match (parent, key) {
            (Value::Array(arr), Key::Append) => {
                arr.push(value);
                Ok(())
            }
            (Value::Array(arr), Key::Index(idx)) => {
                if idx > arr.len() {
                    return Err(PatchError::InvalidOperation(format!(
                        "add: index {idx} out of bounds (len {})",
                        arr.len()
                    )));
                }
                arr.insert(idx, value);
                Ok(())
            }
            (Value::Object(map), Key::Member(k)) => {
                map.insert(k, value);
                Ok(())
            }
            _ => Err(PatchError::InvalidOperation(format!(
                "add: parent of {:?} is not a container",
                format_json_pointer(path)
            ))),
        },
        None => Err(unresolvable("add", path)),
    }
}

fn apply_remove(
    doc: &mut Value,
    path: &[String],
    context: Option<&Context>,
    options: &ApplyOptions<'_>,
) -> Result<Value, PatchError> {
    match resolve(doc, path, context, options)? {
        Some(Target::Doc(_)) => Err(PatchError::InvalidOperation(
            "remove: cannot remove the whole document".to_string(),
        )),
        Some(Target::Inside { parent, key }) => match (parent, key) {
            (Value::Array(arr), Key::Index(idx)) => {
                if idx >= arr.len() {
                    return Err(unresolvable("remove", path));
                }
                Ok(arr.remove(idx))
            }
            (Value::Object(map), Key::Member(k)) => {
                map.remove(&k).ok_or_else(|| unresolvable("remove", path))
            }
            _ => Err(unresolvable("remove", path)),
        },
        None => Err(unresolvable("remove", path)),
    }
}

fn apply_replace(
    doc: &mut Value,
    path: &[String],
    value: Value,
    context: Option<&Context>,
    options: &ApplyOptions<'_>,
) -> Result<(), PatchError> {
    match resolve(doc, path, context, options)? {
        Some(Target::Doc(slot)) => {
            *slot = value;
            Ok(())
        }
        Some(Target::Inside { parent, key }) => match (parent, key) {
            (Value::Array(arr), Key::Index(idx)) => match arr.get_mut(idx) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(unresolvable("replace", path)),
            },
            (Value::Object(map), Key::Member(k)) => match map.get_mut(&k) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(unresolvable("replace", path)),
            },
            _ => Err(unresolvable("replace", path)),
        },
        None => Err(unresolvable("replace", path)),
    }
}

fn apply_move(
    doc: &mut Value,
    path: &[String],
    from: &[String],
    context: Option<&Context>,
    from_context: Option<&Context>,
    options: &ApplyOptions<'_>,
) -> Result<(), PatchError> {
    if is_child(from, path) {
        return Err(PatchError::InvalidOperation(format!(
            "move: {:?} is inside its own source {:?}",
            format_json_pointer(path),
            format_json_pointer(from)
        )));
    }
    let value = apply_remove(doc, from, from_context, options)?;
    apply_add(doc, path, value, context, options)
}

fn apply_copy(
    doc: &mut Value,
    path: &[String],
    from: &[String],
    context: Option<&Context>,
    from_context: Option<&Context>,
    options: &ApplyOptions<'_>,
) -> Result<(), PatchError> {
    let value = match resolve(doc, from, from_context, options)? {
        Some(Target::Doc(v)) => v.clone(),
        Some(Target::Inside { parent, key }) => match (&*parent, &key) {
            (Value::Array(arr), Key::Index(idx)) => arr
                .get(*idx)
                .cloned()
                .ok_or_else(|| unresolvable("copy", from))?,
            (Value::Object(map), Key::Member(k)) => map
                .get(k)
                .cloned()
                .ok_or_else(|| unresolvable("copy", from))?,
            _ => return Err(unresolvable("copy", from)),
        },
        None => return Err(unresolvable("copy", from)),
    };
    apply_add(doc, path, value, context, options)
}
