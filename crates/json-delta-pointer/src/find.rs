//! Path resolution against a JSON document.

use serde_json::Value;

use crate::types::{Key, Target};
use crate::{is_valid_index, parse_array_index, PointerError};

/// Positional-recovery hook: given the index an operation was authored
/// against and the array as it looks now, return the index the operation
/// should target today. `None` means the original position could not be
/// recovered and resolution must fail.
///
/// Callers bind whatever context snapshot they carry into the closure before
/// passing it here, so this crate stays agnostic of patch formats.
pub type Recover<'a> = dyn Fn(usize, &[Value]) -> Option<usize> + 'a;

/// Look up the value at `path`, read-only.
///
/// Returns `None` when any step of the path does not resolve.
///
/// # Example
///
/// ```
/// use json_delta_pointer::find;
///
/// let doc = serde_json::json!({"a": [10, 20]});
/// let path = vec!["a".to_string(), "1".to_string()];
/// assert_eq!(find(&doc, &path), Some(&serde_json::json!(20)));
/// assert_eq!(find(&doc, &["missing".to_string()]), None);
/// ```
pub fn find<'a>(doc: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut cur = doc;
    for step in path {
        cur = match cur {
            Value::Array(arr) => {
                if !is_valid_index(step) {
                    return None;
                }
                arr.get(step.parse::<usize>().ok()?)?
            }
            Value::Object(map) => map.get(step)?,
            _ => return None,
        };
    }
    Some(cur)
}

/// Resolve `path` against `doc` to a mutable `(parent, key)` location.
///
/// - The empty path resolves to [`Target::Doc`]: the whole document, with no
///   key (callers treat this as "replace/test the whole document").
/// - Array containers require segments that are canonical indices or the `-`
///   append marker; anything else is [`PointerError::InvalidIndex`]. Numeric
///   indices are re-derived through `recover` when one is supplied, and a
///   hook that returns `None` fails with [`PointerError::RecoveryFailed`].
/// - Resolution that passes through `null`, a scalar, a missing member, or
///   an out-of-range index at any non-final step returns `Ok(None)`.
/// - The final segment is classified against the parent it lands in: arrays
///   yield [`Key::Append`] or [`Key::Index`], everything else yields
///   [`Key::Member`] (and it is up to the caller to reject a non-container
///   parent).
pub fn find_mut<'a>(
    doc: &'a mut Value,
    path: &[String],
    recover: Option<&Recover<'_>>,
) -> Result<Option<Target<'a>>, PointerError> {
    if path.is_empty() {
        return Ok(Some(Target::Doc(doc)));
    }

    let (parent_path, last) = path.split_at(path.len() - 1);
    let last = &last[0];

    let mut cur = doc;
    for step in parent_path {
        cur = match cur {
            Value::Array(arr) => {
                let idx = if step == "-" {
                    arr.len()
                } else {
                    array_index(step, arr, recover)?
                };
                match arr.get_mut(idx) {
                    Some(v) => v,
                    None => return Ok(None),
                }
            }
            Value::Object(map) => match map.get_mut(step) {
                Some(v) => v,
                None => return Ok(None),
            },
            _ => return Ok(None),
        };
    }

    let key = match &*cur {
        Value::Array(arr) => {
            if last == "-" {
                Key::Append
            } else {
                Key::Index(array_index(last, arr, recover)?)
            }
        }
        _ => Key::Member(last.clone()),
    };

    Ok(Some(Target::Inside { parent: cur, key }))
}

fn array_index(
    step: &str,
    arr: &[Value],
    recover: Option<&Recover<'_>>,
) -> Result<usize, PointerError> {
    let idx = parse_array_index(step)?;
    match recover {
        Some(f) => f(idx, arr).ok_or(PointerError::RecoveryFailed(idx)),
        None => Ok(idx),
    }
}
