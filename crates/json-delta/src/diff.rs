//! Structural differ: computes an ordered patch that transforms one JSON
//! value into another.
//!
//! Objects are diffed key by key, arrays through the LCS aligner over
//! hashed elements, and everything else by whole-value replacement. With
//! `invertible` set (the default) every `remove`/`replace` is immediately
//! preceded by a `test` carrying the pre-mutation value, which is what the
//! inverter consumes.

use serde_json::{Map, Value};

use crate::lcs::{self, EditKind};
use crate::types::{Context, DiffOptions, Op, Patch};

/// Compute a patch such that applying it to `a` produces `b`.
pub fn diff(a: &Value, b: &Value, options: &DiffOptions<'_>) -> Patch {
    let mut state = DiffState {
        patch: Vec::new(),
        opts: options,
    };
    diff_any(&mut state, a, b, &[]);
    state.patch
}

/// Default array-element hash: the structural serialization of the value.
pub fn default_hash(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

struct DiffState<'a> {
    patch: Patch,
    opts: &'a DiffOptions<'a>,
}

impl DiffState<'_> {
    fn hash_of(&self, value: &Value) -> String {
        match self.opts.hash {
            Some(f) => f(value),
            None => default_hash(value),
        }
    }

    fn context_for(&self, index: usize, array: &[Value]) -> Option<Context> {
        self.opts.make_context.map(|f| f(index, array))
    }

    /// Emit `test(old)` (when invertible) followed by `replace(new)`.
    fn push_replace(&mut self, path: &[String], old: Value, new: Value) {
        if self.opts.invertible {
            self.patch.push(Op::Test {
                path: path.to_vec(),
                value: old,
                context: None,
            });
        }
        self.patch.push(Op::Replace {
            path: path.to_vec(),
            value: new,
            context: None,
        });
    }
}

fn diff_any(state: &mut DiffState<'_>, a: &Value, b: &Value, path: &[String]) {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => diff_arrays(state, x, y, path),
        (Value::Object(x), Value::Object(y)) => diff_objects(state, x, y, path),
        _ => diff_values(state, a, b, path),
    }
}

fn diff_objects(
    state: &mut DiffState<'_>,
    o1: &Map<String, Value>,
    o2: &Map<String, Value>,
    path: &[String],
) {
    // Wide objects: a single whole-subtree replace instead of per-key ops.
    // The shallow fallback never emits a paired test, so its output is not
    // invertible; callers wanting inversion disable `allow_shallow`.
    if state.opts.allow_shallow
        && (o1.len() > state.opts.shallow_threshold || o2.len() > state.opts.shallow_threshold)
    {
        if o1 != o2 {
            state.patch.push(Op::Replace {
                path: path.to_vec(),
                value: Value::Object(o2.clone()),
                context: None,
            });
        }
        return;
    }

    for (key, b_val) in o2 {
        let child = child_path(path, key);
        match o1.get(key) {
            Some(a_val) => {
                if a_val != b_val {
                    diff_any(state, a_val, b_val, &child);
                }
            }
            None => state.patch.push(Op::Add {
                path: child,
                value: b_val.clone(),
                context: None,
            }),
        }
    }

    for (key, a_val) in o1 {
        if !o2.contains_key(key) {
            let child = child_path(path, key);
            if state.opts.invertible {
                state.patch.push(Op::Test {
                    path: child.clone(),
                    value: a_val.clone(),
                    context: None,
                });
            }
            state.patch.push(Op::Remove {
                path: child,
                context: None,
            });
        }
    }
}

fn diff_arrays(state: &mut DiffState<'_>, a1: &[Value], a2: &[Value], path: &[String]) {
    if state.opts.allow_shallow
        && (a1.len() > state.opts.shallow_threshold || a2.len() > state.opts.shallow_threshold)
    {
        if a1 != a2 {
            state.patch.push(Op::Replace {
                path: path.to_vec(),
                value: Value::Array(a2.to_vec()),
                context: None,
            });
        }
        return;
    }

    let h1: Vec<String> = a1.iter().map(|v| state.hash_of(v)).collect();
    let h2: Vec<String> = a2.iter().map(|v| state.hash_of(v)).collect();
    let matrix = lcs::compare(&h1, &h2);

    // Ops land on the array as it looks mid-patch, so every emitted add and
    // remove shifts the indices of the ops that follow.
    let mut offset: i64 = 0;

    lcs::reduce(&matrix, (), |(), kind, i, j| match kind {
        EditKind::Remove => {
            let child = index_path(path, j as i64 + offset);
            let context = state.context_for(j, a1);
            if state.opts.invertible {
                state.patch.push(Op::Test {
                    path: child.clone(),
                    value: a1[j].clone(),
                    context: context.clone(),
                });
            }
            state.patch.push(Op::Remove {
                path: child,
                context,
            });
            offset -= 1;
        }
        EditKind::Add => {
            let child = index_path(path, j as i64 + offset);
            // A remove directly followed by an add of the same slot is a
            // replace; keep the remove's context so its paired test still
            // lines up.
            let coalesced = match state.patch.last() {
                Some(Op::Remove { path: last, .. }) if *last == child => true,
                _ => false,
            };
            if coalesced {
                let context = match state.patch.pop() {
                    Some(Op::Remove { context, .. }) => context,
                    _ => None,
                };
                state.patch.push(Op::Replace {
                    path: child,
                    value: a2[i].clone(),
                    context,
                });
            } else {
                state.patch.push(Op::Add {
                    path: child,
                    value: a2[i].clone(),
                    context: state.context_for(j, a1),
                });
            }
            offset += 1;
        }
        // Hashes matched; the pair may still differ deeper down.
        EditKind::Skip => diff_any(state, &a1[j], &a2[i], &index_path(path, j as i64 + offset)),
    });
}

fn diff_values(state: &mut DiffState<'_>, a: &Value, b: &Value, path: &[String]) {
    if a != b {
        state.push_replace(path, a.clone(), b.clone());
    }
}

fn child_path(path: &[String], key: &str) -> Vec<String> {
    let mut p = path.to_vec();
    p.push(key.to_string());
    p
}

fn index_path(path: &[String], index: i64) -> Vec<String> {
    child_path(path, &index.max(0).to_string())
}
