//! JSON wire codec for patch operations.
//!
//! Operations serialize as RFC 6902-shaped objects
//! `{op, path, value?, from?, context?, fromContext?}` with `path`/`from`
//! as escaped pointer strings. `context`/`fromContext` are this crate's
//! positional-recovery extension and encode as `{before, after}` arrays.

use serde_json::{Map, Value};

use json_delta_pointer::{format_json_pointer, parse_json_pointer};

use crate::types::{Context, Op, Patch, PatchError};

// ── Serialization ─────────────────────────────────────────────────────────

/// Serialize an operation to its wire form.
pub fn to_json(op: &Op) -> Value {
    let mut m = Map::new();
    m.insert("op".into(), Value::String(op.op_name().into()));
    m.insert(
        "path".into(),
        Value::String(format_json_pointer(op.path())),
    );
    match op {
        Op::Test { value, context, .. }
        | Op::Add { value, context, .. }
        | Op::Replace { value, context, .. } => {
            m.insert("value".into(), value.clone());
            insert_context(&mut m, "context", context.as_ref());
        }
        Op::Remove { context, .. } => {
            insert_context(&mut m, "context", context.as_ref());
        }
        Op::Move {
            from,
            context,
            from_context,
            ..
        }
        | Op::Copy {
            from,
            context,
            from_context,
            ..
        } => {
            m.insert("from".into(), Value::String(format_json_pointer(from)));
            insert_context(&mut m, "context", context.as_ref());
            insert_context(&mut m, "fromContext", from_context.as_ref());
        }
    }
    Value::Object(m)
}

/// Serialize a whole patch to a JSON array.
pub fn to_json_patch(patch: &[Op]) -> Value {
    Value::Array(patch.iter().map(to_json).collect())
}

fn insert_context(m: &mut Map<String, Value>, key: &str, context: Option<&Context>) {
    if let Some(ctx) = context {
        let mut c = Map::new();
        c.insert("before".into(), Value::Array(ctx.before.clone()));
        c.insert("after".into(), Value::Array(ctx.after.clone()));
        m.insert(key.into(), Value::Object(c));
    }
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Deserialize a single wire-form operation.
pub fn from_json(v: &Value) -> Result<Op, PatchError> {
    let obj = v
        .as_object()
        .ok_or_else(|| PatchError::InvalidOperation("operation must be an object".into()))?;
    let tag = obj
        .get("op")
        .and_then(Value::as_str)
        .ok_or_else(|| PatchError::InvalidOperation("missing 'op' field".into()))?;
    let path = decode_path(obj, "path")?
        .ok_or_else(|| PatchError::InvalidOperation("missing 'path' field".into()))?;
    let context = decode_context(obj, "context")?;

    match tag {
        "test" => Ok(Op::Test {
            path,
            value: required_value(obj, "test")?,
            context,
        }),
        "add" => Ok(Op::Add {
            path,
            value: required_value(obj, "add")?,
            context,
        }),
        "remove" => Ok(Op::Remove { path, context }),
        "replace" => Ok(Op::Replace {
            path,
            value: required_value(obj, "replace")?,
            context,
        }),
        "move" => Ok(Op::Move {
            path,
            from: required_from(obj, "move")?,
            context,
            from_context: decode_context(obj, "fromContext")?,
        }),
        "copy" => Ok(Op::Copy {
            path,
            from: required_from(obj, "copy")?,
            context,
            from_context: decode_context(obj, "fromContext")?,
        }),
        other => Err(PatchError::InvalidOperation(format!(
            "unknown op: {other}"
        ))),
    }
}

/// Deserialize a JSON array into a patch.
pub fn from_json_patch(v: &Value) -> Result<Patch, PatchError> {
    let arr = v
        .as_array()
        .ok_or_else(|| PatchError::InvalidOperation("patch must be an array".into()))?;
    arr.iter().map(from_json).collect()
}

fn decode_path(
    obj: &Map<String, Value>,
    key: &str,
) -> Result<Option<Vec<String>>, PatchError> {
    match obj.get(key) {
        None => Ok(None),
        Some(v) => {
            let s = v.as_str().ok_or_else(|| {
                PatchError::InvalidOperation(format!("'{key}' must be a string"))
            })?;
            Ok(Some(parse_json_pointer(s)))
        }
    }
}

fn required_value(obj: &Map<String, Value>, tag: &str) -> Result<Value, PatchError> {
    obj.get("value")
        .cloned()
        .ok_or_else(|| PatchError::InvalidOperation(format!("{tag} requires 'value'")))
}

fn required_from(obj: &Map<String, Value>, tag: &str) -> Result<Vec<String>, PatchError> {
    decode_path(obj, "from")?
        .ok_or_else(|| PatchError::InvalidOperation(format!("{tag} requires 'from'")))
}

fn decode_context(
    obj: &Map<String, Value>,
    key: &str,
) -> Result<Option<Context>, PatchError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(c)) => {
            let field = |name: &str| -> Result<Vec<Value>, PatchError> {
                match c.get(name) {
                    None => Ok(Vec::new()),
                    Some(Value::Array(items)) => Ok(items.clone()),
                    Some(_) => Err(PatchError::InvalidOperation(format!(
                        "context '{name}' must be an array"
                    ))),
                }
            };
            Ok(Some(Context {
                before: field("before")?,
                after: field("after")?,
            }))
        }
        Some(_) => Err(PatchError::InvalidOperation(format!(
            "'{key}' must be an object"
        ))),
    }
}
