//! Core types for the patch algebra: operations, contexts, errors, and the
//! diff/apply configuration surface.

use serde_json::Value;
use thiserror::Error;

pub use json_delta_pointer::{Path, PathStep};

// ── Error ─────────────────────────────────────────────────────────────────

/// Failure taxonomy for every operation in the crate.
///
/// All failures are synchronous and surfaced to the immediate caller; the
/// core performs no retries, recovery, or logging.
#[derive(Debug, Error, PartialEq)]
pub enum PatchError {
    /// A `test` operation found a value other than the one it asserts.
    #[error("test failed at {path}")]
    AssertionFailed {
        /// The asserted location, as an encoded pointer string.
        path: String,
    },
    /// A structurally invalid operation: bad or missing path, missing
    /// value, out-of-bounds index, unknown operation tag, or a move whose
    /// source contains its destination.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// The patch cannot be inverted (a remove/replace without its paired
    /// test, or any copy).
    #[error("patch not invertible: {0}")]
    NotInvertible(String),
    /// The operation pair cannot be reordered without changing the net
    /// document effect.
    #[error("operations cannot be commuted: {0}")]
    NotCommutable(String),
}

impl From<json_delta_pointer::PointerError> for PatchError {
    fn from(err: json_delta_pointer::PointerError) -> Self {
        PatchError::InvalidOperation(err.to_string())
    }
}

// ── Context ───────────────────────────────────────────────────────────────

/// A positional snapshot carried by operations that target array elements,
/// enabling best-effort index recovery after concurrent shifts.
///
/// The snapshot holds the elements surrounding the targeted index at diff
/// time. Its interpretation belongs to the caller's `find_context` hook;
/// the crate itself only updates it structurally during inversion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Context {
    /// Elements immediately before the targeted index.
    pub before: Vec<Value>,
    /// Elements from the targeted index onward.
    pub after: Vec<Value>,
}

impl Context {
    /// The context as it would look once `value` is re-inserted at the
    /// tracked position.
    pub(crate) fn with_inserted(&self, value: Value) -> Self {
        let mut after = Vec::with_capacity(self.after.len() + 1);
        after.push(value);
        after.extend(self.after.iter().cloned());
        Context {
            before: self.before.clone(),
            after,
        }
    }

    /// The context as it would look once the tracked element is removed.
    pub(crate) fn with_removed(&self) -> Self {
        Context {
            before: self.before.clone(),
            after: self.after.iter().skip(1).cloned().collect(),
        }
    }
}

// ── Operations ────────────────────────────────────────────────────────────

/// A single patch operation, addressed by a decoded JSON Pointer path.
///
/// The six kinds mirror RFC 6902. Operations are immutable once placed in
/// a patch: every transformation (inverse, commute, rebase) builds new
/// values.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Test {
        path: Path,
        value: Value,
        context: Option<Context>,
    },
    Add {
        path: Path,
        value: Value,
        context: Option<Context>,
    },
    Remove {
        path: Path,
        context: Option<Context>,
    },
    Replace {
        path: Path,
        value: Value,
        context: Option<Context>,
    },
    Move {
        path: Path,
        from: Path,
        context: Option<Context>,
        from_context: Option<Context>,
    },
    Copy {
        path: Path,
        from: Path,
        context: Option<Context>,
        from_context: Option<Context>,
    },
}

impl Op {
    /// The wire-format tag of this operation.
    pub fn op_name(&self) -> &'static str {
        match self {
            Op::Test { .. } => "test",
            Op::Add { .. } => "add",
            Op::Remove { .. } => "remove",
            Op::Replace { .. } => "replace",
            Op::Move { .. } => "move",
            Op::Copy { .. } => "copy",
        }
    }

    /// The target path of the operation.
    pub fn path(&self) -> &Path {
        match self {
            Op::Test { path, .. }
            | Op::Add { path, .. }
            | Op::Remove { path, .. }
            | Op::Replace { path, .. }
            | Op::Move { path, .. }
            | Op::Copy { path, .. } => path,
        }
    }

    /// The source path, for operations that have one (move, copy).
    pub fn from(&self) -> Option<&Path> {
        match self {
            Op::Move { from, .. } | Op::Copy { from, .. } => Some(from),
            _ => None,
        }
    }

    /// Rebuild the operation with a different `path`, keeping all other
    /// fields intact.
    pub fn with_path(&self, new_path: Path) -> Op {
        let mut op = self.clone();
        match &mut op {
            Op::Test { path, .. }
            | Op::Add { path, .. }
            | Op::Remove { path, .. }
            | Op::Replace { path, .. }
            | Op::Move { path, .. }
            | Op::Copy { path, .. } => *path = new_path,
        }
        op
    }

    /// Rebuild the operation with a different `from`. A no-op for kinds
    /// without a source path.
    pub fn with_from(&self, new_from: Path) -> Op {
        let mut op = self.clone();
        if let Op::Move { from, .. } | Op::Copy { from, .. } = &mut op {
            *from = new_from;
        }
        op
    }
}

/// An ordered sequence of operations. Order is semantically significant:
/// operations apply left to right, each seeing the result of the previous.
pub type Patch = Vec<Op>;

// ── Configuration ─────────────────────────────────────────────────────────

/// Hash over a value, used to align array elements cheaply.
pub type HashFn<'a> = dyn Fn(&Value) -> String + 'a;

/// Produces a [`Context`] snapshot for the element at `index` of the array
/// being diffed. `index` may equal the array length when an insertion is
/// anchored past the last element.
pub type MakeContextFn<'a> = dyn Fn(usize, &[Value]) -> Context + 'a;

/// Recovers the present-day index of an element that sat at `index` when
/// the given [`Context`] was captured. `None` aborts the resolution.
pub type FindContextFn<'a> = dyn Fn(usize, &[Value], &Context) -> Option<usize> + 'a;

/// Configuration for [`diff`](crate::diff).
///
/// `hash` must be injective over the values the caller cares to distinguish:
/// the differ treats hash-equal array elements as "the same logical element"
/// and aligns them, so a colliding hash can misalign elements (nested
/// changes are still found, because aligned pairs are re-diffed). The
/// default hash is the structural serialization of the value, which only
/// collides for values that serialize identically.
pub struct DiffOptions<'a> {
    /// Array element hash; defaults to structural stringification.
    pub hash: Option<&'a HashFn<'a>>,
    /// Context generator; no contexts are generated when absent.
    pub make_context: Option<&'a MakeContextFn<'a>>,
    /// Emit a `test` before every `remove`/`replace` so the patch can be
    /// inverted. Default `true`.
    pub invertible: bool,
    /// Allow the whole-subtree replace fallback for wide containers.
    /// Default `true`.
    pub allow_shallow: bool,
    /// Container width above which the shallow fallback applies.
    /// Default `100`.
    pub shallow_threshold: usize,
}

impl Default for DiffOptions<'_> {
    fn default() -> Self {
        DiffOptions {
            hash: None,
            make_context: None,
            invertible: true,
            allow_shallow: true,
            shallow_threshold: 100,
        }
    }
}

/// Configuration for [`apply`](crate::apply) / [`apply_in_place`](crate::apply_in_place).
#[derive(Default)]
pub struct ApplyOptions<'a> {
    /// Positional-recovery hook consulted (together with each operation's
    /// carried context) at every array container a path traverses.
    pub find_context: Option<&'a FindContextFn<'a>>,
}
