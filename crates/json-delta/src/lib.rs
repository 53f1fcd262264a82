//! json-delta: structural diff, patch, inverse, commute and rebase over
//! JSON values.
//!
//! The crate implements a patch algebra in the RFC 6902 operation format,
//! addressed by RFC 6901 pointers:
//!
//! - [`diff`] computes a minimal, ordered edit script between two values,
//!   aligning arrays with an LCS pass over hashed elements.
//! - [`apply`] / [`apply_in_place`] run a patch against a document.
//! - [`inverse`] turns an invertible patch into its undo.
//! - [`commute`] and [`rebase`] reorder and transform patches so
//!   independently authored edit sequences can be merged without
//!   re-diffing.
//!
//! Everything is synchronous and allocation-only: no I/O, no shared state
//! across calls. `apply_in_place` mutates its document argument operation
//! by operation, so a caller embedding this in a multi-threaded host must
//! treat each application as a critical section over that document.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use json_delta::{diff, apply, inverse, DiffOptions, ApplyOptions};
//!
//! let a = json!({"x": 1, "items": [1, 2, 3]});
//! let b = json!({"x": 1, "items": [1, 3]});
//!
//! let patch = diff(&a, &b, &DiffOptions::default());
//! assert_eq!(apply(&patch, &a, &ApplyOptions::default()).unwrap(), b);
//!
//! let undo = inverse(&patch).unwrap();
//! assert_eq!(apply(&undo, &b, &ApplyOptions::default()).unwrap(), a);
//! ```

pub mod apply;
pub mod codec;
pub mod commute;
pub mod diff;
pub mod inverse;
pub mod lcs;
pub mod rebase;
pub mod types;

pub use apply::{apply, apply_in_place, apply_op};
pub use codec::{from_json, from_json_patch, to_json, to_json_patch};
pub use commute::{commute, commute_ops, commute_paths, commute_rtl};
pub use diff::{default_hash, diff};
pub use inverse::inverse;
pub use rebase::rebase;
pub use types::{
    ApplyOptions, Context, DiffOptions, FindContextFn, HashFn, MakeContextFn, Op, Patch,
    PatchError, Path, PathStep,
};
