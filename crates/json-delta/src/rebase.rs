//! Rebasing a patch past concurrently applied history.

use crate::commute::commute_rtl;
use crate::inverse::inverse;
use crate::types::{Op, Patch, PatchError};

/// Rebase `patch` onto `history`.
///
/// `history` is an ordered sequence of patches already applied to the base
/// document that `patch` was authored against. For each historical patch,
/// oldest first, the accumulator is commuted leftward past that patch's
/// inverse; the result applies cleanly to the document with the full
/// history in place. Concurrent edits are merged by transforming
/// operations instead of re-diffing.
///
/// # Errors
///
/// Propagates `NotInvertible` from inverting a historical patch and
/// `NotCommutable` when the patch genuinely conflicts with history (e.g.
/// both touch the identical location and one deletes it). A failed rebase
/// leaves the caller's inputs untouched.
pub fn rebase(history: &[Patch], patch: &[Op]) -> Result<Patch, PatchError> {
    let mut rebased = patch.to_vec();
    for prior in history {
        let undo = inverse(prior)?;
        rebased = commute_rtl(&undo, &rebased)?;
    }
    Ok(rebased)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::apply;
    use crate::diff::diff;
    use crate::types::{ApplyOptions, DiffOptions};
    use serde_json::json;

    fn p(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rebase_shifts_an_edit_past_a_removal() {
        // History removes index 0 of a 3-element array; the patch, authored
        // against the same base, edits index 2. Rebased, it targets index 1.
        let base = json!([10, 20, 30]);
        let removed = json!([20, 30]);

        let history = vec![diff(&base, &removed, &DiffOptions::default())];
        let patch = vec![
            crate::types::Op::Test {
                path: p(&["2"]),
                value: json!(30),
                context: None,
            },
            crate::types::Op::Replace {
                path: p(&["2"]),
                value: json!(33),
                context: None,
            },
        ];

        let rebased = rebase(&history, &patch).unwrap();
        assert_eq!(rebased[0].path(), &p(&["1"]));
        assert_eq!(rebased[1].path(), &p(&["1"]));

        let opts = ApplyOptions::default();
        assert_eq!(apply(&rebased, &removed, &opts).unwrap(), json!([20, 33]));
    }

    #[test]
    fn rebase_over_an_empty_history_is_identity() {
        let patch = vec![crate::types::Op::Add {
            path: p(&["x"]),
            value: json!(1),
            context: None,
        }];
        assert_eq!(rebase(&[], &patch).unwrap(), patch);
    }

    #[test]
    fn rebase_across_multiple_history_patches() {
        // Two historical removals in front of the edited element.
        let base = json!([0, 1, 2, 3]);
        let h1 = vec![
            crate::types::Op::Test {
                path: p(&["0"]),
                value: json!(0),
                context: None,
            },
            crate::types::Op::Remove {
                path: p(&["0"]),
                context: None,
            },
        ];
        let h2 = vec![
            crate::types::Op::Test {
                path: p(&["0"]),
                value: json!(1),
                context: None,
            },
            crate::types::Op::Remove {
                path: p(&["0"]),
                context: None,
            },
        ];
        let patch = vec![crate::types::Op::Replace {
            path: p(&["3"]),
            value: json!(99),
            context: None,
        }];

        let rebased = rebase(&[h1.clone(), h2.clone()], &patch).unwrap();
        assert_eq!(rebased[0].path(), &p(&["1"]));

        let opts = ApplyOptions::default();
        let mut doc = base;
        for h in [&h1, &h2] {
            doc = apply(h, &doc, &opts).unwrap();
        }
        assert_eq!(apply(&rebased, &doc, &opts).unwrap(), json!([2, 99]));
    }

    #[test]
    fn rebase_conflicting_patch_fails() {
        // History replaces /x (with its paired test); the patch removes /x.
        let history = vec![vec![
            crate::types::Op::Test {
                path: p(&["x"]),
                value: json!(1),
                context: None,
            },
            crate::types::Op::Replace {
                path: p(&["x"]),
                value: json!(2),
                context: None,
            },
        ]];
        let patch = vec![crate::types::Op::Remove {
            path: p(&["x"]),
            context: None,
        }];
        assert!(matches!(
            rebase(&history, &patch).unwrap_err(),
            PatchError::NotCommutable(_)
        ));
    }

    #[test]
    fn rebase_fails_when_history_is_not_invertible() {
        let history = vec![vec![crate::types::Op::Copy {
            path: p(&["b"]),
            from: p(&["a"]),
            context: None,
            from_context: None,
        }]];
        let patch = vec![crate::types::Op::Test {
            path: p(&["a"]),
            value: json!(1),
            context: None,
        }];
        assert!(matches!(
            rebase(&history, &patch).unwrap_err(),
            PatchError::NotInvertible(_)
        ));
    }
}
