//! End-to-end properties of the patch algebra, driven through the public
//! API and the wire codec.

use serde_json::json;

use json_delta::{
    apply, commute_ops, diff, from_json_patch, inverse, rebase, to_json_patch, ApplyOptions,
    DiffOptions, Op, PatchError,
};

fn defaults() -> (DiffOptions<'static>, ApplyOptions<'static>) {
    (DiffOptions::default(), ApplyOptions::default())
}

#[test]
fn scalar_replace_wire_shape() {
    let (d, _) = defaults();
    let patch = diff(&json!({"x": 1}), &json!({"x": 2}), &d);
    assert_eq!(
        to_json_patch(&patch),
        json!([
            {"op": "test", "path": "/x", "value": 1},
            {"op": "replace", "path": "/x", "value": 2},
        ])
    );
}

#[test]
fn array_removal_wire_shape() {
    let (d, _) = defaults();
    let patch = diff(&json!([1, 2, 3]), &json!([1, 3]), &d);
    assert_eq!(
        to_json_patch(&patch),
        json!([
            {"op": "test", "path": "/1", "value": 2},
            {"op": "remove", "path": "/1"},
        ])
    );
}

#[test]
fn object_add_and_its_inverse_wire_shape() {
    let (d, _) = defaults();
    let patch = diff(&json!({"a": 1}), &json!({"a": 1, "b": 2}), &d);
    assert_eq!(
        to_json_patch(&patch),
        json!([{"op": "add", "path": "/b", "value": 2}])
    );
    let undo = inverse(&patch).unwrap();
    assert_eq!(
        to_json_patch(&undo),
        json!([{"op": "remove", "path": "/b"}])
    );
}

#[test]
fn append_marker_pushes_to_array_end() {
    let patch = from_json_patch(&json!([{"op": "add", "path": "/-", "value": 9}])).unwrap();
    let out = apply(&patch, &json!([1, 2]), &ApplyOptions::default()).unwrap();
    assert_eq!(out, json!([1, 2, 9]));
}

#[test]
fn rebase_retargets_a_concurrent_array_edit() {
    // History removed index 0 of a three-element array; the patch, authored
    // against the same base, edits index 2. Rebased, it lands on index 1.
    let base = json!(["a", "b", "c"]);
    let after_history = json!(["b", "c"]);
    let (d, a) = defaults();

    let history_patch = diff(&base, &after_history, &d);
    let patch = diff(&base, &json!(["a", "b", "C"]), &d);

    let rebased = rebase(&[history_patch], &patch).unwrap();
    for op in &rebased {
        assert_eq!(op.path(), &vec!["1".to_string()]);
    }
    assert_eq!(apply(&rebased, &after_history, &a).unwrap(), json!(["b", "C"]));
}

#[test]
fn shallow_fallback_yields_a_single_whole_object_replace() {
    let mut before = serde_json::Map::new();
    for i in 0..101 {
        before.insert(format!("k{i}"), json!(i));
    }
    let mut after = before.clone();
    after.insert("k42".to_string(), json!("changed"));

    let (d, a) = defaults();
    let patch = diff(
        &serde_json::Value::Object(before.clone()),
        &serde_json::Value::Object(after.clone()),
        &d,
    );
    assert_eq!(patch.len(), 1);
    match &patch[0] {
        Op::Replace { path, value, .. } => {
            assert!(path.is_empty());
            assert_eq!(*value, serde_json::Value::Object(after.clone()));
        }
        other => panic!("expected a whole-object replace, got {other:?}"),
    }
    assert_eq!(
        apply(&patch, &serde_json::Value::Object(before), &a).unwrap(),
        serde_json::Value::Object(after)
    );
}

#[test]
fn copy_makes_the_whole_patch_uninvertible() {
    let patch = from_json_patch(&json!([
        {"op": "add", "path": "/a", "value": 1},
        {"op": "copy", "path": "/b", "from": "/a"},
    ]))
    .unwrap();
    assert!(matches!(
        inverse(&patch).unwrap_err(),
        PatchError::NotInvertible(_)
    ));
}

#[test]
fn commuted_disjoint_ops_have_the_same_net_effect() {
    let doc = json!({"a": [1, 2], "b": [3, 4]});
    let x = Op::Replace {
        path: vec!["a".to_string(), "0".to_string()],
        value: json!("x"),
        context: None,
    };
    let y = Op::Remove {
        path: vec!["b".to_string(), "0".to_string()],
        context: None,
    };

    let a = ApplyOptions::default();
    let direct = apply(&[x.clone(), y.clone()], &doc, &a).unwrap();
    let (y2, x2) = commute_ops(&x, &y).unwrap();
    assert_eq!(apply(&[y2, x2], &doc, &a).unwrap(), direct);
}

#[test]
fn diff_does_not_mutate_its_inputs() {
    let a = json!({"arr": [1, {"k": 2}]});
    let b = json!({"arr": [2, {"k": 3}]});
    let a_before = a.clone();
    let b_before = b.clone();
    let _ = diff(&a, &b, &DiffOptions::default());
    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}

#[test]
fn patches_survive_a_wire_roundtrip_and_still_apply() {
    let a = json!({"users": [{"id": 1, "name": "ada"}], "count": 1});
    let b = json!({"users": [{"id": 1, "name": "ada"}, {"id": 2, "name": "bob"}], "count": 2});
    let (d, ap) = defaults();

    let patch = diff(&a, &b, &d);
    let wire = to_json_patch(&patch);
    let decoded = from_json_patch(&wire).unwrap();
    assert_eq!(apply(&decoded, &a, &ap).unwrap(), b);
}

#[test]
fn document_kind_changes_roundtrip() {
    let cases = [
        (json!({"a": 1}), json!([1, 2])),
        (json!([1, 2]), json!("text")),
        (json!("text"), json!(null)),
        (json!(null), json!({"fresh": true})),
        (json!(7), json!(7.5)),
    ];
    let (d, a) = defaults();
    for (from, to) in cases {
        let patch = diff(&from, &to, &d);
        assert_eq!(apply(&patch, &from, &a).unwrap(), to, "{from} -> {to}");
        let undo = inverse(&patch).unwrap();
        assert_eq!(apply(&undo, &to, &a).unwrap(), from, "{to} -> {from}");
    }
}
