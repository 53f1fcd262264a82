use json_delta_pointer::{find, find_mut, parse_json_pointer, Key, Target};
use serde_json::json;

#[test]
fn find_resolves_nested_mixed_containers() {
    let doc = json!({"a": [{"b": [null, 7]}]});
    let path = parse_json_pointer("/a/0/b/1");
    assert_eq!(find(&doc, &path), Some(&json!(7)));
}

#[test]
fn find_returns_none_past_a_scalar() {
    let doc = json!({"a": 1});
    assert_eq!(find(&doc, &parse_json_pointer("/a/b")), None);
}

#[test]
fn empty_string_key_is_addressable() {
    let doc = json!({"": {"x": 1}});
    assert_eq!(find(&doc, &parse_json_pointer("/")), Some(&json!({"x": 1})));
    assert_eq!(find(&doc, &parse_json_pointer("//x")), Some(&json!(1)));
}

#[test]
fn escaped_segments_resolve() {
    let doc = json!({"a/b": {"c~d": 2}});
    assert_eq!(find(&doc, &parse_json_pointer("/a~1b/c~0d")), Some(&json!(2)));
}

#[test]
fn find_mut_classifies_the_append_marker() {
    let mut doc = json!({"list": [1, 2]});
    match find_mut(&mut doc, &parse_json_pointer("/list/-"), None).unwrap() {
        Some(Target::Inside { key, .. }) => assert_eq!(key, Key::Append),
        other => panic!("expected Inside, got {other:?}"),
    }
}
