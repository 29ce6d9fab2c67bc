//! Containers inside containers, and writes that replace whole subtrees.

use recollect::{ListOps, MapOps};
use serde_json::json;

use crate::helpers::*;

#[test]
fn test_dict_in_dict() {
    let (tracker, obj) = track_map(json!({"dict": {}}));
    child_map(&obj, "dict").set("foo", "bar");
    assert_log(
        &tracker,
        json!([{"action": "create", "path": ["dict", "foo"], "value": "bar"}]),
    );
}

#[test]
fn test_dict_in_list() {
    let (tracker, obj) = track_list(json!([{}]));
    element_map(&obj, 0).set("foo", "bar");
    assert_log(
        &tracker,
        json!([{"action": "create", "path": [0, "foo"], "value": "bar"}]),
    );
}

#[test]
fn test_list_in_dict() {
    let (tracker, obj) = track_map(json!({"list": []}));
    child_list(&obj, "list").append("foo");
    assert_log(
        &tracker,
        json!([{"action": "create", "path": ["list", 0], "value": "foo"}]),
    );
}

#[test]
fn test_list_in_list() {
    let (tracker, obj) = track_list(json!([[]]));
    obj.get(0).unwrap().into_list().unwrap().append("foo");
    assert_log(
        &tracker,
        json!([{"action": "create", "path": [0, 0], "value": "foo"}]),
    );
}

#[test]
fn test_deep_path() {
    let (tracker, obj) = track_map(json!({"a": [{"b": {"c": []}}]}));
    let b = element_map(&child_list(&obj, "a"), 0);
    child_list(&child_map(&b, "b"), "c").append(1);
    assert_log(
        &tracker,
        json!([{"action": "create", "path": ["a", 0, "b", "c", 0], "value": 1}]),
    );
}

/// Applies the three nested mutations shared by the replacement tests.
fn mutate_nested(nested: &recollect::MapProxy) {
    nested.set("a", 1);
    nested.set("b", 2);
    nested.delete("c").unwrap();
}

#[test]
fn test_replace_nested_with_actions() {
    let (tracker, obj) = track_map(json!({"nested": {"a": 0, "c": 2}}));
    mutate_nested(&child_map(&obj, "nested"));
    assert_log(
        &tracker,
        json!([
            {"action": "edit", "path": ["nested", "a"], "value": 1, "was": 0},
            {"action": "create", "path": ["nested", "b"], "value": 2},
            {"action": "remove", "path": ["nested", "c"], "was": 2}
        ]),
    );

    obj.set("nested", json!({}));
    assert_log(
        &tracker,
        json!([{"action": "edit", "path": ["nested"], "value": {}, "was": {"a": 0, "c": 2}}]),
    );
}

#[test]
fn test_remove_nested_with_actions() {
    let (tracker, obj) = track_map(json!({"nested": {"a": 0, "c": 2}}));
    mutate_nested(&child_map(&obj, "nested"));
    obj.delete("nested").unwrap();
    assert_log(
        &tracker,
        json!([{"action": "remove", "path": ["nested"], "was": {"a": 0, "c": 2}}]),
    );
}

#[test]
fn test_replace_nested_in_list_with_actions() {
    let (tracker, obj) = track_list(json!([{"a": 0, "c": 2}]));
    mutate_nested(&element_map(&obj, 0));
    assert_log(
        &tracker,
        json!([
            {"action": "edit", "path": [0, "a"], "value": 1, "was": 0},
            {"action": "create", "path": [0, "b"], "value": 2},
            {"action": "remove", "path": [0, "c"], "was": 2}
        ]),
    );

    obj.set(0, json!({})).unwrap();
    assert_log(
        &tracker,
        json!([{"action": "edit", "path": [0], "value": {}, "was": {"a": 0, "c": 2}}]),
    );
}

#[test]
fn test_remove_nested_in_list_with_actions() {
    let (tracker, obj) = track_list(json!([{"a": 0, "c": 2}]));
    mutate_nested(&element_map(&obj, 0));
    obj.delete(0).unwrap();
    assert_log(
        &tracker,
        json!([{"action": "remove", "path": [0], "was": {"a": 0, "c": 2}}]),
    );
}

#[test]
fn test_replace_nested_list_rewinds_was() {
    let (tracker, obj) = track_map(json!({"l": [10, 20, 30]}));
    let list = child_list(&obj, "l");
    list.delete(1).unwrap();
    list.set(1, 25).unwrap();
    list.append(40);

    obj.set("l", json!([]));
    assert_log(
        &tracker,
        json!([{"action": "edit", "path": ["l"], "value": [], "was": [10, 20, 30]}]),
    );
}

#[test]
fn test_rewound_was_does_not_alias_live_tree() {
    let (tracker, obj) = track_map(json!({"nested": {"a": 0}}));
    let nested = child_map(&obj, "nested");
    nested.set("a", 1);
    let old = obj.get("nested").unwrap().into_value();
    obj.set("nested", "gone");

    // The held handle still reaches the detached map
    nested.set("a", 2);
    assert_eq!(old.as_map().unwrap().get("a").and_then(|v| v.as_int()), Some(2));

    let was = tracker.actions()[0].was.clone().unwrap();
    assert_eq!(was, recollect::Value::from(json!({"a": 0})));
}

#[test]
fn test_replace_untouched_subtree_keeps_live_value_as_was() {
    let (tracker, obj) = track_map(json!({"nested": {"a": 0}}));
    obj.set("nested", 5);
    assert_log(
        &tracker,
        json!([{"action": "edit", "path": ["nested"], "value": 5, "was": {"a": 0}}]),
    );
}
