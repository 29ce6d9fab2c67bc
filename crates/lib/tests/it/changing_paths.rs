//! Handles held across list operations that move their element.

use recollect::{ListOps, MapOps, Value, path};
use serde_json::json;

use crate::helpers::*;

#[test]
fn test_delitem() {
    let (tracker, obj) = track_list(json!([{}, {}]));
    let a_dict = element_map(&obj, 1);
    a_dict.set("a", "a");
    assert_log(
        &tracker,
        json!([{"action": "create", "path": [1, "a"], "value": "a"}]),
    );

    obj.delete(0).unwrap();
    assert_log(
        &tracker,
        json!([
            {"action": "create", "path": [1, "a"], "value": "a"},
            {"action": "remove", "path": [0], "was": {}}
        ]),
    );

    a_dict.set("b", "b");
    assert_log(
        &tracker,
        json!([
            {"action": "create", "path": [1, "a"], "value": "a"},
            {"action": "remove", "path": [0], "was": {}},
            {"action": "create", "path": [0, "b"], "value": "b"}
        ]),
    );
}

#[test]
fn test_insert() {
    let (tracker, obj) = track_list(json!([{}, {}]));
    let a_dict = element_map(&obj, 1);
    obj.insert(0, json!({}));
    a_dict.set("foo", "bar");
    assert_log(
        &tracker,
        json!([
            {"action": "create", "path": [0], "value": {}},
            {"action": "create", "path": [2, "foo"], "value": "bar"}
        ]),
    );
}

#[test]
fn test_pop() {
    let (tracker, obj) = track_list(json!([{}, {}]));
    let a_dict = element_map(&obj, 1);
    obj.pop(Some(0)).unwrap();
    a_dict.set("foo", "bar");
    assert_log(
        &tracker,
        json!([
            {"action": "remove", "path": [0], "was": {}},
            {"action": "create", "path": [0, "foo"], "value": "bar"}
        ]),
    );
}

#[test]
fn test_remove() {
    let (tracker, obj) = track_list(json!([{"a": 1}, {"b": 2}]));
    let a_dict = element_map(&obj, 1);
    obj.remove(&Value::from(json!({"a": 1}))).unwrap();
    a_dict.set("b", "b");
    assert_log(
        &tracker,
        json!([
            {"action": "remove", "path": [0], "was": {"a": 1}},
            {"action": "edit", "path": [0, "b"], "value": "b", "was": 2}
        ]),
    );
}

#[test]
fn test_earlier_handles_do_not_move() {
    let (_, obj) = track_list(json!([{}, {}, {}]));
    let first = element_map(&obj, 0);
    let last = element_map(&obj, 2);
    obj.delete(1).unwrap();
    assert_eq!(first.path(), path![0]);
    assert_eq!(last.path(), path![1]);

    obj.insert(1, 0);
    assert_eq!(first.path(), path![0]);
    assert_eq!(last.path(), path![2]);
}

#[test]
fn test_grandchildren_move_with_their_element() {
    let (tracker, obj) = track_list(json!([{}, {"inner": {"deep": []}}]));
    let inner = child_map(&element_map(&obj, 1), "inner");
    let deep = child_list(&inner, "deep");

    obj.insert(0, "head");
    assert_eq!(inner.path(), path![2, "inner"]);
    deep.append(1);
    assert_log(
        &tracker,
        json!([
            {"action": "create", "path": [0], "value": "head"},
            {"action": "create", "path": [2, "inner", "deep", 0], "value": 1}
        ]),
    );
}

#[test]
fn test_pending_entries_move_with_their_element() {
    let (tracker, obj) = track_list(json!([{}, {"k": 1}]));
    let moved = element_map(&obj, 1);
    moved.set("k", 2);
    obj.insert(0, "head");
    // Still coalesces into the edit recorded before the shift
    moved.set("k", 3);
    assert_log(
        &tracker,
        json!([
            {"action": "edit", "path": [1, "k"], "value": 3, "was": 1},
            {"action": "create", "path": [0], "value": "head"}
        ]),
    );
}

#[test]
fn test_pending_element_is_returned_raw_after_shift() {
    let (_, obj) = track_list(json!(["a"]));
    obj.append(json!({}));
    obj.insert(0, "head");
    // The appended map moved to 2 and is still pending
    assert!(!obj.get(2).unwrap().is_tracked());
    assert!(obj.get(1).unwrap() == Value::from("a"));
}

#[test]
fn test_nested_list_shift_does_not_touch_siblings() {
    let (_, obj) = track_map(json!({"left": [{}, {}], "right": [{}, {}]}));
    let left = child_list(&obj, "left");
    let right_handle = element_map(&child_list(&obj, "right"), 1);
    left.delete(0).unwrap();
    assert_eq!(right_handle.path(), path!["right", 1]);
}

#[test]
fn test_replacing_new_neighbour_keeps_moved_element_entries() {
    let (tracker, obj) = track_list(json!([{}, {}]));
    let moved = element_map(&obj, 1);
    moved.set("a", 1);
    obj.insert(0, json!({}));
    // Index 1 now holds the old first element, not `moved`
    obj.set(1, 5).unwrap();
    assert_log(
        &tracker,
        json!([
            {"action": "create", "path": [1, "a"], "value": 1},
            {"action": "create", "path": [0], "value": {}},
            {"action": "edit", "path": [1], "value": 5, "was": {}}
        ]),
    );
    assert_replays(&tracker, json!([{}, {}]), &obj.to_value());
}

#[test]
fn test_deleting_new_neighbour_keeps_moved_element_entries() {
    let (tracker, obj) = track_list(json!([{"a": 0}, {"a": 0}]));
    let moved = element_map(&obj, 1);
    moved.set("a", 9);
    obj.insert(0, json!({"z": 1}));
    obj.delete(1).unwrap();
    assert_eq!(obj.to_value(), Value::from(json!([{"z": 1}, {"a": 9}])));
    assert_log(
        &tracker,
        json!([
            {"action": "edit", "path": [1, "a"], "value": 9, "was": 0},
            {"action": "create", "path": [0], "value": {"z": 1}},
            {"action": "remove", "path": [1], "was": {"a": 0}}
        ]),
    );
    assert_replays(&tracker, json!([{"a": 0}, {"a": 0}]), &obj.to_value());

    // The moved element is still tracked at its new index
    moved.set("a", 10);
    assert_eq!(moved.path(), path![1]);
    assert_replays(&tracker, json!([{"a": 0}, {"a": 0}]), &obj.to_value());
}

#[test]
fn test_replacing_moved_element_rewinds_through_old_index() {
    let (tracker, obj) = track_list(json!([{}, {"a": 0}]));
    let moved = element_map(&obj, 1);
    moved.set("a", 1);
    moved.set("b", 2);
    obj.insert(0, "head");
    obj.set(2, "gone").unwrap();
    assert_log(
        &tracker,
        json!([
            {"action": "create", "path": [0], "value": "head"},
            {"action": "edit", "path": [2], "value": "gone", "was": {"a": 0}}
        ]),
    );
}

#[test]
fn test_cancelled_insert_renumbers_later_entries() {
    let (tracker, obj) = track_list(json!(["a", "b"]));
    obj.insert(0, "x");
    obj.append("y");
    obj.delete(0).unwrap();
    assert_log(
        &tracker,
        json!([{"action": "create", "path": [2], "value": "y"}]),
    );
    assert_replays(&tracker, json!(["a", "b"]), &obj.to_value());

    obj.set(2, "z").unwrap();
    assert_log(
        &tracker,
        json!([{"action": "create", "path": [2], "value": "z"}]),
    );
}

#[test]
fn test_cancelled_append_after_front_insert() {
    let (tracker, obj) = track_list(json!(["a"]));
    obj.append("x");
    obj.insert(0, "y");
    obj.append("w");
    // "x" sits at 2 now and was never persisted
    obj.delete(2).unwrap();
    assert_log(
        &tracker,
        json!([
            {"action": "create", "path": [0], "value": "y"},
            {"action": "create", "path": [2], "value": "w"}
        ]),
    );
    assert_replays(&tracker, json!(["a"]), &obj.to_value());
}
