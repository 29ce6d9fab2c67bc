//! Map mutations and how repeated writes to one key coalesce.

use recollect::{MapOps, Tracker, TrackerConfig, Value};
use serde_json::json;

use crate::helpers::*;

#[test]
fn test_add_item() {
    let (tracker, obj) = track_map(json!({}));
    obj.set("foo", "bar");
    assert_log(&tracker, json!([{"action": "create", "path": ["foo"], "value": "bar"}]));
}

#[test]
fn test_add_item_set_same_item() {
    let (tracker, obj) = track_map(json!({}));
    obj.set("foo", "oof");
    obj.set("foo", "bar");
    assert_log(&tracker, json!([{"action": "create", "path": ["foo"], "value": "bar"}]));
}

#[test]
fn test_add_item_del_same_item() {
    let (tracker, obj) = track_map(json!({}));
    obj.set("foo", "oof");
    obj.delete("foo").unwrap();
    assert_log(&tracker, json!([]));
}

#[test]
fn test_change_item() {
    let (tracker, obj) = track_map(json!({"foo": "foo"}));
    obj.set("foo", "bar");
    assert_log(
        &tracker,
        json!([{"action": "edit", "path": ["foo"], "value": "bar", "was": "foo"}]),
    );
}

#[test]
fn test_change_same_item_keeps_first_was() {
    let (tracker, obj) = track_map(json!({"foo": "foo"}));
    obj.set("foo", "a");
    obj.set("foo", "b");
    assert_log(
        &tracker,
        json!([{"action": "edit", "path": ["foo"], "value": "b", "was": "foo"}]),
    );
}

#[test]
fn test_change_back_to_original_still_logged() {
    // Coalescing does not compare against the first `was`
    let (tracker, obj) = track_map(json!({"foo": 1}));
    obj.set("foo", 2);
    obj.set("foo", 1);
    assert_log(
        &tracker,
        json!([{"action": "edit", "path": ["foo"], "value": 1, "was": 1}]),
    );
}

#[test]
fn test_change_same_del_same_item() {
    let (tracker, obj) = track_map(json!({"foo": "foo"}));
    obj.set("foo", "a");
    obj.delete("foo").unwrap();
    assert_log(&tracker, json!([{"action": "remove", "path": ["foo"], "was": "foo"}]));
}

#[test]
fn test_set_equal_value_is_noop() {
    let (tracker, obj) = track_map(json!({"foo": "foo", "n": [1, 2]}));
    obj.set("foo", "foo");
    obj.set("n", json!([1, 2]));
    assert!(tracker.is_empty());
}

#[test]
fn test_del_item() {
    let (tracker, obj) = track_map(json!({"foo": "foo"}));
    assert_eq!(obj.delete("foo").unwrap(), Value::from("foo"));
    assert_log(&tracker, json!([{"action": "remove", "path": ["foo"], "was": "foo"}]));
}

#[test]
fn test_del_missing_item() {
    let (tracker, obj) = track_map(json!({}));
    let err = obj.delete("foo").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.module(), "value");
    assert!(tracker.is_empty());
}

#[test]
fn test_del_item_add_same() {
    let (tracker, obj) = track_map(json!({"foo": "foo"}));
    obj.delete("foo").unwrap();
    obj.set("foo", "bar");
    assert_log(
        &tracker,
        json!([
            {"action": "remove", "path": ["foo"], "was": "foo"},
            {"action": "create", "path": ["foo"], "value": "bar"}
        ]),
    );
}

#[test]
fn test_del_item_add_same_del_same() {
    let (tracker, obj) = track_map(json!({"foo": "foo"}));
    obj.delete("foo").unwrap();
    obj.set("foo", "bar");
    obj.delete("foo").unwrap();
    assert_log(&tracker, json!([{"action": "remove", "path": ["foo"], "was": "foo"}]));
}

#[test]
fn test_reads_do_not_log() {
    let (tracker, obj) = track_map(json!({"foo": "bar", "dict": {"a": 1}, "list": ["x"]}));
    assert_eq!(obj.get("foo").unwrap(), Value::from("bar"));
    assert_eq!(obj.keys(), vec!["dict", "foo", "list"]);
    assert_eq!(obj.len(), 3);
    assert!(obj.contains_key("dict"));
    assert!(!obj.contains_key("nope"));
    let _ = obj.items();
    assert!(tracker.is_empty());
}

#[test]
fn test_update_sets_in_order() {
    let (tracker, obj) = track_map(json!({"a": 0}));
    obj.update([("a", 1), ("b", 2), ("a", 3)]);
    assert_log(
        &tracker,
        json!([
            {"action": "edit", "path": ["a"], "value": 3, "was": 0},
            {"action": "create", "path": ["b"], "value": 2}
        ]),
    );
}

#[test]
fn test_private_keys_are_written_but_not_logged() {
    let tracker = Tracker::with_config(TrackerConfig::document());
    let doc = tracker
        .track(json!({"_id": "doc-1", "_rev": "1-a", "meta": {}}))
        .into_map()
        .unwrap();

    doc.set("_rev", "2-b");
    doc.set("_attachments", json!({}));
    assert!(tracker.is_empty());
    assert_eq!(doc.get("_rev").unwrap(), Value::from("2-b"));

    // Only the root is special
    child_map(&doc, "meta").set("_rev", "x");
    assert_log(
        &tracker,
        json!([{"action": "create", "path": ["meta", "_rev"], "value": "x"}]),
    );
}
