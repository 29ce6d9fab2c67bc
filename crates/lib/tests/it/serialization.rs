//! JSON form of values, paths and actions.

use chrono::{TimeZone, Utc};
use recollect::{Action, ActionKind, MapOps, Path, Value, path};
use serde_json::json;

use crate::helpers::*;

#[test]
fn test_action_json_shape() {
    let create = Action::create(path!["items", 0], json!({"sku": "x1"}));
    assert_eq!(
        serde_json::to_value(&create).unwrap(),
        json!({"action": "create", "path": ["items", 0], "value": {"sku": "x1"}})
    );

    let remove = Action::remove(path!["gone"], 3);
    assert_eq!(
        serde_json::to_value(&remove).unwrap(),
        json!({"action": "remove", "path": ["gone"], "was": 3})
    );
}

#[test]
fn test_action_round_trip() {
    let edit = Action::edit(path!["a", 1, "b"], "new", json!([1, 2]));
    let text = serde_json::to_string(&edit).unwrap();
    let back: Action = serde_json::from_str(&text).unwrap();
    assert_eq!(back, edit);
    assert_eq!(back.kind, ActionKind::Edit);
}

#[test]
fn test_path_json_is_a_plain_array() {
    let path: Path = serde_json::from_str(r#"["a", 2, "c"]"#).unwrap();
    assert_eq!(path, path!["a", 2, "c"]);
    assert_eq!(serde_json::to_string(&path).unwrap(), r#"["a",2,"c"]"#);
}

#[test]
fn test_timestamps_serialize_as_rfc3339() {
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let (tracker, obj) = track_map(json!({}));
    obj.set("at", ts);
    assert_log(
        &tracker,
        json!([{"action": "create", "path": ["at"], "value": "2024-05-01T12:00:00+00:00"}]),
    );

    // No type tag survives the trip
    let back: Value = serde_json::from_str(&serde_json::to_string(&Value::from(ts)).unwrap()).unwrap();
    assert_eq!(back.as_text(), Some("2024-05-01T12:00:00+00:00"));
}

#[test]
fn test_tracker_to_json() {
    let (tracker, obj) = track_map(json!({"n": 1}));
    obj.set("n", 2);
    assert_eq!(
        tracker.to_json().unwrap(),
        r#"[{"action":"edit","path":["n"],"value":2,"was":1}]"#
    );
}

#[test]
fn test_value_json_conversions() {
    let source = json!({"list": [1, 2.5, null, true], "text": "t"});
    let value = Value::from(source.clone());
    assert_eq!(value.to_json(), source);
    assert_eq!(serde_json::to_value(&value).unwrap(), source);

    let parsed: Value = serde_json::from_value(source).unwrap();
    assert_eq!(parsed, value);
}

#[test]
fn test_malformed_action_is_a_serialization_error() {
    let err: recollect::Error = serde_json::from_str::<Action>(r#"{"action":"rename"}"#)
        .unwrap_err()
        .into();
    assert!(err.is_serialization_error());
}
