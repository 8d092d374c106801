use super::*;
use serde_json::json;

// =============================================================
// Role
// =============================================================

#[test]
fn role_parses_case_insensitively() {
    assert_eq!("Admin".parse::<Role>(), Ok(Role::Admin));
    assert_eq!(" viewer ".parse::<Role>(), Ok(Role::Viewer));
    assert!("owner".parse::<Role>().is_err());
}

#[test]
fn role_serializes_lowercase() {
    let body = serde_json::to_value(LoginRequest { username: "alice".into(), role: Role::Auditor }).unwrap();
    assert_eq!(body, json!({ "username": "alice", "role": "auditor" }));
}

// =============================================================
// Item
// =============================================================

#[test]
fn item_empty_strings_become_none() {
    let item: Item = serde_json::from_value(json!({
        "id": 1,
        "name": "Bolt",
        "description": "",
        "quantity": 4,
        "price": 0.25,
        "location": "",
        "created_by": "alice",
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-02T11:30:00.123456Z"
    }))
    .unwrap();
    assert_eq!(item.description, None);
    assert_eq!(item.location, None);
    assert!(item.created_at.is_some());
    assert_eq!(item.updated_at.day(), 2);
}

#[test]
fn item_missing_optional_fields_decode() {
    let item: Item = serde_json::from_value(json!({
        "id": 2,
        "name": "Nut",
        "quantity": 100,
        "price": 0.1,
        "updated_at": "2024-05-02T11:30:00+02:00"
    }))
    .unwrap();
    assert_eq!(item.location, None);
    assert_eq!(item.created_by, "");
    assert_eq!(item.created_at, None);
}

#[test]
fn item_patch_skips_unset_fields() {
    let patch = ItemPatch { price: Some(3.5), ..ItemPatch::default() };
    assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "price": 3.5 }));
    assert!(!patch.is_empty());
    assert!(ItemPatch::default().is_empty());
}

// =============================================================
// HistoryRecord
// =============================================================

fn history_json(changes: serde_json::Value) -> serde_json::Value {
    json!({
        "id": 9,
        "item_id": 7,
        "item_name": "Bolt",
        "action": "UPDATE",
        "changed_by": "bob",
        "changed_at": "2024-05-03T08:00:00Z",
        "old_data": "{\"quantity\":4}",
        "new_data": { "quantity": 6 },
        "changes": changes
    })
}

#[test]
fn history_snapshots_accept_encoded_and_inline_json() {
    let record: HistoryRecord =
        serde_json::from_value(history_json(json!("{\"quantity\":{\"old\":4,\"new\":6}}"))).unwrap();
    assert_eq!(record.old_data, Some(json!({ "quantity": 4 })));
    assert_eq!(record.new_data, Some(json!({ "quantity": 6 })));
    assert_eq!(record.change_count(), 1);
}

#[test]
fn history_empty_changes_count_zero() {
    let record: HistoryRecord = serde_json::from_value(history_json(json!(""))).unwrap();
    assert_eq!(record.changes, None);
    assert_eq!(record.change_count(), 0);

    let record: HistoryRecord = serde_json::from_value(history_json(json!(null))).unwrap();
    assert_eq!(record.change_count(), 0);
}

#[test]
fn history_unparseable_snapshot_kept_verbatim() {
    let mut raw = history_json(json!(null));
    raw["old_data"] = json!("not json");
    let record: HistoryRecord = serde_json::from_value(raw).unwrap();
    assert_eq!(record.old_data, Some(json!("not json")));
}

#[test]
fn history_unknown_action_is_kept() {
    let mut raw = history_json(json!(null));
    raw["action"] = json!("RESTORE");
    let record: HistoryRecord = serde_json::from_value(raw).unwrap();
    assert_eq!(record.action, HistoryAction::Unknown);
}

#[test]
fn history_action_parses_lowercase() {
    assert_eq!("delete".parse::<HistoryAction>(), Ok(HistoryAction::Delete));
    assert!("unknown".parse::<HistoryAction>().is_err());
}

#[test]
fn field_change_nulls_decode() {
    let change: FieldChange = serde_json::from_value(json!({ "field": "location", "old": null, "new": "A1" })).unwrap();
    assert!(change.old.is_null());
    assert_eq!(change.new, json!("A1"));
}

#[test]
fn history_query_defaults_to_fifty() {
    assert_eq!(HistoryQuery::default().limit, DEFAULT_HISTORY_LIMIT);
    assert_eq!(DEFAULT_HISTORY_LIMIT, 50);
}

#[test]
fn export_filename_uses_item_id() {
    assert_eq!(export_filename(7), "history_item_7.csv");
}
