use super::*;
use crate::net::types::Role;
use serde_json::json;
use time::macros::datetime;

fn item(id: i64, quantity: i64, location: Option<&str>) -> Item {
    Item {
        id,
        name: format!("item-{id}"),
        description: None,
        quantity,
        price: 2.5,
        location: location.map(str::to_owned),
        created_by: "alice".into(),
        created_at: None,
        updated_at: datetime!(2024-05-01 10:00:00 UTC),
    }
}

fn record(id: i64, action: &str, changes: serde_json::Value) -> HistoryRecord {
    serde_json::from_value(json!({
        "id": id,
        "item_id": 7,
        "item_name": "Bolt",
        "action": action,
        "changed_by": "bob",
        "changed_at": "2024-05-03T08:00:00Z",
        "old_data": null,
        "new_data": "{\"name\":\"Bolt\"}",
        "changes": changes
    }))
    .unwrap()
}

// =============================================================
// Session views
// =============================================================

#[test]
fn current_user_shows_name_and_role() {
    let user = User { username: "alice".into(), role: Role::Viewer };
    assert_eq!(render_current_user(Some(&user)), "alice (viewer)");
    assert_eq!(render_current_user(None), "Not logged in");
}

#[test]
fn permissions_list_every_label() {
    let out = render_permissions(&PermissionPanel::for_role(Role::Auditor));
    assert!(out.starts_with("Permissions for auditor:"));
    assert!(out.contains("✓ View items"));
    assert!(out.contains("✓ View history"));
    assert!(!out.contains("Add items"));
}

#[test]
fn viewer_permissions_note_missing_add() {
    let out = render_permissions(&PermissionPanel::for_role(Role::Viewer));
    assert!(out.contains("adding items is not available"));
    let out = render_permissions(&PermissionPanel::for_role(Role::Manager));
    assert!(!out.contains("adding items is not available"));
}

// =============================================================
// Items
// =============================================================

#[test]
fn low_stock_threshold_is_inclusive() {
    assert!(is_low_stock(0));
    assert!(is_low_stock(10));
    assert!(!is_low_stock(11));
}

#[test]
fn price_has_two_decimals() {
    assert_eq!(format_price(2.5), "$2.50");
    assert_eq!(format_price(10.0), "$10.00");
}

#[test]
fn timestamp_is_readable() {
    assert_eq!(format_timestamp(datetime!(2024-05-01 10:00:05 UTC)), "2024-05-01 10:00:05");
}

#[test]
fn items_table_flags_low_stock_and_missing_location() {
    let out = render_items(&[item(1, 10, None), item(2, 11, Some("A1"))], Controls::for_role(Role::Admin));
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[1].starts_with("ID"));
    assert!(lines[3].contains("10 (low)"));
    assert!(lines[3].contains("N/A"));
    assert!(lines[3].contains("$2.50"));
    assert!(!lines[4].contains("(low)"));
    assert!(lines[4].contains("A1"));
}

#[test]
fn empty_items_say_so() {
    let out = render_items(&[], Controls::for_role(Role::Viewer));
    assert_eq!(out, "No items found");
}

#[test]
fn viewer_rows_show_disabled_edit_and_delete() {
    let out = render_items(&[item(1, 50, None)], Controls::for_role(Role::Viewer));
    assert!(!out.contains("[add item available]"));
    assert!(out.contains("(edit)"));
    assert!(out.contains("(delete)"));
}

#[test]
fn manager_rows_enable_edit_only() {
    let out = render_items(&[item(1, 50, None)], Controls::for_role(Role::Manager));
    assert!(out.contains("[add item available]"));
    assert!(out.contains("history edit (delete)"));
}

#[test]
fn admin_rows_enable_everything() {
    let out = render_items(&[item(1, 50, None)], Controls::for_role(Role::Admin));
    assert!(out.contains("history edit delete"));
}

// =============================================================
// History
// =============================================================

#[test]
fn history_rows_count_changes() {
    let out = render_history(7, &[record(3, "UPDATE", json!("{\"price\":{\"old\":1,\"new\":2},\"name\":{\"old\":\"a\",\"new\":\"b\"}}"))]);
    assert!(out.starts_with("History for item 7:"));
    assert!(out.contains("2 changes"));
    assert!(out.contains("~ UPDATE"));
    assert!(out.contains("7 (Bolt)"));
}

#[test]
fn empty_history_says_so() {
    assert_eq!(render_history(7, &[]), "No history found");
}

#[test]
fn action_badges_are_distinct() {
    assert_eq!(action_badge(HistoryAction::Create), "+");
    assert_eq!(action_badge(HistoryAction::Delete), "-");
    assert_eq!(action_badge(HistoryAction::Unknown), "?");
}

#[test]
fn detail_renders_snapshots_and_nulls() {
    let detail = HistoryDetail {
        history_id: 3,
        record: Some(record(3, "CREATE", json!(null))),
        changes: vec![FieldChange { field: "name".into(), old: serde_json::Value::Null, new: json!("Bolt") }],
    };
    let out = render_history_detail(&detail);
    assert!(out.contains("Old data:\nNo data"));
    assert!(out.contains("\"name\": \"Bolt\""));
    assert!(out.contains("null"));
    assert!(out.contains("Field"));
}

#[test]
fn detail_without_record_shows_no_data() {
    let detail = HistoryDetail { history_id: 3, record: None, changes: Vec::new() };
    let out = render_history_detail(&detail);
    assert_eq!(out.matches("No data").count(), 2);
    assert!(out.contains("No field changes"));
}
