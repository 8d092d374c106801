//! Plain-text rendering of views.
//!
//! Every function here is pure: data in, `String` out. Column widths are
//! measured in chars so non-ASCII names line up.

use serde_json::Value;
use time::OffsetDateTime;
use time::macros::format_description;

use crate::net::types::{FieldChange, HistoryAction, HistoryRecord, Item, User};
use crate::state::permissions::{Controls, PermissionPanel};
use crate::ui::{HistoryDetail, View};

/// Quantities at or below this are flagged as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

#[must_use]
pub fn render_view(view: &View) -> String {
    match view {
        View::CurrentUser(user) => render_current_user(user.as_ref()),
        View::Permissions(panel) => render_permissions(panel),
        View::Items { items, controls } => render_items(items, *controls),
        View::History { item_id, records } => render_history(*item_id, records),
        View::HistoryDetail(detail) => render_history_detail(detail),
    }
}

// =============================================================================
// SESSION
// =============================================================================

#[must_use]
pub fn render_current_user(user: Option<&User>) -> String {
    match user {
        Some(user) => format!("{} ({})", user.username, user.role),
        None => "Not logged in".to_owned(),
    }
}

#[must_use]
pub fn render_permissions(panel: &PermissionPanel) -> String {
    let Some(role) = panel.role else {
        return "Permissions: none (not logged in)".to_owned();
    };
    let mut out = format!("Permissions for {role}:");
    for label in &panel.labels {
        out.push_str("\n  ✓ ");
        out.push_str(label);
    }
    if !panel.controls.add_visible {
        out.push_str("\n(adding items is not available for this role)");
    }
    out
}

// =============================================================================
// ITEMS
// =============================================================================

#[must_use]
pub fn is_low_stock(quantity: i64) -> bool {
    quantity <= LOW_STOCK_THRESHOLD
}

#[must_use]
pub fn format_price(price: f64) -> String {
    format!("${price:.2}")
}

#[must_use]
pub fn format_timestamp(ts: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    ts.format(&format)
        .unwrap_or_else(|_| ts.unix_timestamp().to_string())
}

fn quantity_cell(quantity: i64) -> String {
    if is_low_stock(quantity) {
        format!("{quantity} (low)")
    } else {
        quantity.to_string()
    }
}

/// Action markers per row; disabled actions are shown in brackets.
fn action_cell(controls: Controls) -> String {
    let edit = if controls.edit_enabled { "edit" } else { "(edit)" };
    let delete = if controls.delete_enabled { "delete" } else { "(delete)" };
    format!("history {edit} {delete}")
}

#[must_use]
pub fn render_items(items: &[Item], controls: Controls) -> String {
    let mut out = String::new();
    if controls.add_visible {
        out.push_str("[add item available]\n");
    }
    if items.is_empty() {
        out.push_str("No items found");
        return out;
    }
    let actions = action_cell(controls);
    let rows = items
        .iter()
        .map(|item| {
            vec![
                item.id.to_string(),
                item.name.clone(),
                quantity_cell(item.quantity),
                format_price(item.price),
                item.location.clone().unwrap_or_else(|| "N/A".to_owned()),
                item.created_by.clone(),
                format_timestamp(item.updated_at),
                actions.clone(),
            ]
        })
        .collect::<Vec<_>>();
    out.push_str(&table(
        &["ID", "Name", "Qty", "Price", "Location", "Created by", "Updated", "Actions"],
        &rows,
    ));
    out
}

// =============================================================================
// HISTORY
// =============================================================================

/// Badge prefix used in place of the web client's colored labels.
#[must_use]
pub fn action_badge(action: HistoryAction) -> &'static str {
    match action {
        HistoryAction::Create => "+",
        HistoryAction::Update => "~",
        HistoryAction::Delete => "-",
        HistoryAction::Unknown => "?",
    }
}

#[must_use]
pub fn render_history(item_id: i64, records: &[HistoryRecord]) -> String {
    if records.is_empty() {
        return "No history found".to_owned();
    }
    let rows = records
        .iter()
        .map(|record| {
            let item = match &record.item_name {
                Some(name) => format!("{} ({name})", record.item_id),
                None => record.item_id.to_string(),
            };
            vec![
                format_timestamp(record.changed_at),
                item,
                format!("{} {}", action_badge(record.action), record.action),
                record.changed_by.clone(),
                format!("{} changes", record.change_count()),
                record.id.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    format!(
        "History for item {item_id}:\n{}",
        table(&["Changed at", "Item", "Action", "Changed by", "Changes", "Record"], &rows)
    )
}

fn snapshot(value: Option<&Value>) -> String {
    value
        .and_then(|v| serde_json::to_string_pretty(v).ok())
        .unwrap_or_else(|| "No data".to_owned())
}

fn change_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[must_use]
pub fn render_field_changes(changes: &[FieldChange]) -> String {
    if changes.is_empty() {
        return "No field changes".to_owned();
    }
    let rows = changes
        .iter()
        .map(|c| vec![c.field.clone(), change_value(&c.old), change_value(&c.new)])
        .collect::<Vec<_>>();
    table(&["Field", "Old", "New"], &rows)
}

#[must_use]
pub fn render_history_detail(detail: &HistoryDetail) -> String {
    let record = detail.record.as_ref();
    format!(
        "History record {}\n\nOld data:\n{}\n\nNew data:\n{}\n\nChanges:\n{}",
        detail.history_id,
        snapshot(record.and_then(|r| r.old_data.as_ref())),
        snapshot(record.and_then(|r| r.new_data.as_ref())),
        render_field_changes(&detail.changes),
    )
}

// =============================================================================
// TABLE
// =============================================================================

fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let mut lines = vec![
        format_row(headers.to_vec()),
        format_row(separator.iter().map(String::as_str).collect()),
    ];
    lines.extend(rows.iter().map(|row| format_row(row.iter().map(String::as_str).collect())));
    lines.join("\n")
}

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;
