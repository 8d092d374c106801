//! Wire DTOs for the inventory REST API.
//!
//! DESIGN
//! ======
//! These types mirror the backend's JSON. The backend is loose in a few
//! places: unset text columns arrive as `""`, empty lists arrive as `null`,
//! and history snapshots are stored as JSON-encoded strings. Decoding
//! normalizes all of that here so views never see the raw shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// Records requested per history page.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

// =============================================================================
// USERS
// =============================================================================

/// Role claimed at login. Decides which controls the client offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Viewer,
    Auditor,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Viewer, Role::Auditor];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Viewer => "viewer",
            Self::Auditor => "auditor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown role '{s}' (expected admin, manager, viewer or auditor)"))
    }
}

/// Authenticated user as returned by the login endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub role: Role,
}

/// Body of `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub role: Role,
}

/// Response of `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

// =============================================================================
// ITEMS
// =============================================================================

/// An inventory item. Server-owned; the client keeps a copy per render only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    pub quantity: i64,
    pub price: f64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Body of `POST /items`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub quantity: i64,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Sparse body of `PUT /items/{id}`. Absent fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ItemPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
            && self.location.is_none()
    }
}

// =============================================================================
// HISTORY
// =============================================================================

/// Kind of change recorded in an item's history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryAction {
    Create,
    Update,
    Delete,
    /// Any action this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl HistoryAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREATE" => Ok(Self::Create),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            _ => Err(format!("unknown action '{s}' (expected CREATE, UPDATE or DELETE)")),
        }
    }
}

/// One row of an item's change history.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub item_id: i64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub item_name: Option<String>,
    pub action: HistoryAction,
    pub changed_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub changed_at: OffsetDateTime,
    #[serde(default, deserialize_with = "json_snapshot")]
    pub old_data: Option<Value>,
    #[serde(default, deserialize_with = "json_snapshot")]
    pub new_data: Option<Value>,
    #[serde(default, deserialize_with = "json_snapshot")]
    pub changes: Option<Value>,
}

impl HistoryRecord {
    /// Number of fields touched by this change, `0` when unknown.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.changes
            .as_ref()
            .and_then(Value::as_object)
            .map_or(0, serde_json::Map::len)
    }
}

/// Field-level difference produced by the server's diff endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    #[serde(default)]
    pub old: Value,
    #[serde(default)]
    pub new: Value,
}

/// Query string of `GET /items/{id}/history`. Unset filters are not sent.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HistoryQuery {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<HistoryAction>,
    #[serde(skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub from_date: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
    pub to_date: Option<OffsetDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
            changed_by: None,
            action: None,
            from_date: None,
            to_date: None,
            offset: None,
        }
    }
}

/// A downloaded history export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryExport {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// File name an item's history export is saved under.
#[must_use]
pub fn export_filename(item_id: i64) -> String {
    format!("history_item_{item_id}.csv")
}

// =============================================================================
// DECODING HELPERS
// =============================================================================

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Accepts an inline JSON value or a JSON-encoded string. Empty strings and
/// `null` (inline or encoded) become `None`; an unparseable string is kept
/// verbatim.
fn json_snapshot<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => None,
        Some(Value::String(encoded)) => {
            if encoded.trim().is_empty() {
                None
            } else {
                match serde_json::from_str::<Value>(&encoded) {
                    Ok(Value::Null) => None,
                    Ok(decoded) => Some(decoded),
                    Err(_) => Some(Value::String(encoded)),
                }
            }
        }
        Some(inline) => Some(inline),
    })
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
