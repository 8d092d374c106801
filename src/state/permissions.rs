//! Role -> permission table and the control affordances derived from it.
//!
//! These are display hints only. The backend checks every request on its own.

use crate::net::types::Role;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Permission {
    ViewItems,
    AddItems,
    EditItems,
    DeleteItems,
    ViewHistory,
    ExportData,
}

impl Permission {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ViewItems => "View items",
            Self::AddItems => "Add items",
            Self::EditItems => "Edit items",
            Self::DeleteItems => "Delete items",
            Self::ViewHistory => "View history",
            Self::ExportData => "Export data",
        }
    }
}

const ADMIN: &[Permission] = &[
    Permission::ViewItems,
    Permission::AddItems,
    Permission::EditItems,
    Permission::DeleteItems,
    Permission::ViewHistory,
    Permission::ExportData,
];
const MANAGER: &[Permission] =
    &[Permission::ViewItems, Permission::AddItems, Permission::EditItems, Permission::ViewHistory];
const VIEWER: &[Permission] = &[Permission::ViewItems];
const AUDITOR: &[Permission] = &[Permission::ViewItems, Permission::ViewHistory];

/// Static permission list shown for a role, in display order.
#[must_use]
pub fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => ADMIN,
        Role::Manager => MANAGER,
        Role::Viewer => VIEWER,
        Role::Auditor => AUDITOR,
    }
}

/// Which privileged controls are offered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Controls {
    pub add_visible: bool,
    pub edit_enabled: bool,
    pub delete_enabled: bool,
}

impl Controls {
    #[must_use]
    pub fn for_role(role: Role) -> Self {
        Self {
            add_visible: role != Role::Viewer,
            edit_enabled: role != Role::Viewer,
            delete_enabled: role == Role::Admin,
        }
    }
}

/// Everything the permission sidebar shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PermissionPanel {
    pub role: Option<Role>,
    pub labels: Vec<&'static str>,
    pub controls: Controls,
}

impl PermissionPanel {
    #[must_use]
    pub fn for_role(role: Role) -> Self {
        Self {
            role: Some(role),
            labels: permissions_for(role).iter().map(|p| p.label()).collect(),
            controls: Controls::for_role(role),
        }
    }

    /// Panel with no role: nothing listed, every control off.
    #[must_use]
    pub fn signed_out() -> Self {
        Self::default()
    }
}

#[cfg(test)]
#[path = "permissions_test.rs"]
mod permissions_test;
