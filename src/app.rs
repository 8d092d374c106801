//! Client controller: one handler per user action.
//!
//! DESIGN
//! ======
//! Each public handler follows the same cycle: read its explicit inputs,
//! check the session, make the call, then redraw on success or show a single
//! message on failure. Handlers never propagate errors; the `try_*` half
//! returns [`AppError`] and [`App::report`] turns it into what the user sees.
//!
//! A 401 from any authenticated call means the token is no longer accepted,
//! so the session is dropped on the spot.

use crate::forms::{FormError, ItemForm};
use crate::net::api::{ApiError, InventoryApi};
use crate::net::types::{HistoryQuery, LoginRequest, Role};
use crate::state::history::{HistoryCache, HistoryFilter};
use crate::state::permissions::{Controls, PermissionPanel};
use crate::state::session::SessionState;
use crate::ui::{HistoryDetail, Ui, View};

pub const MSG_LOGIN_REQUIRED: &str = "Please login first";
pub const MSG_SESSION_EXPIRED: &str = "Session expired, please login again";
pub const MSG_ITEMS_FORBIDDEN: &str = "You do not have permission to view items";
pub const MSG_ITEMS_FAILED: &str = "Failed to load items";
pub const MSG_CONFIRM_DELETE: &str = "Are you sure you want to delete this item?";

/// Failure of a single user action.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Please login first")]
    NotLoggedIn,

    #[error("Please enter an item ID")]
    MissingItemId,

    #[error("Nothing to update: fill in at least one field")]
    EmptyUpdate,

    #[error("History record {history_id} not found in item {item_id} listing")]
    RecordNotFound { history_id: i64, item_id: i64 },

    #[error("{0}")]
    Form(#[from] FormError),

    #[error("Login failed: {0}")]
    Login(#[source] ApiError),

    /// An authenticated call failed; `context` is what the user is told.
    #[error("{context}")]
    Api {
        context: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    fn api(context: &'static str) -> impl FnOnce(ApiError) -> Self {
        move |source| Self::Api { context, source }
    }
}

/// Owns the session and the view state; the only writer of either.
pub struct App<A, U> {
    api: A,
    ui: U,
    session: SessionState,
    history: HistoryCache,
}

impl<A: InventoryApi, U: Ui> App<A, U> {
    pub fn new(api: A, ui: U) -> Self {
        Self { api, ui, session: SessionState::default(), history: HistoryCache::default() }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    /// Permission sidebar for the current session.
    pub fn permission_panel(&self) -> PermissionPanel {
        self.session
            .role()
            .map_or_else(PermissionPanel::signed_out, PermissionPanel::for_role)
    }

    fn controls(&self) -> Controls {
        self.session.role().map(Controls::for_role).unwrap_or_default()
    }

    fn token(&self) -> Result<String, AppError> {
        self.session
            .token()
            .map(ToOwned::to_owned)
            .ok_or(AppError::NotLoggedIn)
    }

    /// Show the outcome of a handler. Returns whether it succeeded.
    fn report(&mut self, result: Result<(), AppError>) -> bool {
        let Err(error) = result else {
            return true;
        };
        match &error {
            AppError::Api { source, .. } if source.is_unauthorized() => {
                tracing::warn!(error = %source, "token rejected, clearing session");
                self.end_session();
                self.ui.alert(MSG_SESSION_EXPIRED);
                return false;
            }
            AppError::Api { context, source } => tracing::warn!(%context, error = %source, "request failed"),
            AppError::Login(source) => tracing::warn!(error = %source, "login failed"),
            AppError::Io { context, source } => tracing::warn!(%context, error = %source, "local I/O failed"),
            AppError::RecordNotFound { history_id, item_id } => {
                tracing::warn!(history_id, item_id, "history record missing from refetched listing");
            }
            _ => tracing::debug!(%error, "action rejected"),
        }
        self.ui.alert(&error.to_string());
        false
    }

    fn end_session(&mut self) {
        self.session.clear();
        self.history.clear();
        self.ui.show(View::CurrentUser(None));
        self.ui.show(View::Permissions(PermissionPanel::signed_out()));
    }

    // =========================================================================
    // SESSION
    // =========================================================================

    /// Log in, then show the user, their permissions and the item list.
    pub async fn login(&mut self, username: &str, role: Role) {
        let result = self.try_login(username, role).await;
        if self.report(result) {
            self.ui.alert("Login successful!");
            self.load_items().await;
        }
    }

    async fn try_login(&mut self, username: &str, role: Role) -> Result<(), AppError> {
        let request = LoginRequest { username: username.trim().to_owned(), role };
        let response = self.api.login(&request).await.map_err(AppError::Login)?;
        self.history.clear();
        let user = self.session.begin(response).user.clone();
        tracing::info!(username = %user.username, role = %user.role, "logged in");
        let panel = self.permission_panel();
        self.ui.show(View::CurrentUser(Some(user)));
        self.ui.show(View::Permissions(panel));
        Ok(())
    }

    pub fn logout(&mut self) {
        if self.session.is_active() {
            self.end_session();
            self.ui.alert("Logged out");
        } else {
            self.ui.alert("Not logged in");
        }
    }

    pub fn whoami(&mut self) {
        let user = self.session.user().cloned();
        self.ui.show(View::CurrentUser(user));
    }

    pub fn show_permissions(&mut self) {
        let panel = self.permission_panel();
        self.ui.show(View::Permissions(panel));
    }

    // =========================================================================
    // ITEMS
    // =========================================================================

    /// Fetch and render the full item list.
    pub async fn load_items(&mut self) {
        let result = self.try_load_items().await;
        self.report(result);
    }

    async fn try_load_items(&mut self) -> Result<(), AppError> {
        let token = self.token()?;
        let items = self.api.list_items(&token).await.map_err(|source| {
            let context = if source.is_forbidden() { MSG_ITEMS_FORBIDDEN } else { MSG_ITEMS_FAILED };
            AppError::Api { context, source }
        })?;
        tracing::debug!(count = items.len(), "items loaded");
        let controls = self.controls();
        self.ui.show(View::Items { items, controls });
        Ok(())
    }

    /// Create an item from raw form values, then reload the list.
    pub async fn add_item(&mut self, form: ItemForm) {
        let result = self.try_add_item(&form).await;
        if self.report(result) {
            self.ui.alert("Item added successfully!");
            self.load_items().await;
        }
    }

    async fn try_add_item(&mut self, form: &ItemForm) -> Result<(), AppError> {
        let token = self.token()?;
        let new_item = form.to_new_item()?;
        let created = self
            .api
            .create_item(&token, &new_item)
            .await
            .map_err(AppError::api("Failed to add item"))?;
        tracing::info!(id = created.id, name = %created.name, "item created");
        Ok(())
    }

    /// Send only the filled-in fields of `form`, then reload the list.
    pub async fn update_item(&mut self, id: i64, form: ItemForm) {
        let result = self.try_update_item(id, &form).await;
        if self.report(result) {
            self.ui.alert("Item updated successfully!");
            self.load_items().await;
        }
    }

    async fn try_update_item(&mut self, id: i64, form: &ItemForm) -> Result<(), AppError> {
        let token = self.token()?;
        let patch = form.to_patch()?;
        if patch.is_empty() {
            return Err(AppError::EmptyUpdate);
        }
        self.api
            .update_item(&token, id, &patch)
            .await
            .map_err(AppError::api("Failed to update item"))?;
        tracing::info!(id, "item updated");
        Ok(())
    }

    /// Delete after confirmation. `confirmed` skips the prompt.
    ///
    /// Declining issues no request.
    pub async fn delete_item(&mut self, id: i64, confirmed: bool) {
        let result = self.try_delete_item(id, confirmed).await;
        if let Ok(true) = result {
            self.ui.alert("Item deleted successfully!");
            self.load_items().await;
        } else {
            self.report(result.map(|_| ()));
        }
    }

    /// `Ok(false)` when the user backed out.
    async fn try_delete_item(&mut self, id: i64, confirmed: bool) -> Result<bool, AppError> {
        let token = self.token()?;
        if !confirmed && !self.ui.confirm(MSG_CONFIRM_DELETE) {
            tracing::debug!(id, "delete declined");
            return Ok(false);
        }
        self.api
            .delete_item(&token, id)
            .await
            .map_err(AppError::api("Failed to delete item"))?;
        tracing::info!(id, "item deleted");
        Ok(true)
    }

    // =========================================================================
    // HISTORY
    // =========================================================================

    /// List an item's history with optional filters.
    pub async fn load_history(&mut self, item_id: Option<i64>, filter: HistoryFilter) {
        let result = self.try_load_history(item_id, filter).await;
        self.report(result);
    }

    async fn try_load_history(&mut self, item_id: Option<i64>, filter: HistoryFilter) -> Result<(), AppError> {
        let token = self.token()?;
        let item_id = item_id.ok_or(AppError::MissingItemId)?;
        let query = filter.into_query()?;
        let records = self
            .api
            .item_history(&token, item_id, &query)
            .await
            .map_err(AppError::api("Failed to load history"))?;
        self.history.replace(item_id, &records);
        self.ui.show(View::History { item_id, records });
        Ok(())
    }

    /// Show the full record and field diff of one history entry.
    ///
    /// The record comes from the last history listing when possible. On a
    /// miss the listing of `item_hint` (or of the last listed item) is
    /// fetched again; if the record is still absent nothing is shown.
    pub async fn show_history_details(&mut self, history_id: i64, item_hint: Option<i64>) {
        let result = self.try_show_history_details(history_id, item_hint).await;
        self.report(result);
    }

    async fn try_show_history_details(&mut self, history_id: i64, item_hint: Option<i64>) -> Result<(), AppError> {
        const CONTEXT: &str = "Failed to load history details";

        let token = self.token()?;
        let changes = self
            .api
            .history_diff(&token, history_id)
            .await
            .map_err(AppError::api(CONTEXT))?;

        if self.history.get(history_id).is_none() {
            if let Some(item_id) = item_hint.or(self.history.item_id()) {
                tracing::debug!(history_id, item_id, "history record not cached, refetching listing");
                let records = self
                    .api
                    .item_history(&token, item_id, &HistoryQuery::default())
                    .await
                    .map_err(AppError::api(CONTEXT))?;
                self.history.replace(item_id, &records);
                if self.history.get(history_id).is_none() {
                    return Err(AppError::RecordNotFound { history_id, item_id });
                }
            }
        }

        let record = self.history.get(history_id).cloned();
        self.ui
            .show(View::HistoryDetail(HistoryDetail { history_id, record, changes }));
        Ok(())
    }

    /// Download an item's history as CSV into the download directory.
    pub async fn export_history(&mut self, item_id: Option<i64>) {
        let result = self.try_export_history(item_id).await;
        if self.report(result) {
            self.ui.alert("Export completed successfully!");
        }
    }

    async fn try_export_history(&mut self, item_id: Option<i64>) -> Result<(), AppError> {
        let token = self.token()?;
        let item_id = item_id.ok_or(AppError::MissingItemId)?;
        let export = self
            .api
            .export_history(&token, item_id)
            .await
            .map_err(AppError::api("Failed to export history"))?;
        let path = self
            .ui
            .save_file(&export.filename, &export.bytes)
            .map_err(|source| AppError::Io { context: "Failed to save export", source })?;
        tracing::info!(item_id, path = %path.display(), bytes = export.bytes.len(), "history exported");
        Ok(())
    }
}

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;
