//! # warehouse-client
//!
//! Terminal client for the warehouse inventory service.
//!
//! The crate logs a user in, gates controls by the claimed role, lists and
//! edits items, and browses each item's change history (filtered listings,
//! per-record field diffs, CSV export). All business rules live on the
//! server; this side extracts and coerces input, calls the REST API and
//! renders what comes back.
//!
//! [`app::App`] is the controller. It talks to the network through the
//! [`net::api::InventoryApi`] trait and to the user through the
//! [`ui::Ui`] trait; [`shell`] turns input lines into handler calls.

pub mod app;
pub mod config;
pub mod forms;
pub mod net;
pub mod render;
pub mod shell;
pub mod state;
pub mod ui;
