//! Client-side state.
//!
//! DESIGN
//! ======
//! State is split by concern (`session`, `permissions`, `history`) and owned
//! by a single [`crate::app::App`], which is the only writer.

pub mod history;
pub mod permissions;
pub mod session;
