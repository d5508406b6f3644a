//! Admin dashboard host state.
//!
//! # Responsibility
//! - Wire tab focus, list refreshes and dialog actions to the controllers.
//! - Queue notices for the UI to display.

pub mod details;
pub mod host;
pub mod tab;
