//! Project edit dialog state.
//!
//! # Responsibility
//! - Own the single local draft behind the edit dialog.
//! - Normalize deadlines to date-input form without timezone drift.

pub mod deadline;
pub mod session;
