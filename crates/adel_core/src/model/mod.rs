//! Domain model shared by the dashboard controllers.
//!
//! # Responsibility
//! - Define project entities exactly as the list source delivers them.
//! - Keep derived projections (overdue, budget usage) next to the data.
//!
//! # Invariants
//! - Model values are snapshots; controllers copy them, never alias them.

pub mod decimal;
pub mod project;
