//! Unread-message badge state machine.
//!
//! # Responsibility
//! - Track acknowledged unread counts and the dismissal flag.
//! - Own the dwell timer that dismisses the badge on the messages view.

pub mod controller;
pub mod dwell;
