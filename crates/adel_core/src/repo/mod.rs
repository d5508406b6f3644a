//! Data access contracts toward external collaborators.
//!
//! # Responsibility
//! - Define use-case oriented contracts for the remote project API.
//! - Keep transport details out of controllers and services.
//!
//! # Invariants
//! - Contract methods return semantic errors (`NotFound`) in addition to
//!   transport errors.

pub mod project_gateway;
