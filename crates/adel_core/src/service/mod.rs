//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate gateway calls into use-case level APIs.
//! - Convert gateway failures into user-facing notices at the boundary.

pub mod notice;
pub mod project_service;
