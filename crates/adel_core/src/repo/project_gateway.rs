//! Project gateway contract toward the remote project API.
//!
//! # Responsibility
//! - Describe the list/update/delete calls the dashboard depends on.
//! - Carry transport failures as typed errors the service turns into notices.
//!
//! # Invariants
//! - Implementations never panic on transport failures.
//! - `update_project` applies the partial payload as a whole or not at all.

use crate::model::project::{Project, ProjectId, ProjectUpdate};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failure reported by the remote project API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Request never produced a response (offline, timeout, DNS).
    Network(String),
    /// Server answered with a non-success status.
    Rejected { status: u16, message: String },
    NotFound(ProjectId),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(message) => write!(f, "network error: {message}"),
            Self::Rejected { status, message } => {
                write!(f, "request rejected with status {status}: {message}")
            }
            Self::NotFound(id) => write!(f, "project not found: {id}"),
        }
    }
}

impl Error for GatewayError {}

impl GatewayError {
    /// Stable short code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Rejected { .. } => "rejected",
            Self::NotFound(_) => "not_found",
        }
    }
}

/// Remote project API used by the dashboard.
pub trait ProjectGateway {
    fn list_projects(&self) -> GatewayResult<Vec<Project>>;
    fn update_project(&self, id: ProjectId, update: &ProjectUpdate) -> GatewayResult<()>;
    fn delete_project(&self, id: ProjectId) -> GatewayResult<()>;
}

impl<T: ProjectGateway + ?Sized> ProjectGateway for &T {
    fn list_projects(&self) -> GatewayResult<Vec<Project>> {
        (**self).list_projects()
    }

    fn update_project(&self, id: ProjectId, update: &ProjectUpdate) -> GatewayResult<()> {
        (**self).update_project(id, update)
    }

    fn delete_project(&self, id: ProjectId) -> GatewayResult<()> {
        (**self).delete_project(id)
    }
}
