//! Project use-case service.
//!
//! # Responsibility
//! - Commit edit sessions through the gateway and report the outcome.
//! - Gate deletes behind an explicit confirmation step.
//!
//! # Invariants
//! - Gateway failures never escape as errors; they become `Notice`s.
//! - `delete_project` is only reachable with a `ConfirmedDelete`.

use crate::edit::session::{CommitOutcome, EditSession, EditSessionError};
use crate::model::project::{Project, ProjectId};
use crate::repo::project_gateway::{GatewayResult, ProjectGateway};
use crate::service::notice::Notice;
use log::{info, warn};

pub const UPDATE_SUCCESS_MESSAGE: &str = "Project updated successfully";
pub const UPDATE_FAILURE_MESSAGE: &str = "Failed to update project";
pub const DELETE_SUCCESS_MESSAGE: &str = "Project deleted successfully";
pub const DELETE_FAILURE_MESSAGE: &str = "Failed to delete project";

/// Delete awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    project_id: ProjectId,
}

impl DeleteRequest {
    pub fn new(project_id: ProjectId) -> Self {
        Self { project_id }
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Records the user's explicit confirmation.
    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete {
            project_id: self.project_id,
        }
    }
}

/// Delete the user has confirmed; the only input `delete_project` accepts.
#[derive(Debug, PartialEq, Eq)]
pub struct ConfirmedDelete {
    project_id: ProjectId,
}

impl ConfirmedDelete {
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

/// Outcome of a service mutation: the notice to show and whether the project
/// list should be re-fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReport {
    pub notice: Notice,
    pub refresh: bool,
}

/// Project service facade over a gateway implementation.
pub struct ProjectService<G: ProjectGateway> {
    gateway: G,
}

impl<G: ProjectGateway> ProjectService<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn list_projects(&self) -> GatewayResult<Vec<Project>> {
        self.gateway.list_projects()
    }

    /// Commits the open edit session.
    ///
    /// # Errors
    /// - Session errors (`NoActiveSession`, `CommitInFlight`) are returned
    ///   unchanged; gateway failures are reported through the notice.
    pub fn commit_edit(&self, session: &mut EditSession) -> Result<MutationReport, EditSessionError> {
        let outcome = session.commit(&self.gateway)?;
        Ok(report_commit(&outcome))
    }

    /// Deletes a confirmed project.
    pub fn delete_project(&self, confirmed: ConfirmedDelete) -> MutationReport {
        let project_id = confirmed.project_id();
        match self.gateway.delete_project(project_id) {
            Ok(()) => {
                info!("event=project_delete module=service status=ok project_id={project_id}");
                MutationReport {
                    notice: Notice::success(DELETE_SUCCESS_MESSAGE),
                    refresh: true,
                }
            }
            Err(err) => {
                warn!(
                    "event=project_delete module=service status=error project_id={} error_code={} error={}",
                    project_id,
                    err.code(),
                    err
                );
                MutationReport {
                    notice: Notice::error(DELETE_FAILURE_MESSAGE),
                    refresh: false,
                }
            }
        }
    }
}

/// Maps a commit outcome onto the notice shown to the user.
pub fn report_commit(outcome: &CommitOutcome) -> MutationReport {
    match outcome {
        CommitOutcome::Committed { .. } => MutationReport {
            notice: Notice::success(UPDATE_SUCCESS_MESSAGE),
            refresh: true,
        },
        CommitOutcome::Failed { .. } => MutationReport {
            notice: Notice::error(UPDATE_FAILURE_MESSAGE),
            refresh: false,
        },
    }
}
