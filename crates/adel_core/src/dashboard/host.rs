//! Dashboard host: the state a UI view keeps for the admin dashboard.
//!
//! # Responsibility
//! - Translate tab changes into focus events for the badge controller.
//! - Drive the edit dialog, the details dialog and confirmed deletes.
//! - Refresh the project list after successful mutations.
//!
//! # Invariants
//! - Exactly one tab is focused on the badge controller at any time.
//! - A delete reaches the gateway only after `confirm_delete`.
//! - Gateway failures are queued as notices, never returned as errors.

use crate::badge::controller::BadgeController;
use crate::config::DashboardConfig;
use crate::dashboard::details::ProjectDetails;
use crate::dashboard::tab::DashboardTab;
use crate::edit::session::{EditDraft, EditField, EditSession, EditSessionError};
use crate::model::project::{overdue_count, Project, ProjectId};
use crate::repo::project_gateway::ProjectGateway;
use crate::service::notice::Notice;
use crate::service::project_service::{DeleteRequest, MutationReport, ProjectService};
use crate::store::kv_store::KeyValueStore;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors for dashboard actions that reference local state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    ProjectNotFound(ProjectId),
    NoPendingDelete,
    Edit(EditSessionError),
}

impl Display for DashboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProjectNotFound(id) => write!(f, "project {id} is not in the loaded list"),
            Self::NoPendingDelete => write!(f, "no delete is awaiting confirmation"),
            Self::Edit(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DashboardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Edit(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EditSessionError> for DashboardError {
    fn from(value: EditSessionError) -> Self {
        Self::Edit(value)
    }
}

pub struct Dashboard<S: KeyValueStore, G: ProjectGateway> {
    badge: BadgeController<S>,
    edit: EditSession,
    service: ProjectService<G>,
    active_tab: DashboardTab,
    projects: Vec<Project>,
    viewing: Option<ProjectDetails>,
    pending_delete: Option<DeleteRequest>,
    notices: Vec<Notice>,
}

impl<S: KeyValueStore, G: ProjectGateway> Dashboard<S, G> {
    /// Creates the host with the overview tab focused.
    pub fn new(store: S, gateway: G, config: &DashboardConfig, now_ms: i64) -> Self {
        let mut badge = BadgeController::open(store, config.dwell_ms);
        badge.view_focused(DashboardTab::default().as_str(), now_ms);

        Self {
            badge,
            edit: EditSession::new(),
            service: ProjectService::new(gateway),
            active_tab: DashboardTab::default(),
            projects: Vec::new(),
            viewing: None,
            pending_delete: None,
            notices: Vec::new(),
        }
    }

    pub fn active_tab(&self) -> DashboardTab {
        self.active_tab
    }

    pub fn badge(&self) -> &BadgeController<S> {
        &self.badge
    }

    pub fn service(&self) -> &ProjectService<G> {
        &self.service
    }

    pub fn edit_session(&self) -> &EditSession {
        &self.edit
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn viewing(&self) -> Option<&ProjectDetails> {
        self.viewing.as_ref()
    }

    pub fn pending_delete(&self) -> Option<ProjectId> {
        self.pending_delete.as_ref().map(DeleteRequest::project_id)
    }

    /// Switches tabs, moving badge focus from the old view to the new one.
    pub fn select_tab(&mut self, tab: DashboardTab, now_ms: i64) {
        if tab == self.active_tab {
            return;
        }
        self.badge.view_unfocused();
        self.badge.view_focused(tab.as_str(), now_ms);
        self.active_tab = tab;
    }

    /// Feeds the polled unread count; may re-arm the messages dwell.
    pub fn unread_count_updated(&mut self, count: u32, now_ms: i64) {
        self.badge.count_updated(count, now_ms);
    }

    /// Advances the clock; returns whether the badge was dismissed.
    pub fn tick(&mut self, now_ms: i64) -> bool {
        self.badge.advance(now_ms)
    }

    pub fn messages_badge(&self) -> Option<u32> {
        self.badge.visible_count()
    }

    /// Overdue tally for the projects tab; `None` hides the badge.
    pub fn overdue_badge(&self) -> Option<usize> {
        let count = overdue_count(&self.projects);
        (count > 0).then_some(count)
    }

    /// Replaces the project list with data from the list source.
    pub fn projects_loaded(&mut self, projects: Vec<Project>) {
        self.projects = projects;
    }

    /// Re-fetches the project list. A failure keeps the stale list.
    pub fn refresh(&mut self) -> bool {
        match self.service.list_projects() {
            Ok(projects) => {
                info!(
                    "event=projects_refresh module=dashboard status=ok count={}",
                    projects.len()
                );
                self.projects = projects;
                true
            }
            Err(err) => {
                warn!(
                    "event=projects_refresh module=dashboard status=error error_code={} error={}",
                    err.code(),
                    err
                );
                false
            }
        }
    }

    pub fn view_details(&mut self, id: ProjectId) -> Result<&ProjectDetails, DashboardError> {
        let project = self.find_project(id)?;
        let details = ProjectDetails::from_project(project);
        Ok(self.viewing.insert(details))
    }

    pub fn close_details(&mut self) {
        self.viewing = None;
    }

    /// Opens the edit dialog for a loaded project.
    pub fn begin_edit(&mut self, id: ProjectId) -> Result<&EditDraft, DashboardError> {
        let project = self.find_project(id)?.clone();
        Ok(self.edit.begin(&project)?)
    }

    pub fn update_edit_field(&mut self, field: EditField, value: &str) -> Result<(), DashboardError> {
        Ok(self.edit.update_field(field, value)?)
    }

    /// Submits the edit dialog, queues the notice, refreshes on success.
    pub fn submit_edit(&mut self) -> Result<MutationReport, DashboardError> {
        let report = self.service.commit_edit(&mut self.edit)?;
        self.apply_report(&report);
        Ok(report)
    }

    /// Closes the edit dialog by any means; the draft is dropped.
    pub fn cancel_edit(&mut self) {
        self.edit.cancel();
    }

    /// Stages a delete; nothing is sent until `confirm_delete`.
    pub fn request_delete(&mut self, id: ProjectId) -> Result<(), DashboardError> {
        self.find_project(id)?;
        self.pending_delete = Some(DeleteRequest::new(id));
        Ok(())
    }

    pub fn confirm_delete(&mut self) -> Result<MutationReport, DashboardError> {
        let request = self
            .pending_delete
            .take()
            .ok_or(DashboardError::NoPendingDelete)?;
        let project_id = request.project_id();
        let report = self.service.delete_project(request.confirm());

        if report.refresh {
            if self.viewing.as_ref().is_some_and(|details| details.id == project_id) {
                self.viewing = None;
            }
            if self.edit.target_id() == Some(project_id) {
                self.edit.cancel();
            }
        }
        self.apply_report(&report);
        Ok(report)
    }

    pub fn dismiss_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Drains queued notices in arrival order.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Tears the view down: pending dwell is cancelled, dialogs are closed.
    pub fn shutdown(&mut self) {
        self.badge.shutdown();
        self.edit.cancel();
        self.viewing = None;
        self.pending_delete = None;
    }

    fn apply_report(&mut self, report: &MutationReport) {
        self.notices.push(report.notice.clone());
        if report.refresh {
            self.refresh();
        }
    }

    fn find_project(&self, id: ProjectId) -> Result<&Project, DashboardError> {
        self.projects
            .iter()
            .find(|project| project.id == id)
            .ok_or(DashboardError::ProjectNotFound(id))
    }
}
