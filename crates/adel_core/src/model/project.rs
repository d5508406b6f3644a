//! Project domain model as delivered by the project list source.
//!
//! # Responsibility
//! - Define the wire shape of project entities (camelCase JSON).
//! - Provide derived read-only projections: progress, overdue, budget usage.
//!
//! # Invariants
//! - `id` is positive and stable for the project lifetime.
//! - `name` is never blank for a valid project.
//! - Derived values are recomputed on demand, never stored.

use crate::model::decimal::{self, Decimal};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Server-assigned project identifier.
pub type ProjectId = i64;

/// Project lifecycle state reported by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
    Overdue,
    /// Any status this client does not know about.
    #[serde(other)]
    Other,
}

impl ProjectStatus {
    /// Closed projects never count toward the overdue tally.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Project entity snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Percent complete. Absent means 0.
    #[serde(default)]
    pub progress: Option<i32>,
    #[serde(default, deserialize_with = "decimal::deserialize_optional")]
    pub budget: Option<Decimal>,
    #[serde(default, deserialize_with = "decimal::deserialize_optional")]
    pub budget_used: Option<Decimal>,
    /// Raw deadline as sent by the API: a date or a timestamp.
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub is_overdue: bool,
}

/// Partial-update payload sent to the update collaborator.
///
/// `None` fields serialize as `null` so the server clears them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub name: String,
    pub progress: u8,
    /// Passed through from the source project; never edited.
    pub description: Option<String>,
    /// `YYYY-MM-DD` or `None` when cleared.
    pub deadline: Option<String>,
    pub budget: Option<f64>,
    pub budget_used: f64,
}

/// Validation errors for project snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    InvalidId(ProjectId),
    BlankName(ProjectId),
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(id) => write!(f, "project id must be positive, got {id}"),
            Self::BlankName(id) => write!(f, "project {id} has a blank name"),
        }
    }
}

impl Error for ProjectValidationError {}

impl Project {
    /// Creates a project with the given identity and every optional field unset.
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            progress: None,
            budget: None,
            budget_used: None,
            deadline: None,
            status: ProjectStatus::Active,
            is_overdue: false,
        }
    }

    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.id <= 0 {
            return Err(ProjectValidationError::InvalidId(self.id));
        }
        if self.name.trim().is_empty() {
            return Err(ProjectValidationError::BlankName(self.id));
        }
        Ok(())
    }

    /// Progress clamped to `0..=100`; absent progress reads as 0.
    pub fn progress_percent(&self) -> u8 {
        self.progress.unwrap_or(0).clamp(0, 100) as u8
    }

    /// Whether this project shows up in the overdue tally.
    ///
    /// Requires the API's overdue flag, an open status and unfinished progress.
    pub fn counts_as_overdue(&self) -> bool {
        self.is_overdue && !self.status.is_closed() && self.progress_percent() < 100
    }

    /// `budget_used / budget * 100`, or `None` when there is no positive budget.
    pub fn budget_utilization_percent(&self) -> Option<f64> {
        let budget = self
            .budget
            .as_ref()
            .map(Decimal::value)
            .filter(|value| *value > 0.0)?;
        let used = self.budget_used.as_ref().map_or(0.0, Decimal::value);
        Some(used / budget * 100.0)
    }
}

/// Counts projects that are overdue and still actionable.
pub fn overdue_count(projects: &[Project]) -> usize {
    projects
        .iter()
        .filter(|project| project.counts_as_overdue())
        .count()
}

#[cfg(test)]
mod tests {
    use super::{overdue_count, Project, ProjectStatus};

    fn overdue(id: i64) -> Project {
        let mut project = Project::new(id, format!("p{id}"));
        project.is_overdue = true;
        project.progress = Some(40);
        project
    }

    #[test]
    fn overdue_count_skips_closed_and_finished_projects() {
        let mut completed = overdue(2);
        completed.status = ProjectStatus::Completed;
        let mut cancelled = overdue(3);
        cancelled.status = ProjectStatus::Cancelled;
        let mut finished = overdue(4);
        finished.progress = Some(100);
        let mut flagged_by_status = overdue(5);
        flagged_by_status.status = ProjectStatus::Overdue;
        let on_time = Project::new(6, "on time");

        let projects = vec![
            overdue(1),
            completed,
            cancelled,
            finished,
            flagged_by_status,
            on_time,
        ];
        assert_eq!(overdue_count(&projects), 2);
    }

    #[test]
    fn progress_percent_clamps_out_of_range_values() {
        let mut project = Project::new(1, "p");
        assert_eq!(project.progress_percent(), 0);
        project.progress = Some(140);
        assert_eq!(project.progress_percent(), 100);
        project.progress = Some(-5);
        assert_eq!(project.progress_percent(), 0);
    }

    #[test]
    fn budget_utilization_requires_positive_budget() {
        let mut project = Project::new(1, "p");
        assert_eq!(project.budget_utilization_percent(), None);
        project.budget = Some(0.0.into());
        assert_eq!(project.budget_utilization_percent(), None);
        project.budget = Some(200.0.into());
        project.budget_used = Some(50.0.into());
        assert_eq!(project.budget_utilization_percent(), Some(25.0));
    }
}
