//! Read-only projection behind the "view details" dialog.

use crate::edit::deadline::{calendar_date, format_date_input};
use crate::model::decimal::Decimal;
use crate::model::project::{Project, ProjectId, ProjectStatus};

pub const NO_DEADLINE_LABEL: &str = "No deadline set";

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDetails {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub progress: u8,
    /// `"$used / $budget used"`; absent when the project has no budget.
    pub budget_line: Option<String>,
    pub budget_utilization: Option<f64>,
    pub deadline_label: String,
}

impl ProjectDetails {
    pub fn from_project(project: &Project) -> Self {
        let budget_line = project
            .budget
            .as_ref()
            .map(Decimal::value)
            .filter(|budget| *budget != 0.0)
            .map(|budget| {
                format!(
                    "${:.2} / ${:.2} used",
                    project.budget_used.as_ref().map_or(0.0, Decimal::value),
                    budget
                )
            });
        let deadline_label = match project.deadline.as_deref() {
            Some(raw) if !raw.trim().is_empty() => calendar_date(raw)
                .map(format_date_input)
                .unwrap_or_else(|_| raw.trim().to_string()),
            _ => NO_DEADLINE_LABEL.to_string(),
        };

        Self {
            id: project.id,
            name: project.name.clone(),
            description: project.description.clone(),
            status: project.status,
            progress: project.progress_percent(),
            budget_line,
            budget_utilization: project.budget_utilization_percent(),
            deadline_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectDetails, NO_DEADLINE_LABEL};
    use crate::model::decimal::Decimal;
    use crate::model::project::Project;

    #[test]
    fn budget_line_uses_two_decimals() {
        let mut project = Project::new(3, "School roof");
        project.budget = Decimal::parse("1200");
        project.budget_used = Decimal::parse("300.5");
        let details = ProjectDetails::from_project(&project);
        assert_eq!(details.budget_line.as_deref(), Some("$300.50 / $1200.00 used"));
        assert_eq!(details.deadline_label, NO_DEADLINE_LABEL);
    }

    #[test]
    fn deadline_label_uses_calendar_date() {
        let mut project = Project::new(3, "School roof");
        project.deadline = Some("2025-06-01T00:00:00.000Z".to_string());
        let details = ProjectDetails::from_project(&project);
        assert_eq!(details.deadline_label, "2025-06-01");
        assert_eq!(details.budget_line, None);
    }
}
