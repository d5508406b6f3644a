//! Project edit session: a local draft detached from its source project.
//!
//! # Responsibility
//! - Seed an editable draft from a selected project.
//! - Apply field edits with type coercion only.
//! - Build the partial-update payload and reconcile the commit result.
//!
//! # Invariants
//! - The draft is an owned copy; the source project is never mutated.
//! - At most one session exists; `begin` replaces any open draft.
//! - At most one commit is in flight per session.
//! - A failed commit leaves the draft untouched so a retry re-sends the
//!   identical payload.

use crate::edit::deadline::{calendar_date, format_date_input, parse_date_input};
use crate::model::project::{Project, ProjectId, ProjectUpdate, ProjectValidationError};
use crate::repo::project_gateway::{GatewayError, ProjectGateway};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Editable fields of a project draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    Progress,
    Budget,
    BudgetUsed,
    Deadline,
}

impl EditField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Progress => "progress",
            Self::Budget => "budget",
            Self::BudgetUsed => "budget_used",
            Self::Deadline => "deadline",
        }
    }

    /// Parses a field id; accepts snake_case and the API's camelCase.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "name" => Some(Self::Name),
            "progress" => Some(Self::Progress),
            "budget" => Some(Self::Budget),
            "budget_used" | "budgetUsed" => Some(Self::BudgetUsed),
            "deadline" => Some(Self::Deadline),
            _ => None,
        }
    }
}

/// Local form state for one project.
///
/// Numeric fields are kept as typed text so "" can mean unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub name: String,
    pub progress: u8,
    pub budget: String,
    pub budget_used: String,
    /// `YYYY-MM-DD` or empty.
    pub deadline: String,
}

impl EditDraft {
    /// Seeds a draft from the project's current values.
    pub fn from_project(project: &Project) -> Self {
        let deadline = match project.deadline.as_deref() {
            Some(raw) if !raw.trim().is_empty() => match calendar_date(raw) {
                Ok(date) => format_date_input(date),
                Err(err) => {
                    warn!(
                        "event=edit_seed module=edit status=degraded project_id={} error={}",
                        project.id, err
                    );
                    String::new()
                }
            },
            _ => String::new(),
        };

        Self {
            name: project.name.clone(),
            progress: project.progress_percent(),
            budget: project
                .budget
                .as_ref()
                .map(|budget| budget.as_str().to_string())
                .unwrap_or_default(),
            budget_used: project
                .budget_used
                .as_ref()
                .map_or_else(|| "0".to_string(), |used| used.as_str().to_string()),
            deadline,
        }
    }

    /// Builds the update payload; `description` comes from the source project.
    ///
    /// Field values were validated on write, so parsing only fails on drafts
    /// mutated directly through the public fields.
    pub fn to_update(&self, description: Option<String>) -> Result<ProjectUpdate, EditSessionError> {
        let deadline = parse_date_input(&self.deadline)
            .map_err(|_| invalid(EditField::Deadline, &self.deadline))?
            .map(format_date_input);

        Ok(ProjectUpdate {
            name: self.name.clone(),
            progress: self.progress.min(100),
            description,
            deadline,
            budget: parse_decimal_field(EditField::Budget, &self.budget)?,
            budget_used: parse_decimal_field(EditField::BudgetUsed, &self.budget_used)?
                .unwrap_or(0.0),
        })
    }
}

/// Errors raised by edit session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditSessionError {
    NoActiveSession,
    CommitInFlight(ProjectId),
    InvalidProject(ProjectValidationError),
    UnknownField(String),
    InvalidFieldValue { field: EditField, value: String },
}

impl Display for EditSessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoActiveSession => write!(f, "no edit session is active"),
            Self::CommitInFlight(id) => {
                write!(f, "a commit for project {id} is already in flight")
            }
            Self::InvalidProject(err) => write!(f, "cannot edit project: {err}"),
            Self::UnknownField(name) => write!(f, "unknown edit field `{name}`"),
            Self::InvalidFieldValue { field, value } => {
                write!(f, "invalid value `{value}` for field {}", field.as_str())
            }
        }
    }
}

impl Error for EditSessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidProject(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProjectValidationError> for EditSessionError {
    fn from(value: ProjectValidationError) -> Self {
        Self::InvalidProject(value)
    }
}

/// Commit handed to the transport; pass it back to `finish_commit`.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommit {
    pub target_id: ProjectId,
    pub payload: ProjectUpdate,
    session_seq: u64,
}

/// Result of reconciling a commit with the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Server accepted the update; the caller should refresh its list.
    Committed { target_id: ProjectId },
    /// Server refused the update; the draft (if still open) is preserved.
    Failed {
        target_id: ProjectId,
        error: GatewayError,
    },
}

impl CommitOutcome {
    pub fn target_id(&self) -> ProjectId {
        match self {
            Self::Committed { target_id } | Self::Failed { target_id, .. } => *target_id,
        }
    }

    pub fn requires_refresh(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

#[derive(Debug, Clone)]
struct ActiveEdit {
    seq: u64,
    target_id: ProjectId,
    description: Option<String>,
    original_deadline: Option<String>,
    draft: EditDraft,
    in_flight: bool,
}

/// Single-slot edit session owned by the edit dialog.
#[derive(Debug, Default)]
pub struct EditSession {
    active: Option<ActiveEdit>,
    next_seq: u64,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for `project`, replacing any open draft.
    ///
    /// # Errors
    /// - `InvalidProject` when the project fails validation; an open session
    ///   is left as it was.
    pub fn begin(&mut self, project: &Project) -> Result<&EditDraft, EditSessionError> {
        project.validate()?;

        if let Some(previous) = self.active.as_ref() {
            debug!(
                "event=edit_replace module=edit status=ok previous_id={} project_id={}",
                previous.target_id, project.id
            );
        }

        self.next_seq += 1;
        let active = self.active.insert(ActiveEdit {
            seq: self.next_seq,
            target_id: project.id,
            description: project.description.clone(),
            original_deadline: project.deadline.clone(),
            draft: EditDraft::from_project(project),
            in_flight: false,
        });
        info!(
            "event=edit_begin module=edit status=ok project_id={}",
            active.target_id
        );
        Ok(&active.draft)
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn target_id(&self) -> Option<ProjectId> {
        self.active.as_ref().map(|active| active.target_id)
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        self.active.as_ref().map(|active| &active.draft)
    }

    /// Original deadline of the edited project, as shown next to the input.
    pub fn original_deadline(&self) -> Option<&str> {
        self.active
            .as_ref()
            .and_then(|active| active.original_deadline.as_deref())
    }

    pub fn is_commit_in_flight(&self) -> bool {
        self.active.as_ref().is_some_and(|active| active.in_flight)
    }

    /// Writes one field of the draft.
    ///
    /// Numeric fields accept "" as unset. Progress is clamped to `0..=100`.
    pub fn update_field(&mut self, field: EditField, value: &str) -> Result<(), EditSessionError> {
        let active = self
            .active
            .as_mut()
            .ok_or(EditSessionError::NoActiveSession)?;
        let draft = &mut active.draft;

        match field {
            EditField::Name => draft.name = value.to_string(),
            EditField::Progress => draft.progress = parse_progress(value)?,
            EditField::Budget | EditField::BudgetUsed => {
                parse_decimal_field(field, value)?;
                let trimmed = value.trim().to_string();
                if field == EditField::Budget {
                    draft.budget = trimmed;
                } else {
                    draft.budget_used = trimmed;
                }
            }
            EditField::Deadline => {
                parse_date_input(value).map_err(|_| invalid(field, value))?;
                draft.deadline = value.trim().to_string();
            }
        }
        Ok(())
    }

    /// Same as `update_field` with a textual field id.
    pub fn update_field_named(&mut self, field: &str, value: &str) -> Result<(), EditSessionError> {
        let parsed =
            EditField::parse(field).ok_or_else(|| EditSessionError::UnknownField(field.to_string()))?;
        self.update_field(parsed, value)
    }

    /// Marks the session as committing and returns the payload to send.
    ///
    /// # Errors
    /// - `NoActiveSession` when nothing is being edited.
    /// - `CommitInFlight` while a previous commit has not been finished.
    pub fn prepare_commit(&mut self) -> Result<PendingCommit, EditSessionError> {
        let active = self
            .active
            .as_mut()
            .ok_or(EditSessionError::NoActiveSession)?;
        if active.in_flight {
            return Err(EditSessionError::CommitInFlight(active.target_id));
        }

        let payload = active.draft.to_update(active.description.clone())?;
        active.in_flight = true;
        debug!(
            "event=edit_commit module=edit status=start project_id={}",
            active.target_id
        );
        Ok(PendingCommit {
            target_id: active.target_id,
            payload,
            session_seq: active.seq,
        })
    }

    /// Reconciles a finished commit with the session.
    ///
    /// Success clears the session it was prepared from; failure keeps the
    /// draft for retry. A session replaced or cancelled meanwhile is left
    /// alone either way.
    pub fn finish_commit(
        &mut self,
        pending: &PendingCommit,
        result: Result<(), GatewayError>,
    ) -> CommitOutcome {
        let is_current = self
            .active
            .as_ref()
            .is_some_and(|active| active.seq == pending.session_seq);

        match result {
            Ok(()) => {
                if is_current {
                    self.active = None;
                }
                info!(
                    "event=edit_commit module=edit status=ok project_id={} session_current={}",
                    pending.target_id, is_current
                );
                CommitOutcome::Committed {
                    target_id: pending.target_id,
                }
            }
            Err(error) => {
                if is_current {
                    if let Some(active) = self.active.as_mut() {
                        active.in_flight = false;
                    }
                }
                warn!(
                    "event=edit_commit module=edit status=error project_id={} error_code={} session_current={}",
                    pending.target_id,
                    error.code(),
                    is_current
                );
                CommitOutcome::Failed {
                    target_id: pending.target_id,
                    error,
                }
            }
        }
    }

    /// Prepares, sends through `gateway`, and finishes in one call.
    pub fn commit(
        &mut self,
        gateway: &impl ProjectGateway,
    ) -> Result<CommitOutcome, EditSessionError> {
        let pending = self.prepare_commit()?;
        let result = gateway.update_project(pending.target_id, &pending.payload);
        Ok(self.finish_commit(&pending, result))
    }

    /// Discards the session without any network call.
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            info!(
                "event=edit_cancel module=edit status=ok project_id={} in_flight={}",
                active.target_id, active.in_flight
            );
        }
    }
}

fn invalid(field: EditField, value: &str) -> EditSessionError {
    EditSessionError::InvalidFieldValue {
        field,
        value: value.to_string(),
    }
}

fn parse_progress(value: &str) -> Result<u8, EditSessionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let parsed = trimmed
        .parse::<i64>()
        .map_err(|_| invalid(EditField::Progress, value))?;
    Ok(parsed.clamp(0, 100) as u8)
}

fn parse_decimal_field(field: EditField, value: &str) -> Result<Option<f64>, EditSessionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(Some(parsed)),
        _ => Err(invalid(field, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::{EditDraft, EditField, EditSession, EditSessionError};
    use crate::model::project::Project;

    #[test]
    fn draft_defaults_for_missing_optional_fields() {
        let draft = EditDraft::from_project(&Project::new(7, "Water wells"));
        assert_eq!(draft.progress, 0);
        assert_eq!(draft.budget, "");
        assert_eq!(draft.budget_used, "0");
        assert_eq!(draft.deadline, "");
    }

    #[test]
    fn unparseable_deadline_seeds_empty_field() {
        let mut project = Project::new(7, "Water wells");
        project.deadline = Some("soon".to_string());
        assert_eq!(EditDraft::from_project(&project).deadline, "");
    }

    #[test]
    fn update_field_rejects_non_numeric_budget() {
        let mut session = EditSession::new();
        session.begin(&Project::new(1, "p")).unwrap();
        let err = session.update_field(EditField::Budget, "lots").unwrap_err();
        assert_eq!(
            err,
            EditSessionError::InvalidFieldValue {
                field: EditField::Budget,
                value: "lots".to_string(),
            }
        );
        assert_eq!(session.draft().unwrap().budget, "");
    }

    #[test]
    fn progress_is_clamped_and_blank_means_zero() {
        let mut session = EditSession::new();
        session.begin(&Project::new(1, "p")).unwrap();
        session.update_field(EditField::Progress, "250").unwrap();
        assert_eq!(session.draft().unwrap().progress, 100);
        session.update_field(EditField::Progress, "").unwrap();
        assert_eq!(session.draft().unwrap().progress, 0);
    }

    #[test]
    fn field_names_accept_camel_case() {
        assert_eq!(EditField::parse("budgetUsed"), Some(EditField::BudgetUsed));
        assert_eq!(EditField::parse("description"), None);
    }
}
