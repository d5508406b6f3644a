//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the badge controller and the edit session to the Dart host.
//! - Leave networking to the host: commits are split into prepare/finish.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One process-wide dashboard state; calls are serialized by a mutex.
//! - A prepared commit stays reconcilable until the host finishes it, even
//!   if the dialog was reopened or cancelled meanwhile.

use adel_core::service::project_service::report_commit;
use adel_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    overdue_count as overdue_count_inner, ping as ping_inner, BadgeController, BadgeSnapshot,
    DashboardConfig, EditDraft, EditSession, GatewayError, KeyValueStore, MemoryKeyValueStore,
    PendingCommit, Project, ProjectId, SqliteKeyValueStore, StoreResult,
};
use log::warn;
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

static FFI_STATE: OnceLock<Mutex<FfiState>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Badge state returned after every badge call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeState {
    pub visible: bool,
    pub count: u32,
    pub last_seen_count: u32,
    pub dismissed: bool,
    /// Epoch milliseconds when the pending dwell elapses; the host should
    /// call `badge_tick` at or after this time.
    pub dwell_due_at_ms: Option<i64>,
}

/// Editable draft mirrored to the edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraftView {
    pub name: String,
    pub progress: u8,
    pub budget: String,
    pub budget_used: String,
    pub deadline: String,
}

/// Envelope for edit dialog calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResponse {
    pub ok: bool,
    pub project_id: Option<i64>,
    /// Current draft; `None` once the dialog is closed.
    pub draft: Option<EditDraftView>,
    /// Set when the server accepted an update and the list must be refetched.
    pub refresh: bool,
    /// Human-readable message for toast/diagnostics.
    pub message: String,
}

/// Payload the host must send as `PUT /api/projects/{project_id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPayloadResponse {
    pub ok: bool,
    pub project_id: Option<i64>,
    pub payload_json: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverdueResponse {
    pub ok: bool,
    pub count: u32,
    pub message: String,
}

#[flutter_rust_bridge::frb(sync)]
pub fn badge_count_updated(count: u32) -> BadgeState {
    lock_state().count_updated(count, now_epoch_ms())
}

/// Reports the focused dashboard tab (e.g. `messages`).
#[flutter_rust_bridge::frb(sync)]
pub fn badge_view_focused(view: String) -> BadgeState {
    lock_state().view_focused(&view, now_epoch_ms())
}

#[flutter_rust_bridge::frb(sync)]
pub fn badge_view_unfocused() -> BadgeState {
    lock_state().view_unfocused()
}

/// Fires the dwell when due. Safe to call at any time.
#[flutter_rust_bridge::frb(sync)]
pub fn badge_tick() -> BadgeState {
    lock_state().tick(now_epoch_ms())
}

#[flutter_rust_bridge::frb(sync)]
pub fn badge_snapshot() -> BadgeState {
    lock_state().badge_state()
}

/// Opens the edit dialog from a project JSON object (API shape).
#[flutter_rust_bridge::frb(sync)]
pub fn edit_begin(project_json: String) -> EditResponse {
    lock_state().begin_edit(&project_json)
}

#[flutter_rust_bridge::frb(sync)]
pub fn edit_update_field(field: String, value: String) -> EditResponse {
    lock_state().update_edit_field(&field, &value)
}

/// Returns the update payload and blocks further commits of the open dialog
/// until `edit_finish_commit` is called for its project.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_prepare_commit() -> CommitPayloadResponse {
    lock_state().prepare_commit()
}

/// Reports the host's network result for the commit prepared for
/// `project_id`.
///
/// On success the host should refetch projects (`refresh`); the dialog closes
/// if it still shows that commit. On failure the draft stays open for retry.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_finish_commit(project_id: i64, success: bool, error_message: String) -> EditResponse {
    lock_state().finish_commit(project_id, success, error_message)
}

/// Closes the edit dialog and drops the draft. Commits already sent can
/// still be finished.
#[flutter_rust_bridge::frb(sync)]
pub fn edit_cancel() -> EditResponse {
    lock_state().cancel_edit()
}

/// Counts overdue, still-actionable projects in a JSON project array.
#[flutter_rust_bridge::frb(sync)]
pub fn overdue_count(projects_json: String) -> OverdueResponse {
    match serde_json::from_str::<Vec<Project>>(&projects_json) {
        Ok(projects) => OverdueResponse {
            ok: true,
            count: u32::try_from(overdue_count_inner(&projects)).unwrap_or(u32::MAX),
            message: String::new(),
        },
        Err(err) => OverdueResponse {
            ok: false,
            count: 0,
            message: format!("overdue_count failed: {err}"),
        },
    }
}

fn lock_state() -> MutexGuard<'static, FfiState> {
    FFI_STATE
        .get_or_init(|| Mutex::new(FfiState::from_env()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
}

/// Dashboard state behind the exported functions.
struct FfiState {
    badge: BadgeController<FfiStore>,
    edit: EditSession,
    /// Commits handed to the host and not finished yet, oldest first.
    in_flight: Vec<PendingCommit>,
}

impl FfiState {
    fn from_env() -> Self {
        let config = DashboardConfig::from_env().unwrap_or_else(|err| {
            warn!("event=ffi_config module=ffi status=degraded error={err}");
            DashboardConfig::default()
        });
        let store = match SqliteKeyValueStore::open(&config.db_path) {
            Ok(store) => FfiStore::Sqlite(store),
            Err(err) => {
                warn!(
                    "event=ffi_store_open module=ffi status=degraded error_code={} error={}",
                    err.code(),
                    err
                );
                FfiStore::Memory(MemoryKeyValueStore::new())
            }
        };
        Self::with_store(store, config.dwell_ms)
    }

    fn with_store(store: FfiStore, dwell_ms: i64) -> Self {
        Self {
            badge: BadgeController::open(store, dwell_ms),
            edit: EditSession::new(),
            in_flight: Vec::new(),
        }
    }

    fn count_updated(&mut self, count: u32, now_ms: i64) -> BadgeState {
        self.badge.count_updated(count, now_ms);
        self.badge_state()
    }

    fn view_focused(&mut self, view: &str, now_ms: i64) -> BadgeState {
        self.badge.view_focused(view.trim(), now_ms);
        self.badge_state()
    }

    fn view_unfocused(&mut self) -> BadgeState {
        self.badge.view_unfocused();
        self.badge_state()
    }

    fn tick(&mut self, now_ms: i64) -> BadgeState {
        self.badge.advance(now_ms);
        self.badge_state()
    }

    fn badge_state(&self) -> BadgeState {
        to_badge_state(self.badge.snapshot())
    }

    fn begin_edit(&mut self, project_json: &str) -> EditResponse {
        let project = match serde_json::from_str::<Project>(project_json) {
            Ok(project) => project,
            Err(err) => return edit_failure(format!("edit_begin failed: {err}")),
        };
        if let Err(err) = self.edit.begin(&project) {
            return edit_failure(format!("edit_begin failed: {err}"));
        }
        self.edit_success("Editing project.")
    }

    fn update_edit_field(&mut self, field: &str, value: &str) -> EditResponse {
        match self.edit.update_field_named(field, value) {
            Ok(()) => self.edit_success("Field updated."),
            Err(err) => edit_failure(format!("edit_update_field failed: {err}")),
        }
    }

    fn prepare_commit(&mut self) -> CommitPayloadResponse {
        let pending = match self.edit.prepare_commit() {
            Ok(pending) => pending,
            Err(err) => {
                return CommitPayloadResponse {
                    ok: false,
                    project_id: None,
                    payload_json: None,
                    message: format!("edit_prepare_commit failed: {err}"),
                }
            }
        };

        match serde_json::to_string(&pending.payload) {
            Ok(payload_json) => {
                let project_id = pending.target_id;
                self.in_flight.push(pending);
                CommitPayloadResponse {
                    ok: true,
                    project_id: Some(project_id),
                    payload_json: Some(payload_json),
                    message: "Commit prepared.".to_string(),
                }
            }
            Err(err) => {
                // Releases the in-flight block so the dialog can retry.
                self.edit
                    .finish_commit(&pending, Err(GatewayError::Network(err.to_string())));
                CommitPayloadResponse {
                    ok: false,
                    project_id: Some(pending.target_id),
                    payload_json: None,
                    message: format!("edit_prepare_commit failed: {err}"),
                }
            }
        }
    }

    fn finish_commit(
        &mut self,
        project_id: ProjectId,
        success: bool,
        error_message: String,
    ) -> EditResponse {
        let Some(index) = self
            .in_flight
            .iter()
            .position(|pending| pending.target_id == project_id)
        else {
            return edit_failure(format!(
                "edit_finish_commit failed: no commit is in flight for project {project_id}"
            ));
        };
        let pending = self.in_flight.remove(index);

        let result = if success {
            Ok(())
        } else {
            Err(GatewayError::Network(error_message))
        };
        let outcome = self.edit.finish_commit(&pending, result);
        let report = report_commit(&outcome);

        EditResponse {
            ok: success,
            project_id: Some(outcome.target_id()),
            draft: self.edit.draft().map(to_draft_view),
            refresh: report.refresh,
            message: report.notice.description,
        }
    }

    fn cancel_edit(&mut self) -> EditResponse {
        self.edit.cancel();
        EditResponse {
            ok: true,
            project_id: None,
            draft: None,
            refresh: false,
            message: "Edit cancelled.".to_string(),
        }
    }

    fn edit_success(&self, message: &str) -> EditResponse {
        EditResponse {
            ok: true,
            project_id: self.edit.target_id(),
            draft: self.edit.draft().map(to_draft_view),
            refresh: false,
            message: message.to_string(),
        }
    }
}

/// Badge storage: SQLite when the database opens, process memory otherwise.
enum FfiStore {
    Sqlite(SqliteKeyValueStore),
    Memory(MemoryKeyValueStore),
}

impl KeyValueStore for FfiStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self {
            Self::Sqlite(store) => store.get(key),
            Self::Memory(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        match self {
            Self::Sqlite(store) => store.set(key, value),
            Self::Memory(store) => store.set(key, value),
        }
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> StoreResult<()> {
        match self {
            Self::Sqlite(store) => store.set_many(entries),
            Self::Memory(store) => store.set_many(entries),
        }
    }
}

fn to_badge_state(snapshot: BadgeSnapshot) -> BadgeState {
    BadgeState {
        visible: snapshot.visible,
        count: snapshot.count,
        last_seen_count: snapshot.last_seen_count,
        dismissed: snapshot.dismissed,
        dwell_due_at_ms: snapshot.dwell_due_at_ms,
    }
}

fn to_draft_view(draft: &EditDraft) -> EditDraftView {
    EditDraftView {
        name: draft.name.clone(),
        progress: draft.progress,
        budget: draft.budget.clone(),
        budget_used: draft.budget_used.clone(),
        deadline: draft.deadline.clone(),
    }
}

fn edit_failure(message: impl Into<String>) -> EditResponse {
    EditResponse {
        ok: false,
        project_id: None,
        draft: None,
        refresh: false,
        message: message.into(),
    }
}
