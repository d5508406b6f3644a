//! Core state logic for the ADEL admin dashboard.
//! UI hosts (FFI, CLI) drive these controllers; this crate owns the invariants.

pub mod badge;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod edit;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use badge::controller::{
    BadgeController, BadgeEvent, BadgeSnapshot, PersistenceMode, UnreadState,
    BADGE_HIDDEN_KEY, DEFAULT_DWELL_MS, LAST_SEEN_COUNT_KEY, MESSAGES_VIEW,
};
pub use badge::dwell::DwellTicket;
pub use config::{ConfigError, DashboardConfig};
pub use dashboard::details::ProjectDetails;
pub use dashboard::host::{Dashboard, DashboardError};
pub use dashboard::tab::DashboardTab;
pub use edit::deadline::{calendar_date, DeadlineParseError};
pub use edit::session::{
    CommitOutcome, EditDraft, EditField, EditSession, EditSessionError, PendingCommit,
};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LogSettings,
    LoggingError,
};
pub use model::decimal::Decimal;
pub use model::project::{
    overdue_count, Project, ProjectId, ProjectStatus, ProjectUpdate, ProjectValidationError,
};
pub use repo::project_gateway::{GatewayError, GatewayResult, ProjectGateway};
pub use service::notice::{Notice, NoticeLevel};
pub use service::project_service::{
    ConfirmedDelete, DeleteRequest, MutationReport, ProjectService,
};
pub use store::kv_store::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
