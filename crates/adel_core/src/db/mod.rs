//! Local SQLite storage for dashboard state that must survive restarts.
//!
//! Only the unread-badge keys live here today; project data always comes
//! from the remote API.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - No store reads or writes happen before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use migrations::{schema_version, MigrationReport};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// The database file (or its directory) could not be opened or created.
    Open {
        path: Option<PathBuf>,
        source: rusqlite::Error,
    },
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
    /// Written by a newer build; refusing to touch it.
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },
    Sqlite(rusqlite::Error),
}

impl DbError {
    /// Stable code for `error_code=` log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "db_open_failed",
            Self::CreateDir { .. } => "db_dir_failed",
            Self::Migration { .. } => "db_migration_failed",
            Self::UnsupportedSchemaVersion { .. } => "db_schema_too_new",
            Self::Sqlite(_) => "db_sqlite_error",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open {
                path: Some(path),
                source,
            } => write!(f, "cannot open database {}: {source}", path.display()),
            Self::Open { path: None, source } => {
                write!(f, "cannot open in-memory database: {source}")
            }
            Self::CreateDir { path, source } => {
                write!(f, "cannot create database directory {}: {source}", path.display())
            }
            Self::Migration {
                version,
                name,
                source,
            } => write!(f, "migration {version} ({name}) failed: {source}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::CreateDir { source, .. } => Some(source),
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
