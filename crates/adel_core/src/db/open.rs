//! Connection bootstrap for the dashboard store.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (creating if needed) the database file and migrates it.
///
/// Missing parent directories are created, since the default path may
/// point into a fresh app-data folder.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    let result = ensure_parent_dir(path).and_then(|()| {
        let conn = Connection::open(path).map_err(|source| DbError::Open {
            path: Some(path.to_path_buf()),
            source,
        })?;
        bootstrap(conn)
    });
    log_open("file", started_at, &result);
    result
}

/// Opens a private in-memory database; nothing outlives the connection.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = Connection::open_in_memory()
        .map_err(|source| DbError::Open { path: None, source })
        .and_then(bootstrap);
    log_open("memory", started_at, &result);
    result
}

fn ensure_parent_dir(path: &Path) -> DbResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(|source| DbError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn bootstrap(mut conn: Connection) -> DbResult<Connection> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    let report = apply_migrations(&mut conn)?;
    if report.applied() {
        info!(
            "event=db_schema module=db status=upgraded from_version={} to_version={}",
            report.from_version, report.to_version
        );
    }
    Ok(conn)
}

fn log_open(mode: &str, started_at: Instant, result: &DbResult<Connection>) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!("event=db_open module=db status=ok mode={mode} duration_ms={duration_ms}"),
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={} error_code={} error={}",
            mode,
            duration_ms,
            err.code(),
            err
        ),
    }
}
