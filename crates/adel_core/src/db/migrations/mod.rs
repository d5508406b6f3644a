//! Schema migrations for the dashboard store.
//!
//! Versions must stay monotonic; each applied step bumps `user_version`
//! inside the same transaction.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "kv_store",
    sql: include_str!("0001_kv_store.sql"),
}];

/// Version range covered by one `apply_migrations` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
}

impl MigrationReport {
    pub fn applied(&self) -> bool {
        self.to_version > self.from_version
    }
}

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

/// Brings the schema up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `Migration` naming the step that failed; earlier steps are rolled back.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<MigrationReport> {
    let from_version = schema_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|migration| migration.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(MigrationReport {
            from_version,
            to_version: from_version,
        });
    }

    let tx = conn.transaction()?;
    for migration in pending {
        let step = format!(
            "{}\nPRAGMA user_version = {};",
            migration.sql, migration.version
        );
        tx.execute_batch(&step).map_err(|source| DbError::Migration {
            version: migration.version,
            name: migration.name,
            source,
        })?;
        info!(
            "event=db_migrate module=db status=applied version={} name={}",
            migration.version, migration.name
        );
    }
    tx.commit()?;

    Ok(MigrationReport {
        from_version,
        to_version: latest,
    })
}
