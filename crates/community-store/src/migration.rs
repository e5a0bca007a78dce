//! Schema migrations for the SQLite document store.
//!
//! Migrations are numbered SQL batches applied in order inside one
//! transaction. Applied versions are recorded in `schema_migrations`.

use rusqlite::{params, Connection};

use community_core::now_millis;

use crate::error::{Result, StoreError};

/// `(version, sql)` pairs, ascending and without gaps.
const MIGRATIONS: &[(u32, &str)] = &[(
    1,
    r#"
    -- One row per document; body is the JSON object, id field included
    CREATE TABLE documents (
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        body TEXT NOT NULL,
        updated_at INTEGER NOT NULL,    -- local write time (Unix ms)
        PRIMARY KEY (collection, id)
    );
    "#,
)];

/// Schema version this build writes.
pub const CURRENT_VERSION: u32 = MIGRATIONS[MIGRATIONS.len() - 1].0;

/// Bring the schema up to [`CURRENT_VERSION`].
///
/// Safe to call on every open. A database written by a newer build is
/// refused rather than modified.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        );",
    )?;

    let applied = schema_version(conn)?;
    if applied > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "schema version {} is newer than {} supported by this build",
            applied, CURRENT_VERSION
        )));
    }

    let pending: Vec<_> = MIGRATIONS
        .iter()
        .filter(|(version, _)| *version > applied)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)
            .map_err(|e| StoreError::Migration(format!("v{}: {}", version, e)))?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            params![version, now_millis()],
        )?;
    }
    tx.commit()?;

    Ok(())
}

/// Highest applied version, 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    Ok(conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?)
}
