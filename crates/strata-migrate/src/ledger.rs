//! Bookkeeping table access.
//!
//! The `__migrations` table is the single source of truth for what has been
//! applied. It is re-read on every invocation; nothing is cached in-process.

use crate::catalog::MigrationRecord;
use crate::error::{MigrateError, MigrateResult};
use strata_db::Database;

/// Create the ledger table if it does not exist yet.
pub(crate) async fn ensure_table(db: &dyn Database) -> MigrateResult<()> {
    db.execute_batch(
        "CREATE TABLE IF NOT EXISTS __migrations (
            version BIGINT PRIMARY KEY,
            name TEXT NOT NULL
        )",
    )
    .await?;
    Ok(())
}

/// One consistent snapshot of all applied migrations, ascending by version.
pub(crate) async fn applied(db: &dyn Database) -> MigrateResult<Vec<MigrationRecord>> {
    let rows = db
        .query_records("SELECT version, name FROM __migrations ORDER BY version")
        .await?;
    Ok(rows
        .into_iter()
        .map(|(version, name)| MigrationRecord { version, name })
        .collect())
}

/// Record a successfully applied migration. Runs inside the batch
/// transaction; the primary key rejects a concurrent double-apply.
pub(crate) async fn insert(db: &dyn Database, record: &MigrationRecord) -> MigrateResult<()> {
    let sql = format!(
        "INSERT INTO __migrations (version, name) VALUES ({}, '{}')",
        record.version,
        quote_literal(&record.name)
    );
    db.execute(&sql).await?;
    Ok(())
}

/// Remove a rolled-back migration's row. Runs inside the batch transaction.
///
/// Deleting zero rows means the table no longer matches the snapshot the
/// rollback set was computed from, so the batch must abort.
pub(crate) async fn delete(db: &dyn Database, version: i64) -> MigrateResult<()> {
    let affected = db
        .execute(&format!(
            "DELETE FROM __migrations WHERE version = {}",
            version
        ))
        .await?;
    if affected == 0 {
        return Err(MigrateError::InconsistentLedger(format!(
            "no row for version {} at rollback time",
            version
        )));
    }
    Ok(())
}

fn quote_literal(s: &str) -> String {
    s.replace('\'', "''")
}
