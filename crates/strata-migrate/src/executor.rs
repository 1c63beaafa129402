//! Transactional batch executor.
//!
//! One transaction spans the whole batch. Any failure rolls the transaction
//! back and surfaces the underlying error; if the rollback itself fails,
//! that failure wraps the original and takes precedence. A commit failure
//! is surfaced as-is and leaves the batch in an indeterminate state: the
//! caller must inspect the ledger before retrying.

use crate::catalog::{Direction, MigrationFile, MigrationRecord};
use crate::error::{MigrateError, MigrateResult};
use crate::ledger;
use std::fs;
use std::io;
use std::path::Path;
use strata_db::Database;

/// Apply `batch` in ascending order inside a single transaction.
///
/// Per entry: read the up file, execute its body verbatim as one statement
/// batch, record the version in the ledger. Returns the number of
/// migrations applied.
pub(crate) async fn apply_batch(
    db: &dyn Database,
    batch: &[MigrationFile],
) -> MigrateResult<usize> {
    db.begin().await?;

    for entry in batch {
        let body = match fs::read_to_string(&entry.path) {
            Ok(body) => body,
            Err(source) => {
                return Err(abort(
                    db,
                    MigrateError::Io {
                        path: entry.path.clone(),
                        source,
                    },
                )
                .await)
            }
        };

        log::info!("applying migration {}", entry.record);
        if let Err(e) = db.execute_batch(&body).await {
            return Err(abort(db, e.into()).await);
        }

        if let Err(e) = ledger::insert(db, &entry.record).await {
            return Err(abort(db, e).await);
        }
    }

    db.commit().await?;
    Ok(batch.len())
}

/// Roll back `batch` (already ordered most-recent-first) inside a single
/// transaction.
///
/// Per entry: resolve the down file, execute its body, delete the ledger
/// row. A missing down file aborts the batch with an error naming the
/// offending migration. Returns the number of migrations rolled back.
pub(crate) async fn rollback_batch(
    db: &dyn Database,
    base_path: &Path,
    batch: &[MigrationRecord],
) -> MigrateResult<usize> {
    db.begin().await?;

    for record in batch {
        let down_path = record.file_path(base_path, Direction::Down);
        let body = match fs::read_to_string(&down_path) {
            Ok(body) => body,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Err(abort(db, MigrateError::MissingDownFile(record.clone())).await)
            }
            Err(source) => {
                return Err(abort(
                    db,
                    MigrateError::Io {
                        path: down_path,
                        source,
                    },
                )
                .await)
            }
        };

        log::info!("rolling back migration {}", record);
        if let Err(e) = db.execute_batch(&body).await {
            return Err(abort(db, e.into()).await);
        }

        if let Err(e) = ledger::delete(db, record.version).await {
            return Err(abort(db, e).await);
        }
    }

    db.commit().await?;
    Ok(batch.len())
}

/// Roll back the open transaction, preserving `cause` unless the rollback
/// itself fails.
async fn abort(db: &dyn Database, cause: MigrateError) -> MigrateError {
    match db.rollback().await {
        Ok(()) => cause,
        Err(rollback) => MigrateError::RollbackFailed {
            rollback,
            source: Box::new(cause),
        },
    }
}
