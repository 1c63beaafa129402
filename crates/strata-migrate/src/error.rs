//! Error types for the migration engine.

use crate::catalog::MigrationRecord;
use std::path::PathBuf;
use strata_db::DbError;
use thiserror::Error;

/// Migration engine errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// The migrations directory holds no usable migration files (M001).
    ///
    /// A sentinel, not a failure: callers that tolerate an empty catalog
    /// match on this variant and carry on.
    #[error("[M001] no migrations found")]
    NoMigrations,

    /// A grammar-matching filename carried an unparsable version (M002).
    ///
    /// The grammar only admits ten digits, so this signals corruption
    /// rather than user error and aborts the whole operation.
    #[error("[M002] failed extracting version for {file}: {source}")]
    BadVersion {
        file: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// The migrations directory or a migration file could not be read (M003).
    #[error("[M003] failed reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An applied migration has no corresponding down file on disk (M004).
    #[error("[M004] could not find down file for version {0}")]
    MissingDownFile(MigrationRecord),

    /// The ledger disagrees with the reconciled snapshot mid-batch (M005).
    #[error("[M005] migration ledger is inconsistent: {0}")]
    InconsistentLedger(String),

    /// Underlying database failure (M006).
    #[error("[M006] database error")]
    Db(#[from] DbError),

    /// The batch failed and rolling back the transaction also failed (M007).
    ///
    /// The rollback failure takes precedence in the message because it
    /// represents the worse, unresolved state; the original cause is kept
    /// as the error source.
    #[error("[M007] failed to rollback migration transaction: {rollback}")]
    RollbackFailed {
        rollback: DbError,
        #[source]
        source: Box<MigrateError>,
    },
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
