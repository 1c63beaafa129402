//! Public migration facade.

use crate::catalog::{self, MigrationRecord};
use crate::error::{MigrateError, MigrateResult};
use crate::executor;
use crate::ledger;
use crate::reconcile;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use strata_db::Database;

/// What a migration run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateOutcome {
    /// Reconciliation found nothing to do; no transaction was opened.
    NoOp,
    /// This many migrations were applied and committed.
    Applied(usize),
    /// This many migrations were rolled back and committed.
    RolledBack(usize),
}

/// Applied / pending / missing sets for status reporting.
#[derive(Debug, Serialize)]
pub struct MigrationStatus {
    pub applied: Vec<MigrationRecord>,
    pub pending: Vec<MigrationRecord>,
    /// Applied historically but the source file is missing on disk.
    pub missing: Vec<MigrationRecord>,
}

/// Versioned SQL schema migrator.
///
/// Reconciles the on-disk catalog against the `__migrations` ledger and
/// applies or rolls back the difference, one transaction per invocation.
/// Logging goes through the `log` facade: an info line per executed
/// migration, warnings for malformed filenames and ledger divergence.
pub struct Migrator {
    db: Arc<dyn Database>,
    base_path: PathBuf,
}

impl Migrator {
    /// Create a migrator over `db`, reading migration files from
    /// `base_path`. Ensures the ledger table exists before anything else;
    /// fails with the underlying database error if creation fails.
    pub async fn new(db: Arc<dyn Database>, base_path: impl Into<PathBuf>) -> MigrateResult<Self> {
        let migrator = Self {
            db,
            base_path: base_path.into(),
        };
        ledger::ensure_table(migrator.db.as_ref()).await?;
        Ok(migrator)
    }

    /// Apply all unapplied migrations in ascending version order.
    ///
    /// An empty catalog returns [`MigrateError::NoMigrations`]; callers
    /// that tolerate it match on the variant. Ledger rows with no matching
    /// file are logged as a warning and never block.
    pub async fn migrate_up(&self) -> MigrateResult<MigrateOutcome> {
        let catalog = catalog::read_catalog(&self.base_path)?;
        if catalog.is_empty() {
            return Err(MigrateError::NoMigrations);
        }

        let applied = ledger::applied(self.db.as_ref()).await?;

        let missing = reconcile::divergent(&catalog, &applied);
        if !missing.is_empty() {
            let list: Vec<String> = missing.iter().map(|r| r.to_string()).collect();
            log::warn!(
                "found {} applied migration(s) that do not exist on disk: {}",
                missing.len(),
                list.join(", ")
            );
        }

        let pending = reconcile::unapplied(catalog, &applied);
        if pending.is_empty() {
            return Ok(MigrateOutcome::NoOp);
        }

        let applied_count = executor::apply_batch(self.db.as_ref(), &pending).await?;
        Ok(MigrateOutcome::Applied(applied_count))
    }

    /// Roll back everything applied above `target_version`, most recent
    /// first. Nothing above the target is a clean no-op.
    pub async fn migrate_down(&self, target_version: i64) -> MigrateResult<MigrateOutcome> {
        let applied = ledger::applied(self.db.as_ref()).await?;
        let batch = reconcile::rollback_set(applied, target_version);
        if batch.is_empty() {
            return Ok(MigrateOutcome::NoOp);
        }

        let rolled_back =
            executor::rollback_batch(self.db.as_ref(), &self.base_path, &batch).await?;
        Ok(MigrateOutcome::RolledBack(rolled_back))
    }

    /// Report applied, pending, and missing-on-disk migrations without
    /// changing anything. An empty catalog is fine here.
    pub async fn status(&self) -> MigrateResult<MigrationStatus> {
        let catalog = catalog::read_catalog(&self.base_path)?;
        let applied = ledger::applied(self.db.as_ref()).await?;

        let missing = reconcile::divergent(&catalog, &applied);
        let pending = reconcile::unapplied(catalog, &applied)
            .into_iter()
            .map(|m| m.record)
            .collect();

        Ok(MigrationStatus {
            applied,
            pending,
            missing,
        })
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
