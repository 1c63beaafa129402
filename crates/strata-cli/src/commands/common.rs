//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::sync::Arc;
use strata_db::{Database, DuckDbBackend};
use strata_migrate::Migrator;

use crate::cli::GlobalArgs;

/// Open the database from the global arguments and build a migrator over
/// it. Creating the migrator also ensures the ledger table exists.
pub(crate) async fn build_migrator(global: &GlobalArgs) -> Result<Migrator> {
    let backend = DuckDbBackend::new(&global.database)
        .with_context(|| format!("unable to open database {}", global.database))?;
    let db: Arc<dyn Database> = Arc::new(backend);

    log::debug!(
        "connected to {} database at {}, migrations from {}",
        db.db_type(),
        global.database,
        global.migrations_dir
    );

    Migrator::new(db, &global.migrations_dir)
        .await
        .context("unable to create migrator")
}
