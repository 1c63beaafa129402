//! Up command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common::build_migrator;
use strata_migrate::{MigrateError, MigrateOutcome};

/// Execute the up command
pub async fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let migrator = build_migrator(global).await?;

    match migrator.migrate_up().await {
        Ok(MigrateOutcome::Applied(n)) => {
            println!(
                "Applied {} migration{}",
                n,
                if n == 1 { "" } else { "s" }
            );
            Ok(())
        }
        Ok(MigrateOutcome::NoOp) => {
            println!("Database is up to date");
            Ok(())
        }
        Ok(other) => {
            // migrate_up never reports a rollback
            unreachable!("unexpected outcome {:?}", other)
        }
        Err(MigrateError::NoMigrations) if args.allow_empty => {
            println!("No migrations found in {}", global.migrations_dir);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
