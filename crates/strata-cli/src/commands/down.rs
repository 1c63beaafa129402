//! Down command implementation

use anyhow::Result;

use crate::cli::{DownArgs, GlobalArgs};
use crate::commands::common::build_migrator;
use strata_migrate::MigrateOutcome;

/// Execute the down command
pub async fn execute(args: &DownArgs, global: &GlobalArgs) -> Result<()> {
    let migrator = build_migrator(global).await?;

    match migrator.migrate_down(args.target).await? {
        MigrateOutcome::RolledBack(n) => {
            println!(
                "Rolled back {} migration{} to version {}",
                n,
                if n == 1 { "" } else { "s" },
                args.target
            );
        }
        MigrateOutcome::NoOp => {
            println!("Nothing applied above version {}", args.target);
        }
        other => unreachable!("unexpected outcome {:?}", other),
    }
    Ok(())
}
