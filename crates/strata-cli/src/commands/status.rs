//! Status command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::build_migrator;
use strata_migrate::MigrationRecord;

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let migrator = build_migrator(global).await?;
    let status = migrator.status().await?;

    match args.output {
        StatusOutput::Json => {
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        StatusOutput::Text => {
            print_section("Applied", &status.applied);
            print_section("Pending", &status.pending);
            if !status.missing.is_empty() {
                print_section("Missing on disk", &status.missing);
            }
        }
    }
    Ok(())
}

fn print_section(label: &str, records: &[MigrationRecord]) {
    println!("{} ({}):", label, records.len());
    if records.is_empty() {
        println!("  (none)");
    }
    for record in records {
        println!("  {}", record);
    }
}
