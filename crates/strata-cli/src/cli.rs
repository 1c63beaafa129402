//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Strata - versioned SQL schema migrations
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the database file (":memory:" for a throwaway database)
    #[arg(
        short = 'd',
        long,
        global = true,
        env = "STRATA_DATABASE",
        default_value = "strata.duckdb"
    )]
    pub database: String,

    /// Directory containing migration files
    #[arg(
        short = 'm',
        long,
        global = true,
        env = "STRATA_MIGRATIONS",
        default_value = "./migrations"
    )]
    pub migrations_dir: String,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply all unapplied migrations in ascending version order
    Up(UpArgs),

    /// Roll back everything applied above a target version
    Down(DownArgs),

    /// Show applied, pending, and missing-on-disk migrations
    Status(StatusArgs),
}

/// Arguments for the up command
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Treat an empty migrations directory as success instead of an error
    #[arg(long)]
    pub allow_empty: bool,
}

/// Arguments for the down command
#[derive(Args, Debug)]
pub struct DownArgs {
    /// Version to roll back to; every migration above it is undone
    #[arg(short, long)]
    pub target: i64,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Human-readable listing
    Text,
    /// JSON object with applied, pending, and missing sets
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_up() {
        let cli = Cli::try_parse_from(["strata", "up", "--allow-empty"]).unwrap();
        match cli.command {
            Commands::Up(args) => assert!(args.allow_empty),
            other => panic!("expected up, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_down_target() {
        let cli = Cli::try_parse_from(["strata", "down", "--target", "2023100100"]).unwrap();
        match cli.command {
            Commands::Down(args) => assert_eq!(args.target, 2023100100),
            other => panic!("expected down, got {:?}", other),
        }
    }

    #[test]
    fn test_down_requires_target() {
        assert!(Cli::try_parse_from(["strata", "down"]).is_err());
    }

    #[test]
    fn test_global_defaults() {
        let cli = Cli::try_parse_from(["strata", "status"]).unwrap();
        assert_eq!(cli.global.database, "strata.duckdb");
        assert_eq!(cli.global.migrations_dir, "./migrations");
        assert!(!cli.global.verbose);
    }
}
