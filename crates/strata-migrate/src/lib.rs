//! strata-migrate - Versioned SQL schema migration engine
//!
//! Discovers migration files named `<10-digit-version>_<name>.<up|down>.sql`
//! in a flat directory, reconciles them against the `__migrations` ledger
//! table, and applies (or rolls back) the difference inside a single
//! transaction per invocation.
//!
//! The engine is not safe against concurrent invocations targeting the same
//! ledger: no advisory locking is performed, so two simultaneous `up` runs
//! can race between reconciliation and commit. The ledger's primary key is
//! the last-resort guard; a duplicate insert fails the whole batch instead
//! of silently double-applying.

pub mod catalog;
pub mod error;
pub(crate) mod executor;
pub(crate) mod ledger;
pub mod migrator;
pub mod reconcile;

pub use catalog::{Direction, MigrationFile, MigrationRecord};
pub use error::{MigrateError, MigrateResult};
pub use migrator::{MigrateOutcome, MigrationStatus, Migrator};
