//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Database abstraction trait for Strata
///
/// The migration engine consumes this seam and nothing else: statement
/// execution, row retrieval in the `(version, name)` shape used by the
/// migration ledger, and session-level transaction control.
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute SQL that modifies data, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple SQL statements as one batch
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Query rows of `(integer, text)`, the shape of the migration ledger
    async fn query_records(&self, sql: &str) -> DbResult<Vec<(i64, String)>>;

    /// Begin a transaction on the backend's session
    ///
    /// Statements issued through [`execute`](Database::execute) and
    /// [`execute_batch`](Database::execute_batch) after `begin` run inside
    /// the transaction until `commit` or `rollback`.
    async fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
