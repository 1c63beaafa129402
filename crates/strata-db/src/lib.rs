//! strata-db - Database abstraction layer for Strata
//!
//! This crate provides the `Database` trait consumed by the migration
//! engine, plus the DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;
