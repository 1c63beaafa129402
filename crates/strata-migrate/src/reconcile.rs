//! Applied-state reconciliation.
//!
//! Pure set computations over one catalog and one ledger snapshot. Both the
//! unapplied set and the divergence set are derived from the same snapshot,
//! so the comparison is atomic with respect to the ledger read.

use crate::catalog::{MigrationFile, MigrationRecord};
use std::cmp::Reverse;
use std::collections::HashSet;

/// Catalog entries whose version has no ledger row, ascending order
/// preserved.
pub fn unapplied(catalog: Vec<MigrationFile>, applied: &[MigrationRecord]) -> Vec<MigrationFile> {
    let applied_versions: HashSet<i64> = applied.iter().map(|r| r.version).collect();
    catalog
        .into_iter()
        .filter(|m| !applied_versions.contains(&m.record.version))
        .collect()
}

/// Ledger rows with no matching catalog entry: applied historically but the
/// source file is now missing on disk. Informational only; never blocks.
pub fn divergent(catalog: &[MigrationFile], applied: &[MigrationRecord]) -> Vec<MigrationRecord> {
    let on_disk: HashSet<i64> = catalog.iter().map(|m| m.record.version).collect();
    applied
        .iter()
        .filter(|r| !on_disk.contains(&r.version))
        .cloned()
        .collect()
}

/// Ledger rows above `target`, descending, so the most recent migration is
/// undone first. Empty means a clean no-op.
pub fn rollback_set(applied: Vec<MigrationRecord>, target: i64) -> Vec<MigrationRecord> {
    let mut set: Vec<MigrationRecord> = applied
        .into_iter()
        .filter(|r| r.version > target)
        .collect();
    set.sort_by_key(|r| Reverse(r.version));
    set
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
