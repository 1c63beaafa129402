use super::*;
use crate::catalog::Direction;
use std::fs;
use std::path::Path;
use strata_db::DuckDbBackend;
use tempfile::TempDir;

fn memory_db() -> Arc<dyn Database> {
    Arc::new(DuckDbBackend::in_memory().unwrap())
}

fn write_migration(dir: &Path, version: i64, name: &str, direction: Direction, body: &str) {
    let file_name = format!("{}_{}.{}.sql", version, name, direction);
    fs::write(dir.join(file_name), body).unwrap();
}

async fn migrator(db: &Arc<dyn Database>, dir: &TempDir) -> Migrator {
    Migrator::new(db.clone(), dir.path()).await.unwrap()
}

async fn ledger_versions(db: &Arc<dyn Database>) -> Vec<i64> {
    db.query_records("SELECT version, name FROM __migrations ORDER BY version")
        .await
        .unwrap()
        .into_iter()
        .map(|(version, _)| version)
        .collect()
}

#[tokio::test]
async fn test_new_creates_ledger_table() {
    let db = memory_db();
    let dir = tempfile::tempdir().unwrap();
    migrator(&db, &dir).await;

    assert!(db.relation_exists("__migrations").await.unwrap());
    assert!(ledger_versions(&db).await.is_empty());
}

#[tokio::test]
async fn test_round_trip_up_then_down() {
    let db = memory_db();
    let dir = tempfile::tempdir().unwrap();
    write_migration(
        dir.path(),
        2023100100,
        "test",
        Direction::Up,
        "CREATE TABLE test_table_1 (id BIGINT);",
    );
    write_migration(
        dir.path(),
        2023100100,
        "test",
        Direction::Down,
        "DROP TABLE test_table_1;",
    );
    write_migration(
        dir.path(),
        2023100101,
        "test2",
        Direction::Up,
        "CREATE TABLE test_table_2 (id BIGINT);",
    );
    write_migration(
        dir.path(),
        2023100101,
        "test2",
        Direction::Down,
        "DROP TABLE test_table_2;",
    );

    let mg = migrator(&db, &dir).await;
    assert_eq!(mg.migrate_up().await.unwrap(), MigrateOutcome::Applied(2));
    assert!(db.relation_exists("test_table_1").await.unwrap());
    assert!(db.relation_exists("test_table_2").await.unwrap());
    assert_eq!(ledger_versions(&db).await, vec![2023100100, 2023100101]);

    assert_eq!(
        mg.migrate_down(2023100100).await.unwrap(),
        MigrateOutcome::RolledBack(1)
    );
    assert!(db.relation_exists("test_table_1").await.unwrap());
    assert!(!db.relation_exists("test_table_2").await.unwrap());
    assert_eq!(ledger_versions(&db).await, vec![2023100100]);
}

#[tokio::test]
async fn test_second_up_is_noop() {
    let db = memory_db();
    let dir = tempfile::tempdir().unwrap();
    write_migration(
        dir.path(),
        2023100100,
        "test",
        Direction::Up,
        "CREATE TABLE idem (id BIGINT);",
    );

    let mg = migrator(&db, &dir).await;
    assert_eq!(mg.migrate_up().await.unwrap(), MigrateOutcome::Applied(1));
    assert_eq!(mg.migrate_up().await.unwrap(), MigrateOutcome::NoOp);
    assert_eq!(ledger_versions(&db).await, vec![2023100100]);
}

#[tokio::test]
async fn test_up_applies_in_ascending_version_order() {
    let db = memory_db();
    let dir = tempfile::tempdir().unwrap();
    // Written newest-first; the second migration only works if the first
    // ran before it.
    write_migration(
        dir.path(),
        2023100101,
        "seed",
        Direction::Up,
        "INSERT INTO ordered (id) VALUES (1);",
    );
    write_migration(
        dir.path(),
        2023100100,
        "create",
        Direction::Up,
        "CREATE TABLE ordered (id BIGINT);",
    );

    let mg = migrator(&db, &dir).await;
    assert_eq!(mg.migrate_up().await.unwrap(), MigrateOutcome::Applied(2));
    assert_eq!(ledger_versions(&db).await, vec![2023100100, 2023100101]);
}

#[tokio::test]
async fn test_failed_batch_leaves_no_trace() {
    let db = memory_db();
    let dir = tempfile::tempdir().unwrap();
    write_migration(
        dir.path(),
        2023100100,
        "first",
        Direction::Up,
        "CREATE TABLE atomic_1 (id BIGINT);",
    );
    write_migration(
        dir.path(),
        2023100101,
        "broken",
        Direction::Up,
        "THIS IS NOT SQL;",
    );
    write_migration(
        dir.path(),
        2023100102,
        "third",
        Direction::Up,
        "CREATE TABLE atomic_3 (id BIGINT);",
    );

    let mg = migrator(&db, &dir).await;
    assert!(mg.migrate_up().await.is_err());

    // Full rollback: neither ledger rows nor the first migration's schema
    // effects survive.
    assert!(ledger_versions(&db).await.is_empty());
    assert!(!db.relation_exists("atomic_1").await.unwrap());
    assert!(!db.relation_exists("atomic_3").await.unwrap());
}

#[tokio::test]
async fn test_divergent_ledger_row_does_not_block() {
    let db = memory_db();
    let dir = tempfile::tempdir().unwrap();
    write_migration(
        dir.path(),
        2023100101,
        "present",
        Direction::Up,
        "CREATE TABLE present (id BIGINT);",
    );

    let mg = migrator(&db, &dir).await;
    // A row applied historically whose file no longer exists on disk.
    db.execute("INSERT INTO __migrations (version, name) VALUES (2023100100, 'ghost')")
        .await
        .unwrap();

    assert_eq!(mg.migrate_up().await.unwrap(), MigrateOutcome::Applied(1));
    assert_eq!(ledger_versions(&db).await, vec![2023100100, 2023100101]);
}

#[tokio::test]
async fn test_missing_down_file_names_version_and_deletes_nothing() {
    let db = memory_db();
    let dir = tempfile::tempdir().unwrap();
    write_migration(
        dir.path(),
        2023100101,
        "oneway",
        Direction::Up,
        "CREATE TABLE oneway (id BIGINT);",
    );

    let mg = migrator(&db, &dir).await;
    mg.migrate_up().await.unwrap();

    let err = mg.migrate_down(2023100100).await.unwrap_err();
    assert!(err.to_string().contains("2023100101"));
    assert!(matches!(err, MigrateError::MissingDownFile(_)));
    assert_eq!(ledger_versions(&db).await, vec![2023100101]);
    assert!(db.relation_exists("oneway").await.unwrap());
}

#[tokio::test]
async fn test_empty_directory_is_no_migrations_sentinel() {
    let db = memory_db();
    let dir = tempfile::tempdir().unwrap();

    let mg = migrator(&db, &dir).await;
    let err = mg.migrate_up().await.unwrap_err();
    assert!(matches!(err, MigrateError::NoMigrations));
    assert!(ledger_versions(&db).await.is_empty());
}

#[tokio::test]
async fn test_only_malformed_names_is_no_migrations_sentinel() {
    let db = memory_db();
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("README.md"), "not a migration").unwrap();
    fs::write(dir.path().join("001_too_short.up.sql"), "SELECT 1;").unwrap();

    let mg = migrator(&db, &dir).await;
    let err = mg.migrate_up().await.unwrap_err();
    assert!(matches!(err, MigrateError::NoMigrations));
}

#[tokio::test]
async fn test_down_with_nothing_above_target_is_noop() {
    let db = memory_db();
    let dir = tempfile::tempdir().unwrap();
    write_migration(
        dir.path(),
        2023100100,
        "test",
        Direction::Up,
        "CREATE TABLE stays (id BIGINT);",
    );

    let mg = migrator(&db, &dir).await;
    mg.migrate_up().await.unwrap();

    assert_eq!(
        mg.migrate_down(2023100100).await.unwrap(),
        MigrateOutcome::NoOp
    );
    assert!(db.relation_exists("stays").await.unwrap());
}

#[tokio::test]
async fn test_failed_rollback_batch_restores_everything() {
    let db = memory_db();
    let dir = tempfile::tempdir().unwrap();
    write_migration(
        dir.path(),
        2023100100,
        "a",
        Direction::Up,
        "CREATE TABLE rb_a (id BIGINT);",
    );
    write_migration(
        dir.path(),
        2023100100,
        "a",
        Direction::Down,
        "THIS IS NOT SQL;",
    );
    write_migration(
        dir.path(),
        2023100101,
        "b",
        Direction::Up,
        "CREATE TABLE rb_b (id BIGINT);",
    );
    write_migration(
        dir.path(),
        2023100101,
        "b",
        Direction::Down,
        "DROP TABLE rb_b;",
    );

    let mg = migrator(&db, &dir).await;
    mg.migrate_up().await.unwrap();

    // b rolls back fine, then a's broken down file aborts the batch; the
    // transaction restores b's table and both ledger rows.
    assert!(mg.migrate_down(0).await.is_err());
    assert_eq!(ledger_versions(&db).await, vec![2023100100, 2023100101]);
    assert!(db.relation_exists("rb_b").await.unwrap());
}

#[tokio::test]
async fn test_ledger_delete_of_absent_row_is_inconsistent() {
    let db = memory_db();
    let dir = tempfile::tempdir().unwrap();
    migrator(&db, &dir).await;

    let err = ledger::delete(db.as_ref(), 42).await.unwrap_err();
    assert!(matches!(err, MigrateError::InconsistentLedger(_)));
}

#[tokio::test]
async fn test_status_reports_all_three_sets() {
    let db = memory_db();
    let dir = tempfile::tempdir().unwrap();
    write_migration(
        dir.path(),
        2023100100,
        "done",
        Direction::Up,
        "CREATE TABLE done (id BIGINT);",
    );
    write_migration(
        dir.path(),
        2023100101,
        "todo",
        Direction::Up,
        "CREATE TABLE todo (id BIGINT);",
    );

    let mg = migrator(&db, &dir).await;
    db.execute("INSERT INTO __migrations (version, name) VALUES (2023100100, 'done')")
        .await
        .unwrap();
    db.execute("INSERT INTO __migrations (version, name) VALUES (2023090000, 'ghost')")
        .await
        .unwrap();

    let status = mg.status().await.unwrap();
    let applied: Vec<i64> = status.applied.iter().map(|r| r.version).collect();
    assert_eq!(applied, vec![2023090000, 2023100100]);
    assert_eq!(status.pending, vec![MigrationRecord::new(2023100101, "todo")]);
    assert_eq!(status.missing, vec![MigrationRecord::new(2023090000, "ghost")]);
}
