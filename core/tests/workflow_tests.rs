use std::fs;
use std::path::{Path, PathBuf};

use msgstore_core::db::{open_store, open_store_existing};
use msgstore_core::error::CoreError;
use msgstore_core::orchestrator::{run_purge, PurgeOptions, PurgeOutcome};
use msgstore_core::seed::seed_platform;
use msgstore_core::stats::collect_platform_stats;
use tempfile::{tempdir, TempDir};

struct Fixture {
    _dir: TempDir,
    db_path: PathBuf,
    backup_dir: PathBuf,
    images_root: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempdir().expect("temp");
    let db_path = dir.path().join("database.db");
    let backup_dir = dir.path().join("backups");
    let images_root = dir.path().join("messageImages");
    Fixture {
        db_path,
        backup_dir,
        images_root,
        _dir: dir,
    }
}

fn options(fx: &Fixture, confirmed: bool, create_backup: bool) -> PurgeOptions {
    PurgeOptions {
        confirmed,
        create_backup,
        backup_dir: fx.backup_dir.clone(),
        images_root: fx.images_root.clone(),
    }
}

fn seed_store(fx: &Fixture) {
    let store = open_store(&fx.db_path).expect("open");
    seed_platform(&store.conn, "douyin", "acct_a", 3, 4).expect("seed douyin");
    seed_platform(&store.conn, "kuaishou", "acct_b", 1, 2).expect("seed kuaishou");
}

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, b"img").expect("write");
}

#[test]
fn full_workflow_purges_snapshots_and_verifies() {
    let fx = fixture();
    seed_store(&fx);
    let douyin_img = fx.images_root.join("douyin/acct_a/thread_1/20240731_004.jpg");
    let kuaishou_img = fx.images_root.join("kuaishou/acct_b/thread_9/20240731_001.jpg");
    touch(&douyin_img);
    touch(&kuaishou_img);

    let outcome = run_purge(&fx.db_path, "douyin", &options(&fx, true, true)).expect("run");
    let report = match outcome {
        PurgeOutcome::Purged(report) => report,
        other => panic!("expected purge, got {:?}", other),
    };

    assert_eq!(report.pre_stats.thread_count, 3);
    assert_eq!(report.pre_stats.message_count, 12);
    assert_eq!(report.summary.messages_deleted, 12);
    assert_eq!(report.summary.threads_deleted, 3);
    assert_eq!(report.summary.sync_status_deleted, 1);
    assert!(report.verified);
    assert_eq!(report.post_stats.thread_count, 0);
    assert_eq!(report.post_stats.message_count, 0);
    assert!(report.compaction_error.is_none());

    let snapshot = report.snapshot_path.expect("snapshot path");
    assert!(snapshot.exists());
    assert!(snapshot.starts_with(&fx.backup_dir));

    assert_eq!(report.artifacts.removed, 1);
    assert!(!douyin_img.exists());
    assert!(kuaishou_img.exists());

    // the other partition is intact
    let store = open_store_existing(&fx.db_path).expect("reopen");
    let kuaishou = collect_platform_stats(&store.conn, "kuaishou").expect("stats");
    assert_eq!(kuaishou.thread_count, 1);
    assert_eq!(kuaishou.message_count, 2);
}

#[test]
fn empty_platform_reports_nothing_to_do_without_snapshot() {
    let fx = fixture();
    seed_store(&fx);

    // backup requested, but the gate fires before any snapshot or transaction
    let outcome = run_purge(&fx.db_path, "tiktok", &options(&fx, true, true)).expect("run");
    match outcome {
        PurgeOutcome::NothingToDo { stats } => {
            assert_eq!(stats.thread_count, 0);
            assert_eq!(stats.message_count, 0);
        }
        other => panic!("expected nothing-to-do, got {:?}", other),
    }
    assert!(!fx.backup_dir.exists());
}

#[test]
fn unconfirmed_purge_never_touches_the_store() {
    let fx = fixture();
    seed_store(&fx);

    let err = run_purge(&fx.db_path, "douyin", &options(&fx, false, false)).unwrap_err();
    assert!(matches!(err, CoreError::NotConfirmed(_)));

    let store = open_store_existing(&fx.db_path).expect("reopen");
    let stats = collect_platform_stats(&store.conn, "douyin").expect("stats");
    assert_eq!(stats.thread_count, 3);
    assert_eq!(stats.message_count, 12);
}

#[test]
fn snapshot_failure_aborts_before_any_mutation() {
    let fx = fixture();
    seed_store(&fx);
    // a file where the backup directory should be makes the snapshot fail
    fs::write(&fx.backup_dir, b"in the way").expect("block backup dir");

    let err = run_purge(&fx.db_path, "douyin", &options(&fx, true, true)).unwrap_err();
    assert!(matches!(err, CoreError::Snapshot(_)));

    let store = open_store_existing(&fx.db_path).expect("reopen");
    let stats = collect_platform_stats(&store.conn, "douyin").expect("stats");
    assert_eq!(stats.thread_count, 3);
    assert_eq!(stats.message_count, 12);
    assert_eq!(stats.sync_status_count, 1);
}

#[test]
fn residual_rows_downgrade_verification_to_a_warning() {
    let fx = fixture();
    seed_store(&fx);
    // A stored trigger standing in for a concurrent sync worker that
    // re-creates its status row the moment it is deleted. The purge still
    // commits; verification must flag the leftover instead of failing.
    {
        let store = open_store(&fx.db_path).expect("open");
        store
            .conn
            .execute_batch(
                "CREATE TRIGGER resurrect_sync_status \
                 AFTER DELETE ON platform_sync_status \
                 BEGIN \
                   INSERT INTO platform_sync_status (platform, account_id, sync_count) \
                   VALUES (OLD.platform, OLD.account_id, 0); \
                 END;",
            )
            .expect("trigger");
    }

    let outcome = run_purge(&fx.db_path, "douyin", &options(&fx, true, false)).expect("run");
    let report = match outcome {
        PurgeOutcome::Purged(report) => report,
        other => panic!("expected purge, got {:?}", other),
    };

    assert_eq!(report.summary.messages_deleted, 12);
    assert_eq!(report.summary.threads_deleted, 3);
    assert_eq!(report.summary.sync_status_deleted, 1);
    assert_eq!(report.post_stats.thread_count, 0);
    assert_eq!(report.post_stats.message_count, 0);
    assert_eq!(report.post_stats.sync_status_count, 1);
    assert!(!report.verified);
}

#[test]
fn blank_platform_tag_is_rejected() {
    let fx = fixture();
    seed_store(&fx);
    let err = run_purge(&fx.db_path, "  ", &options(&fx, true, false)).unwrap_err();
    assert!(matches!(err, CoreError::InvalidArgument(_)));
}

#[test]
fn missing_store_is_fatal_before_any_work() {
    let fx = fixture();
    let err = run_purge(&fx.db_path, "douyin", &options(&fx, true, false)).unwrap_err();
    assert!(matches!(err, CoreError::StoreUnavailable { .. }));
}
