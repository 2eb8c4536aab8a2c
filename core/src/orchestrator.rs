use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cleanup::{cleanup_platform_artifacts, compact_store};
use crate::db::open_store_existing;
use crate::error::CoreError;
use crate::models::{ArtifactCleanup, PlatformStats, PurgeSummary};
use crate::purge::purge_platform;
use crate::snapshot::create_snapshot;
use crate::stats::collect_platform_stats;

#[derive(Debug, Clone)]
pub struct PurgeOptions {
    /// Affirmative confirmation obtained by the caller. The orchestrator
    /// never proceeds past the pre-stats gate without it.
    pub confirmed: bool,
    pub create_backup: bool,
    pub backup_dir: PathBuf,
    pub images_root: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct PurgeReport {
    pub platform: String,
    pub pre_stats: PlatformStats,
    pub snapshot_path: Option<PathBuf>,
    pub summary: PurgeSummary,
    pub artifacts: ArtifactCleanup,
    pub compaction_error: Option<String>,
    pub post_stats: PlatformStats,
    /// False when post-purge statistics are not all zero: an
    /// incomplete-cleanup warning for the operator, not an error.
    pub verified: bool,
}

#[derive(Debug)]
pub enum PurgeOutcome {
    /// The platform had no threads and no messages; no snapshot was taken and
    /// no transaction was started.
    NothingToDo { stats: PlatformStats },
    Purged(Box<PurgeReport>),
}

/// Runs the full purge workflow for one platform: pre-stats, empty-partition
/// gate, confirmation gate, optional snapshot, transactional purge, artifact
/// cleanup, compaction, and post-purge verification. The store connection is
/// scoped to this call and released on every exit path.
pub fn run_purge(
    db_path: &Path,
    platform: &str,
    options: &PurgeOptions,
) -> Result<PurgeOutcome, CoreError> {
    if platform.trim().is_empty() {
        return Err(CoreError::InvalidArgument(
            "platform tag must not be empty".to_string(),
        ));
    }
    let mut store = open_store_existing(db_path)?;

    let pre_stats = collect_platform_stats(&store.conn, platform)?;
    if pre_stats.thread_count == 0 && pre_stats.message_count == 0 {
        return Ok(PurgeOutcome::NothingToDo { stats: pre_stats });
    }

    if !options.confirmed {
        return Err(CoreError::NotConfirmed(platform.to_string()));
    }

    let snapshot_path = if options.create_backup {
        // Fold the WAL into the main file first so the copy carries every
        // committed write. Checkpoint refusal (a reader holding the WAL) is
        // tolerable; the snapshot is then simply as fresh as the last
        // checkpoint.
        let _ = store.conn.execute_batch("PRAGMA wal_checkpoint(FULL);");
        Some(create_snapshot(db_path, &options.backup_dir)?)
    } else {
        None
    };

    let summary = purge_platform(&mut store.conn, platform)?;

    // Everything past the commit is advisory: the purge has already
    // succeeded, and failures below are reported, never fatal.
    let artifacts = cleanup_platform_artifacts(&options.images_root, platform);
    let compaction_error = compact_store(&store.conn).err().map(|e| e.to_string());

    let post_stats = collect_platform_stats(&store.conn, platform)?;
    let verified = post_stats.thread_count == 0
        && post_stats.message_count == 0
        && post_stats.sync_status_count == 0;

    Ok(PurgeOutcome::Purged(Box::new(PurgeReport {
        platform: platform.to_string(),
        pre_stats,
        snapshot_path,
        summary,
        artifacts,
        compaction_error,
        post_stats,
        verified,
    })))
}
