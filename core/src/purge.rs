use rusqlite::{params, Connection, TransactionBehavior};

use crate::error::CoreError;
use crate::models::PurgeSummary;

/// Deletes every row belonging to one platform partition as a single atomic
/// unit: messages first (their FK points at threads), then threads, then sync
/// status. Any step failing rolls the whole transaction back, leaving the
/// store exactly as it was. Purging an already-clean platform succeeds with
/// all-zero counts.
pub fn purge_platform(conn: &mut Connection, platform: &str) -> Result<PurgeSummary, CoreError> {
    // Referential integrity must be active for the duration of the delete;
    // the pragma is connection-level and a no-op inside a transaction.
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    let wrap = |source: rusqlite::Error| CoreError::Transaction {
        platform: platform.to_string(),
        source,
    };

    // IMMEDIATE takes the write lock up front so a concurrent writer cannot
    // interleave between the three deletes. WAL readers proceed untouched.
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(wrap)?;

    let result = (|| -> Result<PurgeSummary, rusqlite::Error> {
        let messages_deleted = tx.execute(
            "DELETE FROM messages \
             WHERE thread_id IN (SELECT id FROM message_threads WHERE platform = ?1);",
            params![platform],
        )? as i64;
        let threads_deleted = tx.execute(
            "DELETE FROM message_threads WHERE platform = ?1;",
            params![platform],
        )? as i64;
        let sync_status_deleted = tx.execute(
            "DELETE FROM platform_sync_status WHERE platform = ?1;",
            params![platform],
        )? as i64;
        Ok(PurgeSummary {
            messages_deleted,
            threads_deleted,
            sync_status_deleted,
        })
    })();

    match result {
        Ok(summary) => {
            // Commit is the single point at which the deletion becomes
            // visible to other readers.
            tx.commit().map_err(wrap)?;
            Ok(summary)
        }
        // Dropping the uncommitted transaction rolls everything back.
        Err(err) => Err(wrap(err)),
    }
}
