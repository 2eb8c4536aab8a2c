use rusqlite::{params, Connection};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::models::{
    AccountThreads, DuplicateGroup, MessageRow, PlatformStats, StoreTotals, UserActivity,
};

/// Read-only aggregation over one platform partition. Calling this twice with
/// no intervening mutation returns identical results; a platform with no rows
/// is a valid, all-zero result.
pub fn collect_platform_stats(
    conn: &Connection,
    platform: &str,
) -> Result<PlatformStats, CoreError> {
    let thread_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM message_threads WHERE platform = ?1;",
        params![platform],
        |row| row.get(0),
    )?;

    // Always an explicit join against live thread rows, never a denormalized
    // counter.
    let message_count: i64 = conn.query_row(
        "SELECT COUNT(*) \
         FROM messages m \
         JOIN message_threads t ON m.thread_id = t.id \
         WHERE t.platform = ?1;",
        params![platform],
        |row| row.get(0),
    )?;

    let sync_status_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM platform_sync_status WHERE platform = ?1;",
        params![platform],
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(
        "SELECT account_id, COUNT(*) AS thread_count \
         FROM message_threads \
         WHERE platform = ?1 \
         GROUP BY account_id \
         ORDER BY thread_count DESC, account_id ASC;",
    )?;
    let account_breakdown = stmt
        .query_map(params![platform], |row| {
            Ok(AccountThreads {
                account_id: row.get(0)?,
                thread_count: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT user_id, user_name, COUNT(*) AS thread_count, \
                MAX(last_message_time) AS last_message \
         FROM message_threads \
         WHERE platform = ?1 \
         GROUP BY user_id, user_name \
         ORDER BY thread_count DESC, user_id ASC \
         LIMIT 10;",
    )?;
    let top_users = stmt
        .query_map(params![platform], |row| {
            Ok(UserActivity {
                user_id: row.get(0)?,
                user_name: row.get(1)?,
                thread_count: row.get(2)?,
                last_message_time: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT m.id \
         FROM messages m \
         LEFT JOIN message_threads t ON t.id = m.thread_id \
         WHERE t.id IS NULL \
         ORDER BY m.id ASC;",
    )?;
    let orphan_message_ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;

    Ok(PlatformStats {
        platform: platform.to_string(),
        thread_count,
        message_count,
        sync_status_count,
        account_breakdown,
        top_users,
        orphan_message_ids,
    })
}

/// Full rows for every orphaned message, for operator investigation of the
/// anomalies [`collect_platform_stats`] flags by id.
pub fn orphan_messages(conn: &Connection) -> Result<Vec<MessageRow>, CoreError> {
    let mut stmt = conn.prepare(
        "SELECT m.id, m.thread_id, m.message_id, m.sender, m.content_type, \
                m.text_content, m.image_paths, m.content_hash, m.timestamp, \
                m.is_read, m.created_at \
         FROM messages m \
         LEFT JOIN message_threads t ON t.id = m.thread_id \
         WHERE t.id IS NULL \
         ORDER BY m.id ASC;",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                thread_id: row.get(1)?,
                message_id: row.get(2)?,
                sender: row.get(3)?,
                content_type: row.get(4)?,
                text_content: row.get(5)?,
                image_paths: row.get(6)?,
                content_hash: row.get(7)?,
                timestamp: row.get(8)?,
                is_read: row.get::<_, i64>(9)? != 0,
                created_at: row.get(10)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Whole-store row counts, used for before/after reporting around a purge.
pub fn store_totals(conn: &Connection) -> Result<StoreTotals, CoreError> {
    let threads: i64 =
        conn.query_row("SELECT COUNT(*) FROM message_threads;", [], |row| row.get(0))?;
    let messages: i64 = conn.query_row("SELECT COUNT(*) FROM messages;", [], |row| row.get(0))?;
    let sync_rows: i64 =
        conn.query_row("SELECT COUNT(*) FROM platform_sync_status;", [], |row| row.get(0))?;
    let accounts: i64 = conn.query_row("SELECT COUNT(*) FROM accounts;", [], |row| row.get(0))?;
    Ok(StoreTotals {
        threads,
        messages,
        sync_rows,
        accounts,
    })
}

/// Groups messages by content fingerprint; a duplicate is any fingerprint
/// shared by more than one message. Ids inside a group follow the message
/// timeline (timestamp, then id).
pub fn duplicate_fingerprints(
    conn: &Connection,
    platform: Option<&str>,
) -> Result<Vec<DuplicateGroup>, CoreError> {
    let mut stmt = conn.prepare(
        "SELECT m.content_hash, m.id \
         FROM messages m \
         LEFT JOIN message_threads t ON t.id = m.thread_id \
         WHERE m.content_hash IS NOT NULL \
           AND (?1 IS NULL OR t.platform = ?1) \
         ORDER BY m.content_hash ASC, m.timestamp ASC, m.id ASC;",
    )?;
    let rows = stmt
        .query_map(params![platform], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut groups: Vec<DuplicateGroup> = Vec::new();
    for (hash, id) in rows {
        match groups.last_mut() {
            Some(group) if group.content_hash == hash => group.message_ids.push(id),
            _ => groups.push(DuplicateGroup {
                content_hash: hash,
                message_ids: vec![id],
            }),
        }
    }
    groups.retain(|group| group.message_ids.len() > 1);
    Ok(groups)
}

/// Fingerprint of normalized message content, used for duplicate detection
/// across ingestions. Empty text and no text hash differently from each other
/// only through the sender/image parts; the encoding below is stable.
pub fn content_fingerprint(sender: &str, text: Option<&str>, image_paths: &[String]) -> String {
    let mut parts = vec![format!("sender:{}", sender)];
    if let Some(text) = text {
        parts.push(format!("text:{}", text.trim()));
    }
    if !image_paths.is_empty() {
        parts.push(format!("img:{}", image_paths.join("|")));
    }
    let mut hasher = Sha256::new();
    hasher.update(parts.join("\u{1f}").as_bytes());
    hex::encode(hasher.finalize())
}
