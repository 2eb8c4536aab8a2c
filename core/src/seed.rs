use rusqlite::{params, Connection};

use crate::error::CoreError;
use crate::stats::content_fingerprint;

/// Seeds one platform partition with an account, threads, messages and a
/// sync-status row. Used by demos and workflow tests; runs in a single
/// transaction so a partially-seeded store never escapes.
pub fn seed_platform(
    conn: &Connection,
    platform: &str,
    account_id: &str,
    thread_count: i64,
    messages_per_thread: i64,
) -> Result<(), CoreError> {
    conn.execute_batch("BEGIN;")?;
    let result = (|| -> Result<(), CoreError> {
        conn.execute(
            "INSERT INTO accounts (platform, account_id, user_name, status, cookie_file) \
             VALUES (?1, ?2, ?3, 1, ?4);",
            params![
                platform,
                account_id,
                format!("{} operator", account_id),
                format!("cookies/{}.json", account_id)
            ],
        )?;

        let mut thread_stmt = conn.prepare(
            "INSERT OR IGNORE INTO message_threads \
             (platform, account_id, user_id, user_name, unread_count, last_message_time) \
             VALUES (?1, ?2, ?3, ?4, 0, ?5);",
        )?;
        let mut msg_stmt = conn.prepare(
            "INSERT INTO messages \
             (thread_id, message_id, sender, content_type, text_content, image_paths, \
              content_hash, timestamp, is_read) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
        )?;

        let mut total_messages = 0i64;
        for t in 0..thread_count {
            let user_id = format!("user_{}", t + 1);
            let user_name = format!("Remote user {}", t + 1);
            let last_ts = seed_timestamp(t, messages_per_thread.saturating_sub(1));
            thread_stmt.execute(params![platform, account_id, user_id, user_name, last_ts])?;
            let thread_id = conn.last_insert_rowid();

            for m in 0..messages_per_thread {
                let ts = seed_timestamp(t, m);
                let sender = if m % 2 == 0 { "user" } else { "me" };
                let (content_type, text, image_paths) = if (m + 1) % 5 == 0 {
                    let rel = format!(
                        "{}/{}/thread_{}/20240731_{:03}.jpg",
                        platform, account_id, thread_id, m
                    );
                    (
                        "image",
                        None,
                        Some(serde_json::json!([rel]).to_string()),
                    )
                } else {
                    (
                        "text",
                        Some(format!("message {} in thread {}", m + 1, t + 1)),
                        None,
                    )
                };
                let images: Vec<String> = image_paths
                    .as_deref()
                    .and_then(|raw| serde_json::from_str(raw).ok())
                    .unwrap_or_default();
                let hash = content_fingerprint(sender, text.as_deref(), &images);
                msg_stmt.execute(params![
                    thread_id,
                    format!("{}:{}:{}", platform, thread_id, m + 1),
                    sender,
                    content_type,
                    text,
                    image_paths,
                    hash,
                    ts,
                    (m % 2 == 1) as i64,
                ])?;
                total_messages += 1;
            }
        }

        conn.execute(
            "INSERT OR IGNORE INTO platform_sync_status \
             (platform, account_id, last_sync_time, sync_count) \
             VALUES (?1, ?2, ?3, ?4);",
            params![
                platform,
                account_id,
                seed_timestamp(thread_count, 0),
                total_messages
            ],
        )?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            conn.execute_batch("COMMIT;")?;
            Ok(())
        }
        Err(err) => {
            let _ = conn.execute_batch("ROLLBACK;");
            Err(err)
        }
    }
}

fn seed_timestamp(thread_idx: i64, message_idx: i64) -> String {
    let minutes = thread_idx * 90 + message_idx;
    format!(
        "2024-07-31 {:02}:{:02}:00",
        (10 + minutes / 60) % 24,
        minutes % 60
    )
}
