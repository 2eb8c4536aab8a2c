use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

const MAX_LOG_BYTES: u64 = 1_500_000;

#[derive(Debug, Serialize)]
pub struct LogEvent {
    pub ts: String,
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

fn sanitize(input: &str) -> String {
    let mut out = input.to_string();
    // strip obvious user paths
    for prefix in ["/Users/", "/home/", "/var/", "/private/", "C:\\", "D:\\"] {
        if let Some(idx) = out.find(prefix) {
            out.replace_range(idx.., "[redacted]");
            break;
        }
    }
    // strip long numeric sequences (remote user ids, phone numbers)
    out = out
        .split_whitespace()
        .map(|token| {
            let digits = token.chars().filter(|c| c.is_ascii_digit()).count();
            if digits >= 10 {
                "[redacted]".to_string()
            } else {
                token.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    out
}

pub fn log_event(log_dir: &Path, kind: &str, message: &str) -> io::Result<()> {
    log_event_with_detail(log_dir, kind, message, None)
}

/// Appends one JSON line to the operations log, sanitizing the free-text
/// message. `detail` carries structured values (row counts, platform tag)
/// that are safe to record verbatim.
pub fn log_event_with_detail(
    log_dir: &Path,
    kind: &str,
    message: &str,
    detail: Option<serde_json::Value>,
) -> io::Result<()> {
    fs::create_dir_all(log_dir)?;
    let path = log_dir.join("operations.log");
    trim_log(&path)?;
    let event = LogEvent {
        ts: Utc::now().to_rfc3339(),
        kind: kind.to_string(),
        message: sanitize(message),
        detail,
    };
    let line = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    writeln!(file, "{}", line)?;
    Ok(())
}

fn trim_log(path: &PathBuf) -> io::Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let meta = fs::metadata(path)?;
    if meta.len() <= MAX_LOG_BYTES {
        return Ok(());
    }
    let data = fs::read(path)?;
    let keep_from = data.len().saturating_sub((MAX_LOG_BYTES / 2) as usize);
    fs::write(path, &data[keep_from..])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sanitize_redacts_paths_and_digits() {
        let msg = "purge of /home/op/.config/msgstore for user 1234567890123";
        let cleaned = sanitize(msg);
        assert!(cleaned.contains("[redacted]"));
        assert!(!cleaned.contains(".config"));
    }

    #[test]
    fn log_event_writes_json_lines() {
        let dir = tempdir().expect("temp");
        log_event_with_detail(
            dir.path(),
            "purge_committed",
            "purge finished",
            Some(serde_json::json!({"platform": "douyin", "threads": 3})),
        )
        .expect("log");
        let contents =
            fs::read_to_string(dir.path().join("operations.log")).expect("read");
        assert!(contents.contains("purge_committed"));
        assert!(contents.contains("douyin"));
    }
}
