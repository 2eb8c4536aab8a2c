use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use libc::statvfs;

use crate::error::CoreError;

const SNAPSHOT_HEADROOM: u64 = 32 * 1024 * 1024;

/// Copies the live store file to a timestamped backup. The copy lands under a
/// `.tmp` name and is renamed into place only once complete, so a torn copy
/// can never be mistaken for a usable snapshot. No SQLite lock is taken; the
/// source stays open for concurrent readers.
pub fn create_snapshot(source: &Path, backup_dir: &Path) -> Result<PathBuf, CoreError> {
    let meta = fs::metadata(source)
        .map_err(|e| CoreError::Snapshot(format!("source stat failed: {}", e)))?;
    if !meta.is_file() {
        return Err(CoreError::Snapshot(format!(
            "source is not a regular file: {}",
            source.display()
        )));
    }
    fs::create_dir_all(backup_dir)
        .map_err(|e| CoreError::Snapshot(format!("backup dir failed: {}", e)))?;

    if let Some(free) = available_space(backup_dir) {
        let required = meta.len().saturating_add(SNAPSHOT_HEADROOM);
        if free < required {
            return Err(CoreError::Snapshot(format!(
                "insufficient disk space for snapshot: need ~{}, have {}",
                format_bytes(required),
                format_bytes(free)
            )));
        }
    }

    let stamp = Utc::now().format("%Y%m%d_%H%M%S%.3f");
    let file_name = format!("database_backup_{}.db", stamp);
    let dest = backup_dir.join(&file_name);
    let tmp = backup_dir.join(format!("{}.tmp", file_name));

    if let Err(err) = fs::copy(source, &tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(CoreError::Snapshot(format!("copy failed: {}", err)));
    }
    fs::rename(&tmp, &dest).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        CoreError::Snapshot(format!("rename failed: {}", e))
    })?;
    Ok(dest)
}

fn available_space(path: &Path) -> Option<u64> {
    let c_path = std::ffi::CString::new(path.as_os_str().to_string_lossy().as_bytes()).ok()?;
    let mut stat: statvfs = unsafe { std::mem::zeroed() };
    let res = unsafe { statvfs(c_path.as_ptr(), &mut stat) };
    if res != 0 {
        return None;
    }
    let avail = (stat.f_bavail as u64).saturating_mul(stat.f_frsize as u64);
    Some(avail)
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * 1024 * 1024;
    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn snapshot_copies_file_bytes() {
        let dir = tempdir().expect("temp");
        let source = dir.path().join("database.db");
        fs::write(&source, b"store contents").expect("write");
        let backup_dir = dir.path().join("backups");
        let snap = create_snapshot(&source, &backup_dir).expect("snapshot");
        assert!(snap
            .file_name()
            .and_then(|n| n.to_str())
            .expect("name")
            .starts_with("database_backup_"));
        assert_eq!(fs::read(&snap).expect("read"), b"store contents");
    }

    #[test]
    fn snapshot_names_sort_chronologically() {
        let dir = tempdir().expect("temp");
        let source = dir.path().join("database.db");
        fs::write(&source, b"x").expect("write");
        let backup_dir = dir.path().join("backups");
        let first = create_snapshot(&source, &backup_dir).expect("first");
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = create_snapshot(&source, &backup_dir).expect("second");
        assert_ne!(first, second);
        assert!(first.file_name().unwrap() < second.file_name().unwrap());
    }

    #[test]
    fn snapshot_fails_when_source_missing() {
        let dir = tempdir().expect("temp");
        let err = create_snapshot(&dir.path().join("missing.db"), &dir.path().join("backups"))
            .unwrap_err();
        assert!(matches!(err, CoreError::Snapshot(_)));
    }

    #[test]
    fn snapshot_fails_when_backup_dir_is_a_file() {
        let dir = tempdir().expect("temp");
        let source = dir.path().join("database.db");
        fs::write(&source, b"x").expect("write");
        let blocked = dir.path().join("backups");
        fs::write(&blocked, b"not a dir").expect("write");
        let err = create_snapshot(&source, &blocked).unwrap_err();
        assert!(matches!(err, CoreError::Snapshot(_)));
    }

    #[test]
    fn format_bytes_human_readable() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.0 MB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.0 GB");
    }
}
