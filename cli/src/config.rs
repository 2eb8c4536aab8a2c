use std::env;
use std::path::PathBuf;

/// Base directory for the manager's on-disk state, matching the desktop
/// app's per-OS convention. `MSGSTORE_BASE_DIR` overrides it, which is also
/// how tests point the tool at a scratch tree.
pub fn base_dir() -> PathBuf {
    if let Some(dir) = env::var_os("MSGSTORE_BASE_DIR") {
        return PathBuf::from(dir);
    }
    if cfg!(target_os = "macos") {
        home().join("Library/Application Support/msgstore")
    } else if cfg!(target_os = "windows") {
        env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(home)
            .join("msgstore")
    } else {
        home().join(".config").join("msgstore")
    }
}

fn home() -> PathBuf {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn db_path() -> PathBuf {
    base_dir().join("db").join("database.db")
}

pub fn backups_dir() -> PathBuf {
    base_dir().join("backups")
}

pub fn message_images_dir() -> PathBuf {
    base_dir().join("messageImages")
}

pub fn log_dir() -> PathBuf {
    base_dir().join("logs")
}
