use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store unavailable at {path}: {reason}")]
    StoreUnavailable { path: PathBuf, reason: String },
    #[error("snapshot failed: {0}")]
    Snapshot(String),
    #[error("purge transaction failed for platform '{platform}': {source}")]
    Transaction {
        platform: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("compaction failed: {0}")]
    Compaction(#[source] rusqlite::Error),
    #[error("purge of platform '{0}' was not confirmed")]
    NotConfirmed(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
