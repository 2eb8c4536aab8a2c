use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRow {
    pub id: i64,
    pub thread_id: i64,
    pub message_id: Option<String>,
    pub sender: String,
    pub content_type: String,
    pub text_content: Option<String>,
    pub image_paths: Option<String>,
    pub content_hash: Option<String>,
    pub timestamp: String,
    pub is_read: bool,
    pub created_at: Option<String>,
}

impl MessageRow {
    /// Decodes the JSON-encoded `image_paths` column. A missing or
    /// malformed value yields an empty list.
    pub fn image_path_list(&self) -> Vec<String> {
        self.image_paths
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}

/// Thread count per managed account, descending by thread count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountThreads {
    pub account_id: String,
    pub thread_count: i64,
}

/// One remote user's conversation footprint on a platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivity {
    pub user_id: String,
    pub user_name: String,
    pub thread_count: i64,
    pub last_message_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformStats {
    pub platform: String,
    pub thread_count: i64,
    pub message_count: i64,
    pub sync_status_count: i64,
    pub account_breakdown: Vec<AccountThreads>,
    pub top_users: Vec<UserActivity>,
    /// Messages whose thread_id resolves to no thread. These are store-wide
    /// anomalies, reported rather than silently folded into the counts.
    pub orphan_message_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreTotals {
    pub threads: i64,
    pub messages: i64,
    pub sync_rows: i64,
    pub accounts: i64,
}

/// Fingerprint shared by more than one message, with the owning message ids
/// in timeline order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub content_hash: String,
    pub message_ids: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PurgeSummary {
    pub messages_deleted: i64,
    pub threads_deleted: i64,
    pub sync_status_deleted: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactCleanup {
    pub removed: u64,
    pub skipped: u64,
}
