use std::fs;
use std::path::Path;

use rusqlite::Connection;

use crate::error::CoreError;
use crate::models::ArtifactCleanup;

/// Removes message-image files for one platform. Images live under
/// `<images_root>/<platform>/<account>/thread_<id>/<file>`, so the platform
/// subtree is exactly the set of files derived from the purged rows; anything
/// outside it is left untouched. Best-effort: per-file failures are counted
/// as skips and never abort the pass.
pub fn cleanup_platform_artifacts(images_root: &Path, platform: &str) -> ArtifactCleanup {
    let platform_dir = images_root.join(platform);
    let mut result = ArtifactCleanup::default();
    if !platform_dir.is_dir() {
        return result;
    }
    remove_files(&platform_dir, &mut result);
    // Leftover empty directories are cosmetic; removal is best-effort too.
    let _ = fs::remove_dir(&platform_dir);
    result
}

fn remove_files(dir: &Path, result: &mut ArtifactCleanup) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => {
            result.skipped += 1;
            return;
        }
    };
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => {
                result.skipped += 1;
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() {
            remove_files(&path, result);
            let _ = fs::remove_dir(&path);
        } else {
            match fs::remove_file(&path) {
                Ok(()) => result.removed += 1,
                Err(_) => result.skipped += 1,
            }
        }
    }
}

/// Reclaims free pages in the store file. Advisory and non-transactional:
/// must run outside the delete transaction, and a failure never undoes an
/// already-committed purge.
pub fn compact_store(conn: &Connection) -> Result<(), CoreError> {
    conn.execute_batch("VACUUM;").map_err(CoreError::Compaction)
}
