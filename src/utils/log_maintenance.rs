use crate::utils::error::Result;
use std::path::Path;

pub const DEFAULT_MAX_LOG_BYTES: u64 = 500 * 1024;

/// Empties the scheduler output log once it grows past `max_bytes`.
///
/// Returns `true` when the file was truncated. A missing file is not an error.
pub fn truncate_if_oversized(path: &Path, max_bytes: u64) -> Result<bool> {
    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    if size <= max_bytes {
        return Ok(false);
    }

    std::fs::OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)?;
    Ok(true)
}

/// Log-and-continue wrapper used at process start.
pub fn clean_cron_log(path: &Path, max_bytes: u64) {
    match truncate_if_oversized(path, max_bytes) {
        Ok(true) => tracing::info!("🗑️ Cron log {} cleaned", path.display()),
        Ok(false) => tracing::debug!("Cron log {} within size limit", path.display()),
        Err(e) => tracing::error!("⚠️ Error cleaning cron log {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.log");
        assert!(!truncate_if_oversized(&path, 10).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_small_file_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cron.log");
        std::fs::write(&path, b"0123456789").unwrap();

        assert!(!truncate_if_oversized(&path, 10).unwrap());
        assert_eq!(std::fs::read(&path).unwrap().len(), 10);
    }

    #[test]
    fn test_oversized_file_is_emptied() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cron.log");
        std::fs::write(&path, vec![b'x'; 2048]).unwrap();

        assert!(truncate_if_oversized(&path, 1024).unwrap());
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }
}
