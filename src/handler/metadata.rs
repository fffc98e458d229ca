//! File metadata cache
//!
//! Maps request paths to what was learned the last time the file was
//! resolved. Entries are immutable and shared as `Arc`s; a refresh builds a
//! new entry and swaps it into the map, so readers always see a whole entry.
//!
//! The map is unbounded and never evicts. Its keys are request paths that
//! resolved to real files, so it grows with the served file tree and not
//! with the number of distinct requests.

use crate::http::mime;
use std::collections::HashMap;
use std::fs::Metadata;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Metadata for one resolved static file
#[derive(Debug, Clone)]
pub struct CachedFile {
    /// Resolved path on disk, fixed for the life of the entry
    pub disk_path: PathBuf,
    /// Modification time at last refresh
    pub modified: SystemTime,
    /// File size in bytes
    pub size: u64,
    /// MIME type derived from the file extension
    pub content_type: &'static str,
    /// Stat result at last refresh
    pub metadata: Metadata,
}

impl CachedFile {
    /// Build an entry from a fresh stat of `disk_path`
    pub fn new(disk_path: PathBuf, metadata: Metadata) -> Self {
        Self {
            content_type: mime::content_type_for(&disk_path),
            modified: modified_time(&metadata),
            size: metadata.len(),
            metadata,
            disk_path,
        }
    }

    /// Whether a newer stat result describes a different revision of the file
    pub fn is_stale(&self, current: &Metadata) -> bool {
        modified_time(current) != self.modified
    }

    /// A replacement entry for the same disk path
    #[must_use]
    pub fn refreshed(&self, metadata: Metadata) -> Self {
        Self::new(self.disk_path.clone(), metadata)
    }
}

/// Modification time, or the epoch on platforms that do not record one
fn modified_time(metadata: &Metadata) -> SystemTime {
    metadata.modified().unwrap_or(UNIX_EPOCH)
}

/// Process-lifetime map from request path to cached file metadata
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<String, Arc<CachedFile>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, request_path: &str) -> Option<Arc<CachedFile>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(request_path).cloned()
    }

    /// Store an entry, replacing any previous one for the same key
    ///
    /// Two concurrent misses for one path may both insert; they resolved the
    /// same file, so whichever lands last is equally valid.
    pub fn insert(&self, request_path: String, entry: CachedFile) -> Arc<CachedFile> {
        let entry = Arc::new(entry);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(request_path, Arc::clone(&entry));
        entry
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use std::fs;

    #[test]
    fn test_entry_from_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.css");
        fs::write(&path, "body { color: red; }").unwrap();
        filetime::set_file_mtime(&path, FileTime::from_unix_time(1_600_000_000, 0)).unwrap();

        let entry = CachedFile::new(path.clone(), fs::metadata(&path).unwrap());
        assert_eq!(entry.disk_path, path);
        assert_eq!(entry.size, 20);
        assert_eq!(entry.content_type, "text/css; charset=utf-8");
        assert_eq!(
            entry.modified,
            UNIX_EPOCH + std::time::Duration::from_secs(1_600_000_000)
        );
    }

    #[test]
    fn test_staleness_by_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{}").unwrap();
        filetime::set_file_mtime(&path, FileTime::from_unix_time(1_600_000_000, 0)).unwrap();

        let entry = CachedFile::new(path.clone(), fs::metadata(&path).unwrap());
        assert!(!entry.is_stale(&fs::metadata(&path).unwrap()));

        fs::write(&path, r#"{"a": 1}"#).unwrap();
        filetime::set_file_mtime(&path, FileTime::from_unix_time(1_600_000_100, 0)).unwrap();
        let current = fs::metadata(&path).unwrap();
        assert!(entry.is_stale(&current));

        let refreshed = entry.refreshed(current);
        assert_eq!(refreshed.disk_path, entry.disk_path);
        assert_eq!(refreshed.size, 8);
    }

    #[test]
    fn test_insert_replaces_whole_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "one").unwrap();

        let cache = MetadataCache::new();
        assert!(cache.is_empty());

        let first = cache.insert(
            "/a.txt".to_string(),
            CachedFile::new(path.clone(), fs::metadata(&path).unwrap()),
        );
        fs::write(&path, "three").unwrap();
        cache.insert(
            "/a.txt".to_string(),
            CachedFile::new(path.clone(), fs::metadata(&path).unwrap()),
        );

        assert_eq!(cache.len(), 1);
        // The reader holding the old entry still sees a consistent snapshot
        assert_eq!(first.size, 3);
        assert_eq!(cache.get("/a.txt").unwrap().size, 5);
        assert!(cache.get("/b.txt").is_none());
    }
}
