//! File-backed store for resolved location queries
//!
//! Provides a `GeoCache` handle with an explicit open lifecycle: the backing
//! file is read once at `open`, the map is held in memory for the process
//! lifetime, and every mutation rewrites the file before returning.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::coords::Coordinate;

/// A single cached resolution outcome
///
/// `coordinate: None` is a tombstone: the provider was asked and had no
/// answer (or was unreachable), so repeated queries for the same text are
/// served from here instead of hitting the provider again. Tombstones have
/// no expiry; they live until an explicit `clear`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The resolved coordinate, or `None` for a failed lookup
    pub coordinate: Option<Coordinate>,
    /// When the outcome was recorded
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates an entry recording a successful resolution
    pub fn found(coordinate: Coordinate) -> Self {
        Self {
            coordinate: Some(coordinate),
            cached_at: Utc::now(),
        }
    }

    /// Creates a tombstone entry recording a definitive failure
    pub fn not_found() -> Self {
        Self {
            coordinate: None,
            cached_at: Utc::now(),
        }
    }
}

/// Snapshot of cache contents for operational introspection
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Number of cached entries, tombstones included
    pub size: usize,
    /// All cached keys, sorted
    pub locations: Vec<String>,
}

/// In-memory state guarded by the handle's mutex
#[derive(Debug)]
struct Inner {
    /// File the map is persisted to
    file: PathBuf,
    /// The full query -> entry map
    entries: HashMap<String, CacheEntry>,
}

/// Shared handle to the geocoding cache
///
/// Cloning is cheap and every clone refers to the same map, so concurrent
/// batch resolution sees one consistent cache. Mutations persist to the
/// backing file while the internal lock is held, which keeps concurrent
/// writers from interleaving on the file.
#[derive(Debug, Clone)]
pub struct GeoCache {
    inner: Arc<Mutex<Inner>>,
}

impl GeoCache {
    /// Opens the cache backed by the given file
    ///
    /// If the file is missing or unreadable the cache starts empty; a cold
    /// start is not an error condition.
    pub fn open(file: PathBuf) -> Self {
        let entries = load_entries(&file);
        Self {
            inner: Arc::new(Mutex::new(Inner { file, entries })),
        }
    }

    /// Returns the default XDG-compliant cache file path
    ///
    /// `~/.cache/geopin/locations.json` on Linux, or the equivalent on other
    /// platforms. Returns `None` if no home directory can be determined.
    pub fn default_file() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "geopin")?;
        Some(project_dirs.cache_dir().join("locations.json"))
    }

    /// Looks up the entry for a query, trimming the key first
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.lock().entries.get(key.trim()).cloned()
    }

    /// Inserts or overwrites the entry for a query and persists the map
    ///
    /// The in-memory map is updated even if the file write fails, so the
    /// current process keeps benefiting from the entry; the caller decides
    /// whether the degraded durability is worth logging.
    pub fn put(&self, key: &str, entry: CacheEntry) -> std::io::Result<()> {
        let mut inner = self.lock();
        inner.entries.insert(key.trim().to_string(), entry);
        persist(&inner)
    }

    /// Returns the entry count and the sorted list of cached keys
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        let mut locations: Vec<String> = inner.entries.keys().cloned().collect();
        locations.sort();
        CacheStats {
            size: inner.entries.len(),
            locations,
        }
    }

    /// Empties the cache and persists the empty state
    pub fn clear(&self) -> std::io::Result<()> {
        let mut inner = self.lock();
        inner.entries.clear();
        persist(&inner)
    }

    /// Acquires the internal lock, recovering the data from a poisoned mutex
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Reads the persisted map, falling back to empty on any failure
fn load_entries(file: &PathBuf) -> HashMap<String, CacheEntry> {
    let Ok(content) = fs::read_to_string(file) else {
        return HashMap::new();
    };
    match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(file = %file.display(), %err, "cache file unreadable, starting empty");
            HashMap::new()
        }
    }
}

/// Writes the full map to the backing file
///
/// Writes to a sibling temp file first and renames it into place, so a
/// crash mid-flush never leaves a half-written cache file behind.
fn persist(inner: &Inner) -> std::io::Result<()> {
    if let Some(parent) = inner.file.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&inner.entries)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let tmp = inner.file.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, &inner.file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_cache() -> (GeoCache, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = GeoCache::open(temp_dir.path().join("locations.json"));
        (cache, temp_dir)
    }

    fn berlin() -> Coordinate {
        Coordinate::new(52.52, 13.405).unwrap()
    }

    #[test]
    fn test_get_returns_none_for_missing_key() {
        let (cache, _temp_dir) = create_test_cache();
        assert!(cache.get("nowhere").is_none());
    }

    #[test]
    fn test_put_then_get_roundtrip() {
        let (cache, _temp_dir) = create_test_cache();
        cache
            .put("Berlin, Germany", CacheEntry::found(berlin()))
            .expect("Put should succeed");

        let entry = cache.get("Berlin, Germany").expect("Should hit");
        assert_eq!(entry.coordinate, Some(berlin()));
    }

    #[test]
    fn test_keys_are_trimmed_on_put_and_get() {
        let (cache, _temp_dir) = create_test_cache();
        cache
            .put("  Berlin, Germany  ", CacheEntry::found(berlin()))
            .expect("Put should succeed");

        assert!(cache.get("Berlin, Germany").is_some());
        assert!(cache.get("   Berlin, Germany").is_some());
        assert_eq!(cache.stats().locations, vec!["Berlin, Germany"]);
    }

    #[test]
    fn test_tombstone_entry_is_a_hit_without_coordinate() {
        let (cache, _temp_dir) = create_test_cache();
        cache
            .put("NonexistentPlace12345", CacheEntry::not_found())
            .expect("Put should succeed");

        let entry = cache.get("NonexistentPlace12345").expect("Should hit");
        assert!(entry.coordinate.is_none());
    }

    #[test]
    fn test_put_overwrites_existing_entry() {
        let (cache, _temp_dir) = create_test_cache();
        cache
            .put("key", CacheEntry::not_found())
            .expect("First put should succeed");
        cache
            .put("key", CacheEntry::found(berlin()))
            .expect("Second put should succeed");

        let entry = cache.get("key").expect("Should hit");
        assert_eq!(entry.coordinate, Some(berlin()));
        assert_eq!(cache.stats().size, 1);
    }

    #[test]
    fn test_entries_survive_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("locations.json");

        let cache = GeoCache::open(file.clone());
        cache
            .put("Berlin, Germany", CacheEntry::found(berlin()))
            .expect("Put should succeed");
        drop(cache);

        let reopened = GeoCache::open(file);
        let entry = reopened.get("Berlin, Germany").expect("Should survive reopen");
        assert_eq!(entry.coordinate, Some(berlin()));
    }

    #[test]
    fn test_clear_empties_map_and_persists() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("locations.json");

        let cache = GeoCache::open(file.clone());
        cache
            .put("Berlin, Germany", CacheEntry::found(berlin()))
            .expect("Put should succeed");
        cache.clear().expect("Clear should succeed");

        let stats = cache.stats();
        assert_eq!(stats.size, 0);
        assert!(stats.locations.is_empty());

        // A fresh process must observe the cleared state
        let reopened = GeoCache::open(file);
        assert_eq!(reopened.stats().size, 0);
    }

    #[test]
    fn test_clear_on_fresh_cache_does_not_fail() {
        let (cache, _temp_dir) = create_test_cache();
        cache.clear().expect("Clear on empty cache should succeed");
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_open_with_corrupt_file_starts_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("locations.json");
        fs::write(&file, "{ not valid json").expect("Should write corrupt file");

        let cache = GeoCache::open(file);
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_put_creates_parent_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir
            .path()
            .join("nested")
            .join("cache")
            .join("locations.json");

        let cache = GeoCache::open(file.clone());
        cache
            .put("key", CacheEntry::not_found())
            .expect("Put should succeed");

        assert!(file.exists(), "Cache file should exist");
    }

    #[test]
    fn test_put_write_failure_keeps_in_memory_entry() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        // A plain file where the cache directory should be makes every flush fail
        let blocker = temp_dir.path().join("not-a-dir");
        fs::write(&blocker, "plain file").expect("Should write blocker file");

        let cache = GeoCache::open(blocker.join("locations.json"));
        let result = cache.put("Berlin, Germany", CacheEntry::found(berlin()));
        assert!(result.is_err(), "Flush under a plain file should fail");

        // The in-memory map stays authoritative for this process
        let entry = cache.get("Berlin, Germany").expect("Entry should survive the failed write");
        assert_eq!(entry.coordinate, Some(berlin()));
        assert_eq!(cache.stats().size, 1);
    }

    #[test]
    fn test_persist_leaves_no_temp_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("locations.json");

        let cache = GeoCache::open(file.clone());
        cache
            .put("Berlin, Germany", CacheEntry::found(berlin()))
            .expect("Put should succeed");

        assert!(file.exists(), "Cache file should exist");
        assert!(
            !temp_dir.path().join("locations.json.tmp").exists(),
            "Temp file should be renamed away"
        );
    }

    #[test]
    fn test_stats_locations_are_sorted() {
        let (cache, _temp_dir) = create_test_cache();
        cache.put("b", CacheEntry::not_found()).unwrap();
        cache.put("a", CacheEntry::not_found()).unwrap();
        cache.put("c", CacheEntry::not_found()).unwrap();

        assert_eq!(cache.stats().locations, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clones_share_state() {
        let (cache, _temp_dir) = create_test_cache();
        let clone = cache.clone();
        clone
            .put("Berlin, Germany", CacheEntry::found(berlin()))
            .expect("Put should succeed");

        assert!(cache.get("Berlin, Germany").is_some());
    }

    #[test]
    fn test_concurrent_puts_do_not_lose_entries() {
        let (cache, _temp_dir) = create_test_cache();
        let mut handles = Vec::new();
        for i in 0..8 {
            let cache = cache.clone();
            handles.push(std::thread::spawn(move || {
                cache
                    .put(&format!("key-{i}"), CacheEntry::not_found())
                    .expect("Put should succeed");
            }));
        }
        for handle in handles {
            handle.join().expect("Thread should not panic");
        }

        assert_eq!(cache.stats().size, 8);
    }

    #[test]
    fn test_default_file_is_project_scoped() {
        if let Some(path) = GeoCache::default_file() {
            let path_str = path.to_string_lossy();
            assert!(path_str.contains("geopin"), "Cache path should contain project name");
            assert!(path_str.ends_with("locations.json"));
        }
        // Test passes if default_file() returns None (e.g., no home directory in CI)
    }
}
