// Summary cache store.
// A durable, expiring mapping from project name to summary text, backed by a
// single JSON file that is read, modified, and rewritten in full on every
// access. No locking: the design assumes one sequential batch run at a time.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::{Duration, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// Default location of the cache file, relative to the working directory.
pub const CACHE_FILE: &str = "data/project_summaries_cache.json";

/// Default entry lifetime in days.
pub const CACHE_TTL_DAYS: i64 = 7;

/// Timestamp format written to the cache file (ISO-8601 local datetime).
const TIMESTAMP_WRITE: &str = "%Y-%m-%dT%H:%M:%S%.6f";
/// Lenient variant used for parsing (fractional seconds optional).
const TIMESTAMP_READ: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A single cached summary with its creation time.
///
/// Both fields deserialize as optional so partial or hand-edited entries
/// degrade to a cache miss instead of failing the whole load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl CacheEntry {
    fn now(summary: &str) -> Self {
        Self {
            summary: Some(summary.to_string()),
            timestamp: Some(Local::now().naive_local().format(TIMESTAMP_WRITE).to_string()),
        }
    }
}

type Store = BTreeMap<String, CacheEntry>;

/// File-backed summary cache with time-based expiry.
///
/// Every operation loads the store fresh from disk and persists it back after
/// any mutation; nothing is kept in memory across calls. Storage failures
/// never reach the caller: unreadable or malformed content is treated as an
/// empty store, and write failures are logged and reported through the
/// `put` return value.
pub struct SummaryCache {
    path: PathBuf,
    ttl: Duration,
}

impl SummaryCache {
    /// Create a cache over the given file with the given entry lifetime.
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self { path: path.into(), ttl }
    }

    /// Cache at the default location with the default 7-day lifetime.
    pub fn open_default() -> Self {
        Self::new(CACHE_FILE, Duration::days(CACHE_TTL_DAYS))
    }

    /// Look up the cached summary for a project.
    ///
    /// Returns `None` when the project is absent or its entry has expired.
    /// An expired entry is deleted and the pruned store persisted before
    /// returning, so stale entries do not accumulate for queried keys.
    pub fn get(&self, project_name: &str) -> Option<String> {
        let mut store = self.load();

        let expired = match store.get(project_name) {
            None => return None,
            Some(entry) => self.is_expired(entry.timestamp.as_deref()),
        };

        if expired {
            store.remove(project_name);
            if let Err(err) = self.save(&store) {
                warn!(error = %err, "failed to persist cache after pruning expired entry");
            }
            return None;
        }

        store.get(project_name).and_then(|entry| entry.summary.clone())
    }

    /// Insert or overwrite the summary for a project, stamped with the
    /// current time, and persist the whole store.
    ///
    /// Returns `false` when persistence failed; the mutation is then simply
    /// lost for future calls. Never propagates an error.
    pub fn put(&self, project_name: &str, summary: &str) -> bool {
        let mut store = self.load();
        store.insert(project_name.to_string(), CacheEntry::now(summary));

        match self.save(&store) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, project = project_name, "failed to persist summary cache");
                false
            }
        }
    }

    /// Load the full store, degrading to empty on any read or parse failure.
    fn load(&self) -> Store {
        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(store) => store,
                Err(err) => {
                    warn!(error = %err, path = %self.path.display(), "cache file malformed, treating as empty");
                    self.init_storage();
                    Store::new()
                }
            },
            // Missing file is the normal first-run case, not worth a warning.
            Err(_) => {
                self.init_storage();
                Store::new()
            }
        }
    }

    /// Best-effort creation of the storage location: parent directory plus an
    /// empty store file when none exists yet. Existing (possibly corrupt)
    /// content is left alone until the next successful save overwrites it.
    fn init_storage(&self) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if !self.path.exists() {
            let _ = fs::write(&self.path, "{}");
        }
    }

    /// Persist the full store as pretty-printed JSON, atomically via a temp
    /// file so a crash mid-write cannot leave a truncated store behind.
    fn save(&self, store: &Store) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(store)?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }

    /// An entry is expired when its timestamp is missing, unparsable, or
    /// older than the configured lifetime.
    fn is_expired(&self, timestamp: Option<&str>) -> bool {
        let Some(raw) = timestamp else {
            return true;
        };
        match NaiveDateTime::parse_from_str(raw, TIMESTAMP_READ) {
            Ok(created) => Local::now().naive_local() - created > self.ttl,
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache_in(dir: &TempDir) -> SummaryCache {
        SummaryCache::new(dir.path().join("summaries.json"), Duration::days(CACHE_TTL_DAYS))
    }

    fn stamp(age: Duration) -> String {
        (Local::now().naive_local() - age).format(TIMESTAMP_WRITE).to_string()
    }

    fn seed(cache: &SummaryCache, name: &str, summary: &str, timestamp: Option<String>) {
        let mut store = cache.load();
        store.insert(
            name.to_string(),
            CacheEntry { summary: Some(summary.to_string()), timestamp },
        );
        cache.save(&store).unwrap();
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        assert!(cache.put("rust-lang/rust", "systems language"));
        assert_eq!(cache.get("rust-lang/rust"), Some("systems language".to_string()));
    }

    #[test]
    fn test_missing_key_is_absent() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        assert_eq!(cache.get("never/stored"), None);
    }

    #[test]
    fn test_expiry_boundary() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        seed(
            &cache,
            "old/project",
            "stale",
            Some(stamp(Duration::days(7) + Duration::seconds(1))),
        );
        seed(
            &cache,
            "fresh/project",
            "still good",
            Some(stamp(Duration::days(6) + Duration::hours(23))),
        );

        assert_eq!(cache.get("old/project"), None);
        assert_eq!(cache.get("fresh/project"), Some("still good".to_string()));
    }

    #[test]
    fn test_missing_timestamp_treated_as_expired_and_pruned() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        seed(&cache, "no/timestamp", "orphan", None);
        assert_eq!(cache.get("no/timestamp"), None);

        // The prune must be persisted, not merely ignored in memory.
        let raw = std::fs::read_to_string(dir.path().join("summaries.json")).unwrap();
        let store: Store = serde_json::from_str(&raw).unwrap();
        assert!(!store.contains_key("no/timestamp"));
    }

    #[test]
    fn test_malformed_timestamp_treated_as_expired() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        seed(&cache, "bad/clock", "stale", Some("not-a-datetime".to_string()));
        assert_eq!(cache.get("bad/clock"), None);
    }

    #[test]
    fn test_corruption_tolerance() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summaries.json");
        std::fs::write(&path, "{ truncated garb").unwrap();

        let cache = SummaryCache::new(&path, Duration::days(CACHE_TTL_DAYS));
        assert_eq!(cache.get("anything"), None);

        // A subsequent put repairs the file.
        assert!(cache.put("anything", "fresh"));
        let raw = std::fs::read_to_string(&path).unwrap();
        let store: Store = serde_json::from_str(&raw).unwrap();
        assert_eq!(store["anything"].summary.as_deref(), Some("fresh"));
    }

    #[test]
    fn test_idempotent_overwrite() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        cache.put("proj/a", "first");
        cache.put("proj/a", "second");

        let raw = std::fs::read_to_string(dir.path().join("summaries.json")).unwrap();
        let store: Store = serde_json::from_str(&raw).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(cache.get("proj/a"), Some("second".to_string()));
    }

    #[test]
    fn test_puts_are_isolated() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        let b_stamp = stamp(Duration::days(3));
        seed(&cache, "proj/b", "b summary", Some(b_stamp.clone()));
        cache.put("proj/a", "a summary");

        let raw = std::fs::read_to_string(dir.path().join("summaries.json")).unwrap();
        let store: Store = serde_json::from_str(&raw).unwrap();
        assert_eq!(store["proj/b"].summary.as_deref(), Some("b summary"));
        assert_eq!(store["proj/b"].timestamp.as_deref(), Some(b_stamp.as_str()));
    }

    #[test]
    fn test_expired_prune_persisted() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        seed(&cache, "keep/me", "valid", Some(stamp(Duration::hours(1))));
        seed(&cache, "drop/me", "expired", Some(stamp(Duration::days(10))));

        assert_eq!(cache.get("drop/me"), None);

        let raw = std::fs::read_to_string(dir.path().join("summaries.json")).unwrap();
        let store: Store = serde_json::from_str(&raw).unwrap();
        assert!(!store.contains_key("drop/me"));
        assert!(store.contains_key("keep/me"));
    }

    #[test]
    fn test_non_ascii_preserved_unescaped() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        cache.put("ai/project", "【项目背景】机器学习框架");

        let raw = std::fs::read_to_string(dir.path().join("summaries.json")).unwrap();
        assert!(raw.contains("【项目背景】机器学习框架"));
    }

    #[test]
    fn test_unknown_entry_keys_tolerated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summaries.json");
        std::fs::write(
            &path,
            format!(
                r#"{{"proj/x": {{"summary": "kept", "timestamp": "{}", "model": "qwen-max"}}}}"#,
                stamp(Duration::hours(2))
            ),
        )
        .unwrap();

        let cache = SummaryCache::new(&path, Duration::days(CACHE_TTL_DAYS));
        assert_eq!(cache.get("proj/x"), Some("kept".to_string()));
    }

    #[test]
    fn test_missing_file_created_on_first_access() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("summaries.json");

        let cache = SummaryCache::new(&path, Duration::days(CACHE_TTL_DAYS));
        assert_eq!(cache.get("anything"), None);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
