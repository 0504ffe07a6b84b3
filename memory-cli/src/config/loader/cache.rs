//! Configuration cache module
//!
//! This module provides caching for loaded configurations to avoid
//! repeated file parsing. The cache automatically invalidates when
//! files are modified (based on mtime).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::SystemTime;

use crate::config::Config;

/// Cache entry containing configuration and file metadata
#[derive(Debug, Clone)]
struct CacheEntry {
    config: Config,
    mtime: SystemTime,
}

/// Configuration cache for avoiding repeated file parsing
struct ConfigCache {
    entries: Mutex<HashMap<PathBuf, CacheEntry>>,
    hits: Mutex<u64>,
    misses: Mutex<u64>,
}

impl ConfigCache {
    fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            hits: Mutex::new(0),
            misses: Mutex::new(0),
        }
    }

    /// Get configuration from cache if valid
    #[allow(clippy::excessive_nesting)]
    pub fn get(&self, path: &Path) -> Option<Config> {
        let entries = self
            .entries
            .lock()
            .expect("ConfigCache: entries lock poisoned - this indicates a panic in cache code");

        if let Some(entry) = entries.get(path) {
            // Check if file has been modified
            if let Ok(metadata) = std::fs::metadata(path) {
                if let Ok(current_mtime) = metadata.modified() {
                    if current_mtime == entry.mtime {
                        // Cache hit
                        *self
                            .hits
                            .lock()
                            .expect("ConfigCache: hits lock poisoned - this indicates a panic in metrics tracking") += 1;
                        tracing::debug!("Config cache hit for: {}", path.display());
                        return Some(entry.config.clone());
                    }
                }
            }
        }

        // Cache miss
        *self.misses.lock().expect(
            "ConfigCache: misses lock poisoned - this indicates a panic in metrics tracking",
        ) += 1;
        tracing::debug!("Config cache miss for: {}", path.display());
        None
    }

    /// Insert configuration into cache
    pub fn insert(&self, path: PathBuf, config: Config) {
        if let Ok(metadata) = std::fs::metadata(&path) {
            if let Ok(mtime) = metadata.modified() {
                let entry = CacheEntry { config, mtime };
                let mut entries = self.entries.lock().expect(
                    "ConfigCache: entries lock poisoned - this indicates a panic in cache code",
                );
                entries.insert(path, entry);
            }
        }
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        let mut entries = self
            .entries
            .lock()
            .expect("ConfigCache: entries lock poisoned - this indicates a panic in cache code");
        entries.clear();
        tracing::debug!("Config cache cleared");
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let hits = *self
            .hits
            .lock()
            .expect("ConfigCache: hits lock poisoned - this indicates a panic in metrics tracking");
        let misses = *self.misses.lock().expect(
            "ConfigCache: misses lock poisoned - this indicates a panic in metrics tracking",
        );

        CacheStats {
            hits,
            misses,
            entries: self
                .entries
                .lock()
                .expect("ConfigCache: entries lock poisoned - this indicates a panic in cache code")
                .len(),
            hit_rate: if hits + misses > 0 {
                hits as f64 / (hits + misses) as f64
            } else {
                0.0
            },
        }
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries in cache
    pub entries: usize,
    /// Cache hit rate (0.0 to 1.0)
    pub hit_rate: f64,
}

/// Global configuration cache instance
fn cache() -> &'static ConfigCache {
    static CACHE: OnceLock<ConfigCache> = OnceLock::new();
    CACHE.get_or_init(ConfigCache::new)
}

/// Clear the configuration cache
///
/// This forces all subsequent configuration loads to re-read and re-parse
/// the configuration files, even if they haven't been modified.
pub fn clear_cache() {
    cache().clear();
}

/// Get cache statistics for monitoring and debugging
///
/// Returns information about cache hits, misses, and hit rate.
pub fn cache_stats() -> CacheStats {
    cache().stats()
}

/// Load configuration with caching and format detection
pub fn load_cached_config(path: &Path) -> Option<Config> {
    cache().get(path)
}

/// Insert configuration into cache
pub fn insert_cached_config(path: PathBuf, config: Config) {
    cache().insert(path, config);
}
