use anyhow::{anyhow, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

/// On-disk shape of one cache entry. The key material is stamped into the
/// payload so `cache clear --provider` can filter entries without knowing
/// which repository or model produced them.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope {
    repo: String,
    provider: String,
    model: String,
    data: Value,
}

/// Stores one opaque JSON blob per (repository, provider, model) triple so
/// stateful backends can carry conversational context across invocations.
#[derive(Debug, Clone)]
pub struct ContextCache {
    cache_dir: PathBuf,
}

impl ContextCache {
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self> {
        let cache_dir = match cache_dir {
            Some(dir) => dir,
            None => dirs::cache_dir()
                .ok_or_else(|| anyhow!("Could not find cache directory"))?
                .join("scrive"),
        };

        fs::create_dir_all(&cache_dir)?;

        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &PathBuf {
        &self.cache_dir
    }

    fn cache_key(repo: &str, provider: &str, model: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{repo}:{provider}:{model}").as_bytes());
        hex::encode(hasher.finalize())
    }

    fn entry_path(&self, repo: &str, provider: &str, model: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.json", Self::cache_key(repo, provider, model)))
    }

    /// Cached context for the triple, or None. A missing, unreadable, or
    /// malformed entry is a silent miss.
    pub fn get_context(&self, repo: &str, provider: &str, model: &str) -> Option<Value> {
        let path = self.entry_path(repo, provider, model);
        let content = fs::read_to_string(&path).ok()?;

        match serde_json::from_str::<CacheEnvelope>(&content) {
            Ok(envelope) => Some(envelope.data),
            Err(e) => {
                debug!("Ignoring malformed cache entry {}: {e}", path.display());
                None
            }
        }
    }

    /// Overwrites the entry for the triple. Persistence failures are logged
    /// and never surfaced to the caller.
    pub fn save_context(&self, repo: &str, provider: &str, model: &str, data: Value) {
        let envelope = CacheEnvelope {
            repo: repo.to_string(),
            provider: provider.to_string(),
            model: model.to_string(),
            data,
        };

        let path = self.entry_path(repo, provider, model);
        let result = serde_json::to_string(&envelope)
            .map_err(anyhow::Error::from)
            .and_then(|content| fs::write(&path, content).map_err(anyhow::Error::from));

        if let Err(e) = result {
            warn!("Failed to save cache entry {}: {e}", path.display());
        }
    }

    /// Removes the entry for the triple. Absence is not an error.
    pub fn clear_context(&self, repo: &str, provider: &str, model: &str) {
        let path = self.entry_path(repo, provider, model);
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                warn!("Failed to clear cache entry {}: {e}", path.display());
            }
        }
    }

    /// Deletes every cache entry.
    pub fn clear_all(&self) {
        for path in self.entry_paths() {
            if let Err(e) = fs::remove_file(&path) {
                warn!("Failed to remove cache entry {}: {e}", path.display());
            }
        }
    }

    /// Deletes every entry stamped with the given provider, skipping entries
    /// that cannot be read or parsed. Returns the number deleted.
    pub fn clear_provider(&self, provider: &str) -> usize {
        let mut removed = 0;

        for path in self.entry_paths() {
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            let Ok(envelope) = serde_json::from_str::<CacheEnvelope>(&content) else {
                continue;
            };

            if envelope.provider == provider && fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }

        removed
    }

    fn entry_paths(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.cache_dir) else {
            return Vec::new();
        };

        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect()
    }
}
