use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::{ContentRequest, GenerationRecord, OptimizationFlags};

/// Pluggable cache seam for generated content. Lookups are pure in-memory
/// work, so the interface stays synchronous.
pub trait ContentCache: Send + Sync {
    fn get(&self, key: &str) -> Option<GenerationRecord>;
    fn put(&self, key: &str, record: GenerationRecord, ttl: Duration);
}

struct CacheEntry {
    record: GenerationRecord,
    expires_at: Instant,
}

/// Unbounded in-memory store with lazy per-entry expiry. There is no
/// background sweep: expired entries stay resident until overwritten.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    default_ttl: Duration,
}

pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

impl MemoryCache {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ContentCache for MemoryCache {
    fn get(&self, key: &str) -> Option<GenerationRecord> {
        let guard = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let entry = guard.get(key)?;
        if Instant::now() >= entry.expires_at {
            return None;
        }
        Some(entry.record.clone())
    }

    fn put(&self, key: &str, record: GenerationRecord, ttl: Duration) {
        let mut guard = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.insert(
            key.to_string(),
            CacheEntry {
                record,
                expires_at: Instant::now() + ttl,
            },
        );
    }
}

/// Cache key over the full canonicalized input. Hashing the whole request
/// (rather than a prompt prefix) rules out false hits between requests
/// that happen to share a prefix.
pub fn cache_key(model: &str, request: &ContentRequest, flags: &OptimizationFlags) -> String {
    let mut hasher = Sha256::new();
    hasher.update(model.as_bytes());
    hasher.update([0]);
    hasher.update(request.topic.as_bytes());
    hasher.update([0]);
    hasher.update(request.platform.key().as_bytes());
    hasher.update([0]);
    hasher.update(request.style.label().as_bytes());
    hasher.update([0]);
    hasher.update(flags.canonical().as_bytes());
    format!("{:x}", hasher.finalize())
}
