use crate::models::RawClass;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Two-tier cache of raw catalog records
///
/// L1 is an in-memory TTL cache holding shared, immutable records. L2 is one JSON
/// file per enrollment code on disk, which survives restarts and lets the service
/// run without catalog access.
pub struct CatalogCache {
    dir: PathBuf,
    l1_cache: moka::future::Cache<String, Arc<RawClass>>,
}

impl CatalogCache {
    /// Create a new catalog cache rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>, l1_size: u64, ttl_secs: u64) -> Self {
        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            dir: dir.into(),
            l1_cache,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, enroll_code: &str) -> PathBuf {
        self.dir.join(format!("{}.json", enroll_code))
    }

    /// Get a record from cache (L1 first, then disk)
    pub async fn get(&self, enroll_code: &str) -> Result<Arc<RawClass>, CacheError> {
        if !CacheKey::is_valid_code(enroll_code) {
            return Err(CacheError::CacheMiss(enroll_code.to_string()));
        }

        let key = CacheKey::class(enroll_code);
        if let Some(class) = self.l1_cache.get(&key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(class);
        }

        let bytes = match tokio::fs::read(self.path_for(enroll_code)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::trace!("Cache miss: {}", key);
                return Err(CacheError::CacheMiss(enroll_code.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::trace!("L2 cache hit: {}", key);
        let class = Arc::new(serde_json::from_slice::<RawClass>(&bytes)?);

        // Populate L1 cache
        self.l1_cache.insert(key, class.clone()).await;

        Ok(class)
    }

    /// Store a record in both tiers
    pub async fn set(&self, enroll_code: &str, class: RawClass) -> Result<Arc<RawClass>, CacheError> {
        if !CacheKey::is_valid_code(enroll_code) {
            return Err(CacheError::CacheMiss(enroll_code.to_string()));
        }

        let json = serde_json::to_vec_pretty(&class)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(enroll_code), json).await?;

        let class = Arc::new(class);
        self.l1_cache.insert(CacheKey::class(enroll_code), class.clone()).await;

        tracing::trace!("Cache set: {}", enroll_code);
        Ok(class)
    }

    /// Delete a record from both cache tiers
    pub async fn delete(&self, enroll_code: &str) -> Result<(), CacheError> {
        if !CacheKey::is_valid_code(enroll_code) {
            return Ok(());
        }

        self.l1_cache.invalidate(&CacheKey::class(enroll_code)).await;
        match tokio::fs::remove_file(self.path_for(enroll_code)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1_cache.entry_count(),
            l1_weighted_size: self.l1_cache.weighted_size(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_size: u64,
    pub l1_weighted_size: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a raw class record
    pub fn class(enroll_code: &str) -> String {
        format!("class:{}", enroll_code)
    }

    /// Enrollment codes double as file names, so only plain alphanumerics are accepted
    pub fn is_valid_code(enroll_code: &str) -> bool {
        !enroll_code.is_empty() && enroll_code.len() <= 16 && enroll_code.chars().all(|c| c.is_ascii_alphanumeric())
    }
}
