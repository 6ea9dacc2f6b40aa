//! Two-tier image cache: bounded memory in front of a durable disk tier.
//!
//! Both tiers share one key space: the hex SHA-256 of the source URL. Reads
//! hit memory first with no I/O; a disk hit is promoted into memory. Writes
//! land in memory immediately and then re-encode to JPEG on disk. Operations
//! on the same key are serialized so a load started after a completed save
//! observes the saved content; different keys proceed independently.

mod disk;
mod memory;

pub use disk::cache_key;

use async_trait::async_trait;
use image::DynamicImage;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::CacheSettings;
use crate::error::ImageCacheError;
use disk::DiskTier;
use memory::MemoryTier;

/// The cache seam callers depend on; swap it for a stub in tests.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Load the cached image for `url`, or `None` if it was never saved.
    async fn load_image(&self, url: &str) -> Result<Option<Arc<DynamicImage>>, ImageCacheError>;

    /// Cache `image` under the key for `url` in both tiers.
    async fn save_image(&self, image: Arc<DynamicImage>, url: &str) -> Result<(), ImageCacheError>;

    /// Drop every entry from both tiers.
    async fn clear_cache(&self);
}

/// Owned two-tier image cache service.
///
/// Construct once and share (e.g. behind an `Arc<dyn ImageStore>`); interior
/// state is lock-guarded, so callers need no external synchronization.
pub struct ImageCache {
    memory: Mutex<MemoryTier>,
    disk: DiskTier,
    /// Per-key write locks; entries are pruned once the last user lets go
    key_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ImageCache {
    pub fn new(settings: &CacheSettings) -> Self {
        let quality = (settings.jpeg_quality.clamp(0.0, 1.0) * 100.0).round() as u8;
        Self {
            memory: Mutex::new(MemoryTier::new(settings.max_entries, settings.max_bytes)),
            disk: DiskTier::new(&settings.dir, quality),
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&CacheSettings::default())
    }

    fn memory(&self) -> MutexGuard<'_, MemoryTier> {
        self.memory.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn key_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.key_locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(key.to_string()).or_default().clone()
    }

    fn release_key_lock(&self, key: &str) {
        let mut locks = self.key_locks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(lock) = locks.get(key) {
            // Only the map still holds this lock; drop the entry
            if Arc::strong_count(lock) == 1 {
                locks.remove(key);
            }
        }
    }

    async fn load_from_disk(&self, key: &str) -> Result<Option<Arc<DynamicImage>>, ImageCacheError> {
        match self.disk.read(key).await? {
            Some(image) => {
                let image = Arc::new(image);
                // Promotion is the one mutating side effect of a read
                self.memory().insert(key.to_string(), image.clone());
                Ok(Some(image))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ImageStore for ImageCache {
    async fn load_image(&self, url: &str) -> Result<Option<Arc<DynamicImage>>, ImageCacheError> {
        let key = cache_key(url);

        if let Some(image) = self.memory().get(&key) {
            return Ok(Some(image));
        }

        let lock = self.key_lock(&key);
        let result = {
            let _guard = lock.lock().await;
            // A save may have landed while we waited on the key lock.
            // Bind before branching so the memory guard is not held across
            // the disk await.
            let recheck = self.memory().get(&key);
            match recheck {
                Some(image) => Ok(Some(image)),
                None => self.load_from_disk(&key).await,
            }
        };
        drop(lock);
        self.release_key_lock(&key);

        result
    }

    async fn save_image(&self, image: Arc<DynamicImage>, url: &str) -> Result<(), ImageCacheError> {
        let key = cache_key(url);

        // Memory first: the entry is readable before the disk write completes
        self.memory().insert(key.clone(), image.clone());

        let lock = self.key_lock(&key);
        let result = {
            let _guard = lock.lock().await;
            self.disk.write(&key, &image).await
        };
        drop(lock);
        self.release_key_lock(&key);

        result
    }

    async fn clear_cache(&self) {
        self.memory().clear();
        self.disk.clear().await;
    }
}
