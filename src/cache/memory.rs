use image::DynamicImage;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Bounded in-memory cache tier.
///
/// Bounded by entry count and by total decoded pixel bytes; eviction is LRU.
/// The entry inserted by the current call is never the victim of that call's
/// own budget enforcement (it is most-recent, and the single-entry case is
/// left alone even when over budget).
pub(crate) struct MemoryTier {
    entries: LruCache<String, Arc<DynamicImage>>,
    total_bytes: usize,
    max_bytes: usize,
}

impl MemoryTier {
    pub fn new(max_entries: usize, max_bytes: usize) -> Self {
        let cap = NonZeroUsize::new(max_entries.max(1)).unwrap();
        Self {
            entries: LruCache::new(cap),
            total_bytes: 0,
            max_bytes,
        }
    }

    /// O(1) lookup; refreshes recency on hit.
    pub fn get(&mut self, key: &str) -> Option<Arc<DynamicImage>> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: String, image: Arc<DynamicImage>) {
        let cost = cost_of(&image);

        // push returns the displaced entry: either the old value under the
        // same key or the LRU victim once the count cap is hit
        if let Some((_, displaced)) = self.entries.push(key, image) {
            self.total_bytes = self.total_bytes.saturating_sub(cost_of(&displaced));
        }
        self.total_bytes += cost;

        while self.total_bytes > self.max_bytes && self.entries.len() > 1 {
            if let Some((_, evicted)) = self.entries.pop_lru() {
                self.total_bytes = self.total_bytes.saturating_sub(cost_of(&evicted));
            } else {
                break;
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.total_bytes = 0;
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn cost_of(image: &DynamicImage) -> usize {
    image.as_bytes().len()
}
