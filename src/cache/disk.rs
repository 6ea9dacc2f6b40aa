use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use log::warn;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

use crate::error::ImageCacheError;

/// Derive the cache key for a source URL.
///
/// Hex-encoded SHA-256 of the URL string: deterministic, collision-resistant,
/// and filesystem-safe regardless of URL length or character set. The key is
/// used verbatim as the filename in the disk tier.
pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Durable cache tier: one JPEG file per key under the cache directory.
///
/// Unbounded except by filesystem capacity; entries persist across process
/// restarts until [`clear`](Self::clear).
pub(crate) struct DiskTier {
    dir: PathBuf,
    /// JPEG quality for the encoder, 0-100
    quality: u8,
}

impl DiskTier {
    pub fn new(dir: impl Into<PathBuf>, quality: u8) -> Self {
        Self {
            dir: dir.into(),
            quality,
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Read and decode the entry for `key`.
    ///
    /// A missing file is `Ok(None)`, not an error; a file that exists but
    /// does not decode as an image is `InvalidImageData`.
    pub async fn read(&self, key: &str) -> Result<Option<DynamicImage>, ImageCacheError> {
        let path = self.path_for(key);
        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ImageCacheError::FileOperationFailed(e)),
        };

        let image =
            image::load_from_memory(&data).map_err(|_| ImageCacheError::InvalidImageData)?;
        Ok(Some(image))
    }

    /// Encode `image` as JPEG at the configured quality and write it for `key`.
    pub async fn write(&self, key: &str, image: &DynamicImage) -> Result<(), ImageCacheError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(ImageCacheError::FileOperationFailed)?;

        // JPEG carries no alpha channel
        let rgb = image.to_rgb8();
        let mut encoded = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut encoded, self.quality);
        rgb.write_with_encoder(encoder)
            .map_err(ImageCacheError::CompressionFailed)?;

        fs::write(self.path_for(key), &encoded)
            .await
            .map_err(ImageCacheError::FileOperationFailed)
    }

    /// Delete and recreate the cache directory. Fail-open: I/O errors are
    /// logged and swallowed.
    pub async fn clear(&self) {
        if let Err(e) = fs::remove_dir_all(&self.dir).await {
            if e.kind() != ErrorKind::NotFound {
                warn!("failed to remove cache directory {}: {e}", self.dir.display());
            }
        }
        if let Err(e) = fs::create_dir_all(&self.dir).await {
            warn!("failed to recreate cache directory {}: {e}", self.dir.display());
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_stable_sha256_hex() {
        // SHA-256 of the ASCII string below, independently computed
        assert_eq!(
            cache_key("https://example.com/photo.jpg"),
            "5cd76d96bc2f2aecf99356e54cb349c5efb270c1cd0d030b78511575174af695"
        );
    }

    #[test]
    fn test_cache_key_is_filesystem_safe() {
        let key = cache_key("https://example.com/some path/with?query=1&x=/../..");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_distinct_urls_get_distinct_keys() {
        assert_ne!(
            cache_key("https://example.com/a.jpg"),
            cache_key("https://example.com/b.jpg")
        );
    }
}
