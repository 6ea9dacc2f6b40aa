use fetch_recipes::{cache_key, CacheSettings, ImageCache, ImageCacheError, ImageStore};
use image::{DynamicImage, Rgb, RgbImage};
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn settings_for(dir: &Path) -> CacheSettings {
    CacheSettings {
        dir: dir.to_path_buf(),
        ..Default::default()
    }
}

fn solid_image(width: u32, height: u32, color: [u8; 3]) -> Arc<DynamicImage> {
    let mut img = RgbImage::new(width, height);
    for pixel in img.pixels_mut() {
        *pixel = Rgb(color);
    }
    Arc::new(DynamicImage::ImageRgb8(img))
}

#[tokio::test]
async fn test_save_then_load_round_trips() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let cache = ImageCache::new(&settings_for(dir.path()));
    let url = "https://example.com/photo.jpg";

    let original = solid_image(32, 24, [200, 30, 30]);
    cache.save_image(original.clone(), url).await.unwrap();

    let loaded = cache.load_image(url).await.unwrap().expect("entry present");

    // Re-encoded lossily, so compare shape and approximate color
    assert_eq!(loaded.width(), 32);
    assert_eq!(loaded.height(), 24);
    let pixel = loaded.to_rgb8().get_pixel(16, 12).0;
    assert!(pixel[0] > 150, "red channel lost: {pixel:?}");
    assert!(pixel[1] < 100 && pixel[2] < 100, "color skewed: {pixel:?}");
}

#[tokio::test]
async fn test_never_saved_url_is_absent_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ImageCache::new(&settings_for(dir.path()));

    let result = cache
        .load_image("https://example.com/never-saved.jpg")
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_clear_cache_empties_both_tiers() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ImageCache::new(&settings_for(dir.path()));
    let urls = [
        "https://example.com/a.jpg",
        "https://example.com/b.jpg",
        "https://example.com/c.jpg",
    ];

    for url in &urls {
        cache.save_image(solid_image(8, 8, [0, 0, 255]), url).await.unwrap();
    }
    cache.clear_cache().await;

    for url in &urls {
        assert!(cache.load_image(url).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_disk_entry_survives_new_cache_instance() {
    let dir = tempfile::tempdir().unwrap();
    let url = "https://example.com/persisted.jpg";

    {
        let cache = ImageCache::new(&settings_for(dir.path()));
        cache.save_image(solid_image(16, 16, [10, 200, 10]), url).await.unwrap();
    }

    // Fresh instance, cold memory tier: the disk tier serves the hit
    let cache = ImageCache::new(&settings_for(dir.path()));
    let loaded = cache.load_image(url).await.unwrap();
    assert!(loaded.is_some());
}

#[tokio::test]
async fn test_undecodable_disk_file_is_invalid_image_data() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ImageCache::new(&settings_for(dir.path()));
    let url = "https://example.com/corrupt.jpg";

    fs::create_dir_all(dir.path()).unwrap();
    fs::write(dir.path().join(cache_key(url)), b"definitely not a jpeg").unwrap();

    let result = cache.load_image(url).await;
    assert!(matches!(result, Err(ImageCacheError::InvalidImageData)));
}

#[tokio::test]
async fn test_disk_filenames_are_hex_keys() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ImageCache::new(&settings_for(dir.path()));
    let url = "https://example.com/named.jpg?size=large&v=2";

    cache.save_image(solid_image(8, 8, [1, 2, 3]), url).await.unwrap();

    assert!(dir.path().join(cache_key(url)).exists());
}

#[tokio::test]
async fn test_saved_entry_readable_from_memory_without_disk() {
    // Memory-tier visibility: entry readable immediately after save returns,
    // even if the disk directory is wiped out from under the cache
    let dir = tempfile::tempdir().unwrap();
    let cache = ImageCache::new(&settings_for(dir.path()));
    let url = "https://example.com/memory-only.jpg";

    cache.save_image(solid_image(8, 8, [5, 5, 5]), url).await.unwrap();
    fs::remove_dir_all(dir.path()).unwrap();

    assert!(cache.load_image(url).await.unwrap().is_some());
}

#[tokio::test]
async fn test_concurrent_saves_and_loads_on_same_key() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(ImageCache::new(&settings_for(dir.path())));
    let url = "https://example.com/contended.jpg";

    let mut tasks = Vec::new();
    for i in 0..4u8 {
        let cache = cache.clone();
        tasks.push(tokio::spawn(async move {
            cache
                .save_image(solid_image(8, 8, [i * 40, 0, 0]), url)
                .await
        }));
    }
    for _ in 0..4 {
        let cache = cache.clone();
        tasks.push(tokio::spawn(async move { cache.load_image(url).await.map(|_| ()) }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    // Last writer wins; whichever that was, the entry decodes cleanly
    let final_read = cache.load_image(url).await.unwrap();
    assert!(final_read.is_some());
}

#[tokio::test]
async fn test_independent_keys_do_not_interfere() {
    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(ImageCache::new(&settings_for(dir.path())));

    let mut tasks = Vec::new();
    for i in 0..8u32 {
        let cache = cache.clone();
        tasks.push(tokio::spawn(async move {
            let url = format!("https://example.com/{i}.jpg");
            cache.save_image(solid_image(8, 8, [0, 100, 0]), &url).await?;
            cache.load_image(&url).await
        }));
    }
    for task in tasks {
        assert!(task.await.unwrap().unwrap().is_some());
    }
}
