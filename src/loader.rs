use image::DynamicImage;
use log::{debug, warn};
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::ImageStore;
use crate::error::{ImageCacheError, ImageLoadError, NetworkError};

/// Cache-through image loader.
///
/// Tries the cache first; on a miss, downloads the image, saves it to the
/// cache, and returns it. A cache *read* failure degrades to a re-download
/// instead of failing the load, since the network copy is authoritative.
pub struct ImageLoader {
    client: Client,
    cache: Arc<dyn ImageStore>,
}

impl ImageLoader {
    pub fn new(cache: Arc<dyn ImageStore>, timeout: Option<Duration>) -> Result<Self, NetworkError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fetch-recipes/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(NetworkError::Unknown)?;

        Ok(Self { client, cache })
    }

    /// Fetch the image at `url`, preferring the cache.
    pub async fn load(&self, url: &str) -> Result<Arc<DynamicImage>, ImageLoadError> {
        match self.cache.load_image(url).await {
            Ok(Some(image)) => {
                debug!("image cache hit for {url}");
                return Ok(image);
            }
            Ok(None) => {}
            Err(e) => warn!("image cache read failed for {url}, re-downloading: {e}"),
        }

        let image = Arc::new(self.download(url).await?);
        self.cache.save_image(image.clone(), url).await?;
        Ok(image)
    }

    async fn download(&self, url: &str) -> Result<DynamicImage, ImageLoadError> {
        let parsed = Url::parse(url).map_err(|_| NetworkError::InvalidUrl)?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(NetworkError::Unknown)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::ServerError(status.as_u16()).into());
        }

        let bytes = response.bytes().await.map_err(NetworkError::Unknown)?;
        let image =
            image::load_from_memory(&bytes).map_err(|_| ImageCacheError::InvalidImageData)?;
        Ok(image)
    }
}
