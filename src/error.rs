use thiserror::Error;

/// Errors that can occur while fetching and decoding recipe data
#[derive(Error, Debug)]
pub enum NetworkError {
    /// The request URL could not be parsed
    #[error("Invalid URL")]
    InvalidUrl,

    /// The response carried no usable body
    #[error("No data received")]
    NoData,

    /// The response body did not decode into the requested type
    #[error("Failed to decode response")]
    DecodingError,

    /// The server answered with a non-2xx status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Transport-level failure with no more specific classification
    #[error("Unknown error: {0}")]
    Unknown(#[source] reqwest::Error),
}

/// Errors that can occur in the two-tier image cache
#[derive(Error, Debug)]
pub enum ImageCacheError {
    /// Bytes did not decode as an image
    #[error("Invalid image data")]
    InvalidImageData,

    /// JPEG re-encoding for the disk tier failed
    #[error("Failed to compress image")]
    CompressionFailed(#[source] image::ImageError),

    /// Reading or writing a cache file failed
    #[error("File operation failed")]
    FileOperationFailed(#[source] std::io::Error),
}

/// Errors surfaced by the cache-through image loader
#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Cache(#[from] ImageCacheError),
}
