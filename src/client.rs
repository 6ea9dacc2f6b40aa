use log::debug;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::NetworkError;

/// Typed JSON GET client.
///
/// One request per call, no caching and no retries; retry policy, if any,
/// belongs to the caller. Failures are classified per [`NetworkError`]:
/// unparseable URL, non-2xx status, or a body that does not decode into the
/// requested type.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Create a client with the given request timeout.
    pub fn new(timeout: Option<Duration>) -> Result<Self, NetworkError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fetch-recipes/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(NetworkError::Unknown)?;

        Ok(Self { client })
    }

    /// GET `url` and decode the JSON body as `T`.
    ///
    /// A non-2xx status fails with `ServerError(code)` carrying the literal
    /// status, regardless of body content. A 2xx body that fails to decode
    /// surfaces only `DecodingError`; the underlying diagnostic is logged at
    /// debug level.
    pub async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, NetworkError> {
        let url = Url::parse(url).map_err(|_| NetworkError::InvalidUrl)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(NetworkError::Unknown)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::ServerError(status.as_u16()));
        }

        let body = response.bytes().await.map_err(NetworkError::Unknown)?;

        serde_json::from_slice(&body).map_err(|e| {
            debug!("response decode failed: {e}");
            NetworkError::DecodingError
        })
    }
}
