use async_trait::async_trait;
use log::debug;
use std::time::Duration;

use crate::client::ApiClient;
use crate::error::NetworkError;
use crate::model::{Recipe, RecipeResponse};

/// Source of the recipe collection.
///
/// The seam the presentation layer depends on; swap it for a stub in tests.
#[async_trait]
pub trait RecipeService: Send + Sync {
    /// Fetch the full recipe collection in document order.
    ///
    /// An empty collection is a successful result, not an error.
    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, NetworkError>;
}

/// [`RecipeService`] backed by the HTTP recipes endpoint.
pub struct HttpRecipeService {
    client: ApiClient,
    endpoint: String,
}

impl HttpRecipeService {
    /// Service against the given endpoint.
    ///
    /// The endpoint is validated at fetch time, so an unparseable value here
    /// surfaces as `InvalidUrl` from [`fetch_recipes`](RecipeService::fetch_recipes).
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, NetworkError> {
        Ok(Self {
            client: ApiClient::new(timeout)?,
            endpoint: endpoint.into(),
        })
    }

    /// Service against the default production endpoint.
    pub fn with_defaults() -> Result<Self, NetworkError> {
        let settings = crate::config::Settings::default();
        Self::new(settings.endpoint, Some(Duration::from_secs(settings.timeout)))
    }
}

#[async_trait]
impl RecipeService for HttpRecipeService {
    async fn fetch_recipes(&self) -> Result<Vec<Recipe>, NetworkError> {
        let response: RecipeResponse = self.client.fetch(&self.endpoint).await?;
        debug!("fetched {} recipes", response.recipes.len());
        Ok(response.recipes)
    }
}
