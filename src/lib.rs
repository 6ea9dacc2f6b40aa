//! Core library for a recipe-browsing client.
//!
//! Fetches a typed recipe collection over HTTP, keeps a persisted set of
//! favorite recipe ids, projects the collection through search/filter/sort,
//! and caches downloaded images in a bounded memory tier backed by a durable
//! disk tier. Rendering, navigation, and everything else presentational is a
//! consumer of this crate, not part of it.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod favorites;
pub mod loader;
pub mod model;
pub mod projection;
pub mod service;

pub use cache::{cache_key, ImageCache, ImageStore};
pub use client::ApiClient;
pub use config::{CacheSettings, Settings};
pub use error::{ImageCacheError, ImageLoadError, NetworkError};
pub use favorites::FavoritesStore;
pub use loader::ImageLoader;
pub use model::{Recipe, RecipeResponse};
pub use projection::{FilterOption, ListQuery, SortOption};
pub use service::{HttpRecipeService, RecipeService};

/// Fetch the recipe collection from the default production endpoint.
///
/// Convenience wrapper over [`HttpRecipeService`] with default settings.
pub async fn fetch_recipes() -> Result<Vec<Recipe>, NetworkError> {
    let service = HttpRecipeService::with_defaults()?;
    service.fetch_recipes().await
}
