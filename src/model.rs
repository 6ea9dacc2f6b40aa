use serde::{Deserialize, Serialize};

/// A single recipe as served by the recipes endpoint.
///
/// Immutable once decoded; identity and equality are by `id` alone, which is
/// stable across fetches. Wire field names are snake_case and `uuid` maps to
/// `id`; unknown fields are ignored, but a missing or null required field
/// fails the whole decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(rename = "uuid")]
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub photo_url_large: Option<String>,
    pub photo_url_small: Option<String>,
    pub source_url: Option<String>,
    pub youtube_url: Option<String>,
}

impl PartialEq for Recipe {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Recipe {}

impl std::hash::Hash for Recipe {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Envelope for the recipes endpoint: `{ "recipes": [...] }`.
///
/// Decoding is all-or-nothing: one malformed recipe fails the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    pub recipes: Vec<Recipe>,
}
