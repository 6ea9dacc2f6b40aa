use std::collections::HashSet;

use crate::model::Recipe;

/// Which recipes to keep before searching and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterOption {
    #[default]
    All,
    Favorites,
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    /// Keep fetch/insertion order
    #[default]
    None,
    /// Ascending by name, case-sensitive
    Name,
    /// Ascending by cuisine, case-sensitive
    Cuisine,
}

/// Pure filter/search/sort transform over a recipe collection.
///
/// No I/O and no shared state; recomputed in full from its inputs on every
/// call. Filtering keeps favorites first, then applies a case-insensitive
/// substring search against name or cuisine (the two predicates commute, the
/// order is fixed only for determinism). Sorting is stable, so ties keep the
/// input order.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub search_text: String,
    pub filter: FilterOption,
    pub sort: SortOption,
}

impl ListQuery {
    pub fn apply(&self, recipes: &[Recipe], favorites: &HashSet<String>) -> Vec<Recipe> {
        let needle = self.search_text.to_lowercase();

        let mut filtered: Vec<Recipe> = recipes
            .iter()
            .filter(|r| self.filter != FilterOption::Favorites || favorites.contains(&r.id))
            .filter(|r| {
                needle.is_empty()
                    || r.name.to_lowercase().contains(&needle)
                    || r.cuisine.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        match self.sort {
            SortOption::None => {}
            SortOption::Name => filtered.sort_by(|a, b| a.name.cmp(&b.name)),
            SortOption::Cuisine => filtered.sort_by(|a, b| a.cuisine.cmp(&b.cuisine)),
        }

        filtered
    }
}
