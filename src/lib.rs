pub mod aggregator;
pub mod builder;
pub mod catalog;
pub mod config;
pub mod detail_cache;
pub mod error;
pub mod favorites;
pub mod model;
pub mod search;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregator::FavoritesAggregator;
pub use builder::{MealFinder, MealFinderBuilder};
pub use catalog::{CatalogClient, MealDbClient};
pub use crate::config::FinderConfig;
pub use detail_cache::{DetailState, MealDetailCache};
pub use error::{CatalogError, FinderError};
pub use favorites::{FavoritesStorage, FavoritesStore, FileStorage, MemoryStorage};
pub use model::{Ingredient, MealDetail, MealSummary, SearchMode, SearchResult};
pub use search::{SearchOrchestrator, SearchState, POPULAR_CUISINES, SUGGESTED_NAMES};

/// Search TheMealDB once, without keeping any session state
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use meal_finder::{search_meals, SearchMode};
///
/// let result = search_meals("Italian", SearchMode::ByCuisine).await?;
/// println!("{} meals", result.len());
/// # Ok(())
/// # }
/// ```
pub async fn search_meals(term: &str, mode: SearchMode) -> Result<SearchResult, CatalogError> {
    let client = MealDbClient::default();
    match mode {
        SearchMode::ByCuisine => client.search_by_area(term).await,
        SearchMode::ByName => client.search_by_name(term).await,
    }
}

/// Fetch one meal's full record from TheMealDB
pub async fn lookup_meal(id: &str) -> Result<MealDetail, CatalogError> {
    MealDbClient::default().lookup_by_id(id).await
}
