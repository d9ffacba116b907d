mod meal_db;

pub use meal_db::MealDbClient;

use crate::error::CatalogError;
use crate::model::{MealDetail, SearchResult};
use async_trait::async_trait;

/// The three remote lookups the finder needs from a recipe catalog
///
/// Implementations issue one request per call and never retry or cache.
/// An empty answer is `NoResults` / `NotFound`, never `FetchFailed`.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Meals whose cuisine/region matches `term`
    async fn search_by_area(&self, term: &str) -> Result<SearchResult, CatalogError>;

    /// Meals whose name matches `term`
    async fn search_by_name(&self, term: &str) -> Result<SearchResult, CatalogError>;

    /// Full record for one meal
    async fn lookup_by_id(&self, id: &str) -> Result<MealDetail, CatalogError>;
}
