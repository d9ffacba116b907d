use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::aggregator::FavoritesAggregator;
use crate::catalog::{CatalogClient, MealDbClient};
use crate::config::FinderConfig;
use crate::detail_cache::{DetailState, MealDetailCache};
use crate::error::{CatalogError, FinderError};
use crate::favorites::{FavoritesStorage, FavoritesStore, FileStorage};
use crate::model::{MealDetail, SearchMode};
use crate::search::{SearchOrchestrator, SearchState};

/// Builder for wiring a [`MealFinder`] session
#[derive(Default)]
pub struct MealFinderBuilder {
    config: Option<FinderConfig>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    favorites_dir: Option<PathBuf>,
    catalog: Option<Arc<dyn CatalogClient>>,
    storage: Option<Arc<dyn FavoritesStorage>>,
}

impl MealFinderBuilder {
    /// Start from a loaded configuration instead of the defaults
    ///
    /// # Example
    /// ```no_run
    /// use meal_finder::{FinderConfig, MealFinder};
    ///
    /// let builder = MealFinder::builder().config(FinderConfig::load()?);
    /// # Ok::<(), config::ConfigError>(())
    /// ```
    pub fn config(mut self, config: FinderConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Point the catalog client at a different API root
    ///
    /// # Example
    /// ```
    /// use meal_finder::MealFinder;
    ///
    /// let builder = MealFinder::builder()
    ///     .base_url("http://localhost:8080/api/json/v1/1");
    /// ```
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set a timeout for catalog requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Keep the favorites record in `dir`
    pub fn favorites_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.favorites_dir = Some(dir.into());
        self
    }

    /// Use a custom catalog client; base URL and timeout are then ignored
    pub fn catalog(mut self, catalog: Arc<dyn CatalogClient>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Use a custom favorites backend; the favorites directory is then ignored
    pub fn storage(mut self, storage: Arc<dyn FavoritesStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Create the catalog client and load favorites
    ///
    /// # Errors
    /// Returns `FinderError` if:
    /// - The base URL is blank
    /// - The HTTP client can't be created
    ///
    /// A missing or malformed favorites record is not an error.
    pub async fn build(self) -> Result<MealFinder, FinderError> {
        let config = self.config.unwrap_or_default();

        let catalog: Arc<dyn CatalogClient> = match self.catalog {
            Some(catalog) => catalog,
            None => {
                let base_url = self.base_url.unwrap_or(config.base_url.clone());
                if base_url.trim().is_empty() {
                    return Err(FinderError::BuilderError(
                        "Catalog base URL cannot be empty".to_string(),
                    ));
                }
                let timeout = self.timeout.unwrap_or_else(|| config.timeout());
                Arc::new(MealDbClient::new(base_url, timeout)?)
            }
        };

        let storage: Arc<dyn FavoritesStorage> = match self.storage {
            Some(storage) => storage,
            None => {
                let dir = self.favorites_dir.unwrap_or(config.favorites.dir.clone());
                Arc::new(FileStorage::new(dir, &config.favorites.key))
            }
        };

        Ok(MealFinder {
            search: SearchOrchestrator::new(Arc::clone(&catalog)),
            details: MealDetailCache::new(Arc::clone(&catalog)),
            aggregator: Arc::new(FavoritesAggregator::new(catalog)),
            favorites: Arc::new(FavoritesStore::load(storage).await),
        })
    }
}

/// One user session: search, detail views and favorites over a shared catalog
pub struct MealFinder {
    search: SearchOrchestrator,
    details: MealDetailCache,
    favorites: Arc<FavoritesStore>,
    aggregator: Arc<FavoritesAggregator>,
}

impl MealFinder {
    /// Creates a new builder
    ///
    /// # Example
    /// ```
    /// use meal_finder::MealFinder;
    ///
    /// let builder = MealFinder::builder();
    /// ```
    pub fn builder() -> MealFinderBuilder {
        MealFinderBuilder::default()
    }

    pub async fn search(&self, term: &str, mode: SearchMode) -> Option<SearchState> {
        self.search.search(term, mode).await
    }

    pub fn search_state(&self) -> SearchState {
        self.search.state()
    }

    /// Full record for a displayed meal, fetched once per id
    pub async fn details(&self, id: &str) -> Result<Arc<MealDetail>, CatalogError> {
        self.details.ensure(id).await
    }

    pub async fn detail_state(&self, id: &str) -> DetailState {
        self.details.state(id).await
    }

    /// Returns whether `id` is a favorite afterwards
    pub async fn toggle_favorite(&self, id: &str) -> bool {
        self.favorites.toggle(id).await
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Resolve the current favorites now
    ///
    /// Falls back to the last published list if a newer resolution
    /// superseded this one.
    pub async fn favorite_meals(&self) -> Vec<MealDetail> {
        let ids = self.favorites.ids();
        match self.aggregator.resolve(&ids).await {
            Some(meals) => meals,
            None => self.aggregator.current(),
        }
    }

    /// Keep the aggregated favorites in step with every toggle
    pub fn follow_favorites(&self) -> JoinHandle<()> {
        Arc::clone(&self.aggregator).follow(self.favorites.subscribe())
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn aggregator(&self) -> &FavoritesAggregator {
        &self.aggregator
    }

    pub fn orchestrator(&self) -> &SearchOrchestrator {
        &self.search
    }
}
