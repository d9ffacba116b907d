use crate::catalog::CatalogClient;
use crate::error::CatalogError;
use crate::model::MealDetail;
use futures_util::future::join_all;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Turns the favorite ids into displayable meal records
///
/// Every resolution claims a version number when it starts. Its result is
/// published only if no newer resolution has started meanwhile.
pub struct FavoritesAggregator {
    catalog: Arc<dyn CatalogClient>,
    version: AtomicU64,
    published: watch::Sender<Vec<MealDetail>>,
}

impl FavoritesAggregator {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        let (published, _) = watch::channel(Vec::new());
        FavoritesAggregator {
            catalog,
            version: AtomicU64::new(0),
            published,
        }
    }

    /// Look up every id concurrently and publish the meals that resolved,
    /// in the order of `ids`
    ///
    /// Ids whose lookup failed or found nothing are left out. Returns `None`
    /// when a newer resolution started before this one settled; its result
    /// is then discarded.
    pub async fn resolve(&self, ids: &[String]) -> Option<Vec<MealDetail>> {
        let version = self.claim_version();
        self.resolve_as(version, ids).await
    }

    fn claim_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn resolve_as(&self, version: u64, ids: &[String]) -> Option<Vec<MealDetail>> {
        let meals = if ids.is_empty() {
            Vec::new()
        } else {
            let lookups = ids.iter().map(|id| self.catalog.lookup_by_id(id));
            join_all(lookups)
                .await
                .into_iter()
                .zip(ids)
                .filter_map(|(outcome, id)| match outcome {
                    Ok(meal) => Some(meal),
                    Err(CatalogError::NotFound) => {
                        debug!("Favorite {} no longer exists in the catalog", id);
                        None
                    }
                    Err(e) => {
                        warn!("Failed to resolve favorite {}: {}", id, e);
                        None
                    }
                })
                .collect()
        };

        // Checked under the channel's lock so a newer publish can't slip in between
        let applied = self.published.send_if_modified(|current| {
            if self.version.load(Ordering::SeqCst) != version {
                return false;
            }
            *current = meals.clone();
            true
        });

        if !applied {
            debug!("Discarding stale favorites resolution #{}", version);
            return None;
        }
        info!("Resolved {} of {} favorites", meals.len(), ids.len());
        Some(meals)
    }

    /// Most recently published favorite meals
    pub fn current(&self) -> Vec<MealDetail> {
        self.published.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<MealDetail>> {
        self.published.subscribe()
    }

    /// Re-resolve the full id list every time `favorites` changes
    ///
    /// The current list is resolved right away. Each resolution runs as its
    /// own task, so a slow earlier one never delays or overwrites a newer one.
    /// The returned task ends when the favorites sender is dropped.
    pub fn follow(
        self: Arc<Self>,
        mut favorites: watch::Receiver<Vec<String>>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let ids = favorites.borrow_and_update().clone();
                // Claimed before spawning so versions follow the order of changes
                let version = self.claim_version();
                let aggregator = Arc::clone(&self);
                tokio::spawn(async move {
                    aggregator.resolve_as(version, &ids).await;
                });

                if favorites.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}
