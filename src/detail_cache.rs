use crate::catalog::CatalogClient;
use crate::error::CatalogError;
use crate::model::MealDetail;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

type Outcome = Result<Arc<MealDetail>, CatalogError>;
type InFlight = Shared<BoxFuture<'static, Outcome>>;

enum Entry {
    Loading(InFlight),
    Loaded(Arc<MealDetail>),
    Failed(CatalogError),
}

/// Load state of one meal's detail record
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    NotRequested,
    Loading,
    Loaded(Arc<MealDetail>),
    Failed(CatalogError),
}

/// Per-identifier memoizing fetch of full meal records
///
/// Each id is looked up at most once while it succeeds: callers arriving
/// during the lookup share the in-flight future, callers arriving after it
/// get the cached record. A failed lookup (including `NotFound`) is kept
/// until the next `ensure`, which retries it.
pub struct MealDetailCache {
    catalog: Arc<dyn CatalogClient>,
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MealDetailCache {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        MealDetailCache {
            catalog,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Return the detail for `id`, fetching it if it isn't cached yet
    pub async fn ensure(&self, id: &str) -> Result<Arc<MealDetail>, CatalogError> {
        let fetch = {
            let mut entries = self.entries.lock().await;
            match entries.get(id) {
                Some(Entry::Loaded(detail)) => return Ok(Arc::clone(detail)),
                Some(Entry::Loading(fetch)) => {
                    debug!("Joining in-flight detail fetch for {}", id);
                    fetch.clone()
                }
                Some(Entry::Failed(_)) | None => {
                    let fetch = self.start_fetch(id);
                    entries.insert(id.to_string(), Entry::Loading(fetch.clone()));
                    fetch
                }
            }
        };

        fetch.await
    }

    /// Current load state for `id`, without triggering a fetch
    pub async fn state(&self, id: &str) -> DetailState {
        match self.entries.lock().await.get(id) {
            None => DetailState::NotRequested,
            Some(Entry::Loading(_)) => DetailState::Loading,
            Some(Entry::Loaded(detail)) => DetailState::Loaded(Arc::clone(detail)),
            Some(Entry::Failed(err)) => DetailState::Failed(err.clone()),
        }
    }

    /// The lookup records its own terminal state, so it settles exactly once
    /// no matter how many callers are awaiting it.
    fn start_fetch(&self, id: &str) -> InFlight {
        let catalog = Arc::clone(&self.catalog);
        let entries = Arc::clone(&self.entries);
        let id = id.to_string();
        debug!("Fetching detail for {}", id);

        async move {
            let outcome = catalog.lookup_by_id(&id).await.map(Arc::new);
            let entry = match &outcome {
                Ok(detail) => Entry::Loaded(Arc::clone(detail)),
                Err(err) => {
                    debug!("Detail fetch for {} failed: {}", id, err);
                    Entry::Failed(err.clone())
                }
            };
            entries.lock().await.insert(id, entry);
            outcome
        }
        .boxed()
        .shared()
    }
}
