mod storage;

pub use storage::{FavoritesStorage, FileStorage, MemoryStorage};

use crate::error::FinderError;
use indexmap::IndexSet;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// Durable, insertion-ordered set of favorite meal ids
///
/// The in-memory set is authoritative for the running session. Every
/// mutation is written through the storage backend before `toggle` returns,
/// but a failed write is only logged.
pub struct FavoritesStore {
    storage: Arc<dyn FavoritesStorage>,
    // Held across the save so concurrent toggles serialize their read-modify-write
    set: Mutex<IndexSet<String>>,
    published: watch::Sender<Vec<String>>,
}

impl FavoritesStore {
    /// Initialize from the backend's record
    ///
    /// A missing, unreadable or malformed record yields an empty set.
    pub async fn load(storage: Arc<dyn FavoritesStorage>) -> Self {
        let set = match storage.load().await {
            Ok(Some(record)) => decode(&record).unwrap_or_else(|e| {
                warn!("{}; starting with no favorites", e);
                IndexSet::new()
            }),
            Ok(None) => IndexSet::new(),
            Err(e) => {
                warn!("Failed to read favorites record: {}", e);
                IndexSet::new()
            }
        };
        info!("Loaded {} favorites", set.len());

        let (published, _) = watch::channel::<Vec<String>>(set.iter().cloned().collect());
        FavoritesStore {
            storage,
            set: Mutex::new(set),
            published,
        }
    }

    /// Add `id` if absent, remove it if present, then persist
    ///
    /// Returns whether `id` is a favorite afterwards.
    pub async fn toggle(&self, id: &str) -> bool {
        let mut set = self.set.lock().await;
        let added = if set.shift_remove(id) {
            false
        } else {
            set.insert(id.to_string());
            true
        };
        debug!("Favorite {} {}", id, if added { "added" } else { "removed" });

        // Published before the save so a dropped toggle can't leave readers behind the set
        let ids: Vec<String> = set.iter().cloned().collect();
        self.published.send_replace(ids.clone());
        self.persist(&ids).await;
        added
    }

    pub fn contains(&self, id: &str) -> bool {
        self.published.borrow().iter().any(|favorite| favorite == id)
    }

    /// Favorite ids in insertion order
    pub fn ids(&self) -> Vec<String> {
        self.published.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.published.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Receive the ordered id list after every mutation
    pub fn subscribe(&self) -> watch::Receiver<Vec<String>> {
        self.published.subscribe()
    }

    async fn persist(&self, ids: &[String]) {
        let record = match serde_json::to_string(ids) {
            Ok(record) => record,
            Err(e) => {
                error!("Failed to encode favorites: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.save(&record).await {
            error!("Failed to save favorites: {}", e);
        }
    }
}

/// Parse a stored record: a JSON array of id strings, duplicates collapsed
fn decode(record: &str) -> Result<IndexSet<String>, FinderError> {
    let ids: Vec<String> = serde_json::from_str(record)
        .map_err(|e| FinderError::MalformedPersistedState(e.to_string()))?;
    Ok(ids.into_iter().collect())
}
