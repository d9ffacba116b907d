use crate::catalog::CatalogClient;
use crate::error::CatalogError;
use crate::model::{MealSummary, SearchMode, SearchResult};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Cuisines offered as one-click searches
pub const POPULAR_CUISINES: &[&str] = &[
    "Italian",
    "Chinese",
    "Indian",
    "Mexican",
    "Japanese",
    "American",
    "French",
    "Thai",
    "British",
    "Greek",
    "Turkish",
    "Vietnamese",
];

/// Meal names offered as one-click searches
pub const SUGGESTED_NAMES: &[&str] = &["Chicken", "Beef", "Pasta", "Rice", "Soup", "Cake"];

/// Where the current search stands
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    /// No search performed yet
    #[default]
    Idle,
    Searching,
    Succeeded(Vec<MealSummary>),
    /// The catalog had no meals for the term
    Empty,
    Failed(CatalogError),
}

impl SearchState {
    /// Meals to display; empty unless the last search succeeded
    pub fn results(&self) -> &[MealSummary] {
        match self {
            SearchState::Succeeded(meals) => meals,
            _ => &[],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SearchState::Succeeded(_) | SearchState::Empty | SearchState::Failed(_)
        )
    }
}

/// Drives searches against the catalog, one logically current at a time
///
/// Each search claims a version number as it starts; a search that settles
/// after a newer one has started leaves the state alone.
pub struct SearchOrchestrator {
    catalog: Arc<dyn CatalogClient>,
    version: AtomicU64,
    state: watch::Sender<SearchState>,
}

impl SearchOrchestrator {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        SearchOrchestrator {
            catalog,
            version: AtomicU64::new(0),
            state,
        }
    }

    /// Search the catalog for `term` along `mode`
    ///
    /// A blank term is ignored and returns `None`. Otherwise returns the
    /// terminal state this search produced, or `None` if a newer search
    /// superseded it.
    pub async fn search(&self, term: &str, mode: SearchMode) -> Option<SearchState> {
        let term = term.trim();
        if term.is_empty() {
            debug!("Ignoring blank search");
            return None;
        }

        let mut version = 0;
        let mut previous = SearchState::Idle;
        self.state.send_modify(|state| {
            version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
            previous = std::mem::replace(state, SearchState::Searching);
        });
        let mut pending = PendingSearch {
            orchestrator: self,
            version,
            previous: Some(previous),
        };
        debug!("Search #{} for '{}' by {}", version, term, mode);

        let outcome = match mode {
            SearchMode::ByCuisine => self.catalog.search_by_area(term).await,
            SearchMode::ByName => self.catalog.search_by_name(term).await,
        };

        let next = match outcome {
            Ok(SearchResult::Found(meals)) => {
                info!("Found {} meals for '{}'", meals.len(), term);
                SearchState::Succeeded(meals)
            }
            Ok(SearchResult::NoResults) | Err(CatalogError::NotFound) => {
                info!("No meals found for '{}'", term);
                SearchState::Empty
            }
            Err(e) => {
                warn!("Search for '{}' failed: {}", term, e);
                SearchState::Failed(e)
            }
        };

        pending.previous = None;
        let applied = self.state.send_if_modified(|state| {
            if self.version.load(Ordering::SeqCst) != version {
                return false;
            }
            *state = next.clone();
            true
        });

        if applied {
            Some(next)
        } else {
            debug!("Discarding stale search #{} for '{}'", version, term);
            None
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }
}

/// Puts back the state a search replaced if the search is dropped before
/// it settles, so a cancelled search doesn't leave `Searching` behind
struct PendingSearch<'a> {
    orchestrator: &'a SearchOrchestrator,
    version: u64,
    previous: Option<SearchState>,
}

impl Drop for PendingSearch<'_> {
    fn drop(&mut self) {
        let Some(previous) = self.previous.take() else {
            return;
        };
        // A superseded search's `Searching` is stale too; fall back to Idle
        let previous = if previous.is_terminal() {
            previous
        } else {
            SearchState::Idle
        };
        let version = self.version;
        let orchestrator = self.orchestrator;
        orchestrator.state.send_if_modified(|state| {
            if orchestrator.version.load(Ordering::SeqCst) != version {
                return false;
            }
            debug!("Search #{} cancelled; restoring previous state", version);
            *state = previous;
            true
        });
    }
}
