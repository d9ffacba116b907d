//! In-process catalog stub for unit tests

use crate::catalog::CatalogClient;
use crate::error::CatalogError;
use crate::model::{MealDetail, MealSummary, SearchResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type Scripted<T> = (Duration, Result<T, CatalogError>);

/// Catalog whose answers and latencies are scripted per term or id.
/// Unknown terms answer `NoResults`, unknown ids answer `NotFound`.
#[derive(Default)]
pub(crate) struct StubCatalog {
    areas: HashMap<String, Scripted<SearchResult>>,
    names: HashMap<String, Scripted<SearchResult>>,
    meals: HashMap<String, Scripted<MealDetail>>,
    lookups: Mutex<Vec<String>>,
    searches: AtomicUsize,
}

impl StubCatalog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn area(
        mut self,
        term: &str,
        delay_ms: u64,
        result: Result<SearchResult, CatalogError>,
    ) -> Self {
        self.areas
            .insert(term.to_string(), (Duration::from_millis(delay_ms), result));
        self
    }

    pub(crate) fn name(
        mut self,
        term: &str,
        delay_ms: u64,
        result: Result<SearchResult, CatalogError>,
    ) -> Self {
        self.names
            .insert(term.to_string(), (Duration::from_millis(delay_ms), result));
        self
    }

    pub(crate) fn meal(
        mut self,
        id: &str,
        delay_ms: u64,
        result: Result<MealDetail, CatalogError>,
    ) -> Self {
        self.meals
            .insert(id.to_string(), (Duration::from_millis(delay_ms), result));
        self
    }

    /// Ids passed to `lookup_by_id`, in call order
    pub(crate) fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub(crate) fn lookup_count(&self, id: &str) -> usize {
        self.lookups().iter().filter(|looked_up| *looked_up == id).count()
    }

    pub(crate) fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    async fn answer<T: Clone>(
        scripted: Option<&Scripted<T>>,
        missing: Result<T, CatalogError>,
    ) -> Result<T, CatalogError> {
        match scripted {
            Some((delay, result)) => {
                tokio::time::sleep(*delay).await;
                result.clone()
            }
            None => missing,
        }
    }
}

#[async_trait]
impl CatalogClient for StubCatalog {
    async fn search_by_area(&self, term: &str) -> Result<SearchResult, CatalogError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        Self::answer(self.areas.get(term), Ok(SearchResult::NoResults)).await
    }

    async fn search_by_name(&self, term: &str) -> Result<SearchResult, CatalogError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        Self::answer(self.names.get(term), Ok(SearchResult::NoResults)).await
    }

    async fn lookup_by_id(&self, id: &str) -> Result<MealDetail, CatalogError> {
        self.lookups.lock().unwrap().push(id.to_string());
        Self::answer(self.meals.get(id), Err(CatalogError::NotFound)).await
    }
}

pub(crate) fn summary(id: &str, name: &str) -> MealSummary {
    MealSummary {
        id: id.to_string(),
        name: name.to_string(),
        thumbnail: format!("https://example.com/{}.jpg", id),
        area: None,
        category: None,
    }
}

pub(crate) fn detail(id: &str, name: &str) -> MealDetail {
    MealDetail {
        summary: summary(id, name),
        instructions: Some("Cook it.".to_string()),
        tags: Vec::new(),
        ingredients: Vec::new(),
        source: None,
        youtube: None,
    }
}

pub(crate) fn found(meals: &[(&str, &str)]) -> Result<SearchResult, CatalogError> {
    Ok(SearchResult::Found(
        meals.iter().map(|(id, name)| summary(id, name)).collect(),
    ))
}
