use crate::catalog::CatalogClient;
use crate::error::{CatalogError, FinderError};
use crate::model::{MealDetail, MealsEnvelope, SearchResult};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// TheMealDB over HTTPS
pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl MealDbClient {
    /// Create a client for `base_url` with the given request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FinderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("meal-finder/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(MealDbClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String) -> Self {
        MealDbClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// GET `{base_url}/{endpoint}?{param}={value}` and decode the meals envelope
    async fn fetch(
        &self,
        endpoint: &str,
        param: &str,
        value: &str,
    ) -> Result<MealsEnvelope, CatalogError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {}={}", url, param, value);

        let response = self
            .client
            .get(&url)
            .query(&[(param, value)])
            .send()
            .await?
            .error_for_status()?;

        let envelope: MealsEnvelope = response.json().await?;
        Ok(envelope)
    }
}

impl Default for MealDbClient {
    fn default() -> Self {
        MealDbClient::with_base_url(DEFAULT_BASE_URL.to_string())
    }
}

#[async_trait]
impl CatalogClient for MealDbClient {
    async fn search_by_area(&self, term: &str) -> Result<SearchResult, CatalogError> {
        let envelope = self.fetch("filter.php", "a", term).await?;
        let meals = envelope
            .meals
            .unwrap_or_default()
            .into_iter()
            .map(|record| record.into_summary())
            .collect();
        Ok(SearchResult::from_meals(meals))
    }

    async fn search_by_name(&self, term: &str) -> Result<SearchResult, CatalogError> {
        let envelope = self.fetch("search.php", "s", term).await?;
        let meals = envelope
            .meals
            .unwrap_or_default()
            .into_iter()
            .map(|record| record.into_summary())
            .collect();
        Ok(SearchResult::from_meals(meals))
    }

    async fn lookup_by_id(&self, id: &str) -> Result<MealDetail, CatalogError> {
        let envelope = self.fetch("lookup.php", "i", id).await?;
        envelope
            .meals
            .and_then(|meals| meals.into_iter().next())
            .map(|record| record.into_detail())
            .ok_or(CatalogError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_search_by_area() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/filter.php")
            .match_query(Matcher::UrlEncoded("a".into(), "Italian".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"meals": [
                    {"strMeal": "Budino Di Ricotta", "strMealThumb": "https://example.com/1.jpg", "idMeal": "52961"},
                    {"strMeal": "Chicken Alfredo Primavera", "strMealThumb": "https://example.com/2.jpg", "idMeal": "52796"}
                ]}"#,
            )
            .create_async()
            .await;

        let client = MealDbClient::with_base_url(server.url());
        let result = client.search_by_area("Italian").await.unwrap();

        match result {
            SearchResult::Found(meals) => {
                assert_eq!(meals.len(), 2);
                assert_eq!(meals[0].id, "52961");
                assert_eq!(meals[1].name, "Chicken Alfredo Primavera");
            }
            SearchResult::NoResults => panic!("Expected meals"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_by_name_null_meals_is_no_results() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search.php")
            .match_query(Matcher::UrlEncoded("s".into(), "zzzznotarealterm".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"meals": null}"#)
            .create_async()
            .await;

        let client = MealDbClient::with_base_url(server.url());
        let result = client.search_by_name("zzzznotarealterm").await;

        assert_eq!(result, Ok(SearchResult::NoResults));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_term_is_query_encoded() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search.php")
            .match_query(Matcher::UrlEncoded("s".into(), "mac & cheese".into()))
            .with_status(200)
            .with_body(r#"{"meals": []}"#)
            .create_async()
            .await;

        let client = MealDbClient::with_base_url(server.url());
        let result = client.search_by_name("mac & cheese").await;

        assert_eq!(result, Ok(SearchResult::NoResults));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_lookup_by_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/lookup.php")
            .match_query(Matcher::UrlEncoded("i".into(), "52772".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"meals": [{
                    "idMeal": "52772",
                    "strMeal": "Teriyaki Chicken Casserole",
                    "strMealThumb": "https://example.com/t.jpg",
                    "strArea": "Japanese",
                    "strCategory": "Chicken",
                    "strInstructions": "Preheat oven to 350.",
                    "strTags": "Meat, Casserole",
                    "strIngredient1": "soy sauce",
                    "strMeasure1": "3/4 cup"
                }]}"#,
            )
            .create_async()
            .await;

        let client = MealDbClient::with_base_url(server.url());
        let detail = client.lookup_by_id("52772").await.unwrap();

        assert_eq!(detail.name(), "Teriyaki Chicken Casserole");
        assert_eq!(detail.tags, vec!["Meat", "Casserole"]);
        assert_eq!(detail.ingredients.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_lookup_missing_is_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/lookup.php")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"meals": null}"#)
            .create_async()
            .await;

        let client = MealDbClient::with_base_url(server.url());
        let result = client.lookup_by_id("1").await;

        assert_eq!(result, Err(CatalogError::NotFound));
    }

    #[tokio::test]
    async fn test_server_error_is_fetch_failed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/filter.php")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = MealDbClient::with_base_url(server.url());
        let result = client.search_by_area("Italian").await;

        assert!(matches!(result, Err(CatalogError::FetchFailed(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_fetch_failed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/lookup.php")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let client = MealDbClient::with_base_url(server.url());
        let result = client.lookup_by_id("52772").await;

        assert!(matches!(result, Err(CatalogError::FetchFailed(_))));
    }
}
