//! Typed access to the recipe backend.
//!
//! The backend wraps most payloads in `{"status", "status_code", "data"}` and
//! reports errors as `{"status": "error", "message": ...}`. Recipe generation
//! responses instead carry `{"matching_recipes": [...]}`. All three shapes are
//! accepted here before the body reaches the normalizer.

use serde_json::Value;
use url::Url;

use crate::error::{FetchError, LoadError};
use crate::http::HttpClient;
use crate::normalize::normalize;
use crate::types::{ListQuery, Recipe, RecipeId, RecipePage};

/// Client for the `/recipes` endpoints.
pub struct RecipeApi<C> {
    client: C,
    base_url: Url,
}

impl<C: HttpClient> RecipeApi<C> {
    /// Create an API client rooted at `base_url` (e.g. `http://localhost:8000`).
    pub fn new(client: C, base_url: &str) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// `{base_url}/recipes/{id}`
    pub fn recipe_url(&self, id: RecipeId) -> String {
        format!("{}/recipes/{}", self.base(), id)
    }

    /// `{base_url}/recipes?limit=..&offset=..[&search=..]`
    pub fn list_url(&self, query: &ListQuery) -> String {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}/recipes", self.base_url.path().trim_end_matches('/')));
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("limit", &query.limit.to_string())
                .append_pair("offset", &query.offset.to_string());
            if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
                pairs.append_pair("search", search);
            }
        }
        url.to_string()
    }

    /// Fetch and normalize a single recipe.
    pub async fn fetch_recipe(&self, id: RecipeId) -> Result<Recipe, LoadError> {
        let url = self.recipe_url(id);
        let body = self.get_json(&url).await?;
        let recipe_value = recipe_payload(body).ok_or(LoadError::NotFound)?;
        Ok(normalize(&recipe_value)?)
    }

    /// Fetch one page of the recipe listing.
    pub async fn list_recipes(&self, query: &ListQuery) -> Result<RecipePage, LoadError> {
        let url = self.list_url(query);
        let body = unwrap_envelope(self.get_json(&url).await?);

        let recipes = body
            .get("recipes")
            .and_then(Value::as_array)
            .ok_or_else(|| LoadError::MalformedResponse("missing 'recipes' array".to_string()))?
            .iter()
            .map(normalize)
            .collect::<Result<Vec<_>, _>>()?;

        let number =
            |key: &str, default: u64| body.get(key).and_then(Value::as_u64).unwrap_or(default);

        Ok(RecipePage {
            total: number("total", recipes.len() as u64),
            limit: u32::try_from(number("limit", query.limit.into())).unwrap_or(query.limit),
            offset: u32::try_from(number("offset", query.offset.into())).unwrap_or(query.offset),
            recipes,
        })
    }

    fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    async fn get_json(&self, url: &str) -> Result<Value, LoadError> {
        match self.client.get_text(url).await {
            Ok(body) => Ok(serde_json::from_str(&body)?),
            Err(FetchError::Status { status, body }) if status != 404 => {
                let message = error_message(&body).unwrap_or_else(|| format!("HTTP {}", status));
                Err(LoadError::FetchFailed(message))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Strip the `{"status": .., "data": ..}` envelope if present.
fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("status") && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Locate the recipe object inside a response body.
///
/// Returns `None` for an empty `matching_recipes` list.
fn recipe_payload(body: Value) -> Option<Value> {
    match unwrap_envelope(body) {
        Value::Object(mut map) if map.contains_key("matching_recipes") => {
            match map.remove("matching_recipes") {
                Some(Value::Array(matches)) => matches.into_iter().next(),
                _ => None,
            }
        }
        other => Some(other),
    }
}

/// Pull `message` (or FastAPI's `detail`) out of an error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "detail"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{MockClient, MockResponse};
    use serde_json::json;

    const BASE: &str = "http://api.test";

    fn api(client: MockClient) -> RecipeApi<MockClient> {
        RecipeApi::new(client, BASE).unwrap()
    }

    #[test]
    fn test_urls() {
        let api = RecipeApi::new(MockClient::new(), "http://api.test/v1/").unwrap();
        assert_eq!(api.recipe_url(42), "http://api.test/v1/recipes/42");

        let query = ListQuery {
            limit: 5,
            offset: 10,
            search: Some("pad thai".to_string()),
        };
        assert_eq!(
            api.list_url(&query),
            "http://api.test/v1/recipes?limit=5&offset=10&search=pad+thai"
        );
    }

    #[tokio::test]
    async fn test_fetch_unwraps_envelope() {
        let client = MockClient::new().with_json(
            "http://api.test/recipes/42",
            &json!({
                "status": "success",
                "status_code": 200,
                "data": {"id": 42, "title": "Ramen", "prep_time": "10 mins"}
            }),
        );
        let recipe = api(client).fetch_recipe(42).await.unwrap();
        assert_eq!(recipe.id, Some(42));
        assert_eq!(recipe.prep_time.as_deref(), Some("10 mins"));
    }

    #[tokio::test]
    async fn test_fetch_bare_recipe() {
        let client = MockClient::new().with_json(
            "http://api.test/recipes/1",
            &json!({"id": 1, "title": "Toast", "status": "draft"}),
        );
        let recipe = api(client).fetch_recipe(1).await.unwrap();
        assert_eq!(recipe.title, "Toast");
    }

    #[tokio::test]
    async fn test_fetch_matching_recipes() {
        let client = MockClient::new().with_json(
            "http://api.test/recipes/3",
            &json!({"matching_recipes": [{"title": "First"}, {"title": "Second"}]}),
        );
        let recipe = api(client).fetch_recipe(3).await.unwrap();
        assert_eq!(recipe.title, "First");

        let empty = MockClient::new()
            .with_json("http://api.test/recipes/4", &json!({"matching_recipes": []}));
        assert_eq!(api(empty).fetch_recipe(4).await, Err(LoadError::NotFound));
    }

    #[tokio::test]
    async fn test_fetch_404_is_not_found() {
        let client = MockClient::new().with_status("http://api.test/recipes/99", 404);
        assert_eq!(api(client).fetch_recipe(99).await, Err(LoadError::NotFound));
    }

    #[tokio::test]
    async fn test_fetch_500_uses_envelope_message() {
        let client = MockClient::new().with_response(
            "http://api.test/recipes/5",
            MockResponse::Status(
                500,
                json!({"status": "error", "message": "database offline"}).to_string(),
            ),
        );
        assert_eq!(
            api(client).fetch_recipe(5).await,
            Err(LoadError::FetchFailed("database offline".to_string()))
        );
    }

    #[tokio::test]
    async fn test_fetch_transport_error() {
        let client = MockClient::new().with_error("http://api.test/recipes/6", "connection reset");
        let err = api(client).fetch_recipe(6).await.unwrap_err();
        assert!(matches!(err, LoadError::FetchFailed(msg) if msg.contains("connection reset")));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let client = MockClient::new().with_response(
            "http://api.test/recipes/7",
            MockResponse::Body("<html>oops</html>".to_string()),
        );
        let err = api(client).fetch_recipe(7).await.unwrap_err();
        assert!(matches!(err, LoadError::MalformedResponse(_)));

        let client = MockClient::new().with_json("http://api.test/recipes/8", &json!([1, 2]));
        let err = api(client).fetch_recipe(8).await.unwrap_err();
        assert!(matches!(err, LoadError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_list_recipes() {
        let client = MockClient::new().with_json(
            "http://api.test/recipes?limit=10&offset=0",
            &json!({
                "status": "success",
                "status_code": 200,
                "data": {
                    "recipes": [
                        {"id": 2, "title": "Soup", "cook_time": "30 mins"},
                        {"id": 1, "title": "Toast"}
                    ],
                    "total": 12,
                    "limit": 10,
                    "offset": 0
                }
            }),
        );
        let page = api(client).list_recipes(&ListQuery::default()).await.unwrap();
        assert_eq!(page.total, 12);
        assert_eq!(page.recipes.len(), 2);
        assert_eq!(page.recipes[0].cook_time.as_deref(), Some("30 mins"));
    }
}
