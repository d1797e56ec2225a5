//! Where recipes come from: the backend API or local fixtures.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::api::RecipeApi;
use crate::error::{FixtureError, LoadError};
use crate::http::HttpClient;
use crate::normalize::normalize;
use crate::types::{ListQuery, Recipe, RecipeId, RecipePage};

/// Anything the loader can ask for a recipe by id.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn fetch_recipe(&self, id: RecipeId) -> Result<Recipe, LoadError>;
}

#[async_trait]
impl<C: HttpClient> RecipeSource for RecipeApi<C> {
    async fn fetch_recipe(&self, id: RecipeId) -> Result<Recipe, LoadError> {
        RecipeApi::fetch_recipe(self, id).await
    }
}

#[async_trait]
impl<S: RecipeSource + ?Sized> RecipeSource for Arc<S> {
    async fn fetch_recipe(&self, id: RecipeId) -> Result<Recipe, LoadError> {
        (**self).fetch_recipe(id).await
    }
}

/// In-memory recipes, typically read from JSON fixture files.
#[derive(Debug, Default, Clone)]
pub struct FixtureSource {
    recipes: HashMap<RecipeId, Recipe>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a recipe under an explicit id.
    pub fn with_recipe(mut self, id: RecipeId, recipe: Recipe) -> Self {
        self.recipes.insert(id, recipe);
        self
    }

    /// Parse fixture JSON: a single recipe object or an array of them.
    ///
    /// Each recipe must carry an `id`.
    pub fn from_json_str(json: &str) -> Result<Self, FixtureError> {
        let value: Value = serde_json::from_str(json)?;
        let items = match value {
            Value::Array(items) => items,
            other => vec![other],
        };

        let mut source = Self::new();
        for item in &items {
            let recipe = normalize(item)?;
            let id = recipe
                .id
                .ok_or_else(|| FixtureError::MissingId(recipe.title.clone()))?;
            source.recipes.insert(id, recipe);
        }
        Ok(source)
    }

    /// Read a fixture file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn ids(&self) -> Vec<RecipeId> {
        let mut ids: Vec<_> = self.recipes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Page through the fixtures the way the backend listing does: a
    /// case-insensitive substring match on title or description, ordered by id.
    pub fn list(&self, query: &ListQuery) -> RecipePage {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let matching: Vec<&Recipe> = self
            .ids()
            .into_iter()
            .filter_map(|id| self.recipes.get(&id))
            .filter(|recipe| match &needle {
                Some(needle) => {
                    recipe.title.to_lowercase().contains(needle)
                        || recipe.description.to_lowercase().contains(needle)
                }
                None => true,
            })
            .collect();

        RecipePage {
            total: matching.len() as u64,
            recipes: matching
                .into_iter()
                .skip(query.offset as usize)
                .take(query.limit as usize)
                .cloned()
                .collect(),
            limit: query.limit,
            offset: query.offset,
        }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[async_trait]
impl RecipeSource for FixtureSource {
    async fn fetch_recipe(&self, id: RecipeId) -> Result<Recipe, LoadError> {
        self.recipes.get(&id).cloned().ok_or(LoadError::NotFound)
    }
}
