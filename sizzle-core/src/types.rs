use serde::{Deserialize, Serialize, Serializer};

use crate::error::NormalizeError;

/// Backend identifier of a recipe.
pub type RecipeId = i64;

/// An ingredient, either on the full shopping list or attached to a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Ingredient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            image_url: None,
        }
    }

    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }
}

/// A piece of kitchen equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Equipment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_url: None,
        }
    }
}

/// One instruction unit of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
    /// Unique within a recipe and stable across reloads.
    pub id: i64,
    pub instruction: String,
    /// Cooking verb tag ("chop", "simmer", ...). Free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub equipment: Vec<Equipment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_image_url: Option<String>,
}

impl RecipeStep {
    pub fn new(id: i64, instruction: impl Into<String>) -> Self {
        Self {
            id,
            instruction: instruction.into(),
            action: None,
            ingredients: Vec::new(),
            equipment: Vec::new(),
            step_image_url: None,
        }
    }
}

/// A normalized recipe.
///
/// Values only ever come out of [`crate::normalize::normalize`]; deserializing
/// goes through the same function, so any JSON shape the normalizer accepts
/// can be read straight into a `Recipe`.
///
/// Time fields are stored once and serialized under both the camel-case and
/// snake-case keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Recipe {
    pub id: Option<RecipeId>,
    pub title: String,
    pub description: String,
    pub prep_time: Option<String>,
    pub cook_time: Option<String>,
    /// Kept exactly as supplied; may be missing or non-positive.
    pub servings: Option<i64>,
    pub ingredients: Vec<Ingredient>,
    pub equipment: Vec<Equipment>,
    pub steps: Vec<RecipeStep>,
}

impl Recipe {
    /// Servings count when the source gave a usable (positive) one.
    pub fn positive_servings(&self) -> Option<u32> {
        self.servings
            .filter(|s| *s > 0)
            .and_then(|s| u32::try_from(s).ok())
    }

    /// Look up a step by its id.
    pub fn step(&self, id: i64) -> Option<&RecipeStep> {
        self.steps.iter().find(|s| s.id == id)
    }
}

impl TryFrom<serde_json::Value> for Recipe {
    type Error = NormalizeError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        crate::normalize::normalize(&value)
    }
}

/// Wire shape of a recipe with both time spellings populated.
#[derive(Serialize)]
struct RecipeWire<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<RecipeId>,
    title: &'a str,
    description: &'a str,
    #[serde(rename = "prepTime", skip_serializing_if = "Option::is_none")]
    prep_time_camel: Option<&'a str>,
    #[serde(rename = "prep_time", skip_serializing_if = "Option::is_none")]
    prep_time_snake: Option<&'a str>,
    #[serde(rename = "cookTime", skip_serializing_if = "Option::is_none")]
    cook_time_camel: Option<&'a str>,
    #[serde(rename = "cook_time", skip_serializing_if = "Option::is_none")]
    cook_time_snake: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    servings: Option<i64>,
    ingredients: &'a [Ingredient],
    equipment: &'a [Equipment],
    steps: &'a [RecipeStep],
}

impl Serialize for Recipe {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RecipeWire {
            id: self.id,
            title: &self.title,
            description: &self.description,
            prep_time_camel: self.prep_time.as_deref(),
            prep_time_snake: self.prep_time.as_deref(),
            cook_time_camel: self.cook_time.as_deref(),
            cook_time_snake: self.cook_time.as_deref(),
            servings: self.servings,
            ingredients: &self.ingredients,
            equipment: &self.equipment,
            steps: &self.steps,
        }
        .serialize(serializer)
    }
}

/// One page of the recipe listing endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipePage {
    pub recipes: Vec<Recipe>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

/// Query parameters for the recipe listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: u32,
    pub offset: u32,
    pub search: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
            search: None,
        }
    }
}
