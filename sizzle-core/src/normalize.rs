//! Recipe normalization.
//!
//! Upstream sources disagree on field naming: the backend speaks snake case
//! (`prep_time`, `step_image`), fixtures and older clients speak camel case
//! (`prepTime`, `stepImageUrl`), and either side may send only one half of a
//! pair. Everything that enters the crate as JSON is funnelled through
//! [`normalize`] so consumers only ever see the canonical [`Recipe`].
//!
//! Precedence for every alias group is "first non-blank wins", with the
//! snake-case spelling listed first. Normalizing the serialized output of a
//! normalized recipe yields the same recipe.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::NormalizeError;
use crate::types::{Equipment, Ingredient, Recipe, RecipeStep};

const PREP_TIME_KEYS: &[&str] = &["prep_time", "prepTime"];
const COOK_TIME_KEYS: &[&str] = &["cook_time", "cookTime"];
const IMAGE_URL_KEYS: &[&str] = &["image_url", "imageUrl", "url"];
const STEP_IMAGE_KEYS: &[&str] = &["step_image", "step_image_url", "image_url", "stepImageUrl"];

/// Normalize an arbitrary JSON value into a [`Recipe`].
///
/// Only a non-object root is rejected. Missing or mistyped fields fall back
/// to empty strings and empty lists.
pub fn normalize(raw: &Value) -> Result<Recipe, NormalizeError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| NormalizeError::NotAnObject(json_kind(raw)))?;

    Ok(Recipe {
        id: obj.get("id").and_then(as_integer),
        title: text(obj, "title").unwrap_or_default(),
        description: text(obj, "description").unwrap_or_default(),
        prep_time: resolve(obj, PREP_TIME_KEYS),
        cook_time: resolve(obj, COOK_TIME_KEYS),
        servings: obj.get("servings").and_then(as_integer),
        ingredients: normalize_ingredients(list(obj, "ingredients")),
        equipment: normalize_equipment(list(obj, "equipment")),
        steps: normalize_steps(list(obj, "steps")),
    })
}

/// Parse a JSON string and normalize it.
pub fn normalize_str(json: &str) -> Result<Recipe, crate::error::LoadError> {
    let value: Value = serde_json::from_str(json)?;
    Ok(normalize(&value)?)
}

/// Normalize the step list and make step ids unique.
///
/// The first step to claim an explicit `id` (or `step_number`) keeps it.
/// Steps without one, and later duplicates, get their 1-based position when
/// that is free, otherwise the next id above everything already taken.
fn normalize_steps(values: &[Value]) -> Vec<RecipeStep> {
    let parsed: Vec<(usize, Option<i64>, RecipeStep)> = values
        .iter()
        .enumerate()
        .filter_map(|(position, value)| {
            let (explicit, step) = normalize_step(value, position)?;
            Some((position, explicit, step))
        })
        .collect();

    let mut taken = HashSet::new();
    let keeps: Vec<bool> = parsed
        .iter()
        .map(|(_, explicit, _)| explicit.is_some_and(|id| taken.insert(id)))
        .collect();
    let mut next_free = taken.iter().max().map_or(1, |max| max.saturating_add(1));

    parsed
        .into_iter()
        .zip(keeps)
        .map(|((position, explicit, mut step), keep)| {
            if keep {
                return step;
            }
            let fallback = position as i64 + 1;
            if !taken.insert(fallback) {
                while !taken.insert(next_free) {
                    next_free += 1;
                }
                step.id = next_free;
            } else {
                step.id = fallback;
            }
            if let Some(duplicate) = explicit {
                tracing::warn!(duplicate, assigned = step.id, "renumbering duplicate step id");
            }
            step
        })
        .collect()
}

/// A single step plus the id it asked for, if any. The id on the returned
/// step is only final once [`normalize_steps`] has checked it.
fn normalize_step(value: &Value, position: usize) -> Option<(Option<i64>, RecipeStep)> {
    let obj = value.as_object()?;

    let Some(instruction) = text(obj, "instruction") else {
        tracing::warn!(position, "step has no instruction, skipping");
        return None;
    };

    let explicit = obj
        .get("id")
        .and_then(as_integer)
        .or_else(|| obj.get("step_number").and_then(as_integer));

    let step = RecipeStep {
        id: explicit.unwrap_or(position as i64 + 1),
        instruction,
        action: text(obj, "action"),
        ingredients: normalize_ingredients(list(obj, "ingredients")),
        equipment: normalize_equipment(list(obj, "equipment")),
        step_image_url: resolve(obj, STEP_IMAGE_KEYS),
    };
    Some((explicit, step))
}

fn normalize_ingredients(values: &[Value]) -> Vec<Ingredient> {
    values
        .iter()
        .filter_map(|value| match value {
            Value::String(name) if !name.trim().is_empty() => Some(Ingredient::new(name.clone())),
            Value::Object(obj) => {
                let name = text(obj, "name")?;
                Some(Ingredient {
                    name,
                    quantity: quantity_with_unit(obj),
                    image_url: resolve(obj, IMAGE_URL_KEYS),
                })
            }
            _ => {
                tracing::debug!(?value, "dropping ingredient without a name");
                None
            }
        })
        .collect()
}

fn normalize_equipment(values: &[Value]) -> Vec<Equipment> {
    values
        .iter()
        .filter_map(|value| match value {
            Value::String(name) if !name.trim().is_empty() => Some(Equipment::new(name.clone())),
            Value::Object(obj) => Some(Equipment {
                name: text(obj, "name")?,
                image_url: resolve(obj, IMAGE_URL_KEYS),
            }),
            _ => {
                tracing::debug!(?value, "dropping equipment without a name");
                None
            }
        })
        .collect()
}

/// Backend rows keep `quantity` and `unit` in separate columns; fold them
/// into one display string.
fn quantity_with_unit(obj: &Map<String, Value>) -> Option<String> {
    match (text(obj, "quantity"), text(obj, "unit")) {
        (Some(quantity), Some(unit)) => Some(format!("{} {}", quantity, unit)),
        (quantity, unit) => quantity.or(unit),
    }
}

/// Resolve an alias group to a single value: the first non-blank key wins.
fn resolve(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    let mut found = keys.iter().filter_map(|key| text(obj, key));
    let winner = found.next()?;
    if let Some(loser) = found.find(|other| *other != winner) {
        tracing::debug!(
            field = keys[0],
            kept = %winner,
            discarded = %loser,
            "conflicting field spellings"
        );
    }
    Some(winner)
}

/// A non-blank string field. Numbers and booleans are rendered as text.
fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn list<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    obj.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
