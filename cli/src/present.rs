//! Plain-text rendering for the terminal.

use sizzle_core::{Recipe, RecipeStep};

pub fn overview(recipe: &Recipe) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", recipe.title));
    if !recipe.description.is_empty() {
        out.push_str(&format!("{}\n", recipe.description));
    }

    let mut facts = Vec::new();
    if let Some(prep) = &recipe.prep_time {
        facts.push(format!("prep {}", prep));
    }
    if let Some(cook) = &recipe.cook_time {
        facts.push(format!("cook {}", cook));
    }
    if let Some(servings) = recipe.positive_servings() {
        facts.push(format!("serves {}", servings));
    }
    if !facts.is_empty() {
        out.push_str(&format!("{}\n", facts.join(" | ")));
    }

    if !recipe.ingredients.is_empty() {
        out.push_str("\nIngredients:\n");
        for ingredient in &recipe.ingredients {
            match &ingredient.quantity {
                Some(quantity) => {
                    out.push_str(&format!("  - {} ({})\n", ingredient.name, quantity))
                }
                None => out.push_str(&format!("  - {}\n", ingredient.name)),
            }
        }
    }
    if !recipe.equipment.is_empty() {
        out.push_str("\nEquipment:\n");
        for equipment in &recipe.equipment {
            out.push_str(&format!("  - {}\n", equipment.name));
        }
    }
    out.push_str(&format!("\n{} steps\n", recipe.steps.len()));
    out
}

pub fn step(step: &RecipeStep, index: usize, total: usize) -> String {
    let mut out = format!("Step {}/{}", index + 1, total);
    if let Some(action) = &step.action {
        out.push_str(&format!(" [{}]", action));
    }
    out.push_str(&format!("\n  {}\n", step.instruction));

    let chips: Vec<&str> = step
        .ingredients
        .iter()
        .map(|i| i.name.as_str())
        .chain(step.equipment.iter().map(|e| e.name.as_str()))
        .collect();
    if !chips.is_empty() {
        out.push_str(&format!("  uses: {}\n", chips.join(", ")));
    }
    out
}

pub fn summary_line(recipe: &Recipe) -> String {
    let id = recipe
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    match &recipe.cook_time {
        Some(cook) => format!("{:>5}  {} ({})", id, recipe.title, cook),
        None => format!("{:>5}  {}", id, recipe.title),
    }
}
