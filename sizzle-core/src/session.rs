//! Binds loader output to a step navigator.

use std::sync::Arc;

use crate::loader::LoaderState;
use crate::navigator::{NavigatorOptions, StepNavigator};
use crate::types::Recipe;

/// The recipe currently on screen together with its navigation state.
///
/// Recipe and navigator are only ever swapped together, so a reader never
/// sees a new recipe paired with the previous recipe's step index.
#[derive(Debug)]
pub struct PresentationSession {
    recipe: Option<Arc<Recipe>>,
    navigator: StepNavigator,
    options: NavigatorOptions,
}

impl PresentationSession {
    /// An empty session; `options` only applies to the first recipe shown.
    pub fn new(options: NavigatorOptions) -> Self {
        Self {
            recipe: None,
            navigator: StepNavigator::new(Vec::new(), options),
            options,
        }
    }

    /// Start with a recipe already in place.
    pub fn with_recipe(recipe: Arc<Recipe>, options: NavigatorOptions) -> Self {
        let navigator = StepNavigator::new(recipe.steps.clone(), options);
        Self {
            recipe: Some(recipe),
            navigator,
            options,
        }
    }

    /// Follow a loader snapshot. Returns `true` when the recipe changed.
    ///
    /// Loading and failure snapshots keep whatever is already displayed.
    pub fn sync(&mut self, state: &LoaderState) -> bool {
        let Some(incoming) = &state.recipe else {
            return false;
        };
        if let Some(current) = &self.recipe {
            if Arc::ptr_eq(current, incoming) {
                return false;
            }
        }

        self.replace(Arc::clone(incoming));
        true
    }

    /// Show a different recipe from the first step.
    ///
    /// The first recipe opens according to the session options; any later
    /// replacement starts with the overlay closed.
    pub fn replace(&mut self, recipe: Arc<Recipe>) {
        tracing::debug!(recipe_id = ?recipe.id, steps = recipe.steps.len(), "presenting recipe");
        if self.recipe.is_none() {
            self.navigator = StepNavigator::new(recipe.steps.clone(), self.options);
        } else {
            self.navigator.replace_steps(recipe.steps.clone());
        }
        self.recipe = Some(recipe);
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        self.recipe.as_deref()
    }

    pub fn navigator(&self) -> &StepNavigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut StepNavigator {
        &mut self.navigator
    }

    /// Overview screen is showing (no step overlay).
    pub fn is_overview(&self) -> bool {
        !self.navigator.is_overlay_open()
    }
}
