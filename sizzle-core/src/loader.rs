//! Recipe fetch life cycle.
//!
//! The loader publishes a [`LoaderState`] snapshot over a `tokio::sync::watch`
//! channel. Every load takes a [`LoadTicket`] stamped with a generation
//! number; only the ticket matching the current generation may commit, so
//! the last `load` wins and responses for an abandoned id are dropped.
//!
//! A failed load leaves the previously loaded recipe in place.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info_span, Instrument};

use crate::error::LoadError;
use crate::source::RecipeSource;
use crate::types::{Recipe, RecipeId};

/// Coarse phase derived from a [`LoaderState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Success,
    Failure,
}

/// Snapshot of the loader, as seen by the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct LoaderState {
    pub is_loading: bool,
    pub recipe: Option<Arc<Recipe>>,
    pub error: Option<LoadError>,
    /// Identifier of the most recent load request.
    pub recipe_id: Option<RecipeId>,
    generation: u64,
}

impl LoaderState {
    pub fn phase(&self) -> LoadPhase {
        if self.is_loading {
            LoadPhase::Loading
        } else if self.error.is_some() {
            LoadPhase::Failure
        } else if self.recipe.is_some() {
            LoadPhase::Success
        } else {
            LoadPhase::Idle
        }
    }

    /// User-facing error text.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Proof of a started load; hand it back to [`RecipeLoader::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub recipe_id: RecipeId,
    generation: u64,
}

/// Drives loads from a [`RecipeSource`] and publishes their outcome.
pub struct RecipeLoader<S> {
    source: S,
    state: watch::Sender<LoaderState>,
}

impl<S: RecipeSource> RecipeLoader<S> {
    pub fn new(source: S) -> Self {
        let (state, _) = watch::channel(LoaderState::default());
        Self { source, state }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<LoaderState> {
        self.state.subscribe()
    }

    /// Current snapshot.
    pub fn state(&self) -> LoaderState {
        self.state.borrow().clone()
    }

    /// Enter `Loading` for `recipe_id`, clearing any previous error.
    pub fn begin(&self, recipe_id: RecipeId) -> LoadTicket {
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            state.is_loading = true;
            state.error = None;
            state.recipe_id = Some(recipe_id);
            generation = state.generation;
        });
        LoadTicket {
            recipe_id,
            generation,
        }
    }

    /// Commit the outcome of a load.
    ///
    /// Returns `false`, leaving state untouched, when a newer load or a
    /// cancellation has superseded the ticket.
    pub fn complete(&self, ticket: LoadTicket, result: Result<Recipe, LoadError>) -> bool {
        self.state.send_if_modified(|state| {
            if state.generation != ticket.generation {
                tracing::debug!(
                    recipe_id = ticket.recipe_id,
                    ticket = ticket.generation,
                    current = state.generation,
                    "discarding stale recipe response"
                );
                return false;
            }

            state.is_loading = false;
            match result {
                Ok(recipe) => {
                    state.recipe = Some(Arc::new(recipe));
                    state.error = None;
                }
                Err(e) => {
                    tracing::debug!(recipe_id = ticket.recipe_id, error = %e, "recipe load failed");
                    state.error = Some(e);
                }
            }
            true
        })
    }

    /// Fetch `recipe_id` and publish the result.
    ///
    /// Returns whether this call's result was the one committed.
    pub async fn load(&self, recipe_id: RecipeId) -> bool {
        let ticket = self.begin(recipe_id);
        let result = self
            .source
            .fetch_recipe(recipe_id)
            .instrument(info_span!("recipe_load", recipe_id))
            .await;
        self.complete(ticket, result)
    }

    /// Repeat the most recent load. Does nothing if nothing was ever loaded.
    pub async fn retry(&self) -> bool {
        let last = self.state.borrow().recipe_id;
        match last {
            Some(recipe_id) => self.load(recipe_id).await,
            None => false,
        }
    }

    /// Abandon any in-flight load; its response will be discarded.
    pub fn cancel(&self) {
        self.state.send_if_modified(|state| {
            state.generation += 1;
            let was_loading = state.is_loading;
            state.is_loading = false;
            was_loading
        });
    }

    /// Install a recipe that did not come from the source, e.g. a fixture.
    ///
    /// Supersedes any in-flight load.
    pub fn load_fixture(&self, recipe: Recipe) {
        let recipe_id = recipe.id.unwrap_or_default();
        let ticket = self.begin(recipe_id);
        self.complete(ticket, Ok(recipe));
    }
}
