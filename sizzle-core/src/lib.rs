pub mod api;
pub mod config;
pub mod decor;
pub mod error;
pub mod http;
pub mod loader;
pub mod navigator;
pub mod normalize;
pub mod session;
pub mod source;
pub mod types;

pub use api::RecipeApi;
pub use config::{ConfigError, SizzleConfig};
pub use decor::{BackgroundDecoration, DecorationHost, LayerSpec, MountGuard};
pub use error::{FetchError, FixtureError, LoadError, NormalizeError};
pub use http::{HttpClient, MockClient, MockResponse, ReqwestClient, ReqwestClientBuilder};
pub use loader::{LoadPhase, LoadTicket, LoaderState, RecipeLoader};
pub use navigator::{NavigationError, NavigatorOptions, StepNavigator, Transition};
pub use normalize::{normalize, normalize_str};
pub use session::PresentationSession;
pub use source::{FixtureSource, RecipeSource};
pub use types::{Equipment, Ingredient, ListQuery, Recipe, RecipeId, RecipePage, RecipeStep};
