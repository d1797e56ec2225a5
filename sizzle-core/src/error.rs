use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("HTTP {status}")]
    Status { status: u16, body: String },

    #[error("Invalid response encoding: {0}")]
    InvalidEncoding(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl FetchError {
    /// HTTP status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Expected a JSON object for a recipe, got {0}")]
    NotAnObject(&'static str),
}

/// Error kinds surfaced to the presentation layer.
///
/// Every variant is recoverable by retrying the load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Recipe not found")]
    NotFound,

    #[error("Failed to fetch recipe: {0}")]
    FetchFailed(String),

    #[error("Malformed recipe response: {0}")]
    MalformedResponse(String),
}

impl From<FetchError> for LoadError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Status { status: 404, .. } => LoadError::NotFound,
            FetchError::InvalidEncoding(msg) => LoadError::MalformedResponse(msg),
            other if other.status() == Some(404) => LoadError::NotFound,
            other => LoadError::FetchFailed(other.to_string()),
        }
    }
}

impl From<NormalizeError> for LoadError {
    fn from(err: NormalizeError) -> Self {
        LoadError::MalformedResponse(err.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::MalformedResponse(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Failed to read fixture: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid fixture JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("Fixture recipe '{0}' has no id")]
    MissingId(String),
}
