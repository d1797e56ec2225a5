//! HTTP client trait and implementations.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::config::SizzleConfig;
use crate::error::FetchError;

/// Trait for HTTP clients, enabling mockability in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET a URL and return the body as text.
    ///
    /// Non-2xx responses are returned as [`FetchError::Status`] carrying the
    /// response body, so callers can classify them.
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        (**self).get_text(url).await
    }
}

/// Configuration for [`ReqwestClient`].
#[derive(Clone)]
pub struct ReqwestClientBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for ReqwestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestClientBuilder {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Start from the timeout and user agent in a loaded config.
    pub fn from_config(config: &SizzleConfig) -> Self {
        Self {
            timeout: config.timeout,
            user_agent: config.user_agent.clone(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn build(self) -> Result<ReqwestClient, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;

        Ok(ReqwestClient {
            inner: Arc::new(inner),
        })
    }
}

/// Production HTTP client backed by reqwest.
#[derive(Clone)]
pub struct ReqwestClient {
    /// Shared reqwest client for connection pooling.
    inner: Arc<reqwest::Client>,
}

impl ReqwestClient {
    /// Create a client with default settings.
    pub fn new() -> Result<Self, reqwest::Error> {
        ReqwestClientBuilder::new().build()
    }

    pub fn builder() -> ReqwestClientBuilder {
        ReqwestClientBuilder::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        tracing::debug!(url, "network: fetching");
        let response = self.inner.get(parsed).send().await?;
        let status = response.status();

        let bytes = response.bytes().await?;
        let body = String::from_utf8(bytes.to_vec())
            .map_err(|e| FetchError::InvalidEncoding(format!("Invalid UTF-8 in response: {}", e)))?;

        if !status.is_success() {
            tracing::debug!(url, %status, "network: request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(url, %status, "network: fetched successfully");
        Ok(body)
    }
}

/// Mock response for testing.
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// 200 with this body.
    Body(String),
    /// Non-2xx status with this body.
    Status(u16, String),
    /// Transport failure.
    Error(String),
}

#[derive(Clone, Debug)]
struct MockEntry {
    response: MockResponse,
    delay: Option<Duration>,
}

/// Mock HTTP client for testing.
///
/// Responses registered for the same URL are served in order; the last one
/// keeps being served once the queue is down to a single entry.
#[derive(Default)]
pub struct MockClient {
    responses: Mutex<HashMap<String, VecDeque<MockEntry>>>,
    requests: Mutex<Vec<String>>,
}

impl MockClient {
    /// Create a new empty mock client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response for a URL.
    pub fn with_response(self, url: &str, response: MockResponse) -> Self {
        self.push(url, response, None)
    }

    /// Add a response that is only delivered after `delay`.
    pub fn with_delayed_response(self, url: &str, response: MockResponse, delay: Duration) -> Self {
        self.push(url, response, Some(delay))
    }

    /// Add a 200 response with a JSON body.
    pub fn with_json(self, url: &str, body: &serde_json::Value) -> Self {
        self.with_response(url, MockResponse::Body(body.to_string()))
    }

    /// Add a non-2xx response.
    pub fn with_status(self, url: &str, status: u16) -> Self {
        self.with_response(url, MockResponse::Status(status, String::new()))
    }

    /// Add a transport error for a URL.
    pub fn with_error(self, url: &str, error: &str) -> Self {
        self.with_response(url, MockResponse::Error(error.to_string()))
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }

    fn push(self, url: &str, response: MockResponse, delay: Option<Duration>) -> Self {
        lock(&self.responses)
            .entry(url.to_string())
            .or_default()
            .push_back(MockEntry { response, delay });
        self
    }

    fn next_entry(&self, url: &str) -> Option<MockEntry> {
        let mut responses = lock(&self.responses);
        let queue = responses.get_mut(url)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl HttpClient for MockClient {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        lock(&self.requests).push(url.to_string());

        let Some(entry) = self.next_entry(url) else {
            return Err(FetchError::Transport(format!(
                "no mock response registered for {}",
                url
            )));
        };

        if let Some(delay) = entry.delay {
            tokio::time::sleep(delay).await;
        }

        match entry.response {
            MockResponse::Body(body) => Ok(body),
            MockResponse::Status(status, body) => Err(FetchError::Status { status, body }),
            MockResponse::Error(e) => Err(FetchError::Transport(e)),
        }
    }
}
