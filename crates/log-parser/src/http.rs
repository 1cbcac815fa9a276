//! # HTTP fetch capability
//!
//! Retrievers and remote version lookups only ever need a GET with a few
//! headers, so the network sits behind the small [`HttpFetcher`] trait.
//! [`ReqwestFetcher`] is the production implementation; tests substitute mocks.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const USER_AGENT: &str = concat!("cozy-log-parser/", env!("CARGO_PKG_VERSION"));

/// Header pairs sent with a request.
pub type Headers = [(String, String)];

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("Invalid response body from {url}: {reason}")]
    Body { url: String, reason: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }
}

#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Performs a GET and returns the raw body of a successful response.
    ///
    /// A 404 must be reported as [`FetchError::NotFound`].
    async fn fetch(&self, url: &Url, headers: &Headers) -> Result<Vec<u8>, FetchError>;
}

/// Fetches a body and decodes it as UTF-8, replacing invalid sequences.
pub async fn fetch_text(
    fetcher: &dyn HttpFetcher,
    url: &Url,
    headers: &Headers,
) -> Result<String, FetchError> {
    let bytes = fetcher.fetch(url, headers).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Fetches a body and deserializes it as JSON.
pub async fn fetch_json<T: DeserializeOwned>(
    fetcher: &dyn HttpFetcher,
    url: &Url,
) -> Result<T, FetchError> {
    let headers = [("Accept".to_string(), "application/json".to_string())];
    let bytes = fetcher.fetch(url, &headers).await?;

    serde_json::from_slice(&bytes).map_err(|e| FetchError::Body {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// [`HttpFetcher`] backed by a shared `reqwest` client.
///
/// Every request carries its own timeout, so one slow paste site never holds
/// up the other retrievals of the same message.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &Url, headers: &Headers) -> Result<Vec<u8>, FetchError> {
        debug!("GET {}", url);

        let mut request = self.client.get(url.clone()).timeout(self.timeout);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(|e| classify(url, e))?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| classify(url, e))?;
        Ok(body.to_vec())
    }
}

fn classify(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(url.to_string())
    } else {
        FetchError::Request(error)
    }
}
