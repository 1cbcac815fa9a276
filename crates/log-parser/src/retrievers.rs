//! # Retrievers
//!
//! A retriever turns a URL (a pasted link or a message attachment) into zero
//! or more raw log bodies. The runner asks every retriever whose predicate
//! accepts the URL and takes the union of what they return; a failing
//! retriever only loses its own contribution.

use async_trait::async_trait;
use cozy_core::models::Ordered;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::http::{FetchError, HttpFetcher, fetch_text};
use crate::pastebins::CompiledPasteSites;

pub mod attachment;
pub mod direct;
pub mod scrape;

pub use attachment::AttachmentRetriever;
pub use direct::DirectPasteRetriever;
pub use scrape::ScrapeRetriever;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unable to scrape {url}: {reason}")]
    Scrape { url: String, reason: String },
}

#[async_trait]
pub trait Retriever: Ordered + Send + Sync {
    /// Cheap check run before any network access.
    fn predicate(&self, url: &Url) -> bool;

    async fn process(&self, url: &Url) -> Result<HashSet<String>, RetrievalError>;
}

/// The built-in retrievers in their default order.
pub fn default_retrievers(
    fetcher: Arc<dyn HttpFetcher>,
    sites: Arc<CompiledPasteSites>,
) -> Vec<Arc<dyn Retriever>> {
    vec![
        Arc::new(AttachmentRetriever::new(fetcher.clone())),
        Arc::new(DirectPasteRetriever::new(fetcher.clone(), sites.clone())),
        Arc::new(ScrapeRetriever::new(fetcher, sites)),
    ]
}

/// Fetches one body, treating "not found" and blank responses as no result.
pub(crate) async fn fetch_body(
    fetcher: &dyn HttpFetcher,
    url: &Url,
) -> Result<Option<String>, RetrievalError> {
    match fetch_text(fetcher, url, &[]).await {
        Ok(text) if text.trim().is_empty() => Ok(None),
        Ok(text) => Ok(Some(text)),
        Err(FetchError::NotFound(_)) => {
            debug!("Nothing found at {}", url);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn parse_url(raw: &str) -> Result<Url, RetrievalError> {
    Url::parse(raw).map_err(|e| RetrievalError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Fetches every URL concurrently and unions the bodies.
///
/// Individual failures are logged and skipped; the first error is returned
/// only when nothing at all could be fetched.
pub(crate) async fn fetch_all(
    fetcher: &dyn HttpFetcher,
    urls: Vec<Url>,
) -> Result<HashSet<String>, RetrievalError> {
    let results = futures::future::join_all(urls.iter().map(|url| fetch_body(fetcher, url))).await;

    let mut bodies = HashSet::new();
    let mut first_error = None;

    for (url, result) in urls.iter().zip(results) {
        match result {
            Ok(Some(body)) => {
                bodies.insert(body);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", url, e);
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) if bodies.is_empty() => Err(e),
        _ => Ok(bodies),
    }
}
