use async_trait::async_trait;
use cozy_core::models::Ordered;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use super::{RetrievalError, Retriever, fetch_all, parse_url};
use crate::http::HttpFetcher;
use crate::pastebins::CompiledPasteSites;

/// Downloads paste sites that serve raw text, rewriting page URLs into raw
/// URLs with the paste-site transforms first.
pub struct DirectPasteRetriever {
    fetcher: Arc<dyn HttpFetcher>,
    sites: Arc<CompiledPasteSites>,
}

impl DirectPasteRetriever {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, sites: Arc<CompiledPasteSites>) -> Self {
        Self { fetcher, sites }
    }

    /// Raw URLs to request for `url`; raw patterns win over transforms and the
    /// first matching transform is used.
    pub fn targets(&self, url: &Url) -> Option<Vec<String>> {
        let input = url.as_str();

        if self.sites.raw.iter().any(|pattern| pattern.is_match(input)) {
            return Some(vec![input.to_string()]);
        }

        self.sites
            .transforms
            .iter()
            .find_map(|transform| transform.apply(input))
    }
}

impl Ordered for DirectPasteRetriever {
    fn identifier(&self) -> &str {
        "direct-paste"
    }
}

#[async_trait]
impl Retriever for DirectPasteRetriever {
    fn predicate(&self, url: &Url) -> bool {
        self.targets(url).is_some()
    }

    async fn process(&self, url: &Url) -> Result<HashSet<String>, RetrievalError> {
        let targets = self.targets(url).unwrap_or_default();
        debug!("Resolved {} to {} raw URL(s)", url, targets.len());

        let mut seen = HashSet::new();
        let urls = targets
            .iter()
            .filter(|target| seen.insert(target.as_str()))
            .filter_map(|target| match parse_url(target) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    warn!("Skipping paste target: {}", e);
                    None
                }
            })
            .collect();

        fetch_all(self.fetcher.as_ref(), urls).await
    }
}
