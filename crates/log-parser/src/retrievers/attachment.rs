use async_trait::async_trait;
use cozy_core::models::{Order, Ordered};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

use super::{RetrievalError, Retriever, fetch_body};
use crate::http::HttpFetcher;

pub const DEFAULT_DOMAINS: &[&str] = &["cdn.discordapp.com", "media.discordapp.net"];
pub const DEFAULT_EXTENSIONS: &[&str] = &["log", "txt"];

/// Downloads log files uploaded as message attachments.
///
/// Only trusted attachment hosts are accepted, and only files ending in a log
/// extension or without any extension at all.
pub struct AttachmentRetriever {
    fetcher: Arc<dyn HttpFetcher>,
    domains: Vec<String>,
    extensions: Vec<String>,
}

impl AttachmentRetriever {
    pub fn new(fetcher: Arc<dyn HttpFetcher>) -> Self {
        Self::with_domains(fetcher, DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect())
    }

    pub fn with_domains(fetcher: Arc<dyn HttpFetcher>, domains: Vec<String>) -> Self {
        Self {
            fetcher,
            domains,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    fn accepts_filename(&self, filename: &str) -> bool {
        if filename.is_empty() {
            return false;
        }

        match filename.rsplit_once('.') {
            Some((_, extension)) => self
                .extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(extension)),
            None => true,
        }
    }
}

impl Ordered for AttachmentRetriever {
    fn identifier(&self) -> &str {
        "attachment"
    }

    fn order(&self) -> Order {
        Order::Early
    }
}

#[async_trait]
impl Retriever for AttachmentRetriever {
    fn predicate(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };

        if !self.domains.iter().any(|domain| domain.eq_ignore_ascii_case(host)) {
            return false;
        }

        let filename = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();

        self.accepts_filename(filename)
    }

    async fn process(&self, url: &Url) -> Result<HashSet<String>, RetrievalError> {
        Ok(fetch_body(self.fetcher.as_ref(), url).await?.into_iter().collect())
    }
}
