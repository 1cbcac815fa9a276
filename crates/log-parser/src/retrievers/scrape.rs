use async_trait::async_trait;
use cozy_core::models::{Order, Ordered};
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use super::{RetrievalError, Retriever, fetch_all, fetch_body};
use crate::http::HttpFetcher;
use crate::pastebins::{CompiledPasteSites, CompiledScrape, ScrapeMode};

/// Fetches paste pages that only render logs as HTML and pulls the log out
/// with a CSS selector.
pub struct ScrapeRetriever {
    fetcher: Arc<dyn HttpFetcher>,
    sites: Arc<CompiledPasteSites>,
}

#[derive(Debug, PartialEq)]
pub enum Scraped {
    Text(Option<String>),
    Links(Vec<Url>),
}

impl ScrapeRetriever {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, sites: Arc<CompiledPasteSites>) -> Self {
        Self { fetcher, sites }
    }

    fn rule_for(&self, url: &Url) -> Option<&CompiledScrape> {
        self.sites
            .scrapes
            .iter()
            .find(|rule| rule.pattern.is_match(url.as_str()))
    }
}

/// Applies a scrape rule to a fetched page.
///
/// Relative links are resolved against `base`. The parsed document never
/// leaves this function, so callers stay `Send`.
pub fn extract(page: &str, rule: &CompiledScrape, base: &Url) -> Result<Scraped, RetrievalError> {
    let selector = Selector::parse(&rule.selector).map_err(|e| RetrievalError::Scrape {
        url: base.to_string(),
        reason: format!("{:?}", e),
    })?;
    let document = Html::parse_document(page);

    let scraped = match rule.mode {
        ScrapeMode::First => Scraped::Text(
            document
                .select(&selector)
                .next()
                .map(|element| element.text().collect::<String>())
                .filter(|text| !text.trim().is_empty()),
        ),
        ScrapeMode::Hrefs => Scraped::Links(
            document
                .select(&selector)
                .filter_map(|element| element.value().attr("href"))
                .filter_map(|href| base.join(href).ok())
                .collect(),
        ),
    };

    Ok(scraped)
}

impl Ordered for ScrapeRetriever {
    fn identifier(&self) -> &str {
        "scrape"
    }

    fn order(&self) -> Order {
        Order::Late
    }
}

#[async_trait]
impl Retriever for ScrapeRetriever {
    fn predicate(&self, url: &Url) -> bool {
        self.rule_for(url).is_some()
    }

    async fn process(&self, url: &Url) -> Result<HashSet<String>, RetrievalError> {
        let Some(rule) = self.rule_for(url) else {
            return Ok(HashSet::new());
        };

        let Some(page) = fetch_body(self.fetcher.as_ref(), url).await? else {
            return Ok(HashSet::new());
        };

        match extract(&page, rule, url)? {
            Scraped::Text(text) => Ok(text.into_iter().collect()),
            Scraped::Links(links) => {
                debug!("Following {} link(s) from {}", links.len(), url);
                fetch_all(self.fetcher.as_ref(), links).await
            }
        }
    }
}
