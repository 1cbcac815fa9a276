//! # Pipeline configuration
//!
//! [`PipelineConfig`] lists the retrievers, parsers and processors to run,
//! the regex used to find URLs in message text, and three lists of gating
//! predicates. It is assembled once at startup with consuming `with_*` /
//! `replace_*` / `without_*` methods and turned into an immutable
//! [`Pipeline`] by [`PipelineConfig::build`], which validates it and sorts
//! every handler list by [`Order`](cozy_core::models::Order).

use cozy_core::errors::{CozyError, CozyResult};
use cozy_core::models::{LoaderKind, MessageEvent, Ordered, sort_by_order};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::http::{HttpFetcher, ReqwestFetcher};
use crate::parsers::{Parser, default_parsers};
use crate::pastebins::PasteSiteConfig;
use crate::pipeline::Pipeline;
use crate::processors::{Processor, ProcessorContext, default_processors};
use crate::retrievers::{Retriever, default_retrievers};
use crate::settings::ParserSettings;
use crate::sources::{MetaLoaderVersions, ModrinthVersions};

/// Matches `http(s)` links up to whitespace, quotes, brackets or markdown
/// delimiters. Group 1 is the URL.
pub const DEFAULT_URL_PATTERN: &str = r#"(https?://[^\s<>"'`()\[\]|]+)"#;

/// Gate evaluated against the event that triggered a run.
pub type EventPredicate = Arc<dyn Fn(&MessageEvent) -> bool + Send + Sync>;

#[derive(Clone)]
pub struct PipelineConfig {
    pub retrievers: Vec<Arc<dyn Retriever>>,
    pub parsers: Vec<Arc<dyn Parser>>,
    pub processors: Vec<Arc<dyn Processor>>,
    pub url_pattern: String,
    pub global_predicates: Vec<EventPredicate>,
    pub staff_predicates: Vec<EventPredicate>,
    pub user_predicates: Vec<EventPredicate>,
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("retrievers", &identifiers(&self.retrievers))
            .field("parsers", &identifiers(&self.parsers))
            .field("processors", &identifiers(&self.processors))
            .field("url_pattern", &self.url_pattern)
            .field("global_predicates", &self.global_predicates.len())
            .field("staff_predicates", &self.staff_predicates.len())
            .field("user_predicates", &self.user_predicates.len())
            .finish()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineConfig {
    /// An empty configuration using [`DEFAULT_URL_PATTERN`].
    pub fn new() -> Self {
        Self {
            retrievers: Vec::new(),
            parsers: Vec::new(),
            processors: Vec::new(),
            url_pattern: DEFAULT_URL_PATTERN.to_string(),
            global_predicates: Vec::new(),
            staff_predicates: Vec::new(),
            user_predicates: Vec::new(),
        }
    }

    /// The built-in handler set, ignoring messages from bots.
    pub fn with_defaults(
        fetcher: Arc<dyn HttpFetcher>,
        sites: PasteSiteConfig,
        context: ProcessorContext,
    ) -> CozyResult<Self> {
        let sites = Arc::new(sites.compile()?);

        Ok(Self {
            retrievers: default_retrievers(fetcher, sites),
            parsers: default_parsers(),
            processors: default_processors(context),
            ..Self::new()
        }
        .with_global_predicate(not_bot()))
    }

    /// The production configuration: `reqwest` for HTTP, live version
    /// lookups, and the paste-site table from `settings` or the built-in one.
    pub fn from_settings(settings: &ParserSettings) -> CozyResult<Self> {
        let fetcher: Arc<dyn HttpFetcher> = Arc::new(
            ReqwestFetcher::new(settings.fetch_timeout)
                .map_err(|e| CozyError::InvalidConfig(format!("Unable to build HTTP client: {}", e)))?,
        );

        let sites = match &settings.pastebins_path {
            Some(path) => PasteSiteConfig::from_path(path)?,
            None => PasteSiteConfig::builtin()?,
        };

        let context = ProcessorContext {
            loader_versions: Arc::new(MetaLoaderVersions::new(fetcher.clone(), settings.cache_ttl)),
            project_versions: Arc::new(ModrinthVersions::new(fetcher.clone(), settings.cache_ttl)),
            rules_url: settings.rules_url.clone(),
            expected_loader: LoaderKind::Quilt,
        };

        Self::with_defaults(fetcher, sites, context)
    }

    pub fn with_retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retrievers.push(retriever);
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn Parser>) -> Self {
        self.parsers.push(parser);
        self
    }

    pub fn with_processor(mut self, processor: Arc<dyn Processor>) -> Self {
        self.processors.push(processor);
        self
    }

    /// Swaps in `retriever` for the one with the same identifier, or adds it.
    pub fn replace_retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        replace(&mut self.retrievers, retriever);
        self
    }

    pub fn replace_parser(mut self, parser: Arc<dyn Parser>) -> Self {
        replace(&mut self.parsers, parser);
        self
    }

    pub fn replace_processor(mut self, processor: Arc<dyn Processor>) -> Self {
        replace(&mut self.processors, processor);
        self
    }

    pub fn without_retriever(mut self, identifier: &str) -> Self {
        self.retrievers.retain(|handler| handler.identifier() != identifier);
        self
    }

    pub fn without_parser(mut self, identifier: &str) -> Self {
        self.parsers.retain(|handler| handler.identifier() != identifier);
        self
    }

    pub fn without_processor(mut self, identifier: &str) -> Self {
        self.processors.retain(|handler| handler.identifier() != identifier);
        self
    }

    pub fn with_url_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.url_pattern = pattern.into();
        self
    }

    pub fn with_global_predicate(mut self, predicate: EventPredicate) -> Self {
        self.global_predicates.push(predicate);
        self
    }

    pub fn with_staff_predicate(mut self, predicate: EventPredicate) -> Self {
        self.staff_predicates.push(predicate);
        self
    }

    pub fn with_user_predicate(mut self, predicate: EventPredicate) -> Self {
        self.user_predicates.push(predicate);
        self
    }

    /// Validates the configuration and freezes it into a [`Pipeline`].
    ///
    /// # Errors
    ///
    /// [`CozyError::InvalidConfig`] if the URL pattern doesn't compile or has
    /// no capture group, or if two handlers of one kind share an identifier.
    pub fn build(mut self) -> CozyResult<Pipeline> {
        let url_regex = Regex::new(&self.url_pattern).map_err(|e| {
            CozyError::InvalidConfig(format!("Invalid URL pattern {}: {}", self.url_pattern, e))
        })?;

        if url_regex.captures_len() < 2 {
            return Err(CozyError::InvalidConfig(format!(
                "URL pattern {} needs a capture group",
                self.url_pattern
            )));
        }

        check_unique("retriever", &self.retrievers)?;
        check_unique("parser", &self.parsers)?;
        check_unique("processor", &self.processors)?;

        sort_by_order(&mut self.retrievers);
        sort_by_order(&mut self.parsers);
        sort_by_order(&mut self.processors);

        info!(
            "Log pipeline ready with {} retrievers, {} parsers and {} processors",
            self.retrievers.len(),
            self.parsers.len(),
            self.processors.len()
        );

        Ok(Pipeline::new(self, url_regex))
    }
}

fn replace<T: Ordered + ?Sized>(handlers: &mut Vec<Arc<T>>, handler: Arc<T>) {
    match handlers
        .iter_mut()
        .find(|existing| existing.identifier() == handler.identifier())
    {
        Some(existing) => *existing = handler,
        None => handlers.push(handler),
    }
}

fn check_unique<T: Ordered + ?Sized>(kind: &str, handlers: &[Arc<T>]) -> CozyResult<()> {
    let mut seen = HashSet::new();

    for handler in handlers {
        if !seen.insert(handler.identifier()) {
            return Err(CozyError::InvalidConfig(format!(
                "Duplicate {} identifier: {}",
                kind,
                handler.identifier()
            )));
        }
    }

    Ok(())
}

fn identifiers<T: Ordered + ?Sized>(handlers: &[Arc<T>]) -> Vec<&str> {
    handlers.iter().map(|handler| handler.identifier()).collect()
}

/// Rejects messages written by bots, including this one.
pub fn not_bot() -> EventPredicate {
    Arc::new(|event: &MessageEvent| !event.author.bot)
}

/// Accepts events from the given channels; an empty list accepts all.
pub fn in_channels(channel_ids: Vec<u64>) -> EventPredicate {
    Arc::new(move |event: &MessageEvent| {
        channel_ids.is_empty() || channel_ids.contains(&event.channel_id)
    })
}

/// Accepts events whose author holds at least one of the roles.
pub fn has_any_role(role_ids: Vec<u64>) -> EventPredicate {
    Arc::new(move |event: &MessageEvent| {
        event.author.role_ids.iter().any(|role| role_ids.contains(role))
    })
}
