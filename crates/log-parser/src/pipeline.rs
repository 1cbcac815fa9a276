//! # Pipeline runner
//!
//! One run per inbound message:
//!
//! 1. find candidate URLs in the message text and its attachments
//! 2. hand every candidate to the retrievers whose predicate accepts it and
//!    union the bodies they return
//! 3. for each body, build a fresh [`Log`] and run the parser chain, then the
//!    processor chain
//! 4. fold the finished logs into a [`Report`]
//!
//! Handler failures never end a run. They are logged and that handler simply
//! contributes nothing.

use cozy_core::models::{Log, MessageEvent};
use futures::future::join_all;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{EventPredicate, PipelineConfig};
use crate::parsers::Parser;
use crate::processors::Processor;
use crate::retrievers::Retriever;

/// Longest rendered report, in characters, including the ellipsis.
pub const DISPLAY_LIMIT: usize = 4000;
pub const ELLIPSIS: char = '…';

/// A raw log body and the URL it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedBody {
    pub source: String,
    pub content: String,
}

/// An immutable, validated pipeline. Built by [`PipelineConfig::build`].
pub struct Pipeline {
    retrievers: Vec<Arc<dyn Retriever>>,
    parsers: Vec<Arc<dyn Parser>>,
    processors: Vec<Arc<dyn Processor>>,
    url_regex: Regex,
    global_predicates: Vec<EventPredicate>,
    staff_predicates: Vec<EventPredicate>,
    user_predicates: Vec<EventPredicate>,
}

impl Pipeline {
    pub(crate) fn new(config: PipelineConfig, url_regex: Regex) -> Self {
        Self {
            retrievers: config.retrievers,
            parsers: config.parsers,
            processors: config.processors,
            url_regex,
            global_predicates: config.global_predicates,
            staff_predicates: config.staff_predicates,
            user_predicates: config.user_predicates,
        }
    }

    pub fn retriever_ids(&self) -> Vec<&str> {
        self.retrievers.iter().map(|handler| handler.identifier()).collect()
    }

    pub fn parser_ids(&self) -> Vec<&str> {
        self.parsers.iter().map(|handler| handler.identifier()).collect()
    }

    pub fn processor_ids(&self) -> Vec<&str> {
        self.processors.iter().map(|handler| handler.identifier()).collect()
    }

    /// URLs captured by the URL pattern, in order of appearance, without
    /// duplicates. Matches that don't parse as URLs are skipped.
    pub fn extract_urls(&self, text: &str) -> Vec<Url> {
        let raw = self
            .url_regex
            .captures_iter(text)
            .filter_map(|captures| captures.get(1))
            .map(|group| group.as_str());

        dedup_urls(raw)
    }

    /// Attachment URLs first, then URLs found in the message text.
    pub fn candidate_urls(&self, event: &MessageEvent) -> Vec<Url> {
        let attachments = event.attachments.iter().map(|attachment| attachment.url.as_str());
        let links = self
            .url_regex
            .captures_iter(&event.content)
            .filter_map(|captures| captures.get(1))
            .map(|group| group.as_str());

        dedup_urls(attachments.chain(links))
    }

    /// Runs every accepting retriever, in order, against one URL.
    pub async fn retrieve_url(&self, url: &Url) -> HashSet<String> {
        let mut bodies = HashSet::new();

        for retriever in &self.retrievers {
            if !retriever.predicate(url) {
                continue;
            }

            match retriever.process(url).await {
                Ok(found) => {
                    debug!("Retriever {} found {} logs at {}", retriever.identifier(), found.len(), url);
                    bodies.extend(found);
                }
                Err(e) => warn!("Retriever {} failed for {}: {}", retriever.identifier(), url, e),
            }
        }

        bodies
    }

    /// Every distinct log body reachable from the message. Candidates are
    /// fetched concurrently; a body found via several URLs is kept once, under
    /// the first URL that produced it.
    pub async fn retrieve(&self, event: &MessageEvent) -> Vec<RetrievedBody> {
        let urls = self.candidate_urls(event);
        if urls.is_empty() {
            return Vec::new();
        }

        let results = join_all(urls.iter().map(|url| self.retrieve_url(url))).await;

        let mut seen = HashSet::new();
        let mut retrieved = Vec::new();

        for (url, bodies) in urls.iter().zip(results) {
            let mut bodies: Vec<String> = bodies.into_iter().collect();
            bodies.sort();

            for content in bodies {
                if seen.insert(content.clone()) {
                    retrieved.push(RetrievedBody {
                        source: url.to_string(),
                        content,
                    });
                }
            }
        }

        retrieved
    }

    /// Runs the parser chain over a fresh log.
    pub fn parse(&self, content: impl Into<String>) -> Log {
        let mut log = Log::new(content);
        self.parse_into(&mut log);
        log
    }

    fn parse_into(&self, log: &mut Log) {
        for parser in &self.parsers {
            if !parser.predicate(log) {
                debug!("Skipping parser {}", parser.identifier());
                continue;
            }

            if let Err(e) = parser.process(log) {
                warn!("Parser {} failed: {:?}", parser.identifier(), e);
            }
        }
    }

    /// Runs the processor chain over an already parsed log.
    pub async fn process(&self, log: &mut Log) {
        for processor in &self.processors {
            if !processor.predicate(log) {
                debug!("Skipping processor {}", processor.identifier());
                continue;
            }

            if let Err(e) = processor.process(log).await {
                warn!("Processor {} failed: {:?}", processor.identifier(), e);
            }
        }
    }

    /// Parses and processes one body.
    pub async fn analyse(&self, content: impl Into<String>, source: Option<String>) -> Log {
        let mut log = Log::new(content);
        log.source_url = source;

        self.parse_into(&mut log);
        self.process(&mut log).await;

        log
    }

    /// Retrieves, parses and processes every log attached to or linked from
    /// `event`, without checking any predicates.
    pub async fn run(&self, event: &MessageEvent) -> Report {
        let bodies = self.retrieve(event).await;
        if bodies.is_empty() {
            return Report::default();
        }

        info!("Analysing {} logs", bodies.len());
        let logs = join_all(
            bodies
                .into_iter()
                .map(|body| self.analyse(body.content, Some(body.source))),
        )
        .await;

        Report::from_logs(&logs)
    }

    /// True when every global predicate accepts `event`.
    pub fn accepts(&self, event: &MessageEvent) -> bool {
        all(&self.global_predicates, event)
    }

    pub fn staff_allowed(&self, invoker: &MessageEvent) -> bool {
        all(&self.staff_predicates, invoker)
    }

    pub fn user_allowed(&self, invoker: &MessageEvent) -> bool {
        all(&self.user_predicates, invoker)
    }

    /// Passive analysis of an inbound message. `None` when a global
    /// predicate rejects it.
    pub async fn handle_event(&self, event: &MessageEvent) -> Option<Report> {
        if !self.accepts(event) {
            debug!("Message from {} rejected by global predicates", event.author.id);
            return None;
        }

        Some(self.run(event).await)
    }

    /// On-demand analysis of `target` by a staff member. Global predicates
    /// are not applied to the target.
    pub async fn run_staff_command(
        &self,
        invoker: &MessageEvent,
        target: &MessageEvent,
    ) -> Option<Report> {
        if !self.staff_allowed(invoker) {
            return None;
        }

        Some(self.run(target).await)
    }

    /// On-demand analysis of `target` by any user; the target must also pass
    /// the global predicates.
    pub async fn run_user_command(
        &self,
        invoker: &MessageEvent,
        target: &MessageEvent,
    ) -> Option<Report> {
        if !self.user_allowed(invoker) || !self.accepts(target) {
            return None;
        }

        Some(self.run(target).await)
    }
}

fn all(predicates: &[EventPredicate], event: &MessageEvent) -> bool {
    predicates.iter().all(|predicate| predicate(event))
}

fn dedup_urls<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<Url> {
    let mut seen = HashSet::new();

    raw.filter_map(|candidate| match Url::parse(candidate) {
        Ok(url) => Some(url),
        Err(e) => {
            debug!("Ignoring {}: {}", candidate, e);
            None
        }
    })
    .filter(|url| seen.insert(url.to_string()))
    .collect()
}

/// What one analysed log contributes to a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogReport {
    pub source: Option<String>,
    pub messages: Vec<String>,
    pub abort_reason: Option<String>,
    pub has_problems: bool,
}

impl From<&Log> for LogReport {
    fn from(log: &Log) -> Self {
        Self {
            source: log.source_url.clone(),
            messages: log.messages().to_vec(),
            abort_reason: log.abort_reason().map(str::to_string),
            has_problems: log.has_problems(),
        }
    }
}

impl LogReport {
    /// The abort reason alone for aborted logs, otherwise the messages.
    pub fn visible(&self) -> Vec<&str> {
        match &self.abort_reason {
            Some(reason) => vec![reason.as_str()],
            None => self.messages.iter().map(String::as_str).collect(),
        }
    }
}

/// Aggregated findings for one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub logs: Vec<LogReport>,
}

impl Report {
    pub fn from_logs(logs: &[Log]) -> Self {
        Self {
            logs: logs.iter().map(LogReport::from).collect(),
        }
    }

    pub fn aborted(&self) -> bool {
        self.logs.iter().any(|log| log.abort_reason.is_some())
    }

    pub fn has_problems(&self) -> bool {
        self.logs.iter().any(|log| log.has_problems)
    }

    pub fn abort_messages(&self) -> Vec<&str> {
        self.logs
            .iter()
            .filter_map(|log| log.abort_reason.as_deref())
            .collect()
    }

    /// Logs whose output is shown. Once any log aborted, only aborted logs
    /// are shown.
    pub fn shown(&self) -> Vec<&LogReport> {
        let aborted = self.aborted();

        self.logs
            .iter()
            .filter(|log| !aborted || log.abort_reason.is_some())
            .filter(|log| !log.visible().is_empty())
            .collect()
    }

    /// Every line the user would see, in chain order.
    pub fn messages(&self) -> Vec<&str> {
        self.shown().into_iter().flat_map(LogReport::visible).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.shown().is_empty()
    }

    /// Renders the report as a bulleted list, truncated to [`DISPLAY_LIMIT`].
    ///
    /// With more than one log, each section is headed by its source.
    pub fn render(&self) -> String {
        let shown = self.shown();
        let labelled = self.logs.len() > 1;

        let sections: Vec<String> = shown
            .iter()
            .enumerate()
            .map(|(index, log)| {
                let body = log
                    .visible()
                    .into_iter()
                    .map(bullet)
                    .collect::<Vec<_>>()
                    .join("\n");
                if !labelled {
                    return body;
                }

                let label = log
                    .source
                    .clone()
                    .unwrap_or_else(|| format!("Log {}", index + 1));
                format!("**{}**\n{}", label, body)
            })
            .collect();

        truncate(&sections.join("\n\n"), DISPLAY_LIMIT)
    }
}

/// `- message`, with continuation lines indented under the bullet.
fn bullet(message: &str) -> String {
    format!("- {}", message.replace('\n', "\n  "))
}

/// Cuts `text` to at most `limit` characters, ending with [`ELLIPSIS`] when
/// anything was removed.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let mut truncated: String = text.chars().take(limit.saturating_sub(1)).collect();
    truncated.push(ELLIPSIS);
    truncated
}
