#![allow(dead_code)]

use async_trait::async_trait;
use cozy_core::models::{LoaderKind, MessageEvent, Version};
use cozy_log_parser::config::PipelineConfig;
use cozy_log_parser::http::{FetchError, HttpFetcher};
use cozy_log_parser::pastebins::{CompiledPasteSites, PasteSiteConfig};
use cozy_log_parser::pipeline::Pipeline;
use cozy_log_parser::processors::{DEFAULT_RULES_URL, ProcessorContext};
use cozy_log_parser::sources::{LoaderVersionSource, ProjectVersionSource};
use mockall::mock;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

pub const QUILT_FIXTURE: &str = include_str!("../fixtures/quilt_1.19.3.log");

pub const ATTACHMENT_BASE: &str = "https://cdn.discordapp.com/attachments/1000/2000";

mock! {
    pub Fetcher {}

    #[async_trait]
    impl HttpFetcher for Fetcher {
        async fn fetch(&self, url: &Url, headers: &[(String, String)]) -> Result<Vec<u8>, FetchError>;
    }
}

/// A fetcher that serves fixed bodies by URL and reports everything else as
/// not found.
pub fn serving(pages: &[(&str, &str)]) -> MockFetcher {
    let pages: HashMap<String, Vec<u8>> = pages
        .iter()
        .map(|(url, body)| (url.to_string(), body.as_bytes().to_vec()))
        .collect();

    let mut fetcher = MockFetcher::new();
    fetcher.expect_fetch().returning(move |url, _| {
        pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    });

    fetcher
}

/// Version lookups with canned answers.
#[derive(Debug, Clone, Default)]
pub struct StaticVersions {
    pub loader: Option<Version>,
    pub project: Option<Version>,
}

#[async_trait]
impl LoaderVersionSource for StaticVersions {
    async fn latest(&self, _kind: LoaderKind) -> Result<Option<Version>, FetchError> {
        Ok(self.loader.clone())
    }
}

#[async_trait]
impl ProjectVersionSource for StaticVersions {
    async fn latest(
        &self,
        _project: &str,
        _loader: LoaderKind,
        _game_version: &Version,
    ) -> Result<Option<Version>, FetchError> {
        Ok(self.project.clone())
    }
}

pub fn context(versions: StaticVersions) -> ProcessorContext {
    let versions = Arc::new(versions);

    ProcessorContext {
        loader_versions: versions.clone(),
        project_versions: versions,
        rules_url: DEFAULT_RULES_URL.to_string(),
        expected_loader: LoaderKind::Quilt,
    }
}

pub fn sites() -> Arc<CompiledPasteSites> {
    Arc::new(PasteSiteConfig::builtin().unwrap().compile().unwrap())
}

pub fn default_config(fetcher: MockFetcher) -> PipelineConfig {
    PipelineConfig::with_defaults(
        Arc::new(fetcher),
        PasteSiteConfig::builtin().unwrap(),
        context(StaticVersions::default()),
    )
    .unwrap()
}

pub fn pipeline(fetcher: MockFetcher) -> Pipeline {
    default_config(fetcher).build().unwrap()
}

/// A pipeline that never touches the network.
pub fn offline_pipeline() -> Pipeline {
    pipeline(MockFetcher::new())
}

pub fn attachment_url(filename: &str) -> String {
    format!("{}/{}", ATTACHMENT_BASE, filename)
}

pub fn message_with_attachment(filename: &str) -> MessageEvent {
    MessageEvent::new("my game crashed").with_attachment(filename, &attachment_url(filename))
}
