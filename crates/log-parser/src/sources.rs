//! # Remote version lookups
//!
//! Processors compare what a log reports against the newest published
//! releases. Lookups go through small traits so processors can be tested
//! without the network; the production implementations cache responses in a
//! [`TtlCache`].

use async_trait::async_trait;
use cozy_core::models::{LoaderKind, Version};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::cache::TtlCache;
use crate::http::{FetchError, HttpFetcher, fetch_json};

pub const QUILT_META: &str = "https://meta.quiltmc.org/v3/versions/loader";
pub const FABRIC_META: &str = "https://meta.fabricmc.net/v2/versions/loader";
pub const MODRINTH_API: &str = "https://api.modrinth.com/v2";

#[async_trait]
pub trait LoaderVersionSource: Send + Sync {
    /// Newest stable release of `kind`, if the loader publishes one.
    async fn latest(&self, kind: LoaderKind) -> Result<Option<Version>, FetchError>;
}

#[async_trait]
pub trait ProjectVersionSource: Send + Sync {
    /// Newest release of a project for a loader and game version.
    ///
    /// Unknown projects are `Ok(None)`, not errors.
    async fn latest(
        &self,
        project: &str,
        loader: LoaderKind,
        game_version: &Version,
    ) -> Result<Option<Version>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct MetaLoaderVersion {
    version: String,
    #[serde(default)]
    stable: Option<bool>,
}

impl MetaLoaderVersion {
    fn is_stable(&self) -> bool {
        self.stable.unwrap_or_else(|| !Version::new(&self.version).is_prerelease())
    }
}

/// Loader releases from the Quilt and Fabric meta servers.
pub struct MetaLoaderVersions {
    fetcher: Arc<dyn HttpFetcher>,
    cache: TtlCache<LoaderKind, Option<Version>>,
}

impl MetaLoaderVersions {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, ttl: Duration) -> Self {
        Self {
            fetcher,
            cache: TtlCache::new(ttl),
        }
    }

    async fn fetch_latest(&self, kind: LoaderKind) -> Result<Option<Version>, FetchError> {
        let endpoint = match kind {
            LoaderKind::Quilt => QUILT_META,
            LoaderKind::Fabric => FABRIC_META,
            LoaderKind::Forge => return Ok(None),
        };
        let url = Url::parse(endpoint).map_err(|e| FetchError::Body {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        let versions: Vec<MetaLoaderVersion> = match fetch_json(self.fetcher.as_ref(), &url).await {
            Ok(versions) => versions,
            Err(FetchError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        // Meta lists newest first.
        let latest = versions
            .into_iter()
            .find(MetaLoaderVersion::is_stable)
            .map(|entry| Version::new(entry.version));
        debug!("Latest {} loader is {:?}", kind, latest);

        Ok(latest)
    }
}

#[async_trait]
impl LoaderVersionSource for MetaLoaderVersions {
    async fn latest(&self, kind: LoaderKind) -> Result<Option<Version>, FetchError> {
        self.cache
            .get_or_refresh(kind, false, || self.fetch_latest(kind))
            .await
    }
}

#[derive(Debug, Deserialize)]
struct ModrinthVersion {
    version_number: String,
    #[serde(default)]
    version_type: Option<String>,
}

/// Project releases from the Modrinth API.
pub struct ModrinthVersions {
    fetcher: Arc<dyn HttpFetcher>,
    base: String,
    cache: TtlCache<(String, LoaderKind, String), Option<Version>>,
}

impl ModrinthVersions {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, ttl: Duration) -> Self {
        Self::with_base(fetcher, ttl, MODRINTH_API)
    }

    pub fn with_base(fetcher: Arc<dyn HttpFetcher>, ttl: Duration, base: &str) -> Self {
        Self {
            fetcher,
            base: base.trim_end_matches('/').to_string(),
            cache: TtlCache::new(ttl),
        }
    }

    /// `GET /project/{id}/version?loaders=["quilt"]&game_versions=["1.19.3"]`
    pub fn versions_url(&self, project: &str, loader: LoaderKind, game_version: &Version) -> Result<Url, FetchError> {
        let raw = format!("{}/project/{}/version", self.base, project);
        let mut url = Url::parse(&raw).map_err(|e| FetchError::Body {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        url.query_pairs_mut()
            .append_pair("loaders", &format!("[\"{}\"]", loader.name().to_lowercase()))
            .append_pair("game_versions", &format!("[\"{}\"]", game_version));

        Ok(url)
    }

    async fn fetch_latest(
        &self,
        project: &str,
        loader: LoaderKind,
        game_version: &Version,
    ) -> Result<Option<Version>, FetchError> {
        let url = self.versions_url(project, loader, game_version)?;

        let versions: Vec<ModrinthVersion> = match fetch_json(self.fetcher.as_ref(), &url).await {
            Ok(versions) => versions,
            Err(FetchError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(versions
            .into_iter()
            .find(|entry| entry.version_type.as_deref().unwrap_or("release") == "release")
            .map(|entry| Version::new(entry.version_number)))
    }
}

#[async_trait]
impl ProjectVersionSource for ModrinthVersions {
    async fn latest(
        &self,
        project: &str,
        loader: LoaderKind,
        game_version: &Version,
    ) -> Result<Option<Version>, FetchError> {
        let key = (project.to_string(), loader, game_version.to_string());

        self.cache
            .get_or_refresh(key, false, || self.fetch_latest(project, loader, game_version))
            .await
    }
}
