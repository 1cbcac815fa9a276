use async_trait::async_trait;
use cozy_core::models::{Log, Order, Ordered};
use std::sync::Arc;
use tracing::debug;

use super::Processor;
use crate::sources::LoaderVersionSource;

/// Points out loaders older than the latest stable release.
pub struct LoaderVersionProcessor {
    source: Arc<dyn LoaderVersionSource>,
}

impl LoaderVersionProcessor {
    pub fn new(source: Arc<dyn LoaderVersionSource>) -> Self {
        Self { source }
    }
}

impl Ordered for LoaderVersionProcessor {
    fn identifier(&self) -> &str {
        "loader-version"
    }

    fn order(&self) -> Order {
        Order::Late
    }
}

#[async_trait]
impl Processor for LoaderVersionProcessor {
    fn predicate(&self, log: &Log) -> bool {
        !log.aborted() && !log.loader_versions.is_empty()
    }

    async fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let loaders: Vec<_> = log
            .loader_versions
            .iter()
            .map(|(kind, version)| (*kind, version.clone()))
            .collect();

        for (kind, version) in loaders {
            let Some(latest) = self.source.latest(kind).await? else {
                debug!("No known latest version for {}", kind);
                continue;
            };

            if version < latest {
                log.add_message(format!(
                    "You're using {} Loader {}, but the latest is {}. Updating may fix your issue.",
                    kind, version, latest
                ));
            }
        }

        Ok(())
    }
}
