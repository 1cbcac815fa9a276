use async_trait::async_trait;
use cozy_core::models::{LoaderKind, Log, Order, Ordered};
use std::sync::Arc;

use super::Processor;
use crate::sources::ProjectVersionSource;

pub const QFAPI_MOD_ID: &str = "quilted_fabric_api";
pub const QSL_PROJECT: &str = "qsl";

/// Checks Quilted Fabric API against the newest release for the game version.
pub struct QslVersionProcessor {
    source: Arc<dyn ProjectVersionSource>,
}

impl QslVersionProcessor {
    pub fn new(source: Arc<dyn ProjectVersionSource>) -> Self {
        Self { source }
    }
}

impl Ordered for QslVersionProcessor {
    fn identifier(&self) -> &str {
        "qsl-version"
    }

    fn order(&self) -> Order {
        Order::Late
    }
}

#[async_trait]
impl Processor for QslVersionProcessor {
    fn predicate(&self, log: &Log) -> bool {
        !log.aborted()
            && log.loader(LoaderKind::Quilt).is_some()
            && log.minecraft_version.is_some()
            && log.has_mod(QFAPI_MOD_ID)
    }

    async fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let (Some(game_version), Some(installed)) = (
            log.minecraft_version.clone(),
            log.get_mod(QFAPI_MOD_ID).map(|entry| entry.version.clone()),
        ) else {
            return Ok(());
        };

        let latest = self
            .source
            .latest(QSL_PROJECT, LoaderKind::Quilt, &game_version)
            .await?;

        if let Some(latest) = latest.filter(|latest| installed < *latest) {
            log.add_message(format!(
                "Quilted Fabric API {} is out of date; {} is available for Minecraft {}.",
                installed, latest, game_version
            ));
        }

        Ok(())
    }
}
