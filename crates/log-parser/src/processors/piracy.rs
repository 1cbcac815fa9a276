use async_trait::async_trait;
use cozy_core::models::{LauncherName, Log, Order, Ordered};

use super::Processor;

/// Launchers that ship pirated copies of the game.
pub const PIRATED_LAUNCHERS: &[LauncherName] = &[LauncherName::TLauncher];

pub struct PiracyProcessor {
    rules_url: String,
}

impl PiracyProcessor {
    pub fn new(rules_url: &str) -> Self {
        Self {
            rules_url: rules_url.to_string(),
        }
    }
}

impl Ordered for PiracyProcessor {
    fn identifier(&self) -> &str {
        "piracy"
    }

    fn order(&self) -> Order {
        Order::Earlier
    }
}

#[async_trait]
impl Processor for PiracyProcessor {
    async fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let Some(launcher) = log.launcher.as_ref().map(|launcher| launcher.name) else {
            return Ok(());
        };

        if PIRATED_LAUNCHERS.contains(&launcher) {
            log.abort(format!(
                "This log was produced by {}, which distributes pirated copies of Minecraft. \
                 We can't help with pirated installations. See our rules: {}",
                launcher, self.rules_url
            ));
        }

        Ok(())
    }
}
