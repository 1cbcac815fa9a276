use async_trait::async_trait;
use cozy_core::models::{Log, Order, Ordered};

use super::{Processor, code_list};

/// Cheat clients and their add-ons. Support is refused for logs carrying any
/// of these.
pub const RULE_BREAKING_MODS: &[&str] = &[
    "aristois",
    "bleachhack",
    "inertia",
    "kamiblue",
    "liquidbounce",
    "meteor-client",
    "rusherhack",
    "thunderhack",
    "wurst",
];

pub struct RuleBreakingModProcessor {
    mods: Vec<String>,
    rules_url: String,
}

impl RuleBreakingModProcessor {
    pub fn new(rules_url: &str) -> Self {
        Self::with_mods(rules_url, RULE_BREAKING_MODS.iter().map(|id| id.to_string()).collect())
    }

    pub fn with_mods(rules_url: &str, mods: Vec<String>) -> Self {
        Self {
            mods,
            rules_url: rules_url.to_string(),
        }
    }
}

impl Ordered for RuleBreakingModProcessor {
    fn identifier(&self) -> &str {
        "rule-breaking-mods"
    }

    fn order(&self) -> Order {
        Order::Earlier
    }
}

#[async_trait]
impl Processor for RuleBreakingModProcessor {
    async fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let found: Vec<&str> = self
            .mods
            .iter()
            .map(String::as_str)
            .filter(|id| log.has_mod(id))
            .collect();

        if !found.is_empty() {
            log.abort(format!(
                "This log contains mods that break our rules: {}. We don't provide support for \
                 cheat clients or anything that bundles them. See our rules: {}",
                code_list(found),
                self.rules_url
            ));
        }

        Ok(())
    }
}
