use async_trait::async_trait;
use cozy_core::models::{Log, Ordered};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

use super::{Processor, code_list};
use crate::parsers::pattern;

lazy_static! {
    static ref MOD_FAILURE: Regex = pattern(r"(?i)Mixin apply for mod ([\w\-]+) failed");
    static ref CONFIG_FAILURE: Regex = pattern(
        r"(?i)Mixin \[[^\]]+\] from phase \[\w+\] in config \[([^\]]+)\] FAILED",
    );
}

/// Names the mods and mixin configs that failed to apply.
pub struct MixinErrorProcessor;

impl Ordered for MixinErrorProcessor {
    fn identifier(&self) -> &str {
        "mixin-errors"
    }
}

#[async_trait]
impl Processor for MixinErrorProcessor {
    fn predicate(&self, log: &Log) -> bool {
        !log.aborted()
    }

    async fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let mods: BTreeSet<&str> = MOD_FAILURE
            .captures_iter(&log.content)
            .filter_map(|captures| captures.get(1))
            .map(|group| group.as_str())
            .collect();
        let configs: BTreeSet<&str> = CONFIG_FAILURE
            .captures_iter(&log.content)
            .filter_map(|captures| captures.get(1))
            .map(|group| group.as_str())
            .collect();

        let message = match (mods.is_empty(), configs.is_empty()) {
            (true, true) => return Ok(()),
            (false, _) => format!(
                "Mixins failed to apply for {}. This usually means the mod is incompatible with \
                 another mod or with this version of Minecraft.",
                code_list(mods)
            ),
            (true, false) => format!(
                "Mixins from {} failed to apply. Check which mods own these configs.",
                code_list(configs)
            ),
        };

        log.add_message(message);
        log.mark_problem();

        Ok(())
    }
}
