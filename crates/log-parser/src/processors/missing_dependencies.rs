use async_trait::async_trait;
use cozy_core::models::{Log, Ordered};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

use super::Processor;
use crate::parsers::pattern;

lazy_static! {
    static ref MISSING: Regex = pattern(
        r"(?i)Mod '[^']*' \(([\w\-]+)\) \S+ requires [^\r\n]*?of (?:mod )?(?:'([^']+)'(?: \(([\w\-]+)\))?|([\w\-]+)),? which is missing",
    );
}

/// Lists mods whose required dependencies are not installed.
pub struct MissingDependencyProcessor;

impl Ordered for MissingDependencyProcessor {
    fn identifier(&self) -> &str {
        "missing-dependencies"
    }
}

/// `(mod id, missing dependency)` pairs reported by the loader.
pub fn missing_dependencies(content: &str) -> BTreeSet<(String, String)> {
    MISSING
        .captures_iter(content)
        .filter_map(|captures| {
            let dependency = captures
                .get(3)
                .or_else(|| captures.get(2))
                .or_else(|| captures.get(4))?;

            Some((captures[1].to_string(), dependency.as_str().to_string()))
        })
        .collect()
}

#[async_trait]
impl Processor for MissingDependencyProcessor {
    fn predicate(&self, log: &Log) -> bool {
        !log.aborted()
    }

    async fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let missing = missing_dependencies(&log.content);
        if missing.is_empty() {
            return Ok(());
        }

        let lines: Vec<String> = missing
            .iter()
            .map(|(id, dependency)| format!("- `{}` needs `{}`", id, dependency))
            .collect();

        log.add_message(format!("Some mods are missing dependencies:\n{}", lines.join("\n")));
        log.mark_problem();

        Ok(())
    }
}
