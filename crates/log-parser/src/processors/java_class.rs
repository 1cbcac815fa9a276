use async_trait::async_trait;
use cozy_core::models::{Log, Ordered};
use lazy_static::lazy_static;
use regex::Regex;

use super::Processor;
use crate::parsers::pattern;

/// Class file major version 52 is Java 8, 61 is Java 17, and so on.
const CLASS_VERSION_OFFSET: u32 = 44;

lazy_static! {
    static ref MISMATCH: Regex = pattern(
        r"(?i)compiled by a more recent version of the Java Runtime \(class file version (\d+)(?:\.\d+)?\), this version of the Java Runtime only recognizes class file versions up to (\d+)(?:\.\d+)?",
    );
}

pub fn java_for_class_version(class_version: u32) -> Option<u32> {
    class_version.checked_sub(CLASS_VERSION_OFFSET).filter(|java| *java > 0)
}

/// Explains `UnsupportedClassVersionError`s in terms of Java versions.
pub struct JavaClassVersionProcessor;

impl Ordered for JavaClassVersionProcessor {
    fn identifier(&self) -> &str {
        "java-class-version"
    }
}

#[async_trait]
impl Processor for JavaClassVersionProcessor {
    fn predicate(&self, log: &Log) -> bool {
        !log.aborted()
    }

    async fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let Some(captures) = MISMATCH.captures(&log.content) else {
            return Ok(());
        };

        let required = java_for_class_version(captures[1].parse()?);
        let running = java_for_class_version(captures[2].parse()?);

        if let (Some(required), Some(running)) = (required, running) {
            log.add_message(format!(
                "A mod needs Java {}, but the game is running on Java {}. Switch your launcher to \
                 Java {} or newer.",
                required, running, required
            ));
            log.mark_problem();
        }

        Ok(())
    }
}
