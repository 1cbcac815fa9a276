use async_trait::async_trait;
use cozy_core::models::{Log, Ordered};
use lazy_static::lazy_static;
use regex::Regex;

use super::Processor;
use crate::parsers::pattern;

lazy_static! {
    static ref HEADER: Regex = pattern(r"-{4} Minecraft Crash Report -{4}");
    static ref DESCRIPTION: Regex = pattern(r"(?m)^Description: (.+?)\s*$");
}

pub struct CrashReportProcessor;

impl Ordered for CrashReportProcessor {
    fn identifier(&self) -> &str {
        "crash-report"
    }
}

#[async_trait]
impl Processor for CrashReportProcessor {
    fn predicate(&self, log: &Log) -> bool {
        !log.aborted()
    }

    async fn process(&self, log: &mut Log) -> eyre::Result<()> {
        if !HEADER.is_match(&log.content) {
            return Ok(());
        }

        let message = match DESCRIPTION.captures(&log.content) {
            Some(captures) => format!("This is a crash report: *{}*", &captures[1]),
            None => "This is a crash report.".to_string(),
        };

        log.add_message(message);
        log.mark_problem();

        Ok(())
    }
}
