use cozy_core::models::{LauncherName, Log, Order, Ordered};
use lazy_static::lazy_static;
use regex::Regex;

use crate::parsers::{Parser, capture, pattern};

lazy_static! {
    static ref JAVA: Regex = pattern(
        r"(?i)Java is version ([^\s,]+), using (\d+) \(([\w-]+)\) architecture, from ([^\r\n]+?)\.?\s*$"
    );
    static ref ARGUMENTS: Regex = pattern(r"(?i)Java Arguments:\s*\r?\n\[([^\]\r\n]*)\]");
}

/// MultiMC and its forks (Prism Launcher, PolyMC) share a log format.
pub struct MultiMcParser;

impl Ordered for MultiMcParser {
    fn identifier(&self) -> &str {
        "multimc"
    }

    fn order(&self) -> Order {
        Order::Late
    }
}

impl Parser for MultiMcParser {
    fn predicate(&self, log: &Log) -> bool {
        [LauncherName::MultiMC, LauncherName::Prism, LauncherName::PolyMC]
            .into_iter()
            .any(|name| log.launcher_is(name))
    }

    fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let content = &log.content;
        let environment = &mut log.environment;

        if let Some(line) = content.lines().find_map(|line| JAVA.captures(line)) {
            environment.java_version = line[1].to_string();
            environment.jvm_version = format!("{} ({}-bit {})", &line[4], &line[2], &line[3]);
        }

        if let Some(arguments) = capture(&ARGUMENTS, content) {
            environment.jvm_arguments = arguments.to_string();
        }

        Ok(())
    }
}
