use cozy_core::models::{LauncherName, Log, Order, Ordered};
use lazy_static::lazy_static;
use regex::Regex;

use crate::parsers::{Parser, capture, pattern};

const LIBRARY_PATH_FLAG: &str = "-Djava.library.path";

lazy_static! {
    static ref JAVA_VERSION: Regex = pattern(r"(?i)Java Version: Java (\d+) \(([^)]+)\)");
    static ref ARGUMENTS: Regex =
        pattern(r"(?i)Launching Minecraft with the following arguments[^:]*: \[(.*?)\]");
    static ref OS: Regex = pattern(r"(?im)\bOS: (.+?)\s*$");
}

pub struct ATLauncherParser;

impl Ordered for ATLauncherParser {
    fn identifier(&self) -> &str {
        "atlauncher"
    }

    fn order(&self) -> Order {
        Order::Late
    }
}

impl Parser for ATLauncherParser {
    fn predicate(&self, log: &Log) -> bool {
        log.launcher_is(LauncherName::ATLauncher)
    }

    fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let content = &log.content;
        let environment = &mut log.environment;

        if let Some(captures) = JAVA_VERSION.captures(content) {
            environment.java_version = captures[1].to_string();
            environment.jvm_version = captures[2].to_string();
        }

        if let Some(arguments) = capture(&ARGUMENTS, content) {
            environment.jvm_arguments = jvm_arguments(arguments);
        }

        if let Some(os) = capture(&OS, content) {
            environment.os = Some(os.to_string());
        }

        Ok(())
    }
}

/// Everything before the library path flag; the rest is classpath noise.
fn jvm_arguments(arguments: &str) -> String {
    let head = match arguments.find(LIBRARY_PATH_FLAG) {
        Some(index) => &arguments[..index],
        None => arguments,
    };

    head.trim_end_matches([',', ' ']).to_string()
}
