use cozy_core::models::{LauncherName, Log, Order, Ordered};
use lazy_static::lazy_static;
use regex::Regex;

use crate::parsers::{Parser, capture, pattern};

lazy_static! {
    static ref OS: Regex = pattern(r"(?im)\bos\.name[=:]\s*([^\r\n(]+?)\s*(?:\(|$)");
    static ref JAVA_VERSION: Regex = pattern(r"(?im)\bjava\.version[=:]\s*([\w.+\-]+)");
    static ref JVM: Regex = pattern(r"(?im)\bjava\.vm\.name[=:]\s*(.+?)\s*$");
}

pub struct TechnicParser;

impl Ordered for TechnicParser {
    fn identifier(&self) -> &str {
        "technic"
    }

    fn order(&self) -> Order {
        Order::Late
    }
}

impl Parser for TechnicParser {
    fn predicate(&self, log: &Log) -> bool {
        log.launcher_is(LauncherName::Technic)
    }

    fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let content = &log.content;
        let environment = &mut log.environment;

        if let Some(os) = capture(&OS, content) {
            environment.os = Some(title_case(os));
        }

        if let Some(version) = capture(&JAVA_VERSION, content) {
            environment.java_version = version.to_string();
        }

        if let Some(jvm) = capture(&JVM, content) {
            environment.jvm_version = jvm.to_string();
        }

        Ok(())
    }
}

/// `"windows 10"` becomes `"Windows 10"`.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
