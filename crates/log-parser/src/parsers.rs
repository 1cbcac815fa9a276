//! # Parsers
//!
//! Parsers read `Log::content` and fill in the structured fields. They run in
//! ascending [`Order`](cozy_core::models::Order), and several predicates
//! depend on earlier parsers' output:
//!
//! | parser | runs when |
//! |---|---|
//! | `quilt-mods` | `loader` found a Quilt version |
//! | `atlauncher` | `launcher` identified ATLauncher |
//! | `multimc` | `launcher` identified MultiMC, Prism or PolyMC |
//! | `technic` | `launcher` identified Technic |
//!
//! A parser that returns an error is logged and skipped; the rest of the chain
//! still runs.

use cozy_core::models::{Log, Ordered};
use regex::Regex;
use std::sync::Arc;

pub mod environment;
pub mod launcher;
pub mod launchers;
pub mod loader;
pub mod minecraft;
pub mod mods;

pub use environment::EnvironmentParser;
pub use launcher::LauncherParser;
pub use launchers::{ATLauncherParser, MultiMcParser, TechnicParser};
pub use loader::LoaderParser;
pub use minecraft::MinecraftVersionParser;
pub use mods::{FabricModsParser, QuiltModsParser};

pub trait Parser: Ordered + Send + Sync {
    fn predicate(&self, _log: &Log) -> bool {
        true
    }

    fn process(&self, log: &mut Log) -> eyre::Result<()>;
}

/// The built-in parsers in their default order.
pub fn default_parsers() -> Vec<Arc<dyn Parser>> {
    vec![
        Arc::new(LauncherParser),
        Arc::new(LoaderParser),
        Arc::new(MinecraftVersionParser),
        Arc::new(FabricModsParser),
        Arc::new(QuiltModsParser),
        Arc::new(EnvironmentParser),
        Arc::new(ATLauncherParser),
        Arc::new(MultiMcParser),
        Arc::new(TechnicParser),
    ]
}

/// Compiles a built-in pattern for the parser and processor tables.
pub(crate) fn pattern(source: &str) -> Regex {
    Regex::new(source).unwrap()
}

/// First capture group of the first match, trimmed.
pub(crate) fn capture<'a>(regex: &Regex, text: &'a str) -> Option<&'a str> {
    regex
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str().trim())
        .filter(|value| !value.is_empty())
}
