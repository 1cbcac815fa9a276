use cozy_core::models::{Launcher, LauncherName, Log, Order, Ordered};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::{Parser, pattern};

lazy_static! {
    /// Launcher signatures, checked in order. Group 1, when present, is the
    /// launcher's version.
    static ref SIGNATURES: Vec<(LauncherName, Regex)> = vec![
        (LauncherName::ATLauncher, pattern(r"(?i)ATLauncher Version: ([\w.\-]+)")),
        (LauncherName::Prism, pattern(r"(?i)Prism Launcher version: ([\w.\-]+)")),
        (LauncherName::PolyMC, pattern(r"(?i)PolyMC version: ([\w.\-]+)")),
        (LauncherName::MultiMC, pattern(r"(?i)MultiMC version: ([\w.\-]+)")),
        (LauncherName::Technic, pattern(r"\[B#(\d+)\]")),
        (LauncherName::TLauncher, pattern(r"(?i)Starting TLauncher ([\w.\-]+)")),
        (LauncherName::TLauncher, pattern(r"(?i)[/\\]\.?tlauncher[/\\]")),
        (LauncherName::GDLauncher, pattern(r"(?i)gdlauncher")),
        (LauncherName::CurseForge, pattern(r"(?i)curseforge[/\\]minecraft[/\\]Install")),
    ];
}

/// Identifies the launcher that produced the log.
pub struct LauncherParser;

impl Ordered for LauncherParser {
    fn identifier(&self) -> &str {
        "launcher"
    }

    fn order(&self) -> Order {
        Order::Earlier
    }
}

impl Parser for LauncherParser {
    fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let found = SIGNATURES.iter().find_map(|(name, signature)| {
            signature.captures(&log.content).map(|captures| Launcher {
                name: *name,
                version: captures.get(1).map(|version| version.as_str().to_string()),
            })
        });

        if let Some(launcher) = found {
            debug!("Detected launcher {}", launcher.name);
            log.launcher = Some(launcher);
        }

        Ok(())
    }
}
