use cozy_core::models::{Log, Order, Ordered, Version};
use lazy_static::lazy_static;
use regex::Regex;

use super::{Parser, capture, pattern};

/// A release (`1.19.3`, `1.20-pre1`) or snapshot (`23w05a`) id, followed by
/// a delimiter so launcher profile names like `1.19.3-forge-43.2.0` are
/// rejected.
const GAME_VERSION: &str = r"(\d+\.\d+(?:\.\d+)?(?:-[\w.]+)?|\d{2}w\d{2}[a-z])(?:[\s,|]|$)";

lazy_static! {
    static ref PATTERNS: Vec<Regex> = [
        r"\|\s*minecraft\s*\|\s*",
        r"(?m)^\s*-\s*minecraft ",
        r"(?i)Loading Minecraft ",
        r"(?i)--fml\.mcVersion,? ",
        r"(?i)--version,? ",
    ]
    .iter()
    .map(|prefix| pattern(&format!("{}{}", prefix, GAME_VERSION)))
    .collect();
}

/// Detects the Minecraft version.
///
/// Every pattern is tried and the last one in the list that matches wins, so
/// launch arguments override the mod table when both are present. Only
/// version-shaped values are accepted.
pub struct MinecraftVersionParser;

impl Ordered for MinecraftVersionParser {
    fn identifier(&self) -> &str {
        "minecraft-version"
    }

    fn order(&self) -> Order {
        Order::Early
    }
}

impl Parser for MinecraftVersionParser {
    fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let mut found = None;

        for candidate in PATTERNS.iter() {
            if let Some(version) = capture(candidate, &log.content) {
                found = Some(version);
            }
        }

        if let Some(version) = found {
            log.minecraft_version = Some(Version::new(version));
        }

        Ok(())
    }
}
