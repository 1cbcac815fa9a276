use cozy_core::models::{LoaderKind, Log, Order, Ordered};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::{Parser, capture, pattern};

lazy_static! {
    /// Loader signatures in priority order: mod tables, log lines, then
    /// command-line arguments and library coordinates.
    static ref SIGNATURES: Vec<(LoaderKind, Regex)> = vec![
        (LoaderKind::Quilt, pattern(r"(?i)\|\s*quilt_loader\s*\|\s*([^\s|]+)\s*\|")),
        (LoaderKind::Fabric, pattern(r"(?im)^\s*-\s*fabricloader ([^\s]+)")),
        (LoaderKind::Quilt, pattern(r"(?i)Loading Minecraft \S+ with Quilt Loader ([^\s]+)")),
        (LoaderKind::Fabric, pattern(r"(?i)Loading Minecraft \S+ with Fabric Loader ([^\s]+)")),
        (LoaderKind::Forge, pattern(r"(?i)MinecraftForge v([\w.\-]+) Initialized")),
        (LoaderKind::Forge, pattern(r"(?i)--fml\.forgeVersion,? ([\w.\-]+)")),
        (LoaderKind::Quilt, pattern(r"(?i)org\.quiltmc:quilt-loader:([\w.\-+]+)")),
        (LoaderKind::Fabric, pattern(r"(?i)net\.fabricmc:fabric-loader:([\w.\-+]+)")),
        (LoaderKind::Forge, pattern(r"(?i)net\.minecraftforge:forge:[\w.]+-([\w.\-]+)")),
    ];
}

/// Detects the mod loader. The first matching signature wins.
pub struct LoaderParser;

impl Ordered for LoaderParser {
    fn identifier(&self) -> &str {
        "loader"
    }

    fn order(&self) -> Order {
        Order::Earlier
    }
}

impl Parser for LoaderParser {
    fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let found = SIGNATURES
            .iter()
            .find_map(|(kind, signature)| capture(signature, &log.content).map(|v| (*kind, v.to_string())));

        if let Some((kind, version)) = found {
            debug!("Detected {} loader {}", kind, version);
            log.set_loader(kind, version);
        }

        Ok(())
    }
}
