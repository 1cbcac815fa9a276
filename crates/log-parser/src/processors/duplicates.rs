use async_trait::async_trait;
use cozy_core::models::{LoaderKind, Log, Ordered};

use super::Processor;

/// Fabric mods next to the Quilt mod that already provides them.
pub const PROVIDED_BY_QUILT: &[(&str, &str)] = &[
    ("fabric-api", "quilted_fabric_api"),
    ("fabric-language-kotlin", "quilt_kotlin_libraries"),
];

pub struct DuplicateModProcessor {
    pairs: Vec<(String, String)>,
}

impl Default for DuplicateModProcessor {
    fn default() -> Self {
        Self {
            pairs: PROVIDED_BY_QUILT
                .iter()
                .map(|(fabric, quilt)| (fabric.to_string(), quilt.to_string()))
                .collect(),
        }
    }
}

impl Ordered for DuplicateModProcessor {
    fn identifier(&self) -> &str {
        "duplicate-mods"
    }
}

#[async_trait]
impl Processor for DuplicateModProcessor {
    fn predicate(&self, log: &Log) -> bool {
        !log.aborted() && log.loader(LoaderKind::Quilt).is_some()
    }

    async fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let duplicates: Vec<String> = self
            .pairs
            .iter()
            .filter(|(fabric, quilt)| log.has_mod(fabric) && log.has_mod(quilt))
            .map(|(fabric, quilt)| {
                format!("- Remove `{}`, `{}` already provides it", fabric, quilt)
            })
            .collect();

        if !duplicates.is_empty() {
            log.add_message(format!(
                "Some mods are installed twice under different loaders:\n{}",
                duplicates.join("\n")
            ));
            log.mark_problem();
        }

        Ok(())
    }
}
