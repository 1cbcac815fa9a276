use async_trait::async_trait;
use cozy_core::models::{LoaderKind, Log, Ordered};

use super::Processor;

/// Mods that don't work under Quilt, with a short explanation.
pub const QUILT_INCOMPATIBLE: &[(&str, &str)] = &[
    ("optifabric", "OptiFine doesn't work with Quilt; Sodium and Iris are the usual replacements"),
    ("optifine", "OptiFine doesn't work with Quilt; Sodium and Iris are the usual replacements"),
    ("originsforge", "Forge ports can't be loaded by Quilt"),
];

/// Pairs of mods that can't be installed together.
pub const CONFLICTING_PAIRS: &[(&str, &str)] = &[
    ("sodium", "optifabric"),
    ("sodium", "canvas"),
    ("iris", "optifabric"),
    ("lithium", "canary"),
];

pub struct IncompatibleModProcessor {
    quilt_incompatible: Vec<(String, String)>,
    conflicting: Vec<(String, String)>,
}

impl Default for IncompatibleModProcessor {
    fn default() -> Self {
        let owned = |table: &[(&str, &str)]| {
            table
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect()
        };

        Self {
            quilt_incompatible: owned(QUILT_INCOMPATIBLE),
            conflicting: owned(CONFLICTING_PAIRS),
        }
    }
}

impl Ordered for IncompatibleModProcessor {
    fn identifier(&self) -> &str {
        "incompatible-mods"
    }
}

#[async_trait]
impl Processor for IncompatibleModProcessor {
    fn predicate(&self, log: &Log) -> bool {
        !log.aborted() && !log.mods.is_empty()
    }

    async fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let mut findings = Vec::new();

        if log.loader(LoaderKind::Quilt).is_some() {
            for (id, reason) in &self.quilt_incompatible {
                if log.has_mod(id) {
                    findings.push(format!("- `{}`: {}", id, reason));
                }
            }
        }

        for (first, second) in &self.conflicting {
            if log.has_mod(first) && log.has_mod(second) {
                findings.push(format!("- `{}` and `{}` can't be used together", first, second));
            }
        }

        if !findings.is_empty() {
            log.add_message(format!("Incompatible mods found:\n{}", findings.join("\n")));
            log.mark_problem();
        }

        Ok(())
    }
}
