use async_trait::async_trait;
use cozy_core::models::{LoaderKind, Log, Order, Ordered};

use super::Processor;

/// Notes when a log comes from a different loader than the community supports.
pub struct WrongLoaderProcessor {
    expected: LoaderKind,
}

impl WrongLoaderProcessor {
    pub fn new(expected: LoaderKind) -> Self {
        Self { expected }
    }
}

impl Ordered for WrongLoaderProcessor {
    fn identifier(&self) -> &str {
        "wrong-loader"
    }

    fn order(&self) -> Order {
        Order::Later
    }
}

#[async_trait]
impl Processor for WrongLoaderProcessor {
    fn predicate(&self, log: &Log) -> bool {
        !log.aborted()
            && !log.loader_versions.is_empty()
            && log.loader(self.expected).is_none()
    }

    async fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let detected: Vec<String> = log
            .loader_versions
            .iter()
            .map(|(kind, version)| format!("{} {}", kind, version))
            .collect();

        log.add_message(format!(
            "This log is from {}, not {}. Problems may not apply to {}, and we may not be able \
             to help.",
            detected.join(", "),
            self.expected,
            self.expected
        ));

        Ok(())
    }
}
