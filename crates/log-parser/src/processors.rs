//! # Processors
//!
//! Processors inspect a parsed [`Log`] and add diagnostics, flag problems or
//! abort. Each one is an independent rule check. They run in ascending order
//! after every parser has finished. Diagnostic checks skip logs that have
//! already been aborted.

use async_trait::async_trait;
use cozy_core::models::{LoaderKind, Log, Ordered};
use std::sync::Arc;

use crate::sources::{LoaderVersionSource, ProjectVersionSource};

pub mod crash_report;
pub mod duplicates;
pub mod incompatible;
pub mod java_class;
pub mod loader_version;
pub mod missing_dependencies;
pub mod mixins;
pub mod piracy;
pub mod player_ip;
pub mod qsl_version;
pub mod rule_breaking;
pub mod wrong_loader;

pub use crash_report::CrashReportProcessor;
pub use duplicates::DuplicateModProcessor;
pub use incompatible::IncompatibleModProcessor;
pub use java_class::JavaClassVersionProcessor;
pub use loader_version::LoaderVersionProcessor;
pub use missing_dependencies::MissingDependencyProcessor;
pub use mixins::MixinErrorProcessor;
pub use piracy::PiracyProcessor;
pub use player_ip::PlayerIpProcessor;
pub use qsl_version::QslVersionProcessor;
pub use rule_breaking::RuleBreakingModProcessor;
pub use wrong_loader::WrongLoaderProcessor;

pub const DEFAULT_RULES_URL: &str = "https://discord.quiltmc.org/rules";

#[async_trait]
pub trait Processor: Ordered + Send + Sync {
    fn predicate(&self, _log: &Log) -> bool {
        true
    }

    async fn process(&self, log: &mut Log) -> eyre::Result<()>;
}

/// Collaborators the built-in processors need.
#[derive(Clone)]
pub struct ProcessorContext {
    pub loader_versions: Arc<dyn LoaderVersionSource>,
    pub project_versions: Arc<dyn ProjectVersionSource>,
    pub rules_url: String,
    pub expected_loader: LoaderKind,
}

/// The built-in processors in their default order.
pub fn default_processors(context: ProcessorContext) -> Vec<Arc<dyn Processor>> {
    vec![
        Arc::new(RuleBreakingModProcessor::new(&context.rules_url)),
        Arc::new(PiracyProcessor::new(&context.rules_url)),
        Arc::new(PlayerIpProcessor),
        Arc::new(CrashReportProcessor),
        Arc::new(MixinErrorProcessor),
        Arc::new(JavaClassVersionProcessor),
        Arc::new(MissingDependencyProcessor),
        Arc::new(IncompatibleModProcessor::default()),
        Arc::new(DuplicateModProcessor::default()),
        Arc::new(LoaderVersionProcessor::new(context.loader_versions)),
        Arc::new(QslVersionProcessor::new(context.project_versions)),
        Arc::new(WrongLoaderProcessor::new(context.expected_loader)),
    ]
}

/// `` `a`, `b` `` for display in a diagnostic.
pub(crate) fn code_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items
        .into_iter()
        .map(|item| format!("`{}`", item))
        .collect::<Vec<_>>()
        .join(", ")
}
