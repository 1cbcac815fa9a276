mod test_utils;

use async_trait::async_trait;
use cozy_core::models::{LoaderKind, Log, Mod, Order, Ordered, Version};
use cozy_log_parser::config::PipelineConfig;
use cozy_log_parser::pipeline::Report;
use cozy_log_parser::processors::java_class::java_for_class_version;
use cozy_log_parser::processors::missing_dependencies::missing_dependencies;
use cozy_log_parser::processors::player_ip::REDACTED;
use cozy_log_parser::processors::{
    CrashReportProcessor, DEFAULT_RULES_URL, DuplicateModProcessor, IncompatibleModProcessor,
    JavaClassVersionProcessor, LoaderVersionProcessor, MixinErrorProcessor,
    MissingDependencyProcessor, PlayerIpProcessor, Processor, QslVersionProcessor,
    WrongLoaderProcessor,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::test_utils::{StaticVersions, offline_pipeline};

struct Aborts {
    id: &'static str,
    order: Order,
    reason: &'static str,
}

impl Ordered for Aborts {
    fn identifier(&self) -> &str {
        self.id
    }

    fn order(&self) -> Order {
        self.order
    }
}

#[async_trait]
impl Processor for Aborts {
    async fn process(&self, log: &mut Log) -> eyre::Result<()> {
        log.abort(self.reason);
        Ok(())
    }
}

struct Notes(&'static str);

impl Ordered for Notes {
    fn identifier(&self) -> &str {
        self.0
    }
}

#[async_trait]
impl Processor for Notes {
    async fn process(&self, log: &mut Log) -> eyre::Result<()> {
        log.add_message(format!("note from {}", self.0));
        Ok(())
    }
}

struct Fails;

impl Ordered for Fails {
    fn identifier(&self) -> &str {
        "fails"
    }

    fn order(&self) -> Order {
        Order::Earlier
    }
}

#[async_trait]
impl Processor for Fails {
    async fn process(&self, _log: &mut Log) -> eyre::Result<()> {
        Err(eyre::eyre!("rule check blew up"))
    }
}

fn quilt_log(mods: &[&str]) -> Log {
    let mut log = Log::new("");
    log.set_loader(LoaderKind::Quilt, "0.18.10");
    for id in mods {
        log.add_mod(Mod::new(*id, "1.0.0"));
    }
    log
}

#[tokio::test]
async fn test_first_abort_is_kept() {
    let pipeline = PipelineConfig::new()
        .with_processor(Arc::new(Aborts {
            id: "late-abort",
            order: Order::Later,
            reason: "second",
        }))
        .with_processor(Arc::new(Notes("note")))
        .with_processor(Arc::new(Aborts {
            id: "early-abort",
            order: Order::Earlier,
            reason: "first",
        }))
        .build()
        .unwrap();

    let mut log = Log::new("anything");
    pipeline.process(&mut log).await;

    assert_eq!(log.abort_reason(), Some("first"));
    // The default predicate still runs processors on aborted logs.
    assert_eq!(log.messages(), &["note from note".to_string()]);
    assert_eq!(Report::from_logs(&[log]).messages(), vec!["first"]);
}

#[tokio::test]
async fn test_failing_processor_does_not_stop_chain() {
    let pipeline = PipelineConfig::new()
        .with_processor(Arc::new(Fails))
        .with_processor(Arc::new(Notes("after")))
        .build()
        .unwrap();

    let mut log = Log::new("anything");
    pipeline.process(&mut log).await;

    assert_eq!(log.messages(), &["note from after".to_string()]);
}

#[tokio::test]
async fn test_rule_breaking_mod_aborts_with_policy_link() {
    let content = "\
---- Minecraft Crash Report ----
Description: Initializing game
[main/INFO]: Loading 3 mods:
\t- fabricloader 0.14.11
\t- meteor-client 0.5.2
\t- minecraft 1.19.3
Mixin apply for mod meteor-client failed
";
    let log = offline_pipeline().analyse(content, None).await;

    assert!(log.aborted());
    let reason = log.abort_reason().unwrap();
    assert!(reason.contains("`meteor-client`"));
    assert!(reason.contains(DEFAULT_RULES_URL));

    // Crash report and mixin checks never ran.
    assert!(log.messages().is_empty());
    assert!(!log.has_problems());

    let report = Report::from_logs(&[log]);
    assert_eq!(report.messages(), vec![reason_of(&report)]);
}

fn reason_of(report: &Report) -> &str {
    report.logs[0].abort_reason.as_deref().unwrap()
}

#[tokio::test]
async fn test_tlauncher_is_refused() {
    let log = offline_pipeline()
        .analyse("Starting TLauncher 2.86\n[main/INFO]: Loading 0 mods:", None)
        .await;

    assert!(log.aborted());
    assert!(log.abort_reason().unwrap().contains("TLauncher"));
}

#[tokio::test]
async fn test_player_ip_is_redacted() {
    let mut log = Log::new(
        "[Render thread/INFO]: Connecting to 192.168.1.20, 25565\n[Render thread/INFO]: Connecting to play.example.net, 25566",
    );

    PlayerIpProcessor.process(&mut log).await.unwrap();

    assert!(!log.content.contains("192.168.1.20"));
    assert!(!log.content.contains("play.example.net"));
    assert_eq!(log.content.matches(REDACTED).count(), 2);
    assert_eq!(log.messages().len(), 1);
    assert!(log.has_problems());
}

#[tokio::test]
async fn test_player_login_address_is_redacted() {
    let mut log = Log::new(
        "[Server thread/INFO]: Steve[/203.0.113.5:51234] logged in with entity id 214\n\
         [Server thread/INFO]: Alex[/127.0.0.1:50322] logged in with entity id 215\n\
         [main/INFO]: Loaded mod sodium 0.4.4.1",
    );

    PlayerIpProcessor.process(&mut log).await.unwrap();

    assert!(!log.content.contains("203.0.113.5"));
    assert!(log.content.contains("Steve[/[redacted]:51234]"));
    assert!(log.content.contains("127.0.0.1:50322"));
    assert!(log.content.contains("sodium 0.4.4.1"));
    assert_eq!(log.messages().len(), 1);
    assert!(log.has_problems());
}

#[tokio::test]
async fn test_log_without_addresses_is_untouched() {
    let content = "[main/INFO]: Loaded mod sodium 0.4.4.1\n[main/INFO]: Bound to 0.0.0.0:25565";
    let mut log = Log::new(content);

    PlayerIpProcessor.process(&mut log).await.unwrap();

    assert_eq!(log.content, content);
    assert!(log.messages().is_empty());
}

#[tokio::test]
async fn test_crash_report_description() {
    let mut log = Log::new(
        "---- Minecraft Crash Report ----\n// Quite honestly, I wouldn't worry myself about that.\n\nDescription: Rendering overlay\n",
    );

    CrashReportProcessor.process(&mut log).await.unwrap();

    assert_eq!(log.messages(), &["This is a crash report: *Rendering overlay*".to_string()]);
    assert!(log.has_problems());
}

#[tokio::test]
async fn test_mixin_failures_name_the_mod() {
    let mut log = Log::new(
        "Mixin apply for mod sodium failed sodium.mixins.json:core.MixinWindow\nMixin apply for mod sodium failed again",
    );

    MixinErrorProcessor.process(&mut log).await.unwrap();

    assert_eq!(log.messages().len(), 1);
    assert!(log.messages()[0].contains("`sodium`"));
}

#[test]
fn test_class_versions_map_to_java() {
    assert_eq!(java_for_class_version(52), Some(8));
    assert_eq!(java_for_class_version(61), Some(17));
    assert_eq!(java_for_class_version(44), None);
}

#[tokio::test]
async fn test_java_class_mismatch() {
    let mut log = Log::new(
        "java.lang.UnsupportedClassVersionError: net/example/Mod has been compiled by a more recent version of the Java Runtime (class file version 61.0), this version of the Java Runtime only recognizes class file versions up to 52.0",
    );

    JavaClassVersionProcessor.process(&mut log).await.unwrap();

    let message = &log.messages()[0];
    assert!(message.contains("needs Java 17"));
    assert!(message.contains("running on Java 8"));
    assert!(log.has_problems());
}

#[test]
fn test_missing_dependency_forms() {
    let content = "\
 - Mod 'Sodium Extra' (sodium-extra) 0.4.16 requires version 0.4.6 or later of mod 'Sodium' (sodium), which is missing!
 - Mod 'Iris' (iris) 1.5.1 requires any version of fabric-api, which is missing!
";

    assert_eq!(
        missing_dependencies(content),
        BTreeSet::from([
            ("iris".to_string(), "fabric-api".to_string()),
            ("sodium-extra".to_string(), "sodium".to_string()),
        ])
    );
}

#[tokio::test]
async fn test_missing_dependency_message() {
    let mut log = Log::new(
        "Mod 'Sodium Extra' (sodium-extra) 0.4.16 requires version 0.4.6 or later of mod 'Sodium' (sodium), which is missing!",
    );

    MissingDependencyProcessor.process(&mut log).await.unwrap();

    assert_eq!(
        log.messages(),
        &["Some mods are missing dependencies:\n- `sodium-extra` needs `sodium`".to_string()]
    );
}

#[tokio::test]
async fn test_incompatible_mods() {
    let processor = IncompatibleModProcessor::default();
    let mut log = quilt_log(&["sodium", "optifabric"]);

    assert!(processor.predicate(&log));
    processor.process(&mut log).await.unwrap();

    let message = &log.messages()[0];
    assert!(message.contains("`optifabric`: OptiFine doesn't work with Quilt"));
    assert!(message.contains("`sodium` and `optifabric` can't be used together"));
}

#[tokio::test]
async fn test_compatible_mods_are_quiet() {
    let processor = IncompatibleModProcessor::default();
    let mut log = quilt_log(&["sodium", "lithium", "iris"]);

    processor.process(&mut log).await.unwrap();

    assert!(log.messages().is_empty());
    assert!(!log.has_problems());
}

#[tokio::test]
async fn test_duplicate_fabric_mods_on_quilt() {
    let processor = DuplicateModProcessor::default();
    let mut log = quilt_log(&["fabric-api", "quilted_fabric_api"]);

    processor.process(&mut log).await.unwrap();

    assert!(log.messages()[0].contains("Remove `fabric-api`, `quilted_fabric_api` already provides it"));
}

#[test]
fn test_duplicates_need_quilt() {
    let mut log = Log::new("");
    log.set_loader(LoaderKind::Fabric, "0.14.11");

    assert!(!DuplicateModProcessor::default().predicate(&log));
}

#[tokio::test]
async fn test_outdated_loader() {
    let processor = LoaderVersionProcessor::new(Arc::new(StaticVersions {
        loader: Some(Version::new("0.18.10")),
        project: None,
    }));
    let mut log = Log::new("");
    log.set_loader(LoaderKind::Quilt, "0.17.6");

    processor.process(&mut log).await.unwrap();

    assert_eq!(
        log.messages(),
        &["You're using Quilt Loader 0.17.6, but the latest is 0.18.10. Updating may fix your issue.".to_string()]
    );
}

#[tokio::test]
async fn test_current_loader_is_quiet() {
    let processor = LoaderVersionProcessor::new(Arc::new(StaticVersions {
        loader: Some(Version::new("0.18.10")),
        project: None,
    }));
    let mut log = quilt_log(&[]);

    processor.process(&mut log).await.unwrap();

    assert!(log.messages().is_empty());
}

#[tokio::test]
async fn test_outdated_qsl() {
    let processor = QslVersionProcessor::new(Arc::new(StaticVersions {
        loader: None,
        project: Some(Version::new("5.0.0-beta.9+0.76.0-1.19.3")),
    }));
    let mut log = Log::new("");
    log.set_loader(LoaderKind::Quilt, "0.18.10");
    log.minecraft_version = Some(Version::new("1.19.3"));
    log.add_mod(Mod::new("quilted_fabric_api", "5.0.0-beta.5+0.72.0-1.19.3"));

    assert!(processor.predicate(&log));
    processor.process(&mut log).await.unwrap();

    assert!(log.messages()[0].contains("5.0.0-beta.9+0.76.0-1.19.3 is available for Minecraft 1.19.3"));
}

#[tokio::test]
async fn test_newer_qsl_prerelease_is_not_outdated() {
    let processor = QslVersionProcessor::new(Arc::new(StaticVersions {
        loader: None,
        project: Some(Version::new("5.0.0-beta.9+0.75.1-1.19.3")),
    }));
    let mut log = Log::new("");
    log.set_loader(LoaderKind::Quilt, "0.18.10");
    log.minecraft_version = Some(Version::new("1.19.3"));
    log.add_mod(Mod::new("quilted_fabric_api", "5.0.0-beta.10+0.76.0-1.19.3"));

    processor.process(&mut log).await.unwrap();

    assert!(log.messages().is_empty());
}

#[test]
fn test_qsl_check_needs_game_version() {
    let processor = QslVersionProcessor::new(Arc::new(StaticVersions::default()));
    let log = quilt_log(&["quilted_fabric_api"]);

    assert!(!processor.predicate(&log));
}

#[tokio::test]
async fn test_wrong_loader_notice() {
    let processor = WrongLoaderProcessor::new(LoaderKind::Quilt);
    let mut log = Log::new("");
    log.set_loader(LoaderKind::Forge, "43.2.0");

    assert!(processor.predicate(&log));
    processor.process(&mut log).await.unwrap();

    assert!(log.messages()[0].starts_with("This log is from Forge 43.2.0, not Quilt."));
    assert!(!processor.predicate(&quilt_log(&[])));
    assert!(!processor.predicate(&Log::new("")));
}
