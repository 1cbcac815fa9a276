mod test_utils;

use async_trait::async_trait;
use cozy_core::errors::CozyError;
use cozy_core::models::{Author, Log, MessageEvent, Order, Ordered};
use cozy_log_parser::config::{PipelineConfig, has_any_role, in_channels};
use cozy_log_parser::pipeline::{DISPLAY_LIMIT, ELLIPSIS, LogReport, Report, truncate};
use cozy_log_parser::processors::Processor;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use url::Url;

use crate::test_utils::{
    MockFetcher, QUILT_FIXTURE, attachment_url, default_config, message_with_attachment, pipeline,
    serving,
};

struct Named(&'static str, Order);

impl Ordered for Named {
    fn identifier(&self) -> &str {
        self.0
    }

    fn order(&self) -> Order {
        self.1
    }
}

#[async_trait]
impl Processor for Named {
    async fn process(&self, log: &mut Log) -> eyre::Result<()> {
        log.add_message(self.0);
        Ok(())
    }
}

fn named(id: &'static str, order: Order) -> Arc<dyn Processor> {
    Arc::new(Named(id, order))
}

fn from(author_id: u64, bot: bool, role_ids: Vec<u64>) -> MessageEvent {
    MessageEvent {
        author: Author {
            id: author_id,
            bot,
            role_ids,
        },
        ..MessageEvent::new("https://mclo.gs/abc")
    }
}

#[test]
fn test_default_handler_order() {
    let pipeline = pipeline(MockFetcher::new());

    assert_eq!(pipeline.retriever_ids(), vec!["attachment", "direct-paste", "scrape"]);
    assert_eq!(
        pipeline.parser_ids(),
        vec![
            "launcher",
            "loader",
            "minecraft-version",
            "fabric-mods",
            "quilt-mods",
            "environment",
            "atlauncher",
            "multimc",
            "technic",
        ]
    );
    assert_eq!(
        pipeline.processor_ids(),
        vec![
            "rule-breaking-mods",
            "piracy",
            "player-ip",
            "crash-report",
            "mixin-errors",
            "java-class-version",
            "missing-dependencies",
            "incompatible-mods",
            "duplicate-mods",
            "loader-version",
            "qsl-version",
            "wrong-loader",
        ]
    );
}

#[tokio::test]
async fn test_processors_run_in_stable_order() {
    let pipeline = PipelineConfig::new()
        .with_processor(named("late", Order::Late))
        .with_processor(named("default-a", Order::Default))
        .with_processor(named("earlier", Order::Earlier))
        .with_processor(named("default-b", Order::Default))
        .build()
        .unwrap();

    let mut log = Log::new("");
    pipeline.process(&mut log).await;

    assert_eq!(log.messages(), &["earlier", "default-a", "default-b", "late"].map(String::from));
}

#[test]
fn test_replace_keeps_position() {
    let pipeline = PipelineConfig::new()
        .with_processor(named("a", Order::Default))
        .with_processor(named("b", Order::Default))
        .replace_processor(named("a", Order::Default))
        .replace_processor(named("c", Order::Default))
        .without_processor("b")
        .build()
        .unwrap();

    assert_eq!(pipeline.processor_ids(), vec!["a", "c"]);
}

#[test]
fn test_duplicate_identifiers_are_rejected() {
    let result = PipelineConfig::new()
        .with_processor(named("same", Order::Early))
        .with_processor(named("same", Order::Late))
        .build();

    assert!(matches!(result, Err(CozyError::InvalidConfig(message)) if message.contains("same")));
}

#[test]
fn test_url_pattern_needs_a_group() {
    let result = PipelineConfig::new().with_url_pattern(r"https?://\S+").build();
    assert!(matches!(result, Err(CozyError::InvalidConfig(_))));

    let result = PipelineConfig::new().with_url_pattern(r"(unclosed").build();
    assert!(matches!(result, Err(CozyError::InvalidConfig(_))));
}

#[test]
fn test_extract_urls() {
    let pipeline = PipelineConfig::new().build().unwrap();
    let text = "see <https://mclo.gs/abc>, also (https://pastebin.com/xyz) and https://mclo.gs/abc again";

    assert_eq!(
        pipeline.extract_urls(text),
        vec![
            Url::parse("https://mclo.gs/abc").unwrap(),
            Url::parse("https://pastebin.com/xyz").unwrap(),
        ]
    );
}

#[tokio::test]
async fn test_bots_are_ignored() {
    let pipeline = pipeline(serving(&[("https://api.mclo.gs/1/raw/abc", "log")]));

    assert_eq!(pipeline.handle_event(&from(1, true, vec![])).await, None);
    assert!(pipeline.handle_event(&from(1, false, vec![])).await.is_some());
}

#[tokio::test]
async fn test_channel_filter() {
    let pipeline = default_config(serving(&[]))
        .with_global_predicate(in_channels(vec![10]))
        .build()
        .unwrap();

    let elsewhere = MessageEvent {
        channel_id: 11,
        ..MessageEvent::new("hello")
    };
    let here = MessageEvent {
        channel_id: 10,
        ..MessageEvent::new("hello")
    };

    assert!(!pipeline.accepts(&elsewhere));
    assert!(pipeline.accepts(&here));
}

#[tokio::test]
async fn test_staff_and_user_commands() {
    let pipeline = default_config(serving(&[("https://api.mclo.gs/1/raw/abc", "log")]))
        .with_staff_predicate(has_any_role(vec![42]))
        .build()
        .unwrap();
    let target = from(2, true, vec![]);

    let member = from(3, false, vec![7]);
    let staff = from(4, false, vec![7, 42]);

    assert_eq!(pipeline.run_staff_command(&member, &target).await, None);
    assert!(pipeline.run_staff_command(&staff, &target).await.is_some());

    // The target is a bot message, which the global predicates reject.
    assert_eq!(pipeline.run_user_command(&member, &target).await, None);
    assert!(pipeline.run_user_command(&member, &from(2, false, vec![])).await.is_some());
}

#[tokio::test]
async fn test_fixture_end_to_end() {
    let url = attachment_url("latest.log");
    let pipeline = pipeline(serving(&[(url.as_str(), QUILT_FIXTURE)]));

    let report = pipeline.run(&message_with_attachment("latest.log")).await;

    assert_eq!(report.logs.len(), 1);
    assert_eq!(report.logs[0].source, Some(url));
    assert!(!report.aborted());
    assert!(!report.has_problems());
}

#[tokio::test]
async fn test_message_without_logs() {
    let report = pipeline(MockFetcher::new()).run(&MessageEvent::new("no links here")).await;

    assert_eq!(report, Report::default());
    assert!(report.is_empty());
    assert_eq!(report.render(), "");
}

fn log_report(source: &str, messages: &[&str], abort_reason: Option<&str>) -> LogReport {
    LogReport {
        source: Some(source.to_string()),
        messages: messages.iter().map(|message| message.to_string()).collect(),
        abort_reason: abort_reason.map(str::to_string),
        has_problems: false,
    }
}

#[test]
fn test_abort_takes_precedence() {
    let report = Report {
        logs: vec![
            log_report("https://mclo.gs/a", &["outdated loader"], None),
            log_report("https://mclo.gs/b", &[], Some("cheat client")),
        ],
    };

    assert!(report.aborted());
    assert_eq!(report.abort_messages(), vec!["cheat client"]);
    assert_eq!(report.messages(), vec!["cheat client"]);
    assert_eq!(report.render(), "**https://mclo.gs/b**\n- cheat client");
}

#[test]
fn test_render_labels_multiple_logs() {
    let report = Report {
        logs: vec![
            log_report("https://mclo.gs/a", &["first", "second"], None),
            log_report("https://mclo.gs/b", &["third"], None),
        ],
    };

    assert_eq!(
        report.render(),
        "**https://mclo.gs/a**\n- first\n- second\n\n**https://mclo.gs/b**\n- third"
    );
}

#[test]
fn test_render_single_log_is_unlabelled() {
    let report = Report {
        logs: vec![log_report("https://mclo.gs/a", &["first", "second"], None)],
    };

    assert_eq!(report.render(), "- first\n- second");
}

#[test]
fn test_render_nests_multiline_messages() {
    let report = Report {
        logs: vec![log_report(
            "https://mclo.gs/a",
            &["Incompatible mods found:\n- `optifabric`: use Sodium", "second"],
            None,
        )],
    };

    assert_eq!(
        report.render(),
        "- Incompatible mods found:\n  - `optifabric`: use Sodium\n- second"
    );
}

#[test]
fn test_render_is_truncated() {
    let long = "x".repeat(DISPLAY_LIMIT + 500);
    let report = Report {
        logs: vec![log_report("https://mclo.gs/a", &[long.as_str()], None)],
    };

    let rendered = report.render();

    assert_eq!(rendered.chars().count(), DISPLAY_LIMIT);
    assert!(rendered.ends_with(ELLIPSIS));
}

#[test]
fn test_truncate_counts_characters() {
    assert_eq!(truncate("ωωωω", 4), "ωωωω");
    assert_eq!(truncate("ωωωωω", 4), "ωωω…");
    assert_eq!(truncate("short", 100), "short");
}
