use cozy_discord_bot::config::{parse_id_list, BotConfig};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tracing::Level;

fn config(log_level: Option<&str>) -> BotConfig {
    BotConfig {
        token: "test_token".to_string(),
        application_id: 12345,
        test_guild_id: None,
        staff_role_ids: vec![],
        log_channel_ids: vec![],
        log_level: log_level.map(str::to_string),
    }
}

#[test]
fn test_log_level_default() {
    assert_eq!(config(None).log_level(), Level::INFO);
}

#[rstest]
#[case("debug", Level::DEBUG)]
#[case("WARN", Level::WARN)]
#[case(" trace ", Level::TRACE)]
#[case("loud", Level::INFO)]
fn test_log_level_custom(#[case] raw: &str, #[case] expected: Level) {
    assert_eq!(config(Some(raw)).log_level(), expected);
}

#[rstest]
#[case("", vec![])]
#[case("42", vec![42])]
#[case("1, 2,3", vec![1, 2, 3])]
#[case("7,,8,", vec![7, 8])]
fn test_parse_id_list(#[case] raw: &str, #[case] expected: Vec<u64>) {
    assert_eq!(parse_id_list(raw).unwrap(), expected);
}

#[test]
fn test_parse_id_list_rejects_names() {
    let error = parse_id_list("123,moderators").unwrap_err();

    assert!(error.to_string().contains("moderators"));
}
