use color_eyre::eyre::{eyre, Result, WrapErr};
use cozy_log_parser::{ParserSettings, PipelineConfig, Report};
use dotenv::dotenv;
use std::{env, fs};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Runs the parser and processor chains over a local log file.
///
/// Prints the structured log as JSON, then the report users would see.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let level = env::var("LOG_LEVEL")
        .ok()
        .and_then(|level| level.parse::<Level>().ok())
        .unwrap_or(Level::WARN);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let path = env::args()
        .nth(1)
        .ok_or_else(|| eyre!("Usage: parse-log <path to log>"))?;
    let content = fs::read_to_string(&path).wrap_err_with(|| format!("Unable to read {}", path))?;

    let settings = ParserSettings::from_env()?;
    let pipeline = PipelineConfig::from_settings(&settings)?.build()?;

    let log = pipeline.analyse(content, Some(path)).await;

    println!("{}", serde_json::to_string_pretty(&log)?);
    println!();
    println!("{}", Report::from_logs(&[log]).render());

    Ok(())
}
