//! # Log parser settings
//!
//! Runtime knobs for the production pipeline, loaded from the environment.
//!
//! ## Environment Variables
//!
//! - `LOG_PARSER_FETCH_TIMEOUT_SECONDS`: timeout for each HTTP request (default: 10)
//! - `LOG_PARSER_CACHE_TTL_SECONDS`: lifetime of cached version lookups (default: 600)
//! - `LOG_PARSER_PASTEBINS_PATH`: JSON paste-site table replacing the built-in one
//! - `LOG_PARSER_RULES_URL`: link included in rule-violation messages

use eyre::{Result, WrapErr};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::DEFAULT_TTL;
use crate::processors::DEFAULT_RULES_URL;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserSettings {
    pub fetch_timeout: Duration,
    pub cache_ttl: Duration,
    pub pastebins_path: Option<PathBuf>,
    pub rules_url: String,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            cache_ttl: DEFAULT_TTL,
            pastebins_path: None,
            rules_url: DEFAULT_RULES_URL.to_string(),
        }
    }
}

impl ParserSettings {
    /// Loads settings from environment variables, falling back to defaults
    /// for anything unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a duration variable is set but is not a whole
    /// number of seconds.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let fetch_timeout = seconds_var("LOG_PARSER_FETCH_TIMEOUT_SECONDS")?
            .unwrap_or(defaults.fetch_timeout);
        let cache_ttl = seconds_var("LOG_PARSER_CACHE_TTL_SECONDS")?.unwrap_or(defaults.cache_ttl);

        let pastebins_path = env::var("LOG_PARSER_PASTEBINS_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let rules_url = env::var("LOG_PARSER_RULES_URL").unwrap_or(defaults.rules_url);

        Ok(Self {
            fetch_timeout,
            cache_ttl,
            pastebins_path,
            rules_url,
        })
    }
}

fn seconds_var(name: &str) -> Result<Option<Duration>> {
    let Ok(raw) = env::var(name) else {
        return Ok(None);
    };

    let seconds = raw
        .trim()
        .parse::<u64>()
        .wrap_err_with(|| format!("Invalid {} value", name))?;

    Ok(Some(Duration::from_secs(seconds)))
}
