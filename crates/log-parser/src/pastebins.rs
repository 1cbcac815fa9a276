//! # Paste-site table
//!
//! Declarative description of how to turn a paste-site URL into raw log text:
//!
//! - `raw`: patterns for URLs that already serve raw text.
//! - `transforms`: `{ match, output, split? }` rewrite rules. `$N` in `output`
//!   is replaced with capture group `N`; `split` fans one group out into one
//!   request per delimited segment.
//! - `scrapes`: `{ match, selector, mode }` rules for pages that need HTML
//!   scraping, where `mode` is `first` (text of the first element) or `hrefs`
//!   (follow every matching link).
//!
//! A default table is compiled into the crate; deployments can load their own.

use cozy_core::errors::{CozyError, CozyResult};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN: &str = include_str!("../data/pastebins.json");

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\$(\d+)").unwrap();
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteSiteConfig {
    #[serde(default)]
    pub raw: Vec<String>,
    #[serde(default)]
    pub transforms: Vec<TransformRule>,
    #[serde(default)]
    pub scrapes: Vec<ScrapeRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRule {
    #[serde(rename = "match")]
    pub pattern: String,
    pub output: String,
    #[serde(default)]
    pub split: Option<SplitRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRule {
    pub group: usize,
    pub delimiter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRule {
    #[serde(rename = "match")]
    pub pattern: String,
    pub selector: String,
    pub mode: ScrapeMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeMode {
    First,
    Hrefs,
}

impl PasteSiteConfig {
    pub fn builtin() -> CozyResult<Self> {
        Self::from_json(BUILTIN)
    }

    pub fn from_json(json: &str) -> CozyResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CozyError::InvalidConfig(format!("Invalid paste-site table: {}", e)))
    }

    pub fn from_path(path: impl AsRef<Path>) -> CozyResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CozyError::InvalidConfig(format!("Unable to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&json)
    }

    /// Compiles every pattern and selector, failing on the first invalid one.
    pub fn compile(&self) -> CozyResult<CompiledPasteSites> {
        let raw = self
            .raw
            .iter()
            .map(|pattern| compile_pattern(pattern))
            .collect::<CozyResult<Vec<_>>>()?;

        let transforms = self
            .transforms
            .iter()
            .map(|rule| {
                if let Some(split) = &rule.split {
                    if split.delimiter.is_empty() {
                        return Err(CozyError::InvalidConfig(format!(
                            "Split delimiter for {} is empty",
                            rule.pattern
                        )));
                    }
                }

                Ok(CompiledTransform {
                    pattern: compile_pattern(&rule.pattern)?,
                    output: rule.output.clone(),
                    split: rule.split.clone(),
                })
            })
            .collect::<CozyResult<Vec<_>>>()?;

        let scrapes = self
            .scrapes
            .iter()
            .map(|rule| {
                Selector::parse(&rule.selector).map_err(|e| {
                    CozyError::InvalidConfig(format!("Invalid selector {}: {:?}", rule.selector, e))
                })?;

                Ok(CompiledScrape {
                    pattern: compile_pattern(&rule.pattern)?,
                    selector: rule.selector.clone(),
                    mode: rule.mode,
                })
            })
            .collect::<CozyResult<Vec<_>>>()?;

        Ok(CompiledPasteSites { raw, transforms, scrapes })
    }
}

fn compile_pattern(pattern: &str) -> CozyResult<Regex> {
    Regex::new(pattern)
        .map_err(|e| CozyError::InvalidConfig(format!("Invalid pattern {}: {}", pattern, e)))
}

#[derive(Debug, Clone)]
pub struct CompiledTransform {
    pub pattern: Regex,
    pub output: String,
    pub split: Option<SplitRule>,
}

impl CompiledTransform {
    /// Output URLs for `input`, or `None` when the rule doesn't match.
    pub fn apply(&self, input: &str) -> Option<Vec<String>> {
        let captures = self.pattern.captures(input)?;

        let Some(split) = &self.split else {
            return Some(vec![substitute(&self.output, &captures, None)]);
        };

        let value = captures.get(split.group).map_or("", |group| group.as_str());
        let urls = value
            .split(split.delimiter.as_str())
            .filter(|segment| !segment.is_empty())
            .map(|segment| substitute(&self.output, &captures, Some((split.group, segment))))
            .collect();

        Some(urls)
    }
}

#[derive(Debug, Clone)]
pub struct CompiledScrape {
    pub pattern: Regex,
    pub selector: String,
    pub mode: ScrapeMode,
}

#[derive(Debug, Clone)]
pub struct CompiledPasteSites {
    pub raw: Vec<Regex>,
    pub transforms: Vec<CompiledTransform>,
    pub scrapes: Vec<CompiledScrape>,
}

/// Replaces `$N` placeholders in `template` with capture group `N`.
///
/// `replacement` overrides one group's value; unknown groups become empty.
pub fn substitute(template: &str, captures: &Captures, replacement: Option<(usize, &str)>) -> String {
    PLACEHOLDER
        .replace_all(template, |placeholder: &Captures| {
            let Ok(index) = placeholder[1].parse::<usize>() else {
                return String::new();
            };

            match replacement {
                Some((group, value)) if group == index => value.to_string(),
                _ => captures.get(index).map_or("", |m| m.as_str()).to_string(),
            }
        })
        .into_owned()
}
