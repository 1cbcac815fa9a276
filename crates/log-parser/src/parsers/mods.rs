use cozy_core::models::{LoaderKind, Log, Mod, Ordered};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

use super::{Parser, pattern};

lazy_static! {
    static ref LIST_HEADER: Regex = pattern(r"(?i)Loading \d+ mods:");
    static ref LIST_ENTRY: Regex = pattern(r"^\s*(?:-|\\--|\|--)\s*(\S+)\s+(\S+)");
    static ref TABLE_SEPARATOR: Regex = pattern(r"^\|(?:\s*:?-+:?\s*\|)+\s*$");
}

/// Reads the indented `Loading N mods:` list printed by Fabric-style loaders.
///
/// The list ends at the first line that is not indented.
pub struct FabricModsParser;

impl Ordered for FabricModsParser {
    fn identifier(&self) -> &str {
        "fabric-mods"
    }
}

impl Parser for FabricModsParser {
    fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let Some(header) = LIST_HEADER.find(&log.content) else {
            return Ok(());
        };

        let entries: Vec<Mod> = log.content[header.end()..]
            .lines()
            .skip(1)
            .take_while(|line| line.starts_with([' ', '\t']))
            .filter_map(|line| LIST_ENTRY.captures(line))
            .map(|captures| Mod::new(&captures[1], &captures[2]))
            .collect();

        debug!("Found {} mods in mod list", entries.len());
        for entry in entries {
            log.add_mod(entry);
        }
        copy_java_version(log);

        Ok(())
    }
}

/// Reads Quilt's fixed-width mod table.
///
/// ```text
/// | Index | Mod          | ID           | Version | File(s)          |
/// | ----: | ------------ | ------------ | ------- | ---------------- |
/// |     0 | Quilt Loader | quilt_loader | 0.18.10 | <quilt>          |
/// ```
///
/// Cells are cut using the widths of the separator row rather than by
/// splitting on `|`, since names and paths may contain the border character.
pub struct QuiltModsParser;

impl Ordered for QuiltModsParser {
    fn identifier(&self) -> &str {
        "quilt-mods"
    }
}

impl Parser for QuiltModsParser {
    fn predicate(&self, log: &Log) -> bool {
        log.loader(LoaderKind::Quilt).is_some()
    }

    fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let Some(rows) = parse_table(&log.content) else {
            debug!("Quilt loader detected but no mod table found");
            return Ok(());
        };

        let entries: Vec<Mod> = rows.iter().filter_map(row_to_mod).collect();
        debug!("Found {} mods in mod table", entries.len());

        for entry in entries {
            log.add_mod(entry);
        }
        copy_java_version(log);

        Ok(())
    }
}

fn copy_java_version(log: &mut Log) {
    if let Some(version) = log.get_mod("java").map(|java| java.version.to_string()) {
        log.environment.java_version = version;
    }
}

fn row_to_mod(row: &HashMap<String, String>) -> Option<Mod> {
    let cell = |name: &str| row.get(name).filter(|value| !value.is_empty()).cloned();

    let mut entry = Mod::new(cell("id")?, cell("version")?);
    entry.path = cell("file(s)");
    entry.hash = cell("file hash (sha-1)");
    entry.kind = cell("type");

    Some(entry)
}

/// Finds the first pipe table in `content` and returns its rows keyed by the
/// lower-cased header names.
pub fn parse_table(content: &str) -> Option<Vec<HashMap<String, String>>> {
    let lines: Vec<&str> = content.lines().collect();

    let (start, offset) = lines.windows(2).enumerate().find_map(|(index, pair)| {
        let offset = pair[1].chars().position(|c| c == '|')?;
        let separator: String = pair[1].chars().skip(offset).collect();
        let header_aligned = pair[0].chars().nth(offset) == Some('|');

        (header_aligned && TABLE_SEPARATOR.is_match(&separator)).then_some((index, offset))
    })?;

    let widths = column_widths(&lines[start + 1].chars().skip(offset).collect::<String>());
    let headers: Vec<String> = slice_row(lines[start], offset, &widths)
        .into_iter()
        .map(|name| name.to_lowercase())
        .collect();

    let rows: Vec<HashMap<String, String>> = lines[start + 2..]
        .iter()
        .take_while(|line| line.chars().nth(offset) == Some('|'))
        .map(|line| {
            headers
                .iter()
                .cloned()
                .zip(slice_row(line, offset, &widths))
                .collect::<HashMap<_, _>>()
        })
        .collect();

    Some(rows)
}

/// Widths of each column, measured between the borders of a separator row.
fn column_widths(separator: &str) -> Vec<usize> {
    let inner = separator.trim_end().trim_start_matches('|').trim_end_matches('|');
    inner.split('|').map(|cell| cell.chars().count()).collect()
}

/// Cuts a row into trimmed cells, starting at the border at `offset`.
fn slice_row(row: &str, offset: usize, widths: &[usize]) -> Vec<String> {
    let chars: Vec<char> = row.chars().skip(offset).collect();
    let mut cursor = 1;

    widths
        .iter()
        .map(|width| {
            let start = cursor.min(chars.len());
            let end = (cursor + width).min(chars.len());
            cursor += width + 1;

            chars[start..end].iter().collect::<String>().trim().to_string()
        })
        .collect()
}
