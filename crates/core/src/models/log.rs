use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

pub const UNKNOWN: &str = "Unknown";

/// A lenient dotted version string.
///
/// Minecraft and loader versions are mostly, but not always, semver
/// (`1.19`, `23w05a`, `0.18.1-beta.26`). The raw text is kept as-is and
/// comparison falls back to it when the numeric release parts are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric release components, e.g. `[0, 18, 1]` for `0.18.1-beta.26+build`.
    pub fn release(&self) -> Vec<u64> {
        self.0
            .split(['-', '+'])
            .next()
            .unwrap_or_default()
            .split('.')
            .map_while(|part| part.parse().ok())
            .collect()
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease().is_some()
    }

    /// Prerelease identifiers with build metadata removed, e.g. `beta.26` for
    /// `0.18.1-beta.26+build`.
    pub fn prerelease(&self) -> Option<&str> {
        self.0
            .split('+')
            .next()
            .unwrap_or_default()
            .split_once('-')
            .map(|(_, prerelease)| prerelease)
    }
}

/// Semver precedence between two prerelease strings: numeric identifiers
/// compare numerically and sort below alphanumeric ones.
fn compare_prerelease(mine: &str, theirs: &str) -> Ordering {
    let identifier = |id: &str| match id.parse::<u64>() {
        Ok(number) => (0, number, String::new()),
        Err(_) => (1, 0, id.to_string()),
    };

    mine.split('.')
        .map(identifier)
        .cmp(theirs.split('.').map(identifier))
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Version {
    fn from(raw: &str) -> Self {
        Version::new(raw)
    }
}

impl From<String> for Version {
    fn from(raw: String) -> Self {
        Version::new(raw)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let (mine, theirs) = (self.release(), other.release());
        let width = mine.len().max(theirs.len());
        let pad = |parts: &[u64]| {
            let mut parts = parts.to_vec();
            parts.resize(width, 0);
            parts
        };

        pad(&mine)
            .cmp(&pad(&theirs))
            .then_with(|| match (self.prerelease(), other.prerelease()) {
                (Some(mine), Some(theirs)) => compare_prerelease(mine, theirs),
                (mine, theirs) => theirs.is_some().cmp(&mine.is_some()),
            })
            .then_with(|| self.0.cmp(&other.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoaderKind {
    Fabric,
    Forge,
    Quilt,
}

impl LoaderKind {
    pub fn name(self) -> &'static str {
        match self {
            LoaderKind::Fabric => "Fabric",
            LoaderKind::Forge => "Forge",
            LoaderKind::Quilt => "Quilt",
        }
    }
}

impl fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LauncherName {
    ATLauncher,
    CurseForge,
    GDLauncher,
    MultiMC,
    PolyMC,
    Prism,
    Technic,
    TLauncher,
}

impl LauncherName {
    pub fn display_name(self) -> &'static str {
        match self {
            LauncherName::ATLauncher => "ATLauncher",
            LauncherName::CurseForge => "CurseForge",
            LauncherName::GDLauncher => "GDLauncher",
            LauncherName::MultiMC => "MultiMC",
            LauncherName::PolyMC => "PolyMC",
            LauncherName::Prism => "Prism Launcher",
            LauncherName::Technic => "Technic Launcher",
            LauncherName::TLauncher => "TLauncher",
        }
    }
}

impl fmt::Display for LauncherName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Launcher {
    pub name: LauncherName,
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mod {
    pub id: String,
    pub version: Version,
    pub path: Option<String>,
    pub hash: Option<String>,
    pub kind: Option<String>,
}

impl Mod {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: Version::new(version),
            path: None,
            hash: None,
            kind: None,
        }
    }
}

/// Hardware and runtime details pulled out of a log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub cpu: Option<String>,
    pub gpu: Option<String>,
    pub shaderpack: Option<String>,
    pub os: Option<String>,
    pub java_version: String,
    pub jvm_version: String,
    pub jvm_arguments: String,
    pub game_memory: Option<String>,
    pub system_memory: Option<String>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            cpu: None,
            gpu: None,
            shaderpack: None,
            os: None,
            java_version: UNKNOWN.to_string(),
            jvm_version: UNKNOWN.to_string(),
            jvm_arguments: UNKNOWN.to_string(),
            game_memory: None,
            system_memory: None,
        }
    }
}

/// One candidate log body and everything extracted from it.
///
/// Created per retrieved body, filled in by the parser chain, then read and
/// annotated by the processor chain. Diagnostics are append-only and the abort
/// reason can only ever be set once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub content: String,
    pub source_url: Option<String>,
    pub environment: Environment,
    pub launcher: Option<Launcher>,
    pub minecraft_version: Option<Version>,
    pub loader_versions: BTreeMap<LoaderKind, Version>,
    pub mods: BTreeMap<String, Mod>,
    messages: Vec<String>,
    abort_reason: Option<String>,
    has_problems: bool,
}

impl Log {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source_url: None,
            environment: Environment::default(),
            launcher: None,
            minecraft_version: None,
            loader_versions: BTreeMap::new(),
            mods: BTreeMap::new(),
            messages: Vec::new(),
            abort_reason: None,
            has_problems: false,
        }
    }

    pub fn with_source(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Inserts a mod, replacing any existing entry with the same id.
    pub fn add_mod(&mut self, entry: Mod) {
        self.mods.insert(entry.id.clone(), entry);
    }

    pub fn get_mod(&self, id: &str) -> Option<&Mod> {
        self.mods.get(id)
    }

    pub fn has_mod(&self, id: &str) -> bool {
        self.mods.contains_key(id)
    }

    pub fn set_loader(&mut self, kind: LoaderKind, version: impl Into<Version>) {
        self.loader_versions.insert(kind, version.into());
    }

    pub fn loader(&self, kind: LoaderKind) -> Option<&Version> {
        self.loader_versions.get(&kind)
    }

    pub fn launcher_is(&self, name: LauncherName) -> bool {
        self.launcher.as_ref().is_some_and(|launcher| launcher.name == name)
    }

    pub fn add_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Marks the log as aborted. The first reason given is kept.
    pub fn abort(&mut self, reason: impl Into<String>) {
        if self.abort_reason.is_none() {
            self.abort_reason = Some(reason.into());
        }
    }

    pub fn aborted(&self) -> bool {
        self.abort_reason.is_some()
    }

    pub fn abort_reason(&self) -> Option<&str> {
        self.abort_reason.as_deref()
    }

    pub fn mark_problem(&mut self) {
        self.has_problems = true;
    }

    pub fn has_problems(&self) -> bool {
        self.has_problems
    }
}
