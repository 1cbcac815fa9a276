use cozy_core::models::{Log, Ordered};
use lazy_static::lazy_static;
use regex::Regex;

use super::{Parser, capture, pattern};

lazy_static! {
    static ref CPU_NAME: Regex = pattern(r"(?im)^\s*Processor Name: (.+?)\s*$");
    static ref CPU_FALLBACK: Regex = pattern(r"(?im)^.*?\bCPU: (?:\d+x )?(.+?)\s*$");
    static ref PHYSICAL_CORES: Regex = pattern(r"(?i)Physical CPUs: (\d+)");
    static ref LOGICAL_CORES: Regex = pattern(r"(?i)Logical CPUs: (\d+)");
    static ref GPU: Regex = pattern(r"(?im)^\s*Backend API: (.+?)\s*$");
    static ref SHADERPACK: Regex = pattern(r"(?im)(?:loaded|using) shaderpack: (.+?)\s*$");
    static ref GAME_MEMORY: Regex = pattern(
        r"(?i)Memory: \d+ bytes \((\d+) MiB\) / \d+ bytes \((\d+) MiB\) up to \d+ bytes \((\d+) MiB\)"
    );
    static ref MEMORY_SLOT: Regex = pattern(r"(?im)Memory slot #\d+ capacity \(MB\): ([\d.,]+)");
    static ref OPERATING_SYSTEM: Regex = pattern(r"(?im)^\s*Operating System: (.+?)\s*$");
    static ref JAVA_VERSION: Regex = pattern(r"(?im)^\s*Java Version: ([^,\s]+), (.+?)\s*$");
    static ref JVM_FLAGS: Regex = pattern(r"(?im)^\s*JVM Flags: \d+ total; (.+?)\s*$");
}

/// Pulls hardware and runtime details out of crash-report system sections
/// and startup lines. Each field is matched independently.
pub struct EnvironmentParser;

impl Ordered for EnvironmentParser {
    fn identifier(&self) -> &str {
        "environment"
    }
}

impl Parser for EnvironmentParser {
    fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let content = &log.content;
        let environment = &mut log.environment;

        if let Some(cpu) = cpu(content) {
            environment.cpu = Some(cpu);
        }

        if let Some(gpu) = capture(&GPU, content) {
            environment.gpu = Some(gpu.to_string());
        }

        if let Some(shaderpack) = capture(&SHADERPACK, content) {
            environment.shaderpack = Some(shaderpack.to_string());
        }

        if let Some(memory) = game_memory(content) {
            environment.game_memory = Some(memory);
        }

        if let Some(memory) = system_memory(content) {
            environment.system_memory = Some(memory);
        }

        if let Some(os) = capture(&OPERATING_SYSTEM, content) {
            environment.os = Some(os.to_string());
        }

        if let Some(captures) = JAVA_VERSION.captures(content) {
            environment.java_version = captures[1].to_string();
            environment.jvm_version = captures[2].to_string();
        }

        if let Some(flags) = capture(&JVM_FLAGS, content) {
            environment.jvm_arguments = flags.to_string();
        }

        Ok(())
    }
}

fn cpu(content: &str) -> Option<String> {
    let name = capture(&CPU_NAME, content).or_else(|| capture(&CPU_FALLBACK, content))?;

    match (capture(&PHYSICAL_CORES, content), capture(&LOGICAL_CORES, content)) {
        (Some(cores), Some(threads)) => Some(format!("{} ({} cores, {} threads)", name, cores, threads)),
        _ => Some(name.to_string()),
    }
}

/// `"<current> MiB / <allocated> MiB (<max> MiB max)"`
fn game_memory(content: &str) -> Option<String> {
    let captures = GAME_MEMORY.captures(content)?;

    Some(format!(
        "{} MiB / {} MiB ({} MiB max)",
        &captures[1], &captures[2], &captures[3]
    ))
}

/// Sum of every memory slot's capacity, or `None` when no slot is listed.
fn system_memory(content: &str) -> Option<String> {
    let slots: Vec<f64> = MEMORY_SLOT
        .captures_iter(content)
        .filter_map(|captures| captures[1].replace(',', "").parse().ok())
        .collect();

    if slots.is_empty() {
        return None;
    }

    let total: f64 = slots.iter().sum();
    Some(format!("{} MiB", total.round() as u64))
}
