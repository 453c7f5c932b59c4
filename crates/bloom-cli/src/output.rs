//! Output formatting for CLI

use crate::error::CliResult;
use bloom_compiler::Extraction;
use bloom_types::CompiledProgram;
use clap::ValueEnum;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON format
    Json,
}

/// Render a compiled program.
pub fn render_program(program: &CompiledProgram, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(program)?),
        OutputFormat::Text => {
            let mut out = format!("Program {}: {}\n", program.name, program.summary());
            for group in &program.strata.groups {
                out.push_str(&format!("R[{}]:\n", group.index));
                for rule in &group.rules {
                    out.push_str(&format!("  {}\n", rule));
                }
            }
            for cycle in &program.diagnostics.cycles {
                out.push_str(&format!("Cycle: {}\n", cycle));
            }
            for warning in &program.diagnostics.underspecified {
                out.push_str(&format!("Warning: {}\n", warning));
            }
            if let Some(path) = &program.dump_path {
                out.push_str(&format!("Dump: {}\n", path.display()));
            }
            Ok(out)
        }
    }
}

/// Render the result of a check.
pub fn render_check(name: &str, extraction: &Extraction, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
            "name": name,
            "rules": extraction.rules,
            "edges": extraction.edges,
        }))?),
        OutputFormat::Text => {
            let mut out = format!(
                "Program {}: {} rules, {} dependency edges\n",
                name,
                extraction.rules.len(),
                extraction.edges.len()
            );
            for rule in &extraction.rules {
                out.push_str(&format!("  {} ({})\n", rule, rule.block));
            }
            Ok(out)
        }
    }
}
