//! Check command

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{render_check, OutputFormat};
use crate::program_file::ProgramFile;
use bloom_compiler::{Extraction, RuleCompiler};
use clap::Args;
use std::path::PathBuf;

/// Arguments of `bloomc check`
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Program description file (JSON)
    #[arg(short, long)]
    pub file: PathBuf,
}

/// Validate every rule block of a program without stratifying it.
pub fn check(args: &CheckArgs, config: &CliConfig) -> CliResult<(String, Extraction)> {
    let (spec, source) = ProgramFile::load(&args.file)?.into_parts()?;
    let extraction = RuleCompiler::with_config(config.compiler.clone()).check(&spec, &source)?;
    Ok((spec.name, extraction))
}

/// Run `bloomc check`.
pub fn execute(args: CheckArgs, config: &CliConfig, format: OutputFormat) -> CliResult<()> {
    let (name, extraction) = check(&args, config)?;
    print!("{}", render_check(&name, &extraction, format)?);
    Ok(())
}
