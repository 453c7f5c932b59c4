//! Compile command

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{render_program, OutputFormat};
use crate::program_file::{load_strata, ProgramFile};
use bloom_compiler::RuleCompiler;
use bloom_types::CompiledProgram;
use clap::Args;
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments of `bloomc compile`
#[derive(Args, Debug, Clone, Default)]
pub struct CompileArgs {
    /// Program description file (JSON)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Write `<Program>_rewritten.txt`
    #[arg(long)]
    pub dump: bool,

    /// Directory for the rewrite dump
    #[arg(long)]
    pub dump_dir: Option<PathBuf>,

    /// Log every accepted rule-block AST
    #[arg(long)]
    pub dump_ast: bool,

    /// Dependency analysis rounds
    #[arg(long)]
    pub rounds: Option<u32>,

    /// Preset strata file (`collection stratum` per line)
    #[arg(long)]
    pub strata: Option<PathBuf>,
}

/// Compile the program described by `args`.
pub fn compile(args: &CompileArgs, config: &CliConfig) -> CliResult<CompiledProgram> {
    let mut compiler_config = config.compiler.clone();
    if args.dump {
        compiler_config.dump_rewrite = true;
    }
    if let Some(dir) = &args.dump_dir {
        compiler_config.dump_dir = dir.clone();
    }
    if args.dump_ast {
        compiler_config.dump_ast = true;
    }
    if let Some(rounds) = args.rounds {
        compiler_config.analysis_rounds = rounds;
    }
    debug!(config = ?compiler_config, "Compiler configuration");

    let (spec, source) = ProgramFile::load(&args.file)?.into_parts()?;

    let mut compiler = RuleCompiler::with_config(compiler_config);
    if let Some(path) = args.strata.as_ref().or(config.strata.as_ref()) {
        info!(path = %path.display(), "Using preset strata");
        compiler = compiler.with_stratifier(Box::new(load_strata(path)?));
    }

    Ok(compiler.compile(&spec, &source)?)
}

/// Run `bloomc compile`.
pub fn execute(args: CompileArgs, config: &CliConfig, format: OutputFormat) -> CliResult<()> {
    let program = compile(&args, config)?;
    print!("{}", render_program(&program, format)?);
    Ok(())
}
