//! bloomc - Command-line front end for the Bloom rule compiler
//!
//! This CLI lets developers:
//! - Compile a program description into a stratified rule listing
//! - Check rule blocks for grammar errors without stratifying
//! - Write the `<Program>_rewritten.txt` dump
//! - Inspect underspecified-dataflow warnings and dependency cycles

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod program_file;

use commands::{check, compile};
use config::CliConfig;
pub use error::{CliError, CliResult};

/// bloomc application
#[derive(Parser, Debug)]
#[command(name = "bloomc")]
#[command(about = "bloomc - Bloom rule compiler", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "BLOOM_CONFIG", global = true)]
    pub config: Option<String>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    pub output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a program into stratified rule groups
    Compile(compile::CompileArgs),

    /// Validate rule blocks only
    Check(check::CheckArgs),

    /// Show the effective configuration
    Config,
}

/// Run using the current process arguments.
pub fn run() -> CliResult<()> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator.
pub fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    // Load config
    let config = CliConfig::load(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Compile(args) => compile::execute(args, &config, cli.output),
        Commands::Check(args) => check::execute(args, &config, cli.output),
        Commands::Config => {
            println!("Config: {:?}", config);
            Ok(())
        }
    }
}
