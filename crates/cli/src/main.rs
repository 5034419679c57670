//! C-Machine command-line interface.
//!
//! This binary provides a single entry point for working with listings. It performs:
//! 1. **Run:** Assemble a listing and execute it; the process exits with the program's exit code.
//! 2. **Check:** Assemble a listing and report the first error, without executing it.
//! 3. **Disassemble:** Print the assembled program with resolved addresses and synthetic labels.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cmavm_core::asm::{assemble, render_diagnostic};
use cmavm_core::common::{ConfigError, Error, LoadError};
use cmavm_core::isa::disasm::disassemble;
use cmavm_core::sim::loader::load_source;
use cmavm_core::stats::STATS_SECTIONS;
use cmavm_core::{Interpreter, MachineConfig, Program};

#[derive(Parser, Debug)]
#[command(
    name = "cma",
    author,
    version,
    about = "C-Machine assembler and interpreter",
    long_about = "Assemble and run C-Machine instruction listings.\n\nExamples:\n  cma run fact.cma\n  cma run fact.cma --stats --max-steps 100000\n  cma check fact.cma\n  cma disasm fact.cma"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble and execute a listing. Exits with the program's exit code.
    Run {
        /// Listing to execute.
        file: PathBuf,

        /// JSON machine configuration; command-line limits override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Maximum operand stack depth in cells.
        #[arg(long)]
        stack_limit: Option<usize>,

        /// Maximum number of heap cells.
        #[arg(long)]
        heap_limit: Option<usize>,

        /// Stop with a fault after this many instructions.
        #[arg(long)]
        max_steps: Option<u64>,

        /// Log every executed instruction to stderr.
        #[arg(long)]
        trace: bool,

        /// Print execution statistics after the run.
        #[arg(long)]
        stats: bool,

        /// Restrict statistics to these sections (comma separated).
        #[arg(long, value_delimiter = ',', value_parser = clap::builder::PossibleValuesParser::new(STATS_SECTIONS.iter().copied()))]
        stats_sections: Vec<String>,
    },

    /// Assemble a listing and report errors without running it.
    Check {
        /// Listing to check.
        file: PathBuf,
    },

    /// Print the assembled program.
    Disasm {
        /// Listing to disassemble.
        file: PathBuf,
    },
}

/// Why a command did not complete.
enum Failure {
    /// A diagnostic has already been written to stderr.
    Reported,
    /// An error still to be reported.
    Error(Error),
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Self::Error(err)
    }
}

impl From<LoadError> for Failure {
    fn from(err: LoadError) -> Self {
        Self::Error(err.into())
    }
}

impl From<ConfigError> for Failure {
    fn from(err: ConfigError) -> Self {
        Self::Error(err.into())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Commands::Run { trace: true, .. }));

    let result = match cli.command {
        Commands::Run {
            file,
            config,
            stack_limit,
            heap_limit,
            max_steps,
            trace,
            stats,
            stats_sections,
        } => {
            let overrides = Overrides {
                stack_limit,
                heap_limit,
                max_steps,
                trace,
            };
            let sections = (stats || !stats_sections.is_empty()).then_some(stats_sections);
            cmd_run(&file, config.as_deref(), &overrides, sections.as_deref())
        }
        Commands::Check { file } => cmd_check(&file),
        Commands::Disasm { file } => cmd_disasm(&file),
    };

    match result {
        Ok(code) => code,
        Err(Failure::Reported) => ExitCode::FAILURE,
        Err(Failure::Error(err)) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` applies unless `--trace` forces `trace`.
fn init_tracing(trace: bool) {
    let filter = if trace {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Reads and assembles `path`, printing a source-annotated diagnostic on failure.
fn assemble_file(path: &Path) -> Result<Program, Failure> {
    let source = load_source(path)?;
    assemble(&source).map_err(|err| {
        eprint!("{}", render_diagnostic(&path.display().to_string(), &source, &err));
        Failure::Reported
    })
}

/// Command-line settings layered over the configuration file.
struct Overrides {
    stack_limit: Option<usize>,
    heap_limit: Option<usize>,
    max_steps: Option<u64>,
    trace: bool,
}

fn build_config(file: Option<&Path>, overrides: &Overrides) -> Result<MachineConfig, Failure> {
    let mut config = match file {
        Some(path) => MachineConfig::from_json(&load_source(path)?)?,
        None => MachineConfig::default(),
    };
    if let Some(limit) = overrides.stack_limit {
        config.stack_limit = limit;
    }
    if let Some(limit) = overrides.heap_limit {
        config.heap_limit = limit;
    }
    if overrides.max_steps.is_some() {
        config.max_steps = overrides.max_steps;
    }
    config.trace_instructions |= overrides.trace;
    config.validate()?;
    Ok(config)
}

/// Assembles and runs a listing; the process exit status is the program's exit code.
fn cmd_run(
    file: &Path,
    config_file: Option<&Path>,
    overrides: &Overrides,
    stats_sections: Option<&[String]>,
) -> Result<ExitCode, Failure> {
    let config = build_config(config_file, overrides)?;
    let program = assemble_file(file)?;
    debug!(file = %file.display(), instructions = program.len(), "running listing");

    let report = Interpreter::new(program, config)?.run_with_stats();
    if let Some(sections) = stats_sections {
        report.stats.print_sections(sections);
    }

    let code = report.outcome.map_err(Error::from)?;
    println!("[*] Exit code {code}");
    Ok(ExitCode::from(code as u8))
}

fn cmd_check(file: &Path) -> Result<ExitCode, Failure> {
    let program = assemble_file(file)?;
    println!("{}: ok ({} instructions)", file.display(), program.len());
    Ok(ExitCode::SUCCESS)
}

fn cmd_disasm(file: &Path) -> Result<ExitCode, Failure> {
    let program = assemble_file(file)?;
    print!("{}", disassemble(&program));
    Ok(ExitCode::SUCCESS)
}
