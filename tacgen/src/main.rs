//! tacgen CLI

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::path::{Path, PathBuf};

use tacgen::ast::Program;
use tacgen::error::report_error;
use tacgen::interp::Machine;
use tacgen::tac::format_tac;
use tacgen::{lower_program, LowerConfig, TacProgram};

#[derive(Parser)]
#[command(name = "tacgen", version, about = "Lower annotated ASTs to three-address code")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lower a JSON AST and print the IR
    Lower {
        /// JSON AST file
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Verify the IR before printing it
        #[arg(long)]
        verify: bool,
        /// Source file the AST spans point into, for diagnostics
        #[arg(long)]
        source: Option<PathBuf>,
    },
    /// Lower a JSON AST and execute one function
    Run {
        /// JSON AST file
        file: PathBuf,
        /// Function to execute (defaults to the configured entry)
        #[arg(long)]
        entry: Option<String>,
        /// Integer arguments
        #[arg(allow_negative_numbers = true)]
        args: Vec<i32>,
    },
    /// Lower and verify a JSON AST
    Check {
        /// JSON AST file
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    tacgen::logging::init(cli.verbose, cli.quiet);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Command::Lower {
            file,
            format,
            verify,
            source,
        } => {
            let verify = verify || config.verify;
            lower_file(&file, format, source.as_deref(), config.with_verify(verify))
        }
        Command::Run { file, entry, args } => {
            let config = match entry {
                Some(entry) => config.with_entry(entry),
                None => config,
            };
            run_file(&file, &args, config)
        }
        Command::Check { file } => check_file(&file, config.with_verify(true)),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<LowerConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let config = LowerConfig::load(path)?;
            info!("loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(LowerConfig::default()),
    }
}

/// Read, decode and lower `path`. With `source`, span-carrying errors are
/// rendered against that file.
fn lower_path(
    path: &Path,
    source: Option<&Path>,
    config: &LowerConfig,
) -> Result<TacProgram, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    let program = Program::from_json(&json)?;
    info!("{}: {} function(s)", path.display(), program.functions.len());

    match (lower_program(&program, config), source) {
        (Ok(tac), _) => Ok(tac),
        (Err(e), Some(src)) if e.span().is_some() => {
            let text = std::fs::read_to_string(src)?;
            report_error(&src.display().to_string(), &text, &e);
            Err("lowering failed".into())
        }
        (Err(e), _) => Err(e.into()),
    }
}

fn lower_file(
    path: &Path,
    format: Format,
    source: Option<&Path>,
    config: LowerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let tac = lower_path(path, source, &config)?;
    match format {
        Format::Text => print!("{}", format_tac(&tac)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&tac)?),
    }
    Ok(())
}

fn run_file(path: &Path, args: &[i32], config: LowerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let tac = lower_path(path, None, &config)?;
    let machine = Machine::new(config.step_limit);
    let value = machine.run_named(&tac, &config.entry, args)?;
    println!("{value}");
    Ok(())
}

fn check_file(path: &Path, config: LowerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let tac = lower_path(path, None, &config)?;
    println!(
        "✓ {} lowers and verifies ({} piece(s))",
        path.display(),
        tac.pieces.len()
    );
    Ok(())
}
