use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use tacvm::bytecode::Program;
use tacvm::bytecode::disasm::print_bc;
use tacvm::ir::dot::write_dot;
use tacvm::lang::Node;
use tacvm::logging::{self, LogLevel};
use tacvm::pipeline;
use tacvm::runtime::{Vm, VmConfig};

#[derive(Parser)]
#[command(name = "tacvm", version, about = "Three-address code compiler and stack VM")]
struct Cli {
    /// More diagnostics on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Explicit log level; overrides -v
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate an AST dump to bytecode
    Compile {
        /// Tree as JSON: {"type", "value", "lineno", "children"}
        input: PathBuf,

        #[arg(short, long, default_value = "output.class")]
        output: PathBuf,

        /// Where to write the CFG in DOT format
        #[arg(long, default_value = "ir.dot")]
        cfg: PathBuf,
    },

    /// Execute a bytecode file
    Run {
        file: PathBuf,

        /// Abort after this many executed instructions
        #[arg(long)]
        max_steps: Option<usize>,
    },

    /// Print a numbered listing of a bytecode file
    Disasm { file: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .unwrap_or_else(|| LogLevel::from_verbosity(cli.verbose));
    logging::init(level);

    if let Err(e) = dispatch(cli.command) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Compile { input, output, cfg } => compile(&input, &output, &cfg),
        Command::Run { file, max_steps } => run(&file, max_steps),
        Command::Disasm { file } => {
            print_bc(&load_program(&file)?);
            Ok(())
        }
    }
}

fn compile(input: &Path, output: &Path, cfg_path: &Path) -> Result<()> {
    let source = fs::read_to_string(input)
        .with_context(|| format!("failed to read '{}'", input.display()))?;
    let root: Node = serde_json::from_str(&source)
        .with_context(|| format!("'{}' is not a valid AST dump", input.display()))?;

    let compiled = pipeline::compile(&root);
    write_dot(&compiled.translation.cfg, cfg_path);

    fs::write(output, compiled.program.to_text())
        .with_context(|| format!("failed to write '{}'", output.display()))?;
    info!(path = %output.display(), ops = compiled.program.len(), "bytecode written");

    if let Some(e) = compiled.error() {
        bail!("{}", e);
    }
    Ok(())
}

fn run(file: &Path, max_steps: Option<usize>) -> Result<()> {
    let program = load_program(file)?;

    let mut vm = Vm::with_config(VmConfig {
        max_steps,
        ..VmConfig::default()
    });
    let stdout = io::stdout();
    vm.run_to(&program, &mut stdout.lock())?;
    Ok(())
}

fn load_program(file: &Path) -> Result<Program> {
    ensure_extension(file)?;
    let source = fs::read_to_string(file)
        .with_context(|| format!("failed to read '{}'", file.display()))?;
    Program::parse(&source).with_context(|| format!("in '{}'", file.display()))
}

fn ensure_extension(file: &Path) -> Result<()> {
    if file.extension().and_then(|e| e.to_str()) != Some("class") {
        bail!("expected a .class file, got {}", file.display());
    }
    Ok(())
}
