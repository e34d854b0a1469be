use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::Level;

use stack_vm::{assemble, disassemble, logging, run_with, Machine, MachineConfig, RunOutcome};

/// Assembles and runs a stack machine program.
#[derive(Parser, Debug)]
#[command(name = "stack-vm", version)]
struct Cli {
  /// Program text, one mnemonic or integer per line
  program: PathBuf,

  /// Machine word size in bits
  #[arg(long, default_value_t = 8)]
  word_bits: u32,

  /// Stop after this many steps
  #[arg(long, default_value_t = 10_000)]
  max_steps: usize,

  /// Print every step report
  #[arg(long)]
  trace: bool,

  /// Print the binary image and its disassembly instead of running
  #[arg(long)]
  assemble_only: bool,

  /// Log at debug level
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  logging::init(if cli.verbose { Level::DEBUG } else { Level::WARN });

  let config = MachineConfig::new(cli.word_bits)?;
  let text = std::fs::read_to_string(&cli.program)
    .with_context(|| format!("reading {}", cli.program.display()))?;
  let program = assemble(&text, &config)
    .with_context(|| format!("assembling {}", cli.program.display()))?;

  if cli.assemble_only {
    for (address, (word, line)) in program.iter().zip(disassemble(&program)).enumerate() {
      println!("{:>5}: {:>6}  {}", address, word, line);
    }
    return Ok(());
  }

  let mut machine = Machine::new(config);
  machine.load(&program)?;

  let trace = cli.trace;
  let outcome = run_with(&mut machine, cli.max_steps, |step| {
    if trace {
      println!("{}", step);
    }
  });

  println!("{}", machine);
  println!("{}", outcome);

  match outcome {
    RunOutcome::Faulted { error, .. } => Err(error.into()),
    _                                 => Ok(())
  }
}
