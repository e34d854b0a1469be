//! Drives a machine through repeated single steps. The engine has no notion of continuous
//! running; this is simply a loop around `Machine::execute` that stops on halt, on a fault, or
//! when the step budget runs out. Stopping early is always safe because no state survives a
//! step boundary.

use std::fmt::{Display, Formatter};

use tracing::info;

use crate::error::MachineError;
use crate::machine::{Machine, Step};

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum RunOutcome {
  Halted { steps: usize },
  Faulted { steps: usize, error: MachineError },
  /// The step budget ran out. The machine is still ready to step.
  Interrupted { steps: usize }
}

impl RunOutcome {
  /// Number of successful steps taken.
  pub fn steps(&self) -> usize {
    match self {
      | RunOutcome::Halted { steps }
      | RunOutcome::Faulted { steps, .. }
      | RunOutcome::Interrupted { steps } => *steps
    }
  }
}

impl Display for RunOutcome {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      RunOutcome::Halted { steps } => write!(f, "halted after {} steps", steps),
      RunOutcome::Faulted { steps, error } => {
        write!(f, "faulted after {} steps: {}", steps, error)
      }
      RunOutcome::Interrupted { steps } => write!(f, "interrupted after {} steps", steps),
    }
  }
}

pub fn run(machine: &mut Machine, max_steps: usize) -> RunOutcome {
  run_with(machine, max_steps, |_| {})
}

/// Like `run`, calling `observer` with every successful step.
pub fn run_with<F>(machine: &mut Machine, max_steps: usize, mut observer: F) -> RunOutcome
  where F: FnMut(&Step)
{
  let mut steps = 0;

  let outcome = loop {
    if steps == max_steps {
      break RunOutcome::Interrupted { steps };
    }

    match machine.execute() {

      Ok(step) => {
        steps += 1;
        observer(&step);
        if step.effect.halt {
          break RunOutcome::Halted { steps };
        }
      }

      Err(error) => break RunOutcome::Faulted { steps, error }

    }
  };

  info!(%outcome, "run finished");
  outcome
}
