//! Structures and functions for the execution engine: a fixed-width stack machine with a flat
//! memory shared by code and data.

use std::fmt::{Display, Formatter};

use prettytable::{format as TableFormat, Table};
use strum_macros::Display as StrumDisplay;
use tracing::{debug, info, warn};

use crate::bytecode::Operation;
use crate::effect::Effect;
use crate::error::MachineError;
use crate::operations::propose;
use crate::word::{MachineConfig, Word};

/**
  Lifecycle of a machine instance.
    ```text
    Ready --execute--> Ready
    Ready --execute--> Halted   (executed `ha`)
    Ready --execute--> Faulted  (a step failed)
    any   --reset--> Ready
    ```
  Halted and Faulted are terminal: `execute` and `load` fail without changing anything.
*/
#[derive(StrumDisplay, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum MachineState {
  Ready,
  Halted,
  Faulted
}

/// The report of one successful step.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Step {
  /// Instruction pointer at the time of the fetch.
  pub address   : usize,
  pub operation : Operation,
  pub effect    : Effect
}

impl Step {
  pub fn opcode(&self) -> u8 {
    self.operation.code()
  }
}

impl Display for Step {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "[{:>3}] {:<17} {}", self.address, self.operation, self.effect)
  }
}

pub struct Machine {
  config  : MachineConfig,
  state   : MachineState,

  // Memory Stores
  memory  : Vec<Word>, // Code and data
  stack   : Vec<Word>, // Slots at or above `counter` are always zero

  // Registers //
  counter : usize,     // Number of live stack entries
  ip      : usize,     // Instruction Pointer
}

impl Machine {

  // region Display methods

  fn make_table(
      name      : char,
      cells     : &[Word],
      highlight : Option<usize>,
    ) -> Table
  {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ubl->"Contents"]);

    for (i, cell) in cells.iter().enumerate() {
      match highlight == Some(i) {

        true  => {
          table.add_row(
            row![r->format!("* --> {}[{}] =", name, i), format!("{}", cell)]
          );
        }

        false => {
          table.add_row(
            row![r->format!("{}[{}] =", name, i), format!("{}", cell)]
          );
        }

      } // end match on highlight
    } // end for
    table
  }

  // endregion

  // region Construction and queries

  pub fn new(config: MachineConfig) -> Machine {
    Machine {
      config,
      state   : MachineState::Ready,
      memory  : vec![0; config.memory_size()],
      stack   : vec![0; config.stack_size()],
      counter : 0,
      ip      : 0,
    }
  }

  pub fn config(&self) -> &MachineConfig {
    &self.config
  }

  pub fn state(&self) -> MachineState {
    self.state
  }

  pub fn ip(&self) -> usize {
    self.ip
  }

  pub fn stack_counter(&self) -> usize {
    self.counter
  }

  /// The live stack entries, bottom first.
  pub fn stack(&self) -> &[Word] {
    &self.stack[..self.counter]
  }

  pub fn memory(&self) -> &[Word] {
    &self.memory
  }

  // endregion

  // region Engine contract

  /**
    Copies `words` into memory starting at address zero. The rest of memory is left as it is, so
    call `reset` first when reusing a machine. Fails, without touching anything, if `words` is
    empty or longer than memory, or if the machine has halted or faulted and was not reset.
  */
  pub fn load(&mut self, words: &[Word]) -> Result<(), MachineError> {
    if self.state != MachineState::Ready {
      return Err(MachineError::NotRunning(self.state));
    }
    if words.is_empty() {
      return Err(MachineError::EmptyProgram);
    }
    if words.len() > self.memory.len() {
      return Err(MachineError::ProgramTooLong { length: words.len(), max: self.memory.len() });
    }
    for word in words {
      self.config.check_word(*word as i64)?;
    }

    self.memory[..words.len()].copy_from_slice(words);
    info!(length = words.len(), "loaded program");
    Ok(())
  }

  /// Zeroes memory and stack and rewinds the instruction pointer.
  pub fn reset(&mut self) {
    for cell in self.memory.iter_mut() { *cell = 0; }
    for cell in self.stack.iter_mut()  { *cell = 0; }
    self.counter = 0;
    self.ip      = 0;
    self.state   = MachineState::Ready;
    info!("machine reset");
  }

  /**
    Performs one fetch-decode-execute cycle. On failure nothing but the machine state changes:
    the machine is marked `Faulted` (unless it was not running to begin with) and the error is
    returned as data.
  */
  pub fn execute(&mut self) -> Result<Step, MachineError> {
    if self.state != MachineState::Ready {
      return Err(MachineError::NotRunning(self.state));
    }

    match self.try_step() {

      Ok(step) => {
        debug!(address = step.address, operation = %step.operation, effect = %step.effect, "step");
        self.commit(&step.effect);
        #[cfg(feature = "trace_computation")] println!("{}\n{}", step, self);
        Ok(step)
      }

      Err(error) => {
        warn!(address = self.ip, %error, "step faulted");
        self.state = MachineState::Faulted;
        Err(error)
      }

    }
  }

  // endregion

  // region Step internals

  fn try_step(&self) -> Result<Step, MachineError> {
    let word = self.memory[self.ip];
    let operation =
      Operation::from_word(word)
        .ok_or(MachineError::InvalidOpcode { word: word as i64, address: self.ip })?;

    let effect = propose(operation, self)?.validate(&self.config, self.counter, self.ip)?;

    Ok(Step{ address: self.ip, operation, effect })
  }

  /// Applies a validated effect. Cannot fail.
  fn commit(&mut self, effect: &Effect) {
    for _ in 0..effect.pop_count {
      self.counter -= 1;
      self.stack[self.counter] = 0;
    }

    for value in &effect.pushed {
      self.stack[self.counter] = *value;
      self.counter += 1;
    }

    if let Some(write) = effect.write {
      self.memory[write.address] = write.value;
    }

    match effect.halt {
      true  => self.state = MachineState::Halted,
      false => self.ip = (self.ip as i64 + effect.ip_delta) as usize
    }
  }

  // endregion

}


lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for Machine {

  // Memory is shown up to the last nonzero cell or the IP, whichever is later.
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let used = self.memory
                   .iter()
                   .rposition(|w| *w != 0)
                   .map_or(0, |i| i + 1)
                   .max(self.ip + 1);

    let top = self.counter.checked_sub(1);
    let m_table = Machine::make_table('M', &self.memory[..used], Some(self.ip));
    let s_table = Machine::make_table('S', self.stack(), top);

    let mut combined_table = table!([m_table, s_table]);

    combined_table.set_titles(row![ub->"Memory", ub->"Stack"]);
    combined_table.set_format(*TABLE_DISPLAY_FORMAT);

    write!(f, "State: {}\tIP: {}\tCounter: {}\n{}", self.state, self.ip, self.counter, combined_table)
  }
}
