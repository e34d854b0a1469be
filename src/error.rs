//! Error types for the assembler, the execution engine, and machine configuration. Each error
//! maps onto one of a small number of `ErrorCategory` classes so that a driver can tell a bad
//! program apart from a machine fault.

use strum_macros::Display as StrumDisplay;
use thiserror::Error;

use crate::machine::MachineState;

#[derive(StrumDisplay, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum ErrorCategory {
  Syntax,
  Range,
  StackUnderflow,
  InvalidOpcode,
  State,
  Config
}

/// Failures of `parse`, `generate`, or `assemble`. Line numbers are 1-based source lines, blank
/// lines included. Data indices count nodes, i.e. they are memory addresses.
#[derive(Error, Clone, Eq, PartialEq, Debug)]
pub enum AssemblyError {
  #[error("program has {lines} lines but memory holds only {max} words")]
  TooManyLines { lines: usize, max: usize },

  #[error("syntax error on line {line}: `{text}`")]
  Syntax { line: usize, text: String },

  #[error("invalid code on line {line}: `{token}` is neither an integer nor an operation")]
  InvalidCode { line: usize, token: String },

  #[error("integer literal on line {line} is too large: `{token}`")]
  LiteralTooLarge { line: usize, token: String },

  #[error("data at index {index} is out of range: {value} is not in [{min}, {max}]")]
  DataOutOfRange { index: usize, value: i64, min: i64, max: i64 },

  #[error("program is empty")]
  Empty
}

impl AssemblyError {
  pub fn category(&self) -> ErrorCategory {
    match self {
      | AssemblyError::Syntax { .. }
      | AssemblyError::InvalidCode { .. }     => ErrorCategory::Syntax,

      | AssemblyError::LiteralTooLarge { .. }
      | AssemblyError::TooManyLines { .. }
      | AssemblyError::DataOutOfRange { .. }
      | AssemblyError::Empty                  => ErrorCategory::Range
    }
  }
}

/// Failures of `Machine::load` and `Machine::execute`. A failed `execute` leaves the machine
/// state untouched apart from marking it faulted.
#[derive(Error, Clone, Eq, PartialEq, Debug)]
pub enum MachineError {
  #[error("value {value} is out of the word range")]
  WordOutOfRange { value: i64 },

  #[error("address {address} is outside of memory")]
  AddressOutOfRange { address: i64 },

  #[error("stack underflow: {required} entries required but {available} available")]
  StackUnderflow { required: usize, available: usize },

  #[error("stack overflow: {required} entries required but capacity is {capacity}")]
  StackOverflow { required: usize, capacity: usize },

  #[error("invalid opcode {word} at address {address}")]
  InvalidOpcode { word: i64, address: usize },

  #[error("cannot load an empty program")]
  EmptyProgram,

  #[error("program of {length} words does not fit in {max} memory cells")]
  ProgramTooLong { length: usize, max: usize },

  #[error("machine is {0}; reset and load a program first")]
  NotRunning(MachineState)
}

impl MachineError {
  pub fn category(&self) -> ErrorCategory {
    match self {
      | MachineError::WordOutOfRange { .. }
      | MachineError::AddressOutOfRange { .. }
      | MachineError::StackOverflow { .. }
      | MachineError::EmptyProgram
      | MachineError::ProgramTooLong { .. }  => ErrorCategory::Range,

      MachineError::StackUnderflow { .. }    => ErrorCategory::StackUnderflow,
      MachineError::InvalidOpcode { .. }     => ErrorCategory::InvalidOpcode,
      MachineError::NotRunning(_)            => ErrorCategory::State
    }
  }
}

#[derive(Error, Clone, Eq, PartialEq, Debug)]
pub enum ConfigError {
  #[error("word size must be between 6 and 16 bits, got {bits}")]
  WordBits { bits: u32 }
}

impl ConfigError {
  pub fn category(&self) -> ErrorCategory {
    ErrorCategory::Config
  }
}
