/*!
  State changes of a single step. An operation handler never touches the machine. It returns a
  `Proposal` holding unchecked, widened values, which `Proposal::validate` turns into an
  `Effect` only if every value is in range. The machine then commits the `Effect` as a whole,
  so a failed step leaves no partial mutation behind.
*/

use std::fmt::{Display, Formatter};

use crate::error::MachineError;
use crate::word::{MachineConfig, Word};

/// What happens to the instruction pointer after the step.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum Flow {
  Halt,
  /// Relative move, e.g. `1` for most operations.
  Advance(i64),
  /// Absolute target address.
  JumpTo(i64)
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Proposal {
  pub pops   : usize,
  pub pushes : Vec<i64>,
  /// `(address, value)`
  pub write  : Option<(i64, i64)>,
  pub flow   : Flow
}

impl Proposal {

  pub fn new(pops: usize, flow: Flow) -> Proposal {
    Proposal{ pops, pushes: vec![], write: None, flow }
  }

  /// Pops `pops` entries and pushes `value`, advancing by one.
  pub fn replace(pops: usize, value: i64) -> Proposal {
    Proposal{ pops, pushes: vec![value], write: None, flow: Flow::Advance(1) }
  }

  pub fn push(mut self, value: i64) -> Proposal {
    self.pushes.push(value);
    self
  }

  pub fn write(mut self, address: i64, value: i64) -> Proposal {
    self.write = Some((address, value));
    self
  }

  /**
    Checks the proposal against the current stack counter and instruction pointer. Every
    pushed value and the written value must be words, the written address and the resulting
    instruction pointer must be memory addresses, and the stack must neither underflow nor
    overflow.
  */
  pub fn validate(self, config: &MachineConfig, counter: usize, ip: usize)
    -> Result<Effect, MachineError>
  {
    if self.pops > counter {
      return Err(MachineError::StackUnderflow { required: self.pops, available: counter });
    }

    let required = counter - self.pops + self.pushes.len();
    if required > config.stack_size() {
      return Err(MachineError::StackOverflow { required, capacity: config.stack_size() });
    }

    let pushed =
      self.pushes
          .iter()
          .map(|value| config.check_word(*value))
          .collect::<Result<Vec<Word>, MachineError>>()?;

    let write = match self.write {
      Some((address, value)) => {
        Some(MemoryWrite {
          address: config.check_address(address)?,
          value: config.check_word(value)?
        })
      }
      None => None
    };

    let (halt, ip_delta) = match self.flow {
      Flow::Halt             => (true, 0),
      Flow::Advance(delta)   => {
        config.check_address(ip as i64 + delta)?;
        (false, delta)
      }
      Flow::JumpTo(target)   => {
        config.check_address(target)?;
        (false, target - ip as i64)
      }
    };

    Ok(Effect{ halt, pop_count: self.pops, pushed, write, ip_delta })
  }

}

#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct MemoryWrite {
  pub address : usize,
  pub value   : Word
}

/// A validated state change, ready to be committed.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Effect {
  pub halt      : bool,
  pub pop_count : usize,
  /// In push order; the last value ends on top.
  pub pushed    : Vec<Word>,
  pub write     : Option<MemoryWrite>,
  pub ip_delta  : i64
}

impl Display for Effect {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    if self.halt {
      return write!(f, "halt");
    }
    write!(f, "pop {}", self.pop_count)?;
    if !self.pushed.is_empty() {
      write!(
        f,
        ", push [{}]",
        self.pushed
            .iter()
            .map(Word::to_string)
            .collect::<Vec<String>>()
            .join(", ")
      )?;
    }
    if let Some(MemoryWrite{ address, value }) = self.write {
      write!(f, ", M[{}] <- {}", address, value)?;
    }
    write!(f, ", ip {:+}", self.ip_delta)
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn underflow_before_anything_else(){
    let config = MachineConfig::default();
    let proposal = Proposal::replace(2, 1000);
    assert_eq!(
      proposal.validate(&config, 1, 0),
      Err(MachineError::StackUnderflow { required: 2, available: 1 })
    );
  }

  #[test]
  fn pushed_values_are_words(){
    let config = MachineConfig::default();
    assert_eq!(
      Proposal::replace(2, 200).validate(&config, 2, 0),
      Err(MachineError::WordOutOfRange { value: 200 })
    );
    let effect = Proposal::replace(2, -128).validate(&config, 2, 0).unwrap();
    assert_eq!(effect.pushed, vec![-128]);
    assert_eq!(effect.ip_delta, 1);
  }

  #[test]
  fn overflow(){
    let config = MachineConfig::default();
    let proposal = Proposal::new(0, Flow::Advance(2)).push(1);
    assert_eq!(
      proposal.clone().validate(&config, 256, 0),
      Err(MachineError::StackOverflow { required: 257, capacity: 256 })
    );
    assert!(proposal.validate(&config, 255, 0).is_ok());
  }

  #[test]
  fn writes(){
    let config = MachineConfig::default();
    let effect = Proposal::new(2, Flow::Advance(1)).write(10, -3).validate(&config, 2, 0).unwrap();
    assert_eq!(effect.write, Some(MemoryWrite{ address: 10, value: -3 }));
    assert_eq!(
      Proposal::new(2, Flow::Advance(1)).write(-1, 0).validate(&config, 2, 0),
      Err(MachineError::AddressOutOfRange { address: -1 })
    );
  }

  #[test]
  fn instruction_pointer(){
    let config = MachineConfig::default();
    let effect = Proposal::new(1, Flow::JumpTo(0)).validate(&config, 1, 4).unwrap();
    assert_eq!(effect.ip_delta, -4);
    assert_eq!(
      Proposal::new(0, Flow::Advance(1)).validate(&config, 0, 255),
      Err(MachineError::AddressOutOfRange { address: 256 })
    );
    let effect = Proposal::new(0, Flow::Halt).validate(&config, 0, 255).unwrap();
    assert!(effect.halt);
    assert_eq!(effect.ip_delta, 0);
  }

  #[test]
  fn display(){
    let effect = Effect{
      halt: false,
      pop_count: 2,
      pushed: vec![1, 3],
      write: Some(MemoryWrite{ address: 7, value: 9 }),
      ip_delta: -4
    };
    assert_eq!(format!("{}", effect), "pop 2, push [1, 3], M[7] <- 9, ip -4");
  }

}
