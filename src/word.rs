//! The machine's only value type, together with the configuration that fixes its width. Memory
//! and stack sizes are derived from the word size, so a `MachineConfig` is all that is needed to
//! size a machine or to range-check assembler output.

use std::fmt::{Display, Formatter};

use crate::error::{ConfigError, MachineError};

/// Storage type for a machine word. The value actually held is constrained by `MachineConfig`.
pub type Word = i32;

pub const DEFAULT_WORD_BITS: u32 = 8;
/// Below six bits the largest opcode is no longer a valid word.
pub const MIN_WORD_BITS: u32 = 6;
pub const MAX_WORD_BITS: u32 = 16;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct MachineConfig {
  word_bits: u32
}

impl MachineConfig {

  pub fn new(word_bits: u32) -> Result<MachineConfig, ConfigError> {
    match word_bits {
      MIN_WORD_BITS..=MAX_WORD_BITS => Ok(MachineConfig{ word_bits }),
      bits                          => Err(ConfigError::WordBits { bits })
    }
  }

  pub fn word_bits(&self) -> u32 {
    self.word_bits
  }

  /// `-2^(W-1)`
  pub fn min_word(&self) -> Word {
    -(1 << (self.word_bits - 1))
  }

  /// `2^(W-1) - 1`
  pub fn max_word(&self) -> Word {
    (1 << (self.word_bits - 1)) - 1
  }

  /// Number of memory cells, `2^W`.
  pub fn memory_size(&self) -> usize {
    1 << self.word_bits
  }

  /// Number of stack slots, `2^W`.
  pub fn stack_size(&self) -> usize {
    1 << self.word_bits
  }

  /// The word range check. Takes an `i64` so that intermediate arithmetic results can be
  /// checked before they are narrowed.
  pub fn contains(&self, value: i64) -> bool {
    value >= self.min_word() as i64 && value <= self.max_word() as i64
  }

  pub fn check_word(&self, value: i64) -> Result<Word, MachineError> {
    match self.contains(value) {
      true  => Ok(value as Word),
      false => Err(MachineError::WordOutOfRange { value })
    }
  }

  /// Accepts `value` as a memory index, i.e. `0 <= value < memory_size`.
  pub fn check_address(&self, value: i64) -> Result<usize, MachineError> {
    match value >= 0 && value < self.memory_size() as i64 {
      true  => Ok(value as usize),
      false => Err(MachineError::AddressOutOfRange { address: value })
    }
  }

}

impl Default for MachineConfig {
  fn default() -> MachineConfig {
    MachineConfig{ word_bits: DEFAULT_WORD_BITS }
  }
}

impl Display for MachineConfig {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}-bit words [{}, {}], {} memory cells, {} stack slots",
      self.word_bits, self.min_word(), self.max_word(), self.memory_size(), self.stack_size()
    )
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  #[test]
  fn default_is_eight_bits(){
    let config = MachineConfig::default();
    assert_eq!(config.word_bits(), 8);
    assert_eq!(config.min_word(), -128);
    assert_eq!(config.max_word(), 127);
    assert_eq!(config.memory_size(), 256);
    assert_eq!(config.stack_size(), 256);
  }

  #[test]
  fn range_edges(){
    let config = MachineConfig::default();
    assert!(config.contains(127));
    assert!(config.contains(-128));
    assert!(!config.contains(128));
    assert!(!config.contains(-129));
    assert_eq!(config.check_word(128), Err(MachineError::WordOutOfRange { value: 128 }));
  }

  #[test]
  fn addresses(){
    let config = MachineConfig::default();
    assert_eq!(config.check_address(0), Ok(0));
    assert_eq!(config.check_address(255), Ok(255));
    assert_eq!(config.check_address(256), Err(MachineError::AddressOutOfRange { address: 256 }));
    assert_eq!(config.check_address(-1), Err(MachineError::AddressOutOfRange { address: -1 }));
  }

  #[test]
  fn word_bits_bounds(){
    assert_eq!(MachineConfig::new(5), Err(ConfigError::WordBits { bits: 5 }));
    assert_eq!(MachineConfig::new(17), Err(ConfigError::WordBits { bits: 17 }));
    let config = MachineConfig::new(16).unwrap();
    assert_eq!(config.max_word(), 32767);
    assert_eq!(config.memory_size(), 65536);
  }

  proptest! {
    #[test]
    fn range_check_matches_bounds(value in -1000i64..1000) {
      let config = MachineConfig::default();
      prop_assert_eq!(config.contains(value), -128 <= value && value <= 127);
      prop_assert_eq!(config.check_word(value).is_ok(), config.contains(value));
    }
  }

}
