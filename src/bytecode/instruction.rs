use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use strum_macros::{EnumIter, EnumString, IntoStaticStr};
use num_enum::{TryFromPrimitive, IntoPrimitive};

use crate::word::Word;

/**
  Opcodes of the virtual machine.

  As in C, enum values are represented by consecutive natural numbers starting at zero, and the
  opcode of an operation is exactly its position in this list. Consequently, the order the
  operations are listed below is significant: reordering them changes the binary image of
  every assembled program.

  The `strum` serialization of each variant is its two-letter mnemonic, so `FromStr` and
  `Into<&'static str>` translate between assembly text and operations. `Display` prints the
  long name instead.
*/
#[derive(
EnumString,   IntoStaticStr, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq,       PartialEq,        Debug,          Hash
)]
#[repr(u8)]
pub enum Operation {
  #[strum(serialize = "ha")] Halt,              // 0
  #[strum(serialize = "no")] NoOperation,
  #[strum(serialize = "pu")] Push,              // pu, <immediate>
  #[strum(serialize = "po")] Pop,
  #[strum(serialize = "st")] Store,             // memory[top] = second
  #[strum(serialize = "lo")] Load,              // push memory[top]
  #[strum(serialize = "ad")] Add,
  #[strum(serialize = "su")] Subtract,          // top - second
  #[strum(serialize = "mu")] Multiply,
  #[strum(serialize = "di")] Divide,            // top / second, pushes remainder then quotient
  #[strum(serialize = "le")] Less,              // top < second
  #[strum(serialize = "gr")] Greater,           // top > second
  #[strum(serialize = "sa")] Same,
  #[strum(serialize = "df")] Different,
  #[strum(serialize = "an")] And,
  #[strum(serialize = "or")] Or,
  #[strum(serialize = "nt")] Not,
  #[strum(serialize = "ju")] Jump,              // ip = top
  #[strum(serialize = "jc")] JumpConditionally, // ip = second if top == 1
}

pub const OPERATION_COUNT: usize = 19;

impl Operation {

  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  /// The opcode as a machine word.
  pub fn word(&self) -> Word {
    self.code() as Word
  }

  /// Decodes a fetched word. Anything outside of `0..OPERATION_COUNT` is not an operation.
  pub fn from_word(word: Word) -> Option<Operation> {
    let byte = u8::try_from(word).ok()?;
    Operation::try_from(byte).ok()
  }

  /// Two-letter assembly mnemonic.
  pub fn mnemonic(&self) -> &'static str {
    Into::<&'static str>::into(*self)
  }

  pub fn name(&self) -> &'static str {
    match self {
      Operation::Halt              => "halt",
      Operation::NoOperation       => "noOperation",
      Operation::Push              => "push",
      Operation::Pop               => "pop",
      Operation::Store             => "store",
      Operation::Load              => "load",
      Operation::Add               => "add",
      Operation::Subtract          => "subtract",
      Operation::Multiply          => "multiply",
      Operation::Divide            => "divide",
      Operation::Less              => "less",
      Operation::Greater           => "greater",
      Operation::Same              => "same",
      Operation::Different         => "different",
      Operation::And               => "and",
      Operation::Or                => "or",
      Operation::Not               => "not",
      Operation::Jump              => "jump",
      Operation::JumpConditionally => "jumpConditionally",
    }
  }

  /// The number of stack entries the operation consumes.
  pub fn arity(&self) -> usize {
    match self {
      | Operation::Halt
      | Operation::NoOperation
      | Operation::Push              => 0,

      | Operation::Pop
      | Operation::Load
      | Operation::Not
      | Operation::Jump              => 1,

      | Operation::Store
      | Operation::Add
      | Operation::Subtract
      | Operation::Multiply
      | Operation::Divide
      | Operation::Less
      | Operation::Greater
      | Operation::Same
      | Operation::Different
      | Operation::And
      | Operation::Or
      | Operation::JumpConditionally => 2,
    }
  }

  /// Whether the word following the opcode in memory is an immediate operand.
  pub fn has_immediate(&self) -> bool {
    *self == Operation::Push
  }

}

impl Display for Operation {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.name())
  }
}
