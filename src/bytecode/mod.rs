/*!
  The assembler. Program text is turned into a binary image in two stages:
    ```text
    text -> [`parse`] -> `ParseNode`s -> [`generate`] -> `Vec<Word>`
    ```
  There is exactly one word per non-blank source line, so line `n` of a program (counting only
  non-blank lines from zero) lands at memory address `n`. Immediates are ordinary data lines
  following the `pu` that consumes them.

  Opcodes are not packed with their operands as they would be in a real instruction set. An
  enum is used for the opcode alone, and its discriminant is the opcode.
*/

mod assembly;
mod binary;
mod instruction;

pub use assembly::{parse, NodeKind, ParseNode};
pub use binary::{disassemble, generate};
pub use instruction::{Operation, OPERATION_COUNT};

use crate::error::AssemblyError;
use crate::word::{MachineConfig, Word};

/// Parses and generates in one go. An empty (or all blank) program is an error.
pub fn assemble(text: &str, config: &MachineConfig) -> Result<Vec<Word>, AssemblyError> {
  let nodes = parse(text, config)?;
  if nodes.is_empty() {
    return Err(AssemblyError::Empty);
  }
  generate(&nodes, config)
}


#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  #[test]
  fn empty_program(){
    assert_eq!(assemble("\n  \n", &MachineConfig::default()), Err(AssemblyError::Empty));
  }

  #[test]
  fn wider_words(){
    let config = MachineConfig::new(12).unwrap();
    assert_eq!(assemble("pu\n2047\nha", &config), Ok(vec![2, 2047, 0]));
    assert!(assemble("pu\n2048", &config).is_err());
  }

  fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
      (-128i64..=127).prop_map(|v| v.to_string()),
      proptest::sample::select(vec!["ha", "no", "pu", "po", "ad", "di", "jc", "nt"])
        .prop_map(str::to_string),
    ]
  }

  proptest! {
    #[test]
    fn assembly_is_deterministic(lines in proptest::collection::vec(line_strategy(), 1..64)) {
      let config = MachineConfig::default();
      let text = lines.join("\n");
      let first = assemble(&text, &config);
      let second = assemble(&text, &config);
      prop_assert!(first.is_ok());
      prop_assert_eq!(first.clone().unwrap().len(), lines.len());
      prop_assert_eq!(first, second);
    }
  }

}
