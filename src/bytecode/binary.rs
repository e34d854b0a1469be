/*!
  This module is responsible for the encoding of parse nodes into the binary image and the
  decoding of a binary image back into assembly text.

  Each parse node becomes exactly one word: data nodes encode as their value and operations as
  their opcode. The image is copied into memory starting at address zero.
*/

use crate::bytecode::{NodeKind, Operation, ParseNode};
use crate::error::AssemblyError;
use crate::word::{MachineConfig, Word};

/// Emits one word per node. Fails on the first data node whose value is not a word.
pub fn generate(nodes: &[ParseNode], config: &MachineConfig) -> Result<Vec<Word>, AssemblyError> {
  nodes.iter()
       .enumerate()
       .map(|(index, node)| encode_node(index, node, config))
       .collect()
}

fn encode_node(index: usize, node: &ParseNode, config: &MachineConfig)
  -> Result<Word, AssemblyError>
{
  match node.kind {

    NodeKind::Data(value) if config.contains(value) => Ok(value as Word),

    NodeKind::Data(value) => {
      Err(AssemblyError::DataOutOfRange {
        index,
        value,
        min: config.min_word() as i64,
        max: config.max_word() as i64
      })
    }

    NodeKind::Operation(operation) => Ok(operation.word())

  }
}

/**
  Renders a binary image as assembly, one line per word. A word in an immediate position (the
  word after a `pu`) is always rendered as data, as is any word that is not an opcode.
  Assembling the result reproduces `words`.
*/
pub fn disassemble(words: &[Word]) -> Vec<String> {
  let mut lines = Vec::with_capacity(words.len());
  let mut immediate = false;

  for word in words {
    match Operation::from_word(*word) {

      Some(operation) if !immediate => {
        immediate = operation.has_immediate();
        lines.push(operation.mnemonic().to_string());
      }

      _ => {
        immediate = false;
        lines.push(word.to_string());
      }

    }
  }
  lines
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::parse;

  #[test]
  fn one_word_per_node(){
    let config = MachineConfig::default();
    let nodes = parse("pu\n42\npu\n0\nju", &config).unwrap();
    assert_eq!(generate(&nodes, &config), Ok(vec![2, 42, 2, 0, 17]));
  }

  #[test]
  fn data_range(){
    let config = MachineConfig::default();
    let nodes = parse("pu\n127\npu\n-128", &config).unwrap();
    assert_eq!(generate(&nodes, &config), Ok(vec![2, 127, 2, -128]));

    let nodes = parse("pu\n128", &config).unwrap();
    assert_eq!(
      generate(&nodes, &config),
      Err(AssemblyError::DataOutOfRange { index: 1, value: 128, min: -128, max: 127 })
    );

    let nodes = parse("no\npu\n-129", &config).unwrap();
    assert!(matches!(
      generate(&nodes, &config),
      Err(AssemblyError::DataOutOfRange { index: 2, value: -129, .. })
    ));
  }

  #[test]
  fn disassembly(){
    // The second 2 is the operand of a push, so it is data, not `pu`.
    let lines = disassemble(&[2, 2, 6, 2, 2, 100, 0]);
    assert_eq!(lines, vec!["pu", "2", "ad", "pu", "2", "100", "ha"]);
  }

  #[test]
  fn disassembly_reassembles(){
    let config = MachineConfig::default();
    let text = "pu\n3\npu\n-4\nmu\npu\n18\nst\nha\n99";
    let words = generate(&parse(text, &config).unwrap(), &config).unwrap();
    let round_trip = disassemble(&words).join("\n");
    assert_eq!(generate(&parse(&round_trip, &config).unwrap(), &config), Ok(words));
  }

}
