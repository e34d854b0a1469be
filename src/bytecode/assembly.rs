/*!
  The human readable textual form of bytecode is called assembly. This module parses assembly
  into a list of `ParseNode`s, one per non-blank line, leveraging the `strum` derives of
  `Operation` to recognize mnemonics.

  The grammar of a line, after trimming surrounding whitespace, is
    ```text
    <line>    ::= <token> <space>* <comment>?
    <token>   ::= [A-Za-z0-9_-]+
    <comment> ::= '#' .*
    ```
  A token that is an integer literal is data. Otherwise it must be a two-letter mnemonic.
*/

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use nom::{
  bytes::complete::take_while1,
  character::complete::{
    char as one_char,
    digit1,
    space0
  },
  combinator::{all_consuming, opt, recognize, rest},
  sequence::{pair, preceded, tuple},
  IResult
};

use crate::bytecode::Operation;
use crate::error::AssemblyError;
use crate::word::MachineConfig;

#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum NodeKind {
  /// A literal word. The value has not yet been range checked.
  Data(i64),
  Operation(Operation)
}

/// One non-blank line of assembly.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct ParseNode {
  /// The trimmed source line, comment included.
  pub text    : String,
  pub kind    : NodeKind,
  pub comment : Option<String>
}

impl ParseNode {
  pub fn value(&self) -> Option<i64> {
    match self.kind {
      NodeKind::Data(value) => Some(value),
      NodeKind::Operation(_) => None
    }
  }
}

impl Display for ParseNode {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self.kind {
      NodeKind::Data(value)          => write!(f, "{}", value)?,
      NodeKind::Operation(operation) => write!(f, "{}", operation.mnemonic())?,
    }
    if let Some(comment) = &self.comment {
      write!(f, " # {}", comment)?;
    }
    Ok(())
  }
}

fn token(input: &str) -> IResult<&str, &str> {
  take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
  preceded(one_char('#'), rest)(input)
}

/// Splits a trimmed line into its token and optional comment.
fn line(input: &str) -> IResult<&str, (&str, Option<&str>)> {
  all_consuming(
    tuple((
      token,
      preceded(space0, opt(comment))
    ))
  )(input)
}

fn integer(input: &str) -> IResult<&str, &str> {
  all_consuming(recognize(pair(opt(one_char('-')), digit1)))(input)
}

/// Parses a single trimmed, non-blank line. `line_number` is only used for error reporting.
fn parse_line(text: &str, line_number: usize) -> Result<ParseNode, AssemblyError> {
  let (token, comment) = match line(text) {
    Ok((_, parts)) => parts,
    Err(_)         => {
      return Err(AssemblyError::Syntax { line: line_number, text: text.to_string() });
    }
  };

  let kind =
    if integer(token).is_ok() {
      match token.parse::<i64>() {
        Ok(value) => NodeKind::Data(value),
        Err(_)    => {
          return Err(AssemblyError::LiteralTooLarge { line: line_number, token: token.to_string() });
        }
      }
    } else {
      match Operation::from_str(token) {
        Ok(operation) => NodeKind::Operation(operation),
        Err(_)        => {
          return Err(AssemblyError::InvalidCode { line: line_number, token: token.to_string() });
        }
      }
    };

  Ok(ParseNode {
    text: text.to_string(),
    kind,
    comment: comment.map(|c| c.trim().to_string())
  })
}

/**
  Parses program text into one `ParseNode` per non-blank line, in source order. Source order is
  memory order, so a `pu` must be immediately followed by its operand line.

  Fails if there are more non-blank lines than memory cells, or on the first line that is
  malformed or names an unknown mnemonic.
*/
pub fn parse(text: &str, config: &MachineConfig) -> Result<Vec<ParseNode>, AssemblyError> {
  // (source line number, trimmed text)
  let lines: Vec<(usize, &str)> =
    text.lines()
        .map(str::trim)
        .enumerate()
        .filter(|(_, l)| !l.is_empty())
        .map(|(i, l)| (i + 1, l))
        .collect();

  if lines.len() > config.memory_size() {
    return Err(AssemblyError::TooManyLines { lines: lines.len(), max: config.memory_size() });
  }

  lines.iter()
       .map(|(line_number, l)| parse_line(l, *line_number))
       .collect()
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorCategory;

  fn parse_default(text: &str) -> Result<Vec<ParseNode>, AssemblyError> {
    parse(text, &MachineConfig::default())
  }

  #[test]
  fn operations_and_data(){
    let nodes = parse_default("pu\n42\nha").unwrap();
    let kinds: Vec<NodeKind> = nodes.iter().map(|n| n.kind).collect();
    assert_eq!(
      kinds,
      vec![
        NodeKind::Operation(Operation::Push),
        NodeKind::Data(42),
        NodeKind::Operation(Operation::Halt)
      ]
    );
  }

  #[test]
  fn blank_lines_and_whitespace(){
    let nodes = parse_default("\n   pu   \n\n\t-7\n\n  ").unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].text, "pu");
    assert_eq!(nodes[1].value(), Some(-7));
  }

  #[test]
  fn comments(){
    let nodes = parse_default("pu # push the answer\n42#answer\nha #").unwrap();
    assert_eq!(nodes[0].comment.as_deref(), Some("push the answer"));
    assert_eq!(nodes[0].text, "pu # push the answer");
    assert_eq!(nodes[1].comment.as_deref(), Some("answer"));
    assert_eq!(nodes[2].comment.as_deref(), Some(""));
    assert_eq!(format!("{}", nodes[0]), "pu # push the answer");
  }

  #[test]
  fn data_is_not_range_checked(){
    let nodes = parse_default("1000\n-5000").unwrap();
    assert_eq!(nodes[0].value(), Some(1000));
    assert_eq!(nodes[1].value(), Some(-5000));
  }

  #[test]
  fn unknown_mnemonic(){
    assert_eq!(
      parse_default("pu\n1\nxx"),
      Err(AssemblyError::InvalidCode { line: 3, token: "xx".to_string() })
    );
    // Mnemonics are case-sensitive.
    assert!(matches!(parse_default("HA"), Err(AssemblyError::InvalidCode { .. })));
    // Hyphens are token characters but `5-3` is not an integer.
    assert!(matches!(parse_default("5-3"), Err(AssemblyError::InvalidCode { .. })));
  }

  #[test]
  fn malformed_lines(){
    assert_eq!(
      parse_default("pu 42"),
      Err(AssemblyError::Syntax { line: 1, text: "pu 42".to_string() })
    );
    assert!(matches!(parse_default("# only a comment"), Err(AssemblyError::Syntax { .. })));
    assert!(matches!(parse_default("ha; stop"), Err(AssemblyError::Syntax { .. })));
  }

  #[test]
  fn literal_too_large(){
    let error = parse_default("99999999999999999999999").unwrap_err();
    assert!(matches!(error, AssemblyError::LiteralTooLarge { line: 1, .. }));
    assert_eq!(error.category(), ErrorCategory::Range);
  }

  #[test]
  fn line_numbers_count_blank_lines(){
    assert_eq!(
      parse_default("pu\n\n1\n\n   \nxx"),
      Err(AssemblyError::InvalidCode { line: 6, token: "xx".to_string() })
    );
    assert_eq!(
      parse_default("\n\nha\npu 42"),
      Err(AssemblyError::Syntax { line: 4, text: "pu 42".to_string() })
    );
  }

  #[test]
  fn too_many_lines(){
    let text = "no\n".repeat(257);
    assert_eq!(
      parse_default(&text),
      Err(AssemblyError::TooManyLines { lines: 257, max: 256 })
    );
    let text = "no\n".repeat(256);
    assert_eq!(parse_default(&text).unwrap().len(), 256);
  }

}
