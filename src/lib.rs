/*!
  An educational stack machine and its assembler.

  Programs are written one token per line using two-letter mnemonics, assembled into a flat
  array of words, and loaded at address zero of the machine's memory. The machine is then driven
  one step at a time; every step reports exactly what it changed.
    ```
    let config = stack_vm::MachineConfig::default();
    let program = stack_vm::assemble("pu\n2\npu\n3\nad\nha", &config).unwrap();

    let mut machine = stack_vm::Machine::new(config);
    machine.load(&program).unwrap();
    while !machine.execute().unwrap().effect.halt {}
    assert_eq!(machine.stack(), &[5]);
    ```
*/

#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod bytecode;
pub mod driver;
pub mod effect;
pub mod error;
pub mod logging;
pub mod machine;
mod operations;
pub mod word;

pub use bytecode::{assemble, disassemble, generate, parse, NodeKind, Operation, ParseNode};
pub use driver::{run, run_with, RunOutcome};
pub use effect::{Effect, MemoryWrite};
pub use error::{AssemblyError, ConfigError, ErrorCategory, MachineError};
pub use machine::{Machine, MachineState, Step};
pub use word::{MachineConfig, Word};
