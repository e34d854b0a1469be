/*!
  One handler per operation. Handlers read the machine but never mutate it; each returns the
  `Proposal` it would like committed. Operands are named after their stack position: `top` is
  `stack[counter - 1]` and `second` is `stack[counter - 2]`.

  Note that binary operations use `(top, second)` order, so `pu a, pu b, su` computes `b - a`.
*/

use crate::bytecode::Operation;
use crate::effect::{Flow, Proposal};
use crate::error::MachineError;
use crate::machine::Machine;

/// Dispatches to the handler for `operation`.
pub fn propose(operation: Operation, machine: &Machine) -> Result<Proposal, MachineError> {
  require(machine, operation.arity())?;

  let proposal = match operation {
    Operation::Halt              => Proposal::new(0, Flow::Halt),
    Operation::NoOperation       => Proposal::new(0, Flow::Advance(1)),
    Operation::Push              => push(machine)?,
    Operation::Pop               => Proposal::new(1, Flow::Advance(1)),
    Operation::Store             => store(machine),
    Operation::Load              => load(machine)?,
    Operation::Add               => binary(machine, |top, second| top + second),
    Operation::Subtract          => binary(machine, |top, second| top - second),
    Operation::Multiply          => binary(machine, |top, second| top * second),
    Operation::Divide            => divide(machine),
    Operation::Less              => binary(machine, |top, second| truth(top < second)),
    Operation::Greater           => binary(machine, |top, second| truth(top > second)),
    Operation::Same              => binary(machine, |top, second| truth(top == second)),
    Operation::Different         => binary(machine, |top, second| truth(top != second)),
    Operation::And               => binary(machine, |top, second| truth(top == 1 && second == 1)),
    Operation::Or                => binary(machine, |top, second| truth(top == 1 || second == 1)),
    Operation::Not               => Proposal::replace(1, truth(top(machine) == 0)),
    Operation::Jump              => Proposal::new(1, Flow::JumpTo(top(machine))),
    Operation::JumpConditionally => jump_conditionally(machine),
  };

  Ok(proposal)
}

fn require(machine: &Machine, count: usize) -> Result<(), MachineError> {
  match machine.stack_counter() >= count {
    true  => Ok(()),
    false => Err(MachineError::StackUnderflow {
      required: count,
      available: machine.stack_counter()
    })
  }
}

fn truth(condition: bool) -> i64 {
  match condition {
    true  => 1,
    false => 0
  }
}

// The following accessors assume `require` has been called.
fn top(machine: &Machine) -> i64 {
  machine.stack()[machine.stack_counter() - 1] as i64
}

fn second(machine: &Machine) -> i64 {
  machine.stack()[machine.stack_counter() - 2] as i64
}

/// Pops two, pushes `f(top, second)`.
fn binary<F>(machine: &Machine, f: F) -> Proposal
  where F: Fn(i64, i64) -> i64
{
  Proposal::replace(2, f(top(machine), second(machine)))
}

/// The immediate is the word after the opcode, which must itself be in memory.
fn push(machine: &Machine) -> Result<Proposal, MachineError> {
  let address = machine.config().check_address(machine.ip() as i64 + 1)?;
  let immediate = machine.memory()[address] as i64;
  Ok(Proposal::new(0, Flow::Advance(2)).push(immediate))
}

/// `memory[top] = second`
fn store(machine: &Machine) -> Proposal {
  Proposal::new(2, Flow::Advance(1)).write(top(machine), second(machine))
}

fn load(machine: &Machine) -> Result<Proposal, MachineError> {
  let address = machine.config().check_address(top(machine))?;
  Ok(Proposal::replace(1, machine.memory()[address] as i64))
}

/**
  Floored division of `top` by `second`, pushing the remainder and then the quotient. The
  remainder takes the sign of the divisor, so `quotient * divisor + remainder == dividend`.
  Division by zero is not an error: both results are the dividend.
*/
fn divide(machine: &Machine) -> Proposal {
  let dividend = top(machine);
  let divisor  = second(machine);
  let (quotient, remainder) = floored_division(dividend, divisor);

  Proposal::new(2, Flow::Advance(1))
    .push(remainder)
    .push(quotient)
}

fn floored_division(dividend: i64, divisor: i64) -> (i64, i64) {
  if divisor == 0 {
    return (dividend, dividend);
  }
  let mut quotient = dividend / divisor;
  if dividend % divisor != 0 && ((dividend < 0) != (divisor < 0)) {
    quotient -= 1;
  }
  (quotient, dividend - quotient * divisor)
}

/// Jumps to `second` if `top` is exactly one, otherwise falls through. Both are popped.
fn jump_conditionally(machine: &Machine) -> Proposal {
  let flow = match top(machine) {
    1 => Flow::JumpTo(second(machine)),
    _ => Flow::Advance(1)
  };
  Proposal::new(2, flow)
}
