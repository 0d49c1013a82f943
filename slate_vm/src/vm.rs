//! The bytecode execution engine.
//!
//! A fetch-decode-execute loop over the flat instruction stream: read the
//! word at `ip`, advance, decode it into an [`Opcode`], and dispatch with
//! an exhaustive match. Control flow is nothing but `ip` manipulation;
//! there is no call stack. The two jump flavors differ on purpose:
//! `JUMP_FORWARD` adds a relative displacement after its operand is
//! consumed, while `POP_JUMP_IF_FALSE` and `JUMP_ABSOLUTE` load an
//! absolute offset.
//!
//! The machine halts when `ip` passes the end of the stream. A jump may
//! land exactly on the end, which is how a loop compiled as the last
//! statement exits.

use std::io::Write;

use slate_compiler::{CodeObject, CompareOp, Opcode};
use slate_core::{RuntimeError, Value};

use crate::{ops, VmResult};

/// The Slate virtual machine.
///
/// Owns the values table: one slot per compiled name, unbound until a
/// store hits it. The table persists across [`VirtualMachine::execute`]
/// calls and grows to fit each code object, which is what lets a REPL
/// session keep bindings alive between inputs. The operand stack and
/// instruction pointer are per-call locals.
#[derive(Debug, Default)]
pub struct VirtualMachine {
    values: Vec<Option<Value>>,
}

impl VirtualMachine {
    /// Create a machine with an empty values table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute `code`, writing program output to `out`.
    ///
    /// Returns whatever is left on top of the operand stack. Programs
    /// from the compiler always leave it empty; the channel carries the
    /// result of hand-assembled expression code and the REPL echo.
    /// The first runtime failure halts execution immediately; output
    /// already written stands.
    pub fn execute(&mut self, code: &CodeObject, out: &mut dyn Write) -> VmResult<Option<Value>> {
        if self.values.len() < code.names.len() {
            self.values.resize(code.names.len(), None);
        }
        let mut stack: Vec<Value> = Vec::new();
        let mut ip = 0;
        let mut softspace = false;

        while ip < code.code.len() {
            let word = code.code[ip];
            ip += 1;
            let Some(op) = Opcode::from_i64(word) else {
                return Err(RuntimeError::InvalidOpcode(word));
            };
            match op {
                Opcode::UnaryNegative => {
                    let value = pop(&mut stack)?;
                    stack.push(ops::negate(value)?);
                }
                Opcode::BinaryMultiply => binary(&mut stack, ops::multiply)?,
                Opcode::BinaryDivide => binary(&mut stack, ops::divide)?,
                Opcode::BinaryAdd => binary(&mut stack, ops::add)?,
                Opcode::BinarySubtract => binary(&mut stack, ops::subtract)?,
                Opcode::PrintItem => {
                    let value = pop(&mut stack)?;
                    if softspace {
                        write!(out, " ")?;
                    }
                    write!(out, "{value}")?;
                    softspace = true;
                }
                Opcode::PrintNewline => {
                    writeln!(out)?;
                    softspace = false;
                }
                Opcode::StoreName => {
                    let operand = fetch(&code.code, ip)?;
                    ip += 1;
                    let index = table_index(operand, code.names.len(), "name")?;
                    let value = pop(&mut stack)?;
                    self.values[index] = Some(value);
                }
                Opcode::LoadConst => {
                    let operand = fetch(&code.code, ip)?;
                    ip += 1;
                    let index = table_index(operand, code.consts.len(), "constant")?;
                    stack.push(code.consts[index].clone());
                }
                Opcode::LoadName => {
                    let operand = fetch(&code.code, ip)?;
                    ip += 1;
                    let index = table_index(operand, code.names.len(), "name")?;
                    match &self.values[index] {
                        Some(value) => stack.push(value.clone()),
                        None => {
                            return Err(RuntimeError::unbound_name(code.names[index].as_str()));
                        }
                    }
                }
                Opcode::CompareOp => {
                    let operand = fetch(&code.code, ip)?;
                    ip += 1;
                    let Some(cmp) = CompareOp::from_i64(operand) else {
                        return Err(RuntimeError::invalid_operand(format!(
                            "invalid compare code {operand}"
                        )));
                    };
                    let right = pop(&mut stack)?;
                    let left = pop(&mut stack)?;
                    stack.push(ops::compare(cmp, &left, &right)?);
                }
                Opcode::JumpForward => {
                    let operand = fetch(&code.code, ip)?;
                    ip += 1;
                    ip = jump_target(ip as i64 + operand, code.code.len())?;
                }
                Opcode::PopJumpIfFalse => {
                    let operand = fetch(&code.code, ip)?;
                    let condition = pop(&mut stack)?;
                    if condition.is_truthy() {
                        ip += 1;
                    } else {
                        ip = jump_target(operand, code.code.len())?;
                    }
                }
                Opcode::JumpAbsolute => {
                    let operand = fetch(&code.code, ip)?;
                    ip = jump_target(operand, code.code.len())?;
                }
            }
        }
        Ok(stack.pop())
    }
}

fn pop(stack: &mut Vec<Value>) -> VmResult<Value> {
    stack.pop().ok_or(RuntimeError::StackUnderflow)
}

/// Pop right then left, push `op(left, right)`.
fn binary(stack: &mut Vec<Value>, op: fn(Value, Value) -> VmResult<Value>) -> VmResult<()> {
    let right = pop(stack)?;
    let left = pop(stack)?;
    stack.push(op(left, right)?);
    Ok(())
}

/// Read the inline operand word at `ip`.
fn fetch(code: &[i64], ip: usize) -> VmResult<i64> {
    code.get(ip).copied().ok_or_else(|| {
        RuntimeError::invalid_operand(format!("truncated instruction at offset {}", ip - 1))
    })
}

fn table_index(operand: i64, len: usize, table: &str) -> VmResult<usize> {
    match usize::try_from(operand) {
        Ok(index) if index < len => Ok(index),
        _ => Err(RuntimeError::invalid_operand(format!(
            "{table} index {operand} out of range for table of length {len}"
        ))),
    }
}

/// A jump may land on any instruction or exactly on the end of the
/// stream; past the end or negative is malformed bytecode.
fn jump_target(target: i64, len: usize) -> VmResult<usize> {
    match usize::try_from(target) {
        Ok(target) if target <= len => Ok(target),
        _ => Err(RuntimeError::invalid_operand(format!(
            "jump target {target} out of range"
        ))),
    }
}
