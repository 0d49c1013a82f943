//! # Slate VM
//!
//! Stack-based execution of compiled Slate bytecode:
//!
//! - **Engine** ([`vm`]): the fetch-decode-execute loop, the operand
//!   stack, and the values table that persists across runs
//! - **Operations** ([`ops`]): Python-semantics arithmetic, comparison,
//!   and negation over runtime values
//!
//! The machine consumes only the three arrays a
//! [`CodeObject`](slate_compiler::CodeObject) carries (code, names,
//! consts) and never sees compiler internals.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod ops;
pub mod vm;

pub use vm::VirtualMachine;

use slate_compiler::CodeObject;
use slate_core::Value;

/// Result type for VM execution.
pub type VmResult<T> = Result<T, slate_core::RuntimeError>;

/// Execute a compiled program on a fresh machine, writing to stdout.
pub fn run(code: &CodeObject) -> VmResult<Option<Value>> {
    let mut out = std::io::stdout().lock();
    VirtualMachine::new().execute(code, &mut out)
}
