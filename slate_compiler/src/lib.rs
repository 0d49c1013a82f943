//! # Slate Compiler
//!
//! Single-pass compilation from tokens to stack-machine bytecode. There is
//! no intermediate syntax tree: the recursive-descent parser in
//! [`compiler`] emits instructions directly while it recognizes the
//! grammar, patching forward jump operands in place.
//!
//! The output is a [`CodeObject`]: a flat instruction stream plus the name
//! and constant tables it indexes into. [`disassemble`] renders one in a
//! human-readable listing for the `--dis` flag and for debugging.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bytecode;
pub mod compiler;

pub use bytecode::{disassemble, CodeObject, CompareOp, Opcode};
pub use compiler::{compile, CompileResult, Compiler};

use slate_core::SlateResult;

/// Tokenize and compile `source` in one call. The first lex or parse
/// failure aborts and comes back wrapped in [`slate_core::SlateError`].
pub fn compile_source(source: &str) -> SlateResult<CodeObject> {
    let tokens = slate_lexer::tokenize(source)?;
    Ok(compiler::compile(&tokens)?)
}
