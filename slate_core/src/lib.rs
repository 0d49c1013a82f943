//! # Slate Core
//!
//! Core types shared across the Slate interpreter pipeline:
//!
//! - **Value System**: the runtime value representation (`None`, booleans,
//!   integers, floats, strings)
//! - **Error Handling**: the error taxonomy for every pipeline phase
//!   (lexing, compilation, execution) and the unified result type

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod value;

pub use error::{
    LexError, LexErrorKind, ParseError, ParseErrorKind, RuntimeError, SlateError, SlateResult,
};
pub use value::Value;

/// Slate interpreter version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
