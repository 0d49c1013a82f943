//! Tokenizer for the Slate language.
//!
//! Turns source text into a flat token stream with significant
//! indentation resolved into synthetic INDENT/DEDENT tokens:
//!
//! - **Tokens**: keywords, identifiers, int/float/string literals,
//!   operators and delimiters, NEWLINE, INDENT, DEDENT, EOF
//! - **Positions**: every token carries its 1-based line and column
//! - **Blank-line handling**: blank and comment-only lines produce no
//!   tokens at all
//! - **Errors**: invalid characters, malformed numbers, unterminated
//!   strings and inconsistent indentation abort the scan with a typed
//!   [`LexError`](slate_core::LexError)

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod cursor;
pub mod lexer;
pub mod token;

pub use lexer::{tokenize, Lexer};
pub use token::{Token, TokenKind};

/// Result alias for lexer operations.
pub type LexResult<T> = Result<T, slate_core::LexError>;
