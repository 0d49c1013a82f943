//! Error types and result definitions for Slate.
//!
//! Each pipeline phase has its own error type with a closed kind set:
//!
//! - [`LexError`]: tokenization failures, with line/column
//! - [`ParseError`]: grammar and compile-time name failures, with line/column
//! - [`RuntimeError`]: execution failures
//!
//! All three are fatal to the current run and convert into the unified
//! [`SlateError`]. Display output uses Python's exception phrasing
//! (`SyntaxError: ...`, `NameError: ...`) since the guest language is a
//! Python subset.

use std::fmt;
use thiserror::Error;

/// The unified result type used by the top-level pipeline.
pub type SlateResult<T> = Result<T, SlateError>;

/// Any error the pipeline can produce, in phase order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlateError {
    /// Tokenization failed.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Compilation failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Execution failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl SlateError {
    /// The Python exception type name for this error.
    #[must_use]
    pub fn exception_type(&self) -> &'static str {
        match self {
            Self::Lex(e) => e.exception_type(),
            Self::Parse(e) => e.exception_type(),
            Self::Runtime(e) => e.exception_type(),
        }
    }

    /// Source position (line, column) if this error carries one.
    ///
    /// Runtime errors have no position; the bytecode keeps no line table.
    #[must_use]
    pub fn position(&self) -> Option<(u32, u32)> {
        match self {
            Self::Lex(e) => Some((e.line, e.column)),
            Self::Parse(e) => Some((e.line, e.column)),
            Self::Runtime(_) => None,
        }
    }
}

// =============================================================================
// Lex Errors
// =============================================================================

/// What went wrong while scanning.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A character outside every token class.
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),

    /// A raw newline or end of input inside a string literal.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// A dedent to a column matching no open indentation level.
    #[error("unindent does not match any outer indentation level")]
    BadIndentation,

    /// A malformed numeric literal (stray or repeated decimal point).
    #[error("invalid number format")]
    InvalidNumberFormat,
}

/// Tokenization failure at a known source position.
///
/// Line and column are 1-based and point at the start of the offending
/// token (or at the offending character itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexError {
    /// The failure kind.
    pub kind: LexErrorKind,
    /// 1-based source line.
    pub line: u32,
    /// 1-based source column.
    pub column: u32,
}

impl LexError {
    /// Create a lex error from a kind and position.
    #[must_use]
    pub const fn new(kind: LexErrorKind, line: u32, column: u32) -> Self {
        Self { kind, line, column }
    }

    /// A character that starts no token.
    #[must_use]
    pub const fn invalid_character(ch: char, line: u32, column: u32) -> Self {
        Self::new(LexErrorKind::InvalidCharacter(ch), line, column)
    }

    /// A string literal cut off by a newline or end of input.
    #[must_use]
    pub const fn unterminated_string(line: u32, column: u32) -> Self {
        Self::new(LexErrorKind::UnterminatedString, line, column)
    }

    /// A dedent that matches no open block.
    #[must_use]
    pub const fn bad_indentation(line: u32, column: u32) -> Self {
        Self::new(LexErrorKind::BadIndentation, line, column)
    }

    /// A numeric literal with a misplaced decimal point.
    #[must_use]
    pub const fn invalid_number(line: u32, column: u32) -> Self {
        Self::new(LexErrorKind::InvalidNumberFormat, line, column)
    }

    /// The Python exception type name.
    #[must_use]
    pub const fn exception_type(&self) -> &'static str {
        match self.kind {
            LexErrorKind::BadIndentation => "IndentationError",
            _ => "SyntaxError",
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.exception_type(), self.kind)
    }
}

impl std::error::Error for LexError {}

// =============================================================================
// Parse Errors
// =============================================================================

/// Compile-time failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The current token cannot appear at this grammar position.
    UnexpectedToken,
    /// The token stream ran out (no end-of-input token was present).
    UnexpectedEndOfInput,
    /// A read of a name never registered by an assignment.
    UndefinedName,
}

/// Compilation failure at a known source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The failure kind.
    pub kind: ParseErrorKind,
    /// Human-readable description.
    pub message: String,
    /// 1-based source line of the offending token.
    pub line: u32,
    /// 1-based source column of the offending token.
    pub column: u32,
}

impl ParseError {
    /// A token that cannot appear at the current grammar position.
    #[must_use]
    pub fn unexpected_token(expected: &str, found: &str, line: u32, column: u32) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedToken,
            message: format!("expected {expected}, found {found}"),
            line,
            column,
        }
    }

    /// A second relational operator at the same comparison level.
    #[must_use]
    pub fn chained_comparison(line: u32, column: u32) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedToken,
            message: "comparisons cannot be chained".to_string(),
            line,
            column,
        }
    }

    /// The token stream ended without an end-of-input token.
    #[must_use]
    pub fn unexpected_end_of_input(line: u32, column: u32) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedEndOfInput,
            message: "unexpected end of input".to_string(),
            line,
            column,
        }
    }

    /// A read of a name no assignment has registered.
    #[must_use]
    pub fn undefined_name(name: &str, line: u32, column: u32) -> Self {
        Self {
            kind: ParseErrorKind::UndefinedName,
            message: format!("name '{name}' is not defined"),
            line,
            column,
        }
    }

    /// The Python exception type name.
    #[must_use]
    pub const fn exception_type(&self) -> &'static str {
        match self.kind {
            ParseErrorKind::UndefinedName => "NameError",
            _ => "SyntaxError",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.exception_type(), self.message)
    }
}

impl std::error::Error for ParseError {}

// =============================================================================
// Runtime Errors
// =============================================================================

/// Execution failure. Every kind halts the virtual machine immediately.
///
/// `UnboundName` is the language-level failure: a name the compiler knows
/// but no executed path has stored into. The remaining kinds cover operand
/// type mismatches and malformed bytecode fed directly to the VM.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// A load of a name slot still holding no value.
    #[error("NameError: name '{name}' referenced before assignment")]
    UnboundName {
        /// The name whose slot is unbound.
        name: String,
    },

    /// Operand types an operation does not support.
    #[error("TypeError: {message}")]
    TypeError {
        /// CPython-phrased description.
        message: String,
    },

    /// Division with a zero divisor.
    #[error("ZeroDivisionError: division by zero")]
    ZeroDivision,

    /// A pop from an empty operand stack.
    #[error("SystemError: pop from empty operand stack")]
    StackUnderflow,

    /// An integer in opcode position that names no instruction.
    #[error("SystemError: invalid opcode {0}")]
    InvalidOpcode(i64),

    /// An inline operand that is out of range for its instruction.
    #[error("SystemError: {0}")]
    InvalidOperand(String),

    /// The output sink failed.
    #[error("OSError: {0}")]
    Io(String),
}

impl RuntimeError {
    /// A name slot read before any store.
    #[must_use]
    pub fn unbound_name(name: impl Into<String>) -> Self {
        Self::UnboundName { name: name.into() }
    }

    /// An operation applied to types it does not support.
    #[must_use]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError {
            message: message.into(),
        }
    }

    /// An inline operand outside its valid range.
    #[must_use]
    pub fn invalid_operand(message: impl Into<String>) -> Self {
        Self::InvalidOperand(message.into())
    }

    /// The Python exception type name.
    #[must_use]
    pub const fn exception_type(&self) -> &'static str {
        match self {
            Self::UnboundName { .. } => "NameError",
            Self::TypeError { .. } => "TypeError",
            Self::ZeroDivision => "ZeroDivisionError",
            Self::StackUnderflow | Self::InvalidOpcode(_) | Self::InvalidOperand(_) => {
                "SystemError"
            }
            Self::Io(_) => "OSError",
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================
