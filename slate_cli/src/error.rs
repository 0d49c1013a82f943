//! Process exit codes.
//!
//! The same convention CPython uses: 0 for success, 1 for any pipeline
//! failure (lex, compile, or runtime), 2 for command-line misuse.

/// The run completed without error.
pub const EXIT_SUCCESS: u8 = 0;

/// A lex, compile, or runtime error aborted the run.
pub const EXIT_ERROR: u8 = 1;

/// Bad command-line arguments or an unreadable script file.
pub const EXIT_USAGE_ERROR: u8 = 2;
