//! Error reporting.
//!
//! Every user-facing diagnostic goes through here so the format stays in
//! one place: `file:line:col: ExceptionType: message` when the error
//! carries a source position, `file: ExceptionType: message` when it does
//! not (runtime errors keep no line table).

use slate_core::SlateError;

/// Render a pipeline error for the diagnostic stream.
fn render(err: &SlateError, filename: &str) -> String {
    match err.position() {
        Some((line, column)) => format!("{filename}:{line}:{column}: {err}"),
        None => format!("{filename}: {err}"),
    }
}

/// Report a pipeline error to stderr.
pub fn report(err: &SlateError, filename: &str) {
    eprintln!("{}", render(err, filename));
}
