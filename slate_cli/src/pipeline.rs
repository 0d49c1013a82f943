//! Execution pipeline: source → tokens → bytecode → VM → exit status.
//!
//! Every non-interactive CLI mode (script, `-c` string, stdin) funnels
//! into [`execute_source_to`], which runs the three phases in order and
//! reports the first failure through [`crate::diagnostics`]. Program
//! output and the `--tokens`/`--dis` listings share one sink; diagnostics
//! go to stderr.

use std::borrow::Cow;
use std::io::{self, Read, Write};
use std::path::Path;

use slate_lexer::Token;
use slate_vm::VirtualMachine;

use crate::config::RuntimeConfig;
use crate::{diagnostics, error};

// =============================================================================
// Public Pipeline Functions
// =============================================================================

/// Run a script file. An unreadable path is a usage error, mirroring
/// CPython's exit status for a missing script.
pub fn run_file(path: &Path, config: &RuntimeConfig) -> u8 {
    let filename = path.display().to_string();

    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!(
                "slate: can't open file '{filename}': [Errno {}] {e}",
                e.raw_os_error().unwrap_or(0),
            );
            return error::EXIT_USAGE_ERROR;
        }
    };

    execute_source(&source, &filename, config)
}

/// Run a command string from the `-c` flag.
pub fn run_string(command: &str, config: &RuntimeConfig) -> u8 {
    execute_source(command, "<string>", config)
}

/// Read the whole of stdin, then run it.
pub fn run_stdin(config: &RuntimeConfig) -> u8 {
    let mut source = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut source) {
        eprintln!("slate: error reading stdin: {e}");
        return error::EXIT_ERROR;
    }
    execute_source(&source, "<stdin>", config)
}

// =============================================================================
// Core Execution
// =============================================================================

/// Execute source through the full pipeline, writing to stdout.
fn execute_source(source: &str, filename: &str, config: &RuntimeConfig) -> u8 {
    let mut out = io::stdout().lock();
    execute_source_to(source, filename, config, &mut out)
}

/// Execute source through the full pipeline, writing to `out`.
fn execute_source_to(
    source: &str,
    filename: &str,
    config: &RuntimeConfig,
    out: &mut dyn Write,
) -> u8 {
    let source = with_trailing_newline(source);

    // Phase 1: tokenize.
    let tokens = match slate_lexer::tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            diagnostics::report(&e.into(), filename);
            return error::EXIT_ERROR;
        }
    };
    if config.trace_tokens && write_token_table(out, &tokens).is_err() {
        return error::EXIT_ERROR;
    }

    // Phase 2: compile.
    let code = match slate_compiler::compile(&tokens) {
        Ok(code) => code,
        Err(e) => {
            diagnostics::report(&e.into(), filename);
            return error::EXIT_ERROR;
        }
    };
    if config.show_bytecode && write!(out, "{}", slate_compiler::disassemble(&code)).is_err() {
        return error::EXIT_ERROR;
    }

    // Phase 3: execute.
    match VirtualMachine::new().execute(&code, out) {
        Ok(_) => error::EXIT_SUCCESS,
        Err(e) => {
            diagnostics::report(&e.into(), filename);
            error::EXIT_ERROR
        }
    }
}

/// The lexer's line accounting assumes the text ends with a newline;
/// every entry point guarantees it here.
pub(crate) fn with_trailing_newline(source: &str) -> Cow<'_, str> {
    if source.is_empty() || source.ends_with('\n') {
        Cow::Borrowed(source)
    } else {
        Cow::Owned(format!("{source}\n"))
    }
}

/// Write the `--tokens` trace table: a header plus one aligned row per
/// token.
pub(crate) fn write_token_table(out: &mut dyn Write, tokens: &[Token]) -> io::Result<()> {
    writeln!(out, "{:<5} {:<5} {:<13} {}", "Line", "Col", "Kind", "Lexeme")?;
    for token in tokens {
        writeln!(out, "{token}")?;
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_string(source: &str, config: &RuntimeConfig) -> (String, u8) {
        let mut out = Vec::new();
        let status = execute_source_to(source, "<test>", config, &mut out);
        (String::from_utf8(out).expect("output should be utf-8"), status)
    }

    fn run_default(source: &str) -> (String, u8) {
        run_to_string(source, &RuntimeConfig::default())
    }

    // =========================================================================
    // Source Execution Tests
    // =========================================================================

    #[test]
    fn test_execute_empty_source() {
        assert_eq!(run_default(""), (String::new(), error::EXIT_SUCCESS));
    }

    #[test]
    fn test_execute_assignment() {
        assert_eq!(run_default("x = 42\n"), (String::new(), error::EXIT_SUCCESS));
    }

    #[test]
    fn test_execute_print() {
        assert_eq!(
            run_default("print('hello, world')\n"),
            ("hello, world\n".to_string(), error::EXIT_SUCCESS)
        );
    }

    #[test]
    fn test_missing_trailing_newline_is_supplied() {
        assert_eq!(
            run_default("print(7)"),
            ("7\n".to_string(), error::EXIT_SUCCESS)
        );
    }

    #[test]
    fn test_execute_while_program() {
        let source = "x = 0\nwhile x < 3:\n    print(x)\n    x = x + 1\n";
        assert_eq!(
            run_default(source),
            ("0\n1\n2\n".to_string(), error::EXIT_SUCCESS)
        );
    }

    #[test]
    fn test_execute_if_else_program() {
        let source = "x = 2\nif x < 1:\n    print('small')\nelse:\n    print('big')\n";
        assert_eq!(
            run_default(source),
            ("big\n".to_string(), error::EXIT_SUCCESS)
        );
    }

    #[test]
    fn test_execute_only_comments() {
        assert_eq!(
            run_default("# just a comment\n# another\n"),
            (String::new(), error::EXIT_SUCCESS)
        );
    }

    #[test]
    fn test_execute_only_whitespace() {
        assert_eq!(
            run_default("   \n\n   \n"),
            (String::new(), error::EXIT_SUCCESS)
        );
    }

    #[test]
    fn test_execute_pass() {
        assert_eq!(run_default("pass\n"), (String::new(), error::EXIT_SUCCESS));
    }

    // =========================================================================
    // Error Handling Tests
    // =========================================================================

    #[test]
    fn test_lex_error_exit_code() {
        let (out, status) = run_default("x = $1\n");
        assert_eq!(out, "");
        assert_eq!(status, error::EXIT_ERROR);
    }

    #[test]
    fn test_parse_error_exit_code() {
        // Statements start with a name, `print`, `pass`, `if`, or `while`.
        let (_, status) = run_default("1 + 2\n");
        assert_eq!(status, error::EXIT_ERROR);
    }

    #[test]
    fn test_print_without_parens_is_an_error() {
        let (_, status) = run_default("print 1\n");
        assert_eq!(status, error::EXIT_ERROR);
    }

    #[test]
    fn test_chained_comparison_is_an_error() {
        let (_, status) = run_default("x = 1 < 2 < 3\n");
        assert_eq!(status, error::EXIT_ERROR);
    }

    #[test]
    fn test_runtime_error_exit_code() {
        let (out, status) = run_default("print(1)\nprint('a' + 1)\n");
        assert_eq!(out, "1\n");
        assert_eq!(status, error::EXIT_ERROR);
    }

    #[test]
    fn test_unbound_name_exit_code() {
        let (_, status) = run_default("if False:\n    x = 1\nprint(x)\n");
        assert_eq!(status, error::EXIT_ERROR);
    }

    // =========================================================================
    // Trace Flag Tests
    // =========================================================================

    #[test]
    fn test_tokens_flag_prints_table_then_output() {
        let config = RuntimeConfig {
            trace_tokens: true,
            ..RuntimeConfig::default()
        };
        let (out, status) = run_to_string("print(5)\n", &config);
        assert_eq!(status, error::EXIT_SUCCESS);
        assert!(out.starts_with("Line  Col   Kind          Lexeme\n"));
        assert!(out.contains("PRINT"));
        assert!(out.contains("EOF"));
        assert!(out.ends_with("5\n"));
    }

    #[test]
    fn test_dis_flag_prints_listing_then_output() {
        let config = RuntimeConfig {
            show_bytecode: true,
            ..RuntimeConfig::default()
        };
        let (out, status) = run_to_string("x = 5\nprint(x)\n", &config);
        assert_eq!(status, error::EXIT_SUCCESS);
        assert!(out.contains("LOAD_CONST"));
        assert!(out.contains("STORE_NAME"));
        assert!(out.contains("(x)"));
        assert!(out.ends_with("5\n"));
    }

    // =========================================================================
    // File Execution Tests
    // =========================================================================

    #[test]
    fn test_run_file_nonexistent() {
        let status = run_file(
            Path::new("/nonexistent/path/program.sl"),
            &RuntimeConfig::default(),
        );
        assert_eq!(status, error::EXIT_USAGE_ERROR);
    }

    // =========================================================================
    // Helper Tests
    // =========================================================================

    #[test]
    fn test_with_trailing_newline() {
        assert_eq!(with_trailing_newline("x = 1"), "x = 1\n");
        assert_eq!(with_trailing_newline("x = 1\n"), "x = 1\n");
        assert_eq!(with_trailing_newline(""), "");
    }
}
