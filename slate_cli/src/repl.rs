//! Interactive REPL.
//!
//! `>>> ` primary prompt, `... ` continuation while a compound statement
//! is open, blank line to close it. Errors print and the session
//! continues. State persists across inputs two ways: the VM keeps its
//! values table, and each compile is seeded with the previous name and
//! constant tables so every index stays stable for the session's
//! lifetime.

use std::io::{self, BufRead, Write};

use slate_compiler::Compiler;
use slate_core::Value;
use slate_vm::VirtualMachine;

use crate::config::RuntimeConfig;
use crate::{error, pipeline};

// =============================================================================
// REPL Entry Point
// =============================================================================

/// Start the interactive session.
///
/// `exit()`, `quit()`, or end-of-input (Ctrl+D) leaves the loop.
pub fn run_repl(config: &RuntimeConfig) -> u8 {
    if !config.quiet {
        println!("Slate {} on {}", slate_core::VERSION, std::env::consts::OS);
        println!("Type \"exit()\" or \"quit()\" to leave.");
    }

    let mut session = ReplSession::new();
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line_buf = String::new();

    loop {
        print!(">>> ");
        if io::stdout().flush().is_err() {
            break;
        }

        line_buf.clear();
        match reader.read_line(&mut line_buf) {
            Ok(0) => {
                // EOF (Ctrl+D).
                println!();
                break;
            }
            Ok(_) => {}
            Err(_) => break,
        }

        let trimmed = line_buf.trim();
        if trimmed == "exit()" || trimmed == "quit()" {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        // Collect the body of a compound statement until a blank line.
        let mut source = line_buf.clone();
        if needs_continuation(trimmed) {
            loop {
                print!("... ");
                if io::stdout().flush().is_err() {
                    break;
                }
                line_buf.clear();
                match reader.read_line(&mut line_buf) {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(_) => break,
                }
                if line_buf.trim().is_empty() {
                    break;
                }
                source.push_str(&line_buf);
            }
        }

        session.execute(&source, config);
    }

    error::EXIT_SUCCESS
}

// =============================================================================
// Session State
// =============================================================================

/// Everything that survives between REPL inputs.
struct ReplSession {
    vm: VirtualMachine,
    names: Vec<String>,
    consts: Vec<Value>,
}

impl ReplSession {
    fn new() -> Self {
        Self {
            vm: VirtualMachine::new(),
            names: Vec::new(),
            consts: Vec::new(),
        }
    }

    /// Run one input, printing results or errors. The session tables
    /// update once the input compiles; a runtime failure keeps them,
    /// matching the VM's values table, which has already grown.
    fn execute(&mut self, source: &str, config: &RuntimeConfig) {
        let source = pipeline::with_trailing_newline(source);

        let tokens = match slate_lexer::tokenize(&source) {
            Ok(tokens) => tokens,
            Err(e) => {
                eprintln!("{e}");
                return;
            }
        };
        if config.trace_tokens {
            let mut out = io::stdout().lock();
            let _ = pipeline::write_token_table(&mut out, &tokens);
        }

        let compiler = Compiler::with_tables(&tokens, self.names.clone(), self.consts.clone());
        let code = match compiler.compile() {
            Ok(code) => code,
            Err(e) => {
                eprintln!("{e}");
                return;
            }
        };
        if config.show_bytecode {
            print!("{}", slate_compiler::disassemble(&code));
        }
        self.names.clone_from(&code.names);
        self.consts.clone_from(&code.consts);

        let result = {
            let mut out = io::stdout().lock();
            self.vm.execute(&code, &mut out)
        };
        match result {
            Ok(Some(value)) if !value.is_none() => println!("{}", format_value(&value)),
            Ok(_) => {}
            Err(e) => eprintln!("{e}"),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Whether a line opens a compound statement and needs `...` input.
fn needs_continuation(line: &str) -> bool {
    let trimmed = line.trim();
    if !trimmed.ends_with(':') {
        return false;
    }
    let first_word = trimmed.split_whitespace().next().unwrap_or("");
    // `"else:"` splits as one word; strip the colon so it matches.
    let first_word = first_word.strip_suffix(':').unwrap_or(first_word);
    matches!(first_word, "if" | "else" | "while")
}

/// Format a value for the echo line. Unlike program output, strings show
/// their quotes.
fn format_value(value: &Value) -> String {
    match value {
        Value::Str(s) => format!("'{s}'"),
        value => value.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
