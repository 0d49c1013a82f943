//! Command-line entry point.
//!
//! Argument parsing picks an execution mode, the pipeline or the REPL
//! runs it, and the process exit code reports how it went.

use std::path::Path;
use std::process::ExitCode;

mod args;
mod config;
mod diagnostics;
mod error;
mod pipeline;
mod repl;

use args::ExecutionMode;
use config::RuntimeConfig;

fn main() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().skip(1).collect();

    let parsed = match args::parse_args_vec(&raw_args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("slate: {message}");
            eprintln!("Try 'slate -h' for more information.");
            return ExitCode::from(error::EXIT_USAGE_ERROR);
        }
    };

    // Modes that never reach the interpreter.
    match parsed.mode {
        ExecutionMode::PrintVersion => {
            println!("{}", args::version_string());
            return ExitCode::SUCCESS;
        }
        ExecutionMode::PrintHelp => {
            println!("{}", args::help_text());
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let config = RuntimeConfig::from_args(&parsed);

    let status = match &parsed.mode {
        ExecutionMode::Script(path) => pipeline::run_file(Path::new(path), &config),
        ExecutionMode::Command(source) => pipeline::run_string(source, &config),
        ExecutionMode::Stdin => pipeline::run_stdin(&config),
        ExecutionMode::Repl => repl::run_repl(&config),
        ExecutionMode::PrintVersion | ExecutionMode::PrintHelp => unreachable!("handled above"),
    };

    ExitCode::from(status)
}
