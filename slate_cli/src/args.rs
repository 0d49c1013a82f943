//! Command-line argument parsing.
//!
//! Hand-rolled over the small flag set rather than pulling in a parser
//! crate; the surface mirrors CPython's: a script path, `-c` for an
//! inline program, `-` for stdin, and no arguments for the REPL.

/// What the process should do, decided entirely by the arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Interactive session (no script, command, or stdin marker given).
    #[default]
    Repl,
    /// Run a script file.
    Script(String),
    /// Run the program text passed to `-c`.
    Command(String),
    /// Read the program from stdin (`-`).
    Stdin,
    /// Print the version and exit.
    PrintVersion,
    /// Print usage and exit.
    PrintHelp,
}

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlateArgs {
    /// Selected execution mode.
    pub mode: ExecutionMode,
    /// `--tokens`: print the token stream after lexing.
    pub trace_tokens: bool,
    /// `--dis`: print a disassembly after compiling.
    pub show_bytecode: bool,
    /// `-q`: suppress the REPL banner.
    pub quiet: bool,
}

/// Parse the argument vector (without argv[0]).
///
/// The first non-flag argument is the script path and terminates option
/// processing, as do `-c CMD` and `-`.
pub fn parse_args_vec(args: &[String]) -> Result<SlateArgs, String> {
    let mut parsed = SlateArgs::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                parsed.mode = ExecutionMode::PrintHelp;
                return Ok(parsed);
            }
            "-V" | "--version" => {
                parsed.mode = ExecutionMode::PrintVersion;
                return Ok(parsed);
            }
            "-q" => parsed.quiet = true,
            "--tokens" => parsed.trace_tokens = true,
            "--dis" => parsed.show_bytecode = true,
            "-c" => {
                let Some(command) = iter.next() else {
                    return Err("argument expected for the -c option".to_string());
                };
                parsed.mode = ExecutionMode::Command(command.clone());
                return Ok(parsed);
            }
            "-" => {
                parsed.mode = ExecutionMode::Stdin;
                return Ok(parsed);
            }
            flag if flag.starts_with('-') => {
                return Err(format!("unknown option: {flag}"));
            }
            path => {
                parsed.mode = ExecutionMode::Script(path.to_string());
                return Ok(parsed);
            }
        }
    }

    Ok(parsed)
}

/// The `-V` output.
#[must_use]
pub fn version_string() -> String {
    format!("Slate {}", slate_core::VERSION)
}

/// The `-h` output.
#[must_use]
pub const fn help_text() -> &'static str {
    "\
usage: slate [option] ... [-c cmd | - | file]

Options:
  -c cmd     : program passed in as string (terminates option list)
  -h, --help : print this help message and exit
  -q         : don't print the banner on interactive startup
  -V, --version : print the Slate version number and exit
  --tokens   : print the token stream after lexing
  --dis      : print a disassembly of the compiled bytecode
  -          : read the program from stdin
  file       : program read from script file

With no arguments, start an interactive session."
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<SlateArgs, String> {
        let owned: Vec<String> = args.iter().map(ToString::to_string).collect();
        parse_args_vec(&owned)
    }

    #[test]
    fn test_no_args_is_repl() {
        let parsed = parse(&[]).unwrap();
        assert_eq!(parsed.mode, ExecutionMode::Repl);
        assert!(!parsed.quiet);
    }

    #[test]
    fn test_script_path() {
        let parsed = parse(&["program.sl"]).unwrap();
        assert_eq!(parsed.mode, ExecutionMode::Script("program.sl".to_string()));
    }

    #[test]
    fn test_command_mode() {
        let parsed = parse(&["-c", "print(1)"]).unwrap();
        assert_eq!(parsed.mode, ExecutionMode::Command("print(1)".to_string()));
    }

    #[test]
    fn test_command_without_argument() {
        let err = parse(&["-c"]).unwrap_err();
        assert_eq!(err, "argument expected for the -c option");
    }

    #[test]
    fn test_stdin_marker() {
        let parsed = parse(&["-"]).unwrap();
        assert_eq!(parsed.mode, ExecutionMode::Stdin);
    }

    #[test]
    fn test_version_flags() {
        assert_eq!(parse(&["-V"]).unwrap().mode, ExecutionMode::PrintVersion);
        assert_eq!(
            parse(&["--version"]).unwrap().mode,
            ExecutionMode::PrintVersion
        );
    }

    #[test]
    fn test_help_flags() {
        assert_eq!(parse(&["-h"]).unwrap().mode, ExecutionMode::PrintHelp);
        assert_eq!(parse(&["--help"]).unwrap().mode, ExecutionMode::PrintHelp);
    }

    #[test]
    fn test_flags_before_script() {
        let parsed = parse(&["--tokens", "--dis", "-q", "program.sl"]).unwrap();
        assert!(parsed.trace_tokens);
        assert!(parsed.show_bytecode);
        assert!(parsed.quiet);
        assert_eq!(parsed.mode, ExecutionMode::Script("program.sl".to_string()));
    }

    #[test]
    fn test_unknown_option() {
        let err = parse(&["--frobnicate"]).unwrap_err();
        assert_eq!(err, "unknown option: --frobnicate");
    }

    #[test]
    fn test_script_terminates_option_list() {
        // A dash-prefixed word after the script path belongs to the script,
        // not to us.
        let parsed = parse(&["program.sl", "--tokens"]).unwrap();
        assert_eq!(parsed.mode, ExecutionMode::Script("program.sl".to_string()));
        assert!(!parsed.trace_tokens);
    }

    #[test]
    fn test_version_string_mentions_slate() {
        assert!(version_string().starts_with("Slate "));
    }

    #[test]
    fn test_help_text_lists_the_modes() {
        let help = help_text();
        assert!(help.contains("-c cmd"));
        assert!(help.contains("--tokens"));
        assert!(help.contains("--dis"));
    }
}
