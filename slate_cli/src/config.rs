//! Runtime configuration derived from the parsed arguments.

use crate::args::SlateArgs;

/// Settings every execution mode consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuntimeConfig {
    /// Print the token stream after lexing.
    pub trace_tokens: bool,
    /// Print a disassembly after compiling.
    pub show_bytecode: bool,
    /// Suppress the REPL banner.
    pub quiet: bool,
}

impl RuntimeConfig {
    /// Build the configuration from parsed arguments.
    #[must_use]
    pub const fn from_args(args: &SlateArgs) -> Self {
        Self {
            trace_tokens: args.trace_tokens,
            show_bytecode: args.show_bytecode,
            quiet: args.quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_quiet_about_nothing() {
        let config = RuntimeConfig::from_args(&SlateArgs::default());
        assert_eq!(config, RuntimeConfig::default());
        assert!(!config.trace_tokens);
        assert!(!config.show_bytecode);
        assert!(!config.quiet);
    }

    #[test]
    fn test_flags_carry_over() {
        let args = SlateArgs {
            trace_tokens: true,
            show_bytecode: true,
            quiet: true,
            ..SlateArgs::default()
        };
        let config = RuntimeConfig::from_args(&args);
        assert!(config.trace_tokens);
        assert!(config.show_bytecode);
        assert!(config.quiet);
    }
}
