//! Error types for the line editor.
//!
//! - [`ParseError`] - Problems with the submitted line itself
//! - [`CommandError`] - Failures reported while running a command
//! - [`SpecError`] - Malformed command descriptions loaded at runtime
//!
//! None of these end a session: the controller renders them on its error
//! path and returns to the prompt.

use thiserror::Error;

use crate::core::parser::Quote;

/// Errors found while tokenizing a submitted line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{} quotes are not balanced", .0.describe())]
    UnbalancedQuote(Quote),
}

/// Errors raised by a command executor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command \"{0}\"")]
    UnknownCommand(String),
    #[error("{command}: unknown flag \"{flag}\"")]
    UnknownFlag { command: String, flag: String },
    #[error("{command}: missing required argument {argument}")]
    MissingArgument { command: String, argument: String },
    #[error("{command}: unexpected argument \"{argument}\"")]
    UnexpectedArgument { command: String, argument: String },
    #[error("{0}: no handler registered")]
    NoHandler(String),
    /// The host runtime rejected or failed the call.
    #[error("{0}")]
    Host(String),
    #[error("{0}")]
    Failed(String),
}

/// Errors in externally supplied command descriptions.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("invalid command description: {0}")]
    Json(#[from] serde_json::Error),
    #[error("command description has no name")]
    EmptyName,
    #[error("invalid command name \"{0}\"")]
    InvalidName(String),
    #[error("command \"{0}\" is already defined")]
    DuplicateName(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        assert_eq!(
            ParseError::UnbalancedQuote(Quote::Double).to_string(),
            "double quotes are not balanced"
        );
        assert_eq!(
            ParseError::UnbalancedQuote(Quote::Single).to_string(),
            "single quotes are not balanced"
        );
    }

    #[test]
    fn test_command_error_display() {
        assert_eq!(
            CommandError::UnknownCommand("nope".into()).to_string(),
            "unknown command \"nope\""
        );
        assert_eq!(
            CommandError::UnknownFlag {
                command: "deploy".into(),
                flag: "--fast".into()
            }
            .to_string(),
            "deploy: unknown flag \"--fast\""
        );
    }

    #[test]
    fn test_spec_error_from_json() {
        let err: SpecError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("invalid command description"));
    }
}
