//! REPL configuration.
//!
//! Centralizes the constants used by the line editor and the runtime
//! [`ReplOptions`] a host passes in at construction.

use serde::Deserialize;

// =============================================================================
// Prompt and Rendering
// =============================================================================

/// Prompt written before every line (green `$` followed by a space).
pub const PROMPT: &str = "\u{1b}[32m$\u{1b}[39m ";

/// Indentation used when listing completion candidates below the prompt.
pub const CANDIDATE_INDENT: &str = "    ";

/// Hint shown inside the welcome banner.
pub const HELP_HINT: &str = "[?] Need help? Type 'help' to see available commands";

/// Escape sequences used to paint the error path.
pub mod colors {
    pub const RED: &str = "\u{1b}[31m";
    pub const RESET: &str = "\u{1b}[39m";
}

// =============================================================================
// History
// =============================================================================

/// Maximum number of submitted lines kept by the history store.
pub const MAX_COMMAND_HISTORY: usize = 100;

// =============================================================================
// Keys
// =============================================================================

/// Numeric key identifiers dispatched on by the controller.
pub mod keys {
    pub const BACKSPACE: u32 = 8;
    pub const TAB: u32 = 9;
    pub const ENTER: u32 = 13;
    pub const ARROW_LEFT: u32 = 37;
    pub const ARROW_UP: u32 = 38;
    pub const ARROW_RIGHT: u32 = 39;
    pub const ARROW_DOWN: u32 = 40;
}

/// Names of the commands the controller registers on its own.
pub mod builtins {
    pub const CLEAR: &str = "clear";
    pub const HELP: &str = "help";
    pub const HISTORY: &str = "history";
}

// =============================================================================
// Runtime Options
// =============================================================================

/// Options a host supplies when building a [`crate::ReplController`].
///
/// Deserializable so a browser host can hand over a plain JS object.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplOptions {
    /// Description of the root command group, shown by `help`.
    pub description: String,
    /// Prompt override. Falls back to [`PROMPT`].
    pub prompt: Option<String>,
    /// Line to run right after start. Suppresses the welcome banner.
    pub initial_command: Option<String>,
    /// Lines to seed the history with, oldest first.
    pub history: Vec<String>,
    pub history_capacity: usize,
    /// Whether `clear`, `help` and `history` get added to the root group.
    pub builtins: bool,
}

impl ReplOptions {
    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or(PROMPT)
    }
}

impl Default for ReplOptions {
    fn default() -> Self {
        Self {
            description: String::new(),
            prompt: None,
            initial_command: None,
            history: Vec::new(),
            history_capacity: MAX_COMMAND_HISTORY,
            builtins: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ReplOptions::default();
        assert_eq!(options.prompt(), PROMPT);
        assert_eq!(options.history_capacity, MAX_COMMAND_HISTORY);
        assert!(options.builtins);
        assert!(options.initial_command.is_none());
    }

    #[test]
    fn test_options_from_json() {
        let options: ReplOptions = serde_json::from_str(
            r#"{"description":"demo","initialCommand":"help","historyCapacity":5}"#,
        )
        .unwrap();
        assert_eq!(options.description, "demo");
        assert_eq!(options.initial_command.as_deref(), Some("help"));
        assert_eq!(options.history_capacity, 5);
        assert!(options.builtins);
    }

    #[test]
    fn test_prompt_override() {
        let options = ReplOptions {
            prompt: Some("> ".to_string()),
            ..ReplOptions::default()
        };
        assert_eq!(options.prompt(), "> ");
    }
}
