//! The line-editing engine.
//!
//! This module provides:
//! - [`tokenize`] and [`split_for_completion`] for quote-aware splitting
//! - [`LineBuffer`] and [`HistoryStore`] for the line being edited
//! - [`complete`] for tab completion over the command tree
//! - [`ReplController`] tying them to a [`TerminalSink`]
//! - [`Session`] and [`TreeExecutor`] for running submitted commands

mod autocomplete;
pub mod error;
mod executor;
mod history;
mod line;
pub mod parser;
mod repl;
mod session;
mod terminal;

pub use autocomplete::{complete, filter_candidates, Completion};
pub use error::{CommandError, ParseError, SpecError};
pub use executor::{
    parse_args, ActionContext, CommandExecutor, Handler, Invocation, ParsedArgs, TreeExecutor,
};
pub use history::HistoryStore;
pub use line::LineBuffer;
pub use parser::{split_for_completion, tokenize, CompletionSplit, Quote, Tokenized};
pub use repl::{PendingCommand, ReplController, ReplState};
pub use session::Session;
#[cfg(any(test, feature = "mock"))]
pub use terminal::MemoryTerminal;
pub use terminal::{FlushStatus, Logger, TerminalSink};
