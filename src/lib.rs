//! Line editing and tab completion for terminal REPLs.
//!
//! The terminal is treated as a write-only character stream: every edit
//! produces the exact sequence (text plus backspace runs) that keeps the
//! on-screen cursor in step with the buffer. [`ReplController`] turns key
//! events into those sequences, completes against a [`CommandGroup`] tree
//! and hands submitted lines to a [`CommandExecutor`].
//!
//! On `wasm32` the crate also exports `WebRepl`, a bridge to an
//! xterm.js-style terminal object.

pub mod config;
pub mod core;
pub mod models;
pub mod utils;

#[cfg(target_arch = "wasm32")]
mod web;

pub use config::ReplOptions;
pub use crate::core::{
    CommandError, CommandExecutor, FlushStatus, HistoryStore, Invocation, LineBuffer, Logger,
    PendingCommand, ReplController, ReplState, Session, TerminalSink, TreeExecutor,
};
#[cfg(any(test, feature = "mock"))]
pub use crate::core::MemoryTerminal;
pub use models::{ArgGroup, CommandGroup, CommandLeaf, Completer, KeyEvent, Modifiers};

#[cfg(target_arch = "wasm32")]
pub use web::WebRepl;
