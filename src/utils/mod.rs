//! Utility modules for terminal output.
//!
//! Provides:
//! - [`to_terminal_text`] - Line-ending normalisation for raw terminal streams
//! - [`format_usage`] - Usage text for groups and leaves
//! - [`welcome_banner`], [`paint_error`] - Fixed pieces of REPL output

mod format;

pub use format::{format_usage, paint_error, to_terminal_text, welcome_banner, wrap};
