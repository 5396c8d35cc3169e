//! Data models shared by the line editor and its hosts.
//!
//! Contains:
//! - [`KeyEvent`], [`KeyCode`], [`Modifiers`] - Raw key input from the terminal
//! - [`CommandGroup`], [`CommandLeaf`], [`ArgGroup`] - The command namespace
//! - [`CommandSpec`] - JSON command descriptions loaded at runtime

mod command_spec;
mod command_tree;
mod key;

pub use command_spec::{ArgSpec, CommandSpec};
pub use command_tree::{
    navigate, ArgGroup, CommandGroup, CommandLeaf, CommandNode, CompleteFn, Completer,
    Navigation, NodeRef,
};
pub use key::{KeyCode, KeyEvent, Modifiers};
