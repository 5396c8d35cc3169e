//! Running submitted commands.
//!
//! The controller hands a submitted line to a [`CommandExecutor`]. Hosts can
//! implement the trait directly (the browser bridge forwards to JavaScript)
//! or use [`TreeExecutor`], which walks the command tree, prints usage, checks
//! arguments and calls a handler registered for the leaf.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;

use crate::config::builtins;
use crate::core::error::CommandError;
use crate::core::terminal::Logger;
use crate::models::{navigate, CommandGroup, CommandLeaf, NodeRef};
use crate::utils::format_usage;

const DOUBLE_DASH: &str = "--";
const HELP_FLAG: &str = "--help";

/// Everything a command gets to run with.
pub struct Invocation<'a> {
    /// Tokens of the submitted line.
    pub args: &'a [String],
    /// The tree the line was completed against.
    pub root: &'a CommandGroup,
    pub logger: &'a dyn Logger,
    /// Terminal width, for output formatting.
    pub columns: u16,
}

/// Runs the commands a [`crate::ReplController`] dispatches.
pub trait CommandExecutor {
    fn run<'a>(
        &'a self,
        invocation: Invocation<'a>,
    ) -> impl Future<Output = Result<(), CommandError>> + 'a;
}

// ============================================================================
// Parsed Arguments
// ============================================================================

/// Arguments of a leaf, sorted into its argument groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    pub positional: Vec<String>,
    /// Values given after each `--<flag>`, keyed by flag name.
    pub named: BTreeMap<String, Vec<String>>,
    /// Everything after a bare `--`.
    pub double_dash: Vec<String>,
}

impl ParsedArgs {
    /// Whether `--<flag>` was given, with or without values.
    pub fn has(&self, flag: &str) -> bool {
        self.named.contains_key(flag)
    }

    pub fn values(&self, flag: &str) -> &[String] {
        self.named.get(flag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Last value given for `--<flag>`.
    pub fn value(&self, flag: &str) -> Option<&str> {
        self.values(flag).last().map(String::as_str)
    }
}

/// Sort `args` into the groups `leaf` declares.
pub fn parse_args(
    leaf: &CommandLeaf,
    command: &str,
    args: &[String],
) -> Result<ParsedArgs, CommandError> {
    let mut parsed = ParsedArgs::default();
    let mut current_flag: Option<&str> = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == DOUBLE_DASH {
            if leaf.double_dash.is_none() {
                return Err(CommandError::UnknownFlag {
                    command: command.to_string(),
                    flag: arg.clone(),
                });
            }
            parsed.double_dash = iter.by_ref().cloned().collect();
            break;
        }

        if let Some(flag) = arg.strip_prefix(DOUBLE_DASH) {
            if !leaf.named.contains_key(flag) {
                return Err(CommandError::UnknownFlag {
                    command: command.to_string(),
                    flag: arg.clone(),
                });
            }
            parsed.named.entry(flag.to_string()).or_default();
            current_flag = Some(flag);
            continue;
        }

        match current_flag {
            Some(flag) => parsed
                .named
                .entry(flag.to_string())
                .or_default()
                .push(arg.clone()),
            None if leaf.positional.is_some() => parsed.positional.push(arg.clone()),
            None => {
                return Err(CommandError::UnexpectedArgument {
                    command: command.to_string(),
                    argument: arg.clone(),
                });
            }
        }
    }

    if let Some(group) = &leaf.positional
        && !group.optional
        && parsed.positional.is_empty()
    {
        return Err(CommandError::MissingArgument {
            command: command.to_string(),
            argument: group.placeholder.clone(),
        });
    }

    for (flag, group) in &leaf.named {
        if !group.optional && !parsed.has(flag) {
            return Err(CommandError::MissingArgument {
                command: command.to_string(),
                argument: format!("--{}", flag),
            });
        }
    }

    Ok(parsed)
}

// ============================================================================
// TreeExecutor
// ============================================================================

/// What a handler sees when its leaf runs.
pub struct ActionContext<'a> {
    /// Space-joined path of the leaf, e.g. `"cloud push"`.
    pub command: String,
    pub args: ParsedArgs,
    pub logger: &'a dyn Logger,
    pub columns: u16,
}

pub type Handler = dyn Fn(&ActionContext<'_>) -> Result<(), CommandError>;

/// Executor that dispatches on the command tree itself.
///
/// Handlers are registered by leaf path. `help` and `--help` are answered
/// with usage text unless a handler claims `help`.
#[derive(Default)]
pub struct TreeExecutor {
    handlers: HashMap<String, Box<Handler>>,
}

impl TreeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for the leaf at `path` (space-separated names).
    pub fn handler(
        mut self,
        path: impl Into<String>,
        handler: impl Fn(&ActionContext<'_>) -> Result<(), CommandError> + 'static,
    ) -> Self {
        self.handlers.insert(path.into(), Box::new(handler));
        self
    }

    pub fn execute(&self, invocation: &Invocation<'_>) -> Result<(), CommandError> {
        let navigation = navigate(invocation.root, invocation.args);
        let command = navigation.command_name();
        let rest = navigation.args;

        let leaf = match navigation.node {
            NodeRef::Group(group) => {
                if rest.is_empty() || rest.iter().any(|arg| arg == HELP_FLAG) {
                    let usage = format_usage(NodeRef::Group(group), &command, invocation.columns);
                    invocation.logger.log(&usage);
                    return Ok(());
                }
                let unknown = if command.is_empty() {
                    rest[0].clone()
                } else {
                    format!("{} {}", command, rest[0])
                };
                return Err(CommandError::UnknownCommand(unknown));
            }
            NodeRef::Leaf(leaf) => leaf,
        };

        let mut before_double_dash = rest.iter().take_while(|arg| *arg != DOUBLE_DASH);
        if before_double_dash.any(|arg| arg == HELP_FLAG) {
            let usage = format_usage(NodeRef::Leaf(leaf), &command, invocation.columns);
            invocation.logger.log(&usage);
            return Ok(());
        }

        if command == builtins::HELP && !self.handlers.contains_key(builtins::HELP) {
            return self.help(invocation, rest);
        }

        let args = parse_args(leaf, &command, rest)?;
        let handler = self
            .handlers
            .get(&command)
            .ok_or_else(|| CommandError::NoHandler(command.clone()))?;

        tracing::debug!(%command, "running handler");
        handler(&ActionContext {
            command,
            args,
            logger: invocation.logger,
            columns: invocation.columns,
        })
    }

    /// Usage for the command named by `topic`, or for the whole tree.
    fn help(&self, invocation: &Invocation<'_>, topic: &[String]) -> Result<(), CommandError> {
        let target = navigate(invocation.root, topic);
        if !target.args.is_empty() {
            return Err(CommandError::UnknownCommand(topic.join(" ")));
        }
        let usage = format_usage(target.node, &target.command_name(), invocation.columns);
        invocation.logger.log(&usage);
        Ok(())
    }
}

impl CommandExecutor for TreeExecutor {
    fn run<'a>(
        &'a self,
        invocation: Invocation<'a>,
    ) -> impl Future<Output = Result<(), CommandError>> + 'a {
        std::future::ready(self.execute(&invocation))
    }
}
