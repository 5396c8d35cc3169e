//! Formatting for terminal output: line endings, errors, usage text.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{colors, HELP_HINT};
use crate::models::{CommandGroup, CommandLeaf, NodeRef};

/// A `\n` not already preceded by `\r`, along with the character before it.
static BARE_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\r])\n").expect("Invalid bare newline regex"));

/// Indentation for descriptions under a usage line.
const INDENT: &str = "   ";

/// Prepare text for a raw terminal stream.
///
/// Bare `\n` become `\r\n`, a leading `\n` gets a `\r`, and the result always
/// ends with `\r\n`.
pub fn to_terminal_text(value: &str) -> String {
    let value = if value.starts_with('\n') {
        format!("\r{}", value)
    } else {
        value.to_string()
    };
    let mut text = BARE_NEWLINE.replace_all(&value, "${1}\r\n").into_owned();
    if !text.ends_with("\r\n") {
        text.push_str("\r\n");
    }
    text
}

/// Paint text for the error path.
pub fn paint_error(value: &str) -> String {
    format!("{}{}{}", colors::RED, value, colors::RESET)
}

/// Banner shown when the REPL starts: a rule, the help hint, a rule.
pub fn welcome_banner(columns: u16) -> String {
    let rule = "-".repeat(usize::from(columns));
    format!("{}\n{}\n{}", rule, HELP_HINT, rule)
}

/// Greedy word wrap to `width` columns (at least 20).
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(20);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed =
            current.chars().count() + word.chars().count() + usize::from(!current.is_empty());
        if !current.is_empty() && needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// =============================================================================
// Usage
// =============================================================================

/// Usage text for the node a command path resolved to.
pub fn format_usage(node: NodeRef<'_>, path: &str, columns: u16) -> String {
    match node {
        NodeRef::Group(group) => group_usage(group, path, columns),
        NodeRef::Leaf(leaf) => leaf_usage(leaf, path, columns),
    }
}

fn push_description(out: &mut Vec<String>, description: &str, columns: u16) {
    let width = usize::from(columns).saturating_sub(INDENT.len());
    for line in wrap(description, width) {
        out.push(format!("{}{}", INDENT, line));
    }
}

fn group_usage(group: &CommandGroup, path: &str, columns: u16) -> String {
    let prefix = if path.is_empty() {
        String::new()
    } else {
        format!("{} ", path)
    };
    let mut out = vec![format!("Usage: {}<subcommand> ...", prefix)];

    if !group.description.is_empty() {
        out.push(String::new());
        push_description(&mut out, &group.description, columns);
    }

    let children: Vec<_> = group.visible_children().collect();
    if !children.is_empty() {
        out.push(String::new());
        out.push("Subcommands:".to_string());
        out.push(String::new());
        let width = children.iter().map(|c| c.name().len()).max().unwrap_or(0);
        for child in children {
            out.push(format!(
                "{}{:width$}  {}",
                INDENT,
                child.name(),
                child.description(),
                width = width
            ));
        }
    }

    out.join("\n")
}

fn leaf_usage(leaf: &CommandLeaf, path: &str, columns: u16) -> String {
    let mut usage = format!("Usage: {}", path);
    if let Some(positional) = &leaf.positional {
        usage.push(' ');
        usage.push_str(&positional.placeholder);
    }
    for (flag, group) in &leaf.named {
        let part = format!("--{} {}", flag, group.placeholder);
        if group.optional {
            usage.push_str(&format!(" [{}]", part.trim_end()));
        } else {
            usage.push(' ');
            usage.push_str(part.trim_end());
        }
    }
    if let Some(double_dash) = &leaf.double_dash {
        usage.push_str(&format!(" [-- {}]", double_dash.placeholder));
    }

    let mut out = vec![usage];
    if !leaf.description.is_empty() {
        out.push(String::new());
        push_description(&mut out, &leaf.description, columns);
    }

    let described: Vec<_> = leaf
        .named
        .iter()
        .filter_map(|(flag, group)| group.description.as_ref().map(|d| (flag, d)))
        .collect();
    if !described.is_empty() {
        out.push(String::new());
        out.push("Options:".to_string());
        out.push(String::new());
        for (flag, description) in described {
            out.push(format!("{}--{}  {}", INDENT, flag, description));
        }
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArgGroup, CommandNode};

    #[test]
    fn test_terminal_text_newlines() {
        assert_eq!(to_terminal_text("a\nb"), "a\r\nb\r\n");
        assert_eq!(to_terminal_text("a\r\nb\r\n"), "a\r\nb\r\n");
        assert_eq!(to_terminal_text(""), "\r\n");
    }

    #[test]
    fn test_terminal_text_leading_newline() {
        assert_eq!(to_terminal_text("\nhi"), "\r\nhi\r\n");
    }

    #[test]
    fn test_paint_error() {
        assert_eq!(paint_error("bad"), "\u{1b}[31mbad\u{1b}[39m");
    }

    #[test]
    fn test_welcome_banner() {
        let banner = welcome_banner(4);
        assert_eq!(banner, format!("----\n{}\n----", HELP_HINT));
    }

    #[test]
    fn test_wrap() {
        assert_eq!(
            wrap("the quick brown fox jumps over the lazy dog", 20),
            vec!["the quick brown fox", "jumps over the lazy", "dog"]
        );
        assert!(wrap("", 40).is_empty());
    }

    #[test]
    fn test_group_usage() {
        let group = CommandGroup::new("", "Demo commands")
            .child(crate::models::CommandLeaf::new("deploy", "Deploy an app"))
            .child(crate::models::CommandLeaf::new("ls", "List apps"))
            .child(crate::models::CommandLeaf::new("secret", "Hidden").hidden());
        let usage = format_usage(NodeRef::Group(&group), "", 80);
        assert!(usage.starts_with("Usage: <subcommand> ..."));
        assert!(usage.contains("   Demo commands"));
        assert!(usage.contains("   deploy  Deploy an app"));
        assert!(usage.contains("   ls      List apps"));
        assert!(!usage.contains("secret"));
    }

    #[test]
    fn test_leaf_usage() {
        let leaf = crate::models::CommandLeaf::new("push", "Push an image")
            .positional(ArgGroup::new("<image>"))
            .named(
                "region",
                ArgGroup::new("<region>").optional().description("Target region"),
            )
            .double_dash(ArgGroup::new("<args>"));
        let node = CommandNode::Leaf(leaf);
        let usage = format_usage(node.as_node_ref(), "cloud push", 80);
        let first = usage.lines().next().unwrap();
        assert_eq!(first, "Usage: cloud push <image> [--region <region>] [-- <args>]");
        assert!(usage.contains("   --region  Target region"));
    }
}
