//! Tab completion over the command tree.
//!
//! Given the arguments already typed and the partial argument under the
//! cursor, [`complete`] walks the tree and returns candidate suffixes:
//!
//! - Group children by name (`cl` → `oud `)
//! - Leaf flags (`--` → `--env`, `--help`, ...)
//! - Values from an argument group's completer
//!
//! Candidates have the typed prefix stripped. A single candidate ends with a
//! space ("complete and move on"); a shared extension of several candidates
//! comes back alone without one ("keep typing").

use crate::models::{navigate, ArgGroup, CommandGroup, CommandLeaf, NodeRef};

// ============================================================================
// Public Types
// ============================================================================

/// What the controller should do with a set of candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Nothing to offer.
    None,
    /// Insert this text at the cursor.
    Insert(String),
    /// Show these candidates below the prompt.
    List(Vec<String>),
}

impl Completion {
    pub fn from_candidates(mut candidates: Vec<String>) -> Self {
        match candidates.len() {
            0 => Self::None,
            1 => Self::Insert(candidates.remove(0)),
            _ => Self::List(candidates),
        }
    }
}

const DOUBLE_DASH: &str = "--";
const HELP_FLAG: &str = "--help";

// ============================================================================
// Public API
// ============================================================================

/// Compute completion candidates for `search` after the completed `args`.
pub fn complete(root: &CommandGroup, args: &[String], search: &str) -> Vec<String> {
    if args.iter().any(|arg| arg == HELP_FLAG) {
        return Vec::new();
    }

    let navigation = navigate(root, args);
    let candidates = match navigation.node {
        NodeRef::Group(group) => {
            if navigation.args.is_empty() {
                filter_candidates(group.visible_names(), search)
            } else {
                Vec::new()
            }
        }
        NodeRef::Leaf(leaf) => complete_leaf(leaf, navigation.args, search),
    };

    tracing::debug!(
        command = %navigation.command_name(),
        search,
        count = candidates.len(),
        "completion"
    );
    candidates
}

/// Keep the entries of `vocabulary` starting with `prefix`, with the prefix
/// stripped.
///
/// One survivor comes back with a trailing space. Several survivors collapse
/// into their common extension when it is non-empty; otherwise they are all
/// returned for display.
pub fn filter_candidates(vocabulary: Vec<String>, prefix: &str) -> Vec<String> {
    let mut matches: Vec<String> = vocabulary
        .into_iter()
        .filter_map(|entry| entry.strip_prefix(prefix).map(str::to_string))
        .collect();

    match matches.len() {
        0 => Vec::new(),
        1 => {
            let mut only = matches.remove(0);
            only.push(' ');
            vec![only]
        }
        _ => {
            let common = common_extension(&matches, "");
            if common.is_empty() {
                matches
            } else {
                vec![common]
            }
        }
    }
}

// ============================================================================
// Leaf Completion
// ============================================================================

fn complete_leaf(leaf: &CommandLeaf, args: &[String], search: &str) -> Vec<String> {
    let flags = leaf.flags();
    let last = args.last().map(String::as_str);

    if last == Some(DOUBLE_DASH) {
        return suggest(leaf.double_dash.as_ref(), search);
    }
    if args.iter().any(|arg| arg == DOUBLE_DASH) {
        return Vec::new();
    }

    if search == "-" || search == DOUBLE_DASH {
        let mut vocabulary = Vec::with_capacity(flags.len() + 1);
        if leaf.double_dash.is_some() {
            vocabulary.push(DOUBLE_DASH.to_string());
        }
        vocabulary.extend(flags);
        return filter_candidates(vocabulary, search);
    }

    if search.starts_with(DOUBLE_DASH) {
        return filter_candidates(flags, search);
    }

    if args.is_empty() {
        let positional = suggest(leaf.positional.as_ref(), search);
        if leaf.positional.as_ref().is_some_and(|group| !group.optional) {
            return positional;
        }
        if !search.is_empty() {
            return positional;
        }

        let mut merged = Vec::with_capacity(flags.len() + positional.len() + 1);
        if leaf.double_dash.is_some() {
            merged.push(DOUBLE_DASH.to_string());
        }
        merged.extend(flags);
        merged.extend(positional);
        return merged;
    }

    match last.and_then(|arg| arg.strip_prefix(DOUBLE_DASH)) {
        Some(flag) => suggest(leaf.named.get(flag), search),
        None => Vec::new(),
    }
}

/// Ask a group's completer for vocabulary, then filter it.
fn suggest(group: Option<&ArgGroup>, search: &str) -> Vec<String> {
    match group {
        Some(group) => filter_candidates(group.completer.suggest(&[], search), search),
        None => Vec::new(),
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// First `count` characters of `s`, or all of it when shorter.
fn char_prefix(s: &str, count: usize) -> &str {
    match s.char_indices().nth(count) {
        Some((index, _)) => &s[..index],
        None => s,
    }
}

/// Longest extension of `acc` shared by every entry, grown one character at
/// a time.
fn common_extension(entries: &[String], acc: &str) -> String {
    let Some(first) = entries.first() else {
        return acc.to_string();
    };
    let acc_len = acc.chars().count();
    if acc_len >= first.chars().count() {
        return acc.to_string();
    }

    let next = char_prefix(first, acc_len + 1);
    if entries[1..]
        .iter()
        .any(|entry| char_prefix(entry, acc_len + 1) != next)
    {
        return acc.to_string();
    }
    common_extension(entries, next)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Completer;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn vocab(values: &[&str]) -> Vec<String> {
        args(values)
    }

    fn tree() -> CommandGroup {
        CommandGroup::new("", "root")
            .child(CommandLeaf::new("deploy", "Deploy an app"))
            .child(CommandLeaf::new("destroy", "Destroy an app"))
            .child(
                CommandGroup::new("cloud", "Cloud commands")
                    .child(
                        CommandLeaf::new("push", "Push an image")
                            .positional(
                                ArgGroup::new("<image>")
                                    .completer(Completer::choices(["nginx", "node"])),
                            )
                            .named(
                                "region",
                                ArgGroup::new("<region>")
                                    .completer(Completer::choices(["us-east", "us-west", "eu"])),
                            )
                            .named("tag", ArgGroup::new("<tag>")),
                    )
                    .child(
                        CommandLeaf::new("exec", "Run a process")
                            .positional(
                                ArgGroup::new("[name]")
                                    .optional()
                                    .completer(Completer::choices(["web", "worker"])),
                            )
                            .named("user", ArgGroup::new("<user>"))
                            .double_dash(
                                ArgGroup::new("<cmd>")
                                    .completer(Completer::choices(["bash", "sh"])),
                            ),
                    ),
            )
    }

    #[test]
    fn test_filter_single_match_adds_space() {
        assert_eq!(filter_candidates(vocab(&["deploy", "help"]), "dep"), vec!["loy "]);
    }

    #[test]
    fn test_filter_no_match() {
        assert!(filter_candidates(vocab(&["deploy"]), "x").is_empty());
    }

    #[test]
    fn test_filter_common_extension() {
        assert_eq!(
            filter_candidates(vocab(&["hello", "help", "helicopter"]), "h"),
            vec!["el"]
        );
    }

    #[test]
    fn test_filter_no_common_extension_lists_all() {
        assert_eq!(
            filter_candidates(vocab(&["deploy", "destroy"]), "de"),
            vec!["ploy", "stroy"]
        );
    }

    #[test]
    fn test_filter_exact_match_among_longer() {
        // "us" is itself a candidate, so nothing extends it.
        assert_eq!(
            filter_candidates(vocab(&["us", "us-east"]), "u"),
            vec!["s"]
        );
        assert_eq!(filter_candidates(vocab(&["us", "us-east"]), "us"), vec!["", "-east"]);
    }

    #[test]
    fn test_common_extension_multibyte() {
        assert_eq!(common_extension(&vocab(&["héllo", "hélp"]), ""), "hél");
    }

    #[test]
    fn test_group_children() {
        let root = tree();
        assert_eq!(complete(&root, &[], "dep"), vec!["loy "]);
        assert_eq!(complete(&root, &[], "de"), vec!["ploy", "stroy"]);
        assert_eq!(complete(&root, &[], "cl"), vec!["oud "]);
        assert_eq!(complete(&root, &args(&["cloud"]), ""), vec!["push", "exec"]);
    }

    #[test]
    fn test_group_with_unknown_arg() {
        let root = tree();
        assert!(complete(&root, &args(&["nope"]), "").is_empty());
    }

    #[test]
    fn test_help_anywhere_disables() {
        let root = tree();
        assert!(complete(&root, &args(&["cloud", "--help"]), "").is_empty());
    }

    #[test]
    fn test_required_positional() {
        let root = tree();
        let input = args(&["cloud", "push"]);
        assert_eq!(complete(&root, &input, ""), vec!["n"]);
        assert_eq!(complete(&root, &input, "ng"), vec!["inx "]);
    }

    #[test]
    fn test_flag_vocabulary() {
        let root = tree();
        let input = args(&["cloud", "push"]);
        assert_eq!(complete(&root, &input, "--"), vec!["region", "tag", "help"]);
        assert_eq!(complete(&root, &input, "--r"), vec!["egion "]);
        assert_eq!(complete(&root, &input, "-"), vec!["-"]);
    }

    #[test]
    fn test_named_group_values() {
        let root = tree();
        let input = args(&["cloud", "push", "nginx", "--region"]);
        assert_eq!(complete(&root, &input, ""), vec!["us-east", "us-west", "eu"]);
        assert_eq!(complete(&root, &input, "us-"), vec!["east", "west"]);
        assert_eq!(complete(&root, &input, "e"), vec!["u "]);
    }

    #[test]
    fn test_named_group_without_completer() {
        let root = tree();
        let input = args(&["cloud", "push", "nginx", "--tag"]);
        assert!(complete(&root, &input, "").is_empty());
    }

    #[test]
    fn test_after_plain_value_nothing() {
        let root = tree();
        let input = args(&["cloud", "push", "nginx"]);
        assert!(complete(&root, &input, "").is_empty());
    }

    #[test]
    fn test_optional_positional_merges_flags() {
        let root = tree();
        let input = args(&["cloud", "exec"]);
        assert_eq!(
            complete(&root, &input, ""),
            vec!["--", "--user", "--help", "w"]
        );
        assert_eq!(complete(&root, &input, "wo"), vec!["rker "]);
    }

    #[test]
    fn test_double_dash_offered_for_dash() {
        let root = tree();
        let input = args(&["cloud", "exec"]);
        assert_eq!(complete(&root, &input, "--"), vec!["", "user", "help"]);
    }

    #[test]
    fn test_double_dash_completer() {
        let root = tree();
        let input = args(&["cloud", "exec", "web", "--"]);
        assert_eq!(complete(&root, &input, "ba"), vec!["sh "]);
    }

    #[test]
    fn test_after_double_dash_free_form() {
        let root = tree();
        let input = args(&["cloud", "exec", "--", "bash"]);
        assert!(complete(&root, &input, "").is_empty());
    }

    #[test]
    fn test_leaf_without_positional() {
        let root = tree();
        assert_eq!(complete(&root, &args(&["deploy"]), ""), vec!["--help"]);
    }

    #[test]
    fn test_completion_from_candidates() {
        assert_eq!(Completion::from_candidates(vec![]), Completion::None);
        assert_eq!(
            Completion::from_candidates(vocab(&["loy "])),
            Completion::Insert("loy ".to_string())
        );
        assert_eq!(
            Completion::from_candidates(vocab(&["a", "b"])),
            Completion::List(vocab(&["a", "b"]))
        );
    }
}
