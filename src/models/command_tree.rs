//! Hierarchical command namespace used for dispatch and completion.
//!
//! A tree is made of [`CommandGroup`]s (named containers) and
//! [`CommandLeaf`]s (runnable commands). Leaves describe their arguments
//! through [`ArgGroup`]s:
//!
//! - named groups, introduced by `--<flag>`
//! - one optional positional group, for arguments before any flag
//! - one optional double-dash group, capturing everything after `--`

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

// ============================================================================
// Completer
// ============================================================================

/// Dynamic completion callback: `(args already given, search prefix) -> vocabulary`.
pub type CompleteFn = dyn Fn(&[String], &str) -> Vec<String>;

/// Source of completion vocabulary for an argument group.
///
/// The completer only returns raw vocabulary; prefix filtering and
/// common-prefix extension are applied by the completion engine.
#[derive(Clone, Default)]
pub enum Completer {
    #[default]
    None,
    /// Fixed set of values.
    Choices(Vec<String>),
    Dynamic(Rc<CompleteFn>),
}

impl Completer {
    pub fn choices<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choices(values.into_iter().map(Into::into).collect())
    }

    pub fn dynamic(f: impl Fn(&[String], &str) -> Vec<String> + 'static) -> Self {
        Self::Dynamic(Rc::new(f))
    }

    pub fn suggest(&self, args: &[String], search: &str) -> Vec<String> {
        match self {
            Self::None => Vec::new(),
            Self::Choices(values) => values.clone(),
            Self::Dynamic(f) => f(args, search),
        }
    }
}

impl fmt::Debug for Completer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Choices(values) => f.debug_tuple("Choices").field(values).finish(),
            Self::Dynamic(_) => write!(f, "Dynamic(..)"),
        }
    }
}

// ============================================================================
// Argument Groups
// ============================================================================

/// A group of argument values belonging to a leaf.
#[derive(Clone, Debug, Default)]
pub struct ArgGroup {
    pub description: Option<String>,
    /// Shown in usage text, e.g. `<target>`.
    pub placeholder: String,
    pub optional: bool,
    pub completer: Completer,
}

impl ArgGroup {
    /// A required group with the given usage placeholder.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            ..Self::default()
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn completer(mut self, completer: Completer) -> Self {
        self.completer = completer;
        self
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// A runnable command.
#[derive(Clone, Debug, Default)]
pub struct CommandLeaf {
    pub name: String,
    pub description: String,
    pub aliases: Vec<String>,
    /// Hidden leaves are neither navigable nor offered for completion.
    pub hidden: bool,
    pub named: BTreeMap<String, ArgGroup>,
    pub positional: Option<ArgGroup>,
    pub double_dash: Option<ArgGroup>,
}

impl CommandLeaf {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Add a `--<flag>` argument group.
    pub fn named(mut self, flag: impl Into<String>, group: ArgGroup) -> Self {
        self.named.insert(flag.into(), group);
        self
    }

    pub fn positional(mut self, group: ArgGroup) -> Self {
        self.positional = Some(group);
        self
    }

    pub fn double_dash(mut self, group: ArgGroup) -> Self {
        self.double_dash = Some(group);
        self
    }

    /// Flag vocabulary: `--<flag>` for every named group, then `--help`.
    pub fn flags(&self) -> Vec<String> {
        self.named
            .keys()
            .map(|flag| format!("--{}", flag))
            .chain(std::iter::once("--help".to_string()))
            .collect()
    }

    fn answers_to(&self, token: &str) -> bool {
        !self.hidden && (self.name == token || self.aliases.iter().any(|a| a == token))
    }
}

/// A named container of child nodes.
#[derive(Clone, Debug, Default)]
pub struct CommandGroup {
    pub name: String,
    pub description: String,
    pub children: Vec<CommandNode>,
}

impl CommandGroup {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            children: Vec::new(),
        }
    }

    pub fn child(mut self, node: impl Into<CommandNode>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Find the visible child answering to `token` (by name, or alias for leaves).
    pub fn find_child(&self, token: &str) -> Option<&CommandNode> {
        self.children.iter().find(|child| match child {
            CommandNode::Group(group) => group.name == token,
            CommandNode::Leaf(leaf) => leaf.answers_to(token),
        })
    }

    /// Names of the children offered for completion, in declaration order.
    pub fn visible_names(&self) -> Vec<String> {
        self.visible_children()
            .map(|child| child.name().to_string())
            .collect()
    }

    pub fn visible_children(&self) -> impl Iterator<Item = &CommandNode> {
        self.children.iter().filter(|child| !child.is_hidden())
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children.iter().any(|child| child.name() == name)
    }

    /// Whether any child, hidden or not, already uses `token` as its name or
    /// one of its aliases.
    pub fn is_taken(&self, token: &str) -> bool {
        self.children.iter().any(|child| match child {
            CommandNode::Group(group) => group.name == token,
            CommandNode::Leaf(leaf) => {
                leaf.name == token || leaf.aliases.iter().any(|a| a == token)
            }
        })
    }
}

/// Either variant of a tree node.
#[derive(Clone, Debug)]
pub enum CommandNode {
    Group(CommandGroup),
    Leaf(CommandLeaf),
}

impl CommandNode {
    pub fn name(&self) -> &str {
        match self {
            Self::Group(group) => &group.name,
            Self::Leaf(leaf) => &leaf.name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Group(group) => &group.description,
            Self::Leaf(leaf) => &leaf.description,
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Leaf(leaf) if leaf.hidden)
    }

    pub fn as_node_ref(&self) -> NodeRef<'_> {
        match self {
            Self::Group(group) => NodeRef::Group(group),
            Self::Leaf(leaf) => NodeRef::Leaf(leaf),
        }
    }
}

impl From<CommandGroup> for CommandNode {
    fn from(group: CommandGroup) -> Self {
        Self::Group(group)
    }
}

impl From<CommandLeaf> for CommandNode {
    fn from(leaf: CommandLeaf) -> Self {
        Self::Leaf(leaf)
    }
}

/// Borrowed view of a node; lets the root group share navigation code with
/// the nodes below it.
#[derive(Clone, Copy, Debug)]
pub enum NodeRef<'t> {
    Group(&'t CommandGroup),
    Leaf(&'t CommandLeaf),
}

// ============================================================================
// Navigation
// ============================================================================

/// Where a walk over the tree ended.
#[derive(Clone, Debug)]
pub struct Navigation<'t, 'a> {
    /// The node the walk landed on.
    pub node: NodeRef<'t>,
    /// Names of the nodes descended through, root excluded.
    pub path: Vec<&'t str>,
    /// Arguments left unconsumed. For a leaf these are its own arguments.
    pub args: &'a [String],
}

impl Navigation<'_, '_> {
    /// Space-joined path, e.g. `"cloud deploy"`.
    pub fn command_name(&self) -> String {
        self.path.join(" ")
    }
}

/// Walk `root`, consuming `args` while they name child groups or leaves.
///
/// Stops as soon as a leaf is reached, arguments run out, or the next
/// argument names no child of the current group.
pub fn navigate<'t, 'a>(root: &'t CommandGroup, args: &'a [String]) -> Navigation<'t, 'a> {
    let mut node = NodeRef::Group(root);
    let mut path = Vec::new();
    let mut rest = args;

    while let NodeRef::Group(group) = node {
        let Some((first, tail)) = rest.split_first() else {
            break;
        };
        let Some(child) = group.find_child(first) else {
            break;
        };
        path.push(child.name());
        node = child.as_node_ref();
        rest = tail;
    }

    Navigation {
        node,
        path,
        args: rest,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn tree() -> CommandGroup {
        CommandGroup::new("", "root")
            .child(
                CommandGroup::new("cloud", "Cloud commands")
                    .child(CommandLeaf::new("deploy", "Deploy").alias("up"))
                    .child(CommandLeaf::new("destroy", "Destroy")),
            )
            .child(CommandLeaf::new("echo", "Print args"))
            .child(CommandLeaf::new("debug", "Internal").hidden())
    }

    #[test]
    fn test_is_taken_covers_aliases_and_hidden() {
        let root = tree();
        let cloud = match root.find_child("cloud") {
            Some(CommandNode::Group(group)) => group,
            _ => panic!("cloud should be a group"),
        };
        assert!(cloud.is_taken("up"));
        assert!(!cloud.has_child("up"));
        assert!(root.is_taken("debug"));
        assert!(root.find_child("debug").is_none());
        assert!(!root.is_taken("missing"));
    }

    #[test]
    fn test_navigate_empty_args_stays_at_root() {
        let root = tree();
        let nav = navigate(&root, &[]);
        assert!(matches!(nav.node, NodeRef::Group(g) if g.description == "root"));
        assert!(nav.path.is_empty());
        assert!(nav.args.is_empty());
    }

    #[test]
    fn test_navigate_into_leaf_keeps_leftover_args() {
        let root = tree();
        let input = args(&["cloud", "deploy", "web", "--force"]);
        let nav = navigate(&root, &input);
        assert!(matches!(nav.node, NodeRef::Leaf(l) if l.name == "deploy"));
        assert_eq!(nav.command_name(), "cloud deploy");
        assert_eq!(nav.args, &input[2..]);
    }

    #[test]
    fn test_navigate_by_alias() {
        let root = tree();
        let input = args(&["cloud", "up"]);
        let nav = navigate(&root, &input);
        assert!(matches!(nav.node, NodeRef::Leaf(l) if l.name == "deploy"));
        assert_eq!(nav.path, vec!["cloud", "deploy"]);
    }

    #[test]
    fn test_navigate_unknown_child_leaves_args() {
        let root = tree();
        let input = args(&["cloud", "nope"]);
        let nav = navigate(&root, &input);
        assert!(matches!(nav.node, NodeRef::Group(g) if g.name == "cloud"));
        assert_eq!(nav.args, &input[1..]);
    }

    #[test]
    fn test_hidden_leaf_not_navigable() {
        let root = tree();
        let input = args(&["debug"]);
        let nav = navigate(&root, &input);
        assert!(matches!(nav.node, NodeRef::Group(_)));
        assert_eq!(nav.args.len(), 1);
        assert_eq!(root.visible_names(), vec!["cloud", "echo"]);
    }

    #[test]
    fn test_flags_vocabulary() {
        let leaf = CommandLeaf::new("deploy", "Deploy")
            .named("region", ArgGroup::new("<region>"))
            .named("env", ArgGroup::new("<env>"));
        assert_eq!(leaf.flags(), vec!["--env", "--region", "--help"]);
    }

    #[test]
    fn test_completer_suggest() {
        let fixed = Completer::choices(["a", "b"]);
        assert_eq!(fixed.suggest(&[], ""), vec!["a", "b"]);

        let dynamic = Completer::dynamic(|_, search| vec![format!("{}x", search)]);
        assert_eq!(dynamic.suggest(&[], "q"), vec!["qx"]);

        assert!(Completer::None.suggest(&[], "").is_empty());
    }
}
