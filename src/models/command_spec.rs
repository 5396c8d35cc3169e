//! JSON command descriptions loaded at runtime.
//!
//! Plugin loaders describe the commands they provide as JSON:
//!
//! ```json
//! {
//!   "name": "greet",
//!   "description": "Say hello",
//!   "aliases": ["hi"],
//!   "args": [{ "name": "who", "optional": true, "choices": ["world", "team"] }]
//! }
//! ```
//!
//! A description becomes a [`CommandLeaf`] whose positional group covers the
//! declared args.

use serde::Deserialize;

use super::command_tree::{ArgGroup, CommandLeaf, Completer};
use crate::core::error::SpecError;

/// One positional argument of a described command.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArgSpec {
    pub name: String,
    pub description: String,
    pub optional: bool,
    pub variadic: bool,
    /// Values offered by tab completion.
    pub choices: Vec<String>,
}

impl ArgSpec {
    fn placeholder(&self) -> String {
        let name = if self.variadic {
            format!("{}...", self.name)
        } else {
            self.name.clone()
        };
        if self.optional || self.variadic {
            format!("[{}]", name)
        } else {
            format!("<{}>", name)
        }
    }
}

/// A command described by an external payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,
    /// One-line summary; preferred over `description` in listings.
    pub summary: String,
    pub hidden: bool,
    pub aliases: Vec<String>,
    pub args: Vec<ArgSpec>,
}

impl CommandSpec {
    /// Parse and validate a JSON description.
    pub fn from_json(payload: &str) -> Result<Self, SpecError> {
        let spec: Self = serde_json::from_str(payload)?;
        spec.validate()?;
        Ok(spec)
    }

    fn validate(&self) -> Result<(), SpecError> {
        if self.name.is_empty() {
            return Err(SpecError::EmptyName);
        }
        let names = std::iter::once(&self.name).chain(&self.aliases);
        for name in names {
            let bad_char = name
                .chars()
                .any(|c| c.is_whitespace() || c == '"' || c == '\'');
            if name.starts_with('-') || bad_char {
                return Err(SpecError::InvalidName(name.clone()));
            }
        }
        Ok(())
    }

    /// Convert into a leaf of the command tree.
    pub fn into_leaf(self) -> CommandLeaf {
        let description = if self.summary.is_empty() {
            self.description
        } else {
            self.summary
        };

        let mut leaf = CommandLeaf::new(self.name, description);
        leaf.aliases = self.aliases;
        leaf.hidden = self.hidden;

        if !self.args.is_empty() {
            let optional = self.args.iter().all(|a| a.optional || a.variadic);
            let placeholder = self
                .args
                .iter()
                .map(ArgSpec::placeholder)
                .collect::<Vec<_>>()
                .join(" ");
            let choices: Vec<String> = self.args.iter().flat_map(|a| a.choices.clone()).collect();

            let mut group = ArgGroup::new(placeholder);
            group.optional = optional;
            if !choices.is_empty() {
                group.completer = Completer::Choices(choices);
            }
            leaf.positional = Some(group);
        }

        leaf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_payload() {
        let spec = CommandSpec::from_json(
            r#"{
                "name": "greet",
                "description": "Say hello to someone",
                "summary": "Say hello",
                "hidden": false,
                "aliases": ["hi"],
                "args": [{"name": "who", "description": "", "optional": true, "variadic": false}]
            }"#,
        )
        .unwrap();
        assert_eq!(spec.name, "greet");
        assert_eq!(spec.aliases, vec!["hi"]);
        assert_eq!(spec.args.len(), 1);
        assert!(spec.args[0].optional);
    }

    #[test]
    fn test_missing_fields_default() {
        let spec = CommandSpec::from_json(r#"{"name": "ping"}"#).unwrap();
        assert!(spec.args.is_empty());
        assert!(!spec.hidden);
    }

    #[test]
    fn test_malformed_json() {
        let err = CommandSpec::from_json("{name: ping").unwrap_err();
        assert!(matches!(err, SpecError::Json(_)));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = CommandSpec::from_json(r#"{"description": "nameless"}"#).unwrap_err();
        assert!(matches!(err, SpecError::EmptyName));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let err = CommandSpec::from_json(r#"{"name": "two words"}"#).unwrap_err();
        assert!(matches!(err, SpecError::InvalidName(name) if name == "two words"));

        let err = CommandSpec::from_json(r#"{"name": "ok", "aliases": ["--bad"]}"#).unwrap_err();
        assert!(matches!(err, SpecError::InvalidName(name) if name == "--bad"));
    }

    #[test]
    fn test_into_leaf_required_args() {
        let leaf = CommandSpec::from_json(
            r#"{"name": "cp", "args": [{"name": "src"}, {"name": "dst"}]}"#,
        )
        .unwrap()
        .into_leaf();
        let positional = leaf.positional.unwrap();
        assert!(!positional.optional);
        assert_eq!(positional.placeholder, "<src> <dst>");
    }

    #[test]
    fn test_into_leaf_optional_and_choices() {
        let leaf = CommandSpec::from_json(
            r#"{"name": "greet", "summary": "Say hi",
                "args": [{"name": "who", "variadic": true, "choices": ["world", "team"]}]}"#,
        )
        .unwrap()
        .into_leaf();
        assert_eq!(leaf.description, "Say hi");
        let positional = leaf.positional.unwrap();
        assert!(positional.optional);
        assert_eq!(positional.placeholder, "[who...]");
        assert_eq!(positional.completer.suggest(&[], ""), vec!["world", "team"]);
    }

    #[test]
    fn test_into_leaf_without_args() {
        let leaf = CommandSpec::from_json(r#"{"name": "ping", "hidden": true}"#)
            .unwrap()
            .into_leaf();
        assert!(leaf.positional.is_none());
        assert!(leaf.hidden);
    }
}
