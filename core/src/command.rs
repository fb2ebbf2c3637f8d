//! Command nodes, keyed command collections, and resolved command paths.
//!
//! Nodes are shared through [`Arc`] so resolving a path never deep-copies the
//! registered tree; a [`CommandPath`] only holds handles to registered nodes.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::option::OptionSchema;

/// A registered command with its declared options and subcommands.
///
/// Flags and positional arguments live in one ordered `options` list and are
/// told apart by [`OptionKind`](crate::OptionKind). Argument order is the
/// declaration order used when distributing positional tokens.
///
/// # Examples
///
/// ```
/// use command_parser_core::{CommandNode, OptionSchema};
///
/// let user = CommandNode::new("user")
///     .with_alias("u")
///     .with_subcommand(
///         CommandNode::new("add")
///             .with_option(OptionSchema::argument("name").with_words(1, 1).required())
///             .with_option(OptionSchema::flag("admin")),
///     );
///
/// let add = user.subcommands.get("add").unwrap();
/// assert_eq!(add.arguments().count(), 1);
/// assert_eq!(add.flags().count(), 1);
/// assert!(user.matches("U", false));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Arc<OptionSchema>>,
    /// Opaque key of the callback the caller runs for this command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(default, skip_serializing_if = "CommandSet::is_empty")]
    pub subcommands: CommandSet,
}

impl CommandNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_option(mut self, option: OptionSchema) -> Self {
        self.options.push(Arc::new(option));
        self
    }

    pub fn with_handler(mut self, handler: &str) -> Self {
        self.handler = Some(handler.to_string());
        self
    }

    pub fn with_subcommand(mut self, sub: CommandNode) -> Self {
        self.subcommands.insert(sub);
        self
    }

    /// Declared flags, in declaration order.
    pub fn flags(&self) -> impl Iterator<Item = &Arc<OptionSchema>> {
        self.options.iter().filter(|o| o.is_flag())
    }

    /// Declared positional arguments, in declaration order.
    pub fn arguments(&self) -> impl Iterator<Item = &Arc<OptionSchema>> {
        self.options.iter().filter(|o| o.is_argument())
    }

    /// Finds a declared option by full or short name.
    pub fn find_option(&self, name: &str) -> Option<&Arc<OptionSchema>> {
        self.options
            .iter()
            .find(|o| o.name == name || (!o.short_name.is_empty() && o.short_name == name))
    }

    /// Returns `true` for a node that only groups subcommands and cannot be
    /// invoked on its own.
    pub fn is_group(&self) -> bool {
        !self.subcommands.is_empty() && self.options.is_empty()
    }

    /// Returns `true` if `word` is this command's name or one of its aliases.
    pub fn matches(&self, word: &str, case_sensitive: bool) -> bool {
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .any(|candidate| {
                if case_sensitive {
                    candidate == word
                } else {
                    candidate.to_lowercase() == word.to_lowercase()
                }
            })
    }
}

impl fmt::Display for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Commands at one level of the tree, keyed by name.
///
/// Keeps insertion order; inserting a command whose name is already present
/// replaces the earlier entry. Deserialized sets keep every entry as written
/// so that [`validate_commands`](crate::validate_commands) can report
/// duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandSet {
    nodes: Vec<Arc<CommandNode>>,
}

impl CommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `command`, replacing any entry with the same name.
    pub fn insert(&mut self, command: CommandNode) {
        self.insert_shared(Arc::new(command));
    }

    pub fn insert_shared(&mut self, command: Arc<CommandNode>) {
        match self.nodes.iter_mut().find(|n| n.name == command.name) {
            Some(slot) => *slot = command,
            None => self.nodes.push(command),
        }
    }

    /// Looks up a command by exact name.
    pub fn get(&self, name: &str) -> Option<&Arc<CommandNode>> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Finds the first command whose name or alias matches `word`.
    pub fn find(&self, word: &str, case_sensitive: bool) -> Option<&Arc<CommandNode>> {
        self.nodes.iter().find(|n| n.matches(word, case_sensitive))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CommandNode>> {
        self.nodes.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }
}

impl FromIterator<CommandNode> for CommandSet {
    fn from_iter<I: IntoIterator<Item = CommandNode>>(iter: I) -> Self {
        let mut set = Self::new();
        for command in iter {
            set.insert(command);
        }
        set
    }
}

/// Keeps every entry as given, duplicates included, like deserialization.
impl From<Vec<CommandNode>> for CommandSet {
    fn from(nodes: Vec<CommandNode>) -> Self {
        Self {
            nodes: nodes.into_iter().map(Arc::new).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CommandSet {
    type Item = &'a Arc<CommandNode>;
    type IntoIter = std::slice::Iter<'a, Arc<CommandNode>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// The ordered chain of commands resolved for one parse, from the root
/// command to the deepest matched subcommand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandPath {
    commands: Vec<Arc<CommandNode>>,
}

impl CommandPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root command.
    pub fn first(&self) -> Option<&Arc<CommandNode>> {
        self.commands.first()
    }

    /// The deepest command; its options are the ones parsed.
    pub fn last(&self) -> Option<&Arc<CommandNode>> {
        self.commands.last()
    }

    /// Number of resolved levels.
    pub fn levels(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: Arc<CommandNode>) {
        self.commands.push(command);
    }

    pub fn pop(&mut self) -> Option<Arc<CommandNode>> {
        self.commands.pop()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CommandNode>> {
        self.commands.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name.as_str()).collect()
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CommandSet {
        [
            CommandNode::new("user")
                .with_alias("u")
                .with_subcommand(CommandNode::new("add"))
                .with_subcommand(CommandNode::new("remove").with_alias("rm")),
            CommandNode::new("ping"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_find_by_name_or_alias() {
        let set = sample();
        assert_eq!(set.find("u", true).unwrap().name, "user");
        assert_eq!(set.find("PING", false).unwrap().name, "ping");
        assert!(set.find("PING", true).is_none());

        let user = set.get("user").unwrap();
        assert_eq!(user.subcommands.find("rm", true).unwrap().name, "remove");
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut set = sample();
        set.insert(CommandNode::new("ping").with_description("pong"));
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.get("ping").unwrap().description.as_deref(),
            Some("pong")
        );
        assert_eq!(set.names(), vec!["user", "ping"]);
    }

    #[test]
    fn test_from_vec_keeps_duplicates() {
        let set = CommandSet::from(vec![CommandNode::new("a"), CommandNode::new("a")]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_group_detection() {
        let set = sample();
        assert!(set.get("user").unwrap().is_group());
        assert!(!set.get("ping").unwrap().is_group());
    }

    #[test]
    fn test_path_accessors() {
        let set = sample();
        let user = Arc::clone(set.get("user").unwrap());
        let add = Arc::clone(user.subcommands.get("add").unwrap());

        let mut path = CommandPath::new();
        assert!(path.first().is_none());
        path.push(user);
        path.push(add);

        assert_eq!(path.levels(), 2);
        assert_eq!(path.first().unwrap().name, "user");
        assert_eq!(path.last().unwrap().name, "add");
        assert_eq!(path.to_string(), "user add");
    }

    #[test]
    fn test_command_set_serde_round_trip() {
        let json = serde_json::to_string(&sample()).unwrap();
        let back: CommandSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }
}
