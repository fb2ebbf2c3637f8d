//! Command registry loading with builder pattern and fallback chains.
//!
//! Provides [`CommandRegistry`] for holding a validated command tree with its
//! parser settings, and [`RegistryBuilder`] for loading one from several
//! candidate sources with automatic fallback.
//!
//! # Loading patterns
//!
//! ```no_run
//! use command_parser_registry::CommandRegistry;
//!
//! // Load a single registry file (JSON or YAML)
//! let registry = CommandRegistry::from_file("bot.yaml").unwrap();
//! assert!(registry.get("user").is_some());
//!
//! // Load a directory holding one command per file
//! let registry = CommandRegistry::from_dir("commands/").unwrap();
//!
//! // Use the builder for a fallback chain
//! let registry = CommandRegistry::builder()
//!     .from_file("/etc/bot/registry.yaml")
//!     .from_dir("commands/")
//!     .build()
//!     .unwrap();
//!
//! let parser = registry.into_parser();
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use command_parser::{CommandParser, ParserConfig};
use command_parser_core::{CommandNode, CommandSet, validate_commands};
use tracing::debug;

use crate::config::{FileFormat, RegistryFile, read_file};
use crate::error::{RegistryError, Result};

/// Describes where a [`CommandRegistry`] was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrySource {
    /// Built in code.
    Memory,
    /// Loaded from a single registry file.
    File(PathBuf),
    /// Loaded from a directory holding one command per file.
    Directory(PathBuf),
    /// Loaded via a fallback chain of multiple sources.
    Multiple(Vec<RegistrySource>),
}

/// A validated command tree together with the parser settings it is meant
/// to be parsed with.
///
/// # Examples
///
/// ```
/// use command_parser::ParserConfig;
/// use command_parser_core::{CommandNode, CommandSet};
/// use command_parser_registry::CommandRegistry;
///
/// let commands: CommandSet = [CommandNode::new("ping").with_handler("ping")]
///     .into_iter()
///     .collect();
/// let registry = CommandRegistry::new(commands, ParserConfig::default()).unwrap();
/// assert!(registry.contains("ping"));
///
/// let result = registry.parser().parse("ping").unwrap();
/// assert_eq!(result.handler(), Some("ping"));
/// ```
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Arc<CommandSet>,
    config: ParserConfig,
    source: RegistrySource,
}

impl CommandRegistry {
    /// Returns a new [`RegistryBuilder`] for configuring a fallback chain.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Wraps an in-memory command tree after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Invalid`] if the tree fails validation.
    pub fn new(commands: CommandSet, config: ParserConfig) -> Result<Self> {
        Self::validated(commands, config, RegistrySource::Memory)
    }

    /// Loads a registry file (`.json`, `.yaml` or `.yml`).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnsupportedFormat`] for other extensions,
    /// [`RegistryError::IoError`] if the file cannot be read, a JSON/YAML
    /// error if parsing fails, or [`RegistryError::Invalid`] if the tree
    /// fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = RegistryFile::load(path)?;
        debug!(path = %path.display(), version = %file.version, "loaded registry file");
        Self::validated(
            file.commands,
            file.parser,
            RegistrySource::File(path.to_path_buf()),
        )
    }

    /// Loads a directory where each `.json`/`.yaml`/`.yml` file holds one
    /// root command. Other files are ignored. Parser settings are the
    /// defaults.
    ///
    /// Files are read in file-name order, so the resulting command order is
    /// stable.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::IoError`] if the directory or a file cannot
    /// be read, a JSON/YAML error if a file fails to parse, or
    /// [`RegistryError::Invalid`] if the combined tree fails validation.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if file_path.is_file() && FileFormat::is_supported(&file_path) {
                files.push(file_path);
            }
        }
        files.sort();

        let mut nodes: Vec<CommandNode> = Vec::with_capacity(files.len());
        for file_path in &files {
            nodes.push(read_file(file_path)?);
        }
        debug!(path = %path.display(), commands = nodes.len(), "loaded registry directory");

        Self::validated(
            CommandSet::from(nodes),
            ParserConfig::default(),
            RegistrySource::Directory(path.to_path_buf()),
        )
    }

    fn validated(commands: CommandSet, config: ParserConfig, source: RegistrySource) -> Result<Self> {
        let errors = validate_commands(&commands);
        if !errors.is_empty() {
            return Err(RegistryError::Invalid(errors));
        }
        Ok(Self {
            commands: Arc::new(commands),
            config,
            source,
        })
    }

    /// Looks up a root command by name.
    pub fn get(&self, name: &str) -> Option<&Arc<CommandNode>> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains(name)
    }

    /// Number of root commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Root command names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.commands.names()
    }

    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Replaces the parser settings.
    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns a reference to the source metadata.
    pub fn source(&self) -> &RegistrySource {
        &self.source
    }

    /// A parser sharing this registry's command tree.
    pub fn parser(&self) -> CommandParser {
        CommandParser::new(Arc::clone(&self.commands), self.config.clone())
    }

    pub fn into_parser(self) -> CommandParser {
        CommandParser::new(self.commands, self.config)
    }

    /// The registry as a serializable file.
    pub fn to_file(&self) -> RegistryFile {
        RegistryFile::new(self.config.clone(), CommandSet::clone(&self.commands))
    }
}

/// Builder for constructing a [`CommandRegistry`] with a fallback chain.
///
/// Sources are tried in the order they are added. The first successful load
/// wins; if all fail, [`RegistryError::NoSourcesAvailable`] is returned.
///
/// # Example
///
/// ```no_run
/// use command_parser_registry::CommandRegistry;
///
/// let registry = CommandRegistry::builder()
///     .from_file("/etc/bot/registry.yaml")
///     .from_dir("/usr/share/bot/commands/")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    sources: Vec<RegistrySource>,
}

impl RegistryBuilder {
    /// Creates a new builder with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a registry file as a source.
    pub fn from_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(RegistrySource::File(path.into()));
        self
    }

    /// Adds a directory of per-command files as a source.
    pub fn from_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(RegistrySource::Directory(path.into()));
        self
    }

    /// Attempts to load a registry from configured sources in order.
    ///
    /// Returns the first successfully loaded registry. If all sources fail,
    /// returns [`RegistryError::NoSourcesAvailable`].
    pub fn build(self) -> Result<CommandRegistry> {
        if self.sources.is_empty() {
            return Err(RegistryError::NoSourcesAvailable);
        }

        let all_sources = self.sources.clone();

        for source in &self.sources {
            let result = match source {
                RegistrySource::File(path) => CommandRegistry::from_file(path),
                RegistrySource::Directory(path) => CommandRegistry::from_dir(path),
                RegistrySource::Memory | RegistrySource::Multiple(_) => continue,
            };

            match result {
                Ok(mut registry) => {
                    registry.source = RegistrySource::Multiple(all_sources);
                    return Ok(registry);
                }
                Err(err) => debug!(?source, error = %err, "registry source failed"),
            }
        }

        Err(RegistryError::NoSourcesAvailable)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use command_parser_core::OptionSchema;

    use super::*;

    fn write_command(dir: &Path, file: &str, node: &CommandNode) {
        let path = dir.join(file);
        let mut f = std::fs::File::create(&path).unwrap();
        if file.ends_with(".json") {
            serde_json::to_writer_pretty(&mut f, node).unwrap();
        } else {
            serde_yaml::to_writer(&mut f, node).unwrap();
        }
        f.flush().unwrap();
    }

    fn sample_file() -> RegistryFile {
        RegistryFile::new(
            ParserConfig::default().with_command_prefix("!"),
            [
                CommandNode::new("ping").with_handler("ping"),
                CommandNode::new("echo")
                    .with_handler("echo")
                    .with_option(OptionSchema::argument("text").with_words(1, 50)),
            ]
            .into_iter()
            .collect(),
        )
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.yaml");
        sample_file().save(&path).unwrap();

        let registry = CommandRegistry::from_file(&path).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["ping", "echo"]);
        assert_eq!(registry.config().command_prefix, "!");
        assert_eq!(registry.source(), &RegistrySource::File(path));
    }

    #[test]
    fn test_from_file_rejects_invalid_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"commands": [{"name": "ping"}, {"name": "pong", "aliases": ["ping"]}]}"#,
        )
        .unwrap();

        assert!(matches!(
            CommandRegistry::from_file(&path),
            Err(RegistryError::Invalid(_))
        ));
    }

    #[test]
    fn test_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_command(dir.path(), "b_ping.json", &CommandNode::new("ping"));
        write_command(dir.path(), "a_user.yaml", &CommandNode::new("user"));
        write_command(dir.path(), "c_roll.yml", &CommandNode::new("roll"));
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry = CommandRegistry::from_dir(dir.path()).unwrap();
        assert_eq!(registry.names(), vec!["user", "ping", "roll"]);
        assert_eq!(registry.config(), &ParserConfig::default());
    }

    #[test]
    fn test_from_dir_reports_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        write_command(dir.path(), "a.json", &CommandNode::new("ping"));
        write_command(dir.path(), "b.json", &CommandNode::new("ping"));

        assert!(matches!(
            CommandRegistry::from_dir(dir.path()),
            Err(RegistryError::Invalid(_))
        ));
    }

    #[test]
    fn test_builder_fallback_first_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.json");
        sample_file().save(&path).unwrap();

        let registry = CommandRegistry::builder()
            .from_file("/nonexistent/registry.yaml")
            .from_file(&path)
            .build()
            .unwrap();
        assert!(registry.contains("echo"));
        assert!(matches!(registry.source(), RegistrySource::Multiple(s) if s.len() == 2));
    }

    #[test]
    fn test_builder_all_fail() {
        let result = CommandRegistry::builder()
            .from_dir("/nonexistent/dir/")
            .from_file("/nonexistent/registry.json")
            .build();
        assert!(matches!(result, Err(RegistryError::NoSourcesAvailable)));
        assert!(matches!(
            RegistryBuilder::new().build(),
            Err(RegistryError::NoSourcesAvailable)
        ));
    }

    #[test]
    fn test_parser_uses_registry_config() {
        let registry = CommandRegistry::new(
            sample_file().commands,
            ParserConfig::default().with_command_prefix("!"),
        )
        .unwrap();

        let result = registry.parser().parse("!echo hello world").unwrap();
        assert_eq!(result.handler(), Some("echo"));
        assert!(!registry.parser().parse("echo hi").unwrap().is_valid());
    }
}
