//! Line parsing entry point.

use std::sync::Arc;

use command_parser_core::{CommandSet, tokenize};
use tracing::{debug, trace};

use crate::config::ParserConfig;
use crate::error::{Diagnostics, ParseError};
use crate::options::OptionParser;
use crate::resolve::CommandResolver;
use crate::result::ParseResult;

/// Parses raw lines against a registered command tree.
///
/// The tree is shared and never mutated by parsing, so one parser can serve
/// many threads; every call to [`parse`](Self::parse) builds fresh
/// [`BoundOption`](command_parser_core::BoundOption)s.
///
/// # Examples
///
/// ```
/// use command_parser::{CommandParser, ParserConfig};
/// use command_parser_core::{CommandNode, CommandSet, OptionSchema, Value};
///
/// let commands: CommandSet = [CommandNode::new("greet")
///     .with_option(OptionSchema::argument("name").with_words(1, 1).required())
///     .with_option(OptionSchema::flag("loud").with_short_name("l"))]
/// .into_iter()
/// .collect();
///
/// let parser = CommandParser::new(commands, ParserConfig::default().with_command_prefix("!"));
///
/// let result = parser.parse("!greet Alice -l").unwrap();
/// assert_eq!(result.name(), "greet");
/// assert!(result.has_flag("loud"));
/// assert_eq!(result.argument_value("name"), Some(Value::from("Alice")));
///
/// // not a command: empty result, no error
/// assert!(!parser.parse("hello there").unwrap().is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct CommandParser {
    commands: Arc<CommandSet>,
    config: ParserConfig,
}

impl CommandParser {
    pub fn new(commands: impl Into<Arc<CommandSet>>, config: ParserConfig) -> Self {
        Self {
            commands: commands.into(),
            config,
        }
    }

    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses one raw line.
    ///
    /// Lines that are empty or lack the command prefix are not commands and
    /// produce an empty, invalid result.
    ///
    /// # Errors
    ///
    /// In [`ErrorMode::Strict`](crate::ErrorMode::Strict), returns the first
    /// [`ParseError`]. In permissive mode this never fails; failures are
    /// listed in [`ParseResult::errors`].
    pub fn parse(&self, line: &str) -> Result<ParseResult, ParseError> {
        let mut result = ParseResult::new(line, &self.config);
        let mut diagnostics = Diagnostics::new(self.config.error_mode);

        if line.starts_with(char::is_whitespace) {
            diagnostics.report(ParseError::InvalidLineFormat)?;
            result.errors = diagnostics.into_errors();
            return Ok(result);
        }

        if !self.config.has_command_prefix(line) {
            trace!(line, "not a command");
            return Ok(result);
        }

        let mut tokens = tokenize(line);
        trace!(?tokens, "tokenized line");

        let path =
            CommandResolver::new(&self.config).resolve(&mut tokens, &self.commands, &mut diagnostics)?;
        let resolved_cleanly = diagnostics.errors().is_empty();
        if let Some(command) = path.last().filter(|_| resolved_cleanly) {
            result.options =
                OptionParser::new(&self.config).parse(tokens, &command.options, &mut diagnostics)?;
        }

        debug!(
            command = %path,
            options = result.options.len(),
            errors = diagnostics.errors().len(),
            "parsed line"
        );
        result.path = path;
        result.errors = diagnostics.into_errors();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use command_parser_core::{CommandNode, DataType, OptionSchema, Value};

    use super::*;
    use crate::config::ErrorMode;

    fn commands() -> CommandSet {
        [
            CommandNode::new("user")
                .with_subcommand(
                    CommandNode::new("add")
                        .with_handler("user.add")
                        .with_option(OptionSchema::argument("name").with_words(1, 1).required())
                        .with_option(
                            OptionSchema::flag("age")
                                .with_words(1, 1)
                                .with_data_type(DataType::Integer),
                        ),
                )
                .with_subcommand(CommandNode::new("list").with_handler("user.list")),
            CommandNode::new("ping").with_handler("ping"),
        ]
        .into_iter()
        .collect()
    }

    fn parser(config: ParserConfig) -> CommandParser {
        CommandParser::new(commands(), config)
    }

    #[test]
    fn test_parse_nested_command() {
        let parser = parser(ParserConfig::default().with_command_prefix("!"));
        let result = parser.parse("!user add bob --age 42").unwrap();
        assert!(result.is_valid());
        assert_eq!(result.name(), "user");
        assert_eq!(result.path().names(), vec!["user", "add"]);
        assert_eq!(result.handler(), Some("user.add"));
        assert_eq!(result.flag_value("age"), Some(Value::Integer(42)));
        assert_eq!(result.argument_value("name"), Some(Value::from("bob")));
    }

    #[test]
    fn test_non_commands_are_empty_results() {
        let parser = parser(ParserConfig::default().with_command_prefix("!"));
        for line in ["", "hello", "!!user list", "!"] {
            let result = parser.parse(line).unwrap();
            assert!(!result.is_valid(), "{line:?} should not be a command");
            assert_eq!(result.name(), "");
            assert!(result.errors().is_empty());
        }
    }

    #[test]
    fn test_leading_whitespace() {
        let strict = parser(ParserConfig::default());
        assert_eq!(
            strict.parse(" ping").unwrap_err(),
            ParseError::InvalidLineFormat
        );

        let permissive = parser(ParserConfig::default().with_error_mode(ErrorMode::Permissive));
        let result = permissive.parse("\tping").unwrap();
        assert!(!result.is_valid());
        assert_eq!(result.errors(), [ParseError::InvalidLineFormat]);
    }

    #[test]
    fn test_permissive_collects_and_continues() {
        let parser = parser(ParserConfig::default().with_error_mode(ErrorMode::Permissive));
        let result = parser.parse("user add bob extra --age").unwrap();
        assert_eq!(result.path().names(), vec!["user", "add"]);
        assert!(!result.has_flag("age"));
        assert_eq!(result.argument_value("name"), Some(Value::from("bob")));
        assert_eq!(result.errors().len(), 2);
    }

    #[test]
    fn test_display_canonical_form() {
        let parser = parser(ParserConfig::default().with_command_prefix("!"));
        let result = parser.parse("!USER add --age 30 \"bob smith\"").unwrap();
        assert_eq!(result.to_string(), "!user add \"bob smith\" --age 30");

        let spaced = CommandParser::new(
            [CommandNode::new("say")
                .with_option(OptionSchema::argument("text").with_words(1, 10))
                .with_option(OptionSchema::flag("to").with_words(1, 1))]
            .into_iter()
            .collect::<CommandSet>(),
            ParserConfig::default().with_command_prefix("!"),
        );
        let result = spaced.parse("!SAY --to \"bob smith\" hi there").unwrap();
        assert_eq!(result.to_string(), "!say hi there --to \"bob smith\"");
        assert_eq!(parser.parse("hi").unwrap().to_string(), "");
    }

    #[test]
    fn test_shared_parser_across_threads() {
        let parser = Arc::new(parser(ParserConfig::default()));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let parser = Arc::clone(&parser);
                std::thread::spawn(move || {
                    let line = format!("user add user{i} --age {i}");
                    let result = parser.parse(&line).unwrap();
                    (
                        result.argument_value("name"),
                        result.flag_value("age"),
                    )
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let (name, age) = handle.join().unwrap();
            assert_eq!(name, Some(Value::from(format!("user{i}"))));
            assert_eq!(age, Some(Value::Integer(i as i64)));
        }
    }
}
