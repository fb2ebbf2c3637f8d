//! Registration-time validation of command trees.
//!
//! Catches structural defects such as empty names, colliding command names or
//! aliases, duplicate option names, and inverted length bounds before a tree
//! is handed to the parser.
//!
//! # Examples
//!
//! ```
//! use command_parser_core::*;
//!
//! let commands: CommandSet = [CommandNode::new("ping")].into_iter().collect();
//! assert!(validate_commands(&commands).is_empty());
//!
//! // Invalid: alias collides with another command's name
//! let bad: CommandSet = [
//!     CommandNode::new("ping"),
//!     CommandNode::new("pong").with_alias("ping"),
//! ]
//! .into_iter()
//! .collect();
//! assert!(!validate_commands(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{CommandNode, CommandSet, OptionKind, OptionSchema};

/// Command tree validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// Two commands in one scope share a name or alias.
    #[error("duplicate command name or alias in scope: {0}")]
    DuplicateCommand(String),
    /// An option has neither a full nor a short name.
    #[error("option of command `{0}` must define a name or short name")]
    EmptyOptionName(String),
    /// Two options of one command share a name.
    #[error("duplicate option in command `{command}`: {option}")]
    DuplicateOption { command: String, option: String },
    /// `max_length` is below `min_length`.
    #[error("option `{0}` has max_length below min_length")]
    InvalidLengthBounds(String),
    /// A choice cannot be represented in the option's data type.
    #[error("option `{option}` has choice `{choice}` that does not fit its data type")]
    InvalidChoice { option: String, choice: String },
}

/// Validates every command in `commands` and their subcommands.
///
/// Collects every defect instead of stopping at the first one. Names and
/// aliases are compared case-insensitively, since that is how the parser
/// matches them by default.
pub fn validate_commands(commands: &CommandSet) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for command in commands {
        let name = command.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::EmptyCommandName);
        }

        let words = std::iter::once(name)
            .chain(command.aliases.iter().map(|a| a.trim()))
            .filter(|w| !w.is_empty());
        for word in words {
            if !seen.insert(word.to_lowercase()) {
                errors.push(ValidationError::DuplicateCommand(word.to_string()));
            }
        }

        errors.extend(validate_command(command));
    }

    errors
}

/// Validates a single command's options, then its subcommands.
pub fn validate_command(command: &CommandNode) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<(OptionKind, &str)> = HashSet::new();
    let mut seen_short: HashSet<&str> = HashSet::new();

    for option in &command.options {
        if option.name.trim().is_empty() && option.short_name.trim().is_empty() {
            errors.push(ValidationError::EmptyOptionName(command.name.clone()));
        }

        let names = std::iter::once(option.name.as_str())
            .chain(option.aliases.iter().map(String::as_str))
            .filter(|n| !n.is_empty());
        for name in names {
            if !seen.insert((option.kind, name)) {
                errors.push(duplicate(command, name));
            }
        }

        if option.is_flag() {
            let shorts = std::iter::once(option.short_name.as_str())
                .chain(option.short_aliases.iter().map(String::as_str))
                .filter(|n| !n.is_empty());
            for short in shorts {
                if !seen_short.insert(short) {
                    errors.push(duplicate(command, short));
                }
            }
        }

        errors.extend(validate_option(option));
    }

    errors.extend(validate_commands(&command.subcommands));
    errors
}

fn validate_option(option: &OptionSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if option.max_length.is_some_and(|max| max < option.min_length) {
        errors.push(ValidationError::InvalidLengthBounds(
            option.display_name().to_string(),
        ));
    }

    errors.extend(
        option
            .choices
            .iter()
            .filter(|choice| !choice.fits(option.data_type))
            .map(|choice| ValidationError::InvalidChoice {
                option: option.display_name().to_string(),
                choice: choice.to_string(),
            }),
    );

    errors
}

fn duplicate(command: &CommandNode, option: &str) -> ValidationError {
    ValidationError::DuplicateOption {
        command: command.name.clone(),
        option: option.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::DataType;

    use super::*;

    fn set(commands: Vec<CommandNode>) -> CommandSet {
        commands.into_iter().collect()
    }

    #[test]
    fn test_rejects_empty_command_name() {
        let errors = validate_commands(&set(vec![CommandNode::new(" ")]));
        assert_eq!(errors, vec![ValidationError::EmptyCommandName]);
    }

    #[test]
    fn test_rejects_alias_collision() {
        let errors = validate_commands(&set(vec![
            CommandNode::new("remove").with_alias("rm"),
            CommandNode::new("rm"),
        ]));
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateCommand("rm".to_string())]
        );
    }

    #[test]
    fn test_rejects_duplicate_flag_short_name() {
        let cmd = CommandNode::new("ls")
            .with_option(OptionSchema::flag("all").with_short_name("a"))
            .with_option(OptionSchema::flag("almost").with_short_name("a"));
        assert_eq!(
            validate_command(&cmd),
            vec![ValidationError::DuplicateOption {
                command: "ls".to_string(),
                option: "a".to_string(),
            }]
        );
    }

    #[test]
    fn test_flag_and_argument_may_share_a_name() {
        let cmd = CommandNode::new("find")
            .with_option(OptionSchema::flag("name").with_words(1, 1))
            .with_option(OptionSchema::argument("name").with_words(1, 1));
        assert!(validate_command(&cmd).is_empty());
    }

    #[test]
    fn test_rejects_nested_defects() {
        let cmd = CommandNode::new("user").with_subcommand(
            CommandNode::new("add").with_option(OptionSchema::argument("").with_words(1, 1)),
        );
        assert_eq!(
            validate_commands(&set(vec![cmd])),
            vec![ValidationError::EmptyOptionName("add".to_string())]
        );
    }

    #[test]
    fn test_rejects_inverted_length_bounds() {
        let cmd = CommandNode::new("say")
            .with_option(OptionSchema::argument("text").with_length(5, Some(2)));
        assert_eq!(
            validate_command(&cmd),
            vec![ValidationError::InvalidLengthBounds("text".to_string())]
        );
    }

    #[test]
    fn test_rejects_choice_outside_data_type() {
        let cmd = CommandNode::new("volume").with_option(
            OptionSchema::argument("level")
                .with_data_type(DataType::Integer)
                .with_choices(["1", "loud"]),
        );
        assert_eq!(
            validate_command(&cmd),
            vec![ValidationError::InvalidChoice {
                option: "level".to_string(),
                choice: "loud".to_string(),
            }]
        );
    }

    #[test]
    fn test_rejects_names_differing_only_in_case() {
        let errors = validate_commands(&set(vec![
            CommandNode::new("Ping"),
            CommandNode::new("pong").with_alias("PING"),
        ]));
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateCommand("PING".to_string())]
        );
    }

    #[test]
    fn test_collects_every_defect() {
        let errors = validate_commands(&set(vec![
            CommandNode::new("say")
                .with_option(OptionSchema::argument("text").with_length(5, Some(2)))
                .with_option(OptionSchema::argument("text")),
            CommandNode::new("SAY"),
            CommandNode::new("volume").with_option(
                OptionSchema::argument("level")
                    .with_data_type(DataType::Integer)
                    .with_choices(["loud", "quiet"]),
            ),
        ]));
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidLengthBounds("text".to_string()),
                ValidationError::DuplicateOption {
                    command: "say".to_string(),
                    option: "text".to_string(),
                },
                ValidationError::DuplicateCommand("SAY".to_string()),
                ValidationError::InvalidChoice {
                    option: "level".to_string(),
                    choice: "loud".to_string(),
                },
                ValidationError::InvalidChoice {
                    option: "level".to_string(),
                    choice: "quiet".to_string(),
                },
            ]
        );
    }
}
