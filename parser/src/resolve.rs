//! Command path resolution.
//!
//! Consumes leading tokens that name commands, descending one tree level per
//! token, and leaves the rest for the option parser.

use std::sync::Arc;

use command_parser_core::{CommandNode, CommandPath, CommandSet};
use tracing::{debug, trace};

use crate::config::ParserConfig;
use crate::error::{Diagnostics, ParseError};

/// Resolves the command path at the front of a token list.
///
/// A subcommand is required at the root and below group nodes (nodes with
/// subcommands and no options of their own). Anywhere else resolution stops
/// quietly at the first token that is not a subcommand, leaving it for the
/// option parser.
#[derive(Debug, Clone, Copy)]
pub struct CommandResolver<'a> {
    config: &'a ParserConfig,
}

impl<'a> CommandResolver<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        Self { config }
    }

    /// Removes the command tokens from the front of `tokens` and returns the
    /// resolved path.
    ///
    /// Returns an empty path without error when the first token lacks the
    /// command prefix.
    ///
    /// # Errors
    ///
    /// In strict mode, returns [`ParseError::UnknownCommand`] or
    /// [`ParseError::MissingCommandArgument`] where a subcommand is required.
    /// In permissive mode those are recorded in `diagnostics` and the path
    /// resolved so far is returned.
    pub fn resolve(
        &self,
        tokens: &mut Vec<String>,
        roots: &CommandSet,
        diagnostics: &mut Diagnostics,
    ) -> Result<CommandPath, ParseError> {
        let mut path = CommandPath::new();
        if let Some(first) = tokens.first() {
            if !self.config.has_command_prefix(first) {
                trace!(token = %first, "first token lacks the command prefix");
                return Ok(path);
            }
        }

        self.descend(tokens, roots, None, &mut path, diagnostics)?;
        debug!(path = %path, remaining = tokens.len(), "resolved command path");
        Ok(path)
    }

    fn descend(
        &self,
        tokens: &mut Vec<String>,
        candidates: &CommandSet,
        parent: Option<&CommandNode>,
        path: &mut CommandPath,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), ParseError> {
        if candidates.is_empty() {
            return Ok(());
        }
        let required = parent.is_none_or(CommandNode::is_group);

        let Some(first) = tokens.first() else {
            if required {
                let after = parent.map(|_| path.to_string());
                diagnostics.report(ParseError::MissingCommandArgument(after))?;
            }
            return Ok(());
        };

        let word = self.config.strip_command_prefix(first);
        let command = match candidates.find(word, self.config.case_sensitive) {
            Some(command) => Arc::clone(command),
            None => {
                if required {
                    diagnostics.report(ParseError::UnknownCommand(word.to_string()))?;
                } else {
                    trace!(token = %word, "not a subcommand, leaving for options");
                }
                return Ok(());
            }
        };

        tokens.remove(0);
        path.push(Arc::clone(&command));
        self.descend(
            tokens,
            &command.subcommands,
            Some(command.as_ref()),
            path,
            diagnostics,
        )
    }
}
