//! The outcome of parsing one line.

use std::fmt;
use std::sync::Arc;

use command_parser_core::{BoundOption, CommandNode, CommandPath, FlagSyntax, OptionKind, Value};

use crate::config::ParserConfig;
use crate::error::ParseError;

/// Everything learned from one line: the resolved command path, the bound
/// options, and (in permissive mode) the failures that were skipped.
///
/// A line that is not a command yields a result with an empty path; check
/// [`is_valid`](Self::is_valid) before dispatching.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub(crate) raw: String,
    pub(crate) path: CommandPath,
    pub(crate) options: Vec<BoundOption>,
    pub(crate) errors: Vec<ParseError>,
    command_prefix: String,
    full_flag_prefix: String,
    short_flag_prefix: String,
    flag_suffix: String,
}

impl ParseResult {
    pub(crate) fn new(raw: &str, config: &ParserConfig) -> Self {
        Self {
            raw: raw.to_string(),
            path: CommandPath::new(),
            options: Vec::new(),
            errors: Vec::new(),
            command_prefix: config.command_prefix.clone(),
            full_flag_prefix: config.full_flag_prefix.clone(),
            short_flag_prefix: config.short_flag_prefix.clone(),
            flag_suffix: config.flag_suffix.clone(),
        }
    }

    /// The line as it was given to the parser.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Root command name, or `""` when no command was resolved.
    pub fn name(&self) -> &str {
        self.path.first().map_or("", |c| c.name.as_str())
    }

    /// Returns `true` when at least one command was resolved.
    pub fn is_valid(&self) -> bool {
        !self.path.is_empty()
    }

    pub fn path(&self) -> &CommandPath {
        &self.path
    }

    /// The deepest resolved command.
    pub fn command(&self) -> Option<&Arc<CommandNode>> {
        self.path.last()
    }

    /// Handler key of the deepest resolved command.
    pub fn handler(&self) -> Option<&str> {
        self.command().and_then(|c| c.handler.as_deref())
    }

    /// Failures recorded in permissive mode.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Every bound option: flags in input order, then arguments in
    /// declaration order.
    pub fn options(&self) -> &[BoundOption] {
        &self.options
    }

    pub fn flags(&self) -> impl Iterator<Item = &BoundOption> {
        self.options.iter().filter(|o| o.kind() == OptionKind::Flag)
    }

    pub fn arguments(&self) -> impl Iterator<Item = &BoundOption> {
        self.options.iter().filter(|o| o.kind() == OptionKind::Argument)
    }

    /// Finds a flag present on the line by name, short name, or alias.
    pub fn flag(&self, name: &str) -> Option<&BoundOption> {
        self.flags().find(|f| f.answers_to(name))
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flag(name).is_some()
    }

    /// Finds a positional argument by name or alias.
    pub fn argument(&self, name: &str) -> Option<&BoundOption> {
        self.arguments().find(|a| a.answers_to(name))
    }

    /// Value of the named argument, falling back to its default.
    pub fn argument_value(&self, name: &str) -> Option<Value> {
        self.argument(name).map(BoundOption::value_or_default)
    }

    /// Value of the named flag when present on the line.
    pub fn flag_value(&self, name: &str) -> Option<Value> {
        self.flag(name).map(BoundOption::value_or_default)
    }

    pub fn into_options(self) -> Vec<BoundOption> {
        self.options
    }

    fn flag_spelling(&self, option: &BoundOption) -> String {
        let syntax = FlagSyntax {
            full_prefix: &self.full_flag_prefix,
            short_prefix: &self.short_flag_prefix,
            suffix: &self.flag_suffix,
        };
        option
            .schema()
            .spellings(syntax)
            .into_iter()
            .next()
            .unwrap_or_else(|| option.name().to_string())
    }
}

impl fmt::Display for ParseResult {
    /// Canonical form of the line: prefixed command path, non-empty
    /// arguments, then flags with their words. Empty for non-commands.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return Ok(());
        }

        let mut parts = vec![format!("{}{}", self.command_prefix, self.path)];
        parts.extend(
            self.arguments()
                .filter(|a| !a.is_empty())
                .map(ToString::to_string),
        );
        for flag in self.flags() {
            let spelling = self.flag_spelling(flag);
            if flag.is_empty() {
                parts.push(spelling);
            } else {
                parts.push(format!("{spelling} {flag}"));
            }
        }
        f.write_str(&parts.join(" "))
    }
}
