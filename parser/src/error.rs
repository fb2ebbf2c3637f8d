//! Parse failures and the strict/permissive reporting policy.

use thiserror::Error;
use tracing::debug;

use crate::config::ErrorMode;

/// Reasons a line fails to parse.
///
/// Each variant names the offending command or option so callers can show a
/// useful message. A line that is simply not a command (no prefix, empty) is
/// never an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The raw line starts with whitespace.
    #[error("leading whitespace is not allowed")]
    InvalidLineFormat,

    /// A token at a command level matches no command or alias.
    #[error("unknown command or subcommand: {0}")]
    UnknownCommand(String),

    /// No command token where one was required. Holds the path resolved so
    /// far, or `None` at the root.
    #[error("no command or subcommand specified{}", after_path(.0))]
    MissingCommandArgument(Option<String>),

    /// A flag collected fewer words than its minimum.
    #[error("not enough arguments for flag `{flag}`: expected at least {expected}, found {found}")]
    FlagArgumentShortfall {
        flag: String,
        expected: usize,
        found: usize,
    },

    /// The bound value's character length is outside its bounds.
    #[error("value of option `{option}` has length {length}, allowed {}", length_range(.min, .max))]
    OptionLengthOutOfBounds {
        option: String,
        length: usize,
        min: usize,
        max: Option<usize>,
    },

    /// The bound value's word count is outside its bounds.
    #[error("option `{option}` takes {min} to {max} words, found {words}")]
    OptionWordCountOutOfBounds {
        option: String,
        words: usize,
        min: usize,
        max: usize,
    },

    /// The value is not an allowed choice or fails the validation pattern.
    #[error("invalid value for option `{option}`: {value}")]
    OptionValueRejected { option: String, value: String },

    /// Tokens remain after every positional argument is filled.
    #[error("too many arguments: {}", .0.join(" "))]
    ExcessArguments(Vec<String>),
}

fn after_path(path: &Option<String>) -> String {
    path.as_ref()
        .map(|p| format!(" after `{p}`"))
        .unwrap_or_default()
}

fn length_range(min: &usize, max: &Option<usize>) -> String {
    match max {
        Some(max) => format!("{min}..={max}"),
        None => format!("{min}.."),
    }
}

/// Collects failures according to an [`ErrorMode`].
///
/// In strict mode [`report`](Self::report) hands the error straight back so
/// `?` aborts the parse; in permissive mode it records the error and lets the
/// caller skip the offending piece.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    mode: ErrorMode,
    errors: Vec<ParseError>,
}

impl Diagnostics {
    pub fn new(mode: ErrorMode) -> Self {
        Self {
            mode,
            errors: Vec::new(),
        }
    }

    /// Reports a failure.
    ///
    /// # Errors
    ///
    /// Returns `err` itself in [`ErrorMode::Strict`].
    pub fn report(&mut self, err: ParseError) -> Result<(), ParseError> {
        match self.mode {
            ErrorMode::Strict => Err(err),
            ErrorMode::Permissive => {
                debug!(error = %err, "recorded parse error");
                self.errors.push(err);
                Ok(())
            }
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }
}
