//! Parser configuration.
//!
//! Every field has a default, so a config file only needs the settings it
//! changes.
//!
//! # Example YAML
//!
//! ```yaml
//! command_prefix: "!"
//! short_flag_prefix: "-"
//! full_flag_prefix: "--"
//! flag_suffix: ""
//! case_sensitive: false
//! error_mode: strict
//! allow_too_many_args: false
//! ```

use serde::{Deserialize, Serialize};

use command_parser_core::FlagSyntax;

/// How parse failures are surfaced.
///
/// # Examples
///
/// ```
/// use command_parser::ErrorMode;
///
/// assert_eq!(ErrorMode::default(), ErrorMode::Strict);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ErrorMode {
    /// Abort on the first failure (the default).
    #[default]
    Strict,
    /// Record every failure on the result, drop the offending option, and
    /// keep parsing.
    Permissive,
}

/// Settings for a [`CommandParser`](crate::CommandParser).
///
/// # Examples
///
/// ```
/// use command_parser::{ErrorMode, ParserConfig};
///
/// let config = ParserConfig::default()
///     .with_command_prefix("!")
///     .with_error_mode(ErrorMode::Permissive);
/// assert_eq!(config.command_prefix, "!");
/// assert_eq!(config.full_flag_prefix, "--");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Prefix the first token must carry for the line to be a command.
    pub command_prefix: String,
    /// Short flag prefix for flags that define none.
    pub short_flag_prefix: String,
    /// Full flag prefix for flags that define none.
    pub full_flag_prefix: String,
    /// Flag suffix for flags that define none.
    pub flag_suffix: String,
    /// Whether command names and flag tokens match case-sensitively.
    pub case_sensitive: bool,
    pub error_mode: ErrorMode,
    /// Tolerate leftover positional tokens and word-count overflow.
    pub allow_too_many_args: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            command_prefix: String::new(),
            short_flag_prefix: "-".to_string(),
            full_flag_prefix: "--".to_string(),
            flag_suffix: String::new(),
            case_sensitive: false,
            error_mode: ErrorMode::Strict,
            allow_too_many_args: false,
        }
    }
}

impl ParserConfig {
    pub fn with_command_prefix(mut self, prefix: &str) -> Self {
        self.command_prefix = prefix.to_string();
        self
    }

    pub fn with_flag_prefixes(mut self, short: &str, full: &str) -> Self {
        self.short_flag_prefix = short.to_string();
        self.full_flag_prefix = full.to_string();
        self
    }

    pub fn with_flag_suffix(mut self, suffix: &str) -> Self {
        self.flag_suffix = suffix.to_string();
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    pub fn with_allow_too_many_args(mut self, allow: bool) -> Self {
        self.allow_too_many_args = allow;
        self
    }

    /// Flag syntax applied to flags without their own prefixes/suffix.
    pub fn flag_syntax(&self) -> FlagSyntax<'_> {
        FlagSyntax {
            full_prefix: &self.full_flag_prefix,
            short_prefix: &self.short_flag_prefix,
            suffix: &self.flag_suffix,
        }
    }

    /// Returns `true` if `word` starts with the command prefix and the next
    /// character exists and is not itself a prefix character, so `!!x` is
    /// not a command under prefix `!`.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_parser::ParserConfig;
    ///
    /// let config = ParserConfig::default().with_command_prefix("!");
    /// assert!(config.has_command_prefix("!ping"));
    /// assert!(!config.has_command_prefix("!!ping"));
    /// assert!(!config.has_command_prefix("!"));
    /// assert!(!config.has_command_prefix("ping"));
    /// ```
    pub fn has_command_prefix(&self, word: &str) -> bool {
        word.strip_prefix(self.command_prefix.as_str())
            .and_then(|rest| rest.chars().next())
            .is_some_and(|next| !self.command_prefix.contains(next))
    }

    /// Strips the command prefix from `word` when [`has_command_prefix`]
    /// holds.
    ///
    /// [`has_command_prefix`]: Self::has_command_prefix
    pub fn strip_command_prefix<'w>(&self, word: &'w str) -> &'w str {
        if self.has_command_prefix(word) {
            &word[self.command_prefix.len()..]
        } else {
            word
        }
    }

    /// Compares two words under the configured case sensitivity.
    pub fn same_word(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a.to_lowercase() == b.to_lowercase()
        }
    }

    /// Strips `head` from the start of `word` under the configured case
    /// sensitivity.
    pub(crate) fn strip_word_prefix<'w>(&self, word: &'w str, head: &str) -> Option<&'w str> {
        let candidate = word.get(..head.len())?;
        if self.same_word(candidate, head) {
            Some(&word[head.len()..])
        } else {
            None
        }
    }
}
