//! Option schemas (flags and positional arguments) and their bound values.
//!
//! An [`OptionSchema`] is the immutable, registered description of one option.
//! Parsing never writes to it: each parse wraps the shared schema in a fresh
//! [`BoundOption`] that owns the captured words for that parse only.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::tokenize::quote_word;
use crate::types::{DataType, OptionKind, Pattern, Value};

/// Flag surface syntax supplied by the parser for flags that do not
/// define their own prefixes or suffix.
#[derive(Debug, Clone, Copy)]
pub struct FlagSyntax<'a> {
    /// Prefix of full flag names (e.g. `--`).
    pub full_prefix: &'a str,
    /// Prefix of short flag names (e.g. `-`).
    pub short_prefix: &'a str,
    /// Suffix appended to every flag name.
    pub suffix: &'a str,
}

impl Default for FlagSyntax<'_> {
    fn default() -> Self {
        Self {
            full_prefix: "--",
            short_prefix: "-",
            suffix: "",
        }
    }
}

/// Schema for a flag or positional argument.
///
/// Word bounds are normalized on construction so that
/// `max_words >= min_words` always holds; use
/// [`with_words`](OptionSchema::with_words) to change them.
///
/// # Examples
///
/// ```
/// use command_parser_core::{DataType, OptionSchema};
///
/// let tag = OptionSchema::flag("tag")
///     .with_short_name("t")
///     .with_words(1, 3);
/// assert!(tag.is_flag());
/// assert_eq!(tag.max_words(), 3);
///
/// // max below min is raised to min
/// let count = OptionSchema::argument("count")
///     .with_words(2, 0)
///     .with_data_type(DataType::Integer);
/// assert_eq!(count.max_words(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OptionSchemaDef")]
pub struct OptionSchema {
    pub kind: OptionKind,
    /// Full name (`tag` in `--tag`).
    pub name: String,
    /// Short name (`t` in `-t`).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub short_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub short_aliases: Vec<String>,
    /// Full-name prefix; the parser's prefix applies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Short-name prefix; the parser's prefix applies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_prefix: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prefix_aliases: Vec<String>,
    /// Suffix; the parser's suffix applies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suffix_aliases: Vec<String>,
    /// Key/value separator. Whitespace-only separators are ignored.
    pub separator: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub separator_aliases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    /// Human hint for the expected value (e.g. `"a user name"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    pub is_required: bool,
    min_words: usize,
    max_words: usize,
    /// Minimum character length of the assembled value.
    pub min_length: usize,
    /// Maximum character length of the assembled value (`None` = unbounded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    pub data_type: DataType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Allowed values. When non-empty, replaces the length bounds.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
}

impl OptionSchema {
    fn new(kind: OptionKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            short_name: String::new(),
            aliases: Vec::new(),
            short_aliases: Vec::new(),
            prefix: None,
            short_prefix: None,
            prefix_aliases: Vec::new(),
            suffix: None,
            suffix_aliases: Vec::new(),
            separator: default_separator(),
            separator_aliases: Vec::new(),
            description: None,
            short_description: None,
            expected: None,
            examples: Vec::new(),
            is_required: false,
            min_words: 0,
            max_words: 0,
            min_length: 0,
            max_length: None,
            data_type: DataType::String,
            default_value: None,
            choices: Vec::new(),
            pattern: None,
        }
    }

    /// Creates a flag. Takes no words until [`with_words`](Self::with_words)
    /// says otherwise.
    pub fn flag(name: &str) -> Self {
        Self::new(OptionKind::Flag, name)
    }

    /// Creates a positional argument. Takes no words until
    /// [`with_words`](Self::with_words) says otherwise.
    pub fn argument(name: &str) -> Self {
        Self::new(OptionKind::Argument, name)
    }

    pub fn with_short_name(mut self, short_name: &str) -> Self {
        self.short_name = short_name.to_string();
        self
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn with_short_alias(mut self, alias: &str) -> Self {
        self.short_aliases.push(alias.to_string());
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn with_short_prefix(mut self, prefix: &str) -> Self {
        self.short_prefix = Some(prefix.to_string());
        self
    }

    pub fn with_prefix_alias(mut self, prefix: &str) -> Self {
        self.prefix_aliases.push(prefix.to_string());
        self
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = Some(suffix.to_string());
        self
    }

    pub fn with_suffix_alias(mut self, suffix: &str) -> Self {
        self.suffix_aliases.push(suffix.to_string());
        self
    }

    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    pub fn with_separator_alias(mut self, separator: &str) -> Self {
        self.separator_aliases.push(separator.to_string());
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_expected(mut self, expected: &str) -> Self {
        self.expected = Some(expected.to_string());
        self
    }

    pub fn with_example(mut self, example: &str) -> Self {
        self.examples.push(example.to_string());
        self
    }

    /// Marks the option as required.
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Sets the word-count bounds. `max` is raised to `min` when smaller.
    pub fn with_words(mut self, min: usize, max: usize) -> Self {
        self.min_words = min;
        self.max_words = max.max(min);
        self
    }

    /// Sets the character-length bounds of the assembled value.
    pub fn with_length(mut self, min: usize, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn is_flag(&self) -> bool {
        self.kind == OptionKind::Flag
    }

    pub fn is_argument(&self) -> bool {
        self.kind == OptionKind::Argument
    }

    pub fn min_words(&self) -> usize {
        self.min_words
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }

    /// Display name: the full name, or the short name for short-only flags.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.short_name
        } else {
            &self.name
        }
    }

    /// Casts raw text to this option's data type.
    pub fn cast(&self, text: &str) -> Value {
        Value::cast(text, self.data_type)
    }

    /// The default value cast to this option's data type. An unset default
    /// casts from empty text.
    pub fn default_value(&self) -> Value {
        match &self.default_value {
            Some(value) => value.cast_to(self.data_type),
            None => self.cast(""),
        }
    }

    /// Returns `true` if `value` is one of the allowed choices, comparing
    /// after both sides are cast to this option's data type.
    pub fn allows_choice(&self, value: &Value) -> bool {
        self.choices
            .iter()
            .any(|choice| choice.cast_to(self.data_type) == *value)
    }

    /// Every exact token spelling that introduces this flag.
    ///
    /// Full names combine {prefix, prefix aliases} × {name, aliases} ×
    /// {suffix, suffix aliases}; short names combine the short prefix with
    /// {short name, short aliases} and the same suffixes. Options with no
    /// names produce nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_parser_core::{FlagSyntax, OptionSchema};
    ///
    /// let flag = OptionSchema::flag("verbose").with_short_name("v");
    /// let spellings = flag.spellings(FlagSyntax::default());
    /// assert_eq!(spellings, vec!["--verbose", "-v"]);
    /// ```
    pub fn spellings(&self, syntax: FlagSyntax<'_>) -> Vec<String> {
        let suffixes: Vec<&str> = std::iter::once(self.suffix.as_deref().unwrap_or(syntax.suffix))
            .chain(self.suffix_aliases.iter().map(String::as_str))
            .collect();

        let full_prefixes = std::iter::once(self.prefix.as_deref().unwrap_or(syntax.full_prefix))
            .chain(self.prefix_aliases.iter().map(String::as_str));
        let full_names: Vec<&str> = std::iter::once(self.name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .filter(|n| !n.is_empty())
            .collect();

        let short_prefix = self.short_prefix.as_deref().unwrap_or(syntax.short_prefix);
        let short_names = std::iter::once(self.short_name.as_str())
            .chain(self.short_aliases.iter().map(String::as_str))
            .filter(|n| !n.is_empty());

        let mut out = Vec::new();
        for prefix in full_prefixes {
            for name in &full_names {
                for suffix in &suffixes {
                    push_unique(&mut out, format!("{prefix}{name}{suffix}"));
                }
            }
        }
        for name in short_names {
            for suffix in &suffixes {
                push_unique(&mut out, format!("{short_prefix}{name}{suffix}"));
            }
        }
        out
    }

    /// Non-blank key/value separators, trimmed.
    pub fn separators(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.separator.as_str())
            .chain(self.separator_aliases.iter().map(String::as_str))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn push_unique(out: &mut Vec<String>, spelling: String) {
    if !out.contains(&spelling) {
        out.push(spelling);
    }
}

fn default_separator() -> String {
    " ".to_string()
}

/// Deserialization shape for [`OptionSchema`]; normalizes word bounds.
#[derive(Deserialize)]
struct OptionSchemaDef {
    kind: OptionKind,
    #[serde(default)]
    name: String,
    #[serde(default)]
    short_name: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    short_aliases: Vec<String>,
    #[serde(default)]
    prefix: Option<String>,
    #[serde(default)]
    short_prefix: Option<String>,
    #[serde(default)]
    prefix_aliases: Vec<String>,
    #[serde(default)]
    suffix: Option<String>,
    #[serde(default)]
    suffix_aliases: Vec<String>,
    #[serde(default = "default_separator")]
    separator: String,
    #[serde(default)]
    separator_aliases: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    short_description: Option<String>,
    #[serde(default)]
    expected: Option<String>,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    is_required: bool,
    #[serde(default)]
    min_words: usize,
    #[serde(default)]
    max_words: usize,
    #[serde(default)]
    min_length: usize,
    #[serde(default)]
    max_length: Option<usize>,
    #[serde(default)]
    data_type: DataType,
    #[serde(default)]
    default_value: Option<Value>,
    #[serde(default)]
    choices: Vec<Value>,
    #[serde(default)]
    pattern: Option<Pattern>,
}

impl From<OptionSchemaDef> for OptionSchema {
    fn from(def: OptionSchemaDef) -> Self {
        Self {
            kind: def.kind,
            name: def.name,
            short_name: def.short_name,
            aliases: def.aliases,
            short_aliases: def.short_aliases,
            prefix: def.prefix,
            short_prefix: def.short_prefix,
            prefix_aliases: def.prefix_aliases,
            suffix: def.suffix,
            suffix_aliases: def.suffix_aliases,
            separator: def.separator,
            separator_aliases: def.separator_aliases,
            description: def.description,
            short_description: def.short_description,
            expected: def.expected,
            examples: def.examples,
            is_required: def.is_required,
            min_words: def.min_words,
            max_words: def.max_words.max(def.min_words),
            min_length: def.min_length,
            max_length: def.max_length,
            data_type: def.data_type,
            default_value: def.default_value,
            choices: def.choices,
            pattern: def.pattern,
        }
    }
}

/// A per-parse instance of an option: the shared schema plus the words
/// captured for it.
///
/// Creating a `BoundOption` never copies the schema, and binding words to it
/// never touches the registered tree.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use command_parser_core::{BoundOption, DataType, OptionSchema, Value};
///
/// let schema = Arc::new(
///     OptionSchema::argument("count")
///         .with_words(1, 1)
///         .with_data_type(DataType::Integer)
///         .with_default(5),
/// );
///
/// let mut bound = BoundOption::new(schema);
/// assert_eq!(bound.value(), None);
/// assert_eq!(bound.value_or_default(), Value::Integer(5));
///
/// bound.assign(vec!["12".to_string()]);
/// assert_eq!(bound.value(), Some(Value::Integer(12)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BoundOption {
    schema: Arc<OptionSchema>,
    raw: Vec<String>,
}

impl BoundOption {
    /// Creates an instance with no captured words.
    pub fn new(schema: Arc<OptionSchema>) -> Self {
        Self {
            schema,
            raw: Vec::new(),
        }
    }

    pub fn schema(&self) -> &OptionSchema {
        &self.schema
    }

    pub fn name(&self) -> &str {
        self.schema.display_name()
    }

    pub fn kind(&self) -> OptionKind {
        self.schema.kind
    }

    /// Stores `words`, replacing anything captured before.
    ///
    /// Word bounds are not enforced here; the parser validates the bound
    /// option afterwards.
    pub fn assign(&mut self, words: Vec<String>) {
        self.raw = words;
    }

    /// Captured words, in input order.
    pub fn raw_words(&self) -> &[String] {
        &self.raw
    }

    /// Number of captured words.
    pub fn words(&self) -> usize {
        self.raw.len()
    }

    /// Character length of the assembled value.
    pub fn len(&self) -> usize {
        self.text().map_or(0, |t| t.chars().count())
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The captured words joined by single spaces, if any were captured.
    pub fn text(&self) -> Option<String> {
        if self.raw.is_empty() {
            None
        } else {
            Some(self.raw.join(" "))
        }
    }

    /// The captured value cast to the schema's data type.
    pub fn value(&self) -> Option<Value> {
        self.text().map(|t| self.schema.cast(&t))
    }

    /// [`value`](Self::value), falling back to the schema default.
    pub fn value_or_default(&self) -> Value {
        self.value().unwrap_or_else(|| self.schema.default_value())
    }

    /// Returns `true` if `name` is this option's full or short name or one
    /// of their aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        let schema = &self.schema;
        (!schema.name.is_empty() && schema.name == name)
            || (!schema.short_name.is_empty() && schema.short_name == name)
            || schema.aliases.iter().any(|a| a == name)
            || schema.short_aliases.iter().any(|a| a == name)
    }
}

impl fmt::Display for BoundOption {
    /// Captured words, re-quoted where they contain whitespace.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<_> = self.raw.iter().map(|w| quote_word(w)).collect();
        f.write_str(&words.join(" "))
    }
}
