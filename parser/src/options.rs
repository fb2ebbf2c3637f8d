//! Flag and positional argument binding.
//!
//! Runs in two phases over the tokens left after command resolution:
//!
//! 1. **Flags.** Every token that spells a declared flag claims the words
//!    after it, stopping at the next flag token, at the flag's maximum, or
//!    when only the words reserved for required positional arguments remain.
//!    Unclaimed words before the flag already count toward that reserve.
//! 2. **Arguments.** The unclaimed tokens are handed out in declaration
//!    order. Every argument but the last takes its minimum; the last takes up
//!    to its maximum.
//!
//! Each bound option is then validated (length, word count, choices,
//! pattern) and leftover tokens are reported as excess.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use command_parser_core::{BoundOption, OptionSchema, tokenize};
use tracing::{debug, trace};

use crate::config::ParserConfig;
use crate::error::{Diagnostics, ParseError};

/// A declared flag with every token spelling that introduces it.
struct FlagMatcher<'s> {
    schema: &'s Arc<OptionSchema>,
    spellings: Vec<String>,
}

/// Binds tokens to a command's declared options.
#[derive(Debug, Clone, Copy)]
pub struct OptionParser<'a> {
    config: &'a ParserConfig,
}

impl<'a> OptionParser<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        Self { config }
    }

    /// Tokenizes `line` and binds the tokens to `options`.
    ///
    /// # Errors
    ///
    /// See [`parse`](Self::parse).
    pub fn parse_line(
        &self,
        line: &str,
        options: &[Arc<OptionSchema>],
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<BoundOption>, ParseError> {
        self.parse(tokenize(line), options, diagnostics)
    }

    /// Binds `tokens` to `options`, returning the flags found (in input
    /// order) followed by every positional argument (in declaration order).
    ///
    /// Positional arguments are returned even when they captured nothing so
    /// callers can fall back to their defaults.
    ///
    /// # Errors
    ///
    /// In strict mode, returns the first [`ParseError::FlagArgumentShortfall`],
    /// validation failure, or [`ParseError::ExcessArguments`]. In permissive
    /// mode those are recorded in `diagnostics` and the offending option is
    /// left out of the result.
    pub fn parse(
        &self,
        tokens: Vec<String>,
        options: &[Arc<OptionSchema>],
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<BoundOption>, ParseError> {
        let syntax = self.config.flag_syntax();
        let flags: Vec<FlagMatcher<'_>> = options
            .iter()
            .filter(|o| o.is_flag())
            .map(|schema| FlagMatcher {
                schema,
                spellings: schema.spellings(syntax),
            })
            .collect();
        let arguments: Vec<&Arc<OptionSchema>> =
            options.iter().filter(|o| o.is_argument()).collect();

        let mut slots: Vec<Option<String>> = self
            .split_separators(tokens, &flags)
            .into_iter()
            .map(Some)
            .collect();

        let positions: BTreeMap<usize, &FlagMatcher<'_>> = slots
            .iter()
            .enumerate()
            .filter_map(|(pos, slot)| {
                let token = slot.as_deref()?;
                self.match_flag(token, &flags).map(|flag| (pos, flag))
            })
            .collect();

        let reserved: usize = arguments
            .iter()
            .filter(|a| a.is_required)
            .map(|a| a.min_words())
            .sum();

        let mut bound = Vec::new();

        for (&pos, flag) in &positions {
            let schema = flag.schema;
            slots[pos] = None;

            // words already left before this flag count toward the reserve
            let outstanding = reserved.saturating_sub(slots[..pos].iter().flatten().count());
            let mut collected = Vec::new();
            for cursor in pos + 1..slots.len() {
                if positions.contains_key(&cursor) || collected.len() >= schema.max_words() {
                    break;
                }
                // later flag tokens can never fill an argument
                let remaining = (cursor..slots.len())
                    .filter(|i| slots[*i].is_some() && !positions.contains_key(i))
                    .count();
                if outstanding >= remaining {
                    break;
                }
                if let Some(word) = slots[cursor].take() {
                    collected.push(word);
                }
            }

            if collected.len() < schema.min_words() {
                diagnostics.report(ParseError::FlagArgumentShortfall {
                    flag: schema.display_name().to_string(),
                    expected: schema.min_words(),
                    found: collected.len(),
                })?;
                continue;
            }

            let mut option = BoundOption::new(Arc::clone(schema));
            option.assign(collected);
            trace!(flag = %option.name(), words = option.words(), "bound flag");
            if self.validate(&option, diagnostics)? {
                bound.push(option);
            }
        }

        let mut pool: VecDeque<String> = slots.into_iter().flatten().collect();
        let last = arguments.len().saturating_sub(1);

        for (index, schema) in arguments.iter().enumerate() {
            let wanted = if index == last {
                schema.max_words()
            } else {
                schema.min_words()
            };
            let words: Vec<String> = pool.drain(..wanted.min(pool.len())).collect();

            if words.len() < schema.min_words() {
                trace!(
                    argument = %schema.display_name(),
                    words = words.len(),
                    "argument below its minimum"
                );
            }
            let mut option = BoundOption::new(Arc::clone(schema));
            option.assign(words);
            if self.validate(&option, diagnostics)? {
                bound.push(option);
            }
        }

        if !pool.is_empty() && !self.config.allow_too_many_args {
            diagnostics.report(ParseError::ExcessArguments(pool.into_iter().collect()))?;
        }

        debug!(bound = bound.len(), "bound options");
        Ok(bound)
    }

    /// Splits `--name=value` style tokens into a flag token and a value
    /// token, using each flag's non-blank separators.
    fn split_separators(&self, tokens: Vec<String>, flags: &[FlagMatcher<'_>]) -> Vec<String> {
        let mut out = Vec::with_capacity(tokens.len());
        for token in tokens {
            match self.split_token(&token, flags) {
                Some((flag, value)) => {
                    out.push(flag);
                    if !value.is_empty() {
                        out.push(value);
                    }
                }
                None => out.push(token),
            }
        }
        out
    }

    fn split_token(&self, token: &str, flags: &[FlagMatcher<'_>]) -> Option<(String, String)> {
        if self.match_flag(token, flags).is_some() {
            return None;
        }
        for flag in flags {
            for separator in flag.schema.separators() {
                for spelling in &flag.spellings {
                    let head = format!("{spelling}{separator}");
                    if let Some(value) = self.config.strip_word_prefix(token, &head) {
                        let flag_part = token.get(..spelling.len()).unwrap_or(spelling);
                        return Some((flag_part.to_string(), value.to_string()));
                    }
                }
            }
        }
        None
    }

    fn match_flag<'f, 's>(
        &self,
        token: &str,
        flags: &'f [FlagMatcher<'s>],
    ) -> Option<&'f FlagMatcher<'s>> {
        flags.iter().find(|flag| {
            flag.spellings
                .iter()
                .any(|spelling| self.config.same_word(spelling, token))
        })
    }

    /// Returns `Ok(true)` when `option` passes validation, `Ok(false)` when
    /// it failed and the failure was recorded.
    fn validate(
        &self,
        option: &BoundOption,
        diagnostics: &mut Diagnostics,
    ) -> Result<bool, ParseError> {
        match self.check(option) {
            None => Ok(true),
            Some(err) => {
                diagnostics.report(err)?;
                Ok(false)
            }
        }
    }

    fn check(&self, option: &BoundOption) -> Option<ParseError> {
        let schema = option.schema();
        let name = option.name();

        if schema.choices.is_empty() {
            let length = option.len();
            let too_short = schema.is_required && length < schema.min_length;
            let too_long = schema.max_length.is_some_and(|max| length > max);
            if too_short || too_long {
                return Some(ParseError::OptionLengthOutOfBounds {
                    option: name.to_string(),
                    length,
                    min: schema.min_length,
                    max: schema.max_length,
                });
            }
        }

        let words = option.words();
        let too_few = schema.is_required && words < schema.min_words();
        let too_many = !self.config.allow_too_many_args && words > schema.max_words();
        if too_few || too_many {
            return Some(ParseError::OptionWordCountOutOfBounds {
                option: name.to_string(),
                words,
                min: schema.min_words(),
                max: schema.max_words(),
            });
        }

        let (Some(text), Some(value)) = (option.text(), option.value()) else {
            return None;
        };

        if !schema.choices.is_empty() && !schema.allows_choice(&value) {
            return Some(ParseError::OptionValueRejected {
                option: name.to_string(),
                value: text,
            });
        }

        if let Some(pattern) = &schema.pattern {
            if !pattern.is_match(&text) {
                return Some(ParseError::OptionValueRejected {
                    option: name.to_string(),
                    value: text,
                });
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use command_parser_core::{DataType, Pattern, Value};

    use super::*;
    use crate::config::ErrorMode;

    fn opts(list: Vec<OptionSchema>) -> Vec<Arc<OptionSchema>> {
        list.into_iter().map(Arc::new).collect()
    }

    fn parse(
        config: &ParserConfig,
        line: &str,
        options: &[Arc<OptionSchema>],
    ) -> Result<Vec<BoundOption>, ParseError> {
        let mut diag = Diagnostics::new(config.error_mode);
        OptionParser::new(config).parse_line(line, options, &mut diag)
    }

    fn find<'b>(bound: &'b [BoundOption], name: &str) -> &'b BoundOption {
        bound.iter().find(|b| b.answers_to(name)).unwrap()
    }

    #[test]
    fn test_flag_and_argument() {
        let options = opts(vec![
            OptionSchema::argument("name").with_words(1, 1).required(),
            OptionSchema::flag("admin"),
        ]);
        let bound = parse(&ParserConfig::default(), "bob --admin", &options).unwrap();
        assert_eq!(bound.len(), 2);
        assert!(find(&bound, "admin").is_empty());
        assert_eq!(find(&bound, "name").value(), Some(Value::from("bob")));
    }

    #[test]
    fn test_flag_leaves_reserved_words_for_arguments() {
        let options = opts(vec![
            OptionSchema::flag("tag").with_words(1, 3),
            OptionSchema::argument("target").with_words(1, 1).required(),
        ]);
        let bound = parse(&ParserConfig::default(), "--tag a b c", &options).unwrap();
        assert_eq!(find(&bound, "tag").raw_words(), ["a", "b"]);
        assert_eq!(find(&bound, "target").raw_words(), ["c"]);
    }

    #[test]
    fn test_words_before_flag_satisfy_reserve() {
        let options = opts(vec![
            OptionSchema::argument("target").with_words(1, 1).required(),
            OptionSchema::flag("tag").with_words(1, 3),
        ]);
        let bound = parse(&ParserConfig::default(), "host --tag a b", &options).unwrap();
        assert_eq!(find(&bound, "tag").raw_words(), ["a", "b"]);
        assert_eq!(find(&bound, "target").raw_words(), ["host"]);
    }

    #[test]
    fn test_reserve_ignores_later_flag_tokens() {
        let options = opts(vec![
            OptionSchema::flag("a").with_words(1, 5),
            OptionSchema::flag("b"),
            OptionSchema::argument("target").with_words(1, 1).required(),
        ]);
        let bound = parse(&ParserConfig::default(), "--a x y --b", &options).unwrap();
        assert_eq!(find(&bound, "a").raw_words(), ["x"]);
        assert!(find(&bound, "b").is_empty());
        assert_eq!(find(&bound, "target").raw_words(), ["y"]);
    }

    #[test]
    fn test_optional_argument_below_minimum_keeps_words() {
        let options = opts(vec![OptionSchema::argument("pair").with_words(2, 3)]);
        let bound = parse(&ParserConfig::default(), "x", &options).unwrap();
        let pair = find(&bound, "pair");
        assert_eq!(pair.raw_words(), ["x"]);
        assert_eq!(pair.value(), Some(Value::from("x")));
    }

    #[test]
    fn test_required_argument_below_minimum_is_reported() {
        let options = opts(vec![
            OptionSchema::argument("pair").with_words(2, 3).required(),
        ]);
        let err = parse(&ParserConfig::default(), "x", &options).unwrap_err();
        assert_eq!(
            err,
            ParseError::OptionWordCountOutOfBounds {
                option: "pair".into(),
                words: 1,
                min: 2,
                max: 3,
            }
        );
    }

    #[test]
    fn test_flag_stops_at_next_flag() {
        let options = opts(vec![
            OptionSchema::flag("from").with_words(1, 5),
            OptionSchema::flag("to").with_words(1, 5),
        ]);
        let bound = parse(&ParserConfig::default(), "--from a b --to c", &options).unwrap();
        assert_eq!(find(&bound, "from").raw_words(), ["a", "b"]);
        assert_eq!(find(&bound, "to").raw_words(), ["c"]);
    }

    #[test]
    fn test_flag_shortfall() {
        let options = opts(vec![
            OptionSchema::flag("limit").with_words(1, 1),
            OptionSchema::flag("verbose"),
        ]);
        let err = parse(&ParserConfig::default(), "--limit --verbose", &options).unwrap_err();
        assert_eq!(
            err,
            ParseError::FlagArgumentShortfall {
                flag: "limit".into(),
                expected: 1,
                found: 0,
            }
        );
    }

    #[test]
    fn test_short_flags_and_case_folding() {
        let options = opts(vec![
            OptionSchema::flag("verbose").with_short_name("v"),
            OptionSchema::argument("file").with_words(0, 1),
        ]);
        let bound = parse(&ParserConfig::default(), "-V notes.txt", &options).unwrap();
        assert!(bound.iter().any(|b| b.answers_to("verbose")));
        assert_eq!(find(&bound, "file").raw_words(), ["notes.txt"]);

        let sensitive = ParserConfig::default().with_case_sensitive(true);
        let err = parse(&sensitive, "-V notes.txt", &options).unwrap_err();
        assert_eq!(
            err,
            ParseError::ExcessArguments(vec!["notes.txt".into()])
        );
    }

    #[test]
    fn test_separator_splits_flag_token() {
        let options = opts(vec![
            OptionSchema::flag("name")
                .with_words(1, 1)
                .with_separator("=")
                .with_separator_alias(":"),
        ]);
        let bound = parse(&ParserConfig::default(), "--name=bob", &options).unwrap();
        assert_eq!(find(&bound, "name").raw_words(), ["bob"]);

        let bound = parse(&ParserConfig::default(), "--name:alice", &options).unwrap();
        assert_eq!(find(&bound, "name").raw_words(), ["alice"]);
    }

    #[test]
    fn test_arguments_distribute_in_declaration_order() {
        let options = opts(vec![
            OptionSchema::argument("from").with_words(1, 1).required(),
            OptionSchema::argument("to").with_words(1, 1).required(),
            OptionSchema::argument("message").with_words(1, 20),
        ]);
        let bound = parse(
            &ParserConfig::default(),
            "alice bob \"see you\" soon",
            &options,
        )
        .unwrap();
        assert_eq!(find(&bound, "from").raw_words(), ["alice"]);
        assert_eq!(find(&bound, "to").raw_words(), ["bob"]);
        assert_eq!(find(&bound, "message").raw_words(), ["see you", "soon"]);
        assert_eq!(
            find(&bound, "message").value(),
            Some(Value::from("see you soon"))
        );
    }

    #[test]
    fn test_excess_arguments() {
        let options = opts(vec![OptionSchema::argument("one").with_words(1, 1)]);
        let err = parse(&ParserConfig::default(), "a b c", &options).unwrap_err();
        assert_eq!(
            err,
            ParseError::ExcessArguments(vec!["b".into(), "c".into()])
        );

        let lenient = ParserConfig::default().with_allow_too_many_args(true);
        let bound = parse(&lenient, "a b c", &options).unwrap();
        assert_eq!(find(&bound, "one").raw_words(), ["a"]);
    }

    #[test]
    fn test_unfilled_optional_argument_keeps_default() {
        let options = opts(vec![
            OptionSchema::argument("count")
                .with_words(1, 1)
                .with_data_type(DataType::Integer)
                .with_default(3),
        ]);
        let bound = parse(&ParserConfig::default(), "", &options).unwrap();
        let count = find(&bound, "count");
        assert!(count.is_empty());
        assert_eq!(count.value_or_default(), Value::Integer(3));
    }

    #[test]
    fn test_missing_required_argument() {
        let options = opts(vec![
            OptionSchema::argument("name").with_words(1, 1).required(),
        ]);
        let err = parse(&ParserConfig::default(), "", &options).unwrap_err();
        assert_eq!(
            err,
            ParseError::OptionWordCountOutOfBounds {
                option: "name".into(),
                words: 0,
                min: 1,
                max: 1,
            }
        );
    }

    #[test]
    fn test_length_bounds() {
        let options = opts(vec![
            OptionSchema::argument("nick")
                .with_words(1, 1)
                .with_length(2, Some(4))
                .required(),
        ]);
        assert!(parse(&ParserConfig::default(), "bob", &options).is_ok());
        let err = parse(&ParserConfig::default(), "robert", &options).unwrap_err();
        assert_eq!(
            err,
            ParseError::OptionLengthOutOfBounds {
                option: "nick".into(),
                length: 6,
                min: 2,
                max: Some(4),
            }
        );
    }

    #[test]
    fn test_choices_replace_length_bounds() {
        let options = opts(vec![
            OptionSchema::argument("format")
                .with_words(1, 1)
                .with_length(10, Some(10))
                .with_choices(["json", "yaml"])
                .required(),
        ]);
        assert!(parse(&ParserConfig::default(), "json", &options).is_ok());
        let err = parse(&ParserConfig::default(), "xml", &options).unwrap_err();
        assert_eq!(
            err,
            ParseError::OptionValueRejected {
                option: "format".into(),
                value: "xml".into(),
            }
        );
    }

    #[test]
    fn test_pattern_rejects_value() {
        let options = opts(vec![
            OptionSchema::argument("id")
                .with_words(1, 1)
                .with_pattern(Pattern::new("^[0-9]+$").unwrap()),
        ]);
        assert!(parse(&ParserConfig::default(), "42", &options).is_ok());
        assert!(matches!(
            parse(&ParserConfig::default(), "4x2", &options),
            Err(ParseError::OptionValueRejected { .. })
        ));
    }

    #[test]
    fn test_permissive_drops_offending_option() {
        let config = ParserConfig::default().with_error_mode(ErrorMode::Permissive);
        let options = opts(vec![
            OptionSchema::argument("format")
                .with_words(1, 1)
                .with_choices(["json"]),
            OptionSchema::flag("limit").with_words(1, 1),
        ]);
        let mut diag = Diagnostics::new(config.error_mode);
        let bound = OptionParser::new(&config)
            .parse_line("xml extra --limit", &options, &mut diag)
            .unwrap();
        assert!(bound.is_empty());
        let errors = diag.into_errors();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ParseError::FlagArgumentShortfall { .. }));
        assert!(matches!(errors[1], ParseError::OptionValueRejected { .. }));
        assert_eq!(errors[2], ParseError::ExcessArguments(vec!["extra".into()]));
    }
}
