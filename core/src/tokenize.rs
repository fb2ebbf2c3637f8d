//! Quote- and escape-aware splitting of a command line into word tokens.
//!
//! A token is either a maximal run of non-whitespace characters or a
//! double-quoted span (`"a b"`) that may contain escaped quotes (`\"`).
//! After the boundaries are found, every quote not preceded by a backslash
//! is dropped and every backslash is dropped, so `\"` survives as a literal
//! `"` and the backslash never appears in the output.
//!
//! # Examples
//!
//! ```
//! use command_parser_core::tokenize;
//!
//! assert_eq!(tokenize(r#""a b" c"#), vec!["a b", "c"]);
//! assert_eq!(tokenize(r#"\"a b\""#), vec![r#""a"#, r#"b""#]);
//! assert!(tokenize(r#""""#).is_empty());
//! ```

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Token boundary matcher. Alternatives are tried in order:
///
/// 1. a non-space run ending in one or more backslashes and a quote (`abc\"`)
/// 2. a run starting with an escaped quote (`\"abc`)
/// 3. a run with no quotes at all
/// 4. a quoted span whose closing quote is not escaped
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^\s]+(?:\\)+"|(?:\\)"[^"\s]*|[^"\s]+|"(?:\\"|[^"])*(?:[^\\"]")"#)
        .expect("static regex must compile")
});

/// Splits `line` into word tokens.
///
/// Pure and total: unbalanced quotes degrade to literal text instead of
/// failing, and empty quotes (`""`) produce no token.
pub fn tokenize(line: &str) -> Vec<String> {
    TOKEN
        .find_iter(line)
        .map(|m| unescape(m.as_str()))
        .filter(|token| !token.is_empty())
        .collect()
}

/// Re-joins tokens into a single line, quoting any token that contains
/// whitespace so that [`tokenize`] yields the same tokens back.
pub fn join_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|t| quote_word(t.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wraps `word` in double quotes when it contains whitespace.
pub fn quote_word(word: &str) -> Cow<'_, str> {
    if word.chars().any(char::is_whitespace) {
        Cow::Owned(format!("\"{word}\""))
    } else {
        Cow::Borrowed(word)
    }
}

/// Drops unescaped quotes, then every backslash.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev = None;

    for ch in raw.chars() {
        match ch {
            '"' if prev != Some('\\') => {}
            '\\' => {}
            other => out.push(other),
        }
        prev = Some(ch);
    }

    out
}
