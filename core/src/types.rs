//! Scalar building blocks shared by option schemas and bound values.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Runtime data type of an option value.
///
/// # Examples
///
/// ```
/// use command_parser_core::DataType;
///
/// assert_eq!(DataType::default(), DataType::String);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Raw text (the default).
    #[default]
    String,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
    /// Truthiness of the raw text.
    Boolean,
}

/// Distinguishes the two option shapes that share [`OptionSchema`](crate::OptionSchema).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Named option introduced by a prefixed token (`--name`, `-n`).
    Flag,
    /// Positional argument filled from unclaimed tokens.
    Argument,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => f.write_str("flag"),
            Self::Argument => f.write_str("argument"),
        }
    }
}

/// A typed option value.
///
/// Deserializes from any JSON/YAML scalar, so schema files may write
/// `default: 10` or `choices: [json, yaml]` directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Casts raw text to `data_type`.
    ///
    /// Never fails: numbers that do not parse become the type's zero value.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_parser_core::{DataType, Value};
    ///
    /// assert_eq!(Value::cast("42", DataType::Integer), Value::Integer(42));
    /// assert_eq!(Value::cast("abc", DataType::Integer), Value::Integer(0));
    /// assert_eq!(Value::cast("0", DataType::Boolean), Value::Boolean(false));
    /// assert_eq!(Value::cast("yes", DataType::Boolean), Value::Boolean(true));
    /// ```
    pub fn cast(text: &str, data_type: DataType) -> Self {
        match data_type {
            DataType::String => Self::String(text.to_string()),
            DataType::Integer => Self::Integer(text.trim().parse().unwrap_or(0)),
            DataType::Float => {
                let parsed: f64 = text.trim().parse().unwrap_or(0.0);
                Self::Float(if parsed.is_nan() { 0.0 } else { parsed })
            }
            DataType::Boolean => Self::Boolean(is_truthy(text)),
        }
    }

    /// Re-casts this value to `data_type` through its text form.
    pub fn cast_to(&self, data_type: DataType) -> Self {
        match (self, data_type) {
            (Self::Boolean(_), DataType::Boolean)
            | (Self::Integer(_), DataType::Integer)
            | (Self::Float(_), DataType::Float)
            | (Self::String(_), DataType::String) => self.clone(),
            (Self::Integer(i), DataType::Float) => Self::Float(*i as f64),
            _ => Self::cast(&self.to_string(), data_type),
        }
    }

    /// Returns `true` when this value can stand for a `data_type` value
    /// without collapsing to the zero fallback.
    pub fn fits(&self, data_type: DataType) -> bool {
        match (self, data_type) {
            (_, DataType::String) => true,
            (Self::Boolean(_), DataType::Boolean) => true,
            (Self::Integer(_), DataType::Integer | DataType::Float) => true,
            (Self::Float(_), DataType::Float) => true,
            (Self::String(s), DataType::Integer) => s.trim().parse::<i64>().is_ok(),
            (Self::String(s), DataType::Float) => s.trim().parse::<f64>().is_ok(),
            (Self::String(s), DataType::Boolean) => {
                matches!(s.to_ascii_lowercase().as_str(), "true" | "false" | "1" | "0")
            }
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

/// Empty text, `false` and `0` are false; anything else is true.
fn is_truthy(text: &str) -> bool {
    let trimmed = text.trim();
    !(trimmed.is_empty() || trimmed == "0" || trimmed.eq_ignore_ascii_case("false"))
}

/// A compiled validation pattern that serializes as its source text.
///
/// Matching is unanchored; write `^…$` to match the whole value.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compiles `source`.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error when `source` is not a valid pattern.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Self::new(&source).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_falls_back_to_zero() {
        assert_eq!(Value::cast("nope", DataType::Integer), Value::Integer(0));
        assert_eq!(Value::cast("nope", DataType::Float), Value::Float(0.0));
        assert_eq!(Value::cast("NaN", DataType::Float), Value::Float(0.0));
        assert_eq!(Value::cast(" 7 ", DataType::Integer), Value::Integer(7));
        assert_eq!(Value::cast("2.5", DataType::Float), Value::Float(2.5));
    }

    #[test]
    fn test_boolean_truthiness() {
        assert_eq!(Value::cast("", DataType::Boolean), Value::Boolean(false));
        assert_eq!(Value::cast("FALSE", DataType::Boolean), Value::Boolean(false));
        assert_eq!(Value::cast("on", DataType::Boolean), Value::Boolean(true));
    }

    #[test]
    fn test_cast_to_keeps_matching_values() {
        assert_eq!(
            Value::Integer(3).cast_to(DataType::Float),
            Value::Float(3.0)
        );
        assert_eq!(
            Value::from("12").cast_to(DataType::Integer),
            Value::Integer(12)
        );
        assert_eq!(
            Value::Integer(12).cast_to(DataType::String),
            Value::from("12")
        );
    }

    #[test]
    fn test_value_deserializes_from_scalars() {
        let values: Vec<Value> = serde_json::from_str(r#"[true, 3, 1.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Boolean(true),
                Value::Integer(3),
                Value::Float(1.5),
                Value::from("x"),
            ]
        );
    }

    #[test]
    fn test_fits() {
        assert!(Value::from("10").fits(DataType::Integer));
        assert!(!Value::from("ten").fits(DataType::Integer));
        assert!(Value::Integer(1).fits(DataType::Float));
        assert!(Value::Boolean(true).fits(DataType::String));
    }

    #[test]
    fn test_pattern_serde() {
        let pattern: Pattern = serde_json::from_str(r#""^[a-z]+$""#).unwrap();
        assert!(pattern.is_match("bob"));
        assert!(!pattern.is_match("Bob"));
        assert_eq!(serde_json::to_string(&pattern).unwrap(), r#""^[a-z]+$""#);
        assert!(serde_json::from_str::<Pattern>(r#""(""#).is_err());
    }
}
