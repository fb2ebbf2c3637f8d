//! Output formatting for parse results.

use serde::{Deserialize, Serialize};

use command_parser_core::{BoundOption, Value};

use crate::result::ParseResult;

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Text,
}

/// Serializable summary of a [`ParseResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseReport {
    pub line: String,
    pub valid: bool,
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<OptionReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<OptionReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// One bound option in a [`ParseReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionReport {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub words: Vec<String>,
    pub value: Value,
}

impl From<&BoundOption> for OptionReport {
    fn from(option: &BoundOption) -> Self {
        Self {
            name: option.name().to_string(),
            words: option.raw_words().to_vec(),
            value: option.value_or_default(),
        }
    }
}

impl From<&ParseResult> for ParseReport {
    fn from(result: &ParseResult) -> Self {
        Self {
            line: result.raw().to_string(),
            valid: result.is_valid(),
            command: result
                .path()
                .names()
                .into_iter()
                .map(String::from)
                .collect(),
            handler: result.handler().map(String::from),
            flags: result.flags().map(OptionReport::from).collect(),
            arguments: result.arguments().map(OptionReport::from).collect(),
            errors: result.errors().iter().map(ToString::to_string).collect(),
        }
    }
}

/// Formats a parse result in the requested output format.
pub fn format_result(result: &ParseResult, format: OutputFormat) -> Result<String, String> {
    let report = ParseReport::from(result);
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(&report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Text => Ok(report_to_text(result, &report)),
    }
}

fn report_to_text(result: &ParseResult, report: &ParseReport) -> String {
    let mut out = String::new();

    if !report.valid {
        out.push_str("not a command\n");
    } else {
        out.push_str(&format!("{result}\n"));
        out.push_str(&format!("  command: {}\n", report.command.join(" ")));
        if let Some(ref handler) = report.handler {
            out.push_str(&format!("  handler: {handler}\n"));
        }
        for flag in &report.flags {
            out.push_str(&format!("  flag {}: {}\n", flag.name, flag.value));
        }
        for arg in &report.arguments {
            out.push_str(&format!("  argument {}: {}\n", arg.name, arg.value));
        }
    }

    for err in &report.errors {
        out.push_str(&format!("  error: {err}\n"));
    }

    out
}
