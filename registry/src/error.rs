//! Error types for registry operations.
//!
//! Covers every way loading a command tree can fail: I/O, serialization,
//! unknown file formats, and schema validation.

use std::path::PathBuf;

use command_parser_core::ValidationError;
use thiserror::Error;

/// Errors that can occur while loading or saving a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The loaded command tree failed schema validation.
    #[error("invalid command tree: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),

    /// The file extension is not `.json`, `.yaml` or `.yml`.
    #[error("unsupported registry format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// All configured loader sources failed.
    #[error("no registry sources available")]
    NoSourcesAvailable,
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias for results with [`RegistryError`].
pub type Result<T> = std::result::Result<T, RegistryError>;
