//! Registry files: parser settings plus the command tree.
//!
//! The format is picked from the file extension (`.json`, `.yaml`, `.yml`).
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! parser:
//!   command_prefix: "!"
//!   error_mode: permissive
//! commands:
//!   - name: user
//!     subcommands:
//!       - name: add
//!         handler: user.add
//!         options:
//!           - kind: argument
//!             name: name
//!             min_words: 1
//!             max_words: 1
//!             is_required: true
//!           - kind: flag
//!             name: admin
//!             short_name: a
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use command_parser::ParserConfig;
use command_parser_core::CommandSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// On-disk encoding of registry files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    /// Picks the format from `path`'s extension.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(RegistryError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Returns `true` if `path` has a registry file extension.
    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path).is_ok()
    }
}

/// A complete registry: parser settings and the root commands.
///
/// # Examples
///
/// ```
/// use command_parser_registry::RegistryFile;
///
/// let yaml = r#"
/// version: "1.0"
/// parser:
///   command_prefix: "!"
/// commands:
///   - name: ping
///     handler: ping
/// "#;
/// let file: RegistryFile = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(file.parser.command_prefix, "!");
/// assert!(file.commands.contains("ping"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryFile {
    /// Registry format version (e.g., `"1.0"`).
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub commands: CommandSet,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl RegistryFile {
    pub fn new(parser: ParserConfig, commands: CommandSet) -> Self {
        Self {
            version: default_version(),
            parser,
            commands,
        }
    }

    /// Loads a registry file without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](RegistryError::UnsupportedFormat) for an
    /// unknown extension, [`IoError`](RegistryError::IoError) if the file
    /// cannot be read, or a JSON/YAML error if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        read_file(path.as_ref())
    }

    /// Saves the registry in the format implied by `path`.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedFormat`](RegistryError::UnsupportedFormat) for an
    /// unknown extension, [`IoError`](RegistryError::IoError) if the file
    /// cannot be written, or a JSON/YAML error if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        match format {
            FileFormat::Json => serde_json::to_writer_pretty(writer, self)?,
            FileFormat::Yaml => serde_yaml::to_writer(writer, self)?,
        }
        Ok(())
    }
}

/// Reads any deserializable value from a JSON or YAML file.
pub(crate) fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = FileFormat::from_path(path)?;
    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let value = match format {
        FileFormat::Json => serde_json::from_reader(reader)?,
        FileFormat::Yaml => serde_yaml::from_reader(reader)?,
    };
    Ok(value)
}
