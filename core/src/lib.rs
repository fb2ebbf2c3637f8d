//! Core types for quote-aware command line parsing.
//!
//! This crate defines the building blocks the parser works with:
//!
//! - [`tokenize`]: quote- and escape-aware splitting of a raw line into
//!   word tokens.
//! - [`OptionSchema`]: the declarative shape of a flag or positional
//!   argument: names, surface syntax, word-count and length bounds, data
//!   type, default, choices, and validation pattern.
//! - [`BoundOption`]: a per-parse instance of an option holding the words
//!   captured for it.
//! - [`CommandNode`] / [`CommandSet`]: the registered command tree.
//! - [`CommandPath`]: the chain of commands resolved for one parse.
//!
//! Validation ([`validate_commands`]) catches structural defects in a
//! command tree such as colliding names and impossible bounds.
//!
//! # Example
//!
//! ```
//! use command_parser_core::*;
//!
//! let commands: CommandSet = [CommandNode::new("user")
//!     .with_subcommand(
//!         CommandNode::new("add")
//!             .with_option(OptionSchema::argument("name").with_words(1, 1).required())
//!             .with_option(OptionSchema::flag("admin").with_short_name("a")),
//!     )]
//! .into_iter()
//! .collect();
//!
//! assert!(validate_commands(&commands).is_empty());
//! assert_eq!(tokenize(r#"user add "Bob Smith" -a"#), vec!["user", "add", "Bob Smith", "-a"]);
//! ```

mod command;
mod option;
mod tokenize;
mod types;
mod validate;

pub use command::{CommandNode, CommandPath, CommandSet};
pub use option::{BoundOption, FlagSyntax, OptionSchema};
pub use tokenize::{join_tokens, quote_word, tokenize};
pub use types::{DataType, OptionKind, Pattern, Value};
pub use validate::{ValidationError, validate_command, validate_commands};
