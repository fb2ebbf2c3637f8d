//! Prefix-driven parsing of free-form lines into command invocations.
//!
//! A [`CommandParser`] turns a line such as `!user add "Bob Smith" --admin`
//! into a [`ParseResult`]: the resolved command path (`user add`), the bound
//! flags and positional arguments, and the handler key of the deepest
//! command. Lines that do not carry the command prefix are not commands and
//! parse to an empty result.
//!
//! The pipeline has three stages, each usable on its own:
//!
//! - [`tokenize`](command_parser_core::tokenize) splits the line into words,
//!   honoring quotes and escapes.
//! - [`CommandResolver`] consumes the leading command tokens.
//! - [`OptionParser`] binds the rest to the command's flags and arguments and
//!   validates them.
//!
//! Failures are reported per [`ErrorMode`]: strict parsing stops at the first
//! [`ParseError`], permissive parsing records every failure on the result.
//!
//! # Example
//!
//! ```
//! use command_parser::{CommandParser, ErrorMode, ParserConfig};
//! use command_parser_core::{CommandNode, CommandSet, OptionSchema};
//!
//! let commands: CommandSet = [CommandNode::new("user").with_subcommand(
//!     CommandNode::new("add")
//!         .with_handler("user.add")
//!         .with_option(OptionSchema::argument("name").with_words(1, 2).required())
//!         .with_option(OptionSchema::flag("admin").with_short_name("a")),
//! )]
//! .into_iter()
//! .collect();
//!
//! let parser = CommandParser::new(commands, ParserConfig::default().with_command_prefix("!"));
//! let result = parser.parse(r#"!user add "Bob Smith" -a"#).unwrap();
//!
//! assert_eq!(result.path().names(), vec!["user", "add"]);
//! assert_eq!(result.handler(), Some("user.add"));
//! assert!(result.has_flag("admin"));
//! assert_eq!(result.argument("name").unwrap().raw_words(), ["Bob Smith"]);
//!
//! // strict mode stops at the first failure
//! assert!(parser.parse("!user remove bob").is_err());
//!
//! // permissive mode records it instead
//! let lenient = CommandParser::new(
//!     parser.commands().clone(),
//!     parser.config().clone().with_error_mode(ErrorMode::Permissive),
//! );
//! let result = lenient.parse("!user remove bob").unwrap();
//! assert_eq!(result.errors().len(), 1);
//! ```

mod config;
mod error;
mod options;
mod output;
mod parser;
mod resolve;
mod result;

pub use config::{ErrorMode, ParserConfig};
pub use error::{Diagnostics, ParseError};
pub use options::OptionParser;
pub use output::{OptionReport, OutputFormat, ParseReport, format_result};
pub use parser::CommandParser;
pub use resolve::CommandResolver;
pub use result::ParseResult;
