//! Loading registered command trees and parser settings from files.
//!
//! A registry pairs a [`CommandSet`](command_parser_core::CommandSet) with the
//! [`ParserConfig`](command_parser::ParserConfig) it is parsed with. Every
//! tree is validated on load, so a [`CommandRegistry`] always holds a tree
//! without colliding names or impossible bounds.
//!
//! # Quick start
//!
//! ```no_run
//! use command_parser_registry::CommandRegistry;
//!
//! let registry = CommandRegistry::from_file("bot.yaml").unwrap();
//! let parser = registry.parser();
//!
//! let result = parser.parse("!user add bob").unwrap();
//! if let Some(handler) = result.handler() {
//!     println!("dispatching to {handler}");
//! }
//! ```

mod config;
mod error;
mod loader;

pub use config::{FileFormat, RegistryFile};
pub use error::{RegistryError, Result};
pub use loader::{CommandRegistry, RegistryBuilder, RegistrySource};
