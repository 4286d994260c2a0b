//! nestql CLI - compile and run nested filters from the command line
//!
//! # Configuration
//!
//! Create a `nestql.config.toml` in your project root (or run `nestql init`):
//!
//! ```toml
//! dialect = "sqlite"
//! schema = "schema.toml"
//! database = "./dev.db"
//! ```
//!
//! For PostgreSQL, `database` is a connection string:
//!
//! ```toml
//! dialect = "postgresql"
//! schema = "schema.toml"
//! database = "host=localhost user=postgres dbname=app"
//! ```
//!
//! # Commands
//!
//! - `nestql init` - Create a nestql.config.toml
//! - `nestql check` - Validate the config and the schema's relation graph
//! - `nestql compile <ENTITY> --filter <JSON>` - Print the SQL for a filter
//! - `nestql query <ENTITY> --filter <JSON>` - Run a filter and print the entities as JSON

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use config::{CONFIG_FILE, Config, Error as ConfigError, Overrides};
pub use error::CliError;
