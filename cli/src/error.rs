//! Error types for the CLI

use nestql::error::NestqlError;
use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Filter parsing, compilation, execution or materialization failed
    #[error(transparent)]
    Query(#[from] NestqlError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),

    /// The schema references entities it does not define
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
