use thiserror::Error;

#[derive(Debug, Error)]
pub enum NestqlError {
    /// A predicate leaf uses an operator or operand shape that cannot be compiled
    #[error("Unsupported predicate on `{field}` with operator `{operator}`: {fragment}")]
    UnsupportedPredicate {
        field: String,
        operator: String,
        fragment: String,
    },

    /// The filter itself is malformed (empty boolean group, bad include, ...)
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A value cannot be formatted as a literal for its field
    #[error("Invalid literal for `{field}`: {reason}")]
    InvalidLiteral { field: String, reason: String },

    /// An ORDER BY entry is not `field [ASC|DESC]`
    #[error("Invalid order `{0}`, expected `field [ASC|DESC]`")]
    InvalidOrder(String),

    /// The schema provider does not know the entity
    #[error("Unknown entity `{0}`")]
    UnknownEntity(String),

    /// The entity has no relation with this name
    #[error("Unknown relation `{relation}` on entity `{entity}`")]
    UnknownRelation { entity: String, relation: String },

    /// The dialect adapter lacks a capability the compiler needs
    #[error("Unsupported backend `{dialect}`: {feature} is not available")]
    UnsupportedBackend {
        dialect: &'static str,
        feature: &'static str,
    },

    /// Error reported by the execution channel
    #[error("Execution error: {message}")]
    Execution {
        message: String,
        code: Option<String>,
    },

    /// The backend returned a payload that is not JSON
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// The payload is JSON but does not have the shape the filter implies
    #[error("Materialization error: {0}")]
    Materialize(String),

    /// Rusqlite specific errors
    #[cfg(feature = "rusqlite")]
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),

    /// tokio-postgres specific errors
    #[cfg(feature = "tokio-postgres")]
    #[error("Postgres error: {0}")]
    Postgres(#[from] tokio_postgres::Error),
}

impl NestqlError {
    /// Backend error code, when the execution channel supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            NestqlError::Execution { code, .. } => code.as_deref(),
            #[cfg(feature = "tokio-postgres")]
            NestqlError::Postgres(err) => err.code().map(|state| state.code()),
            _ => None,
        }
    }
}

/// Result type for compilation, execution and materialization
pub type Result<T> = std::result::Result<T, NestqlError>;
