//! `nestql.config.toml` loading.
//!
//! ```toml
//! dialect = "sqlite"
//! schema = "schema.toml"
//! database = "./dev.db"
//! ```
//!
//! Relative paths are resolved against the directory holding the config file.

use std::path::{Path, PathBuf};

use nestql::{Dialect, Schema};
use serde::Deserialize;

/// Default config file name
pub const CONFIG_FILE: &str = "nestql.config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub dialect: Dialect,
    /// Path of the TOML schema file.
    pub schema: PathBuf,
    /// SQLite file path or PostgreSQL connection string.
    #[serde(default)]
    pub database: Option<String>,
    #[serde(skip)]
    root: PathBuf,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub dialect: Option<Dialect>,
    pub schema: Option<PathBuf>,
    pub database: Option<String>,
}

impl Config {
    pub fn new(dialect: Dialect, schema: impl Into<PathBuf>) -> Self {
        Self {
            dialect,
            schema: schema.into(),
            database: None,
            root: PathBuf::new(),
        }
    }

    /// Load from the default config file
    pub fn load() -> Result<Self, Error> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.into())
            } else {
                Error::Io(path.into(), e)
            }
        })?;

        let mut config: Self =
            toml::from_str(&content).map_err(|e| Error::Parse(path.into(), e))?;
        config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    /// Picks the config for one invocation: an explicit `--config`, else
    /// `nestql.config.toml` when present, else the overrides alone when they
    /// name a schema. Overrides are applied last.
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<Self, Error> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None if Path::new(CONFIG_FILE).exists() => Self::load()?,
            None => match &overrides.schema {
                Some(schema) => Self::new(Dialect::default(), schema.clone()),
                None => return Err(Error::NotFound(CONFIG_FILE.into())),
            },
        };

        if let Some(dialect) = overrides.dialect {
            config.dialect = dialect;
        }
        if let Some(schema) = &overrides.schema {
            // command-line paths are relative to the working directory
            config.schema = std::path::absolute(schema).unwrap_or_else(|_| schema.clone());
        }
        if let Some(database) = &overrides.database {
            config.database = Some(database.clone());
        }
        Ok(config)
    }

    pub fn schema_path(&self) -> PathBuf {
        self.root.join(&self.schema)
    }

    /// Database location; SQLite paths are resolved like the schema path.
    pub fn database(&self) -> Result<String, Error> {
        let database = self.database.as_deref().ok_or(Error::MissingDatabase)?;
        Ok(match self.dialect {
            Dialect::SQLite if database != ":memory:" => {
                self.root.join(database).to_string_lossy().into_owned()
            }
            _ => database.to_string(),
        })
    }

    pub fn load_schema(&self) -> Result<Schema, Error> {
        let path = self.schema_path();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::SchemaNotFound(path.clone())
            } else {
                Error::Io(path.clone(), e)
            }
        })?;
        Schema::from_toml(&content).map_err(|e| Error::Parse(path, e))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("schema not found: {}", .0.display())]
    SchemaNotFound(PathBuf),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("no database configured; set `database` or pass --database")]
    MissingDatabase,
}

pub type ConfigError = Error;
