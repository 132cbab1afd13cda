//! Configuration module

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::logic::features::SchemaSource;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("SCHEMA_FROM_MODEL requires MODEL_PATH")]
    SchemaFromModelWithoutModel,

    #[error("SCHEMA_PATH and SCHEMA_FROM_MODEL are mutually exclusive")]
    ConflictingSchemaSources,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Which schema source startup should use
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaOrigin {
    /// Compiled-in training layout
    Builtin,
    /// JSON side artifact
    Artifact(PathBuf),
    /// Names carried by the loaded model
    Model,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON feature-list artifact
    pub schema_path: Option<PathBuf>,

    /// Model file
    pub model_path: Option<PathBuf>,

    /// Take the schema from the model instead of a list
    pub schema_from_model: bool,

    /// Log format (text, json)
    pub log_format: LogFormat,

    /// Environment (development, production)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_path: None,
            model_path: None,
            schema_from_model: false,
            log_format: LogFormat::Text,
            environment: "development".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            schema_path: lookup("SCHEMA_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),

            model_path: lookup("MODEL_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),

            schema_from_model: lookup("SCHEMA_FROM_MODEL")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),

            log_format: lookup("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),

            environment: lookup("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Resolve the schema origin, rejecting contradictory settings
    pub fn schema_origin(&self) -> Result<SchemaOrigin, ConfigError> {
        match (&self.schema_path, self.schema_from_model) {
            (Some(_), true) => Err(ConfigError::ConflictingSchemaSources),
            (Some(path), false) => Ok(SchemaOrigin::Artifact(path.clone())),
            (None, true) if self.model_path.is_none() => Err(ConfigError::SchemaFromModelWithoutModel),
            (None, true) => Ok(SchemaOrigin::Model),
            (None, false) => Ok(SchemaOrigin::Builtin),
        }
    }
}

impl SchemaOrigin {
    /// Schema source for list-based origins; `None` for [`SchemaOrigin::Model`]
    pub fn list_source(&self) -> Option<SchemaSource<'static>> {
        match self {
            SchemaOrigin::Builtin => Some(SchemaSource::builtin()),
            SchemaOrigin::Artifact(path) => Some(SchemaSource::Artifact(path.clone())),
            SchemaOrigin::Model => None,
        }
    }
}
