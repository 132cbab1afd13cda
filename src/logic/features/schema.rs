//! Feature Schema - Authoritative column layout of the trained model
//!
//! **CRITICAL: the schema is the contract with the regressor**
//!
//! ## Rules (NEVER break these):
//! 1. Order is the training column order, never re-sort it
//! 2. Names are unique
//! 3. Loaded once at startup, read-only afterwards
//!
//! The layout can come from three places (a literal list, a JSON side
//! artifact, or the model itself). All of them go through [`Schema::load`]
//! so downstream code never cares where the names came from.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::constants::{DEFAULT_FEATURES, ONE_HOT_GROUPS};
use crate::logic::model::Regressor;

// ============================================================================
// ERRORS
// ============================================================================

/// Schema could not be built. Fatal at startup.
#[derive(Debug, Error)]
pub enum SchemaLoadError {
    #[error("feature schema is empty")]
    Empty,

    #[error("duplicate feature `{name}` at positions {first} and {second}")]
    Duplicate {
        name: String,
        first: usize,
        second: usize,
    },

    #[error("feature list must be a sequence of names, found {found}")]
    NotASequence { found: &'static str },

    #[error("feature name at position {index} must be a string, found {found}")]
    NonStringEntry { index: usize, found: &'static str },

    #[error("model `{model}` does not expose its feature names")]
    NoModelFeatures { model: String },

    #[error("model features do not match schema: expected {expected} columns, got {actual} (first difference at {first_difference:?})")]
    ModelMismatch {
        expected: usize,
        actual: usize,
        first_difference: Option<usize>,
    },

    #[error("failed to read schema artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema artifact {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A vector was built against a different layout than the one in use
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Feature layout mismatch: expected {expected_count} features (hash: {expected_hash:08x}), got {actual_count} (hash: {actual_hash:08x})")]
pub struct LayoutMismatchError {
    pub expected_hash: u32,
    pub expected_count: usize,
    pub actual_hash: u32,
    pub actual_count: usize,
}

// ============================================================================
// SOURCES
// ============================================================================

/// Where the ordered feature names come from
pub enum SchemaSource<'a> {
    /// Names given directly, e.g. baked into configuration
    Literal(Vec<String>),
    /// JSON side artifact on disk
    Artifact(PathBuf),
    /// Already-parsed side artifact
    ArtifactJson(Value),
    /// Names read off an already-loaded model
    Model(&'a dyn Regressor),
}

impl SchemaSource<'_> {
    /// The layout the deployed model was trained with
    pub fn builtin() -> Self {
        SchemaSource::Literal(DEFAULT_FEATURES.iter().map(|s| s.to_string()).collect())
    }

    fn origin(&self) -> &'static str {
        match self {
            SchemaSource::Literal(_) => "literal",
            SchemaSource::Artifact(_) | SchemaSource::ArtifactJson(_) => "artifact",
            SchemaSource::Model(_) => "model",
        }
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Ordered, de-duplicated feature names in training column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    names: Vec<String>,
    index: HashMap<String, usize>,
    fingerprint: u32,
}

impl Schema {
    /// Normalize any schema source into one validated layout
    pub fn load(source: SchemaSource<'_>) -> Result<Self, SchemaLoadError> {
        let origin = source.origin();

        let names = match source {
            SchemaSource::Literal(names) => names,
            SchemaSource::Artifact(path) => read_artifact(&path)?,
            SchemaSource::ArtifactJson(value) => names_from_json(value)?,
            SchemaSource::Model(model) => model
                .feature_names()
                .map(<[String]>::to_vec)
                .ok_or_else(|| SchemaLoadError::NoModelFeatures {
                    model: model.name().to_string(),
                })?,
        };

        let schema = Self::from_names(names)?;

        tracing::info!(
            origin,
            features = schema.len(),
            fingerprint = %format!("{:08x}", schema.fingerprint),
            "Feature schema loaded"
        );

        Ok(schema)
    }

    /// Build from a JSON document (array of names, or `{"feature_names": [...]}`)
    pub fn from_json_str(text: &str) -> Result<Self, SchemaLoadError> {
        let value: Value = serde_json::from_str(text).map_err(|source| SchemaLoadError::Json {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        Self::load(SchemaSource::ArtifactJson(value))
    }

    fn from_names(names: Vec<String>) -> Result<Self, SchemaLoadError> {
        if names.is_empty() {
            return Err(SchemaLoadError::Empty);
        }

        let mut index = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            if let Some(&first) = index.get(name.as_str()) {
                return Err(SchemaLoadError::Duplicate {
                    name: name.clone(),
                    first,
                    second: position,
                });
            }
            index.insert(name.clone(), position);
        }

        let fingerprint = compute_fingerprint(&names);

        Ok(Self {
            names,
            index,
            fingerprint,
        })
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn as_ordered_list(&self) -> &[String] {
        &self.names
    }

    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false for a loaded schema
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// CRC32 over the names in order
    pub fn fingerprint(&self) -> u32 {
        self.fingerprint
    }

    /// Positions of every `<group>_*` column
    pub fn group_indices(&self, group: &str) -> Vec<usize> {
        let prefix = format!("{group}_");
        self.names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.starts_with(&prefix))
            .map(|(i, _)| i)
            .collect()
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// A model's own feature list must equal the schema exactly
    pub fn ensure_matches(&self, names: &[String]) -> Result<(), SchemaLoadError> {
        if names == self.names.as_slice() {
            return Ok(());
        }

        let first_difference = self
            .names
            .iter()
            .zip(names)
            .position(|(a, b)| a != b)
            .or_else(|| Some(self.names.len().min(names.len())));

        Err(SchemaLoadError::ModelMismatch {
            expected: self.names.len(),
            actual: names.len(),
            first_difference,
        })
    }

    /// Check a vector's recorded layout against this schema
    pub fn validate_layout(&self, hash: u32, count: usize) -> Result<(), LayoutMismatchError> {
        if hash != self.fingerprint || count != self.names.len() {
            return Err(LayoutMismatchError {
                expected_hash: self.fingerprint,
                expected_count: self.names.len(),
                actual_hash: hash,
                actual_count: count,
            });
        }
        Ok(())
    }

    pub fn info(&self) -> SchemaInfo {
        let groups = ONE_HOT_GROUPS
            .iter()
            .map(|group| (group.to_string(), self.group_indices(group).len()))
            .collect();

        SchemaInfo {
            fingerprint: self.fingerprint,
            feature_count: self.names.len(),
            feature_names: self.names.clone(),
            groups,
        }
    }
}

// ============================================================================
// SCHEMA INFO
// ============================================================================

/// Layout snapshot for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub fingerprint: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
    /// One-hot group -> number of columns in the schema
    pub groups: BTreeMap<String, usize>,
}

// ============================================================================
// HELPERS
// ============================================================================

fn compute_fingerprint(names: &[String]) -> u32 {
    let mut hasher = Hasher::new();
    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }
    hasher.finalize()
}

fn read_artifact(path: &Path) -> Result<Vec<String>, SchemaLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| SchemaLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_json::from_str(&text).map_err(|source| SchemaLoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    names_from_json(value)
}

fn names_from_json(value: Value) -> Result<Vec<String>, SchemaLoadError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("feature_names") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(SchemaLoadError::NotASequence {
                    found: json_kind(&other),
                })
            }
            None => return Err(SchemaLoadError::NotASequence { found: "object" }),
        },
        other => {
            return Err(SchemaLoadError::NotASequence {
                found: json_kind(&other),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(name) => Ok(name),
            other => Err(SchemaLoadError::NonStringEntry {
                index,
                found: json_kind(&other),
            }),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// TESTS
// ============================================================================
