//! Regressor boundary
//!
//! Any trained model (tree ensemble, forest, linear) plugs in here.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read model {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model: {0}")]
    Invalid(String),

    #[error("model expects {expected} features, got {actual}")]
    InputWidth { expected: usize, actual: usize },

    #[error("model returned a non-finite prediction: {0}")]
    NonFinite(f64),

    #[error("inference failed: {0}")]
    Inference(String),
}

// ============================================================================
// METADATA
// ============================================================================

/// Model metadata, recorded at load time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,
    pub features: usize,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

// ============================================================================
// REGRESSOR TRAIT
// ============================================================================

/// Trained model that maps a schema-ordered vector to a price
pub trait Regressor: Send + Sync {
    fn name(&self) -> &str;

    /// Training column order, when the model carries it
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    fn metadata(&self) -> Option<&ModelMetadata> {
        None
    }

    fn predict(&self, features: &[f64]) -> Result<f64, ModelError>;
}
