//! Feature Vector - Model input in schema order
//!
//! **Fingerprinted feature vector with layout validation**
//!
//! Every vector remembers the fingerprint of the schema it was built
//! against, so a vector from one layout can never be fed to a model
//! expecting another.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::schema::{LayoutMismatchError, Schema};

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Feature values in schema order, plus the layout they belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// CRC32 fingerprint of the schema (for mismatch detection)
    pub layout_hash: u32,
    /// One value per schema column, same order
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// All-zero vector for a schema
    pub fn zeroed(schema: &Schema) -> Self {
        Self {
            layout_hash: schema.fingerprint(),
            values: vec![0.0; schema.len()],
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Get feature by name
    pub fn get_by_name(&self, schema: &Schema, name: &str) -> Option<f64> {
        schema.index_of(name).and_then(|i| self.get(i))
    }

    /// Set feature by index; out of range is a no-op
    pub fn set(&mut self, index: usize, value: f64) -> bool {
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Set feature by name; names outside the schema are ignored
    pub fn set_by_name(&mut self, schema: &Schema, name: &str, value: f64) -> bool {
        match schema.index_of(name) {
            Some(index) => self.set(index, value),
            None => false,
        }
    }

    /// Check this vector was built for `schema`
    pub fn validate_against(&self, schema: &Schema) -> Result<(), LayoutMismatchError> {
        schema.validate_layout(self.layout_hash, self.values.len())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self, schema: &Schema) -> serde_json::Value {
        serde_json::json!({
            "layout_hash": format!("{:08x}", self.layout_hash),
            "values": self.values,
            "named_values": schema.as_ordered_list()
                .iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.as_str(), *value))
                .collect::<BTreeMap<_, _>>(),
        })
    }
}

// ============================================================================
// FEATURE EXTRACTOR TRAIT
// ============================================================================

/// Writes one family of columns into a vector
pub trait FeatureExtractor {
    fn extract(&self, schema: &Schema, vector: &mut FeatureVector);
}

// ============================================================================
// TESTS
// ============================================================================
