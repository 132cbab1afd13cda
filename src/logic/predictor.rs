//! Price Predictor - encode -> predict -> round
//!
//! Holds the schema and model by shared immutable reference. Built once
//! at startup, then handed to every request handler.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::constants::PREDICTION_DECIMALS;
use crate::error::{PredictError, PredictResult};
use crate::logic::features::{FeatureEncoder, FeatureVector, RawInput, Schema, SchemaLoadError};
use crate::logic::model::{ModelError, Regressor};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Rounded estimate shown to the user
    pub price: f64,
    /// Model output before rounding
    pub raw_price: f64,
    pub layout_hash: u32,
    pub inference_time_us: u64,
}

/// Predictor status for diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorStatus {
    pub model_name: String,
    pub feature_count: usize,
    pub layout_hash: u32,
    pub prediction_count: u64,
    pub rejected_count: u64,
    pub failed_count: u64,
    pub avg_latency_ms: f32,
}

#[derive(Debug, Default)]
struct Counters {
    latency_sum_us: AtomicU64,
    predictions: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
}

// ============================================================================
// PREDICTOR
// ============================================================================

pub struct PricePredictor {
    encoder: FeatureEncoder,
    model: Arc<dyn Regressor>,
    counters: Counters,
}

impl PricePredictor {
    /// Pair a loaded schema with a model. A model that declares its own
    /// feature list must agree with the schema column for column.
    pub fn new(schema: Arc<Schema>, model: Arc<dyn Regressor>) -> Result<Self, SchemaLoadError> {
        if let Some(names) = model.feature_names() {
            schema.ensure_matches(names)?;
        }

        tracing::info!(
            model = model.name(),
            features = schema.len(),
            "Price predictor ready"
        );

        Ok(Self {
            encoder: FeatureEncoder::new(schema),
            model,
            counters: Counters::default(),
        })
    }

    pub fn schema(&self) -> &Schema {
        self.encoder.schema()
    }

    /// Encode without predicting
    pub fn encode(&self, raw: &RawInput) -> PredictResult<FeatureVector> {
        self.encoder.encode(raw).map_err(|e| {
            self.counters.rejected.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(error = %e, "Rejected estimate input");
            PredictError::from(e)
        })
    }

    /// Full pipeline for one request. Input errors never reach the model.
    pub fn predict(&self, raw: &RawInput) -> PredictResult<Prediction> {
        let vector = self.encode(raw)?;
        self.predict_vector(&vector)
    }

    /// Run the model on an already-encoded vector
    pub fn predict_vector(&self, vector: &FeatureVector) -> PredictResult<Prediction> {
        vector.validate_against(self.schema()).map_err(|e| {
            self.counters.failed.fetch_add(1, Ordering::Relaxed);
            tracing::error!("Error in prediction: {}", e);
            PredictError::from(e)
        })?;

        let start = Instant::now();
        let result = self.model.predict(vector.as_slice()).and_then(|value| {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(ModelError::NonFinite(value))
            }
        });
        let elapsed_us = start.elapsed().as_micros() as u64;

        let raw_price = result.map_err(|e| {
            self.counters.failed.fetch_add(1, Ordering::Relaxed);
            tracing::error!("Error in prediction: {}", e);
            PredictError::from(e)
        })?;

        // Track metrics
        self.counters.latency_sum_us.fetch_add(elapsed_us, Ordering::Relaxed);
        self.counters.predictions.fetch_add(1, Ordering::Relaxed);

        let price = round_price(raw_price);
        tracing::debug!(price, inference_time_us = elapsed_us, "Prediction complete");

        Ok(Prediction {
            price,
            raw_price,
            layout_hash: vector.layout_hash,
            inference_time_us: elapsed_us,
        })
    }

    pub fn status(&self) -> PredictorStatus {
        let sum = self.counters.latency_sum_us.load(Ordering::Relaxed);
        let count = self.counters.predictions.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        PredictorStatus {
            model_name: self.model.name().to_string(),
            feature_count: self.schema().len(),
            layout_hash: self.schema().fingerprint(),
            prediction_count: count,
            rejected_count: self.counters.rejected.load(Ordering::Relaxed),
            failed_count: self.counters.failed.load(Ordering::Relaxed),
            avg_latency_ms: avg,
        }
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Round to the displayed precision (2 decimals)
pub fn round_price(value: f64) -> f64 {
    let scale = 10f64.powi(PREDICTION_DECIMALS);
    (value * scale).round() / scale
}

// ============================================================================
// TESTS
// ============================================================================
