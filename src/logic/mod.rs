//! Logic Module - Encoding & Inference
//!
//! - `features/` - Schema registry and feature encoding
//! - `model/` - Regressor boundary
//! - `predictor` - Encode -> predict -> round pipeline

pub mod features;
pub mod model;
pub mod predictor;
