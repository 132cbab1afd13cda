//! Model Module - Prediction capability
//!
//! The encoder never knows what kind of regressor sits behind
//! [`Regressor`]; it only guarantees column order and completeness.

pub mod regressor;
pub mod linear;

// Re-export common types
pub use regressor::{ModelError, ModelMetadata, Regressor};
pub use linear::LinearRegressor;
