//! Used-car price estimator core
//!
//! Turns human-entered listing attributes into the exact feature vector a
//! trained regressor expects, then asks the regressor for a price.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌───────────────────────────┐   ┌─────────────┐
//! │  RawInput  │──▶│  FeatureEncoder           │──▶│  Regressor  │──▶ price (2dp)
//! │  (strings) │   │  parse → check → one-hot  │   │  (any)      │
//! └────────────┘   └─────────────┬─────────────┘   └─────────────┘
//!                                │ reads
//!                         ┌──────▼──────┐
//!                         │   Schema    │  literal | artifact | model
//!                         └─────────────┘
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logic;

pub use error::{PredictError, PredictResult};
pub use logic::features::{
    encode, EncodeError, FeatureEncoder, FeatureVector, InputParseError, InputValidationError,
    RawInput, Schema, SchemaLoadError, SchemaSource,
};
pub use logic::model::{LinearRegressor, ModelError, Regressor};
pub use logic::predictor::{Prediction, PricePredictor};
