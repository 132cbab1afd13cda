//! Features Module - Schema-exact Encoding Engine
//!
//! Turns loosely-typed form values into the numeric vector the trained
//! regressor expects. The schema decides length and column order, the
//! encoder only fills it in.
//!
//! - `schema` - Ordered feature names, loaded once (literal, artifact, model)
//! - `input` - Raw request fields, parsing and range checks
//! - `vector` - Fingerprinted feature vector
//! - `encoder` - Raw input + schema -> vector

pub mod schema;
pub mod input;
pub mod vector;
pub mod encoder;


// Re-export common types
pub use schema::{LayoutMismatchError, Schema, SchemaInfo, SchemaLoadError, SchemaSource};
pub use input::{InputParseError, InputValidationError, ParsedInput, RawInput};
pub use vector::{FeatureExtractor, FeatureVector};
pub use encoder::{encode, encode_parsed, EncodeError, FeatureEncoder};
