//! Error handling

use thiserror::Error;

use crate::constants::GENERIC_ERROR_MESSAGE;
use crate::logic::features::{EncodeError, LayoutMismatchError};
use crate::logic::model::ModelError;

pub type PredictResult<T> = Result<T, PredictError>;

/// Anything that stops a request from producing an estimate
#[derive(Debug, Error)]
pub enum PredictError {
    // Input errors
    #[error("invalid input: {0}")]
    Encode(#[from] EncodeError),

    // Layout errors
    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),

    // Model errors
    #[error("prediction failed: {0}")]
    Model(#[from] ModelError),
}

impl PredictError {
    /// Caused by what the user typed, as opposed to a server-side fault
    pub fn is_input_error(&self) -> bool {
        matches!(self, PredictError::Encode(_))
    }

    /// Raw field responsible, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            PredictError::Encode(EncodeError::Parse(e)) => Some(e.field()),
            PredictError::Encode(EncodeError::Validation(e)) => e.fields.first().map(String::as_str),
            _ => None,
        }
    }

    /// Text safe to show an end user
    pub fn user_message(&self) -> &'static str {
        GENERIC_ERROR_MESSAGE
    }
}
