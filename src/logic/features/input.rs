//! Raw Input - Untyped request fields and their parsing
//!
//! Form values arrive as strings. Parsing turns them into [`ParsedInput`],
//! then domain checks run before anything touches a feature vector.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::constants::{
    FIELD_ACCIDENT, FIELD_BRAND, FIELD_CAR_AGE, FIELD_CLEAN_TITLE, FIELD_EXT_COL,
    FIELD_FUEL_TYPE, FIELD_INT_COL, FIELD_MILAGE, FIELD_TRANSMISSION,
};

// ============================================================================
// ERRORS
// ============================================================================

/// A raw field is missing or does not parse to its expected type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputParseError {
    #[error("missing field `{field}`")]
    MissingField { field: &'static str },

    #[error("field `{field}` must be a number, got `{value}`")]
    InvalidNumber { field: &'static str, value: String },

    #[error("field `{field}` must be 0 or 1, got `{value}`")]
    InvalidFlag { field: &'static str, value: String },
}

impl InputParseError {
    /// Name of the offending raw field
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field }
            | Self::InvalidNumber { field, .. }
            | Self::InvalidFlag { field, .. } => field,
        }
    }
}

/// A parsed value violates a domain constraint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("mileage and car age must be non-negative")]
pub struct InputValidationError {
    /// Raw fields that failed, sorted
    pub fields: Vec<String>,
}

// ============================================================================
// RAW INPUT
// ============================================================================

/// Field name -> raw string value, as submitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInput(HashMap<String, String>);

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn require(&self, field: &'static str) -> Result<&str, InputParseError> {
        self.get(field).ok_or(InputParseError::MissingField { field })
    }

    /// Parse every required field, then range-check mileage and age.
    ///
    /// A missing or malformed field is reported before any range problem.
    pub fn parse(&self) -> Result<ParsedInput, super::EncodeError> {
        let parsed = ParsedInput {
            milage: parse_real(FIELD_MILAGE, self.require(FIELD_MILAGE)?)?,
            car_age: parse_integer(FIELD_CAR_AGE, self.require(FIELD_CAR_AGE)?)?,
            clean_title: parse_flag(FIELD_CLEAN_TITLE, self.require(FIELD_CLEAN_TITLE)?)?,
            accident: parse_flag(FIELD_ACCIDENT, self.require(FIELD_ACCIDENT)?)?,
            fuel_type: self.require(FIELD_FUEL_TYPE)?.to_string(),
            brand: self.require(FIELD_BRAND)?.to_string(),
            transmission: self.require(FIELD_TRANSMISSION)?.to_string(),
            ext_col: self.require(FIELD_EXT_COL)?.to_string(),
            int_col: self.require(FIELD_INT_COL)?.to_string(),
        };

        Quantities {
            milage: parsed.milage,
            car_age: parsed.car_age,
        }
        .check()?;

        Ok(parsed)
    }
}

impl<K, V> FromIterator<(K, V)> for RawInput
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ============================================================================
// PARSED INPUT
// ============================================================================

/// Domain checks on the parsed numeric fields
#[derive(Debug, Validate)]
struct Quantities {
    #[validate(range(min = 0.0))]
    milage: f64,
    #[validate(range(min = 0))]
    car_age: i64,
}

impl Quantities {
    fn check(&self) -> Result<(), InputValidationError> {
        self.validate().map_err(|errors| {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect();
            fields.sort();
            InputValidationError { fields }
        })
    }
}

/// Typed request values.
///
/// Fields are private: the only way to get one is [`RawInput::parse`], so a
/// `ParsedInput` always holds non-negative quantities and 0/1 flags.
///
/// ```compile_fail
/// use car_price_core::logic::features::ParsedInput;
///
/// let forged = ParsedInput {
///     milage: -500.0,
///     car_age: -3,
///     clean_title: 7,
///     accident: 9,
///     fuel_type: String::new(),
///     brand: String::new(),
///     transmission: String::new(),
///     ext_col: String::new(),
///     int_col: String::new(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedInput {
    milage: f64,
    car_age: i64,
    clean_title: u8,
    accident: u8,

    fuel_type: String,
    brand: String,
    transmission: String,
    ext_col: String,
    int_col: String,
}

impl ParsedInput {
    pub fn milage(&self) -> f64 {
        self.milage
    }

    pub fn car_age(&self) -> i64 {
        self.car_age
    }

    pub fn clean_title(&self) -> u8 {
        self.clean_title
    }

    pub fn accident(&self) -> u8 {
        self.accident
    }

    /// Categorical selections as (group, raw value)
    pub fn categories(&self) -> [(&'static str, &str); 5] {
        [
            (FIELD_FUEL_TYPE, self.fuel_type.as_str()),
            (FIELD_BRAND, self.brand.as_str()),
            (FIELD_TRANSMISSION, self.transmission.as_str()),
            (FIELD_EXT_COL, self.ext_col.as_str()),
            (FIELD_INT_COL, self.int_col.as_str()),
        ]
    }
}

// ============================================================================
// FIELD PARSERS
// ============================================================================

/// Largest integer magnitude an f64 feature holds exactly (2^53)
const MAX_EXACT_INTEGER: u64 = 1 << 53;

fn parse_real(field: &'static str, raw: &str) -> Result<f64, InputParseError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputParseError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

fn parse_integer(field: &'static str, raw: &str) -> Result<i64, InputParseError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|v| v.unsigned_abs() <= MAX_EXACT_INTEGER)
        .ok_or_else(|| InputParseError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

fn parse_flag(field: &'static str, raw: &str) -> Result<u8, InputParseError> {
    match parse_integer(field, raw) {
        Ok(0) => Ok(0),
        Ok(1) => Ok(1),
        Ok(_) => Err(InputParseError::InvalidFlag {
            field,
            value: raw.to_string(),
        }),
        Err(e) => Err(e),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::EncodeError;

    fn valid() -> RawInput {
        [
            ("milage", "45000"),
            ("car_age", "3"),
            ("clean_title", "1"),
            ("accident_label_enc", "0"),
            ("fuel_type", "Gasoline"),
            ("brand", "Ford"),
            ("transmission", "A/T"),
            ("ext_col", "Black"),
            ("int_col", "Black"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_parse_valid() {
        let parsed = valid().parse().unwrap();
        assert_eq!(parsed.milage, 45000.0);
        assert_eq!(parsed.car_age, 3);
        assert_eq!(parsed.clean_title, 1);
        assert_eq!(parsed.accident, 0);
        assert_eq!(parsed.brand, "Ford");
    }

    #[test]
    fn test_numeric_whitespace_and_exponent() {
        let mut raw = valid();
        raw.insert("milage", " 4.5e4 ").insert("car_age", " 3\n");
        let parsed = raw.parse().unwrap();
        assert_eq!(parsed.milage, 45000.0);
        assert_eq!(parsed.car_age, 3);
    }

    #[test]
    fn test_every_field_is_required() {
        for &field in crate::constants::REQUIRED_FIELDS {
            let mut raw = valid();
            raw.remove(field);
            match raw.parse() {
                Err(EncodeError::Parse(e)) => {
                    assert_eq!(e, InputParseError::MissingField { field });
                    assert_eq!(e.field(), field);
                }
                other => panic!("expected missing `{}`, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_non_numeric_milage() {
        let mut raw = valid();
        raw.insert("milage", "lots");
        match raw.parse() {
            Err(EncodeError::Parse(e)) => assert_eq!(e.field(), "milage"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_milage() {
        for value in ["NaN", "inf", "-infinity"] {
            let mut raw = valid();
            raw.insert("milage", value);
            assert!(matches!(
                raw.parse(),
                Err(EncodeError::Parse(InputParseError::InvalidNumber { field: "milage", .. }))
            ));
        }
    }

    #[test]
    fn test_fractional_car_age() {
        let mut raw = valid();
        raw.insert("car_age", "3.5");
        assert!(matches!(
            raw.parse(),
            Err(EncodeError::Parse(InputParseError::InvalidNumber { field: "car_age", .. }))
        ));
    }

    #[test]
    fn test_flag_out_of_range() {
        let mut raw = valid();
        raw.insert("clean_title", "2");
        assert_eq!(
            raw.parse().unwrap_err().to_string(),
            "field `clean_title` must be 0 or 1, got `2`"
        );

        let mut raw = valid();
        raw.insert("accident_label_enc", "yes");
        assert!(matches!(
            raw.parse(),
            Err(EncodeError::Parse(InputParseError::InvalidNumber { field: "accident_label_enc", .. }))
        ));
    }

    #[test]
    fn test_negative_values_rejected() {
        let mut raw = valid();
        raw.insert("milage", "-1");
        match raw.parse() {
            Err(EncodeError::Validation(e)) => {
                assert_eq!(e.fields, vec!["milage".to_string()]);
                assert_eq!(e.to_string(), "mileage and car age must be non-negative");
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        let mut raw = valid();
        raw.insert("milage", "-0.5").insert("car_age", "-1");
        match raw.parse() {
            Err(EncodeError::Validation(e)) => {
                assert_eq!(e.fields, vec!["car_age".to_string(), "milage".to_string()])
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_wins_over_negative() {
        let mut raw = valid();
        raw.insert("milage", "-1");
        raw.remove("brand");
        assert_eq!(
            raw.parse(),
            Err(EncodeError::Parse(InputParseError::MissingField { field: "brand" }))
        );

        let mut raw = valid();
        raw.insert("car_age", "-1").insert("clean_title", "maybe");
        match raw.parse() {
            Err(EncodeError::Parse(e)) => assert_eq!(e.field(), "clean_title"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_car_age_beyond_exact_range() {
        let mut raw = valid();
        raw.insert("car_age", "9007199254740993");
        assert!(matches!(
            raw.parse(),
            Err(EncodeError::Parse(InputParseError::InvalidNumber { field: "car_age", .. }))
        ));

        let mut raw = valid();
        raw.insert("car_age", "9007199254740992");
        assert_eq!(raw.parse().unwrap().car_age(), 1 << 53);
    }

    #[test]
    fn test_parsed_accessors() {
        let parsed = valid().parse().unwrap();
        assert_eq!(parsed.milage(), 45000.0);
        assert_eq!(parsed.car_age(), 3);
        assert_eq!(parsed.clean_title(), 1);
        assert_eq!(parsed.accident(), 0);
        assert_eq!(parsed.categories()[1], ("brand", "Ford"));
    }

    #[test]
    fn test_zero_is_valid() {
        let mut raw = valid();
        raw.insert("milage", "0").insert("car_age", "0");
        assert!(raw.parse().is_ok());
    }

    #[test]
    fn test_deserialize_from_json() {
        let raw: RawInput = serde_json::from_str(r#"{"brand": "BMW", "milage": "10"}"#).unwrap();
        assert_eq!(raw.get("brand"), Some("BMW"));
        assert_eq!(raw.len(), 2);
    }
}
