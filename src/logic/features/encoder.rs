//! Feature Encoder - Raw request to schema-exact vector
//!
//! Pure function of (input, schema). No I/O, no shared mutable state,
//! so any number of request handlers may call it at once.

use std::sync::Arc;

use thiserror::Error;

use super::input::{InputParseError, InputValidationError, ParsedInput, RawInput};
use super::schema::Schema;
use super::vector::{FeatureExtractor, FeatureVector};
use crate::constants::{COLUMN_ACCIDENT, COLUMN_CAR_AGE, COLUMN_CLEAN_TITLE, COLUMN_MILAGE};

/// Encoding failed; no vector was produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error(transparent)]
    Parse(#[from] InputParseError),

    #[error(transparent)]
    Validation(#[from] InputValidationError),
}

// ============================================================================
// ENCODING
// ============================================================================

/// Parse, validate and encode one request against `schema`
pub fn encode(raw: &RawInput, schema: &Schema) -> Result<FeatureVector, EncodeError> {
    let parsed = raw.parse()?;
    Ok(encode_parsed(&parsed, schema))
}

/// Encode input that already went through [`RawInput::parse`]
pub fn encode_parsed(parsed: &ParsedInput, schema: &Schema) -> FeatureVector {
    let mut vector = FeatureVector::zeroed(schema);
    NumericColumns(parsed).extract(schema, &mut vector);
    OneHotColumns(parsed).extract(schema, &mut vector);
    vector
}

/// Encoder bound to the process-wide schema
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: Arc<Schema>,
}

impl FeatureEncoder {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn encode(&self, raw: &RawInput) -> Result<FeatureVector, EncodeError> {
        encode(raw, &self.schema)
    }
}

// ============================================================================
// EXTRACTORS
// ============================================================================

/// Mileage, age and the two label-encoded flags
struct NumericColumns<'a>(&'a ParsedInput);

impl FeatureExtractor for NumericColumns<'_> {
    fn extract(&self, schema: &Schema, vector: &mut FeatureVector) {
        let input = self.0;
        let columns = [
            (COLUMN_MILAGE, input.milage()),
            // Exact: parsing bounds car_age to |x| <= 2^53
            (COLUMN_CAR_AGE, input.car_age() as f64),
            (COLUMN_CLEAN_TITLE, f64::from(input.clean_title())),
            (COLUMN_ACCIDENT, f64::from(input.accident())),
        ];

        // Schema is authoritative: a column it lacks is simply not written
        for (column, value) in columns {
            vector.set_by_name(schema, column, value);
        }
    }
}

/// `<group>_<value>` one-hot columns; unseen categories leave the group at 0
struct OneHotColumns<'a>(&'a ParsedInput);

impl FeatureExtractor for OneHotColumns<'_> {
    fn extract(&self, schema: &Schema, vector: &mut FeatureVector) {
        for (group, value) in self.0.categories() {
            let column = format!("{group}_{value}");
            if !vector.set_by_name(schema, &column, 1.0) {
                tracing::debug!(group, value, "Unknown category, group left unset");
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::schema::SchemaSource;

    fn scenario_schema() -> Schema {
        Schema::load(SchemaSource::Literal(
            [
                "milage",
                "car_age",
                "clean_title_label_enc",
                "accident_label_enc",
                "fuel_type_Gasoline",
                "fuel_type_Hybrid",
                "brand_Ford",
                "brand_BMW",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        ))
        .unwrap()
    }

    fn scenario_input() -> RawInput {
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
    fn test_known_categories() {
        let vector = encode(&scenario_input(), &scenario_schema()).unwrap();
        assert_eq!(vector.values, vec![45000.0, 3.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_unknown_brand_degrades_to_zero() {
        let mut raw = scenario_input();
        raw.insert("brand", "Tesla");

        let vector = encode(&raw, &scenario_schema()).unwrap();
        assert_eq!(vector.values, vec![45000.0, 3.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_category_match_is_exact() {
        let mut raw = scenario_input();
        raw.insert("brand", "ford").insert("fuel_type", " Gasoline");

        let vector = encode(&raw, &scenario_schema()).unwrap();
        assert_eq!(&vector.values[4..], &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_numeric_column_absent_from_schema() {
        let schema = Schema::load(SchemaSource::Literal(vec![
            "brand_Ford".to_string(),
            "car_age".to_string(),
        ]))
        .unwrap();

        let vector = encode(&scenario_input(), &schema).unwrap();
        assert_eq!(vector.values, vec![1.0, 3.0]);
    }

    #[test]
    fn test_clean_title_maps_to_label_column() {
        let mut raw = scenario_input();
        raw.insert("clean_title", "0").insert("accident_label_enc", "1");

        let schema = scenario_schema();
        let vector = encode(&raw, &schema).unwrap();
        assert_eq!(vector.get_by_name(&schema, "clean_title_label_enc"), Some(0.0));
        assert_eq!(vector.get_by_name(&schema, "accident_label_enc"), Some(1.0));
    }

    #[test]
    fn test_negative_produces_no_vector() {
        let mut raw = scenario_input();
        raw.insert("milage", "-1");
        assert!(matches!(
            encode(&raw, &scenario_schema()),
            Err(EncodeError::Validation(_))
        ));
    }

    #[test]
    fn test_encoder_shares_schema() {
        let schema = Arc::new(scenario_schema());
        let encoder = FeatureEncoder::new(Arc::clone(&schema));

        let vector = encoder.encode(&scenario_input()).unwrap();
        assert!(vector.validate_against(&schema).is_ok());
        assert_eq!(encoder.schema().len(), 8);
    }

    #[test]
    fn test_encode_parsed_matches_encode() {
        let schema = scenario_schema();
        let parsed = scenario_input().parse().unwrap();
        assert_eq!(encode_parsed(&parsed, &schema), encode(&scenario_input(), &schema).unwrap());
    }
}
