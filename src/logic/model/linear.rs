//! Linear Regressor - JSON-described reference model
//!
//! `{"feature_names": [...], "intercept": 0.0, "coefficients": [...]}`
//!
//! `feature_names` is optional; when present it must line up with
//! `coefficients` and can serve as the schema source.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::regressor::{ModelError, ModelMetadata, Regressor};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feature_names: Option<Vec<String>>,
    #[serde(default)]
    intercept: f64,
    coefficients: Vec<f64>,
    #[serde(skip)]
    metadata: Option<ModelMetadata>,
}

impl LinearRegressor {
    pub fn new(feature_names: Option<Vec<String>>, intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            feature_names,
            intercept,
            coefficients,
            metadata: None,
        }
    }

    /// Load and check a model file
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        tracing::info!("Loading linear model from: {}", path.display());

        if !path.exists() {
            return Err(ModelError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut model: Self = serde_json::from_str(&text).map_err(|source| ModelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        model.check()?;

        model.metadata = Some(ModelMetadata {
            model_path: path.display().to_string(),
            model_type: "linear".to_string(),
            features: model.coefficients.len(),
            loaded_at: chrono::Utc::now(),
        });

        tracing::info!(features = model.coefficients.len(), "Linear model loaded successfully");
        Ok(model)
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    fn check(&self) -> Result<(), ModelError> {
        if self.coefficients.is_empty() {
            return Err(ModelError::Invalid("no coefficients".to_string()));
        }

        if let Some(names) = &self.feature_names {
            if names.len() != self.coefficients.len() {
                return Err(ModelError::Invalid(format!(
                    "{} feature names for {} coefficients",
                    names.len(),
                    self.coefficients.len()
                )));
            }
        }

        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Invalid("non-finite weight".to_string()));
        }

        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn name(&self) -> &str {
        self.metadata
            .as_ref()
            .map(|m| m.model_path.as_str())
            .unwrap_or("linear")
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn metadata(&self) -> Option<&ModelMetadata> {
        self.metadata.as_ref()
    }

    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.coefficients.len() {
            return Err(ModelError::InputWidth {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }

        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();

        Ok(self.intercept + dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_predict() {
        let model = LinearRegressor::new(None, 1000.0, vec![-0.1, -500.0]);
        let price = model.predict(&[10000.0, 2.0]).unwrap();
        assert!((price - -1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_width_mismatch() {
        let model = LinearRegressor::new(None, 0.0, vec![1.0, 2.0]);
        assert!(matches!(
            model.predict(&[1.0]),
            Err(ModelError::InputWidth { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"feature_names": ["milage", "car_age"], "intercept": 30000.0, "coefficients": [-0.1, -1500.0]}}"#
        )
        .unwrap();

        let model = LinearRegressor::load(file.path()).unwrap();
        assert_eq!(model.feature_names().map(<[String]>::len), Some(2));
        assert_eq!(model.intercept(), 30000.0);

        let metadata = model.metadata().unwrap();
        assert_eq!(metadata.model_type, "linear");
        assert_eq!(metadata.features, 2);
        assert_eq!(model.name(), metadata.model_path);
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = LinearRegressor::load(&dir.path().join("model.json"));
        assert!(matches!(result, Err(ModelError::NotFound { .. })));
    }

    #[test]
    fn test_load_rejects_misaligned_names() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"feature_names": ["milage"], "coefficients": [1.0, 2.0]}}"#).unwrap();

        let result = LinearRegressor::load(file.path());
        assert!(matches!(result, Err(ModelError::Invalid(_))));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = LinearRegressor::load(file.path());
        assert!(matches!(result, Err(ModelError::Parse { .. })));
    }
}
