//! Readability prediction
//!
//! A [`ReadabilityModel`] names the features it was trained on; the
//! [`ReadabilityCalculator`] computes exactly those through the feature
//! registry and hands them to the model.

pub mod model;

pub use model::{LogisticModel, Prediction, ReadabilityModel};

use crate::config::ReadabilityConfig;
use crate::error::ModelError;
use crate::lexer::Language;
use crate::lexicon::SharedLexicon;
use crate::registry::FeatureRegistry;
use std::sync::Arc;
use tracing::debug;

pub struct ReadabilityCalculator {
    model: Arc<dyn ReadabilityModel>,
    language: Language,
    lexicon: SharedLexicon,
    config: ReadabilityConfig,
}

impl ReadabilityCalculator {
    pub fn new(
        model: Arc<dyn ReadabilityModel>,
        language: Language,
        lexicon: SharedLexicon,
        config: ReadabilityConfig,
    ) -> Self {
        Self {
            model,
            language,
            lexicon,
            config,
        }
    }

    /// Feature values the model needs for `code`, in model order. The token
    /// cache lives only for this call.
    pub fn features(&self, code: &str) -> Result<Vec<f64>, ModelError> {
        let registry = FeatureRegistry::for_code(code, self.language.lexer(), &self.lexicon, &self.config);
        Ok(registry.compute(self.model.feature_names())?)
    }

    pub fn predict(&self, code: &str) -> Result<Prediction, ModelError> {
        let values = self.features(code)?;
        let prediction = self.model.predict(&values)?;
        debug!(
            "Predicted label {} (p = {:.3}) from {} features",
            prediction.label,
            prediction.probability,
            values.len()
        );
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeatureError;
    use crate::lexicon::NullLexicon;

    fn calculator(model: LogisticModel) -> ReadabilityCalculator {
        ReadabilityCalculator::new(
            Arc::new(model),
            Language::Cpp,
            Arc::new(NullLexicon),
            ReadabilityConfig::default(),
        )
    }

    #[test]
    fn test_predict_from_snippet() {
        let model = LogisticModel::new(
            vec!["Posnett lines".to_string(), "BW MAX indentation".to_string()],
            vec![1.0, -1.0],
            1.0,
        )
        .unwrap();
        let calculator = calculator(model);

        let code = "int main() {\n    return 0;\n}";
        assert_eq!(calculator.features(code).unwrap(), vec![3.0, 4.0]);
        let prediction = calculator.predict(code).unwrap();
        assert_eq!(prediction.probability, 0.5);
        assert_eq!(prediction.label, 1);
    }

    #[test]
    fn test_unknown_model_feature() {
        let model = LogisticModel::new(vec!["Lines of code".to_string()], vec![1.0], 0.0).unwrap();
        let err = calculator(model).predict("int a;\n").unwrap_err();
        assert!(matches!(err, ModelError::Feature(FeatureError::UnknownFeature(_))));
    }
}
