//! Composition of the column preprocessor and the classifier stage.

use anyhow::{anyhow, Result};
use ndarray::Array1;

use crate::config::GbdtParams;
use crate::data::FeatureFrame;
use crate::models::{factory, Classifier};
use crate::preprocessing::{ColumnPreprocessor, PreprocessorConfig};

/// Recipe for an unfitted pipeline.
///
/// Cross-validation and the tuners refit from scratch repeatedly, so the
/// recipe is what travels; `build` hands out a fresh stateless `Pipeline`
/// each time.
#[derive(Debug, Clone)]
pub struct PipelineSpec {
    pub preprocessor: PreprocessorConfig,
    pub params: GbdtParams,
}

impl PipelineSpec {
    pub fn new(preprocessor: PreprocessorConfig, params: GbdtParams) -> Self {
        Self {
            preprocessor,
            params,
        }
    }

    pub fn build(&self) -> Pipeline {
        Pipeline {
            spec: self.clone(),
            state: None,
        }
    }
}

struct FittedState {
    preprocessor: ColumnPreprocessor,
    model: Box<dyn Classifier>,
}

/// Two-stage pipeline: fitted preprocessor feeding a fitted classifier.
///
/// Stateless until `fit`; afterwards the learned imputation median, encoding
/// categories, and tree ensemble are frozen, and `predict`/`predict_proba`
/// reuse them without touching the input data's statistics.
pub struct Pipeline {
    spec: PipelineSpec,
    state: Option<FittedState>,
}

impl Pipeline {
    pub fn spec(&self) -> &PipelineSpec {
        &self.spec
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Fit the preprocessor on `frame`, transform it, and fit the classifier
    /// on the result.
    pub fn fit(&mut self, frame: &FeatureFrame, y: &Array1<i32>) -> Result<()> {
        if frame.nrows() != y.len() {
            return Err(anyhow!(
                "Frame has {} rows but {} labels given",
                frame.nrows(),
                y.len()
            ));
        }
        let preprocessor = ColumnPreprocessor::fit(self.spec.preprocessor.clone(), frame)?;
        let x = preprocessor.transform(frame)?;
        let mut model = factory::build_classifier(self.spec.params.clone());
        model.fit(&x, &y.to_vec())?;
        log::debug!("Fitted {} on {} rows, {} features", model.name(), x.nrows(), x.ncols());
        self.state = Some(FittedState {
            preprocessor,
            model,
        });
        Ok(())
    }

    fn fitted(&self) -> Result<&FittedState> {
        self.state
            .as_ref()
            .ok_or_else(|| anyhow!("Pipeline has not been fitted"))
    }

    /// Positive-class probability per row.
    pub fn predict_proba(&self, frame: &FeatureFrame) -> Result<Vec<f32>> {
        let state = self.fitted()?;
        let x = state.preprocessor.transform(frame)?;
        state.model.predict_proba(&x)
    }

    /// Hard 0/1 labels per row.
    pub fn predict(&self, frame: &FeatureFrame) -> Result<Vec<i32>> {
        let state = self.fitted()?;
        let x = state.preprocessor.transform(frame)?;
        state.model.predict(&x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Column;

    fn toy_frame() -> (FeatureFrame, Array1<i32>) {
        let n = 24;
        let mut ratio = Vec::new();
        let mut gender = Vec::new();
        let mut other = Vec::new();
        let mut labels = Vec::new();
        for i in 0..n {
            let positive = i % 2 == 0;
            ratio.push(if i == 3 { f32::NAN } else { 1.0 + (i % 4) as f32 * 0.1 });
            gender.push(if i % 3 == 0 { "Male" } else { "Female" }.to_string());
            other.push(if positive { 50.0 } else { -50.0 });
            labels.push(positive as i32);
        }
        (
            FeatureFrame {
                names: vec![
                    "A/G Ratio".to_string(),
                    "Gender".to_string(),
                    "Sgot".to_string(),
                ],
                columns: vec![
                    Column::Numeric(ratio),
                    Column::Categorical(gender),
                    Column::Numeric(other),
                ],
            },
            Array1::from_vec(labels),
        )
    }

    #[test]
    fn unfitted_pipeline_refuses_to_predict() {
        let (frame, _) = toy_frame();
        let pipeline = PipelineSpec::new(PreprocessorConfig::default(), GbdtParams::default())
            .build();
        assert!(!pipeline.is_fitted());
        assert!(pipeline.predict_proba(&frame).is_err());
    }

    #[test]
    fn build_hands_out_a_fresh_pipeline_carrying_its_spec() {
        let spec = PipelineSpec::new(
            PreprocessorConfig::default(),
            GbdtParams {
                iterations: 42,
                ..GbdtParams::default()
            },
        );
        let pipeline = spec.build();
        assert!(!pipeline.is_fitted());
        assert_eq!(pipeline.spec().params, spec.params);
    }

    #[test]
    fn fit_then_predict_separable() {
        let (frame, y) = toy_frame();
        let mut pipeline = PipelineSpec::new(
            PreprocessorConfig::default(),
            GbdtParams {
                iterations: 20,
                ..GbdtParams::default()
            },
        )
        .build();
        pipeline.fit(&frame, &y).unwrap();

        let preds = pipeline.predict(&frame).unwrap();
        let correct = preds
            .iter()
            .zip(y.iter())
            .filter(|(p, t)| p == t)
            .count();
        assert!(correct >= 20, "only {}/24 correct on separable data", correct);
    }
}
