use anyhow::Result;
use ndarray::Array2;

/// A small trait abstraction for the classifier stage of the pipeline.
/// Any estimator with fit/predict/predict_proba can be slotted in without
/// changing the orchestration code.
pub trait Classifier {
    /// Fit the model. `y` uses 0/1 coding with 1 as the positive class.
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<()>;

    /// Predict the positive-class probability (0..1) per row.
    /// Fails if the model has not been fitted.
    fn predict_proba(&self, x: &Array2<f32>) -> Result<Vec<f32>>;

    /// Predict hard 0/1 labels by thresholding the probability at 0.5.
    fn predict(&self, x: &Array2<f32>) -> Result<Vec<i32>> {
        let probs = self.predict_proba(x)?;
        Ok(probs.iter().map(|&p| (p >= 0.5) as i32).collect())
    }

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
