//! Scoring of a fitted pipeline against the held-out test partition.

use anyhow::Result;
use ndarray::Array1;

use crate::data::FeatureFrame;
use crate::metrics::{accuracy_score, classification_report, f1_score, roc_auc_score};
use crate::pipeline::Pipeline;

/// Result bundle for one held-out evaluation.
#[derive(Debug, Clone, Copy)]
pub struct TestScores {
    pub roc_auc: f64,
    pub accuracy: f64,
    pub f1: f64,
}

/// Score a fitted pipeline on a held-out set.
///
/// Prints the test ROC-AUC and the full classification report; accuracy and
/// F1 travel back in the returned bundle. Fails if the pipeline is unfitted
/// or the labels are degenerate.
pub fn evaluate_on_test(
    pipeline: &Pipeline,
    frame: &FeatureFrame,
    y_true: &Array1<i32>,
) -> Result<TestScores> {
    let probs = pipeline.predict_proba(frame)?;
    let preds = pipeline.predict(frame)?;
    let y = y_true.to_vec();

    let scores = TestScores {
        roc_auc: roc_auc_score(&y, &probs)?,
        accuracy: accuracy_score(&y, &preds)?,
        f1: f1_score(&y, &preds)?,
    };

    println!("Test ROC-AUC: {}", scores.roc_auc);
    println!("{}", classification_report(&y, &preds)?);

    Ok(scores)
}
