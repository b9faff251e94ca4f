use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Central configuration for a full training-and-tuning run.
///
/// Every knob the pipeline uses is collected here; the binary runs with the
/// defaults below and no command-line surface.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RunConfig {
    /// Seed for the train/test split, fold shuffling, and candidate sampling.
    pub seed: u64,
    /// Number of stratified cross-validation folds.
    pub cv_folds: usize,
    /// Fraction of rows held out for the test set.
    pub test_fraction: f64,
    /// Trial budget shared by both tuners.
    pub n_trials: usize,
    /// Path to the input CSV table.
    pub data_path: PathBuf,
    /// Name of the binary label column.
    pub label_column: String,
    /// Numeric column receiving median imputation.
    pub ratio_column: String,
    /// Categorical column receiving one-hot encoding.
    pub gender_column: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            cv_folds: 5,
            test_fraction: 0.4,
            n_trials: 25,
            data_path: PathBuf::from("data/liver_disorders.csv"),
            label_column: "Selector".to_string(),
            ratio_column: "A/G Ratio".to_string(),
            gender_column: "Gender".to_string(),
        }
    }
}

/// Hyper-parameters for the gradient-boosted tree-ensemble classifier.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GbdtParams {
    /// Ensemble size (number of boosting rounds).
    pub iterations: usize,
    pub max_depth: u32,
    /// Learning rate applied to each tree's contribution.
    pub shrinkage: f32,
    /// Row subsampling ratio per round.
    pub data_sample_ratio: f64,
    /// Column subsampling ratio per split search.
    pub feature_sample_ratio: f64,
}

impl Default for GbdtParams {
    fn default() -> Self {
        Self {
            iterations: 100,
            max_depth: 4,
            shrinkage: 0.1,
            data_sample_ratio: 1.0,
            feature_sample_ratio: 1.0,
        }
    }
}

impl GbdtParams {
    /// Render the parameters as `name: value` lines for the console summary.
    pub fn describe(&self) -> String {
        format!(
            "  iterations: {}\n  max_depth: {}\n  shrinkage: {}\n  data_sample_ratio: {}\n  feature_sample_ratio: {}",
            self.iterations,
            self.max_depth,
            self.shrinkage,
            self.data_sample_ratio,
            self.feature_sample_ratio
        )
    }
}
