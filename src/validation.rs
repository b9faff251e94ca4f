//! Stratified k-fold cross-validation.
//!
//! Each fold refits a fresh pipeline from its spec on the fold's training
//! portion and scores the held-out portion, so no state leaks between folds.

use anyhow::{anyhow, Result};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::{select_labels, FeatureFrame};
use crate::metrics::{accuracy_score, mean, roc_auc_score, std_dev};
use crate::pipeline::PipelineSpec;

/// Label-proportional fold assignment, shuffled by seed.
#[derive(Debug, Clone, Copy)]
pub struct StratifiedKFold {
    pub n_splits: usize,
    pub seed: u64,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize, seed: u64) -> Self {
        Self { n_splits, seed }
    }

    /// Produce `(train_indices, test_indices)` per fold.
    ///
    /// Each class's members are shuffled once and dealt round-robin into the
    /// folds, so every fold's label proportions track the full set to within
    /// one row per class. Fails if any class has fewer members than folds.
    pub fn split(&self, y: &Array1<i32>) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(anyhow!("Need at least 2 folds, got {}", self.n_splits));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut fold_members: Vec<Vec<usize>> = vec![Vec::new(); self.n_splits];

        for class in [0, 1] {
            let mut members: Vec<usize> = y
                .iter()
                .enumerate()
                .filter_map(|(i, &v)| (v == class).then(|| i))
                .collect();
            if members.len() < self.n_splits {
                return Err(anyhow!(
                    "Class {} has {} member(s); cannot build {} stratified folds",
                    class,
                    members.len(),
                    self.n_splits
                ));
            }
            members.shuffle(&mut rng);
            for (i, idx) in members.into_iter().enumerate() {
                fold_members[i % self.n_splits].push(idx);
            }
        }

        let folds = (0..self.n_splits)
            .map(|fold| {
                let mut test = fold_members[fold].clone();
                test.sort_unstable();
                let mut train: Vec<usize> = fold_members
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != fold)
                    .flat_map(|(_, members)| members.iter().copied())
                    .collect();
                train.sort_unstable();
                (train, test)
            })
            .collect();
        Ok(folds)
    }
}

/// Per-fold scores for both metrics, on the held-out and training portions.
#[derive(Debug, Clone)]
pub struct CvScores {
    pub test_roc_auc: Vec<f64>,
    pub train_roc_auc: Vec<f64>,
    pub test_accuracy: Vec<f64>,
    pub train_accuracy: Vec<f64>,
}

impl CvScores {
    pub fn mean_test_auc(&self) -> f64 {
        mean(&self.test_roc_auc)
    }

    pub fn std_test_auc(&self) -> f64 {
        std_dev(&self.test_roc_auc)
    }
}

/// Cross-validate a pipeline spec and print the test ROC-AUC summary.
///
/// # Arguments
///
/// * `spec` - recipe for the pipeline; a fresh instance is fitted per fold.
/// * `frame` / `y` - the training partition only; the held-out test set
///   never enters here.
/// * `n_splits` - fold count.
/// * `seed` - shuffling seed for the fold assignment.
pub fn cross_validate(
    spec: &PipelineSpec,
    frame: &FeatureFrame,
    y: &Array1<i32>,
    n_splits: usize,
    seed: u64,
) -> Result<CvScores> {
    let scores = cross_validate_quiet(spec, frame, y, n_splits, seed)?;
    println!(
        "Cross-validated ROC-AUC score: {:.4} \u{00b1} {:.4}",
        scores.mean_test_auc(),
        scores.std_test_auc()
    );
    Ok(scores)
}

/// Same as `cross_validate` but without the console summary. The tuners call
/// this once per candidate.
pub fn cross_validate_quiet(
    spec: &PipelineSpec,
    frame: &FeatureFrame,
    y: &Array1<i32>,
    n_splits: usize,
    seed: u64,
) -> Result<CvScores> {
    let folds = StratifiedKFold::new(n_splits, seed).split(y)?;

    let mut scores = CvScores {
        test_roc_auc: Vec::with_capacity(n_splits),
        train_roc_auc: Vec::with_capacity(n_splits),
        test_accuracy: Vec::with_capacity(n_splits),
        train_accuracy: Vec::with_capacity(n_splits),
    };

    for (fold, (train_idx, test_idx)) in folds.iter().enumerate() {
        let train_frame = frame.select_rows(train_idx);
        let test_frame = frame.select_rows(test_idx);
        let y_train = select_labels(y, train_idx);
        let y_test = select_labels(y, test_idx);

        let mut pipeline = spec.build();
        pipeline.fit(&train_frame, &y_train)?;

        let test_probs = pipeline.predict_proba(&test_frame)?;
        let test_preds = pipeline.predict(&test_frame)?;
        let train_probs = pipeline.predict_proba(&train_frame)?;
        let train_preds = pipeline.predict(&train_frame)?;

        scores
            .test_roc_auc
            .push(roc_auc_score(&y_test.to_vec(), &test_probs)?);
        scores
            .train_roc_auc
            .push(roc_auc_score(&y_train.to_vec(), &train_probs)?);
        scores
            .test_accuracy
            .push(accuracy_score(&y_test.to_vec(), &test_preds)?);
        scores
            .train_accuracy
            .push(accuracy_score(&y_train.to_vec(), &train_preds)?);

        log::debug!(
            "Fold {}: test AUC {:.4}, train AUC {:.4}",
            fold,
            scores.test_roc_auc[fold],
            scores.train_roc_auc[fold]
        );
    }

    Ok(scores)
}

/// Mean cross-validated test AUC for a candidate spec.
pub fn cross_val_auc(
    spec: &PipelineSpec,
    frame: &FeatureFrame,
    y: &Array1<i32>,
    n_splits: usize,
    seed: u64,
) -> Result<f64> {
    Ok(cross_validate_quiet(spec, frame, y, n_splits, seed)?.mean_test_auc())
}
