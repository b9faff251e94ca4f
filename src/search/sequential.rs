//! Sequential history-guided hyperparameter optimization.
//!
//! Trials run one at a time; after a startup phase the proposal distribution
//! narrows the ensemble-size range toward the region spanned by the
//! top-scoring trials so far. Only the running history feeds the proposals;
//! no trial depends on another trial's fitted model.

use anyhow::{anyhow, Result};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::config::GbdtParams;
use crate::data::FeatureFrame;
use crate::pipeline::PipelineSpec;
use crate::preprocessing::PreprocessorConfig;
use crate::search::space::ParamSpace;
use crate::validation::cross_val_auc;

/// Recorded (score, params) pairs across finished trials.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrialHistory {
    pub scores: Vec<f64>,
    pub params: Vec<GbdtParams>,
}

impl TrialHistory {
    pub fn add_result(&mut self, score: f64, params: GbdtParams) {
        self.scores.push(score);
        self.params.push(params);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Ensemble-size interval spanned by the top 20% of trials, padded by a
    /// 10% margin. None until there is at least one trial.
    pub fn promising_iteration_range(&self) -> Option<(usize, usize)> {
        if self.is_empty() {
            return None;
        }

        let mut indexed: Vec<(usize, f64)> = self.scores.iter().copied().enumerate().collect();
        indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let top_n = ((indexed.len() as f64 * 0.2).ceil() as usize).max(1);

        let iterations: Vec<usize> = indexed[..top_n]
            .iter()
            .map(|&(i, _)| self.params[i].iterations)
            .collect();
        let min = *iterations.iter().min()?;
        let max = *iterations.iter().max()?;
        let margin = (max - min) / 10;
        Some((min.saturating_sub(margin), max + margin))
    }
}

/// Best assignment and score observed over the run.
#[derive(Debug, Clone, Serialize)]
pub struct SequentialOutcome {
    pub best_params: GbdtParams,
    pub best_score: f64,
    pub n_trials: usize,
}

/// Sequential optimizer configuration.
#[derive(Debug, Clone, Copy)]
pub struct SequentialSearch {
    pub n_trials: usize,
    /// Trials proposed from the unmodified space before narrowing starts.
    pub n_startup: usize,
    pub n_splits: usize,
    /// Seeds proposal sampling; fold shuffling reuses the same seed.
    pub seed: u64,
}

impl SequentialSearch {
    /// Maximize mean cross-validated ROC-AUC over the space.
    ///
    /// Per-trial detail goes to the debug log only; the final best parameter
    /// assignment is printed. The caller rebuilds and refits the winning
    /// pipeline from the returned params.
    pub fn optimize(
        &self,
        space: &ParamSpace,
        preprocessor: &PreprocessorConfig,
        frame: &FeatureFrame,
        y: &Array1<i32>,
    ) -> Result<SequentialOutcome> {
        if self.n_trials == 0 {
            return Err(anyhow!("Need at least one trial"));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut working = space.clone();
        let mut history = TrialHistory::default();
        let mut best_score = f64::NEG_INFINITY;
        let mut best_params = None;

        for trial in 0..self.n_trials {
            let params = working.sample_stepped(&mut rng);
            let spec = PipelineSpec::new(preprocessor.clone(), params.clone());
            let score = cross_val_auc(&spec, frame, y, self.n_splits, self.seed)?;

            log::debug!("Trial {}: AUC {:.4} with {:?}", trial, score, params);
            history.add_result(score, params.clone());

            if score > best_score {
                best_score = score;
                best_params = Some(params);
            }

            if trial + 1 >= self.n_startup {
                self.narrow(&mut working, space, &history);
            }
        }

        let best_params = best_params.ok_or_else(|| anyhow!("No trial completed"))?;
        println!("Best hyperparameters found:");
        println!("{}", best_params.describe());

        Ok(SequentialOutcome {
            best_params,
            best_score,
            n_trials: history.len(),
        })
    }

    /// Shrink the working ensemble-size range toward the promising region,
    /// clamped to the original space. Categorical lists stay untouched.
    fn narrow(&self, working: &mut ParamSpace, original: &ParamSpace, history: &TrialHistory) {
        if let Some((low, high)) = history.promising_iteration_range() {
            let low = low.max(original.iterations.low);
            let high = high.min(original.iterations.high);
            if low < high {
                working.iterations.low = low;
                working.iterations.high = high;
                log::debug!("Narrowed ensemble-size range to {}..={}", low, high);
            }
        }
    }
}
