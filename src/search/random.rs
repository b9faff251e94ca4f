//! Randomized hyperparameter search with cross-validated scoring.

use anyhow::{anyhow, Result};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::GbdtParams;
use crate::data::FeatureFrame;
use crate::pipeline::{Pipeline, PipelineSpec};
use crate::preprocessing::PreprocessorConfig;
use crate::search::space::ParamSpace;
use crate::validation::cross_validate_quiet;

/// One evaluated candidate, ranked 1 = best.
#[derive(Debug, Clone, Serialize)]
pub struct TrialResult {
    pub params: GbdtParams,
    pub mean_test_score: f64,
    pub std_test_score: f64,
    pub rank: usize,
}

/// The best candidate, a pipeline refit with it on the full training data,
/// and the full ranked results table. Read-only once produced.
pub struct SearchOutcome {
    pub best_params: GbdtParams,
    pub best_pipeline: Pipeline,
    pub results: Vec<TrialResult>,
}

/// Randomized search: `n_iter` independent draws from the space, each scored
/// by mean cross-validated ROC-AUC.
#[derive(Debug, Clone, Copy)]
pub struct RandomizedSearch {
    pub n_iter: usize,
    pub n_splits: usize,
    /// Seeds both candidate sampling and the fold shuffling.
    pub seed: u64,
}

impl RandomizedSearch {
    /// Run the search on the training partition and refit the winner.
    ///
    /// Candidates are drawn up front from a seeded generator, then scored in
    /// parallel across all available workers; the draw order (and therefore
    /// the result set) is deterministic per seed.
    pub fn fit(
        &self,
        space: &ParamSpace,
        preprocessor: &PreprocessorConfig,
        frame: &FeatureFrame,
        y: &Array1<i32>,
    ) -> Result<SearchOutcome> {
        if self.n_iter == 0 {
            return Err(anyhow!("Randomized search needs at least one candidate"));
        }
        let mut rng = StdRng::seed_from_u64(self.seed);
        let candidates: Vec<GbdtParams> =
            (0..self.n_iter).map(|_| space.sample(&mut rng)).collect();

        let scored: Result<Vec<(GbdtParams, f64, f64)>> = candidates
            .into_par_iter()
            .map(|params| {
                let spec = PipelineSpec::new(preprocessor.clone(), params.clone());
                let scores = cross_validate_quiet(&spec, frame, y, self.n_splits, self.seed)?;
                log::debug!(
                    "Candidate {:?}: mean test AUC {:.4}",
                    params,
                    scores.mean_test_auc()
                );
                Ok((params, scores.mean_test_auc(), scores.std_test_auc()))
            })
            .collect();
        let mut scored = scored?;

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let results: Vec<TrialResult> = scored
            .into_iter()
            .enumerate()
            .map(|(i, (params, mean, std))| TrialResult {
                params,
                mean_test_score: mean,
                std_test_score: std,
                rank: i + 1,
            })
            .collect();

        let best = &results[0];
        println!(
            "Randomized search CV - Cross-validated ROC-AUC score: {:.4} \u{00b1} {:.4}",
            best.mean_test_score, best.std_test_score
        );

        let best_params = best.params.clone();
        let mut best_pipeline = PipelineSpec::new(preprocessor.clone(), best_params.clone()).build();
        best_pipeline.fit(frame, y)?;

        Ok(SearchOutcome {
            best_params,
            best_pipeline,
            results,
        })
    }
}
