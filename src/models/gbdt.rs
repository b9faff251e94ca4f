use anyhow::{anyhow, Result};
use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::Array2;

use crate::config::GbdtParams;
use crate::models::classifier::Classifier;

/// Gradient-boosted tree-ensemble classifier.
///
/// Wraps the `gbdt` crate with log-likelihood loss, so `predict` on the
/// underlying ensemble already yields positive-class probabilities.
pub struct GbdtClassifier {
    model: Option<GBDT>,
    params: GbdtParams,
}

impl GbdtClassifier {
    pub fn new(params: GbdtParams) -> Self {
        GbdtClassifier {
            model: None,
            params,
        }
    }

    fn to_data_vec(x: &Array2<f32>, y: Option<&[i32]>) -> DataVec {
        let mut data = DataVec::with_capacity(x.nrows());
        for row in 0..x.nrows() {
            // Log-likelihood loss expects -1/+1 labels.
            let label = match y {
                Some(labels) => {
                    if labels[row] == 1 {
                        1.0
                    } else {
                        -1.0
                    }
                }
                None => 0.0,
            };
            data.push(Data::new_training_data(
                x.row(row).to_vec(),
                1.0,
                label,
                None,
            ));
        }
        data
    }
}

impl Classifier for GbdtClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &[i32]) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(anyhow!(
                "Feature matrix has {} rows but {} labels given",
                x.nrows(),
                y.len()
            ));
        }
        if x.nrows() == 0 {
            return Err(anyhow!("Cannot fit on an empty matrix"));
        }

        let mut config = Config::new();
        config.set_feature_size(x.ncols());
        config.set_shrinkage(self.params.shrinkage);
        config.set_max_depth(self.params.max_depth);
        config.set_iterations(self.params.iterations);
        config.set_data_sample_ratio(self.params.data_sample_ratio);
        config.set_feature_sample_ratio(self.params.feature_sample_ratio);
        config.set_debug(false);
        config.set_training_optimization_level(2);
        config.set_loss("LogLikelyhood");

        let mut model = GBDT::new(&config);
        let mut train = Self::to_data_vec(x, Some(y));
        model.fit(&mut train);
        self.model = Some(model);
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Result<Vec<f32>> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| anyhow!("Model has not been fitted"))?;
        let test = Self::to_data_vec(x, None);
        let predictions = model.predict(&test);
        Ok(predictions.iter().map(|&p| p.clamp(0.0, 1.0)).collect())
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}
