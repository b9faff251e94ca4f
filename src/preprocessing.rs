//! Column-wise preprocessing in front of the classifier.
//!
//! The transformer applies median imputation to one numeric column, drop-first
//! one-hot encoding to one categorical column, and passes every other column
//! through unchanged. All statistics (the median, the category table) are
//! learned from the fit data only, so transforming held-out data never leaks
//! information back into the transformer.

use anyhow::{anyhow, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::data::{Column, FeatureFrame};

/// Which columns get special treatment. Everything else passes through.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PreprocessorConfig {
    /// Numeric column whose missing values are replaced by the fit median.
    pub ratio_column: String,
    /// Categorical column to one-hot encode (first category dropped).
    pub categorical_column: String,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            ratio_column: "A/G Ratio".to_string(),
            categorical_column: "Gender".to_string(),
        }
    }
}

/// Median imputer for a single numeric column.
#[derive(Debug, Clone)]
pub struct MedianImputer {
    pub median: f32,
}

impl MedianImputer {
    /// Learn the median of the observed (non-NaN) values.
    pub fn fit(values: &[f32]) -> Result<Self> {
        let mut observed: Vec<f32> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if observed.is_empty() {
            return Err(anyhow!("Cannot impute a column with no observed values"));
        }
        observed.sort_by(f32::total_cmp);
        let mid = observed.len() / 2;
        let median = if observed.len() % 2 == 1 {
            observed[mid]
        } else {
            (observed[mid - 1] + observed[mid]) / 2.0
        };
        Ok(Self { median })
    }

    pub fn transform(&self, values: &[f32]) -> Vec<f32> {
        values
            .iter()
            .map(|&v| if v.is_nan() { self.median } else { v })
            .collect()
    }
}

/// Drop-first one-hot encoder for a single categorical column.
///
/// Categories are the sorted distinct values seen at fit time. The first is
/// dropped to avoid collinearity; values unseen at fit time encode as an
/// all-zero row.
#[derive(Debug, Clone)]
pub struct OneHotEncoder {
    pub categories: Vec<String>,
}

impl OneHotEncoder {
    pub fn fit(values: &[String]) -> Self {
        let mut categories: Vec<String> = values.to_vec();
        categories.sort();
        categories.dedup();
        Self { categories }
    }

    /// Number of output columns (one per retained category).
    pub fn width(&self) -> usize {
        self.categories.len().saturating_sub(1)
    }

    /// Encode one value as a 0/1 row of `width()` entries.
    pub fn encode(&self, value: &str) -> Vec<f32> {
        let mut row = vec![0.0; self.width()];
        if let Some(pos) = self.categories.iter().position(|c| c == value) {
            if pos > 0 {
                row[pos - 1] = 1.0;
            }
        }
        row
    }
}

/// The fitted column transformer: imputer + encoder + passthrough remainder.
///
/// Output column order matches the original pipeline: transformed columns
/// first (imputed ratio, then the one-hot block), remainder columns after,
/// in their frame order.
#[derive(Debug, Clone)]
pub struct ColumnPreprocessor {
    config: PreprocessorConfig,
    pub imputer: MedianImputer,
    pub encoder: OneHotEncoder,
    /// Names of the passthrough columns, in output order.
    remainder: Vec<String>,
}

impl ColumnPreprocessor {
    /// Learn imputation and encoding statistics from the fit frame.
    pub fn fit(config: PreprocessorConfig, frame: &FeatureFrame) -> Result<Self> {
        let imputer = match frame.column(&config.ratio_column) {
            Some(Column::Numeric(values)) => MedianImputer::fit(values)?,
            Some(Column::Categorical(_)) => {
                return Err(anyhow!("Column '{}' is not numeric", config.ratio_column))
            }
            None => return Err(anyhow!("Missing column '{}'", config.ratio_column)),
        };

        let encoder = match frame.column(&config.categorical_column) {
            Some(Column::Categorical(values)) => OneHotEncoder::fit(values),
            Some(Column::Numeric(_)) => {
                return Err(anyhow!(
                    "Column '{}' is not categorical",
                    config.categorical_column
                ))
            }
            None => return Err(anyhow!("Missing column '{}'", config.categorical_column)),
        };

        let mut remainder = Vec::new();
        for (name, column) in frame.names.iter().zip(&frame.columns) {
            if name == &config.ratio_column || name == &config.categorical_column {
                continue;
            }
            if matches!(column, Column::Categorical(_)) {
                return Err(anyhow!(
                    "Cannot pass through categorical column '{}'",
                    name
                ));
            }
            remainder.push(name.clone());
        }

        Ok(Self {
            config,
            imputer,
            encoder,
            remainder,
        })
    }

    /// Number of columns in the transformed matrix.
    pub fn output_width(&self) -> usize {
        1 + self.encoder.width() + self.remainder.len()
    }

    /// Apply the fitted transformation. Pure: calling this twice on the same
    /// frame yields identical matrices.
    pub fn transform(&self, frame: &FeatureFrame) -> Result<Array2<f32>> {
        let nrows = frame.nrows();

        let ratio = match frame.column(&self.config.ratio_column) {
            Some(Column::Numeric(values)) => self.imputer.transform(values),
            _ => return Err(anyhow!("Missing numeric column '{}'", self.config.ratio_column)),
        };
        let gender = match frame.column(&self.config.categorical_column) {
            Some(Column::Categorical(values)) => values,
            _ => {
                return Err(anyhow!(
                    "Missing categorical column '{}'",
                    self.config.categorical_column
                ))
            }
        };

        let mut passthrough = Vec::with_capacity(self.remainder.len());
        for name in &self.remainder {
            match frame.column(name) {
                Some(Column::Numeric(values)) => passthrough.push(values),
                _ => return Err(anyhow!("Missing numeric column '{}'", name)),
            }
        }

        let width = self.output_width();
        let mut out = Vec::with_capacity(nrows * width);
        for row in 0..nrows {
            out.push(ratio[row]);
            out.extend(self.encoder.encode(&gender[row]));
            for values in &passthrough {
                out.push(values[row]);
            }
        }

        Array2::from_shape_vec((nrows, width), out)
            .map_err(|e| anyhow!("Transformed matrix has inconsistent shape: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_imputer_fills_nan_with_fit_median() {
        let imputer = MedianImputer::fit(&[1.0, f32::NAN, 3.0, 2.0]).unwrap();
        assert_eq!(imputer.median, 2.0);
        assert_eq!(imputer.transform(&[f32::NAN, 5.0]), vec![2.0, 5.0]);
    }

    #[test]
    fn median_imputer_even_count_averages_middle() {
        let imputer = MedianImputer::fit(&[4.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(imputer.median, 2.5);
    }

    #[test]
    fn median_imputer_rejects_all_missing() {
        assert!(MedianImputer::fit(&[f32::NAN, f32::NAN]).is_err());
    }

    #[test]
    fn one_hot_drops_first_and_ignores_unseen() {
        let encoder = OneHotEncoder::fit(&[
            "Male".to_string(),
            "Female".to_string(),
            "Male".to_string(),
        ]);
        // Sorted categories: [Female, Male]; Female is dropped.
        assert_eq!(encoder.width(), 1);
        assert_eq!(encoder.encode("Female"), vec![0.0]);
        assert_eq!(encoder.encode("Male"), vec![1.0]);
        assert_eq!(encoder.encode("Other"), vec![0.0]);
    }
}
