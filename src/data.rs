//! Loading and splitting of the tabular dataset.
//!
//! This module defines `FeatureFrame` (a small named-column table with mixed
//! numeric/categorical columns) and `Dataset`, and contains the CSV loader
//! and the stratified train/test splitter used by the orchestrator.
use std::collections::HashSet;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// A single feature column. Missing numeric values are carried as NaN.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f32>),
    Categorical(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn select(&self, indices: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(indices.iter().map(|&i| v[i]).collect()),
            Column::Categorical(v) => {
                Column::Categorical(indices.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }
}

/// A table of named, row-aligned feature columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    pub names: Vec<String>,
    pub columns: Vec<Column>,
}

impl FeatureFrame {
    pub fn nrows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.columns[idx])
    }

    /// Build a new frame containing the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> FeatureFrame {
        FeatureFrame {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select(indices)).collect(),
        }
    }
}

/// Deduplicated feature matrix and aligned binary labels (0/1, 1 = positive).
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: FeatureFrame,
    pub labels: Array1<i32>,
}

impl Dataset {
    /// Read a CSV table, drop exact duplicate rows (first occurrence wins),
    /// and split off the label column.
    ///
    /// Column types are inferred from the data: a column whose non-empty
    /// cells all parse as floats is numeric (empty cells become NaN),
    /// anything else is categorical. The label column must be binary; a
    /// {1,2}-coded label is recoded to {1,0} with 1 as the positive class.
    pub fn from_csv<P: AsRef<Path>>(path: P, label_column: &str) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&path)
            .with_context(|| format!("Failed to open dataset: {}", path.as_ref().display()))?;

        let headers = reader
            .headers()
            .context("Failed to read CSV header row")?
            .clone();

        let label_idx = headers
            .iter()
            .position(|h| h == label_column)
            .ok_or_else(|| anyhow!("Missing label column '{}'", label_column))?;

        // Deduplicate on the raw string records so that e.g. "1.0" and "1.00"
        // stay distinct, exactly as the upstream table has them.
        let mut seen: HashSet<Vec<String>> = HashSet::new();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;
            if record.len() != headers.len() {
                return Err(anyhow!(
                    "Row {} has {} fields, expected {}",
                    row_idx + 1,
                    record.len(),
                    headers.len()
                ));
            }
            let row: Vec<String> = record.iter().map(|f| f.trim().to_string()).collect();
            if seen.insert(row.clone()) {
                rows.push(row);
            }
        }
        if rows.is_empty() {
            return Err(anyhow!("Dataset contains no rows"));
        }

        let labels = parse_labels(&rows, label_idx, label_column)?;

        let mut names = Vec::new();
        let mut columns = Vec::new();
        for (col_idx, header) in headers.iter().enumerate() {
            if col_idx == label_idx {
                continue;
            }
            names.push(header.to_string());
            columns.push(infer_column(&rows, col_idx));
        }

        log::debug!(
            "Loaded {} unique rows, {} feature columns from {}",
            rows.len(),
            columns.len(),
            path.as_ref().display()
        );

        Ok(Dataset {
            features: FeatureFrame { names, columns },
            labels,
        })
    }

    pub fn nrows(&self) -> usize {
        self.features.nrows()
    }
}

fn parse_labels(rows: &[Vec<String>], label_idx: usize, label_column: &str) -> Result<Array1<i32>> {
    let mut raw = Vec::with_capacity(rows.len());
    for (row_idx, row) in rows.iter().enumerate() {
        let value = row[label_idx].parse::<i32>().with_context(|| {
            format!("Invalid label '{}' at row {}", row[label_idx], row_idx + 1)
        })?;
        raw.push(value);
    }

    let distinct: HashSet<i32> = raw.iter().copied().collect();
    let zero_one = distinct.iter().all(|v| *v == 0 || *v == 1);
    let one_two = distinct.iter().all(|v| *v == 1 || *v == 2);
    if !(zero_one || one_two) {
        return Err(anyhow!(
            "Label column '{}' must be binary {{0,1}} or {{1,2}}, found values {:?}",
            label_column,
            distinct
        ));
    }

    // {1,2} coding: 1 is the positive (patient) class.
    let labels = if distinct.contains(&2) {
        raw.iter().map(|&v| if v == 1 { 1 } else { 0 }).collect()
    } else {
        raw
    };
    Ok(Array1::from_vec(labels))
}

fn infer_column(rows: &[Vec<String>], col_idx: usize) -> Column {
    let numeric = rows
        .iter()
        .all(|row| row[col_idx].is_empty() || row[col_idx].parse::<f32>().is_ok());
    if numeric {
        Column::Numeric(
            rows.iter()
                .map(|row| {
                    if row[col_idx].is_empty() {
                        f32::NAN
                    } else {
                        row[col_idx].parse::<f32>().unwrap_or(f32::NAN)
                    }
                })
                .collect(),
        )
    } else {
        Column::Categorical(rows.iter().map(|row| row[col_idx].clone()).collect())
    }
}

/// The four partitions produced by `train_test_split`.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: FeatureFrame,
    pub x_test: FeatureFrame,
    pub y_train: Array1<i32>,
    pub y_test: Array1<i32>,
}

/// Stratified train/test split, deterministic for a fixed seed.
///
/// Rows are allocated per class so that each partition keeps the full
/// dataset's label proportions to within rounding; every row lands in
/// exactly one partition.
pub fn train_test_split(dataset: &Dataset, test_fraction: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
        return Err(anyhow!("test_fraction must be in (0, 1), got {}", test_fraction));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_indices = Vec::new();
    let mut test_indices = Vec::new();

    for class in [0, 1] {
        let mut members: Vec<usize> = dataset
            .labels
            .iter()
            .enumerate()
            .filter_map(|(i, &y)| (y == class).then(|| i))
            .collect();
        if members.len() < 2 {
            return Err(anyhow!(
                "Class {} has {} member(s); need at least 2 to stratify",
                class,
                members.len()
            ));
        }
        members.shuffle(&mut rng);

        let n_test = ((members.len() as f64 * test_fraction).round() as usize)
            .clamp(1, members.len() - 1);
        test_indices.extend_from_slice(&members[..n_test]);
        train_indices.extend_from_slice(&members[n_test..]);
    }

    // Restore original row order within each partition.
    train_indices.sort_unstable();
    test_indices.sort_unstable();

    log::debug!(
        "Split {} rows into {} train / {} test (seed {})",
        dataset.nrows(),
        train_indices.len(),
        test_indices.len(),
        seed
    );

    Ok(TrainTestSplit {
        x_train: dataset.features.select_rows(&train_indices),
        x_test: dataset.features.select_rows(&test_indices),
        y_train: select_labels(&dataset.labels, &train_indices),
        y_test: select_labels(&dataset.labels, &test_indices),
    })
}

pub(crate) fn select_labels(labels: &Array1<i32>, indices: &[usize]) -> Array1<i32> {
    indices.iter().map(|&i| labels[i]).collect()
}
