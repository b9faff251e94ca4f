//! Binary classification metrics: ROC-AUC, accuracy, F1, and a per-class
//! text report.
//!
//! AUC is computed rank-based (Mann-Whitney) with midrank tie handling, the
//! same sort-then-accumulate machinery used for score ranking elsewhere in
//! the pipeline. Labels use 0/1 coding with 1 as the positive class.

use crate::error::MetricError;

/// Area under the ROC curve from positive-class scores.
///
/// # Arguments
///
/// * `y_true` - 0/1 labels.
/// * `scores` - predicted positive-class scores, higher = more positive.
///
/// # Returns
///
/// AUC in [0,1]; 0.5 is chance level, 1.0 is perfect separation.
pub fn roc_auc_score(y_true: &[i32], scores: &[f32]) -> Result<f64, MetricError> {
    if y_true.len() != scores.len() {
        return Err(MetricError::LengthMismatch);
    }
    let nan_count = scores.iter().filter(|s| s.is_nan()).count();
    if nan_count > 0 {
        return Err(MetricError::NaNFound(nan_count));
    }
    let n_pos = y_true.iter().filter(|&&y| y == 1).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(MetricError::SingleClass);
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // Midranks: tied scores all receive the average of their rank range.
    let mut ranks = vec![0.0f64; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let midrank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = midrank;
        }
        i = j + 1;
    }

    let rank_sum: f64 = y_true
        .iter()
        .zip(&ranks)
        .filter(|(&y, _)| y == 1)
        .map(|(_, &r)| r)
        .sum();
    let auc = (rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0) / (n_pos * n_neg) as f64;
    Ok(auc)
}

/// Exact-match rate between true and predicted labels.
pub fn accuracy_score(y_true: &[i32], y_pred: &[i32]) -> Result<f64, MetricError> {
    if y_true.len() != y_pred.len() {
        return Err(MetricError::LengthMismatch);
    }
    if y_true.is_empty() {
        return Err(MetricError::EmptyInput);
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// F1 score for the positive class (harmonic mean of precision and recall).
/// Returns 0.0 when the class is never predicted or never present.
pub fn f1_score(y_true: &[i32], y_pred: &[i32]) -> Result<f64, MetricError> {
    if y_true.len() != y_pred.len() {
        return Err(MetricError::LengthMismatch);
    }
    let (_, _, f1, _) = class_stats(y_true, y_pred, 1);
    Ok(f1)
}

/// Per-class precision/recall/F1/support for `class`.
fn class_stats(y_true: &[i32], y_pred: &[i32], class: i32) -> (f64, f64, f64, usize) {
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut fn_ = 0usize;
    let mut support = 0usize;
    for (&t, &p) in y_true.iter().zip(y_pred) {
        if t == class {
            support += 1;
        }
        match (t == class, p == class) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (false, false) => {}
        }
    }
    let precision = if tp + fp > 0 {
        tp as f64 / (tp + fp) as f64
    } else {
        0.0
    };
    let recall = if tp + fn_ > 0 {
        tp as f64 / (tp + fn_) as f64
    } else {
        0.0
    };
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    (precision, recall, f1, support)
}

/// Text block with per-class precision/recall/F1/support plus accuracy and
/// macro/weighted averages. Human-readable output, not a parseable contract.
pub fn classification_report(y_true: &[i32], y_pred: &[i32]) -> Result<String, MetricError> {
    if y_true.len() != y_pred.len() {
        return Err(MetricError::LengthMismatch);
    }
    if y_true.is_empty() {
        return Err(MetricError::EmptyInput);
    }

    let total = y_true.len();
    let accuracy = accuracy_score(y_true, y_pred)?;

    let mut lines = String::new();
    lines.push_str(&format!(
        "{:>12} {:>9} {:>9} {:>9} {:>9}\n\n",
        "", "precision", "recall", "f1-score", "support"
    ));

    let mut macro_avg = (0.0, 0.0, 0.0);
    let mut weighted_avg = (0.0, 0.0, 0.0);
    for class in [0, 1] {
        let (p, r, f, s) = class_stats(y_true, y_pred, class);
        lines.push_str(&format!(
            "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
            class, p, r, f, s
        ));
        macro_avg = (macro_avg.0 + p / 2.0, macro_avg.1 + r / 2.0, macro_avg.2 + f / 2.0);
        let w = s as f64 / total as f64;
        weighted_avg = (
            weighted_avg.0 + p * w,
            weighted_avg.1 + r * w,
            weighted_avg.2 + f * w,
        );
    }

    lines.push_str(&format!(
        "\n{:>12} {:>9} {:>9} {:>9.2} {:>9}\n",
        "accuracy", "", "", accuracy, total
    ));
    lines.push_str(&format!(
        "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
        "macro avg", macro_avg.0, macro_avg.1, macro_avg.2, total
    ));
    lines.push_str(&format!(
        "{:>12} {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
        "weighted avg", weighted_avg.0, weighted_avg.1, weighted_avg.2, total
    ));

    Ok(lines)
}

/// Mean of a slice of f64 scores.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation of a slice of f64 scores.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::assert_float_absolute_eq;

    #[test]
    fn auc_perfect_separation() {
        let y = vec![0, 0, 1, 1];
        let scores = vec![0.1, 0.2, 0.8, 0.9];
        assert_float_absolute_eq!(roc_auc_score(&y, &scores).unwrap(), 1.0, 1e-12);
    }

    #[test]
    fn auc_reversed_separation() {
        let y = vec![1, 1, 0, 0];
        let scores = vec![0.1, 0.2, 0.8, 0.9];
        assert_float_absolute_eq!(roc_auc_score(&y, &scores).unwrap(), 0.0, 1e-12);
    }

    #[test]
    fn auc_with_ties_uses_midranks() {
        // One tie straddling the classes: AUC = (1 + 0.5) / 2
        let y = vec![0, 1, 0, 1];
        let scores = vec![0.1, 0.5, 0.5, 0.9];
        assert_float_absolute_eq!(roc_auc_score(&y, &scores).unwrap(), 0.75, 1e-12);
    }

    #[test]
    fn auc_rejects_single_class() {
        assert_eq!(
            roc_auc_score(&[1, 1], &[0.3, 0.4]).unwrap_err(),
            MetricError::SingleClass
        );
    }

    #[test]
    fn auc_rejects_nan_scores() {
        assert_eq!(
            roc_auc_score(&[0, 1], &[f32::NAN, 0.4]).unwrap_err(),
            MetricError::NaNFound(1)
        );
    }

    #[test]
    fn empty_input_is_reported_as_such() {
        assert_eq!(accuracy_score(&[], &[]).unwrap_err(), MetricError::EmptyInput);
        assert_eq!(
            classification_report(&[], &[]).unwrap_err(),
            MetricError::EmptyInput
        );
        // Unequal lengths still report the mismatch, not emptiness.
        assert_eq!(
            accuracy_score(&[1], &[]).unwrap_err(),
            MetricError::LengthMismatch
        );
    }

    #[test]
    fn accuracy_matches_manual_mean() {
        let y_true = vec![0, 1, 1, 0, 1];
        let y_pred = vec![0, 1, 0, 0, 1];
        let manual = y_true
            .iter()
            .zip(&y_pred)
            .filter(|(t, p)| t == p)
            .count() as f64
            / y_true.len() as f64;
        assert_float_absolute_eq!(accuracy_score(&y_true, &y_pred).unwrap(), manual, 1e-12);
    }

    #[test]
    fn f1_known_value() {
        // tp=2, fp=1, fn=1 -> precision 2/3, recall 2/3, f1 2/3
        let y_true = vec![1, 1, 1, 0, 0];
        let y_pred = vec![1, 1, 0, 1, 0];
        assert_float_absolute_eq!(f1_score(&y_true, &y_pred).unwrap(), 2.0 / 3.0, 1e-12);
    }

    #[test]
    fn report_contains_both_classes_and_accuracy() {
        let y_true = vec![0, 1, 1, 0];
        let y_pred = vec![0, 1, 0, 0];
        let report = classification_report(&y_true, &y_pred).unwrap();
        assert!(report.contains("precision"));
        assert!(report.contains("macro avg"));
        assert!(report.contains("accuracy"));
    }

    #[test]
    fn mean_and_std() {
        let v = vec![1.0, 2.0, 3.0, 4.0];
        assert_float_absolute_eq!(mean(&v), 2.5, 1e-12);
        assert_float_absolute_eq!(std_dev(&v), (1.25f64).sqrt(), 1e-12);
    }
}
