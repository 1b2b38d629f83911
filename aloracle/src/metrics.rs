//! Classification quality metrics.
use crate::error::{OracleError, Result};

use std::collections::HashMap;
use std::hash::Hash;


/// Matthews correlation coefficient between `y_true` and `y_pred`.
///
/// Works for any number of classes
/// (the multiclass generalization by Gorodkin)
/// and reduces to the usual binary MCC for two classes.
/// The value lies in `[-1, 1]`; it is `0.0`
/// whenever either vector holds a single class only.
pub fn matthews_corrcoef<T>(y_true: &[T], y_pred: &[T]) -> Result<f64>
    where T: Eq + Hash,
{
    if y_true.len() != y_pred.len() {
        return Err(OracleError::invalid(format!(
            "cannot compare {} labels with {} predictions",
            y_true.len(), y_pred.len()
        )));
    }
    if y_true.is_empty() {
        return Err(OracleError::invalid("cannot score zero predictions"));
    }


    let mut true_counts: HashMap<&T, f64> = HashMap::new();
    let mut pred_counts: HashMap<&T, f64> = HashMap::new();
    let mut correct = 0.0;
    for (t, p) in y_true.iter().zip(y_pred) {
        *true_counts.entry(t).or_insert(0.0) += 1.0;
        *pred_counts.entry(p).or_insert(0.0) += 1.0;
        if t == p {
            correct += 1.0;
        }
    }


    let samples = y_true.len() as f64;
    let cross = true_counts.iter()
        .map(|(k, t)| t * pred_counts.get(k).copied().unwrap_or(0.0))
        .sum::<f64>();
    let true_sq = true_counts.values().map(|t| t * t).sum::<f64>();
    let pred_sq = pred_counts.values().map(|p| p * p).sum::<f64>();


    let cov_true_pred = correct * samples - cross;
    let cov_true_true = samples * samples - true_sq;
    let cov_pred_pred = samples * samples - pred_sq;

    let denominator = cov_true_true * cov_pred_pred;
    if denominator == 0.0 {
        return Ok(0.0);
    }

    let mcc = cov_true_pred / denominator.sqrt();
    Ok(mcc.clamp(-1.0, 1.0))
}
