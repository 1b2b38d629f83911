//! Majority-class baseline.
use serde::{Serialize, Deserialize};

use crate::error::{OracleError, Result};

use std::collections::BTreeMap;


/// Classifier that always predicts the most frequent training label.
/// Ties go to the smallest label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorityClassifier<T> {
    majority: T,
}


impl<T> MajorityClassifier<T>
    where T: Ord + Clone,
{
    /// Fit the classifier on the observed labels.
    pub fn fit(labels: &[T]) -> Result<Self> {
        let mut counts: BTreeMap<&T, usize> = BTreeMap::new();
        for label in labels {
            *counts.entry(label).or_insert(0) += 1;
        }

        // `max_by_key` keeps the last maximum, so walk the
        // classes in reverse to favor the smallest label.
        let majority = counts.into_iter()
            .rev()
            .max_by_key(|&(_, count)| count)
            .map(|(label, _)| label.clone())
            .ok_or_else(|| OracleError::invalid(
                "cannot fit a majority classifier on zero labels"
            ))?;

        Ok(Self { majority })
    }


    pub fn majority(&self) -> &T {
        &self.majority
    }


    /// Predict `size` examples.
    pub fn predict_all(&self, size: usize) -> Vec<T> {
        vec![self.majority.clone(); size]
    }
}
