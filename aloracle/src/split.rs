//! The held-out split an [`ALOracle`](crate::ALOracle) produces.
//!
//! A `Split` is immutable: it keeps the ground-truth labels and
//! the training runtimes to itself and only hands them out through
//! cost-bounded label queries and through scoring.
use polars::prelude::*;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::error::{OracleError, Result};
use crate::labels::{Label, Target};
use crate::metrics::matthews_corrcoef;


/// Names one side of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Train,
    Test,
}


/// Outcome of a single simulated label query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Position of the queried row in the training partition.
    pub query_index: usize,

    /// The true label, or `None` if the solver hit the timeout first.
    pub label: Option<Label>,

    /// Runtime charged for the query.
    pub cost: f64,
}


/// A holdout split with its hidden ground truth.
#[derive(Debug, Clone)]
pub struct Split {
    target: Target,

    x_train: DataFrame,
    x_test: Option<DataFrame>,

    // Positions of the rows in the dataset passed to the oracle.
    train_rows: Vec<usize>,
    test_rows: Option<Vec<usize>>,

    y_train: Vec<Label>,
    y_test: Option<Vec<Label>>,

    // Needed to assess query costs.
    runtimes_train: Vec<f64>,

    // Budget of a query without an explicit timeout.
    full_budget: f64,
}


/// Training side of a split before it is wrapped up.
pub(crate) struct TrainPart {
    pub(crate) x: DataFrame,
    pub(crate) rows: Vec<usize>,
    pub(crate) labels: Vec<Label>,
    pub(crate) runtimes: Vec<f64>,
}


/// Test side of a split before it is wrapped up.
pub(crate) struct TestPart {
    pub(crate) x: DataFrame,
    pub(crate) rows: Vec<usize>,
    pub(crate) labels: Vec<Label>,
}


impl Split {
    pub(crate) fn new(target: Target,
                      train: TrainPart,
                      test: Option<TestPart>,
                      full_budget: f64)
        -> Self
    {
        assert_eq!(train.x.height(), train.labels.len());
        assert_eq!(train.labels.len(), train.runtimes.len());

        let (x_test, test_rows, y_test) = match test {
            Some(part) => (Some(part.x), Some(part.rows), Some(part.labels)),
            None => (None, None, None),
        };

        Self {
            target,
            x_train: train.x,
            x_test,
            train_rows: train.rows,
            test_rows,
            y_train: train.labels,
            y_test,
            runtimes_train: train.runtimes,
            full_budget,
        }
    }


    pub fn target(&self) -> &Target {
        &self.target
    }


    /// Feature part of the training set.
    pub fn x_train(&self) -> &DataFrame {
        &self.x_train
    }


    /// Feature part of the test set, `None` for a split without one.
    pub fn x_test(&self) -> Option<&DataFrame> {
        self.x_test.as_ref()
    }


    /// Dataset positions of the training rows, in split order.
    pub fn train_rows(&self) -> &[usize] {
        &self.train_rows
    }


    pub fn test_rows(&self) -> Option<&[usize]> {
        self.test_rows.as_deref()
    }


    #[inline(always)]
    pub fn train_size(&self) -> usize {
        self.y_train.len()
    }


    /// Number of test rows, `0` without a test set.
    #[inline(always)]
    pub fn test_size(&self) -> usize {
        self.y_test.as_ref().map_or(0, Vec::len)
    }


    /// Timeout used by queries that do not bring their own.
    pub fn full_budget(&self) -> f64 {
        self.full_budget
    }


    /// Query the labels of training rows, each subject to a timeout.
    ///
    /// If a timeout is lower than the actual runtime,
    /// the label stays unknown and the query costs the timeout.
    /// Otherwise the actual label is returned at the cost of the
    /// actual runtime. Without `timeouts`, every query runs with
    /// the full budget, which always reveals the label.
    ///
    /// The full budget is twice the competition timeout, not the
    /// competition timeout itself: a solver that did not finish
    /// reveals the timeout label at a cost of `2 * timeout`
    /// rather than staying unknown at a cost of `timeout`.
    ///
    /// Results come back in query order; a repeated index is
    /// answered again.
    pub fn query_labels(&self, indices: &[usize], timeouts: Option<&[f64]>)
        -> Result<Vec<QueryResult>>
    {
        if let Some(timeouts) = timeouts {
            if timeouts.len() != indices.len() {
                return Err(OracleError::invalid(format!(
                    "got {} query indices but {} timeouts",
                    indices.len(), timeouts.len()
                )));
            }
        }


        let mut results = Vec::with_capacity(indices.len());
        for (k, &query_index) in indices.iter().enumerate() {
            let timeout = timeouts.map_or(self.full_budget, |t| t[k]);
            if timeout.is_nan() || timeout < 0.0 {
                return Err(OracleError::invalid(format!(
                    "query {k}: timeout must be non-negative, got {timeout}"
                )));
            }

            let runtime = *self.runtimes_train.get(query_index)
                .ok_or_else(|| OracleError::invalid(format!(
                    "query index {query_index} is out of range \
                     for {} training rows",
                    self.train_size()
                )))?;

            let result = if timeout < runtime {
                QueryResult { query_index, label: None, cost: timeout }
            } else {
                let label = Some(self.y_train[query_index]);
                QueryResult { query_index, label, cost: runtime }
            };
            results.push(result);
        }


        let cost = results.iter().map(|r| r.cost).sum::<f64>();
        let missing = results.iter().filter(|r| r.label.is_none()).count();
        debug!(queries = results.len(), missing, cost, "answered label queries");

        Ok(results)
    }


    /// Score predictions for the partition whose size they match.
    ///
    /// The training partition is tried first, so if both partitions
    /// have the same size the predictions count as training ones.
    /// Use [`Split::score_partition`] to say which one is meant.
    pub fn score(&self, y_pred: &[u8]) -> Result<f64> {
        let partition = if y_pred.len() == self.train_size() {
            Partition::Train
        } else if self.y_test.is_some() && y_pred.len() == self.test_size() {
            Partition::Test
        } else {
            return Err(OracleError::invalid(format!(
                "{} predictions match neither the {} training \
                 nor the {} test rows",
                y_pred.len(), self.train_size(), self.test_size()
            )));
        };

        self.score_partition(partition, y_pred)
    }


    /// MCC of `y_pred` against the ground truth of `partition`,
    /// aligned by position in split order.
    pub fn score_partition(&self, partition: Partition, y_pred: &[u8])
        -> Result<f64>
    {
        let y_true = match partition {
            Partition::Train => &self.y_train,
            Partition::Test => self.y_test.as_ref()
                .ok_or_else(|| OracleError::invalid(
                    "the split has no test partition"
                ))?,
        };

        if y_pred.len() != y_true.len() {
            return Err(OracleError::invalid(format!(
                "{} predictions for {} {partition:?} rows",
                y_pred.len(), y_true.len()
            )));
        }

        if let Some(bad) = y_pred.iter().find(|&&p| p > 1) {
            return Err(OracleError::invalid(format!(
                "invalid label {bad} in predictions, expected 0 or 1"
            )));
        }

        let y_true = y_true.iter()
            .map(|label| label.value())
            .collect::<Vec<u8>>();

        matthews_corrcoef(&y_true, y_pred)
    }
}
