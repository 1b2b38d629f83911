//! This file defines `ALOracle`, which turns an instance dataset
//! into a [`Split`] for active-learning experiments.
//!
//! The oracle itself holds no split state.
//! Label queries and scoring happen on the returned `Split`,
//! so they cannot be issued before a split exists.
use polars::prelude::*;
use tracing::info;

use crate::config::OracleConfig;
use crate::error::{OracleError, Result};
use crate::labels::{Label, Target};
use crate::split::{Split, TestPart, TrainPart};
use crate::stratify::stratified_split;


/// Active-learning oracle.
#[derive(Debug, Clone, Default)]
pub struct ALOracle {
    config: OracleConfig,
}


impl ALOracle {
    /// Initialize the `ALOracle` with the default config.
    pub fn init() -> Self {
        Self::default()
    }


    /// Replace the config.
    pub fn config(mut self, config: OracleConfig) -> Self {
        self.config = config;

        self
    }


    pub fn get_config(&self) -> &OracleConfig {
        &self.config
    }


    /// Create a stratified holdout split of `dataset`.
    ///
    /// The base and gate features form the feature tables;
    /// `target` decides the labels, either the satisfiability
    /// `result` or whether a `runtimes.` solver times out.
    /// For `result`, instances on which the default solver times out
    /// are discarded, as their satisfiability is undetermined.
    ///
    /// `test_size` is the fraction of instances going into the test
    /// set and must lie in `[0, 1)`; with `0` there is no test set
    /// and the training set keeps the dataset's row order.
    /// `seed` makes the split reproducible.
    pub fn split_data(&self,
                      dataset: &DataFrame,
                      target: &str,
                      test_size: f64,
                      seed: u64)
        -> Result<Split>
    {
        if !dataset.get_column_names().contains(&target) {
            return Err(OracleError::invalid(
                format!("target `{target}` is not a column of the dataset")
            ));
        }
        if !(0.0..1.0).contains(&test_size) {
            return Err(OracleError::invalid(format!(
                "test size should be a relative value in [0, 1), got {test_size}"
            )));
        }

        let target = Target::parse(target, &self.config)?;
        let resolved = target.resolve(dataset, &self.config)?;


        let features = dataset.get_column_names()
            .into_iter()
            .filter(|name| self.config.is_feature(name))
            .collect::<Vec<_>>();
        if features.is_empty() {
            return Err(OracleError::invalid(format!(
                "the dataset has no feature columns (prefixes {:?})",
                self.config.feature_prefixes
            )));
        }
        let x = take_rows(&dataset.select(features)?, &resolved.rows)?;
        let positive_rate = positive_rate(&resolved.labels);


        let split = if test_size == 0.0 {
            let train = TrainPart {
                x,
                rows: resolved.rows,
                labels: resolved.labels,
                runtimes: resolved.runtimes,
            };
            Split::new(target, train, None, self.config.timeout_runtime())
        } else {
            let (train_pos, test_pos) = stratified_split(
                &resolved.labels, test_size, seed
            )?;

            let train = TrainPart {
                x: take_rows(&x, &train_pos)?,
                rows: pick(&resolved.rows, &train_pos),
                labels: pick(&resolved.labels, &train_pos),
                runtimes: pick(&resolved.runtimes, &train_pos),
            };
            let test = TestPart {
                x: take_rows(&x, &test_pos)?,
                rows: pick(&resolved.rows, &test_pos),
                labels: pick(&resolved.labels, &test_pos),
            };
            Split::new(target, train, Some(test), self.config.timeout_runtime())
        };


        info!(
            kind = ?split.target(),
            dropped = dataset.height() - split.train_size() - split.test_size(),
            train = split.train_size(),
            test = split.test_size(),
            positive_rate,
            "created holdout split"
        );

        Ok(split)
    }
}


/// Rows of `df` at `positions`, in that order.
pub(crate) fn take_rows(df: &DataFrame, positions: &[usize]) -> Result<DataFrame> {
    let idx = positions.iter()
        .map(|&i| i as IdxSize)
        .collect::<Vec<_>>();
    let idx = IdxCa::from_vec("idx", idx);

    Ok(df.take(&idx)?)
}


fn pick<T: Copy>(values: &[T], positions: &[usize]) -> Vec<T> {
    positions.iter()
        .map(|&i| values[i])
        .collect()
}


/// Share of label `1` among `labels`.
fn positive_rate(labels: &[Label]) -> f64 {
    let positives = labels.iter()
        .filter(|l| l.value() == 1)
        .count();
    positives as f64 / labels.len().max(1) as f64
}
