//! Course tooling for the earthquake damage task.
//!
//! Building features and damage grades come in two files that share
//! the `building_id` column. The grades `1`, `2` and `3` are scored
//! with the same multiclass MCC as the SAT-solving targets.
use polars::prelude::*;
use tracing::info;

use crate::baseline::MajorityClassifier;
use crate::error::{OracleError, Result};
use crate::holdout::write_csv;
use crate::oracle::take_rows;
use crate::stratify::stratified_split;
use crate::submission::{LabelRule, ScoringTask};

use std::path::{Path, PathBuf};


pub const ID_COLUMN: &str = "building_id";

pub const TARGET: &str = "damage_grade";

/// Valid damage grades.
pub const GRADES: [i64; 3] = [1, 2, 3];

pub const MAJORITY_PREDICTION: &str = "majority_prediction.csv";


/// Both sides of a damage-grade split.
#[derive(Debug, Clone)]
pub struct EarthquakeHoldout {
    pub x_train: DataFrame,
    pub x_test: DataFrame,
    pub y_train: DataFrame,
    pub y_test: DataFrame,
}


impl EarthquakeHoldout {
    /// Split the row-aligned `values` and `labels` tables,
    /// stratified by damage grade.
    pub fn create(values: &DataFrame,
                  labels: &DataFrame,
                  test_size: f64,
                  seed: u64)
        -> Result<Self>
    {
        if values.height() != labels.height() {
            return Err(OracleError::invalid(format!(
                "{} feature rows but {} label rows",
                values.height(), labels.height()
            )));
        }

        let grades = grades(labels)?;
        let (train, test) = stratified_split(&grades, test_size, seed)?;

        info!(train = train.len(), test = test.len(), "exported damage-grade split");

        Ok(Self {
            x_train: take_rows(values, &train)?,
            x_test: take_rows(values, &test)?,
            y_train: take_rows(labels, &train)?,
            y_test: take_rows(labels, &test)?,
        })
    }


    /// Write `{train,test}_{values,labels}.csv` into `dir`
    /// and return the written paths.
    pub fn write_csv<P: AsRef<Path>>(&mut self, dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let mut paths = Vec::with_capacity(4);
        for (name, df) in [
            ("train_values.csv", &mut self.x_train),
            ("test_values.csv", &mut self.x_test),
            ("train_labels.csv", &mut self.y_train),
            ("test_labels.csv", &mut self.y_test),
        ] {
            let path = dir.join(name);
            write_csv(df, &path)?;
            paths.push(path);
        }

        Ok(paths)
    }
}


/// Predict the most frequent training grade for every test building.
pub fn majority_prediction(test_values: &DataFrame, train_labels: &DataFrame)
    -> Result<DataFrame>
{
    let model = MajorityClassifier::fit(&grades(train_labels)?)?;
    let ids = test_values.column(ID_COLUMN)
        .map_err(|_| OracleError::invalid(
            format!("column `{ID_COLUMN}` is not in the test values")
        ))?
        .clone();

    let df = DataFrame::new(vec![
        ids,
        Series::new(TARGET, model.predict_all(test_values.height())),
    ])?;

    Ok(df)
}


/// Scoring layout of the earthquake task:
/// `<team>_prediction.csv` against `test_labels.csv`.
pub fn scoring_task() -> ScoringTask {
    ScoringTask {
        target: TARGET.to_string(),
        id_column: ID_COLUMN.to_string(),
        ground_truth: "test_labels.csv".to_string(),
        prefix: String::new(),
        labels: LabelRule::Classes(GRADES.to_vec()),
    }
}


fn grades(labels: &DataFrame) -> Result<Vec<i64>> {
    let series = labels.column(TARGET)
        .map_err(|_| OracleError::invalid(
            format!("column `{TARGET}` is not in the labels")
        ))?
        .cast(&DataType::Int64)?;

    series.i64()?
        .into_iter()
        .enumerate()
        .map(|(i, grade)| grade.ok_or_else(|| OracleError::invalid(
            format!("row {i}: missing `{TARGET}`")
        )))
        .collect()
}
