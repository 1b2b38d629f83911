//! Holdout export for course-internal scoring.
//!
//! Unlike [`ALOracle::split_data`](crate::ALOracle::split_data),
//! which keeps its ground truth hidden, this writes both sides of a
//! stratified split to CSV files, each row tagged with the instance
//! identifier. Ground truth stays in readable form
//! (`sat`/`unsat`, `timeout`/`no-timeout`) and no rows are dropped.
use polars::prelude::*;
use tracing::info;

use crate::config::OracleConfig;
use crate::error::{OracleError, Result};
use crate::labels::{runtime_values, string_values, Target};
use crate::oracle::take_rows;
use crate::stratify::stratified_split;

use std::fs::File;
use std::path::{Path, PathBuf};


pub const TIMEOUT: &str = "timeout";
pub const NO_TIMEOUT: &str = "no-timeout";


/// Both sides of an exported split.
#[derive(Debug, Clone)]
pub struct Holdout {
    pub target: String,
    pub x_train: DataFrame,
    pub x_test: DataFrame,
    pub y_train: DataFrame,
    pub y_test: DataFrame,
}


impl Holdout {
    /// Split `dataset` for `target`.
    pub fn create(dataset: &DataFrame,
                  target: &str,
                  test_size: f64,
                  seed: u64,
                  config: &OracleConfig)
        -> Result<Self>
    {
        let ids = dataset.column(&config.id_column)
            .map_err(|_| OracleError::invalid(format!(
                "identifier column `{}` is not in the dataset", config.id_column
            )))?
            .clone();

        let labels = match Target::parse(target, config)? {
            Target::Result => string_values(dataset, target)?
                .into_iter()
                .enumerate()
                .map(|(i, label)| label.ok_or_else(|| OracleError::invalid(
                    format!("row {i}: missing `{target}` value")
                )))
                .collect::<Result<Vec<String>>>()?,
            Target::Runtime(column) => {
                let timeout = config.timeout_runtime();
                runtime_values(dataset, &column)?
                    .into_iter()
                    .map(|r| (if r == timeout { TIMEOUT } else { NO_TIMEOUT }).to_string())
                    .collect()
            },
        };


        let mut columns = vec![config.id_column.as_str()];
        columns.extend(
            dataset.get_column_names()
                .into_iter()
                .filter(|name| config.is_feature(name))
        );
        let x = dataset.select(columns)?;

        let label_refs = labels.iter()
            .map(String::as_str)
            .collect::<Vec<_>>();
        let y = DataFrame::new(vec![ids, Series::new(target, label_refs)])?;


        let (train, test) = stratified_split(&labels, test_size, seed)?;

        info!(column = target, train = train.len(), test = test.len(), "exported holdout split");

        Ok(Self {
            target: target.to_string(),
            x_train: take_rows(&x, &train)?,
            x_test: take_rows(&x, &test)?,
            y_train: take_rows(&y, &train)?,
            y_test: take_rows(&y, &test)?,
        })
    }


    /// Write `{target}_{X,y}_{train,test}.csv` into `dir`
    /// and return the written paths.
    pub fn write_csv<P: AsRef<Path>>(&mut self, dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let target = self.target.clone();
        let mut paths = Vec::with_capacity(4);
        for (part, df) in [
            ("X_train", &mut self.x_train),
            ("X_test", &mut self.x_test),
            ("y_train", &mut self.y_train),
            ("y_test", &mut self.y_test),
        ] {
            let path = dir.join(format!("{target}_{part}.csv"));
            write_csv(df, &path)?;
            paths.push(path);
        }

        Ok(paths)
    }
}


/// Read a CSV file with a header line.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let df = CsvReader::from_path(path.as_ref())?
        .has_header(true)
        .finish()?;

    Ok(df)
}


/// Write `df` to `path` as CSV with a header line.
pub fn write_csv<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> Result<()> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)?;

    Ok(())
}
