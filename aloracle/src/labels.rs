//! Binary labels and the two kinds of prediction target.
use polars::prelude::*;
use serde::{Serialize, Deserialize};

use crate::config::OracleConfig;
use crate::error::{OracleError, Result};

use std::fmt;


/// A binary class label. The only values are `0` and `1`,
/// so a label can never carry a placeholder for "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct Label(bool);


impl Label {
    pub const SAT: Label = Label(false);
    pub const UNSAT: Label = Label(true);
    pub const NO_TIMEOUT: Label = Label(false);
    pub const TIMEOUT: Label = Label(true);


    /// Numeric value of the label, `0` or `1`.
    #[inline(always)]
    pub fn value(self) -> u8 {
        self.0 as u8
    }
}


impl From<Label> for u8 {
    fn from(label: Label) -> u8 {
        label.value()
    }
}


impl TryFrom<u8> for Label {
    type Error = OracleError;
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Label(false)),
            1 => Ok(Label(true)),
            _ => Err(OracleError::invalid(
                format!("label must be 0 or 1, got {value}")
            )),
        }
    }
}


impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}


/// What the labels of a split encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Satisfiability of the instance (`sat = 0`, `unsat = 1`).
    Result,

    /// Whether the named solver times out (`timeout = 1`).
    Runtime(String),
}


/// Rows that survive target resolution, with their labels
/// and the runtimes used for query costs.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedTarget {
    pub(crate) rows: Vec<usize>,
    pub(crate) labels: Vec<Label>,
    pub(crate) runtimes: Vec<f64>,
}


impl Target {
    /// Interpret a column name as a target.
    pub fn parse(name: &str, config: &OracleConfig) -> Result<Self> {
        if name == config.result_column {
            Ok(Target::Result)
        } else if name.starts_with(config.runtime_prefix.as_str()) {
            Ok(Target::Runtime(name.to_string()))
        } else {
            Err(OracleError::invalid(format!(
                "target `{name}` needs to be `{}` or a `{}` column",
                config.result_column, config.runtime_prefix
            )))
        }
    }


    /// Column holding the runtimes charged for label queries.
    pub fn runtime_column<'a>(&'a self, config: &'a OracleConfig) -> &'a str {
        match self {
            Target::Result => config.default_solver.as_str(),
            Target::Runtime(column) => column.as_str(),
        }
    }


    /// Derive labels and runtimes from `df`.
    ///
    /// For [`Target::Result`], rows on which the default solver
    /// timed out are dropped, since their outcome is unknown.
    /// A kept row whose satisfiability is neither `sat` nor `unsat`
    /// is reported as `InvalidArgument` instead of panicking.
    pub(crate) fn resolve(&self, df: &DataFrame, config: &OracleConfig)
        -> Result<ResolvedTarget>
    {
        let runtime_column = self.runtime_column(config);
        let runtimes = runtime_values(df, runtime_column)?;
        let timeout = config.timeout_runtime();

        let resolved = match self {
            Target::Result => {
                let outcomes = string_values(df, &config.result_column)?;

                let mut rows = Vec::new();
                let mut labels = Vec::new();
                let mut kept = Vec::new();
                for (i, (runtime, outcome)) in runtimes.into_iter()
                    .zip(outcomes)
                    .enumerate()
                {
                    if runtime == timeout {
                        continue;
                    }
                    let label = match outcome.as_deref() {
                        Some("sat") => Label::SAT,
                        Some("unsat") => Label::UNSAT,
                        other => {
                            return Err(OracleError::invalid(format!(
                                "row {i}: cannot encode satisfiability {other:?}"
                            )));
                        },
                    };
                    rows.push(i);
                    labels.push(label);
                    kept.push(runtime);
                }
                ResolvedTarget { rows, labels, runtimes: kept }
            },
            Target::Runtime(_) => {
                let labels = runtimes.iter()
                    .map(|&r| if r == timeout { Label::TIMEOUT } else { Label::NO_TIMEOUT })
                    .collect::<Vec<_>>();
                let rows = (0..runtimes.len()).collect();
                ResolvedTarget { rows, labels, runtimes }
            },
        };

        Ok(resolved)
    }
}


/// Read a numeric column as `f64`, rejecting missing values.
pub(crate) fn runtime_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    let series = df.column(column)
        .map_err(|_| OracleError::invalid(
            format!("runtime column `{column}` is not in the dataset")
        ))?
        .cast(&DataType::Float64)?;

    series.f64()?
        .into_iter()
        .enumerate()
        .map(|(i, runtime)| match runtime {
            Some(r) if r.is_finite() && r >= 0.0 => Ok(r),
            other => Err(OracleError::invalid(format!(
                "row {i}: invalid runtime {other:?} in `{column}`"
            ))),
        })
        .collect()
}


/// Read a column as strings, whatever its dtype.
pub(crate) fn string_values(df: &DataFrame, column: &str)
    -> Result<Vec<Option<String>>>
{
    let series = df.column(column)
        .map_err(|_| OracleError::invalid(
            format!("column `{column}` is not in the dataset")
        ))?
        .cast(&DataType::String)?;

    let values = series.str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();

    Ok(values)
}
