//! Validation and scoring of prediction files handed in by teams.
use polars::prelude::*;
use serde::{Serialize, Deserialize};
use tracing::warn;
use walkdir::WalkDir;

use crate::config::OracleConfig;
use crate::error::{OracleError, Result};
use crate::holdout::read_csv;
use crate::labels::string_values;
use crate::metrics::matthews_corrcoef;

use std::collections::HashMap;
use std::fmt;
use std::path::Path;


/// Outcome of checking a submission against the ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validity {
    Valid,
    WrongRowCount,
    WrongColumnCount,
    WrongColumnNames,
    MissingValues,
    IntegerLabels,
    InvalidClassLabel,
    Unreadable,
}


impl Validity {
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        *self == Validity::Valid
    }


    pub fn message(&self) -> &'static str {
        match self {
            Validity::Valid =>
                "Valid.",
            Validity::WrongRowCount =>
                "Number of predictions wrong (could also be issue with header).",
            Validity::WrongColumnCount =>
                "Number of columns wrong (index column might be saved).",
            Validity::WrongColumnNames =>
                "At least one column name wrong (might be quoted).",
            Validity::MissingValues =>
                "At least one NA.",
            Validity::IntegerLabels =>
                "Predicted class labels are integer.",
            Validity::InvalidClassLabel =>
                "At least one invalid class label.",
            Validity::Unreadable =>
                "File could not be parsed as CSV.",
        }
    }
}


impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}


/// What a task accepts in its label column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LabelRule {
    /// Class names as text; integer-typed columns are rejected.
    Textual,

    /// Numeric classes from a fixed set.
    Classes(Vec<i64>),
}


/// Where a task keeps its scoring files and how they look.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringTask {
    pub target: String,
    pub id_column: String,

    /// File name of the ground truth inside the scoring directory.
    pub ground_truth: String,

    /// Submissions are named `{prefix}<team>_prediction.csv`.
    pub prefix: String,

    pub labels: LabelRule,
}


impl ScoringTask {
    /// Scoring of one SAT-solving target, as exported by
    /// [`Holdout::write_csv`](crate::holdout::Holdout::write_csv).
    pub fn sat(target: &str, config: &OracleConfig) -> Self {
        Self {
            target: target.to_string(),
            id_column: config.id_column.clone(),
            ground_truth: format!("{target}_y_test.csv"),
            prefix: format!("{target}_"),
            labels: LabelRule::Textual,
        }
    }
}


/// Scoring result of one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionScore {
    pub team: String,

    /// MCC, `NaN` for an invalid submission.
    pub score: f64,

    pub validity: Validity,
}


/// Read a submission without quote handling,
/// so that quoted column names stay quoted.
pub fn read_submission<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let df = CsvReader::from_path(path.as_ref())?
        .has_header(true)
        .with_quote_char(None)
        .finish()?;

    Ok(df)
}


/// Check that `submission` has the shape and column layout
/// of `ground_truth`, no missing values,
/// and labels the task accepts.
pub fn validate_submission(submission: &DataFrame,
                           ground_truth: &DataFrame,
                           task: &ScoringTask)
    -> Validity
{
    if submission.height() != ground_truth.height() {
        return Validity::WrongRowCount;
    }
    if submission.width() != ground_truth.width() {
        return Validity::WrongColumnCount;
    }
    if submission.get_column_names() != ground_truth.get_column_names() {
        return Validity::WrongColumnNames;
    }
    if submission.get_columns().iter().any(|s| s.null_count() > 0) {
        return Validity::MissingValues;
    }

    let Ok(series) = submission.column(&task.target) else {
        return Validity::WrongColumnNames;
    };
    match &task.labels {
        LabelRule::Textual if series.dtype().is_integer() => Validity::IntegerLabels,
        LabelRule::Textual => Validity::Valid,
        LabelRule::Classes(classes) => {
            if only_classes(series, classes) {
                Validity::Valid
            } else {
                Validity::InvalidClassLabel
            }
        },
    }
}


/// Returns `true` if every value of `series` is one of `classes`.
/// Values that are not numbers never match.
fn only_classes(series: &Series, classes: &[i64]) -> bool {
    let Ok(values) = series.cast(&DataType::Float64) else {
        return false;
    };
    let Ok(values) = values.f64() else {
        return false;
    };

    let all_match = values.into_iter()
        .all(|v| v.is_some_and(|v| classes.iter().any(|&c| c as f64 == v)));
    all_match
}


/// MCC of a submission, matched to the ground truth by identifier.
/// Rows whose identifier is not in the ground truth are ignored.
pub fn score_submission(submission: &DataFrame,
                        ground_truth: &DataFrame,
                        target: &str,
                        id_column: &str)
    -> Result<f64>
{
    let truth = string_values(ground_truth, id_column)?
        .into_iter()
        .zip(string_values(ground_truth, target)?)
        .filter_map(|(id, label)| Some((id?, label?)))
        .collect::<HashMap<String, String>>();


    let ids = string_values(submission, id_column)?;
    let predictions = string_values(submission, target)?;

    let (y_true, y_pred): (Vec<String>, Vec<String>) = ids.into_iter()
        .zip(predictions)
        .filter_map(|(id, pred)| {
            let label = truth.get(id.as_deref()?)?;
            Some((label.clone(), pred?))
        })
        .unzip();

    if y_true.is_empty() {
        return Err(OracleError::invalid(
            "no submitted identifier appears in the ground truth"
        ));
    }

    matthews_corrcoef(&y_true, &y_pred)
}


/// Score all `{prefix}<team>_prediction.csv` files in `dir`
/// against the task's ground truth in the same directory.
/// The best team comes first; invalid submissions come last.
pub fn score_directory<P: AsRef<Path>>(dir: P, task: &ScoringTask)
    -> Result<Vec<SubmissionScore>>
{
    let dir = dir.as_ref();
    let ground_truth = read_csv(dir.join(&task.ground_truth))?;

    let suffix = "_prediction.csv";


    let mut results = Vec::new();
    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in entries {
        let entry = entry.map_err(|e| OracleError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        let Some(team) = name.strip_prefix(task.prefix.as_str())
            .and_then(|rest| rest.strip_suffix(suffix))
        else {
            continue;
        };


        let validity = match read_submission(entry.path()) {
            Ok(submission) => {
                let validity = validate_submission(&submission, &ground_truth, task);
                if validity.is_valid() {
                    let score = score_submission(
                        &submission, &ground_truth, &task.target, &task.id_column
                    )?;
                    results.push(SubmissionScore {
                        team: team.to_string(),
                        score,
                        validity,
                    });
                    continue;
                }
                validity
            },
            Err(e) => {
                warn!(team, error = %e, "cannot read submission");
                Validity::Unreadable
            },
        };

        warn!(team, %validity, "invalid submission");
        results.push(SubmissionScore {
            team: team.to_string(),
            score: f64::NAN,
            validity,
        });
    }


    results.sort_by(|a, b| rank(b.score).total_cmp(&rank(a.score)));

    Ok(results)
}


fn rank(score: f64) -> f64 {
    if score.is_nan() { f64::NEG_INFINITY } else { score }
}
