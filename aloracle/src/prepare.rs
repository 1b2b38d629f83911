//! Merge the instance databases into the SAT-solving dataset.
//!
//! Expects local CSV exports: `meta` (with `hash`, `result` and the
//! competition `track`), the feature databases `base` and `gate`,
//! and the competition's `runtimes`. Every column except `hash`
//! (and `result` in `meta`) gets its database name as prefix.
use polars::prelude::*;
use tracing::info;

use crate::config::OracleConfig;
use crate::error::{OracleError, Result};
use crate::labels::string_values;
use crate::oracle::take_rows;

use std::collections::{HashMap, HashSet};


/// Databases merged into `meta`, in merge order.
pub const DATABASES: [&str; 3] = ["base", "gate", "runtimes"];

/// Text columns of the runtime export that are not solver runtimes.
pub const RUNTIME_CATEGORICAL_COLUMNS: [&str; 3] = [
    "benchmark", "claimed-result", "verified-result",
];

/// Anniversary Track of the 2022 SAT Competition.
pub const TRACK: &str = "anni_2022";


/// Left-join `databases` onto `meta` by instance identifier and keep
/// the instances of [`TRACK`] with a known result and complete
/// numeric data. The `meta.` columns are dropped from the output.
pub fn merge_databases(meta: &DataFrame,
                       databases: &[(&str, DataFrame)],
                       config: &OracleConfig)
    -> Result<DataFrame>
{
    let id = config.id_column.as_str();
    let result = config.result_column.as_str();

    let mut dataset = prefixed(meta, "meta", &[id, result])?;
    let meta_ids = string_values(&dataset, id)?;


    let mut numeric = Vec::new();
    for (name, db) in databases {
        let keep = db.get_column_names()
            .into_iter()
            .filter(|c| !RUNTIME_CATEGORICAL_COLUMNS.contains(c))
            .collect::<Vec<_>>();
        let db = prefixed(&db.select(keep)?, name, &[id])?;

        let mut position = HashMap::new();
        for (row, key) in string_values(&db, id)?.into_iter().enumerate() {
            if let Some(key) = key {
                position.entry(key).or_insert(row as IdxSize);
            }
        }
        let idx = meta_ids.iter()
            .map(|key| key.as_ref().and_then(|k| position.get(k).copied()))
            .collect::<IdxCa>();

        let joined = db.drop(id)?.take(&idx)?;
        numeric.extend(joined.get_column_names().into_iter().map(str::to_string));
        dataset.hstack_mut(joined.get_columns())?;
    }


    for column in &numeric {
        let values = dataset.column(column)?.cast(&DataType::Float64)?;
        dataset.with_column(values)?;
    }

    // Missing or unparsable numbers are nulls after the cast.
    let mut complete = vec![true; dataset.height()];
    for column in &numeric {
        for (i, null) in dataset.column(column)?.is_null().into_iter().enumerate() {
            if null == Some(true) {
                complete[i] = false;
            }
        }
    }

    let track = string_values(&dataset, "meta.track")?;
    let outcome = string_values(&dataset, result)?;
    let rows = (0..dataset.height())
        .filter(|&i| track[i].as_deref().is_some_and(|t| t.contains(TRACK)))
        .filter(|&i| outcome[i].as_deref() != Some("unknown"))
        .filter(|&i| complete[i])
        .collect::<Vec<_>>();
    let dataset = take_rows(&dataset, &rows)?;


    let keep = dataset.get_column_names()
        .into_iter()
        .filter(|c| !c.contains("meta."))
        .collect::<Vec<_>>();
    let dataset = dataset.select(keep)?;

    let ids = string_values(&dataset, id)?;
    let unique = ids.iter().collect::<HashSet<_>>();
    if unique.len() != ids.len() {
        return Err(OracleError::invalid(
            format!("merged dataset has duplicate `{id}` values")
        ));
    }

    info!(instances = dataset.height(), columns = dataset.width(), "merged databases");

    Ok(dataset)
}


/// Copy of `df` with every column outside `keep` renamed to
/// `{name}.{column}`.
fn prefixed(df: &DataFrame, name: &str, keep: &[&str]) -> Result<DataFrame> {
    let mut df = df.clone();
    let columns = df.get_column_names()
        .into_iter()
        .filter(|c| !keep.contains(c))
        .map(str::to_string)
        .collect::<Vec<_>>();
    for column in columns {
        df.rename(&column, &format!("{name}.{column}"))?;
    }

    Ok(df)
}

