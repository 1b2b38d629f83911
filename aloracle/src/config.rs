//! Constants of the SAT-solving dataset, gathered in one
//! deserializable struct so that a course run can override them.
use serde::{Serialize, Deserialize};

use crate::error::{OracleError, Result};

use std::fs;
use std::path::Path;


/// Timeout of the SAT Competition in seconds.
pub const COMPETITION_TIMEOUT: f64 = 5000.0;

/// Winner of the 2022 SAT Competition's Anniversary Track.
pub const DEFAULT_SOLVER: &str = "runtimes.Kissat_MAB_ESA";


/// Column names and constants the oracle relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Solver time limit. A runtime of twice this value
    /// encodes "did not finish".
    pub competition_timeout: f64,

    /// Runtime column used for the `result` target.
    pub default_solver: String,

    pub result_column: String,

    pub runtime_prefix: String,

    /// Columns starting with one of these are features.
    pub feature_prefixes: Vec<String>,

    /// Instance identifier, kept in exported holdout files.
    pub id_column: String,
}


impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            competition_timeout: COMPETITION_TIMEOUT,
            default_solver:      DEFAULT_SOLVER.to_string(),
            result_column:       "result".to_string(),
            runtime_prefix:      "runtimes.".to_string(),
            feature_prefixes:    vec!["base.".to_string(), "gate.".to_string()],
            id_column:           "hash".to_string(),
        }
    }
}


impl OracleConfig {
    /// Read a config from a JSON file.
    /// Missing fields fall back to their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }


    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)
            .map_err(|e| OracleError::Config { reason: e.to_string() })?;
        config.validate()?;
        Ok(config)
    }


    fn validate(&self) -> Result<()> {
        if !(self.competition_timeout.is_finite() && self.competition_timeout > 0.0) {
            return Err(OracleError::Config {
                reason: format!(
                    "competition timeout must be positive, got {}",
                    self.competition_timeout
                ),
            });
        }
        if !self.default_solver.starts_with(&self.runtime_prefix) {
            return Err(OracleError::Config {
                reason: format!(
                    "default solver `{}` is not a `{}` column",
                    self.default_solver, self.runtime_prefix
                ),
            });
        }
        if self.feature_prefixes.is_empty() {
            return Err(OracleError::Config {
                reason: "at least one feature prefix is required".to_string(),
            });
        }
        Ok(())
    }


    /// Runtime recorded for a solver that did not finish.
    /// This is also the largest runtime any instance carries.
    #[inline(always)]
    pub fn timeout_runtime(&self) -> f64 {
        2.0 * self.competition_timeout
    }


    /// Returns `true` if `column` is a feature column.
    pub fn is_feature(&self, column: &str) -> bool {
        self.feature_prefixes.iter()
            .any(|prefix| column.starts_with(prefix.as_str()))
    }


    /// Targets exported by the holdout split, in export order.
    pub fn holdout_targets(&self) -> Vec<String> {
        vec![self.default_solver.clone(), self.result_column.clone()]
    }
}
