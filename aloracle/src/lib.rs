//! Active-learning oracle for the SAT-solving course task.
//!
//! The [`ALOracle`] splits an instance dataset into a held-out
//! [`Split`], which answers timeout-bounded label queries and
//! scores predictions with the Matthews correlation coefficient.
//! The remaining modules hold the course tooling around it:
//! dataset merging, holdout export, a majority-class baseline,
//! submission scoring, and the same tools for the earthquake task.

pub mod baseline;
pub mod config;
pub mod earthquake;
pub mod error;
pub mod holdout;
pub mod labels;
pub mod metrics;
pub mod oracle;
pub mod prepare;
pub mod split;
pub mod stratify;
pub mod submission;


pub use baseline::MajorityClassifier;
pub use config::OracleConfig;
pub use error::{OracleError, Result};
pub use labels::{Label, Target};
pub use metrics::matthews_corrcoef;
pub use oracle::ALOracle;
pub use split::{Partition, QueryResult, Split};
pub use submission::{LabelRule, ScoringTask, SubmissionScore, Validity};


pub mod prelude {
    pub use crate::baseline::MajorityClassifier;
    pub use crate::config::OracleConfig;
    pub use crate::error::{OracleError, Result};
    pub use crate::labels::{Label, Target};
    pub use crate::metrics::matthews_corrcoef;
    pub use crate::oracle::ALOracle;
    pub use crate::split::{Partition, QueryResult, Split};
}
