use polars::prelude::PolarsError;


/// Errors raised by the oracle and the course tooling around it.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// A caller-side precondition does not hold.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("invalid config: {reason}")]
    Config { reason: String },

    #[error("dataframe error: {0}")]
    Polars(#[from] PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}


impl OracleError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument { reason: reason.into() }
    }


    /// Returns `true` for the `InvalidArgument` kind.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}


pub type Result<T> = std::result::Result<T, OracleError>;
