use sled::transaction::{ConflictableTransactionError, TransactionError};

/// Every failure an engine operation can report. The first four are the
/// business outcomes a caller is expected to handle, the rest are
/// infrastructure faults.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("storage failure: {0}")]
    Storage(#[from] sled::Error),
    #[error("failed to encode or decode a record: {0}")]
    Codec(String),
    #[error("failed to generate identifier: {0}")]
    IdGeneration(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Result type used inside a store transaction closure.
pub type TxResult<T> = std::result::Result<T, ConflictableTransactionError<EngineError>>;

impl EngineError {
    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        EngineError::NotFound(format!("{what} {id}"))
    }
    pub fn is_conflict(&self) -> bool {
        matches!(self, EngineError::Conflict(_))
    }
    pub fn is_forbidden(&self) -> bool {
        matches!(self, EngineError::Forbidden(_))
    }
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::NotFound(_))
    }
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, EngineError::InvalidArgument(_))
    }
}

impl From<minicbor::decode::Error> for EngineError {
    fn from(value: minicbor::decode::Error) -> Self {
        EngineError::Codec(value.to_string())
    }
}

impl<E: std::fmt::Display> From<minicbor::encode::Error<E>> for EngineError {
    fn from(value: minicbor::encode::Error<E>) -> Self {
        EngineError::Codec(value.to_string())
    }
}

impl From<TransactionError<EngineError>> for EngineError {
    fn from(value: TransactionError<EngineError>) -> Self {
        match value {
            TransactionError::Abort(err) => err,
            TransactionError::Storage(err) => EngineError::Storage(err),
        }
    }
}

/// Abort the surrounding store transaction with a business error.
pub fn abort<T>(err: EngineError) -> TxResult<T> {
    Err(ConflictableTransactionError::Abort(err))
}
