//! Value parsing errors.

use thiserror::Error;

/// Error type for parsing scalar value payloads from their text forms.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("invalid ObjectId: {0:?}")]
    InvalidObjectId(String),
    #[error("invalid Decimal128 string: {0:?}")]
    InvalidDecimal128(String),
    #[error("Decimal128 value out of range: {0:?}")]
    Decimal128OutOfRange(String),
}
