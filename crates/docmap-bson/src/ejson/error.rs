//! Error types for extended JSON decoding.

use thiserror::Error;

use crate::value::ValueKind;

/// Errors that can occur while parsing extended JSON text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextDecodeError {
    /// Generic JSON syntax error at the given byte offset.
    #[error("invalid JSON at byte offset {0}")]
    InvalidJson(usize),
    /// A complete value was followed by more non-whitespace input.
    #[error("unexpected trailing characters at byte offset {0}")]
    TrailingCharacters(usize),
    /// A `$`-wrapper had the right key but a malformed payload.
    #[error("invalid {0} wrapper")]
    InvalidWrapper(&'static str),
    /// A `$`-wrapper carried keys besides the ones it allows.
    #[error("invalid {0} wrapper: extra keys not allowed")]
    ExtraKeys(&'static str),
    /// The top-level value was not a document.
    #[error("expected a document at the top level, found {0}")]
    NotADocument(ValueKind),
}
