//! Extended JSON text encoding and decoding.
//!
//! Typed values are preserved with `$`-prefixed wrapper objects
//! (e.g. `{"$oid":"..."}`, `{"$numberInt":"..."}`). Two output modes exist:
//! - **Native**: the terse shell form; 32- and 64-bit integers are bare numbers.
//! - **Strict**: every integer carries its type wrapper, so decoding the
//!   output yields exactly the encoded value.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod escape;

pub use decoder::TextDecoder;
pub use encoder::TextEncoder;
pub use error::TextDecodeError;
pub use escape::escape;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::value::Value;

/// Output flavour of the text encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    #[default]
    Native,
    Strict,
}

/// Renders a document as compact extended JSON.
pub fn to_text(doc: &Document, mode: TextMode) -> String {
    TextEncoder::new(mode).encode_document(doc)
}

/// Renders any value as compact extended JSON.
pub fn value_to_text(value: &Value, mode: TextMode) -> String {
    TextEncoder::new(mode).encode_value(value)
}

/// Parses extended JSON text whose top-level value is a document.
pub fn from_text(text: &str) -> Result<Document, TextDecodeError> {
    match TextDecoder::new(text).decode()? {
        Value::Document(doc) => Ok(doc),
        other => Err(TextDecodeError::NotADocument(other.kind())),
    }
}

/// Parses extended JSON text holding any value.
pub fn value_from_text(text: &str) -> Result<Value, TextDecodeError> {
    TextDecoder::new(text).decode()
}
