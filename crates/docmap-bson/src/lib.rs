//! Document value model and extended JSON text codec.
//!
//! - [`Value`] / [`Document`]: the closed set of element kinds a stored
//!   document holds, with order-preserving documents.
//! - [`Decimal128`] / [`ObjectId`]: the two scalar kinds with their own
//!   binary layout and canonical text form.
//! - [`ejson`]: conversion of value trees to and from extended JSON text.

pub mod decimal128;
pub mod document;
pub mod ejson;
pub mod error;
pub mod object_id;
pub mod value;

pub use decimal128::Decimal128;
pub use document::{Document, ID_FIELD};
pub use ejson::{from_text, to_text, value_from_text, value_to_text, TextDecodeError, TextMode};
pub use error::ValueError;
pub use object_id::ObjectId;
pub use value::{Binary, JavaScriptCodeWithScope, Regex, Timestamp, Value, ValueKind};
