use docmap_bson::ValueKind;
use thiserror::Error;

/// Errors raised while resolving serializers, converting values and
/// translating change entries.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MappingError {
    #[error("no known serializer for type '{0}'")]
    UnsupportedType(String),
    #[error("unexpected entity state: {0}")]
    UnsupportedState(u8),
    #[error("document element is {reason} for required non-nullable property '{property}'")]
    MissingRequiredValue { property: String, reason: MissingReason },
    #[error("cannot find the primary key for the entity: {0}")]
    MissingPrimaryKey(String),
    #[error("value {value} overflows {target}")]
    NumericOverflow { value: String, target: String },
    #[error("value {value} would be truncated converting to {target}")]
    NumericTruncation { value: String, target: String },
    #[error("attempted to resolve type discriminator for '{0}'")]
    UnresolvedDiscriminator(String),
    #[error("entity type '{0}' not found in model")]
    EntityTypeNotFound(String),
    #[error("type '{ty}' cannot be represented as {kind}")]
    InvalidRepresentation { ty: String, kind: ValueKind },
    #[error("cannot read a {found} element as '{ty}'")]
    UnexpectedValue { ty: String, found: ValueKind },
    #[error("invalid value for '{ty}': {value}")]
    InvalidValue { ty: String, value: String },
    #[error("entity type '{entity}' has no property '{property}'")]
    UnknownProperty { entity: String, property: String },
    #[error("navigation shape mismatch: {0}")]
    NavigationShape(String),
    #[error("row version property '{0}' does not hold an integer")]
    InvalidRowVersion(String),
    #[error("value converter failed: {0}")]
    Converter(String),
}

/// Why a required element could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingReason {
    Missing,
    Null,
}

impl std::fmt::Display for MissingReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MissingReason::Missing => "missing",
            MissingReason::Null => "null",
        })
    }
}
