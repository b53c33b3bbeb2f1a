//! Error types for cascade-meta

use crate::Coordinate;

pub type Result<T> = std::result::Result<T, ParameterError>;

/// Failures scoped to a single parameter, raised while decoding a raw
/// value or while resolving a parameter to its final value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParameterError {
    #[error("unknown parameter type `{kind}`")]
    UnknownType { kind: String },

    #[error("missing field `{field}`")]
    MissingField { field: String },

    #[error("invalid value for field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("cannot resolve property `{property}` of `{coordinate}`: {reason}")]
    UnresolvedReference {
        coordinate: Coordinate,
        property: String,
        reason: String,
    },

    #[error("environment variable `{name}` is not set")]
    MissingEnvironmentVariable { name: String },
}

impl ParameterError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
