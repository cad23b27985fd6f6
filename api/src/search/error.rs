use thiserror::Error;

/// Reasons a `search` filter is rejected. All of them are caller errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("Malformed filter clause: '{0}' (expected field<op>value)")]
    MalformedClause(String),
    #[error("Filter field must not be blank")]
    BlankField,
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Operator '{operation}' is not supported for field {field}")]
    UnsupportedOperation {
        field: String,
        operation: &'static str,
    },
    #[error("Invalid date '{0}' (expected dd.mm.yyyy)")]
    InvalidDate(String),
    #[error("Invalid value '{value}' for field {field}: {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: &'static str,
    },
}
