use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypedDataError {
    #[error("unknown type '{0}'")]
    UnknownType(String),

    #[error("missing field '{field}' in value of type '{type_name}'")]
    MissingField { type_name: String, field: String },

    #[error("invalid value for type '{type_name}': {reason}")]
    InvalidValue { type_name: String, reason: String },

    #[error("array of type '{type_name}' expected {expected} elements, got {actual}")]
    ArrayLength {
        type_name: String,
        expected: usize,
        actual: usize,
    },
}

impl TypedDataError {
    pub(crate) fn invalid(type_name: &str, reason: impl Into<String>) -> Self {
        TypedDataError::InvalidValue {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }
}
