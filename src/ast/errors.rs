use thiserror::Error;

/**********************************************\
|* Converting between rust values and Values  *|
\**********************************************/
#[derive(Error, Debug, PartialEq)]
#[error("Can't convert builtin type '{builtin_type}' to rust type '{rust_type}'")]
pub struct ConversionError {
    pub builtin_type: String,
    pub rust_type: String,
}

/// One diagnostic recorded by the checker. These are accumulated on the
/// type context, never returned as `Err`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    #[error("type mismatch: expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },

    #[error("could not find identifier '{0}'")]
    Unresolved(String),

    #[error("'{name}' redeclared as {current} (was {previous})")]
    Redeclared {
        name: String,
        previous: String,
        current: String,
    },

    #[error("operator '{operator}' can't be applied to {operand}")]
    Operator { operator: String, operand: String },

    #[error("{0} is not callable")]
    NotCallable(String),

    #[error("function takes {expected} arguments but got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("{0} can't be indexed")]
    NotIndexable(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("NaN can't be used as a table key")]
    NanKey,
}
