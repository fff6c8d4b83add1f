//! Error types for the property tree core

use thiserror::Error;

use crate::value::ScalarKind;

/// Result type for property operations
pub type Result<T> = std::result::Result<T, XmpError>;

/// Property tree errors
///
/// Absence of a property or sub-entry is never an error; lookups return
/// `Option`/empty results instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum XmpError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("type mismatch on {name}: {operation} is not valid for a {kind} property")]
    TypeMismatch {
        name: String,
        kind: String,
        operation: &'static str,
    },

    #[error("schema violation on {name}: registry declares {declared}, got {actual}")]
    SchemaViolation {
        name: String,
        declared: String,
        actual: String,
    },

    #[error("invalid qualified name: {0}")]
    InvalidName(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Why a scalar's textual form failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// Text does not match the scalar's grammar
    Malformed,
    /// Text matches the grammar but the value is outside the representable range
    OutOfRange,
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeErrorKind::Malformed => write!(f, "malformed"),
            DecodeErrorKind::OutOfRange => write!(f, "out of range"),
        }
    }
}

/// Failure to decode a scalar value from its textual representation
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} {target} value: {input:?}")]
pub struct DecodeError {
    /// What went wrong
    pub kind: DecodeErrorKind,
    /// The scalar kind the text was decoded as
    pub target: ScalarKind,
    /// The offending input text
    pub input: String,
}

impl DecodeError {
    pub(crate) fn malformed(target: ScalarKind, input: impl Into<String>) -> Self {
        Self {
            kind: DecodeErrorKind::Malformed,
            target,
            input: input.into(),
        }
    }

    pub(crate) fn out_of_range(target: ScalarKind, input: impl Into<String>) -> Self {
        Self {
            kind: DecodeErrorKind::OutOfRange,
            target,
            input: input.into(),
        }
    }
}
