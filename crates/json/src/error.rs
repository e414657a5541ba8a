//! Query errors and the crate-level error type.

use jsonparse_common::GrammarError;
use jsonparse_engine::ParseError;
use thiserror::Error;

use crate::value::JsonType;

/// Errors from looking up or decoding values in a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// No member named `segment` exists at that point of `path`.
    #[error("key '{segment}' not found (path '{path}')")]
    KeyNotFound { path: String, segment: String },

    /// The value `segment` should be looked up in is not an object.
    #[error("cannot look up '{segment}' in a non-object (path '{path}')")]
    NotAnObject { path: String, segment: String },

    /// A typed accessor was called on a value of another type.
    #[error("expected {expected}, found {found} at byte {offset}")]
    TypeMismatch {
        expected: JsonType,
        found: JsonType,
        offset: usize,
    },

    /// The number does not fit the requested numeric type.
    #[error("number at byte {offset} is out of range")]
    NumericOverflow { offset: usize },

    /// The number could not be decoded.
    #[error("malformed number at byte {offset}")]
    NumericFormat { offset: usize },

    /// A `\u` escape names half of a surrogate pair without the other half.
    #[error("unpaired surrogate escape at byte {offset}")]
    UnpairedSurrogate { offset: usize },
}

/// Any error this crate can return.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Query(#[from] QueryError),
}
