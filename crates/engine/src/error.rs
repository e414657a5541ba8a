//! Parse failures.
//!
//! Every variant that can point at the input carries the byte `offset` it
//! refers to.

use thiserror::Error;

/// Errors produced by a grammar run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input buffer was empty.
    #[error("empty input")]
    EmptyInput,

    /// The root did not match. `offset` is the rightmost position any token
    /// failed at; `expected` names the tokens that failed there.
    #[error("no match at byte {offset}: expected one of {expected:?}")]
    NoMatch { offset: usize, expected: Vec<String> },

    /// The root matched but stopped short of the end of the input.
    #[error("unexpected trailing input at byte {offset}")]
    TrailingInput { offset: usize },

    /// Composite nesting went deeper than the configured limit.
    #[error("nesting depth limit {depth} exceeded at byte {offset}")]
    DepthLimitExceeded { depth: usize, offset: usize },

    /// The run allocated more tree nodes or child edges than it may address.
    #[error("node limit {limit} exceeded at byte {offset}")]
    NodeLimitExceeded { limit: usize, offset: usize },
}

impl ParseError {
    /// The input position the error refers to, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::EmptyInput => None,
            ParseError::NoMatch { offset, .. }
            | ParseError::TrailingInput { offset }
            | ParseError::DepthLimitExceeded { offset, .. }
            | ParseError::NodeLimitExceeded { offset, .. } => Some(*offset),
        }
    }
}
