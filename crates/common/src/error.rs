//! Grammar construction errors.
//!
//! A malformed grammar is a programming error, not an input condition. These
//! errors are reported once, when the grammar is built, and never during a
//! parse.

use thiserror::Error;

/// Errors found while defining or building a grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A token was defined with no operators.
    #[error("token '{token}' has no operators")]
    EmptyToken { token: String },

    /// A token operator matches the empty byte string.
    #[error("token '{token}' contains an empty literal")]
    EmptyLiteral { token: String },

    /// Two tokens share a name.
    #[error("token '{token}' is defined more than once")]
    DuplicateToken { token: String },

    /// Two grammar nodes share a name.
    #[error("node '{node}' is defined more than once")]
    DuplicateNode { node: String },

    /// A Sequencer or Splitter names a child that was never defined.
    #[error("node '{node}' references undefined node '{child}'")]
    UndefinedNode { node: String, child: String },

    /// A Parser node names a token that was never defined.
    #[error("parser node '{node}' references undefined token '{token}'")]
    UndefinedToken { node: String, token: String },

    /// A Sequencer or Splitter has no children.
    #[error("node '{node}' has no children")]
    EmptyNode { node: String },

    /// No root node was designated.
    #[error("grammar '{grammar}' has no root node")]
    MissingRoot { grammar: String },

    /// The designated root names a node that was never defined.
    #[error("grammar '{grammar}' root '{node}' is not defined")]
    UndefinedRoot { grammar: String, node: String },

    /// More tokens or nodes than a `u32` id can address.
    #[error("grammar '{grammar}' defines {count} {what}, more than ids can address")]
    TooManyDefinitions {
        grammar: String,
        what: &'static str,
        count: usize,
    },

    /// A node can reach itself without consuming input.
    #[error("node '{node}' is left-recursive")]
    LeftRecursion { node: String },
}
