//! Grammar graphs for the jsonparse engine.
//!
//! A grammar is a named table of tokens and nodes plus one root. Nodes come
//! in three kinds:
//!
//! - **Parser**: terminal, bound to one token
//! - **Sequencer**: ordered AND over its children
//! - **Splitter**: ordered OR over its children
//!
//! Grammars are written with a [`GrammarBuilder`], which accepts forward
//! references and cycles by name, then validated into an immutable
//! [`Grammar`].
//!
//! # Usage
//!
//! ```
//! use jsonparse_common::{ByteClass, TokenOp};
//! use jsonparse_grammar::GrammarBuilder;
//!
//! let mut b = GrammarBuilder::new("digits");
//! b.terminal("digit", vec![TokenOp::one_of(ByteClass::DIGIT)])
//!     .terminal("comma", vec![TokenOp::literal(",")])
//!     .sequencer("digit_loop", &["digit", "comma", "digit_next"])
//!     .splitter("digit_next", &["digit_loop", "digit"])
//!     .root("digit_next");
//! let grammar = b.build().unwrap();
//! assert_eq!(grammar.rule(grammar.root()).name(), "digit_next");
//! ```
//!
//! # Passes
//!
//! 1. **Structural**: names resolve, composites are non-empty, root exists
//! 2. **Left recursion**: no node re-enters itself without consuming input
//! 3. **Reachability**: unreachable nodes are logged

pub mod builder;
pub mod graph;
pub mod rule;

mod reachability;
mod recursion;
mod structural;

pub use builder::GrammarBuilder;
pub use graph::Grammar;
pub use rule::{Rule, RuleId, RuleKind, TokenId};
