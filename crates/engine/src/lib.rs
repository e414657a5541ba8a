//! Grammar executor for jsonparse.
//!
//! The engine runs a validated [`Grammar`] against a byte buffer and returns
//! the concrete parse tree of the root node:
//! - A **Parser** node matches its token at the cursor and becomes a leaf
//! - A **Sequencer** matches every child in order; its span runs from the
//!   first child's start to the last child's end
//! - A **Splitter** tries its children in order, keeps the first success and
//!   wraps it as its single child
//!
//! Any failure restores the cursor to where the failing node was entered.
//! Nesting is tracked on a heap frame stack, and composite outcomes are
//! memoized per `(node, offset)`, so runs are linear in the input for the
//! loop/next and empty/singleton/regular idioms and never exhaust the
//! native stack.
//!
//! # Usage
//!
//! ```
//! use jsonparse_common::{ByteClass, TokenOp};
//! use jsonparse_grammar::GrammarBuilder;
//! use jsonparse_engine::run;
//!
//! let mut b = GrammarBuilder::new("word");
//! b.terminal("letters", vec![TokenOp::one_or_more(ByteClass::range(b'a', b'z'))])
//!     .terminal("bang", vec![TokenOp::literal("!")])
//!     .sequencer("shout", &["letters", "bang"])
//!     .root("shout");
//! let grammar = b.build().unwrap();
//!
//! let ast = run(&grammar, b"hey!").unwrap();
//! let letters = ast.child(ast.root(), 0).unwrap();
//! assert_eq!(ast.text(letters), b"hey");
//! ```

pub mod ast;
pub mod error;
pub mod execute;
pub mod machine;
pub mod options;

pub use ast::{Ast, AstNode, Descendants, NodeId, RunStats};
pub use error::ParseError;
pub use machine::Machine;
pub use options::{RunOptions, DEFAULT_MAX_DEPTH, MAX_NODES};

use jsonparse_grammar::Grammar;

/// Parse `input` with `grammar` under default [`RunOptions`].
///
/// # Errors
///
/// Returns [`ParseError`] if the input is empty, the root does not match,
/// or the match leaves trailing input.
pub fn run<'a>(grammar: &'a Grammar, input: &'a [u8]) -> Result<Ast<'a>, ParseError> {
    run_with(grammar, input, &RunOptions::default())
}

/// Parse `input` with `grammar` under explicit options.
pub fn run_with<'a>(
    grammar: &'a Grammar,
    input: &'a [u8],
    options: &RunOptions,
) -> Result<Ast<'a>, ParseError> {
    Machine::new(grammar, input, *options).execute()
}

#[cfg(test)]
mod proptests {
    use super::*;
    use jsonparse_common::{ByteClass, TokenOp};
    use jsonparse_grammar::GrammarBuilder;
    use proptest::prelude::*;

    /// Nested bracket lists of digits with empty/singleton/regular variants.
    fn nested() -> Grammar {
        let mut b = GrammarBuilder::new("nested");
        b.terminal("open", vec![TokenOp::literal("[")])
            .terminal("close", vec![TokenOp::literal("]")])
            .terminal("comma", vec![TokenOp::literal(",")])
            .terminal("num", vec![TokenOp::one_or_more(ByteClass::DIGIT)])
            .splitter("item", &["list", "num"])
            .sequencer("item_loop", &["item", "comma", "item_next"])
            .splitter("item_next", &["item_loop", "item"])
            .sequencer("empty", &["open", "close"])
            .sequencer("single", &["open", "item", "close"])
            .sequencer("many", &["open", "item_loop", "close"])
            .splitter("list", &["empty", "single", "many"])
            .root("list");
        b.build().unwrap()
    }

    fn outcome(result: Result<Ast<'_>, ParseError>) -> Result<String, ParseError> {
        result.map(|ast| ast.dump())
    }

    proptest! {
        #[test]
        fn memo_never_changes_the_outcome(input in "[\\[\\],0-9]{0,24}") {
            let g = nested();
            let memo = outcome(run(&g, input.as_bytes()));
            let plain = outcome(run_with(
                &g,
                input.as_bytes(),
                &RunOptions::default().with_memoize(false),
            ));
            prop_assert_eq!(memo, plain);
        }

        #[test]
        fn accepted_root_spans_the_input(input in "[\\[\\],0-9]{1,24}") {
            let g = nested();
            if let Ok(ast) = run(&g, input.as_bytes()) {
                prop_assert_eq!(ast.span(ast.root()).as_range(), 0..input.len());
            }
        }
    }
}
