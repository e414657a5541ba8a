//! Integration tests for the grammar executor.
//!
//! Organized by node kind, then by the list idioms the JSON grammar relies
//! on (loop/next and empty/singleton/regular).

use jsonparse_common::{ByteClass, Span, TokenOp};
use jsonparse_engine::{run, run_with, Ast, ParseError, RunOptions};
use jsonparse_grammar::{Grammar, GrammarBuilder};

// ============================================================
// Helper functions
// ============================================================

/// Letters separated by commas inside parentheses, with the
/// empty/singleton/regular split: `()`, `(a)`, `(a,b,c)`.
fn letter_list() -> Grammar {
    let mut b = GrammarBuilder::new("letters");
    b.terminal("letter", vec![TokenOp::one_of(ByteClass::range(b'a', b'z'))])
        .terminal("open", vec![TokenOp::literal("(")])
        .terminal("close", vec![TokenOp::literal(")")])
        .terminal("comma", vec![TokenOp::literal(",")])
        .terminal("ws", vec![TokenOp::zero_or_more(ByteClass::from_bytes(b" "))])
        .sequencer("item_loop", &["letter", "ws", "comma", "ws", "item_next"])
        .splitter("item_next", &["item_loop", "letter"])
        .sequencer("empty_list", &["open", "ws", "close"])
        .sequencer("singleton_list", &["open", "ws", "letter", "ws", "close"])
        .sequencer("regular_list", &["open", "ws", "item_loop", "ws", "close"])
        .splitter("list", &["empty_list", "singleton_list", "regular_list"])
        .root("list");
    b.build().unwrap()
}

/// Names of the nodes on the path of first children from the root.
fn spine(ast: &Ast<'_>) -> Vec<String> {
    let mut out = Vec::new();
    let mut id = Some(ast.root());
    while let Some(n) = id {
        out.push(ast.name(n).to_string());
        id = ast.child(n, 0);
    }
    out
}

/// Collect the text of every node named `name`, in pre-order.
fn texts(ast: &Ast<'_>, name: &str) -> Vec<String> {
    ast.descendants(ast.root())
        .filter(|&n| ast.name(n) == name)
        .map(|n| String::from_utf8_lossy(ast.text(n)).into_owned())
        .collect()
}

// ============================================================
// Parser nodes
// ============================================================

#[test]
fn parser_root_matches_whole_input() {
    let mut b = GrammarBuilder::new("num");
    b.terminal("digits", vec![TokenOp::one_or_more(ByteClass::DIGIT)])
        .root("digits");
    let g = b.build().unwrap();
    let ast = run(&g, b"12345").unwrap();
    assert_eq!(ast.len(), 1);
    assert_eq!(ast.span(ast.root()), Span::new(0, 5));
    assert!(ast.children(ast.root()).is_empty());
}

#[test]
fn token_failure_names_the_token() {
    let mut b = GrammarBuilder::new("num");
    b.terminal("digits", vec![TokenOp::one_or_more(ByteClass::DIGIT)])
        .root("digits");
    let g = b.build().unwrap();
    assert_eq!(
        run(&g, b"x1").unwrap_err(),
        ParseError::NoMatch {
            offset: 0,
            expected: vec!["digits".into()],
        }
    );
}

#[test]
fn nullable_token_matches_empty_span() {
    let mut b = GrammarBuilder::new("t");
    b.terminal("a", vec![TokenOp::literal("a")])
        .terminal("ws", vec![TokenOp::zero_or_more(ByteClass::from_bytes(b" "))])
        .sequencer("top", &["ws", "a", "ws"])
        .root("top");
    let g = b.build().unwrap();
    let ast = run(&g, b"a").unwrap();
    let spans: Vec<_> = ast
        .children(ast.root())
        .iter()
        .map(|&c| ast.span(c))
        .collect();
    assert_eq!(spans, vec![Span::new(0, 0), Span::new(0, 1), Span::new(1, 1)]);
}

// ============================================================
// Splitter ordering
// ============================================================

#[test]
fn splitter_prefers_earlier_alternative() {
    let mut b = GrammarBuilder::new("t");
    b.terminal("long", vec![TokenOp::literal("ab")])
        .terminal("short", vec![TokenOp::literal("a")])
        .splitter("either", &["long", "short"])
        .root("either");
    let g = b.build().unwrap();
    let ast = run(&g, b"ab").unwrap();
    assert_eq!(spine(&ast), vec!["either", "long"]);
}

#[test]
fn short_alternative_first_leaves_trailing_input() {
    let mut b = GrammarBuilder::new("t");
    b.terminal("short", vec![TokenOp::literal("a")])
        .terminal("long", vec![TokenOp::literal("ab")])
        .splitter("either", &["short", "long"])
        .root("either");
    let g = b.build().unwrap();
    assert_eq!(run(&g, b"ab").unwrap_err(), ParseError::TrailingInput { offset: 1 });
}

// ============================================================
// List idioms
// ============================================================

#[test]
fn empty_singleton_regular() {
    let g = letter_list();

    let ast = run(&g, b"()").unwrap();
    assert_eq!(spine(&ast)[..2], ["list", "empty_list"]);

    let ast = run(&g, b"( a )").unwrap();
    assert_eq!(spine(&ast)[..2], ["list", "singleton_list"]);
    assert_eq!(texts(&ast, "letter"), vec!["a"]);

    let ast = run(&g, b"(a, b ,c)").unwrap();
    assert_eq!(spine(&ast)[..2], ["list", "regular_list"]);
    assert_eq!(texts(&ast, "letter"), vec!["a", "b", "c"]);
}

#[test]
fn stray_commas_fail_at_rightmost_offset() {
    let g = letter_list();
    let err = run(&g, b"(a,)").unwrap_err();
    assert_eq!(err.offset(), Some(3));
    let err = run(&g, b"(,a)").unwrap_err();
    assert_eq!(err.offset(), Some(1));
}

#[test]
fn long_list_does_not_exhaust_the_stack() {
    let g = letter_list();
    let n = 200_000;
    let mut input = Vec::with_capacity(n * 2 + 2);
    input.push(b'(');
    for i in 0..n {
        if i > 0 {
            input.push(b',');
        }
        input.push(b'x');
    }
    input.push(b')');

    let ast = run(&g, &input).unwrap();
    assert_eq!(texts(&ast, "letter").len(), n);
    drop(ast);
}

#[test]
fn memo_keeps_long_lists_linear() {
    let g = letter_list();
    let input = b"(a,b,c,d,e,f,g,h,i,j,k,l,m,n,o,p)";
    let ast = run(&g, input).unwrap();
    let plain = run_with(&g, input, &RunOptions::default().with_memoize(false)).unwrap();
    assert_eq!(ast.dump(), plain.dump());
    assert!(ast.stats().nodes_allocated <= plain.stats().nodes_allocated);
}

// ============================================================
// Tree access
// ============================================================

#[test]
fn dump_outlines_the_tree() {
    let g = letter_list();
    let ast = run(&g, b"(a)").unwrap();
    assert_eq!(
        ast.dump(),
        "list 0..3\n  singleton_list 0..3\n    open 0..1\n    ws 1..1\n    letter 1..2\n    ws 2..2\n    close 2..3\n"
    );
}

#[test]
fn child_by_rule_finds_direct_children() {
    let g = letter_list();
    let ast = run(&g, b"(q)").unwrap();
    let single = ast.child(ast.root(), 0).unwrap();
    let letter = g.rule_id("letter").unwrap();
    let found = ast.child_by_rule(single, letter).unwrap();
    assert_eq!(ast.text(found), b"q");
    assert!(ast.child_by_rule(ast.root(), letter).is_none());
}
