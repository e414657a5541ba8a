//! Parsing entry points and the parsed document.

use jsonparse_engine::{run_with, Ast, NodeId, ParseError, RunOptions};
use tracing::debug;

use crate::error::QueryError;
use crate::grammar::JsonGrammar;
use crate::index::{unwrap_value, Index};
use crate::value::{JsonType, ValueHandle};
use crate::walk::walk;

/// A parsed JSON text: the parse tree plus its entry and membership
/// relations.
///
/// Borrows the input buffer and the grammar; dropping the document frees
/// the tree and the relations and nothing else.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    json: &'a JsonGrammar,
    ast: Ast<'a>,
    index: Index,
    root: NodeId,
}

/// Parse `input` as a whole JSON text.
///
/// ```
/// let json = jsonparse::init();
/// let doc = jsonparse::parse(json, br#"{"a":{"b":1}}"#).unwrap();
/// assert_eq!(doc.find("a.b").unwrap().as_integer().unwrap(), 1);
/// ```
///
/// # Errors
///
/// Returns [`ParseError`] if the input is empty, is not valid JSON for the
/// grammar's top level, or has bytes left over after the top-level value.
pub fn parse<'a>(json: &'a JsonGrammar, input: &'a [u8]) -> Result<Document<'a>, ParseError> {
    parse_with(json, input, &RunOptions::default())
}

/// [`parse`] with explicit engine options.
pub fn parse_with<'a>(
    json: &'a JsonGrammar,
    input: &'a [u8],
    options: &RunOptions,
) -> Result<Document<'a>, ParseError> {
    let ast = run_with(json.grammar(), input, options)?;
    let root = unwrap_value(&ast, &json.rules, ast.root());
    let index = Index::build(&ast, &json.rules, root);
    debug!(
        nodes = ast.len(),
        objects = index.object_count(),
        arrays = index.array_count(),
        "indexed JSON document"
    );
    Ok(Document {
        json,
        ast,
        index,
        root,
    })
}

impl<'a> Document<'a> {
    /// The top-level value.
    pub fn root(&self) -> ValueHandle<'_, 'a> {
        ValueHandle::new(self, self.root)
    }

    /// Resolve a dotted key path from the top-level object.
    ///
    /// The path is split on every `.`; use [`find_segments`](Self::find_segments)
    /// for keys that themselves contain dots.
    pub fn find(&self, path: &str) -> Result<ValueHandle<'_, 'a>, QueryError> {
        let node = walk(self, self.root, path, path.split('.'))?;
        Ok(ValueHandle::new(self, node))
    }

    /// Resolve a path given as separate keys.
    pub fn find_segments(&self, segments: &[&str]) -> Result<ValueHandle<'_, 'a>, QueryError> {
        let path = segments.join(".");
        let node = walk(self, self.root, &path, segments.iter().copied())?;
        Ok(ValueHandle::new(self, node))
    }

    pub fn ast(&self) -> &Ast<'a> {
        &self.ast
    }

    pub fn input(&self) -> &'a [u8] {
        self.ast.input()
    }

    pub fn grammar(&self) -> &'a JsonGrammar {
        self.json
    }

    pub(crate) fn index(&self) -> &Index {
        &self.index
    }

    pub(crate) fn is_object(&self, node: NodeId) -> bool {
        self.ast.rule(node) == self.json.rules.object
    }

    /// Boolean nodes wrap the literal that matched.
    pub(crate) fn is_true(&self, node: NodeId) -> bool {
        self.ast
            .child(node, 0)
            .is_some_and(|lit| self.ast.rule(lit) == self.json.rules.true_lit)
    }

    /// Classify a concrete value node. Handles only ever point at the six
    /// value alternatives, so anything else is the `null` literal.
    pub(crate) fn type_at(&self, node: NodeId) -> JsonType {
        let rules = &self.json.rules;
        let rule = self.ast.rule(node);
        if rule == rules.object {
            JsonType::Object
        } else if rule == rules.array {
            JsonType::Array
        } else if rule == rules.string {
            JsonType::String
        } else if rule == rules.boolean {
            JsonType::Boolean
        } else if rule == rules.number {
            match self.ast.child(node, 0) {
                Some(form) if self.ast.rule(form) == rules.integer => JsonType::Integer,
                _ => JsonType::Float,
            }
        } else {
            debug_assert_eq!(rule, rules.null);
            JsonType::Null
        }
    }
}
