//! Derived views over a JSON parse tree.
//!
//! - **Entry relation**: key string span → value node
//! - **Membership relation**: object node → key spans, in source order
//! - **Element lists**: array node → element value nodes, in source order
//!
//! Loop/next chains are flattened here so that queries never walk them.
//! Value nodes are recorded as the concrete object, array, string, boolean,
//! null or number node, never the `value` wrapper around it.

use jsonparse_common::Span;
use jsonparse_engine::{Ast, NodeId};
use jsonparse_grammar::RuleId;
use rustc_hash::FxHashMap;

use crate::grammar::JsonRules;
use crate::unescape::key_matches;

#[derive(Debug, Clone, Default)]
pub(crate) struct Index {
    entries: FxHashMap<Span, NodeId>,
    members: FxHashMap<NodeId, Vec<Span>>,
    elements: FxHashMap<NodeId, Vec<NodeId>>,
}

impl Index {
    /// Index every object and array reachable from `root`.
    pub(crate) fn build(ast: &Ast<'_>, rules: &JsonRules, root: NodeId) -> Self {
        let mut index = Index::default();
        let mut pending = vec![unwrap_value(ast, rules, root)];

        while let Some(node) = pending.pop() {
            let rule = ast.rule(node);
            if rule == rules.object {
                let members = items(ast, node, rules.member, rules.member_loop, rules.member_next);
                let mut keys = Vec::with_capacity(members.len());
                for member in members {
                    let key = ast.child_by_rule(member, rules.string);
                    let value = ast.child_by_rule(member, rules.value);
                    if let (Some(key), Some(value)) = (key, value) {
                        let value = unwrap_value(ast, rules, value);
                        index.entries.insert(ast.span(key), value);
                        keys.push(ast.span(key));
                        pending.push(value);
                    }
                }
                index.members.insert(node, keys);
            } else if rule == rules.array {
                let values: Vec<_> =
                    items(ast, node, rules.value, rules.element_loop, rules.element_next)
                        .into_iter()
                        .map(|v| unwrap_value(ast, rules, v))
                        .collect();
                pending.extend(values.iter().rev());
                index.elements.insert(node, values);
            }
        }
        index
    }

    /// The value of the last member of `object` whose decoded key is `key`.
    pub(crate) fn lookup(&self, input: &[u8], object: NodeId, key: &str) -> Option<NodeId> {
        self.members
            .get(&object)?
            .iter()
            .rev()
            .find(|span| key_matches(&input[span.shrink(1).as_range()], key))
            .and_then(|span| self.entries.get(span).copied())
    }

    /// Key spans of `object`, quotes included, in source order.
    pub(crate) fn keys(&self, object: NodeId) -> &[Span] {
        self.members.get(&object).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn entry(&self, key: Span) -> Option<NodeId> {
        self.entries.get(&key).copied()
    }

    pub(crate) fn elements(&self, array: NodeId) -> &[NodeId] {
        self.elements.get(&array).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn object_count(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn array_count(&self) -> usize {
        self.elements.len()
    }
}

/// Strip `value` wrappers down to the concrete value node.
pub(crate) fn unwrap_value(ast: &Ast<'_>, rules: &JsonRules, mut node: NodeId) -> NodeId {
    while ast.rule(node) == rules.value {
        match ast.child(node, 0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// The items of an empty/singleton/regular container node, in order.
///
/// `container` wraps exactly one variant. A singleton variant holds `item`
/// directly; a regular variant holds a chain of `lp` nodes, each holding an
/// `item` and a `next` node whose only child is either another `lp` or the
/// final `item`.
fn items(ast: &Ast<'_>, container: NodeId, item: RuleId, lp: RuleId, next: RuleId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let Some(variant) = ast.child(container, 0) else {
        return out;
    };
    if let Some(single) = ast.child_by_rule(variant, item) {
        out.push(single);
    }

    let mut chain = ast.child_by_rule(variant, lp);
    while let Some(link) = chain.take() {
        out.extend(ast.child_by_rule(link, item));
        let tail = ast
            .child_by_rule(link, next)
            .and_then(|n| ast.child(n, 0));
        match tail {
            Some(t) if ast.rule(t) == lp => chain = Some(t),
            Some(t) if ast.rule(t) == item => out.push(t),
            _ => {}
        }
    }
    out
}
