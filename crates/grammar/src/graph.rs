//! The immutable grammar graph.

use jsonparse_common::Token;
use rustc_hash::FxHashMap;

use crate::rule::{Rule, RuleId, RuleKind, TokenId};
use crate::structural::Resolved;

/// A fully resolved, validated grammar.
///
/// Nodes and tokens live in flat tables addressed by [`RuleId`] and
/// [`TokenId`]; children are ids, never owning pointers, so cyclic grammars
/// need no cyclic ownership. A `Grammar` is never mutated after
/// [`GrammarBuilder::build`](crate::GrammarBuilder::build) and can be shared
/// across threads freely.
#[derive(Debug, Clone)]
pub struct Grammar {
    name: String,
    tokens: Vec<Token>,
    rules: Vec<Rule>,
    rule_names: FxHashMap<String, RuleId>,
    root: RuleId,
    nullable: Vec<bool>,
    unreachable: Vec<RuleId>,
}

impl Grammar {
    pub(crate) fn from_parts(
        name: String,
        resolved: Resolved,
        nullable: Vec<bool>,
        unreachable: Vec<RuleId>,
    ) -> Self {
        Self {
            name,
            tokens: resolved.tokens,
            rules: resolved.rules,
            rule_names: resolved.rule_names,
            root: resolved.root,
            nullable,
            unreachable,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The designated root node.
    pub fn root(&self) -> RuleId {
        self.root
    }

    /// The node with id `id`.
    ///
    /// # Panics
    ///
    /// If `id` was not issued by this grammar.
    #[inline]
    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    #[inline]
    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    /// Look a node up by name.
    pub fn rule_id(&self, name: &str) -> Option<RuleId> {
        self.rule_names.get(name).copied()
    }

    /// Every node, in definition order.
    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rule)> {
        RuleId::all().zip(self.rules.iter())
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the node can match without consuming input.
    pub fn is_nullable(&self, id: RuleId) -> bool {
        self.nullable[id.index()]
    }

    /// Nodes the root can never reach.
    pub fn unreachable_rules(&self) -> &[RuleId] {
        &self.unreachable
    }

    /// A copy of this grammar rooted at `name` instead.
    ///
    /// Returns `None` if no such node exists. Unreachable-node bookkeeping is
    /// left as computed for the original root.
    pub fn with_root(&self, name: &str) -> Option<Grammar> {
        let root = self.rule_id(name)?;
        Some(Grammar {
            root,
            ..self.clone()
        })
    }

    /// A one-node-per-line listing, e.g. `value = object | array | string`.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (id, rule) in self.rules() {
            let marker = if id == self.root { " (root)" } else { "" };
            let body = match rule.kind() {
                RuleKind::Parser(tok) => format!("<{}>", self.token(*tok).name()),
                RuleKind::Sequencer(children) => self.join_names(children, " "),
                RuleKind::Splitter(children) => self.join_names(children, " | "),
            };
            out.push_str(&format!("{}{} = {}\n", rule.name(), marker, body));
        }
        out
    }

    fn join_names(&self, ids: &[RuleId], sep: &str) -> String {
        ids.iter()
            .map(|&c| self.rule(c).name())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

#[cfg(test)]
mod tests {
    use crate::GrammarBuilder;
    use jsonparse_common::TokenOp;

    fn tiny() -> crate::Grammar {
        let mut b = GrammarBuilder::new("tiny");
        b.terminal("x", vec![TokenOp::literal("x")])
            .terminal("y", vec![TokenOp::literal("y")])
            .splitter("xy", &["x", "y"])
            .sequencer("pair", &["xy", "xy"])
            .root("pair");
        b.build().unwrap()
    }

    #[test]
    fn lookup_by_name() {
        let g = tiny();
        let pair = g.rule_id("pair").unwrap();
        assert_eq!(g.root(), pair);
        assert_eq!(g.rule(pair).name(), "pair");
        assert_eq!(g.rule(pair).kind().children().len(), 2);
        assert!(g.rule_id("zzz").is_none());
        assert_eq!(g.rule_count(), 4);
        assert_eq!(g.token_count(), 2);
    }

    #[test]
    fn dump_lists_every_node() {
        let g = tiny();
        assert_eq!(
            g.dump(),
            "x = <x>\ny = <y>\nxy = x | y\npair (root) = xy xy\n"
        );
    }

    #[test]
    fn reroot() {
        let g = tiny();
        let h = g.with_root("xy").unwrap();
        assert_eq!(h.rule(h.root()).name(), "xy");
        assert!(g.with_root("nope").is_none());
    }

    #[test]
    fn grammar_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<crate::Grammar>();
    }
}
