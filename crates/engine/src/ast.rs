//! Concrete parse trees.
//!
//! The tree is an index-based arena: nodes are addressed by [`NodeId`] and
//! list their children as a contiguous run of ids in a shared edge table, so
//! deep trees (one level per list item under loop/next repetition) cost no
//! recursion to build, walk or drop.

use std::fmt::Write as _;

use jsonparse_common::Span;
use jsonparse_grammar::{Grammar, RuleId};

use crate::error::ParseError;
use crate::options::MAX_NODES;

/// Index into an [`Ast`]'s node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// `None` once `index` no longer fits in a `u32`.
    pub(crate) fn new(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(NodeId)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Compaction always places the accepted root first.
const ROOT: NodeId = NodeId(0);

/// One matched grammar node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AstNode {
    rule: RuleId,
    span: Span,
    first_edge: u32,
    edge_count: u32,
}

impl AstNode {
    pub(crate) fn new(
        rule: RuleId,
        span: Span,
        first_edge: usize,
        edge_count: usize,
    ) -> Option<Self> {
        Some(Self {
            rule,
            span,
            first_edge: u32::try_from(first_edge).ok()?,
            edge_count: u32::try_from(edge_count).ok()?,
        })
    }

    /// The grammar node that produced this match.
    #[inline]
    pub fn rule(&self) -> RuleId {
        self.rule
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.span
    }

    fn edges(&self) -> std::ops::Range<usize> {
        let start = self.first_edge as usize;
        start..start + self.edge_count as usize
    }
}

/// Counters describing one run, for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Nodes allocated during the run, including discarded attempts.
    pub nodes_allocated: usize,
    /// Entries recorded in the memo table.
    pub memo_entries: usize,
    /// Composite invocations answered from the memo table.
    pub memo_hits: usize,
    /// Deepest frame stack reached.
    pub max_depth: usize,
}

/// The accepted parse of one input.
///
/// Borrows both the grammar (for node names) and the input (for spans); the
/// input must outlive the tree.
#[derive(Debug, Clone)]
pub struct Ast<'a> {
    grammar: &'a Grammar,
    input: &'a [u8],
    nodes: Vec<AstNode>,
    edges: Vec<NodeId>,
    stats: RunStats,
}

impl<'a> Ast<'a> {
    /// Copy the tree reachable from `root` out of a run's scratch arena.
    ///
    /// The run arena also holds the remains of failed attempts and may share
    /// memoized subtrees; the copy keeps exactly the accepted tree, with the
    /// root at index 0.
    pub(crate) fn compact(
        grammar: &'a Grammar,
        input: &'a [u8],
        arena: &[AstNode],
        arena_edges: &[NodeId],
        root: NodeId,
        stats: RunStats,
    ) -> Result<Self, ParseError> {
        let overflow = || ParseError::NodeLimitExceeded {
            limit: MAX_NODES,
            offset: input.len(),
        };
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut queue = vec![(root, ROOT)];
        nodes.push(arena[root.index()]);

        while let Some((old, new)) = queue.pop() {
            let src = arena[old.index()];
            let first = edges.len();
            for &child in &arena_edges[src.edges()] {
                let id = NodeId::new(nodes.len()).ok_or_else(overflow)?;
                nodes.push(arena[child.index()]);
                edges.push(id);
                queue.push((child, id));
            }
            let node = &mut nodes[new.index()];
            *node = AstNode::new(node.rule, node.span, first, edges.len() - first)
                .ok_or_else(overflow)?;
        }

        Ok(Self {
            grammar,
            input,
            nodes,
            edges,
            stats,
        })
    }

    pub fn grammar(&self) -> &'a Grammar {
        self.grammar
    }

    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Number of nodes in the accepted tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// The node with id `id`.
    ///
    /// # Panics
    ///
    /// If `id` was not issued by this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn rule(&self, id: NodeId) -> RuleId {
        self.node(id).rule
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    /// Name of the grammar node that produced `id`.
    pub fn name(&self, id: NodeId) -> &'a str {
        self.grammar.rule(self.rule(id)).name()
    }

    /// The input bytes `id` matched.
    pub fn text(&self, id: NodeId) -> &'a [u8] {
        let span = self.span(id);
        &self.input[span.start..span.end]
    }

    /// Children of `id`, in match order.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.edges[self.node(id).edges()]
    }

    /// The `n`th child of `id`.
    pub fn child(&self, id: NodeId, n: usize) -> Option<NodeId> {
        self.children(id).get(n).copied()
    }

    /// The first direct child produced by `rule`.
    pub fn child_by_rule(&self, id: NodeId, rule: RuleId) -> Option<NodeId> {
        self.children(id).iter().copied().find(|&c| self.rule(c) == rule)
    }

    /// Pre-order traversal of the subtree at `id`, `id` included.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_, 'a> {
        Descendants {
            ast: self,
            stack: vec![id],
        }
    }

    /// An indented outline of the tree, one node per line with its span.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root(), 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let span = self.span(id);
            let _ = writeln!(out, "{:indent$}{} {}", "", self.name(id), span, indent = depth * 2);
            for &child in self.children(id).iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}

/// Iterator returned by [`Ast::descendants`].
pub struct Descendants<'t, 'a> {
    ast: &'t Ast<'a>,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.ast.children(id).iter().rev());
        Some(id)
    }
}
