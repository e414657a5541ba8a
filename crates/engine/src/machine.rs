//! Machine state: cursor, frame stack, scratch arena and memo table.

use jsonparse_common::Span;
use jsonparse_grammar::{Grammar, RuleId, TokenId};
use rustc_hash::FxHashMap;

use crate::ast::{AstNode, NodeId, RunStats};
use crate::error::ParseError;
use crate::options::RunOptions;

/// What an open frame is combining.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameKind {
    Sequence,
    Choice,
}

/// One open Sequencer or Splitter invocation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Frame<'a> {
    pub(crate) rule: RuleId,
    pub(crate) kind: FrameKind,
    pub(crate) children: &'a [RuleId],
    /// Cursor when the frame was entered.
    pub(crate) entry: usize,
    /// Index of the next child to invoke.
    pub(crate) next: usize,
    /// Length of the result stack when the frame was entered.
    pub(crate) base: usize,
}

/// Memoized outcome of a composite at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Memo {
    /// Entered and not yet finished. Re-entry at the same position would
    /// loop, so it fails.
    Pending,
    Failed,
    Matched(NodeId),
}

/// Executes one grammar against one input.
///
/// Construct with [`Machine::new`] and consume with
/// [`Machine::execute`](crate::Machine::execute).
pub struct Machine<'a> {
    pub(crate) grammar: &'a Grammar,
    pub(crate) input: &'a [u8],
    pub(crate) options: RunOptions,
    pub(crate) cursor: usize,
    pub(crate) frames: Vec<Frame<'a>>,
    /// Matched children waiting for their parent frame to finish.
    pub(crate) results: Vec<NodeId>,
    pub(crate) nodes: Vec<AstNode>,
    pub(crate) edges: Vec<NodeId>,
    pub(crate) memo: FxHashMap<(RuleId, usize), Memo>,
    pub(crate) furthest: usize,
    pub(crate) expected: Vec<TokenId>,
    pub(crate) stats: RunStats,
}

impl<'a> Machine<'a> {
    pub fn new(grammar: &'a Grammar, input: &'a [u8], options: RunOptions) -> Self {
        Self {
            grammar,
            input,
            options,
            cursor: 0,
            frames: Vec::new(),
            results: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            memo: FxHashMap::default(),
            furthest: 0,
            expected: Vec::new(),
            stats: RunStats::default(),
        }
    }

    /// Allocate a node in the scratch arena whose children are `results[base..]`.
    pub(crate) fn push_node(
        &mut self,
        rule: RuleId,
        span: Span,
        base: usize,
    ) -> Result<NodeId, ParseError> {
        let limit = self.options.max_nodes;
        let overflow = ParseError::NodeLimitExceeded {
            limit,
            offset: span.start,
        };
        if self.nodes.len() >= limit {
            return Err(overflow);
        }
        let first = self.edges.len();
        self.edges.extend(self.results.drain(base..));
        let (Some(id), Some(node)) = (
            NodeId::new(self.nodes.len()),
            AstNode::new(rule, span, first, self.edges.len() - first),
        ) else {
            return Err(overflow);
        };
        self.nodes.push(node);
        self.stats.nodes_allocated += 1;
        Ok(id)
    }

    /// Note a token failing at `at`, keeping only the rightmost position.
    pub(crate) fn record_failure(&mut self, token: TokenId, at: usize) {
        if at > self.furthest {
            self.furthest = at;
            self.expected.clear();
        }
        if at == self.furthest && !self.expected.contains(&token) {
            self.expected.push(token);
        }
    }

    pub(crate) fn remember(&mut self, rule: RuleId, at: usize, outcome: Memo) {
        if self.options.memoize {
            self.memo.insert((rule, at), outcome);
        }
    }

    /// Names of the tokens that failed at the rightmost failure offset.
    pub(crate) fn expected_names(&self) -> Vec<String> {
        self.expected
            .iter()
            .map(|&t| self.grammar.token(t).name().to_string())
            .collect()
    }
}
