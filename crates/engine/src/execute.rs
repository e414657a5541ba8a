//! Main execution loop.
//!
//! Grammar nodes are evaluated with an explicit frame stack instead of
//! native recursion. The loop alternates between two steps: *enter* a node
//! at the cursor, and *resume* the innermost open frame with the outcome of
//! the child it invoked.

use jsonparse_common::Span;
use jsonparse_grammar::{RuleId, RuleKind, TokenId};
use tracing::{debug, trace};

use crate::ast::Ast;
use crate::error::ParseError;
use crate::machine::{Frame, FrameKind, Machine, Memo};

#[derive(Debug, Clone, Copy)]
enum Step {
    Enter(RuleId),
    Exit(bool),
}

impl<'a> Machine<'a> {
    /// Run the grammar's root over the whole input.
    pub fn execute(mut self) -> Result<Ast<'a>, ParseError> {
        if self.input.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let mut step = Step::Enter(self.grammar.root());
        let matched = loop {
            step = match step {
                Step::Enter(rule) => self.enter(rule)?,
                Step::Exit(ok) if self.frames.is_empty() => break ok,
                Step::Exit(ok) => self.resume(ok)?,
            };
        };

        self.stats.memo_entries = self.memo.len();
        debug!(
            grammar = %self.grammar.name(),
            input_len = self.input.len(),
            matched,
            nodes = self.stats.nodes_allocated,
            memo_entries = self.stats.memo_entries,
            memo_hits = self.stats.memo_hits,
            max_depth = self.stats.max_depth,
            "grammar run finished"
        );

        let root = match (matched, self.results.pop()) {
            (true, Some(root)) => root,
            _ => {
                return Err(ParseError::NoMatch {
                    offset: self.furthest,
                    expected: self.expected_names(),
                })
            }
        };
        if self.cursor < self.input.len() && !self.options.allow_trailing_input {
            return Err(ParseError::TrailingInput {
                offset: self.cursor,
            });
        }

        Ast::compact(
            self.grammar,
            self.input,
            &self.nodes,
            &self.edges,
            root,
            self.stats,
        )
    }

    fn enter(&mut self, rule: RuleId) -> Result<Step, ParseError> {
        let grammar = self.grammar;
        let (kind, children) = match grammar.rule(rule).kind() {
            RuleKind::Parser(token) => return self.match_token(rule, *token),
            RuleKind::Sequencer(children) => (FrameKind::Sequence, children.as_slice()),
            RuleKind::Splitter(children) => (FrameKind::Choice, children.as_slice()),
        };

        if self.options.memoize {
            match self.memo.get(&(rule, self.cursor)).copied() {
                Some(Memo::Matched(id)) => {
                    trace!(node = %grammar.rule(rule).name(), at = self.cursor, "memo hit");
                    self.stats.memo_hits += 1;
                    self.cursor = self.nodes[id.index()].span().end;
                    self.results.push(id);
                    return Ok(Step::Exit(true));
                }
                Some(Memo::Failed | Memo::Pending) => {
                    self.stats.memo_hits += 1;
                    return Ok(Step::Exit(false));
                }
                None => {
                    self.memo.insert((rule, self.cursor), Memo::Pending);
                }
            }
        }

        if self.frames.len() >= self.options.max_depth {
            return Err(ParseError::DepthLimitExceeded {
                depth: self.options.max_depth,
                offset: self.cursor,
            });
        }

        self.frames.push(Frame {
            rule,
            kind,
            children,
            entry: self.cursor,
            next: 1,
            base: self.results.len(),
        });
        self.stats.max_depth = self.stats.max_depth.max(self.frames.len());
        Ok(Step::Enter(children[0]))
    }

    fn match_token(&mut self, rule: RuleId, token: TokenId) -> Result<Step, ParseError> {
        let start = self.cursor;
        match self.grammar.token(token).match_at(self.input, start) {
            Some(end) => {
                let base = self.results.len();
                let id = self.push_node(rule, Span::new(start, end), base)?;
                self.results.push(id);
                self.cursor = end;
                Ok(Step::Exit(true))
            }
            None => {
                self.record_failure(token, start);
                Ok(Step::Exit(false))
            }
        }
    }

    /// Feed a child's outcome to the innermost frame.
    fn resume(&mut self, ok: bool) -> Result<Step, ParseError> {
        let Some(frame) = self.frames.last_mut() else {
            return Ok(Step::Exit(ok));
        };
        let frame_copy = *frame;

        match (frame_copy.kind, ok) {
            (FrameKind::Sequence, true) | (FrameKind::Choice, false)
                if frame_copy.next < frame_copy.children.len() =>
            {
                frame.next += 1;
                if frame_copy.kind == FrameKind::Choice {
                    self.cursor = frame_copy.entry;
                }
                Ok(Step::Enter(frame_copy.children[frame_copy.next]))
            }
            (FrameKind::Sequence, true) | (FrameKind::Choice, true) => {
                self.frames.pop();
                let span = Span::new(frame_copy.entry, self.cursor);
                let id = self.push_node(frame_copy.rule, span, frame_copy.base)?;
                self.results.push(id);
                self.remember(frame_copy.rule, frame_copy.entry, Memo::Matched(id));
                Ok(Step::Exit(true))
            }
            (_, false) => {
                self.frames.pop();
                self.results.truncate(frame_copy.base);
                self.cursor = frame_copy.entry;
                self.remember(frame_copy.rule, frame_copy.entry, Memo::Failed);
                Ok(Step::Exit(false))
            }
        }
    }
}
