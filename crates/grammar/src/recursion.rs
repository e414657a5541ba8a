//! Left-recursion pass.
//!
//! A node is left-recursive when evaluating it can re-enter itself at the same
//! input offset. An ordered-choice engine would descend forever on such a
//! node, so the grammar is rejected here rather than at parse time.
//!
//! The pass first computes which nodes can match the empty string, then
//! follows "left calls": every child a node may invoke before any input is
//! consumed. A cycle in the left-call graph is left recursion.

use jsonparse_common::{GrammarError, Token};

use crate::rule::{Rule, RuleKind};

/// Compute per-node nullability.
pub(crate) fn nullable_rules(rules: &[Rule], tokens: &[Token]) -> Vec<bool> {
    let mut nullable = vec![false; rules.len()];
    loop {
        let mut changed = false;
        for (i, rule) in rules.iter().enumerate() {
            if nullable[i] {
                continue;
            }
            let now = match &rule.kind {
                RuleKind::Parser(tok) => tokens[tok.index()].is_nullable(),
                RuleKind::Sequencer(children) => children.iter().all(|c| nullable[c.index()]),
                RuleKind::Splitter(children) => children.iter().any(|c| nullable[c.index()]),
            };
            if now {
                nullable[i] = true;
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}

/// Children a node may invoke at its own entry offset.
fn left_calls<'r>(rule: &'r Rule, nullable: &'r [bool]) -> impl Iterator<Item = usize> + 'r {
    let children: &[_] = rule.kind.children();
    let take = match &rule.kind {
        RuleKind::Parser(_) => 0,
        RuleKind::Splitter(_) => children.len(),
        RuleKind::Sequencer(_) => children
            .iter()
            .position(|c| !nullable[c.index()])
            .map_or(children.len(), |p| p + 1),
    };
    children[..take].iter().map(|c| c.index())
}

/// Reject left-recursive grammars. Returns per-node nullability on success.
pub(crate) fn check_left_recursion(
    rules: &[Rule],
    tokens: &[Token],
) -> Result<Vec<bool>, GrammarError> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        Unvisited,
        Active,
        Done,
    }

    let nullable = nullable_rules(rules, tokens);
    let mut marks = vec![Mark::Unvisited; rules.len()];

    for start in 0..rules.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        // Iterative DFS: (node, next left-call position).
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        marks[start] = Mark::Active;
        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            top.1 += 1;
            match left_calls(&rules[node], &nullable).nth(next) {
                Some(c) => match marks[c] {
                    Mark::Active => {
                        return Err(GrammarError::LeftRecursion {
                            node: rules[c].name.clone(),
                        })
                    }
                    Mark::Unvisited => {
                        marks[c] = Mark::Active;
                        stack.push((c, 0));
                    }
                    Mark::Done => {}
                },
                None => {
                    marks[node] = Mark::Done;
                    stack.pop();
                }
            }
        }
    }

    Ok(nullable)
}
