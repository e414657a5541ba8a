//! Reachability analysis for grammar nodes.
//!
//! Nodes the root can never reach are not errors (a grammar may carry spare
//! definitions for alternative roots) but are reported so they can be logged.

use crate::rule::{Rule, RuleId};

/// Nodes not reachable from `root`, in definition order.
pub(crate) fn unreachable_rules(rules: &[Rule], root: RuleId) -> Vec<RuleId> {
    let mut reachable = vec![false; rules.len()];
    let mut stack = vec![root];
    reachable[root.index()] = true;

    while let Some(id) = stack.pop() {
        for &child in rules[id.index()].kind.children() {
            if !reachable[child.index()] {
                reachable[child.index()] = true;
                stack.push(child);
            }
        }
    }

    RuleId::all()
        .zip(reachable)
        .filter(|&(_, r)| !r)
        .map(|(id, _)| id)
        .collect()
}
