//! Declarative grammar construction.
//!
//! Nodes reference each other by name and may be defined in any order, so a
//! cyclic grammar is written the same way as an acyclic one. Names are only
//! resolved in [`GrammarBuilder::build`], which runs the validation passes
//! and produces an immutable [`Grammar`].

use jsonparse_common::{GrammarError, Token, TokenOp};
use tracing::{debug, warn};

use crate::graph::Grammar;
use crate::{reachability, recursion, structural};

/// An unresolved node definition.
#[derive(Debug, Clone)]
pub(crate) enum NodeDef {
    Parser { name: String, token: String },
    Sequencer { name: String, children: Vec<String> },
    Splitter { name: String, children: Vec<String> },
}

impl NodeDef {
    pub(crate) fn name(&self) -> &str {
        match self {
            NodeDef::Parser { name, .. }
            | NodeDef::Sequencer { name, .. }
            | NodeDef::Splitter { name, .. } => name,
        }
    }
}

/// Collects token and node definitions for one grammar.
///
/// Definition methods chain. The first invalid token definition is kept and
/// returned from [`build`](Self::build), so a grammar can be written as one
/// uninterrupted block.
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    pub(crate) name: String,
    pub(crate) tokens: Vec<Token>,
    pub(crate) nodes: Vec<NodeDef>,
    pub(crate) root: Option<String>,
    pub(crate) deferred: Option<GrammarError>,
}

impl GrammarBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tokens: Vec::new(),
            nodes: Vec::new(),
            root: None,
            deferred: None,
        }
    }

    /// Define a token.
    pub fn token(&mut self, name: impl Into<String>, ops: Vec<TokenOp>) -> &mut Self {
        match Token::new(name, ops) {
            Ok(token) => self.tokens.push(token),
            Err(e) => {
                self.deferred.get_or_insert(e);
            }
        }
        self
    }

    /// Define a Parser node bound to the token named `token`.
    pub fn parser(&mut self, name: impl Into<String>, token: impl Into<String>) -> &mut Self {
        self.nodes.push(NodeDef::Parser {
            name: name.into(),
            token: token.into(),
        });
        self
    }

    /// Define a token and a Parser node of the same name.
    pub fn terminal(&mut self, name: &str, ops: Vec<TokenOp>) -> &mut Self {
        self.token(name, ops).parser(name, name)
    }

    /// Define a Sequencer node: all `children`, in order.
    pub fn sequencer(&mut self, name: impl Into<String>, children: &[&str]) -> &mut Self {
        self.nodes.push(NodeDef::Sequencer {
            name: name.into(),
            children: children.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    /// Define a Splitter node: the first of `children` that matches.
    pub fn splitter(&mut self, name: impl Into<String>, children: &[&str]) -> &mut Self {
        self.nodes.push(NodeDef::Splitter {
            name: name.into(),
            children: children.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    /// Append a child to an already defined Sequencer or Splitter.
    ///
    /// Has no effect if `node` is not defined or is a Parser; the missing
    /// child will not be reported, so prefer passing children up front.
    pub fn add_child(&mut self, node: &str, child: &str) -> &mut Self {
        let def = self.nodes.iter_mut().rev().find(|d| d.name() == node);
        if let Some(NodeDef::Sequencer { children, .. } | NodeDef::Splitter { children, .. }) = def {
            children.push(child.to_string());
        }
        self
    }

    /// Designate the root node. The last call wins.
    pub fn root(&mut self, name: impl Into<String>) -> &mut Self {
        self.root = Some(name.into());
        self
    }

    /// Resolve every name and validate the grammar.
    ///
    /// Passes, in order:
    /// 1. **Structural**: duplicate names, undefined references, empty
    ///    composites, root designation
    /// 2. **Left recursion**: rejects nodes that can reach themselves
    ///    without consuming input
    /// 3. **Reachability**: logs nodes the root can never reach
    pub fn build(&self) -> Result<Grammar, GrammarError> {
        if let Some(e) = &self.deferred {
            return Err(e.clone());
        }

        let resolved = structural::resolve(self)?;
        let nullable = recursion::check_left_recursion(&resolved.rules, &resolved.tokens)?;
        let unreachable = reachability::unreachable_rules(&resolved.rules, resolved.root);
        for id in &unreachable {
            warn!(
                grammar = %self.name,
                node = %resolved.rules[id.index()].name,
                "grammar node is unreachable from the root"
            );
        }

        let grammar = Grammar::from_parts(self.name.clone(), resolved, nullable, unreachable);
        debug!(
            grammar = %grammar.name(),
            tokens = grammar.token_count(),
            nodes = grammar.rule_count(),
            root = %grammar.rule(grammar.root()).name(),
            "built grammar"
        );
        Ok(grammar)
    }
}
