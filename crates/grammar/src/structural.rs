//! Structural pass: name resolution and shape checks.
//!
//! Turns the builder's name-based definitions into flat, id-addressed tables.
//! Errors are reported in definition order so the first mistake in a grammar
//! block is the one surfaced.

use jsonparse_common::{GrammarError, Token};
use rustc_hash::FxHashMap;

use crate::builder::{GrammarBuilder, NodeDef};
use crate::rule::{Rule, RuleId, RuleKind, TokenId};

/// Output of the structural pass, consumed by later passes.
#[derive(Debug, Clone)]
pub(crate) struct Resolved {
    pub(crate) tokens: Vec<Token>,
    pub(crate) rules: Vec<Rule>,
    pub(crate) rule_names: FxHashMap<String, RuleId>,
    pub(crate) root: RuleId,
}

/// Resolve every reference in `builder`.
pub(crate) fn resolve(builder: &GrammarBuilder) -> Result<Resolved, GrammarError> {
    let mut token_names: FxHashMap<&str, TokenId> = FxHashMap::default();
    for (i, token) in builder.tokens.iter().enumerate() {
        let id = TokenId::new(i).ok_or_else(|| too_many(builder, "tokens", builder.tokens.len()))?;
        if token_names.insert(token.name(), id).is_some() {
            return Err(GrammarError::DuplicateToken {
                token: token.name().to_string(),
            });
        }
    }

    let mut rule_names: FxHashMap<String, RuleId> = FxHashMap::default();
    for (i, def) in builder.nodes.iter().enumerate() {
        let id = RuleId::new(i).ok_or_else(|| too_many(builder, "nodes", builder.nodes.len()))?;
        if rule_names.insert(def.name().to_string(), id).is_some() {
            return Err(GrammarError::DuplicateNode {
                node: def.name().to_string(),
            });
        }
    }

    let lookup_children = |name: &str, children: &[String]| -> Result<Vec<RuleId>, GrammarError> {
        if children.is_empty() {
            return Err(GrammarError::EmptyNode {
                node: name.to_string(),
            });
        }
        children
            .iter()
            .map(|child| {
                rule_names
                    .get(child.as_str())
                    .copied()
                    .ok_or_else(|| GrammarError::UndefinedNode {
                        node: name.to_string(),
                        child: child.clone(),
                    })
            })
            .collect()
    };

    let mut rules = Vec::with_capacity(builder.nodes.len());
    for def in &builder.nodes {
        let kind = match def {
            NodeDef::Parser { name, token } => {
                let id = token_names.get(token.as_str()).copied().ok_or_else(|| {
                    GrammarError::UndefinedToken {
                        node: name.clone(),
                        token: token.clone(),
                    }
                })?;
                RuleKind::Parser(id)
            }
            NodeDef::Sequencer { name, children } => {
                RuleKind::Sequencer(lookup_children(name, children)?)
            }
            NodeDef::Splitter { name, children } => {
                RuleKind::Splitter(lookup_children(name, children)?)
            }
        };
        rules.push(Rule {
            name: def.name().to_string(),
            kind,
        });
    }

    let root_name = builder.root.as_ref().ok_or_else(|| GrammarError::MissingRoot {
        grammar: builder.name.clone(),
    })?;
    let root = rule_names
        .get(root_name.as_str())
        .copied()
        .ok_or_else(|| GrammarError::UndefinedRoot {
            grammar: builder.name.clone(),
            node: root_name.clone(),
        })?;

    Ok(Resolved {
        tokens: builder.tokens.clone(),
        rules,
        rule_names,
        root,
    })
}

fn too_many(builder: &GrammarBuilder, what: &'static str, count: usize) -> GrammarError {
    GrammarError::TooManyDefinitions {
        grammar: builder.name.clone(),
        what,
        count,
    }
}
