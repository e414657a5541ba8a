//! Grammar nodes and the ids that address them.

use std::fmt;

/// Index of a node in a grammar's node table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u32);

impl RuleId {
    /// `None` once `index` no longer fits in a `u32`.
    pub(crate) fn new(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(RuleId)
    }

    /// Ids in table order, for zipping with an already-resolved node table.
    pub(crate) fn all() -> impl Iterator<Item = RuleId> {
        (0..=u32::MAX).map(RuleId)
    }

    /// Position in the node table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Index of a token in a grammar's token table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(u32);

impl TokenId {
    pub(crate) fn new(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(TokenId)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// The three kinds of grammar node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    /// Terminal: matches exactly one token.
    Parser(TokenId),
    /// Ordered AND: every child, in order.
    Sequencer(Vec<RuleId>),
    /// Ordered OR: the first child that matches.
    Splitter(Vec<RuleId>),
}

impl RuleKind {
    /// Child nodes, empty for a Parser.
    pub fn children(&self) -> &[RuleId] {
        match self {
            RuleKind::Parser(_) => &[],
            RuleKind::Sequencer(c) | RuleKind::Splitter(c) => c,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RuleKind::Parser(_) => "parser",
            RuleKind::Sequencer(_) => "sequencer",
            RuleKind::Splitter(_) => "splitter",
        }
    }
}

/// A named grammar node with resolved references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub(crate) name: String,
    pub(crate) kind: RuleKind,
}

impl Rule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }
}
