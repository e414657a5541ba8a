//! Tokens: named, input-consuming matchers built from byte operators.
//!
//! A token is an ordered list of [`TokenOp`]s. Matching walks the operators
//! left to right from a cursor; every operator must succeed for the token to
//! succeed, and a failure anywhere discards all partial progress. Repeating
//! operators are greedy and never give bytes back, so a token is only
//! unambiguous when each operator's bytes are disjoint from what follows it
//! (a digit run stops at the first non-digit, and so on).

use crate::byte_class::ByteClass;
use crate::error::GrammarError;

/// How many times an operator's matcher must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    ExactlyOne,
    ZeroOrOne,
    OneOrMore,
    ZeroOrMore,
}

impl Cardinality {
    /// Minimum number of repetitions.
    pub const fn min(self) -> usize {
        match self {
            Cardinality::ExactlyOne | Cardinality::OneOrMore => 1,
            Cardinality::ZeroOrOne | Cardinality::ZeroOrMore => 0,
        }
    }

    /// Maximum number of repetitions, `None` for unbounded.
    pub const fn max(self) -> Option<usize> {
        match self {
            Cardinality::ExactlyOne | Cardinality::ZeroOrOne => Some(1),
            Cardinality::OneOrMore | Cardinality::ZeroOrMore => None,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Cardinality::ExactlyOne => "",
            Cardinality::ZeroOrOne => "?",
            Cardinality::OneOrMore => "+",
            Cardinality::ZeroOrMore => "*",
        }
    }
}

/// What a single repetition of an operator matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Matcher {
    /// An exact byte sequence.
    Literal(Vec<u8>),
    /// One byte that is a member of the class.
    Class(ByteClass),
}

impl Matcher {
    /// Length of one repetition at the start of `input`, if it matches.
    #[inline]
    fn match_once(&self, input: &[u8]) -> Option<usize> {
        match self {
            Matcher::Literal(lit) => input.starts_with(lit).then_some(lit.len()),
            Matcher::Class(class) => match input.first() {
                Some(&b) if class.contains(b) => Some(1),
                _ => None,
            },
        }
    }
}

/// A cardinality-qualified matcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenOp {
    pub cardinality: Cardinality,
    pub matcher: Matcher,
}

impl TokenOp {
    pub fn new(cardinality: Cardinality, matcher: Matcher) -> Self {
        Self {
            cardinality,
            matcher,
        }
    }

    /// Exactly the literal bytes.
    pub fn literal(bytes: impl AsRef<[u8]>) -> Self {
        Self::new(Cardinality::ExactlyOne, Matcher::Literal(bytes.as_ref().to_vec()))
    }

    /// The literal bytes, or nothing.
    pub fn optional_literal(bytes: impl AsRef<[u8]>) -> Self {
        Self::new(Cardinality::ZeroOrOne, Matcher::Literal(bytes.as_ref().to_vec()))
    }

    /// One member byte of `class`.
    pub fn one_of(class: ByteClass) -> Self {
        Self::new(Cardinality::ExactlyOne, Matcher::Class(class))
    }

    /// One member byte of `class`, or nothing.
    pub fn optional(class: ByteClass) -> Self {
        Self::new(Cardinality::ZeroOrOne, Matcher::Class(class))
    }

    /// The maximal non-empty run of member bytes.
    pub fn one_or_more(class: ByteClass) -> Self {
        Self::new(Cardinality::OneOrMore, Matcher::Class(class))
    }

    /// The maximal, possibly empty, run of member bytes.
    pub fn zero_or_more(class: ByteClass) -> Self {
        Self::new(Cardinality::ZeroOrMore, Matcher::Class(class))
    }

    /// Apply this operator at `input[pos..]`, returning the new cursor.
    #[inline]
    fn apply(&self, input: &[u8], pos: usize) -> Option<usize> {
        let max = self.cardinality.max();
        let mut cursor = pos;
        let mut count = 0usize;

        if let (Matcher::Class(class), None) = (&self.matcher, max) {
            let run = class.run_len(&input[pos..]);
            return (run >= self.cardinality.min()).then_some(pos + run);
        }

        while max.map_or(true, |m| count < m) {
            match self.matcher.match_once(&input[cursor..]) {
                Some(n) => {
                    cursor += n;
                    count += 1;
                }
                None => break,
            }
        }

        (count >= self.cardinality.min()).then_some(cursor)
    }

    /// Whether this operator can succeed without consuming input.
    pub fn is_nullable(&self) -> bool {
        self.cardinality.min() == 0
    }
}

/// A named, input-consuming matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    name: String,
    ops: Vec<TokenOp>,
}

impl Token {
    /// Create a token, rejecting operator lists that could never be
    /// evaluated sensibly.
    pub fn new(name: impl Into<String>, ops: Vec<TokenOp>) -> Result<Self, GrammarError> {
        let name = name.into();
        if ops.is_empty() {
            return Err(GrammarError::EmptyToken { token: name });
        }
        if ops
            .iter()
            .any(|op| matches!(&op.matcher, Matcher::Literal(lit) if lit.is_empty()))
        {
            return Err(GrammarError::EmptyLiteral { token: name });
        }
        Ok(Self { name, ops })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ops(&self) -> &[TokenOp] {
        &self.ops
    }

    /// Match the token at `pos`, returning the cursor after the match.
    ///
    /// Returns `None` when any operator fails; the caller's cursor is left
    /// untouched in that case. A `pos` at or past the end of `input` is
    /// valid and can only match nullable tokens.
    pub fn match_at(&self, input: &[u8], pos: usize) -> Option<usize> {
        if pos > input.len() {
            return None;
        }
        let mut cursor = pos;
        for op in &self.ops {
            cursor = op.apply(input, cursor)?;
        }
        Some(cursor)
    }

    /// Whether the token can match the empty string.
    pub fn is_nullable(&self) -> bool {
        self.ops.iter().all(TokenOp::is_nullable)
    }
}
