//! The JSON grammar, expressed with Parser, Sequencer and Splitter nodes.
//!
//! Every "zero or more" construct is spelled out as empty/singleton/regular
//! alternatives, and every "one or more separated by X" construct as a
//! loop/next pair, for example:
//!
//! ```text
//! element_loop = value ws comma ws element_next
//! element_next = element_loop | value
//! ```

use std::sync::OnceLock;

use jsonparse_common::{ByteClass, GrammarError, TokenOp};
use jsonparse_grammar::{Grammar, GrammarBuilder, RuleId};
use tracing::debug;

use crate::classes::{
    AFTER_E0, AFTER_ED, AFTER_F0, AFTER_F4, CONTINUATION, EXPONENT, LEAD_2, LEAD_3, LEAD_4, PLAIN,
    SIGN, WHITESPACE,
};

/// Which node a parse must match the whole input against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TopLevel {
    /// A JSON object.
    #[default]
    Object,
    /// Any JSON value: object, array, string, number, boolean or null.
    AnyValue,
}

/// Ids of the nodes the indexer and accessors look at.
#[derive(Debug, Clone, Copy)]
pub(crate) struct JsonRules {
    pub(crate) value: RuleId,
    pub(crate) object: RuleId,
    pub(crate) array: RuleId,
    pub(crate) string: RuleId,
    pub(crate) boolean: RuleId,
    pub(crate) null: RuleId,
    pub(crate) number: RuleId,
    pub(crate) integer: RuleId,
    pub(crate) true_lit: RuleId,
    pub(crate) member: RuleId,
    pub(crate) member_loop: RuleId,
    pub(crate) member_next: RuleId,
    pub(crate) element_loop: RuleId,
    pub(crate) element_next: RuleId,
}

impl JsonRules {
    fn resolve(grammar: &Grammar) -> Result<Self, GrammarError> {
        let id = |name: &str| {
            grammar.rule_id(name).ok_or_else(|| GrammarError::UndefinedNode {
                node: grammar.name().to_string(),
                child: name.to_string(),
            })
        };
        Ok(Self {
            value: id("value")?,
            object: id("object")?,
            array: id("array")?,
            string: id("string")?,
            boolean: id("boolean")?,
            null: id("null")?,
            number: id("number")?,
            integer: id("integer")?,
            true_lit: id("true")?,
            member: id("member")?,
            member_loop: id("member_loop")?,
            member_next: id("member_next")?,
            element_loop: id("element_loop")?,
            element_next: id("element_next")?,
        })
    }
}

/// A built JSON grammar together with the node ids queries need.
#[derive(Debug, Clone)]
pub struct JsonGrammar {
    grammar: Grammar,
    top_level: TopLevel,
    pub(crate) rules: JsonRules,
}

impl JsonGrammar {
    /// Build an independent grammar instance rooted at `object`.
    ///
    /// Most callers want the shared instance from [`init`].
    pub fn new() -> Result<Self, GrammarError> {
        Self::with_top_level(TopLevel::Object)
    }

    /// Build an independent grammar instance with the given root.
    pub fn with_top_level(top_level: TopLevel) -> Result<Self, GrammarError> {
        let root = match top_level {
            TopLevel::Object => "object",
            TopLevel::AnyValue => "value",
        };
        let mut b = json_rules();
        b.root(root);
        let grammar = b.build()?;
        let rules = JsonRules::resolve(&grammar)?;
        debug!(?top_level, nodes = grammar.rule_count(), "JSON grammar ready");
        Ok(Self {
            grammar,
            top_level,
            rules,
        })
    }

    /// The underlying grammar graph.
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn top_level(&self) -> TopLevel {
        self.top_level
    }
}

static SHARED: OnceLock<JsonGrammar> = OnceLock::new();

/// Build the process-wide JSON grammar, or return the one already built.
///
/// Idempotent and safe to call from any number of threads; construction
/// happens exactly once. The returned grammar is immutable and is passed to
/// every [`parse`](crate::parse) call.
///
/// # Panics
///
/// If the built-in grammar fails validation, which is a bug in this crate.
pub fn init() -> &'static JsonGrammar {
    SHARED.get_or_init(|| match JsonGrammar::new() {
        Ok(grammar) => grammar,
        Err(e) => panic!("built-in JSON grammar is invalid: {e}"),
    })
}

/// Every token and node of the JSON grammar, without a root.
fn json_rules() -> GrammarBuilder {
    let mut b = GrammarBuilder::new("json");

    // Characters
    b.terminal("quote", vec![TokenOp::literal("\"")])
        .terminal("plain", vec![TokenOp::one_of(PLAIN)])
        .terminal("esc_quote", vec![TokenOp::literal("\\\"")])
        .terminal("esc_backslash", vec![TokenOp::literal("\\\\")])
        .terminal("esc_slash", vec![TokenOp::literal("\\/")])
        .terminal("esc_b", vec![TokenOp::literal("\\b")])
        .terminal("esc_f", vec![TokenOp::literal("\\f")])
        .terminal("esc_n", vec![TokenOp::literal("\\n")])
        .terminal("esc_r", vec![TokenOp::literal("\\r")])
        .terminal("esc_t", vec![TokenOp::literal("\\t")])
        .terminal(
            "esc_unicode",
            vec![
                TokenOp::literal("\\u"),
                TokenOp::one_of(ByteClass::HEX_DIGIT),
                TokenOp::one_of(ByteClass::HEX_DIGIT),
                TokenOp::one_of(ByteClass::HEX_DIGIT),
                TokenOp::one_of(ByteClass::HEX_DIGIT),
            ],
        )
        .splitter(
            "escape",
            &[
                "esc_quote",
                "esc_backslash",
                "esc_slash",
                "esc_b",
                "esc_f",
                "esc_n",
                "esc_r",
                "esc_t",
                "esc_unicode",
            ],
        )
        .terminal("utf8_2", vec![TokenOp::one_of(LEAD_2), TokenOp::one_of(CONTINUATION)])
        .terminal("utf8_3_e0", multibyte(ByteClass::single(0xE0), AFTER_E0, 1))
        .terminal("utf8_3", multibyte(LEAD_3, CONTINUATION, 1))
        .terminal("utf8_3_ed", multibyte(ByteClass::single(0xED), AFTER_ED, 1))
        .splitter("three_byte", &["utf8_3_e0", "utf8_3", "utf8_3_ed"])
        .terminal("utf8_4_f0", multibyte(ByteClass::single(0xF0), AFTER_F0, 2))
        .terminal("utf8_4", multibyte(LEAD_4, CONTINUATION, 2))
        .terminal("utf8_4_f4", multibyte(ByteClass::single(0xF4), AFTER_F4, 2))
        .splitter("four_byte", &["utf8_4_f0", "utf8_4", "utf8_4_f4"])
        .splitter("char", &["plain", "escape", "utf8_2", "three_byte", "four_byte"])
        .sequencer("char_loop", &["char", "char_next"])
        .splitter("char_next", &["char_loop", "char"]);

    // Strings
    b.sequencer("empty_string", &["quote", "quote"])
        .sequencer("singleton_string", &["quote", "char", "quote"])
        .sequencer("regular_string", &["quote", "char_loop", "quote"])
        .splitter("string", &["regular_string", "singleton_string", "empty_string"]);

    // Numbers
    let minus = || TokenOp::optional_literal("-");
    let digits = || TokenOp::one_or_more(ByteClass::DIGIT);
    let exponent = || {
        [
            TokenOp::one_of(EXPONENT),
            TokenOp::optional(SIGN),
            TokenOp::one_or_more(ByteClass::DIGIT),
        ]
    };
    let fraction = || [TokenOp::literal("."), TokenOp::one_or_more(ByteClass::DIGIT)];

    let mut decimal_exp = vec![minus(), digits()];
    decimal_exp.extend(fraction());
    decimal_exp.extend(exponent());
    let mut integer_exp = vec![minus(), digits()];
    integer_exp.extend(exponent());
    let mut decimal = vec![minus(), digits()];
    decimal.extend(fraction());

    b.terminal("decimal_exp", decimal_exp)
        .terminal("integer_exp", integer_exp)
        .terminal("decimal", decimal)
        .terminal("integer", vec![minus(), digits()])
        .splitter("number", &["decimal_exp", "integer_exp", "decimal", "integer"]);

    // Literals
    b.terminal("true", vec![TokenOp::literal("true")])
        .terminal("false", vec![TokenOp::literal("false")])
        .splitter("boolean", &["false", "true"])
        .terminal("null", vec![TokenOp::literal("null")]);

    // Values
    b.terminal("ws", vec![TokenOp::zero_or_more(WHITESPACE)])
        .terminal("comma", vec![TokenOp::literal(",")])
        .splitter("value", &["object", "array", "string", "boolean", "null", "number"]);

    // Arrays
    b.terminal("lbracket", vec![TokenOp::literal("[")])
        .terminal("rbracket", vec![TokenOp::literal("]")])
        .sequencer("element_loop", &["value", "ws", "comma", "ws", "element_next"])
        .splitter("element_next", &["element_loop", "value"])
        .sequencer("empty_array", &["lbracket", "ws", "rbracket"])
        .sequencer("singleton_array", &["lbracket", "ws", "value", "ws", "rbracket"])
        .sequencer("regular_array", &["lbracket", "ws", "element_loop", "ws", "rbracket"])
        .splitter("array", &["empty_array", "singleton_array", "regular_array"]);

    // Objects
    b.terminal("lbrace", vec![TokenOp::literal("{")])
        .terminal("rbrace", vec![TokenOp::literal("}")])
        .terminal("colon", vec![TokenOp::literal(":")])
        .sequencer("member", &["string", "ws", "colon", "ws", "value"])
        .sequencer("member_loop", &["member", "ws", "comma", "ws", "member_next"])
        .splitter("member_next", &["member_loop", "member"])
        .sequencer("empty_object", &["lbrace", "ws", "rbrace"])
        .sequencer("regular_object", &["lbrace", "ws", "member_loop", "ws", "rbrace"])
        .sequencer("singleton_object", &["lbrace", "ws", "member", "ws", "rbrace"])
        .splitter("object", &["empty_object", "regular_object", "singleton_object"]);

    b
}

/// A lead byte, a restricted second byte, then `rest` continuation bytes.
fn multibyte(lead: ByteClass, second: ByteClass, rest: usize) -> Vec<TokenOp> {
    let mut ops = vec![TokenOp::one_of(lead), TokenOp::one_of(second)];
    ops.extend((0..rest).map(|_| TokenOp::one_of(CONTINUATION)));
    ops
}
