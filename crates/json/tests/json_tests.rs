//! Integration tests for JSON parsing and queries.
//!
//! Organized by the layer under test: grammar acceptance, error offsets,
//! indexing and lookup, typed accessors, then property tests over generated
//! documents.

use std::sync::OnceLock;

use jsonparse::{
    init, parse, parse_with, Document, JsonGrammar, JsonType, ParseError, QueryError, RunOptions,
    TopLevel, ValueHandle,
};
use proptest::prelude::*;

// ============================================================
// Helper functions
// ============================================================

/// Shared grammar that accepts any value at top level.
fn any_value() -> &'static JsonGrammar {
    static ANY: OnceLock<JsonGrammar> = OnceLock::new();
    ANY.get_or_init(|| JsonGrammar::with_top_level(TopLevel::AnyValue).unwrap())
}

fn parse_any(input: &[u8]) -> Result<Document<'_>, ParseError> {
    parse(any_value(), input)
}

fn error_offset(input: &[u8]) -> usize {
    match parse_any(input).unwrap_err() {
        ParseError::NoMatch { offset, .. } => offset,
        other => panic!("expected NoMatch, got {other:?}"),
    }
}

/// Every handle in the document, depth first, root included.
fn all_values<'d, 'a>(doc: &'d Document<'a>) -> Vec<ValueHandle<'d, 'a>> {
    let mut out = Vec::new();
    let mut stack = vec![doc.root()];
    while let Some(v) = stack.pop() {
        match v.type_of() {
            JsonType::Object => stack.extend(v.members().unwrap().into_iter().map(|(_, m)| m)),
            JsonType::Array => stack.extend(v.elements().unwrap()),
            _ => {}
        }
        out.push(v);
    }
    out
}

// ============================================================
// Grammar acceptance
// ============================================================

#[test]
fn empty_singleton_regular_arrays() {
    let inputs: [&[u8]; 5] = [b"[]", b"[1]", b"[1,2,3]", b"[ ]", b"[ 1 , 2 ]"];
    for input in inputs {
        let doc = parse_any(input).unwrap();
        assert_eq!(doc.root().type_of(), JsonType::Array);
    }
    let doc = parse_any(b"[1,2,3]").unwrap();
    let items: Vec<i64> = doc
        .root()
        .elements()
        .unwrap()
        .iter()
        .map(|v| v.as_integer().unwrap())
        .collect();
    assert_eq!(items, vec![1, 2, 3]);
}

#[test]
fn empty_singleton_regular_objects() {
    let inputs: [&[u8]; 4] = [b"{}", br#"{"a":1}"#, br#"{"a":1,"b":2}"#, b"{ \n\t}"];
    for input in inputs {
        parse(init(), input).unwrap();
    }
}

#[test]
fn scientific_decimal_is_one_token() {
    let doc = parse_any(b"1.5e10").unwrap();
    let root = doc.root();
    assert_eq!(root.type_of(), JsonType::Float);
    assert_eq!(root.byte_span().as_range(), 0..6);
    assert_eq!(root.as_float().unwrap(), 1.5e10);

    let ast = doc.ast();
    let number = root.node();
    let form = ast.child(number, 0).unwrap();
    assert_eq!(ast.name(form), "decimal_exp");
    assert!(ast.children(form).is_empty());
}

#[test]
fn number_forms() {
    let cases: [(&[u8], JsonType); 6] = [
        (b"0", JsonType::Integer),
        (b"-12", JsonType::Integer),
        (b"3.25", JsonType::Float),
        (b"2E5", JsonType::Float),
        (b"-1e-3", JsonType::Float),
        (b"6.02e+23", JsonType::Float),
    ];
    for (input, ty) in cases {
        assert_eq!(parse_any(input).unwrap().root().type_of(), ty, "{input:?}");
    }
}

#[test]
fn literals() {
    assert!(parse_any(b"true").unwrap().root().as_bool().unwrap());
    assert!(!parse_any(b"false").unwrap().root().as_bool().unwrap());
    assert!(parse_any(b"null").unwrap().root().is_null());
}

#[test]
fn all_whitespace_kinds_between_tokens() {
    let input = b"{\r\n\t \"k\" \t:\n [ 1 ,\r2 ] \n}";
    let doc = parse(init(), input).unwrap();
    assert_eq!(doc.find("k").unwrap().elements().unwrap().len(), 2);
}

#[test]
fn multibyte_utf8_in_strings() {
    let input = "{\"k\":\"\u{e9}\u{20ac}\u{1F600}\u{10FFFF}\"}";
    let doc = parse(init(), input.as_bytes()).unwrap();
    let s = doc.find("k").unwrap().as_string().unwrap();
    assert_eq!(s, "\u{e9}\u{20ac}\u{1F600}\u{10FFFF}");
}

#[test]
fn deep_nesting() {
    let depth = 5_000;
    let mut input = "[".repeat(depth);
    input.push_str(&"]".repeat(depth));
    let doc = parse_any(input.as_bytes()).unwrap();
    assert_eq!(doc.root().size(), depth * 2);
}

#[test]
fn long_string() {
    let body = "x".repeat(100_000);
    let input = format!("{{\"s\":\"{body}\"}}");
    let doc = parse(init(), input.as_bytes()).unwrap();
    assert_eq!(doc.find("s").unwrap().as_string().unwrap().len(), 100_000);
}

#[test]
fn string_longer_than_four_mebibytes() {
    // Each character nests two open frames.
    let len = (1 << 22) + 17;
    let input = format!("{{\"s\":\"{}\"}}", "x".repeat(len));
    let doc = parse_with(init(), input.as_bytes(), &RunOptions::default()).unwrap();
    let s = doc.find("s").unwrap();
    assert_eq!(s.size(), len + 2);
    assert_eq!(s.as_string().unwrap().len(), len);
    assert!(doc.ast().stats().max_depth > len);
}

#[test]
#[ignore = "allocates several GiB; run with --ignored"]
fn array_with_millions_of_elements() {
    let count = 3_000_000;
    let mut input = String::with_capacity(count * 2 + 8);
    input.push_str("{\"a\":[");
    for i in 0..count {
        if i > 0 {
            input.push(',');
        }
        input.push('1');
    }
    input.push_str("]}");
    let doc = parse(init(), input.as_bytes()).unwrap();
    assert_eq!(doc.find("a").unwrap().elements().unwrap().len(), count);
}

// ============================================================
// Parse errors
// ============================================================

#[test]
fn stray_commas() {
    assert_eq!(error_offset(b"[1,]"), 3);
    assert_eq!(error_offset(b"[,1]"), 1);
    assert_eq!(error_offset(br#"{"a":1,}"#), 7);
}

#[test]
fn error_lists_expected_tokens() {
    match parse(init(), br#"{"a" 1}"#).unwrap_err() {
        ParseError::NoMatch { offset, expected } => {
            assert_eq!(offset, 5);
            assert_eq!(expected, vec!["colon".to_string()]);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn empty_and_trailing_input() {
    assert_eq!(parse(init(), b"").unwrap_err(), ParseError::EmptyInput);
    assert_eq!(
        parse(init(), b"{} {}").unwrap_err(),
        ParseError::TrailingInput { offset: 2 }
    );
    let opts = RunOptions::default().allow_trailing_input(true);
    let doc = parse_with(init(), b"{} {}", &opts).unwrap();
    assert_eq!(doc.root().size(), 2);
}

#[test]
fn malformed_utf8_fails_at_lead_byte() {
    // lone continuation byte
    assert_eq!(error_offset(b"\"ab\x80\""), 3);
    // two-byte lead followed by ASCII
    assert_eq!(error_offset(b"\"a\xC3(\""), 2);
    // overlong two-byte form
    assert_eq!(error_offset(b"\"\xC0\xAF\""), 1);
    // UTF-16 surrogate encoded directly
    assert_eq!(error_offset(b"\"\xED\xA0\x80\""), 1);
    // past U+10FFFF
    assert_eq!(error_offset(b"\"\xF4\x90\x80\x80\""), 1);
    // truncated four-byte sequence
    assert_eq!(error_offset(b"\"xy\xF0\x9F\x98\""), 3);
}

#[test]
fn raw_control_characters_rejected() {
    assert_eq!(error_offset(b"\"a\tb\""), 2);
    assert_eq!(error_offset(b"\"\n\""), 1);
}

#[test]
fn invalid_escapes_rejected() {
    assert_eq!(error_offset(br#""\x""#), 1);
    assert_eq!(error_offset(br#""\u12G4""#), 1);
}

#[test]
fn depth_limit_is_configurable() {
    let opts = RunOptions::default().with_max_depth(16);
    let err = parse_with(any_value(), b"[[[[[[[[[[1]]]]]]]]]]", &opts).unwrap_err();
    assert!(matches!(err, ParseError::DepthLimitExceeded { depth: 16, .. }));
}

// ============================================================
// Lookup
// ============================================================

#[test]
fn nested_lookup() {
    let doc = parse(init(), br#"{"a":{"b":1}}"#).unwrap();
    let v = doc.find("a.b").unwrap();
    assert_eq!(v.type_of(), JsonType::Integer);
    assert_eq!(v.as_integer().unwrap(), 1);
}

#[test]
fn missing_segment_is_named() {
    let doc = parse(init(), br#"{"a":{"b":1}}"#).unwrap();
    assert_eq!(
        doc.find("a.z").unwrap_err(),
        QueryError::KeyNotFound {
            path: "a.z".into(),
            segment: "z".into()
        }
    );
    assert_eq!(
        doc.find("a.b.c").unwrap_err(),
        QueryError::NotAnObject {
            path: "a.b.c".into(),
            segment: "c".into()
        }
    );
}

#[test]
fn lookup_is_order_independent() {
    let a = parse(init(), br#"{"x":1,"y":2}"#).unwrap();
    let b = parse(init(), br#"{"y":2,"x":1}"#).unwrap();
    for key in ["x", "y"] {
        assert_eq!(
            a.find(key).unwrap().as_integer().unwrap(),
            b.find(key).unwrap().as_integer().unwrap()
        );
    }
    let keys: Vec<String> = b
        .root()
        .members()
        .unwrap()
        .into_iter()
        .map(|(k, _)| k.into_owned())
        .collect();
    assert_eq!(keys, vec!["y", "x"]);
}

#[test]
fn escaped_keys_match_decoded_text() {
    let doc = parse(init(), br#"{"caf\u00e9":1,"q\"t":2,"tab\tkey":3}"#).unwrap();
    assert_eq!(doc.find("caf\u{e9}").unwrap().as_integer().unwrap(), 1);
    assert_eq!(doc.find("q\"t").unwrap().as_integer().unwrap(), 2);
    assert_eq!(doc.find("tab\tkey").unwrap().as_integer().unwrap(), 3);
}

#[test]
fn dotted_keys_need_segments() {
    let doc = parse(init(), br#"{"a.b":1,"a":{"b":2}}"#).unwrap();
    assert_eq!(doc.find("a.b").unwrap().as_integer().unwrap(), 2);
    assert_eq!(doc.find_segments(&["a.b"]).unwrap().as_integer().unwrap(), 1);
}

#[test]
fn empty_key_and_empty_segment() {
    let doc = parse(init(), br#"{"":{"":5}}"#).unwrap();
    assert_eq!(doc.find(".").unwrap().as_integer().unwrap(), 5);
    assert_eq!(doc.find("").unwrap().type_of(), JsonType::Object);
}

#[test]
fn duplicate_keys_last_wins() {
    let doc = parse(init(), br#"{"k":1,"k":2}"#).unwrap();
    assert_eq!(doc.find("k").unwrap().as_integer().unwrap(), 2);
    assert_eq!(doc.root().members().unwrap().len(), 2);
}

#[test]
fn get_on_handles() {
    let doc = parse(init(), br#"{"outer":{"inner":[true]}}"#).unwrap();
    let outer = doc.find("outer").unwrap();
    let inner = outer.get("inner").unwrap();
    assert!(inner.elements().unwrap()[0].as_bool().unwrap());
    assert_eq!(
        inner.get("x").unwrap_err(),
        QueryError::NotAnObject {
            path: "x".into(),
            segment: "x".into()
        }
    );
}

// ============================================================
// Typed accessors
// ============================================================

#[test]
fn type_mismatch_never_coerces() {
    let doc = parse(init(), br#"{"n":1,"s":"1","f":1.0}"#).unwrap();
    assert_eq!(
        doc.find("s").unwrap().as_integer().unwrap_err(),
        QueryError::TypeMismatch {
            expected: JsonType::Integer,
            found: JsonType::String,
            offset: 11,
        }
    );
    assert!(matches!(
        doc.find("n").unwrap().as_string(),
        Err(QueryError::TypeMismatch { .. })
    ));
    assert!(matches!(
        doc.find("n").unwrap().as_float(),
        Err(QueryError::TypeMismatch { .. })
    ));
    assert!(matches!(
        doc.find("f").unwrap().as_integer(),
        Err(QueryError::TypeMismatch { .. })
    ));
    assert!(matches!(
        doc.root().elements(),
        Err(QueryError::TypeMismatch { .. })
    ));
}

#[test]
fn integer_overflow() {
    let doc = parse(init(), br#"{"big":9223372036854775808,"min":-9223372036854775808}"#).unwrap();
    assert_eq!(
        doc.find("big").unwrap().as_integer().unwrap_err(),
        QueryError::NumericOverflow { offset: 7 }
    );
    assert_eq!(doc.find("min").unwrap().as_integer().unwrap(), i64::MIN);
}

#[test]
fn float_overflow() {
    let doc = parse(init(), br#"{"huge":1e400,"tiny":1e-400}"#).unwrap();
    assert_eq!(
        doc.find("huge").unwrap().as_float().unwrap_err(),
        QueryError::NumericOverflow { offset: 8 }
    );
    assert_eq!(doc.find("tiny").unwrap().as_float().unwrap(), 0.0);
}

#[test]
fn leading_zeros_are_accepted() {
    let doc = parse(init(), br#"{"z":007}"#).unwrap();
    assert_eq!(doc.find("z").unwrap().as_integer().unwrap(), 7);
}

#[test]
fn unpaired_surrogate() {
    let doc = parse(init(), br#"{"s":"ok\ud800"}"#).unwrap();
    assert_eq!(
        doc.find("s").unwrap().as_string().unwrap_err(),
        QueryError::UnpairedSurrogate { offset: 8 }
    );
}

#[test]
fn span_and_raw() {
    let input = br#"{"a": [1, {"b": "c"}]}"#;
    let doc = parse(init(), input).unwrap();
    let a = doc.find("a").unwrap();
    assert_eq!(a.raw(), br#"[1, {"b": "c"}]"#);
    assert_eq!(a.byte_span().as_range(), 6..21);
    assert_eq!(a.size(), 15);
}

// ============================================================
// Properties
// ============================================================

#[derive(Debug, Clone)]
enum Json {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Arr(Vec<Json>),
    Obj(Vec<(String, Json)>),
}

impl Json {
    fn render(&self, out: &mut String, spaced: bool) {
        let sep = if spaced { ", " } else { "," };
        match self {
            Json::Null => out.push_str("null"),
            Json::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Json::Int(n) => out.push_str(&n.to_string()),
            Json::Float(f) => out.push_str(&format!("{f:e}")),
            Json::Str(s) => render_string(s, out),
            Json::Arr(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(sep);
                    }
                    item.render(out, spaced);
                }
                out.push(']');
            }
            Json::Obj(members) => {
                out.push('{');
                for (i, (k, v)) in members.iter().enumerate() {
                    if i > 0 {
                        out.push_str(sep);
                    }
                    render_string(k, out);
                    out.push_str(if spaced { " : " } else { ":" });
                    v.render(out, spaced);
                }
                out.push('}');
            }
        }
    }

    fn json_type(&self) -> JsonType {
        match self {
            Json::Null => JsonType::Null,
            Json::Bool(_) => JsonType::Boolean,
            Json::Int(_) => JsonType::Integer,
            Json::Float(_) => JsonType::Float,
            Json::Str(_) => JsonType::String,
            Json::Arr(_) => JsonType::Array,
            Json::Obj(_) => JsonType::Object,
        }
    }
}

fn render_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn arb_json() -> impl Strategy<Value = Json> {
    let leaf = prop_oneof![
        Just(Json::Null),
        any::<bool>().prop_map(Json::Bool),
        any::<i64>().prop_map(Json::Int),
        (-1.0e6..1.0e6f64).prop_map(Json::Float),
        "\\PC{0,8}".prop_map(Json::Str),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Json::Arr),
            prop::collection::vec(("[a-z]{0,4}", inner), 0..6).prop_map(Json::Obj),
        ]
    })
}

fn arb_object() -> impl Strategy<Value = Json> {
    prop::collection::vec(("[a-z]{1,4}", arb_json()), 0..6).prop_map(Json::Obj)
}

proptest! {
    #[test]
    fn valid_texts_parse_and_span_the_input(value in arb_json(), spaced in any::<bool>()) {
        let mut text = String::new();
        value.render(&mut text, spaced);
        let doc = parse_any(text.as_bytes()).unwrap();
        prop_assert_eq!(doc.root().byte_span().as_range(), 0..text.len());
        prop_assert_eq!(doc.root().type_of(), value.json_type());
    }

    #[test]
    fn value_spans_reparse_as_the_same_type(value in arb_object()) {
        let mut text = String::new();
        value.render(&mut text, false);
        let doc = parse(init(), text.as_bytes()).unwrap();
        for handle in all_values(&doc) {
            let slice = &text.as_bytes()[handle.byte_span().as_range()];
            let again = parse_any(slice).unwrap();
            prop_assert_eq!(again.root().type_of(), handle.type_of());
            prop_assert_eq!(again.root().size(), handle.size());
        }
    }

    #[test]
    fn decoded_leaves_match_the_model(value in arb_object()) {
        let mut text = String::new();
        value.render(&mut text, true);
        let doc = parse(init(), text.as_bytes()).unwrap();
        let Json::Obj(members) = &value else { unreachable!() };
        let handles = doc.root().members().unwrap();
        prop_assert_eq!(handles.len(), members.len());
        for ((key, model), (decoded, handle)) in members.iter().zip(handles) {
            prop_assert_eq!(&*decoded, key.as_str());
            match model {
                Json::Int(n) => prop_assert_eq!(handle.as_integer().unwrap(), *n),
                Json::Float(f) => prop_assert_eq!(handle.as_float().unwrap(), *f),
                Json::Str(s) => prop_assert_eq!(handle.as_string().unwrap(), s.as_str()),
                Json::Bool(b) => prop_assert_eq!(handle.as_bool().unwrap(), *b),
                Json::Null => prop_assert!(handle.is_null()),
                _ => prop_assert_eq!(handle.type_of(), model.json_type()),
            }
        }
    }
}
