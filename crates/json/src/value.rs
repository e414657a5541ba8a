//! Typed access to located values.

use std::borrow::Cow;
use std::fmt;
use std::num::IntErrorKind;

use jsonparse_common::Span;
use jsonparse_engine::NodeId;

use crate::document::Document;
use crate::error::QueryError;
use crate::unescape::unescape;
use crate::walk::walk;

/// The seven kinds of JSON value a handle can point at.
///
/// Numbers are split by lexical form: `Integer` for digits only, `Float`
/// whenever a fraction or exponent is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    Integer,
    Float,
    String,
    Object,
    Array,
    Null,
    Boolean,
}

impl JsonType {
    pub fn as_str(self) -> &'static str {
        match self {
            JsonType::Integer => "integer",
            JsonType::Float => "float",
            JsonType::String => "string",
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::Null => "null",
            JsonType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A located value inside a [`Document`].
///
/// Handles are cheap to copy and borrow the document; accessors that decode
/// borrow the input where possible.
#[derive(Clone, Copy)]
pub struct ValueHandle<'d, 'a> {
    doc: &'d Document<'a>,
    node: NodeId,
}

impl<'d, 'a> ValueHandle<'d, 'a> {
    pub(crate) fn new(doc: &'d Document<'a>, node: NodeId) -> Self {
        Self { doc, node }
    }

    /// The concrete tree node behind this handle.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn type_of(&self) -> JsonType {
        self.doc.type_at(self.node)
    }

    /// The value's `[start, end)` range in the input.
    pub fn byte_span(&self) -> Span {
        self.doc.ast().span(self.node)
    }

    /// Length of the value's source text in bytes.
    pub fn size(&self) -> usize {
        self.byte_span().len()
    }

    /// The value's exact source text.
    pub fn raw(&self) -> &'a [u8] {
        self.doc.ast().text(self.node)
    }

    /// Decode a string value.
    ///
    /// Borrows from the input when the string contains no escapes.
    pub fn as_string(&self) -> Result<Cow<'a, str>, QueryError> {
        self.expect(JsonType::String)?;
        let inner = self.byte_span().shrink(1);
        unescape(&self.doc.input()[inner.as_range()], inner.start)
    }

    pub fn as_integer(&self) -> Result<i64, QueryError> {
        self.expect(JsonType::Integer)?;
        let offset = self.byte_span().start;
        let text = std::str::from_utf8(self.raw())
            .map_err(|_| QueryError::NumericFormat { offset })?;
        text.parse::<i64>().map_err(|e| match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                QueryError::NumericOverflow { offset }
            }
            _ => QueryError::NumericFormat { offset },
        })
    }

    /// Decode a number with a fraction or exponent.
    ///
    /// Integers are rejected with a type mismatch rather than widened.
    pub fn as_float(&self) -> Result<f64, QueryError> {
        self.expect(JsonType::Float)?;
        let offset = self.byte_span().start;
        let text = std::str::from_utf8(self.raw())
            .map_err(|_| QueryError::NumericFormat { offset })?;
        let value = text
            .parse::<f64>()
            .map_err(|_| QueryError::NumericFormat { offset })?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(QueryError::NumericOverflow { offset })
        }
    }

    pub fn as_bool(&self) -> Result<bool, QueryError> {
        self.expect(JsonType::Boolean)?;
        Ok(self.doc.is_true(self.node))
    }

    pub fn is_null(&self) -> bool {
        self.type_of() == JsonType::Null
    }

    /// Look up one member of an object by exact (decoded) key.
    pub fn get(&self, key: &str) -> Result<ValueHandle<'d, 'a>, QueryError> {
        let node = walk(self.doc, self.node, key, [key])?;
        Ok(ValueHandle::new(self.doc, node))
    }

    /// Resolve a dotted path relative to this value.
    pub fn find(&self, path: &str) -> Result<ValueHandle<'d, 'a>, QueryError> {
        let node = walk(self.doc, self.node, path, path.split('.'))?;
        Ok(ValueHandle::new(self.doc, node))
    }

    /// An object's members as decoded keys and values, in source order.
    ///
    /// Duplicate keys are all listed.
    pub fn members(&self) -> Result<Vec<(Cow<'a, str>, ValueHandle<'d, 'a>)>, QueryError> {
        self.expect(JsonType::Object)?;
        let input = self.doc.input();
        let index = self.doc.index();
        index
            .keys(self.node)
            .iter()
            .filter_map(|&key| index.entry(key).map(|value| (key, value)))
            .map(|(key, value)| -> Result<_, QueryError> {
                let inner = key.shrink(1);
                let name = unescape(&input[inner.as_range()], inner.start)?;
                Ok((name, ValueHandle::new(self.doc, value)))
            })
            .collect()
    }

    /// An array's elements, in source order.
    pub fn elements(&self) -> Result<Vec<ValueHandle<'d, 'a>>, QueryError> {
        self.expect(JsonType::Array)?;
        Ok(self
            .doc
            .index()
            .elements(self.node)
            .iter()
            .map(|&node| ValueHandle::new(self.doc, node))
            .collect())
    }

    fn expect(&self, expected: JsonType) -> Result<(), QueryError> {
        let found = self.type_of();
        if found == expected {
            Ok(())
        } else {
            Err(QueryError::TypeMismatch {
                expected,
                found,
                offset: self.byte_span().start,
            })
        }
    }
}

impl fmt::Debug for ValueHandle<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueHandle")
            .field("type", &self.type_of())
            .field("span", &self.byte_span())
            .finish()
    }
}
