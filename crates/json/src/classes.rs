//! Byte classes used by the JSON grammar.
//!
//! Multi-byte UTF-8 lead classes follow the well-formed sequence table, so
//! overlong encodings, surrogate code points and values past U+10FFFF never
//! match.

use jsonparse_common::ByteClass;

/// Characters that may appear unescaped in a string: printable ASCII and
/// DEL, minus the quote and backslash.
pub const PLAIN: ByteClass = ByteClass::range(0x20, 0x7F).without_bytes(b"\"\\");

pub const CONTINUATION: ByteClass = ByteClass::range(0x80, 0xBF);

/// Lead bytes of two-byte sequences (C0 and C1 would be overlong).
pub const LEAD_2: ByteClass = ByteClass::range(0xC2, 0xDF);

/// Three-byte lead bytes whose second byte may be any continuation.
pub const LEAD_3: ByteClass = ByteClass::range(0xE1, 0xEC).union(ByteClass::range(0xEE, 0xEF));

/// Second byte after E0.
pub const AFTER_E0: ByteClass = ByteClass::range(0xA0, 0xBF);

/// Second byte after ED, excluding the surrogate block.
pub const AFTER_ED: ByteClass = ByteClass::range(0x80, 0x9F);

/// Four-byte lead bytes whose second byte may be any continuation.
pub const LEAD_4: ByteClass = ByteClass::range(0xF1, 0xF3);

/// Second byte after F0.
pub const AFTER_F0: ByteClass = ByteClass::range(0x90, 0xBF);

/// Second byte after F4, capping at U+10FFFF.
pub const AFTER_F4: ByteClass = ByteClass::range(0x80, 0x8F);

pub const WHITESPACE: ByteClass = ByteClass::from_bytes(b" \t\n\r");

pub const EXPONENT: ByteClass = ByteClass::from_bytes(b"eE");

pub const SIGN: ByteClass = ByteClass::from_bytes(b"+-");
