//! Decoding of string contents.
//!
//! Input reaching these functions has already been accepted by the JSON
//! grammar, so every escape is one of the recognized forms and everything
//! else is well-formed UTF-8.

use std::borrow::Cow;

use crate::error::QueryError;

/// Decode the bytes between a string's quotes.
///
/// `offset` is the position of `raw[0]` in the input and is only used for
/// error reporting. Strings without escapes are borrowed.
pub(crate) fn unescape(raw: &[u8], offset: usize) -> Result<Cow<'_, str>, QueryError> {
    let Some(first) = raw.iter().position(|&b| b == b'\\') else {
        return Ok(String::from_utf8_lossy(raw));
    };

    let mut out = Vec::with_capacity(raw.len());
    out.extend_from_slice(&raw[..first]);
    let mut i = first;

    while i < raw.len() {
        if raw[i] != b'\\' {
            let run = raw[i..]
                .iter()
                .position(|&b| b == b'\\')
                .unwrap_or(raw.len() - i);
            out.extend_from_slice(&raw[i..i + run]);
            i += run;
            continue;
        }

        let Some(&kind) = raw.get(i + 1) else {
            out.push(b'\\');
            break;
        };
        let simple = match kind {
            b'"' => Some(b'"'),
            b'\\' => Some(b'\\'),
            b'/' => Some(b'/'),
            b'b' => Some(0x08),
            b'f' => Some(0x0C),
            b'n' => Some(b'\n'),
            b'r' => Some(b'\r'),
            b't' => Some(b'\t'),
            _ => None,
        };
        if let Some(byte) = simple {
            out.push(byte);
            i += 2;
            continue;
        }

        match (kind, hex4(&raw[i + 2..])) {
            (b'u', Some(unit)) => {
                let (ch, used) = decode_unit(unit, &raw[i + 6..], offset + i)?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                i += 6 + used;
            }
            _ => {
                out.push(b'\\');
                i += 1;
            }
        }
    }

    Ok(Cow::Owned(match String::from_utf8(out) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }))
}

/// Whether the raw string contents decode to exactly `key`.
pub(crate) fn key_matches(raw: &[u8], key: &str) -> bool {
    if !raw.contains(&b'\\') {
        return raw == key.as_bytes();
    }
    matches!(unescape(raw, 0), Ok(decoded) if decoded == key)
}

/// Turn one UTF-16 code unit, plus a following `\uXXXX` low half when
/// `unit` is a high surrogate, into a char. Returns the char and how many
/// bytes of `rest` were consumed.
fn decode_unit(unit: u16, rest: &[u8], at: usize) -> Result<(char, usize), QueryError> {
    match unit {
        0xD800..=0xDBFF => {
            let low = match rest {
                [b'\\', b'u', tail @ ..] => hex4(tail),
                _ => None,
            };
            match low {
                Some(low @ 0xDC00..=0xDFFF) => {
                    let code = 0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                    char::from_u32(code)
                        .map(|c| (c, 6))
                        .ok_or(QueryError::UnpairedSurrogate { offset: at })
                }
                _ => Err(QueryError::UnpairedSurrogate { offset: at }),
            }
        }
        0xDC00..=0xDFFF => Err(QueryError::UnpairedSurrogate { offset: at }),
        _ => char::from_u32(u32::from(unit))
            .map(|c| (c, 0))
            .ok_or(QueryError::UnpairedSurrogate { offset: at }),
    }
}

fn hex4(bytes: &[u8]) -> Option<u16> {
    let digits = bytes.get(..4)?;
    digits.iter().try_fold(0u16, |acc, &b| {
        let v = (b as char).to_digit(16)?;
        Some(acc << 4 | v as u16)
    })
}
